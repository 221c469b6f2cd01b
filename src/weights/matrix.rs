//! Dense weight matrix.

/// A dense n×n weight matrix stored in row-major order.
///
/// Weights are directed: `get(from, to)` and `get(to, from)` may differ.
/// Self-weights are stored but never consulted by the solvers.
///
/// # Examples
///
/// ```
/// use eax_tsp::weights::WeightMatrix;
///
/// let wm = WeightMatrix::from_data(2, vec![0.0, 3.0, 7.0, 0.0]).unwrap();
/// assert_eq!(wm.get(0, 1), 3.0);
/// assert_eq!(wm.get(1, 0), 7.0);
/// assert!(!wm.is_symmetric(1e-10));
/// ```
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    data: Vec<f64>,
    size: usize,
}

impl WeightMatrix {
    /// Creates a weight matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a weight matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Computes a symmetric Euclidean matrix from planar coordinates.
    pub fn from_coordinates(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut wm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                let d = (dx * dx + dy * dy).sqrt();
                wm.set(i, j, d);
                wm.set(j, i, d);
            }
        }
        wm
    }

    /// Returns the weight from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the weight from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, weight: f64) {
        self.data[from * self.size + to] = weight;
    }

    /// Number of customers in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the `k` nearest forward neighbours of `from`, closest first.
    ///
    /// Forward means outgoing weights are ranked: the neighbours `u`
    /// minimizing `get(from, u)`. `from` itself is excluded. Returns fewer
    /// than `k` entries when the matrix is smaller than `k + 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use eax_tsp::weights::WeightMatrix;
    ///
    /// let wm = WeightMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (5.0, 0.0)]);
    /// assert_eq!(wm.n_nearest_forward(2, 0), vec![1, 2]);
    /// ```
    pub fn n_nearest_forward(&self, k: usize, from: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..self.size).filter(|&u| u != from).collect();
        candidates.sort_by(|&a, &b| {
            self.get(from, a)
                .partial_cmp(&self.get(from, b))
                .expect("weight should not be NaN")
                .then(a.cmp(&b))
        });
        candidates.truncate(k);
        candidates
    }
}
