//! Problem instances and the problem trait consumed by solvers.

use crate::models::{TimeWindow, Tour};
use crate::weights::WeightMatrix;

/// Width of the eagerly built forward-neighbour cache.
///
/// Matches the candidate width of the crossover's reconnection phase.
const NN_CACHE_WIDTH: usize = 10;

/// Defines a tour problem instance.
///
/// This trait provides the interface that solvers and crossover operators
/// use to access problem data: the endpoints, the customer count, directed
/// weights, and (optionally) precomputed forward nearest neighbours.
///
/// Customer ids are contiguous in `[0, count)`.
pub trait TourProblem {
    /// The required starting customer.
    fn first(&self) -> usize;

    /// The fixed endpoint: `None` for an open problem, `Some(first)` for a
    /// closed one, a distinct customer for a fixed-endpoint problem.
    fn last(&self) -> Option<usize>;

    /// Number of customers.
    fn count(&self) -> usize;

    /// Weight of travelling from `from` to `to`.
    fn weight(&self, from: usize, to: usize) -> f64;

    /// The `k` nearest forward neighbours of `v`, closest first.
    ///
    /// Defaults to no neighbours, which disables neighbour-guided phases in
    /// operators that use them.
    fn nearest_neighbours_forward(&self, _k: usize, _v: usize) -> &[usize] {
        &[]
    }
}

fn build_forward_cache(weights: &WeightMatrix) -> Vec<Vec<usize>> {
    (0..weights.size())
        .map(|v| weights.n_nearest_forward(NN_CACHE_WIDTH, v))
        .collect()
}

fn slice_cache(cache: &[Vec<usize>], k: usize, v: usize) -> &[usize] {
    let cached = &cache[v];
    &cached[..k.min(cached.len())]
}

/// A (possibly asymmetric) Traveling Salesman Problem.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::{TourProblem, TspProblem};
/// use eax_tsp::weights::WeightMatrix;
///
/// let weights = WeightMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
/// let problem = TspProblem::new(0, Some(0), weights).unwrap(); // closed
/// assert_eq!(problem.count(), 3);
/// assert_eq!(problem.nearest_neighbours_forward(1, 0), &[1]);
/// ```
#[derive(Debug, Clone)]
pub struct TspProblem {
    first: usize,
    last: Option<usize>,
    weights: WeightMatrix,
    nearest_forward: Vec<Vec<usize>>,
}

impl TspProblem {
    /// Creates a TSP instance over the given weight matrix.
    ///
    /// Returns `None` if `first` or `last` is outside the matrix.
    pub fn new(first: usize, last: Option<usize>, weights: WeightMatrix) -> Option<Self> {
        if first >= weights.size() {
            return None;
        }
        if let Some(l) = last {
            if l >= weights.size() {
                return None;
            }
        }
        let nearest_forward = build_forward_cache(&weights);
        Some(Self {
            first,
            last,
            weights,
            nearest_forward,
        })
    }

    /// The underlying weight matrix.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }
}

impl TourProblem for TspProblem {
    fn first(&self) -> usize {
        self.first
    }

    fn last(&self) -> Option<usize> {
        self.last
    }

    fn count(&self) -> usize {
        self.weights.size()
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights.get(from, to)
    }

    fn nearest_neighbours_forward(&self, k: usize, v: usize) -> &[usize] {
        slice_cache(&self.nearest_forward, k, v)
    }
}

/// A TSP with time windows.
///
/// The weight matrix holds travel times; window feasibility is judged by the
/// objective, not by the crossover.
#[derive(Debug, Clone)]
pub struct TsptwProblem {
    first: usize,
    last: Option<usize>,
    times: WeightMatrix,
    windows: Vec<Option<TimeWindow>>,
    nearest_forward: Vec<Vec<usize>>,
}

impl TsptwProblem {
    /// Creates a TSP-TW instance.
    ///
    /// Returns `None` if the endpoints are outside the matrix or the window
    /// list length disagrees with the matrix size.
    pub fn new(
        first: usize,
        last: Option<usize>,
        times: WeightMatrix,
        windows: Vec<Option<TimeWindow>>,
    ) -> Option<Self> {
        if first >= times.size() || windows.len() != times.size() {
            return None;
        }
        if let Some(l) = last {
            if l >= times.size() {
                return None;
            }
        }
        let nearest_forward = build_forward_cache(&times);
        Some(Self {
            first,
            last,
            times,
            windows,
            nearest_forward,
        })
    }

    /// The time window of a customer, if constrained.
    pub fn window(&self, customer: usize) -> Option<&TimeWindow> {
        self.windows[customer].as_ref()
    }
}

impl TourProblem for TsptwProblem {
    fn first(&self) -> usize {
        self.first
    }

    fn last(&self) -> Option<usize> {
        self.last
    }

    fn count(&self) -> usize {
        self.times.size()
    }

    fn weight(&self, from: usize, to: usize) -> f64 {
        self.times.get(from, to)
    }

    fn nearest_neighbours_forward(&self, k: usize, v: usize) -> &[usize] {
        slice_cache(&self.nearest_forward, k, v)
    }
}

/// A directed Selective TSP: visit as many customers as possible within a
/// weight budget, paying a turn penalty at every visited vertex.
///
/// Each physical vertex is split into two sides; the directed weight matrix
/// is indexed by side (`2 * id + side`) and is twice the vertex count in each
/// dimension. Tours over this problem carry packed
/// [`DirectedId`](crate::models::DirectedId) values.
#[derive(Debug, Clone)]
pub struct StspProblem {
    first: usize,
    last: Option<usize>,
    weights: WeightMatrix,
    turn_penalties: [f64; 4],
    max: f64,
}

impl StspProblem {
    /// Creates a directed STSP instance.
    ///
    /// `weights` must be the side-expanded matrix (even size, `2 * vertices`);
    /// `first` and `last` are physical vertex ids. Returns `None` on a
    /// malformed matrix or out-of-range endpoints.
    pub fn new(
        first: usize,
        last: Option<usize>,
        weights: WeightMatrix,
        turn_penalties: [f64; 4],
        max: f64,
    ) -> Option<Self> {
        if weights.size() % 2 != 0 {
            return None;
        }
        let vertices = weights.size() / 2;
        if first >= vertices {
            return None;
        }
        if let Some(l) = last {
            if l >= vertices {
                return None;
            }
        }
        Some(Self {
            first,
            last,
            weights,
            turn_penalties,
            max,
        })
    }

    /// The required starting vertex (physical id).
    pub fn first(&self) -> usize {
        self.first
    }

    /// The fixed final vertex (physical id), if any.
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Number of physical vertices.
    pub fn count(&self) -> usize {
        self.weights.size() / 2
    }

    /// The side-expanded directed weight matrix.
    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }

    /// Directed weight between two side indices (`2 * id + side`).
    pub fn weight(&self, from_side: usize, to_side: usize) -> f64 {
        self.weights.get(from_side, to_side)
    }

    /// The four turn penalties, indexed by turn.
    pub fn turn_penalties(&self) -> &[f64; 4] {
        &self.turn_penalties
    }

    /// The maximum tour weight (budget).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Solves this instance with the default constructive solver.
    pub fn solve(
        &self,
    ) -> Result<(Tour, crate::objective::StspFitness), crate::solver::SolverError> {
        let mut solver = crate::constructive::DirectedGreedySolver::new();
        self.solve_with(&mut solver)
    }

    /// Solves this instance with a caller-supplied solver.
    pub fn solve_with<S>(
        &self,
        solver: &mut S,
    ) -> Result<(Tour, crate::objective::StspFitness), crate::solver::SolverError>
    where
        S: crate::solver::Solver<StspProblem, crate::objective::StspObjective> + ?Sized,
    {
        let objective = crate::objective::StspObjective;
        solver.solve(self, &objective)
    }
}
