//! 2-opt improvement over tours.
//!
//! # Algorithm
//!
//! For each segment `[i..=j]` of the tour sequence, compute the change in
//! weight from reversing it:
//!
//! ```text
//! delta = new(prev→s[j], reversed interior, s[i]→next)
//!       - old(prev→s[i], interior, s[j]→next)
//! ```
//!
//! If delta < 0, reverse the segment and accept the improvement. Repeat
//! until no further improvements are found (first-improvement strategy).
//! The interior is recomputed in both directions, so asymmetric weight
//! matrices are handled correctly.
//!
//! The first customer never moves; a distinct fixed last customer is also
//! pinned; a closed tour includes its closing edge in the deltas.
//!
//! # Complexity
//!
//! O(n³) per pass in the worst case (O(n²) segment pairs, O(n) interior
//! recomputation each).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::models::{Tour, TourProblem};

/// Applies 2-opt improvement to a tour.
///
/// Returns the improved tour and its total weight over [`Tour::pairs`].
///
/// # Examples
///
/// ```
/// use eax_tsp::models::{Tour, TspProblem};
/// use eax_tsp::operators::two_opt_improve;
/// use eax_tsp::weights::WeightMatrix;
///
/// let weights =
///     WeightMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)]);
/// let problem = TspProblem::new(0, Some(0), weights).unwrap();
///
/// // 0 → 2 crosses the diagonal twice; 2-opt untangles it.
/// let crossed = Tour::new(&[0, 2, 1, 3], Some(0)).unwrap();
/// let (improved, weight) = two_opt_improve(&problem, &crossed);
/// assert_eq!(improved.count(), 4);
/// assert!(weight <= 4.0 * 2f64.sqrt() + 1e-10);
/// ```
pub fn two_opt_improve<P: TourProblem>(problem: &P, tour: &Tour) -> (Tour, f64) {
    let mut sequence: Vec<usize> = tour.iter().collect();
    let len = sequence.len();
    let closed = tour.is_closed();
    let fixed_last = matches!(tour.last(), Some(l) if l != tour.first());
    let end = len - usize::from(fixed_last);

    if end > 2 {
        let mut improved = true;
        while improved {
            improved = false;
            for i in 1..end - 1 {
                for j in (i + 1)..end {
                    let delta = reversal_delta(problem, &sequence, closed, i, j);
                    if delta < -1e-10 {
                        sequence[i..=j].reverse();
                        improved = true;
                    }
                }
            }
        }
    }

    let improved_tour =
        Tour::new(&sequence, tour.last()).expect("reversal preserves the customer sequence");
    let weight = improved_tour
        .pairs()
        .map(|(from, to)| problem.weight(from, to))
        .sum();
    (improved_tour, weight)
}

/// Weight change from reversing `sequence[i..=j]`, including the boundary
/// edges and, for a closed tour, the wrap-around edge.
fn reversal_delta<P: TourProblem>(
    problem: &P,
    sequence: &[usize],
    closed: bool,
    i: usize,
    j: usize,
) -> f64 {
    let prev = sequence[i - 1];
    let next = if j + 1 < sequence.len() {
        Some(sequence[j + 1])
    } else if closed {
        Some(sequence[0])
    } else {
        None
    };

    let mut old = problem.weight(prev, sequence[i]);
    let mut new = problem.weight(prev, sequence[j]);
    for k in i..j {
        old += problem.weight(sequence[k], sequence[k + 1]);
        new += problem.weight(sequence[k + 1], sequence[k]);
    }
    if let Some(next) = next {
        old += problem.weight(sequence[j], next);
        new += problem.weight(sequence[i], next);
    }
    new - old
}
