//! Plain TSP objective: total weight of the tour.

use std::cmp::Ordering;

use super::Objective;
use crate::models::{Tour, TourProblem};

/// Sums `weight(from, to)` over the tour pairs; lower is better.
///
/// # Examples
///
/// ```
/// use eax_tsp::models::{Tour, TspProblem};
/// use eax_tsp::objective::{Objective, TspObjective};
/// use eax_tsp::weights::WeightMatrix;
///
/// let weights = WeightMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
/// let problem = TspProblem::new(0, Some(0), weights).unwrap();
/// let tour = Tour::new(&[0, 1, 2], Some(0)).unwrap();
///
/// let fitness = TspObjective.calculate(&problem, &tour);
/// assert!((fitness - (1.0 + 1.0 + 2f64.sqrt())).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TspObjective;

impl<P: TourProblem> Objective<P> for TspObjective {
    type Fitness = f64;

    fn name(&self) -> &str {
        "TSP"
    }

    fn zero(&self) -> f64 {
        0.0
    }

    fn infinite(&self) -> f64 {
        f64::MAX
    }

    fn is_zero(&self, fitness: &f64) -> bool {
        *fitness == 0.0
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn subtract(&self, a: &f64, b: &f64) -> f64 {
        a - b
    }

    fn compare(&self, a: &f64, b: &f64) -> Ordering {
        a.partial_cmp(b).expect("fitness should not be NaN")
    }

    fn calculate(&self, problem: &P, tour: &Tour) -> f64 {
        tour.pairs()
            .map(|(from, to)| problem.weight(from, to))
            .sum()
    }
}
