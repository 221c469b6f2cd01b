//! Time-window TSP objective.

use std::cmp::Ordering;

use super::Objective;
use crate::models::{Tour, TourProblem, TsptwProblem};

/// Sums travel times over the tour pairs; lower is better.
///
/// The objective is non-continuous: a small reordering can push an arrival
/// past a window's due time, so solvers must not assume smooth deltas.
/// Window feasibility itself is reported by [`TsptwObjective::violations`],
/// not folded into the fitness.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsptwObjective;

impl TsptwObjective {
    /// Counts the customers whose time window is violated.
    ///
    /// Simulates the tour from time zero: travel along each pair, wait for
    /// windows that are not yet open, and flag arrivals past the due time.
    pub fn violations(&self, problem: &TsptwProblem, tour: &Tour) -> usize {
        let mut time = 0.0;
        let mut violated = 0;
        for (from, to) in tour.pairs() {
            time += problem.weight(from, to);
            if let Some(window) = problem.window(to) {
                if window.is_violated(time) {
                    violated += 1;
                }
                time += window.waiting_time(time);
            }
        }
        violated
    }
}

impl Objective<TsptwProblem> for TsptwObjective {
    type Fitness = f64;

    fn name(&self) -> &str {
        "TSPTW"
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

    fn calculate(&self, problem: &TsptwProblem, tour: &Tour) -> f64 {
        tour.pairs()
            .map(|(from, to)| problem.weight(from, to))
            .sum()
    }

    fn is_non_continuous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeWindow;
    use crate::weights::WeightMatrix;

    fn windowed_problem() -> TsptwProblem {
        let times = WeightMatrix::from_coordinates(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let windows = vec![
            None,
            Some(TimeWindow::new(0.0, 15.0).unwrap()),
            Some(TimeWindow::new(0.0, 12.0).unwrap()),
        ];
        TsptwProblem::new(0, None, times, windows).unwrap()
    }

    #[test]
    fn test_calculate_is_plain_time_sum() {
        let problem = windowed_problem();
        let tour = Tour::new(&[0, 1, 2], None).unwrap();
        let fitness = TsptwObjective.calculate(&problem, &tour);
        assert!((fitness - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_is_non_continuous() {
        assert!(Objective::<TsptwProblem>::is_non_continuous(&TsptwObjective));
    }

    #[test]
    fn test_violations_counts_late_arrivals() {
        let problem = windowed_problem();
        // 0 → 1 arrives at 10 (ok, due 15); 1 → 2 arrives at 20 (late, due 12).
        let tour = Tour::new(&[0, 1, 2], None).unwrap();
        assert_eq!(TsptwObjective.violations(&problem, &tour), 1);
    }

    #[test]
    fn test_violations_respects_waiting() {
        let times = WeightMatrix::from_coordinates(&[(0.0, 0.0), (5.0, 0.0)]);
        let windows = vec![None, Some(TimeWindow::new(8.0, 9.0).unwrap())];
        let problem = TsptwProblem::new(0, None, times, windows).unwrap();
        // Arrives at 5, waits until 8, no violation.
        let tour = Tour::new(&[0, 1], None).unwrap();
        assert_eq!(TsptwObjective.violations(&problem, &tour), 0);
    }
}
