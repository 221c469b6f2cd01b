//! Directed selective-TSP driver.
//!
//! Wires a weight-matrix collaborator to the [`StspProblem`] solver: runs
//! the matrix calculation if needed, validates the endpoints against the
//! matrix's error list, builds the problem, solves, and exposes the tour or
//! a human-readable diagnostic.

use crate::models::{StspProblem, Tour};
use crate::objective::{StspFitness, StspObjective};
use crate::solver::Solver;
use crate::weights::WeightMatrix;

/// Resolution state of one endpoint in the matrix's error list.
///
/// Either side may carry a message; an entry with neither message still
/// marks the endpoint as unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointError {
    /// The location could not be resolved.
    pub location: Option<String>,
    /// The location resolved but could not be routed.
    pub routing: Option<String>,
}

/// The weight-matrix collaborator contract.
///
/// The driver only consumes results: the directed (side-expanded) weight
/// table, the mapping from caller-facing ids to matrix-interior ids, and
/// per-endpoint error states.
pub trait DirectedWeightSource {
    /// Returns `true` once [`DirectedWeightSource::run`] has executed.
    fn has_run(&self) -> bool;

    /// Returns `true` if the matrix calculation succeeded.
    fn has_succeeded(&self) -> bool;

    /// Diagnostic for a failed calculation.
    fn error_message(&self) -> Option<&str>;

    /// Executes the matrix calculation.
    fn run(&mut self);

    /// The error state of a caller-facing id, if it is in the error list.
    fn try_get_error(&self, id: usize) -> Option<EndpointError>;

    /// The side-expanded directed weight matrix.
    fn weights(&self) -> &WeightMatrix;

    /// Maps a caller-facing id to its matrix-interior vertex id.
    fn weight_index(&self, id: usize) -> Option<usize>;
}

/// Solves a directed selective TSP on top of a weight-matrix collaborator.
///
/// After [`StspRouter::run`], either [`StspRouter::tour`] holds the best
/// tour found, or [`StspRouter::error_message`] explains the failure.
#[derive(Debug)]
pub struct StspRouter<M> {
    source: M,
    first: usize,
    last: Option<usize>,
    turn_penalties: [f64; 4],
    max: f64,
    tour: Option<Tour>,
    fitness: Option<StspFitness>,
    error_message: Option<String>,
    has_run: bool,
    has_succeeded: bool,
}

impl<M: DirectedWeightSource> StspRouter<M> {
    /// Creates a router over a matrix collaborator.
    ///
    /// `first` and `last` are caller-facing ids; `max` is the weight budget.
    pub fn new(
        source: M,
        first: usize,
        last: Option<usize>,
        turn_penalties: [f64; 4],
        max: f64,
    ) -> Self {
        Self {
            source,
            first,
            last,
            turn_penalties,
            max,
            tour: None,
            fitness: None,
            error_message: None,
            has_run: false,
            has_succeeded: false,
        }
    }

    /// Runs the driver with the default constructive solver.
    pub fn run(&mut self) {
        match self.build_problem() {
            Some(problem) => {
                let solved = problem.solve();
                self.finish(solved);
            }
            None => self.has_run = true,
        }
    }

    /// Runs the driver with a caller-supplied solver.
    pub fn run_with<S>(&mut self, solver: &mut S)
    where
        S: Solver<StspProblem, StspObjective>,
    {
        match self.build_problem() {
            Some(problem) => {
                let solved = problem.solve_with(solver);
                self.finish(solved);
            }
            None => self.has_run = true,
        }
    }

    /// Returns `true` once the driver has executed.
    pub fn has_run(&self) -> bool {
        self.has_run
    }

    /// Returns `true` if a tour was produced.
    pub fn has_succeeded(&self) -> bool {
        self.has_succeeded
    }

    /// The best tour, or `None` when the driver failed.
    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    /// The fitness of the best tour, if one was produced.
    pub fn fitness(&self) -> Option<&StspFitness> {
        self.fitness.as_ref()
    }

    /// Human-readable diagnostic of the failure, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Validates the endpoints and assembles the problem instance.
    ///
    /// On failure, records the error message and returns `None`.
    fn build_problem(&mut self) -> Option<StspProblem> {
        if !self.source.has_run() {
            self.source.run();
        }
        if !self.source.has_succeeded() {
            self.error_message = Some(
                self.source
                    .error_message()
                    .unwrap_or("weight matrix calculation failed")
                    .to_string(),
            );
            return None;
        }

        let first_index = match self.resolve_endpoint(self.first, "first") {
            Ok(index) => index,
            Err(message) => {
                self.error_message = Some(message);
                return None;
            }
        };
        let last_index = match self.last {
            None => None,
            Some(last) => match self.resolve_endpoint(last, "last") {
                Ok(index) => Some(index),
                Err(message) => {
                    self.error_message = Some(message);
                    return None;
                }
            },
        };

        let problem = StspProblem::new(
            first_index,
            last_index,
            self.source.weights().clone(),
            self.turn_penalties,
            self.max,
        );
        if problem.is_none() {
            self.error_message = Some("weight matrix is not a valid directed matrix".to_string());
        }
        problem
    }

    /// Maps an endpoint to its matrix-interior id, or explains why not.
    fn resolve_endpoint(&self, id: usize, which: &str) -> Result<usize, String> {
        if let Some(error) = self.source.try_get_error(id) {
            if let Some(message) = error.location {
                return Err(format!("{which} location could not be resolved: {message}"));
            }
            if let Some(message) = error.routing {
                return Err(format!("{which} location could not be routed: {message}"));
            }
            return Err(format!("{which} location was in error list"));
        }
        self.source
            .weight_index(id)
            .ok_or_else(|| format!("{which} location was in error list"))
    }

    fn finish(&mut self, solved: Result<(Tour, StspFitness), crate::solver::SolverError>) {
        self.has_run = true;
        match solved {
            Ok((tour, fitness)) => {
                self.tour = Some(tour);
                self.fitness = Some(fitness);
                self.has_succeeded = true;
            }
            Err(error) => {
                self.error_message = Some(error.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DirectedId;

    /// In-memory matrix collaborator with configurable error entries.
    struct StubSource {
        weights: WeightMatrix,
        errors: Vec<(usize, EndpointError)>,
        run_fails: bool,
        has_run: bool,
        has_succeeded: bool,
    }

    impl StubSource {
        fn line() -> Self {
            let mut weights = WeightMatrix::new(6);
            let distance = [[0.0, 1.0, 2.0], [1.0, 0.0, 1.0], [2.0, 1.0, 0.0]];
            for from in 0..3 {
                for to in 0..3 {
                    for fs in 0..2 {
                        for ts in 0..2 {
                            weights.set(from * 2 + fs, to * 2 + ts, distance[from][to]);
                        }
                    }
                }
            }
            Self {
                weights,
                errors: Vec::new(),
                run_fails: false,
                has_run: false,
                has_succeeded: false,
            }
        }

        fn with_error(mut self, id: usize, error: EndpointError) -> Self {
            self.errors.push((id, error));
            self
        }

        fn failing(mut self) -> Self {
            self.run_fails = true;
            self
        }
    }

    impl DirectedWeightSource for StubSource {
        fn has_run(&self) -> bool {
            self.has_run
        }

        fn has_succeeded(&self) -> bool {
            self.has_succeeded
        }

        fn error_message(&self) -> Option<&str> {
            self.run_fails.then_some("no road network loaded")
        }

        fn run(&mut self) {
            self.has_run = true;
            self.has_succeeded = !self.run_fails;
        }

        fn try_get_error(&self, id: usize) -> Option<EndpointError> {
            self.errors
                .iter()
                .find(|(e, _)| *e == id)
                .map(|(_, error)| error.clone())
        }

        fn weights(&self) -> &WeightMatrix {
            &self.weights
        }

        fn weight_index(&self, id: usize) -> Option<usize> {
            (id < 3).then_some(id)
        }
    }

    #[test]
    fn test_run_produces_tour() {
        let mut router = StspRouter::new(StubSource::line(), 0, None, [0.0; 4], f64::INFINITY);
        router.run();

        assert!(router.has_run());
        assert!(router.has_succeeded());
        assert!(router.error_message().is_none());
        let tour = router.tour().unwrap();
        assert_eq!(tour.count(), 3);
        assert_eq!(DirectedId::from_raw(tour.first()).id(), 0);
        assert_eq!(router.fitness().unwrap().customers, 3);
    }

    #[test]
    fn test_matrix_failure_surfaces_message() {
        let mut router =
            StspRouter::new(StubSource::line().failing(), 0, None, [0.0; 4], f64::INFINITY);
        router.run();

        assert!(!router.has_succeeded());
        assert!(router.tour().is_none());
        assert_eq!(router.error_message(), Some("no road network loaded"));
    }

    #[test]
    fn test_first_location_error_kinds() {
        let location_error = EndpointError {
            location: Some("off the map".into()),
            routing: None,
        };
        let mut router = StspRouter::new(
            StubSource::line().with_error(0, location_error),
            0,
            None,
            [0.0; 4],
            f64::INFINITY,
        );
        router.run();
        assert_eq!(
            router.error_message(),
            Some("first location could not be resolved: off the map")
        );

        let routing_error = EndpointError {
            location: None,
            routing: Some("island vertex".into()),
        };
        let mut router = StspRouter::new(
            StubSource::line().with_error(0, routing_error),
            0,
            None,
            [0.0; 4],
            f64::INFINITY,
        );
        router.run();
        assert_eq!(
            router.error_message(),
            Some("first location could not be routed: island vertex")
        );

        let mut router = StspRouter::new(
            StubSource::line().with_error(0, EndpointError::default()),
            0,
            None,
            [0.0; 4],
            f64::INFINITY,
        );
        router.run();
        assert_eq!(router.error_message(), Some("first location was in error list"));
    }

    #[test]
    fn test_last_is_validated_too() {
        let mut router = StspRouter::new(
            StubSource::line().with_error(2, EndpointError::default()),
            0,
            Some(2),
            [0.0; 4],
            f64::INFINITY,
        );
        router.run();
        assert!(!router.has_succeeded());
        assert_eq!(router.error_message(), Some("last location was in error list"));
    }

    #[test]
    fn test_unmapped_endpoint_is_reported() {
        let mut router = StspRouter::new(StubSource::line(), 7, None, [0.0; 4], f64::INFINITY);
        router.run();
        assert_eq!(router.error_message(), Some("first location was in error list"));
    }

    #[test]
    fn test_infeasible_budget_fails_with_message() {
        let mut router = StspRouter::new(StubSource::line(), 0, None, [10.0; 4], 1.0);
        router.run();
        assert!(!router.has_succeeded());
        assert!(router.error_message().unwrap().contains("no feasible tour"));
    }

    #[test]
    fn test_run_with_custom_solver() {
        let mut solver = crate::constructive::DirectedGreedySolver::new();
        let mut router = StspRouter::new(StubSource::line(), 0, Some(0), [0.0; 4], f64::INFINITY);
        router.run_with(&mut solver);

        assert!(router.has_succeeded());
        let tour = router.tour().unwrap();
        assert!(tour.is_closed());
    }
}
