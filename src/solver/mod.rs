//! Solver and operator contracts.
//!
//! Everything is parameterized over a problem type `P` and an
//! [`Objective<P>`] carrying the fitness algebra, so solvers, crossovers,
//! and local search compose without knowing the concrete problem.
//!
//! - [`Solver`] — produces a tour and its fitness for a problem
//! - [`Operator`] — n-ary tour operator
//! - [`CrossoverOperator`] — the binary case: two parents, one child
//! - [`GaSolver`] — elitist genetic algorithm accepting any crossover

mod ga;

use thiserror::Error;

use crate::models::{Tour, TourError};
use crate::objective::Objective;

pub use ga::{GaConfig, GaSolver};

/// Errors raised by tour operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    /// A parent tour's endpoint disagrees with the problem's endpoint.
    #[error("parent endpoint {parent:?} disagrees with problem endpoint {problem:?}")]
    PreconditionViolation {
        /// The offending parent's fixed endpoint.
        parent: Option<usize>,
        /// The problem's fixed endpoint.
        problem: Option<usize>,
    },
    /// The operator was applied to the wrong number of parents.
    #[error("operator expects {expected} parents, got {got}")]
    Arity {
        /// Required parent count.
        expected: usize,
        /// Supplied parent count.
        got: usize,
    },
    /// A tour mutation failed while assembling the child.
    #[error(transparent)]
    Tour(#[from] TourError),
}

/// Errors raised by solvers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    /// The problem admits no tour under its constraints.
    #[error("no feasible tour: {0}")]
    Infeasible(String),
    /// An operator failed during the search.
    #[error(transparent)]
    Operator(#[from] OperatorError),
    /// A tour could not be assembled.
    #[error(transparent)]
    Tour(#[from] TourError),
}

/// Produces a tour and its fitness for a problem.
pub trait Solver<P, O: Objective<P>> {
    /// Identifier of this solver.
    fn name(&self) -> &str;

    /// Runs the search and returns the best tour found.
    fn solve(&mut self, problem: &P, objective: &O) -> Result<(Tour, O::Fitness), SolverError>;
}

/// An n-ary operator combining parent tours into a child.
pub trait Operator<P, O: Objective<P>> {
    /// Identifier of this operator.
    fn name(&self) -> &str;

    /// Applies the operator to the given parents.
    fn apply(
        &mut self,
        problem: &P,
        objective: &O,
        parents: &[&Tour],
    ) -> Result<(Tour, O::Fitness), OperatorError>;
}

/// A binary crossover: two parents, one child.
pub trait CrossoverOperator<P, O: Objective<P>> {
    /// Identifier of this crossover.
    fn name(&self) -> &str;

    /// Combines two parents into a child and its fitness.
    fn apply(
        &mut self,
        problem: &P,
        objective: &O,
        parent1: &Tour,
        parent2: &Tour,
    ) -> Result<(Tour, O::Fitness), OperatorError>;
}

/// Every crossover is an [`Operator`] over exactly two parents.
impl<P, O, C> Operator<P, O> for C
where
    O: Objective<P>,
    C: CrossoverOperator<P, O>,
{
    fn name(&self) -> &str {
        CrossoverOperator::name(self)
    }

    fn apply(
        &mut self,
        problem: &P,
        objective: &O,
        parents: &[&Tour],
    ) -> Result<(Tour, O::Fitness), OperatorError> {
        match parents {
            [parent1, parent2] => {
                CrossoverOperator::apply(self, problem, objective, parent1, parent2)
            }
            _ => Err(OperatorError::Arity {
                expected: 2,
                got: parents.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tour, TspProblem};
    use crate::objective::TspObjective;
    use crate::operators::EaxOperator;
    use crate::weights::WeightMatrix;

    #[test]
    fn test_crossover_is_a_binary_operator() {
        let weights =
            WeightMatrix::from_coordinates(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let problem = TspProblem::new(0, Some(0), weights).unwrap();
        let p1 = Tour::new(&[0, 1, 2, 3], Some(0)).unwrap();
        let p2 = Tour::new(&[0, 2, 1, 3], Some(0)).unwrap();

        let mut eax = EaxOperator::with_seed(3);
        let (child, _) =
            Operator::apply(&mut eax, &problem, &TspObjective, &[&p1, &p2]).unwrap();
        assert_eq!(child.count(), 4);

        let err = Operator::apply(&mut eax, &problem, &TspObjective, &[&p1]).unwrap_err();
        assert_eq!(err, OperatorError::Arity { expected: 2, got: 1 });
    }
}
