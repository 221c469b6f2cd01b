//! Fitness algebra for tour problems.
//!
//! An objective turns a tour into a fitness value and defines the algebra
//! solvers need: an identity, a worst element, addition/subtraction, and a
//! total betterness order.
//!
//! - [`TspObjective`] — total weight over the tour pairs (lower is better)
//! - [`TsptwObjective`] — total travel time, marked non-continuous
//! - [`StspObjective`] — `(customers, weight)` composite for selective tours

mod stsp;
mod tsp;
mod tsptw;

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::Tour;

pub use stsp::{StspFitness, StspObjective};
pub use tsp::TspObjective;
pub use tsptw::TsptwObjective;

/// Fitness algebra over a problem type.
///
/// `compare` orders by betterness: `Ordering::Less` means the first fitness
/// is the better one. [`Objective::infinite`] is the worst possible value
/// under that order, and [`Objective::zero`] is the identity of
/// [`Objective::add`].
pub trait Objective<P> {
    /// The fitness value type.
    type Fitness: Clone + PartialEq + Debug;

    /// Identifier of this objective.
    fn name(&self) -> &str;

    /// The additive identity.
    fn zero(&self) -> Self::Fitness;

    /// The worst possible fitness.
    fn infinite(&self) -> Self::Fitness;

    /// Returns `true` if the fitness equals [`Objective::zero`].
    fn is_zero(&self, fitness: &Self::Fitness) -> bool;

    /// Component-wise sum.
    fn add(&self, a: &Self::Fitness, b: &Self::Fitness) -> Self::Fitness;

    /// Component-wise difference.
    fn subtract(&self, a: &Self::Fitness, b: &Self::Fitness) -> Self::Fitness;

    /// Betterness order: `Less` when `a` beats `b`.
    fn compare(&self, a: &Self::Fitness, b: &Self::Fitness) -> Ordering;

    /// Evaluates a tour against the problem.
    fn calculate(&self, problem: &P, tour: &Tour) -> Self::Fitness;

    /// `true` when small tour changes may cause discontinuous fitness jumps
    /// (e.g. time-window violations), so delta evaluation is unsound.
    fn is_non_continuous(&self) -> bool {
        false
    }
}
