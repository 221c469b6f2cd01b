//! Domain model types for tour optimization.
//!
//! Provides the core abstractions: tours as successor arrays with open,
//! closed, and fixed-endpoint shapes, packed directed ids for turn-aware
//! problems, time windows, and the problem instances solvers operate on.

mod directed;
mod problem;
mod time_window;
mod tour;

pub use directed::DirectedId;
pub use problem::{StspProblem, TourProblem, TspProblem, TsptwProblem};
pub use time_window::TimeWindow;
pub use tour::{Pairs, Tour, TourError};
