//! Tour operators.
//!
//! - [`EaxOperator`] — Edge Assembly Crossover (Nagata & Kobayashi, 1997)
//! - [`two_opt_improve()`] — 2-opt edge-reversal improvement

mod eax;
mod two_opt;

pub use eax::{EaxOperator, SelectionStrategy};
pub use two_opt::two_opt_improve;
