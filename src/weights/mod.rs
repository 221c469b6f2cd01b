//! Weight matrices consumed by the solvers.
//!
//! Provides a dense, possibly asymmetric weight matrix indexed by customer id.

mod matrix;

pub use matrix::WeightMatrix;
