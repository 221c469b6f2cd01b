//! Driver layer turning a weight-matrix collaborator into solved tours.

mod stsp;

pub use stsp::{DirectedWeightSource, EndpointError, StspRouter};
