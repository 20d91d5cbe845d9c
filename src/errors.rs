//! Shared error types used across submodules.

use thiserror::Error;

use crate::samples::SampleError;
use crate::simulation::SimulationError;

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum RlcLoopError {
    /// Wraps configuration and integration errors.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// Wraps sample table encoding and decoding errors.
    #[error(transparent)]
    Samples(#[from] SampleError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_errors_convert_transparently() {
        let err: RlcLoopError =
            SimulationError::InvalidConfig("resistance must be > 0".into()).into();
        assert_eq!(err.to_string(), "configuration error: resistance must be > 0");
    }
}
