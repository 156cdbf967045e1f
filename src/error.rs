//! Simulation error types

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while configuring or running a sweep
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A numeric argument is outside its domain
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Noise was requested for an empty signal
    #[error("Cannot apply noise to an empty signal")]
    EmptySignal,

    /// Signal-relative noise requested for a zero-power signal
    #[error("Signal has zero power, SNR is undefined")]
    DegenerateSignal,

    /// SNR point index past the end of the configured sweep
    #[error("SNR point {index} out of range (sweep has {len} points)")]
    PointOutOfRange { index: usize, len: usize },
}
