//! Error types for the toggle gate

use thiserror::Error;

/// Gate configuration error enumeration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Timing policy rejected
    #[error("Invalid timing policy: {0}")]
    InvalidTiming(String),

    /// Option label empty
    #[error("Invalid option label: {0}")]
    InvalidLabel(String),
}
