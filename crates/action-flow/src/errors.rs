//! Host error types

use thiserror::Error;

/// Faults reported by the target host (tab enumeration, removal, reload)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Target no longer exists
    #[error("Target not found: {0}")]
    TargetGone(String),

    /// Enumeration of targets failed
    #[error("Enumeration failed: {0}")]
    Enumeration(String),

    /// Host rejected the operation
    #[error("Host operation '{operation}' failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    /// Host did not answer in time
    #[error("Host timeout: {0}")]
    Timeout(String),
}

impl HostError {
    pub fn operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        HostError::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}
