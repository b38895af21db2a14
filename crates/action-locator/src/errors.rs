//! Error types for surface location

use thiserror::Error;

/// Locator error enumeration
///
/// These are faults of the collaborator itself. An absent surface is not an
/// error; it is reported through `OpenOutcome`.
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Surface handle no longer valid (dialog closed underneath us)
    #[error("Stale surface: {0}")]
    StaleSurface(String),

    /// Page-side script or transport failure
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// Collaborator call did not return in time
    #[error("Locator timeout: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, LocatorError::Timeout(_) | LocatorError::StaleSurface(_))
    }
}
