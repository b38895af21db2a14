use action_flow::HostError;
use action_gate::GateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("target enumeration failed: {0}")]
    Enumeration(#[from] HostError),
    #[error("target enumeration timed out after {0}ms")]
    EnumerationTimeout(u64),
    #[error("invalid domain filter: {0}")]
    InvalidFilter(#[from] regex::Error),
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] GateError),
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

impl SchedulerError {
    /// Enumeration faults are worth another run; configuration faults are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SchedulerError::Enumeration(_) | SchedulerError::EnumerationTimeout(_)
        )
    }
}
