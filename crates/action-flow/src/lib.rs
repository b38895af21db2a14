//! Per-target flow
//!
//! Wraps the verified toggle with the refresh escalation: when the surface
//! region is missing the target is hard-reloaded and the attempt loop starts
//! over, up to a bounded number of times.

pub mod errors;
pub mod escalation;
pub mod executor;
pub mod ports;

pub use errors::HostError;
pub use escalation::EscalationController;
pub use executor::{TargetRun, TargetRunner};
pub use ports::TargetHost;
