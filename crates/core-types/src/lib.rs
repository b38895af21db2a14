//! Shared primitives for the verified toggle engine: targets, their
//! classification and the per-target outcome.

pub mod identify;
pub mod outcome;
pub mod target;

pub use identify::{TargetIdentifier, VideoUrlIdentifier};
pub use outcome::{AttemptOutcome, ErrorKind, ToggleVia};
pub use target::{ItemId, SurfaceKind, Target, TargetId, TargetRef, TargetScope};
