//! Verified toggle gate
//!
//! A click on the save dialog is only trusted once it is visible again after
//! a full close/reopen cycle. This crate implements that check as a bounded
//! attempt loop:
//! - open the surface, locate the option, toggle it if unchecked
//! - close, reopen, re-read the option
//! - confirm on a checked re-read, otherwise retry up to `max_attempts`

pub mod errors;
pub mod timing;
pub mod types;
pub mod verifier;

pub use errors::*;
pub use timing::*;
pub use types::*;
pub use verifier::*;
