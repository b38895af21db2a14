//! Action surface location
//!
//! This crate hides everything about how the save dialog of a target is
//! reached behind a small contract:
//! - `ActionSurfaceLocator`: open / find option / read / toggle / dismiss
//! - `SurfacePath`: one independently attemptable way of opening the surface
//! - `PathChainLocator`: tries paths in priority order, first usable surface wins

pub mod chain;
pub mod errors;
pub mod locator;
pub mod paths;
pub mod types;

pub use chain::*;
pub use errors::*;
pub use locator::*;
pub use paths::*;
pub use types::*;
