//! The action surface contract consumed by the toggle verifier

use async_trait::async_trait;
use watchlater_core_types::Target;

use crate::{errors::LocatorError, types::*};

/// Capability to open the toggle surface of the current target and operate
/// the control inside it.
///
/// Implementations never report an absent surface as an error; use
/// `OpenOutcome::TransientAbsent` or `OpenOutcome::StructurallyAbsent`.
#[async_trait]
pub trait ActionSurfaceLocator: Send + Sync {
    /// Open the surface for the target.
    async fn open(&self, target: &Target) -> Result<OpenOutcome, LocatorError>;

    /// Find the control whose label matches `label` (case-insensitive).
    async fn find_option(
        &self,
        target: &Target,
        surface: &SurfaceHandle,
        label: &str,
    ) -> Result<Option<OptionHandle>, LocatorError>;

    /// Read the checked state of a control.
    async fn is_checked(&self, target: &Target, option: &OptionHandle)
        -> Result<bool, LocatorError>;

    /// Flip the control once.
    async fn toggle(&self, target: &Target, option: &OptionHandle) -> Result<(), LocatorError>;

    /// Dismiss whatever surface is open (escape / cancel).
    async fn dismiss(&self, target: &Target) -> Result<(), LocatorError>;
}
