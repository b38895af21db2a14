//! Surface paths
//!
//! Three paths in fallback order:
//! 1. Primary - dedicated save control on standard pages
//! 2. Direct - save action rendered on short-form pages
//! 3. Menu - save entry inside the overflow menu (both layouts)

use async_trait::async_trait;
use watchlater_core_types::{SurfaceKind, Target, ToggleVia};

use crate::{errors::LocatorError, types::*};

/// One independently attemptable way of opening the action surface.
#[async_trait]
pub trait SurfacePath: Send + Sync {
    /// Attempt to open the surface through this path
    async fn open(&self, target: &Target) -> Result<OpenOutcome, LocatorError>;

    /// Path identity reported in outcomes
    fn via(&self) -> ToggleVia;

    /// Whether this path exists on the given layout
    fn applies_to(&self, kind: SurfaceKind) -> bool {
        default_applies(self.via(), kind)
    }

    /// Get path name
    fn name(&self) -> &'static str {
        self.via().name()
    }
}

/// In-surface operations shared by every path.
#[async_trait]
pub trait SurfaceControls: Send + Sync {
    async fn find_option(
        &self,
        target: &Target,
        surface: &SurfaceHandle,
        label: &str,
    ) -> Result<Option<OptionHandle>, LocatorError>;

    async fn is_checked(&self, target: &Target, option: &OptionHandle)
        -> Result<bool, LocatorError>;

    async fn toggle(&self, target: &Target, option: &OptionHandle) -> Result<(), LocatorError>;

    async fn dismiss(&self, target: &Target) -> Result<(), LocatorError>;
}

/// Which layouts each path exists on.
pub fn default_applies(via: ToggleVia, kind: SurfaceKind) -> bool {
    match via {
        ToggleVia::PrimaryPath => kind == SurfaceKind::Standard,
        ToggleVia::DirectPath => kind == SurfaceKind::Short,
        ToggleVia::MenuPath => true,
    }
}
