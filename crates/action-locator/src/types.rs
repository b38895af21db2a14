//! Core types for surface location

use serde::{Deserialize, Serialize};
use watchlater_core_types::ToggleVia;

/// Handle to an opened action surface (the save dialog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    /// Collaborator-side reference to the surface
    pub surface_id: String,

    /// Path that produced this surface
    pub via: ToggleVia,
}

impl SurfaceHandle {
    pub fn new(surface_id: impl Into<String>, via: ToggleVia) -> Self {
        Self {
            surface_id: surface_id.into(),
            via,
        }
    }
}

/// Handle to a toggle control inside an opened surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionHandle {
    /// Collaborator-side reference to the control
    pub option_id: String,

    /// Visible label the control matched on
    pub label: String,
}

impl OptionHandle {
    pub fn new(option_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            option_id: option_id.into(),
            label: label.into(),
        }
    }
}

/// Three-valued result of asking for the action surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OpenOutcome {
    /// Surface is open and usable
    Opened { surface: SurfaceHandle },

    /// Surface not rendered yet; worth retrying shortly
    TransientAbsent { reason: String },

    /// The region that hosts the surface is missing entirely
    StructurallyAbsent { reason: String },
}

impl OpenOutcome {
    pub fn transient(reason: impl Into<String>) -> Self {
        OpenOutcome::TransientAbsent {
            reason: reason.into(),
        }
    }

    pub fn structural(reason: impl Into<String>) -> Self {
        OpenOutcome::StructurallyAbsent {
            reason: reason.into(),
        }
    }

    pub fn is_opened(&self) -> bool {
        matches!(self, OpenOutcome::Opened { .. })
    }

    pub fn is_structurally_absent(&self) -> bool {
        matches!(self, OpenOutcome::StructurallyAbsent { .. })
    }

    /// Reason text for the two absent variants.
    pub fn reason(&self) -> Option<&str> {
        match self {
            OpenOutcome::Opened { .. } => None,
            OpenOutcome::TransientAbsent { reason } | OpenOutcome::StructurallyAbsent { reason } => {
                Some(reason.as_str())
            }
        }
    }
}

/// Case-insensitive label match used to pick the toggle control.
pub fn label_matches(text: &str, label: &str) -> bool {
    text.trim()
        .to_lowercase()
        .contains(&label.trim().to_lowercase())
}
