//! Core types for the toggle gate

use action_locator::OpenOutcome;
use watchlater_core_types::{AttemptOutcome, ErrorKind, ToggleVia};

/// Label of the toggle control inside the save dialog.
pub const DEFAULT_OPTION_LABEL: &str = "watch later";

/// Result of one pass of the attempt loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyPass {
    /// Terminal for this target
    Finished(AttemptOutcome),

    /// The surface region is missing; only a refresh can help
    SurfaceMissing {
        /// The structurally-absent open result
        outcome: OpenOutcome,
        /// Attempts spent in this pass, including the one that hit the gap
        attempts_used: u32,
        /// Last path that produced a surface in this pass, if any
        via: Option<ToggleVia>,
    },
}

impl VerifyPass {
    /// Collapse into an outcome, treating a missing surface as terminal.
    pub fn into_outcome(self) -> AttemptOutcome {
        match self {
            VerifyPass::Finished(outcome) => outcome,
            VerifyPass::SurfaceMissing {
                outcome,
                attempts_used,
                via,
            } => AttemptOutcome::failed(
                ErrorKind::SurfaceUnavailable,
                attempts_used,
                outcome.reason().unwrap_or("surface region missing"),
            )
            .with_via(via),
        }
    }
}

/// What one attempt ended in.
#[derive(Debug, Clone)]
pub(crate) enum AttemptStep {
    Confirmed(ToggleVia),
    Retry {
        kind: ErrorKind,
        reason: String,
        via: Option<ToggleVia>,
    },
    Structural {
        outcome: OpenOutcome,
        via: Option<ToggleVia>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_missing_collapses_to_unavailable() {
        let pass = VerifyPass::SurfaceMissing {
            outcome: OpenOutcome::structural("player overlay missing"),
            attempts_used: 1,
            via: None,
        };
        let outcome = pass.into_outcome();
        assert!(!outcome.confirmed);
        assert_eq!(outcome.error, Some(ErrorKind::SurfaceUnavailable));
        assert_eq!(outcome.detail.as_deref(), Some("player overlay missing"));
    }
}
