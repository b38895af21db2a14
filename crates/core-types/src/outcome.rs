use std::fmt;

/// Path through which the action surface was reached.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToggleVia {
    /// Dedicated save control next to the item.
    PrimaryPath,
    /// Save entry inside an overflow menu.
    MenuPath,
    /// Save action rendered directly on a compact (short-form) layout.
    DirectPath,
}

impl ToggleVia {
    pub fn name(&self) -> &'static str {
        match self {
            ToggleVia::PrimaryPath => "primary",
            ToggleVia::MenuPath => "menu",
            ToggleVia::DirectPath => "direct",
        }
    }

    /// All paths in the order they are tried.
    pub fn fallback_chain() -> [ToggleVia; 3] {
        [
            ToggleVia::PrimaryPath,
            ToggleVia::DirectPath,
            ToggleVia::MenuPath,
        ]
    }
}

impl fmt::Display for ToggleVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of everything that can go wrong for one target.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// No identifier resolvable. A classification, not a failure.
    NotActionable,
    /// Surface not rendered yet. Retried locally, never surfaced.
    TransientAbsent,
    /// Surface region missing. Escalated; surfaced as `SurfaceUnavailable`.
    StructurallyAbsent,
    /// Toggle control missing from an opened surface.
    OptionNotFound,
    /// Attempts exhausted without the re-read state matching.
    Unconfirmed,
    /// Escalation budget exhausted while the surface region stayed missing.
    SurfaceUnavailable,
    /// Unexpected collaborator fault.
    UnknownException,
    /// Cancellation token fired before the target finished.
    Cancelled,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::NotActionable => "not_actionable",
            ErrorKind::TransientAbsent => "transient_absent",
            ErrorKind::StructurallyAbsent => "structurally_absent",
            ErrorKind::OptionNotFound => "option_not_found",
            ErrorKind::Unconfirmed => "unconfirmed",
            ErrorKind::SurfaceUnavailable => "surface_unavailable",
            ErrorKind::UnknownException => "unknown_exception",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of driving one target through the verified toggle.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttemptOutcome {
    pub confirmed: bool,
    /// Unset when no surface was ever obtained.
    pub via: Option<ToggleVia>,
    pub attempts_used: u32,
    pub escalations: u32,
    pub error: Option<ErrorKind>,
    pub detail: Option<String>,
}

impl AttemptOutcome {
    pub fn confirmed(via: ToggleVia, attempts_used: u32) -> Self {
        Self {
            confirmed: true,
            via: Some(via),
            attempts_used,
            escalations: 0,
            error: None,
            detail: None,
        }
    }

    pub fn failed(kind: ErrorKind, attempts_used: u32, detail: impl Into<String>) -> Self {
        Self {
            confirmed: false,
            via: None,
            attempts_used,
            escalations: 0,
            error: Some(kind),
            detail: Some(detail.into()),
        }
    }

    pub fn with_via(mut self, via: Option<ToggleVia>) -> Self {
        if via.is_some() {
            self.via = via;
        }
        self
    }

    pub fn with_escalations(mut self, escalations: u32) -> Self {
        self.escalations = escalations;
        self
    }

    /// Human-readable error line for reports.
    pub fn error_message(&self) -> Option<String> {
        let kind = self.error?;
        Some(match &self.detail {
            Some(detail) => format!("{}: {}", kind, detail),
            None => kind.to_string(),
        })
    }
}
