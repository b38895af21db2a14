use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use watchlater_core_types::{AttemptOutcome, ErrorKind, Target, TargetScope, ToggleVia};

/// What to do with candidate targets that carry no item identifier.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonActionablePolicy {
    #[default]
    Leave,
    Remove,
}

/// What to do with a target once its toggle is confirmed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessPolicy {
    #[default]
    Keep,
    Remove,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchOptions {
    pub scope: TargetScope,
    pub non_actionable: NonActionablePolicy,
    pub on_success: SuccessPolicy,
}

impl BatchOptions {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active() -> Self {
        Self {
            scope: TargetScope::Active,
            ..Self::default()
        }
    }

    pub fn with_non_actionable(mut self, policy: NonActionablePolicy) -> Self {
        self.non_actionable = policy;
        self
    }

    pub fn with_on_success(mut self, policy: SuccessPolicy) -> Self {
        self.on_success = policy;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailStatus {
    Added,
    ClosedNonActionable,
    SkippedNonActionable,
    Error,
    Cancelled,
}

/// One line of the per-target log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailEntry {
    pub target_id: String,
    pub address: String,
    pub status: DetailStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<ToggleVia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalations: Option<u32>,
    /// Target was closed after a confirmed toggle.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl DetailEntry {
    fn bare(target: &Target, status: DetailStatus) -> Self {
        Self {
            target_id: target.id.to_string(),
            address: target.address.clone(),
            status,
            via: None,
            confirmed: None,
            attempts: None,
            escalations: None,
            closed: false,
            error: None,
            error_kind: None,
        }
    }

    pub fn non_actionable(target: &Target, removed: bool) -> Self {
        let status = if removed {
            DetailStatus::ClosedNonActionable
        } else {
            DetailStatus::SkippedNonActionable
        };
        Self::bare(target, status)
    }

    pub fn removal_failed(target: &Target, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bare(target, DetailStatus::SkippedNonActionable)
        }
    }

    pub fn cancelled(target: &Target) -> Self {
        Self {
            error_kind: Some(ErrorKind::Cancelled),
            ..Self::bare(target, DetailStatus::Cancelled)
        }
    }

    pub fn from_outcome(target: &Target, outcome: &AttemptOutcome) -> Self {
        let status = if outcome.confirmed {
            DetailStatus::Added
        } else {
            DetailStatus::Error
        };
        Self {
            via: outcome.via,
            confirmed: Some(outcome.confirmed),
            attempts: Some(outcome.attempts_used),
            escalations: Some(outcome.escalations),
            error: outcome.error_message(),
            error_kind: outcome.error,
            ..Self::bare(target, status)
        }
    }

    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }
}

/// Aggregated result of one batch run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub candidate_count: usize,
    pub processed_count: usize,
    pub confirmed_count: usize,
    pub removed_count: usize,
    pub closed_on_success_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub details: Vec<DetailEntry>,
}

impl BatchReport {
    pub fn begin(candidate_count: usize) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: now,
            finished_at: now,
            candidate_count,
            processed_count: 0,
            confirmed_count: 0,
            removed_count: 0,
            closed_on_success_count: 0,
            skipped_count: 0,
            error_count: 0,
            details: Vec::new(),
        }
    }

    /// Append a detail and update the counters it implies.
    pub fn record(&mut self, entry: DetailEntry) {
        match entry.status {
            DetailStatus::Added => {
                self.processed_count += 1;
                self.confirmed_count += 1;
                if entry.closed {
                    self.closed_on_success_count += 1;
                }
            }
            DetailStatus::Error => {
                self.processed_count += 1;
                self.error_count += 1;
            }
            DetailStatus::ClosedNonActionable => self.removed_count += 1,
            DetailStatus::SkippedNonActionable | DetailStatus::Cancelled => {
                self.skipped_count += 1
            }
        }
        self.details.push(entry);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Targets closed for any reason.
    pub fn closed(&self) -> usize {
        self.removed_count + self.closed_on_success_count
    }

    pub fn is_consistent(&self) -> bool {
        self.processed_count == self.confirmed_count + self.error_count
            && self.skipped_count + self.removed_count + self.processed_count
                == self.candidate_count
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            processed: self.processed_count,
            success: self.confirmed_count,
            closed: self.closed(),
            skipped: self.skipped_count,
            errors: self.error_count,
            details: self.details.clone(),
            candidate_count: self.candidate_count,
        }
    }
}

/// Wire shape of a batch report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub processed: usize,
    pub success: usize,
    pub closed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub details: Vec<DetailEntry>,
    pub candidate_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlater_core_types::{ItemId, SurfaceKind, TargetId};

    fn target(n: u32) -> Target {
        Target::new(
            TargetId(format!("tab-{n}")),
            format!("https://www.youtube.com/watch?v=v{n}"),
            Some(ItemId(format!("v{n}"))),
            SurfaceKind::Standard,
        )
    }

    #[test]
    fn test_record_keeps_identity() {
        let mut report = BatchReport::begin(5);
        report.record(
            DetailEntry::from_outcome(&target(1), &AttemptOutcome::confirmed(ToggleVia::MenuPath, 2))
                .with_closed(true),
        );
        report.record(DetailEntry::from_outcome(
            &target(2),
            &AttemptOutcome::failed(ErrorKind::Unconfirmed, 7, "re-read unchecked"),
        ));
        report.record(DetailEntry::non_actionable(&target(3), true));
        report.record(DetailEntry::removal_failed(&target(4), "tab locked"));
        report.record(DetailEntry::cancelled(&target(5)));

        assert!(report.is_consistent());
        assert_eq!(report.processed_count, 2);
        assert_eq!(report.skipped_count, 2);
        assert_eq!(report.closed(), 2);
    }

    #[test]
    fn test_summary_wire_shape() {
        let mut report = BatchReport::begin(1);
        report.record(DetailEntry::from_outcome(
            &target(1),
            &AttemptOutcome::failed(ErrorKind::SurfaceUnavailable, 1, "player missing")
                .with_escalations(3),
        ));
        let value = serde_json::to_value(report.summary()).unwrap();

        assert_eq!(value["candidateCount"], 1);
        assert_eq!(value["errors"], 1);
        let detail = &value["details"][0];
        assert_eq!(detail["status"], "error");
        assert_eq!(detail["errorKind"], "surface_unavailable");
        assert_eq!(detail["error"], "surface_unavailable: player missing");
        assert_eq!(detail["escalations"], 3);
        assert!(detail.get("via").is_none());
        assert!(detail.get("closed").is_none());
    }
}
