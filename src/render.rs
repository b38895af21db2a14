//! Human-readable report lines

use watchlater_scheduler::{BatchReport, BatchSummary, DetailEntry, DetailStatus};

pub fn render_detail(entry: &DetailEntry) -> String {
    match entry.status {
        DetailStatus::Added => {
            let mut line = match entry.via {
                Some(via) => format!("✔ Added: {} (via {})", entry.address, via),
                None => format!("✔ Added: {}", entry.address),
            };
            if entry.closed {
                line.push_str(" [closed]");
            }
            line
        }
        DetailStatus::ClosedNonActionable => {
            format!("• Closed non-actionable: {}", entry.address)
        }
        DetailStatus::SkippedNonActionable => match &entry.error {
            Some(error) => format!("• Skipped non-actionable: {} — {}", entry.address, error),
            None => format!("• Skipped non-actionable: {}", entry.address),
        },
        DetailStatus::Cancelled => format!("• Skipped: {} — cancelled", entry.address),
        DetailStatus::Error => format!(
            "✖ Error: {} — {}",
            entry.address,
            entry.error.as_deref().unwrap_or("unknown")
        ),
    }
}

pub fn render_summary(summary: &BatchSummary) -> String {
    format!(
        "Processed {} (added {}, closed {}, skipped {}, errors {}). Found {} candidate target(s).",
        summary.processed,
        summary.success,
        summary.closed,
        summary.skipped,
        summary.errors,
        summary.candidate_count
    )
}

/// Detail lines followed by the summary line.
pub fn render_report(report: &BatchReport) -> String {
    let summary = report.summary();
    let mut lines: Vec<String> = summary.details.iter().map(render_detail).collect();
    lines.push(render_summary(&summary));
    lines.join("\n")
}
