use qm_core::IssueRecord;
use serde::Serialize;

/// How a single image check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOutcome {
    Flagged,
    Clean,
    /// The check itself failed (network, timeout, bad reply). Treated as no finding.
    Failed,
}

/// Incremental update emitted while an analysis is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalysisEvent {
    /// A record was created or gained a finding. Carries the full record.
    IssueUpdated(IssueRecord),
    /// One image check completed. `processed` runs 1..=`total` in order.
    ImageProgress {
        processed: usize,
        total: usize,
        product_id: String,
        outcome: ImageOutcome,
    },
}
