//! Post-run triage of issue records.

use qm_core::{FindingKind, IssueRecord};
use serde::Serialize;

use crate::analyzer::AnalysisReport;

/// Finding counts across the records under review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub records: usize,
    pub findings: usize,
    pub watermarks: usize,
    pub vendor_info: usize,
    pub phone_numbers: usize,
    pub other: usize,
    /// Findings on records marked resolved.
    pub resolved: usize,
}

/// The issue records from a run, open for resolve/ignore decisions.
#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    records: Vec<IssueRecord>,
}

impl ReviewStore {
    #[must_use]
    pub fn new(records: Vec<IssueRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[IssueRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IssueRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Flips the resolved flag on record `id` and returns the new value.
    pub fn toggle_resolved(&mut self, id: &str) -> Option<bool> {
        let record = self.records.iter_mut().find(|r| r.id == id)?;
        record.resolved = !record.resolved;
        tracing::debug!(issue_id = %id, resolved = record.resolved, "issue resolution toggled");
        Some(record.resolved)
    }

    /// Drops record `id` from review and returns it.
    pub fn ignore(&mut self, id: &str) -> Option<IssueRecord> {
        let position = self.records.iter().position(|r| r.id == id)?;
        tracing::debug!(issue_id = %id, "issue ignored");
        Some(self.records.remove(position))
    }

    /// Records carrying at least one finding of `kind`, in store order.
    #[must_use]
    pub fn filter_by_kind(&self, kind: FindingKind) -> Vec<&IssueRecord> {
        self.records.iter().filter(|r| r.has_kind(kind)).collect()
    }

    #[must_use]
    pub fn summary(&self) -> IssueSummary {
        let mut summary = IssueSummary {
            records: self.records.len(),
            ..IssueSummary::default()
        };
        for record in &self.records {
            summary.findings += record.findings.len();
            summary.watermarks += record.count_of(FindingKind::Watermark);
            summary.vendor_info += record.count_of(FindingKind::VendorInfo);
            summary.phone_numbers += record.count_of(FindingKind::PhoneNumber);
            summary.other += record.count_of(FindingKind::Other);
            if record.resolved {
                summary.resolved += record.findings.len();
            }
        }
        summary
    }

    #[must_use]
    pub fn into_records(self) -> Vec<IssueRecord> {
        self.records
    }
}

impl From<AnalysisReport> for ReviewStore {
    fn from(report: AnalysisReport) -> Self {
        Self::new(report.issues)
    }
}
