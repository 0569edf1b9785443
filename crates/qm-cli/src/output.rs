//! Plain-text rendering for the `analyze` command.

use qm_core::IssueRecord;
use qm_pipeline::IssueSummary;

pub(crate) fn format_progress(processed: usize, total: usize) -> String {
    format!("{processed} of {total} images processed")
}

pub(crate) fn format_issue(issue: &IssueRecord) -> String {
    let mut out = format!("[{}] {}", issue.id, issue.product_name);
    if issue.resolved {
        out.push_str(" (resolved)");
    }
    for finding in &issue.findings {
        out.push_str(&format!("\n  - {}: {}", finding.kind, finding.message));
        if let Some(matched) = &finding.matched_text {
            out.push_str(&format!(" ({matched})"));
        }
    }
    out
}

pub(crate) fn format_summary(summary: &IssueSummary) -> String {
    if summary.records == 0 {
        return "no issues found".to_string();
    }
    format!(
        "{} issues across {} products: {} watermarks, {} vendor info, {} phone numbers, {} other",
        summary.findings,
        summary.records,
        summary.watermarks,
        summary.vendor_info,
        summary.phone_numbers,
        summary.other
    )
}

#[cfg(test)]
mod tests {
    use qm_core::{Finding, FindingKind, ProductRecord};

    use super::*;

    #[test]
    fn progress_line_counts_images() {
        assert_eq!(format_progress(3, 10), "3 of 10 images processed");
    }

    #[test]
    fn issue_lists_each_finding_with_match() {
        let issue = IssueRecord::open(
            &ProductRecord::new("p1", "Oak Chair"),
            vec![
                Finding::new(FindingKind::PhoneNumber, "Description contains phone number: 555-123-4567")
                    .with_matched_text("555-123-4567"),
                Finding::new(FindingKind::Watermark, "Potential watermark detected in product image"),
            ],
        );

        assert_eq!(
            format_issue(&issue),
            "[p1] Oak Chair\n  \
             - phone_number: Description contains phone number: 555-123-4567 (555-123-4567)\n  \
             - watermark: Potential watermark detected in product image"
        );
    }

    #[test]
    fn summary_reports_breakdown() {
        let summary = IssueSummary {
            records: 2,
            findings: 3,
            watermarks: 1,
            vendor_info: 1,
            phone_numbers: 1,
            other: 0,
            resolved: 0,
        };
        assert_eq!(
            format_summary(&summary),
            "3 issues across 2 products: 1 watermarks, 1 vendor info, 1 phone numbers, 0 other"
        );
    }

    #[test]
    fn empty_summary_says_so() {
        assert_eq!(format_summary(&IssueSummary::default()), "no issues found");
    }
}
