//! Plain text rendering for reports.

use super::{Report, ViolationType};
use std::fmt::Write;

const MAX_LISTED_LOCATIONS: usize = 10;

/// Render a report as plain text.
pub fn to_text(report: &Report) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "Document: {}", report.document_path);
    let _ = writeln!(out, "Checked:  {}", report.timestamp.to_rfc3339());
    let _ = writeln!(
        out,
        "Status:   {} (severity {})",
        summary.overall_status, summary.severity
    );
    let _ = writeln!(
        out,
        "Checks:   {}/{} passed ({:.1}%), {} errors, {} warnings",
        summary.passed_checks,
        summary.total_checks,
        summary.success_rate,
        summary.errors,
        summary.warnings
    );
    out.push('\n');

    for check in &report.checks {
        let tag = match (check.passed, check.violation_type) {
            (true, _) => "PASS",
            (false, ViolationType::Warning) => "WARN",
            (false, _) => "FAIL",
        };
        let _ = writeln!(
            out,
            "[{}] {:>2}. {} - {}",
            tag, check.rule_number, check.rule_name, check.message
        );
        for location in check.locations.iter().take(MAX_LISTED_LOCATIONS) {
            let _ = writeln!(out, "         at {}", location);
        }
        if check.locations.len() > MAX_LISTED_LOCATIONS {
            let _ = writeln!(
                out,
                "         ... and {} more",
                check.locations.len() - MAX_LISTED_LOCATIONS
            );
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\nBuilder warnings:\n");
        for warning in &report.warnings {
            let _ = writeln!(out, "  {}", warning);
        }
    }

    out
}
