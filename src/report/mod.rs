//! Aggregated check reports and their renderings.

mod json;
mod result;
mod text;

pub use json::{to_json, JsonFormat};
pub use result::{CheckResult, OverallStatus, Severity, Summary, ViolationType};
pub use text::to_text;

use crate::model::BuildWarning;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one check invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Path or label of the checked document
    pub document_path: String,

    /// When the report was produced (RFC 3339 when serialized)
    pub timestamp: DateTime<Utc>,

    pub summary: Summary,

    /// Results in rule registration order
    pub checks: Vec<CheckResult>,

    /// Diagnostics recorded while building the document
    #[serde(default)]
    pub warnings: Vec<BuildWarning>,
}

impl Report {
    /// Aggregate results into a report stamped with the current time.
    pub fn new(
        document_path: impl Into<String>,
        checks: Vec<CheckResult>,
        warnings: Vec<BuildWarning>,
    ) -> Self {
        Self::with_timestamp(document_path, Utc::now(), checks, warnings)
    }

    /// Aggregate results with an explicit timestamp.
    pub fn with_timestamp(
        document_path: impl Into<String>,
        timestamp: DateTime<Utc>,
        checks: Vec<CheckResult>,
        warnings: Vec<BuildWarning>,
    ) -> Self {
        let summary = Summary::from_results(&checks);
        Self {
            document_path: document_path.into(),
            timestamp,
            summary,
            checks,
            warnings,
        }
    }

    /// Whether the document passed every check.
    pub fn passed(&self) -> bool {
        self.summary.overall_status == OverallStatus::Pass
    }

    /// Results for one rule number.
    pub fn results_for(&self, rule_number: u32) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(move |c| c.rule_number == rule_number)
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }
}
