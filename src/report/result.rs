//! Per-rule results and summary statistics.

use crate::location::Location;
use crate::rules::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity a rule attaches to its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationType {
    Success,
    Error,
    Warning,
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationType::Success => write!(f, "success"),
            ViolationType::Error => write!(f, "error"),
            ViolationType::Warning => write!(f, "warning"),
        }
    }
}

/// Verdict of one rule.
///
/// `violation_type` is declared by the rule independently of `passed`: a
/// failed check may be a warning rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub rule_name: String,
    /// Stable rule identifier
    pub rule_number: u32,
    pub passed: bool,
    /// Human-readable summary
    pub message: String,
    pub violation_type: ViolationType,
    /// Rule-specific payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl CheckResult {
    fn new(rule: &RuleId, passed: bool, violation_type: ViolationType, message: String) -> Self {
        Self {
            rule_name: rule.name.clone(),
            rule_number: rule.number,
            passed,
            message,
            violation_type,
            details: None,
            locations: Vec::new(),
        }
    }

    /// A passing result.
    pub fn success(rule: &RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, true, ViolationType::Success, message.into())
    }

    /// A failing result with error severity.
    pub fn error(rule: &RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, false, ViolationType::Error, message.into())
    }

    /// A failing result with warning severity.
    pub fn warning(rule: &RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, false, ViolationType::Warning, message.into())
    }

    /// Attach a structured payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach locations.
    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    /// Rule identity of this result.
    pub fn rule_id(&self) -> RuleId {
        RuleId::new(self.rule_number, self.rule_name.clone())
    }
}

/// Overall verdict of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Fail,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallStatus::Pass => write!(f, "PASS"),
            OverallStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Highest severity present in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    None,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::None => write!(f, "NONE"),
        }
    }
}

/// Summary statistics over a sequence of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_checks: u32,
    pub passed_checks: u32,
    pub failed_checks: u32,
    /// Results with error severity
    pub errors: u32,
    /// Results with warning severity
    pub warnings: u32,
    /// Percentage of passed checks, one decimal
    pub success_rate: f64,
    pub overall_status: OverallStatus,
    pub severity: Severity,
}

impl Summary {
    /// Aggregate results. The outcome does not depend on their order.
    pub fn from_results(results: &[CheckResult]) -> Self {
        let total = results.len() as u32;
        let passed = results.iter().filter(|r| r.passed).count() as u32;
        let count = |kind: ViolationType| {
            results
                .iter()
                .filter(|r| r.violation_type == kind)
                .count() as u32
        };
        let errors = count(ViolationType::Error);
        let warnings = count(ViolationType::Warning);
        let failed = total - passed;

        // Rounding must never report a perfect rate while a check failed.
        let success_rate = if total == 0 {
            100.0
        } else {
            let rate = (f64::from(passed) / f64::from(total) * 1000.0).round() / 10.0;
            if failed > 0 {
                rate.min(99.9)
            } else {
                rate
            }
        };
        let overall_status = if errors == 0 && failed == 0 {
            OverallStatus::Pass
        } else {
            OverallStatus::Fail
        };
        let severity = if errors > 0 {
            Severity::Error
        } else if warnings > 0 {
            Severity::Warning
        } else {
            Severity::None
        };

        Self {
            total_checks: total,
            passed_checks: passed,
            failed_checks: failed,
            errors,
            warnings,
            success_rate,
            overall_status,
            severity,
        }
    }
}
