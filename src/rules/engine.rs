//! Rule execution.

use super::{Rule, RuleRegistry};
use crate::acronym::AcronymTable;
use crate::model::Document;
use crate::report::{CheckResult, Report};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Options for rule execution.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Whether to evaluate rules in parallel
    pub parallel: bool,
}

impl EngineOptions {
    /// Create new engine options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Runs every registered rule against one document.
///
/// A rule that panics is isolated: its fault becomes a single failed
/// result carrying the rule's identity, and the remaining rules still run.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: RuleRegistry,
    options: EngineOptions,
}

impl Engine {
    /// Create an engine over a registry.
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            options: EngineOptions::default(),
        }
    }

    /// Set execution options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// The registered rules.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluate all rules; results are in registration order.
    pub fn evaluate(&self, doc: &Document, acronyms: &AcronymTable) -> Vec<CheckResult> {
        let per_rule: Vec<Vec<CheckResult>> = if self.options.parallel {
            // Indexed collect keeps registration order.
            self.registry
                .rules
                .par_iter()
                .map(|rule| run_rule(rule.as_ref(), doc, acronyms))
                .collect()
        } else {
            self.registry
                .rules
                .iter()
                .map(|rule| run_rule(rule.as_ref(), doc, acronyms))
                .collect()
        };
        per_rule.into_iter().flatten().collect()
    }

    /// Evaluate all rules and aggregate them into a report.
    pub fn run(&self, doc: &Document, acronyms: &AcronymTable, document_path: &str) -> Report {
        let start = Instant::now();
        let checks = self.evaluate(doc, acronyms);
        let report = Report::new(document_path, checks, doc.warnings().to_vec());
        log::info!(
            "{}: {}/{} checks passed, status {} (severity {}) in {:?}",
            document_path,
            report.summary.passed_checks,
            report.summary.total_checks,
            report.summary.overall_status,
            report.summary.severity,
            start.elapsed()
        );
        report
    }
}

fn run_rule(rule: &dyn Rule, doc: &Document, acronyms: &AcronymTable) -> Vec<CheckResult> {
    let id = rule.id();
    let start = Instant::now();
    match panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(doc, acronyms))) {
        Ok(results) if results.is_empty() => {
            log::error!("rule {} produced no result", id);
            vec![CheckResult::error(&id, "Check produced no result")]
        }
        Ok(results) => {
            log::debug!("rule {} produced {} results in {:?}", id, results.len(), start.elapsed());
            results
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("rule {} failed: {}", id, message);
            vec![CheckResult::error(
                &id,
                format!("Check failed with error: {}", message),
            )]
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{OverallStatus, ViolationType};
    use crate::rules::RuleId;
    use std::sync::Arc;

    struct Fixed(u32, bool);

    impl Rule for Fixed {
        fn id(&self) -> RuleId {
            RuleId::new(self.0, format!("Fixed {}", self.0))
        }

        fn evaluate(&self, _doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
            if self.1 {
                vec![CheckResult::success(&self.id(), "ok")]
            } else {
                Vec::new()
            }
        }
    }

    struct Panics;

    impl Rule for Panics {
        fn id(&self) -> RuleId {
            RuleId::new(99, "Panicking Check")
        }

        fn evaluate(&self, _doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
            panic!("index out of range")
        }
    }

    fn registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for n in 1..=8 {
            registry.register(Arc::new(Fixed(n, true))).unwrap();
        }
        registry.register(Arc::new(Panics)).unwrap();
        registry.register(Arc::new(Fixed(20, false))).unwrap();
        registry.register(Arc::new(Fixed(21, true))).unwrap();
        registry
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let doc = crate::testing::empty_document();
        let results = Engine::new(registry())
            .with_options(EngineOptions::new().sequential())
            .evaluate(&doc, &AcronymTable::new());

        assert_eq!(results.len(), 11);
        let fault = &results[8];
        assert_eq!(fault.rule_number, 99);
        assert_eq!(fault.rule_name, "Panicking Check");
        assert!(!fault.passed);
        assert_eq!(fault.violation_type, ViolationType::Error);
        assert!(fault.message.contains("index out of range"));
        assert_eq!(results[10].rule_number, 21);
    }

    #[test]
    fn test_silent_rule_reports_error() {
        let doc = crate::testing::empty_document();
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(Fixed(20, false))).unwrap();
        let report = Engine::new(registry).run(&doc, &AcronymTable::new(), "empty.docx");

        assert_eq!(report.summary.total_checks, 1);
        let check = &report.checks[0];
        assert_eq!(check.rule_number, 20);
        assert_eq!(check.violation_type, ViolationType::Error);
        assert_eq!(check.message, "Check produced no result");
        assert_eq!(report.summary.overall_status, OverallStatus::Fail);
    }

    #[test]
    fn test_parallel_keeps_registration_order() {
        let doc = crate::testing::empty_document();
        let acronyms = AcronymTable::new();
        let sequential = Engine::new(registry())
            .with_options(EngineOptions::new().sequential())
            .evaluate(&doc, &acronyms);
        let parallel = Engine::new(registry()).evaluate(&doc, &acronyms);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_run_builds_report() {
        let doc = crate::testing::empty_document();
        let mut registry = RuleRegistry::new();
        registry.register(Arc::new(Fixed(1, true))).unwrap();
        let report = Engine::new(registry).run(&doc, &AcronymTable::new(), "empty.docx");
        assert_eq!(report.document_path, "empty.docx");
        assert_eq!(report.summary.overall_status, OverallStatus::Pass);
    }
}
