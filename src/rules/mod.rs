//! Quality-control rules and the engine that runs them.
//!
//! A [`Rule`] is a pure function from a built [`Document`] (and the acronym
//! table) to one or more [`CheckResult`]s. Rules are kept in a
//! [`RuleRegistry`] in registration order and executed by the [`Engine`].
//!
//! # Example
//!
//! ```no_run
//! use docqc::rules::{Engine, RuleRegistry};
//! use docqc::QcConfig;
//!
//! fn main() -> docqc::Result<()> {
//!     let doc = docqc::load_document("report.docx")?;
//!     let registry = RuleRegistry::with_defaults(&QcConfig::default());
//!     let engine = Engine::new(registry);
//!     let report = engine.run(&doc, &docqc::acronym::global(), "report.docx");
//!     println!("{}", report.summary.overall_status);
//!     Ok(())
//! }
//! ```

mod engine;
mod formatting;
mod layout;
mod links;
mod text;

pub use engine::{Engine, EngineOptions};
pub use formatting::{BodyFontSizeRule, FontFamilyRule, HeadingStyleRule, TableFontSizeRule};
pub use layout::{HeaderFooterDistanceRule, MarginsRule, OrientationRule, TableLayoutRule};
pub use links::{ExternalLinksRule, InternalLinksRule, TocLinksRule, TocRule};
pub use text::{AcronymRule, TenseRule};

use crate::acronym::AcronymTable;
use crate::config::QcConfig;
use crate::error::{Error, Result};
use crate::location::{self, Location};
use crate::model::{Coordinate, Document};
use crate::report::CheckResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identity of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId {
    /// Stable number, used for cross-run comparison
    pub number: u32,
    /// Display name
    pub name: String,
}

impl RuleId {
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.name)
    }
}

/// A quality-control rule.
///
/// Implementations must be pure: any state needed while scanning a document
/// lives inside one `evaluate` call. Every evaluation should yield at least
/// one result; the engine records an empty one as a failed check.
pub trait Rule: Send + Sync {
    /// Identity of this rule.
    fn id(&self) -> RuleId;

    /// Evaluate the rule against a document.
    fn evaluate(&self, doc: &Document, acronyms: &AcronymTable) -> Vec<CheckResult>;
}

/// Ordered collection of rules.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the default catalogue (rules 1-14).
    pub fn with_defaults(config: &QcConfig) -> Self {
        let config = Arc::new(config.clone());
        let defaults: Vec<Arc<dyn Rule>> = vec![
            Arc::new(FontFamilyRule::new(config.clone())),
            Arc::new(BodyFontSizeRule::new(config.clone())),
            Arc::new(TableFontSizeRule::new(config.clone())),
            Arc::new(OrientationRule::new(config.clone())),
            Arc::new(MarginsRule::new(config.clone())),
            Arc::new(HeaderFooterDistanceRule::new(config.clone())),
            Arc::new(TocRule::new(config.clone())),
            Arc::new(TocLinksRule::new(config.clone())),
            Arc::new(InternalLinksRule::new(config.clone())),
            Arc::new(ExternalLinksRule::new(config.clone())),
            Arc::new(TenseRule::new(config.clone())),
            Arc::new(AcronymRule::new(config.clone())),
            Arc::new(HeadingStyleRule::new(config.clone())),
            Arc::new(TableLayoutRule::new(config)),
        ];
        Self { rules: defaults }
    }

    /// Register a rule. Fails if another rule already uses its number.
    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<()> {
        let id = rule.id();
        if let Some(existing) = self.rules.iter().find(|r| r.id().number == id.number) {
            return Err(Error::Config(format!(
                "rule number {} already registered by '{}'",
                id.number,
                existing.id().name
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_rule(mut self, rule: Arc<dyn Rule>) -> Result<Self> {
        self.register(rule)?;
        Ok(self)
    }

    /// Identities of the registered rules, in order.
    pub fn ids(&self) -> Vec<RuleId> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Iterate over the rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

/// Resolve coordinates into at most `max` locations.
pub(crate) fn locations<'a>(
    coords: impl IntoIterator<Item = &'a Coordinate>,
    max: usize,
) -> Vec<Location> {
    coords.into_iter().take(max).map(location::resolve).collect()
}
