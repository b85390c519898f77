//! # docqc
//!
//! Quality-control checks for Word (`.docx`) documents.
//!
//! This library opens a WordprocessingML package, builds a read-only
//! document model with fully resolved formatting, and runs a catalogue of
//! rules over it: fonts, sizes, page layout, headings, table of contents,
//! hyperlinks, verb tense and acronym definitions.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docqc::{load_document, run_checks};
//!
//! fn main() -> docqc::Result<()> {
//!     let doc = load_document("report.docx")?;
//!     let report = run_checks(&doc);
//!
//!     println!("{}", docqc::report::to_text(&report));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Resolved formatting**: every run carries its effective font and size
//! - **Stable locations**: findings point at section, block, table cell and run
//! - **Pluggable rules**: register custom [`rules::Rule`] implementations
//! - **Parallel checking**: rules run on Rayon with results in registration order
//! - **Acronym database**: built-in table, replaceable at runtime

pub mod acronym;
pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod location;
pub mod model;
pub mod package;
pub mod report;
pub mod rules;

mod xml;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use acronym::{AcronymEntry, AcronymTable};
pub use builder::{BuildOptions, ErrorMode};
pub use config::{AcronymAdjacency, HeadingExpectation, QcConfig, TenseIndicators};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_package, PackageFormat};
pub use error::{Error, ErrorKind, Result};
pub use location::{ElementType, Location};
pub use model::{
    Block, BuildWarning, Coordinate, Document, DocumentStats, Paragraph, Run, Section, Table,
};
pub use package::Package;
pub use report::{
    CheckResult, JsonFormat, OverallStatus, Report, Severity, Summary, ViolationType,
};
pub use rules::{Engine, EngineOptions, Rule, RuleId, RuleRegistry};

use std::io::Read;
use std::path::Path;

/// Path recorded in reports for documents that did not come from a file.
pub const IN_MEMORY_PATH: &str = "<memory>";

/// Load a `.docx` file and build its document model.
///
/// # Example
///
/// ```no_run
/// use docqc::load_document;
///
/// let doc = load_document("report.docx").unwrap();
/// println!("Sections: {}", doc.sections().len());
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    load_document_with_options(path, &BuildOptions::default())
}

/// Load a `.docx` file with custom build options.
///
/// # Example
///
/// ```no_run
/// use docqc::{load_document_with_options, BuildOptions};
///
/// let options = BuildOptions::new().lenient();
/// let doc = load_document_with_options("report.docx", &options).unwrap();
/// ```
pub fn load_document_with_options<P: AsRef<Path>>(
    path: P,
    options: &BuildOptions,
) -> Result<Document> {
    let path = path.as_ref();
    let package = Package::open(path)?;
    let doc = builder::build(&package, options)?;
    log::info!(
        "loaded {}: {} sections, {} warnings",
        path.display(),
        doc.sections().len(),
        doc.warnings().len()
    );
    Ok(doc)
}

/// Build a document model from package bytes.
pub fn load_bytes(data: &[u8]) -> Result<Document> {
    load_bytes_with_options(data, &BuildOptions::default())
}

/// Build a document model from package bytes with custom options.
pub fn load_bytes_with_options(data: &[u8], options: &BuildOptions) -> Result<Document> {
    let package = Package::from_bytes(data)?;
    builder::build(&package, options)
}

/// Build a document model from a reader.
///
/// # Example
///
/// ```no_run
/// use docqc::load_reader;
/// use std::fs::File;
///
/// let file = File::open("report.docx").unwrap();
/// let doc = load_reader(file).unwrap();
/// ```
pub fn load_reader<R: Read>(reader: R) -> Result<Document> {
    load_reader_with_options(reader, &BuildOptions::default())
}

/// Build a document model from a reader with custom options.
pub fn load_reader_with_options<R: Read>(reader: R, options: &BuildOptions) -> Result<Document> {
    let package = Package::from_reader(reader)?;
    builder::build(&package, options)
}

/// Load a `.docx` file without blocking the async runtime on file I/O.
#[cfg(feature = "async")]
pub async fn load_document_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = tokio::fs::read(path.as_ref()).await?;
    load_bytes(&data)
}

/// Run the default rule catalogue against a built document.
///
/// Uses the default [`QcConfig`] and the process-wide acronym table.
/// Never fails: a rule that panics is reported as a failed check.
pub fn run_checks(doc: &Document) -> Report {
    let engine = Engine::new(RuleRegistry::with_defaults(&QcConfig::default()));
    engine.run(doc, &acronym::global(), IN_MEMORY_PATH)
}

/// Builder for loading and checking documents.
///
/// # Example
///
/// ```no_run
/// use docqc::{DocQc, QcConfig};
///
/// let report = DocQc::new()
///     .lenient()
///     .sequential()
///     .with_config(QcConfig::new().with_body_font_size(11.0))
///     .check("report.docx")?;
/// println!("{}", report.summary.overall_status);
/// # Ok::<(), docqc::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocQc {
    build_options: BuildOptions,
    engine_options: EngineOptions,
    config: QcConfig,
    acronyms: Option<AcronymTable>,
}

impl DocQc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downgrade recoverable document problems to build warnings.
    pub fn lenient(mut self) -> Self {
        self.build_options = self.build_options.lenient();
        self
    }

    /// Run rules one after another instead of in parallel.
    pub fn sequential(mut self) -> Self {
        self.engine_options = self.engine_options.sequential();
        self
    }

    /// Use a custom checker configuration.
    pub fn with_config(mut self, config: QcConfig) -> Self {
        self.config = config;
        self
    }

    /// Set build options.
    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// Check against this acronym table instead of the process-wide one.
    pub fn with_acronyms(mut self, table: AcronymTable) -> Self {
        self.acronyms = Some(table);
        self
    }

    /// Engine configured with the default catalogue for this builder's config.
    pub fn engine(&self) -> Engine {
        Engine::new(RuleRegistry::with_defaults(&self.config))
            .with_options(self.engine_options.clone())
    }

    /// Load and check a `.docx` file.
    pub fn check<P: AsRef<Path>>(&self, path: P) -> Result<Report> {
        let path = path.as_ref();
        let doc = load_document_with_options(path, &self.build_options)?;
        Ok(self.check_document(&doc, &path.display().to_string()))
    }

    /// Load and check package bytes.
    pub fn check_bytes(&self, data: &[u8]) -> Result<Report> {
        let doc = load_bytes_with_options(data, &self.build_options)?;
        Ok(self.check_document(&doc, IN_MEMORY_PATH))
    }

    /// Check an already built document.
    pub fn check_document(&self, doc: &Document, document_path: &str) -> Report {
        let engine = self.engine();
        match &self.acronyms {
            Some(table) => engine.run(doc, table, document_path),
            None => engine.run(doc, &acronym::global(), document_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{docx, document_xml, para, sect_pr, styles_xml};

    fn sample() -> Vec<u8> {
        let body = format!(
            "{}{}",
            para("Plain body text."),
            sect_pr(12240, 15840, 1440, 720)
        );
        docx(&[
            ("word/document.xml", document_xml(&body)),
            ("word/styles.xml", styles_xml()),
        ])
    }

    #[test]
    fn test_load_bytes() {
        let doc = load_bytes(&sample()).unwrap();
        assert_eq!(doc.sections().len(), 1);
        assert_eq!(doc.plain_text().trim(), "Plain body text.");
    }

    #[test]
    fn test_load_bytes_rejects_non_package() {
        let err = load_bytes(b"<!DOCTYPE html><html></html>").unwrap_err();
        assert!(matches!(err, Error::NotAPackage));
        assert_eq!(err.kind(), ErrorKind::Package);

        let err = load_bytes(&[]).unwrap_err();
        assert!(matches!(err, Error::NotAPackage));
    }

    #[test]
    fn test_load_reader() {
        let doc = load_reader(std::io::Cursor::new(sample())).unwrap();
        assert_eq!(doc.paragraphs().count(), 1);
    }

    #[test]
    fn test_run_checks_covers_catalogue() {
        let doc = load_bytes(&sample()).unwrap();
        let report = run_checks(&doc);
        assert_eq!(report.document_path, IN_MEMORY_PATH);
        let numbers: Vec<u32> = report.checks.iter().map(|c| c.rule_number).collect();
        assert_eq!(numbers, (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_docqc_builder() {
        let qc = DocQc::new().lenient().sequential();
        assert_eq!(qc.build_options.error_mode, ErrorMode::Lenient);
        assert!(!qc.engine_options.parallel);
        assert_eq!(qc.engine().registry().len(), 14);
    }

    #[test]
    fn test_docqc_check_bytes_with_config() {
        let strict = QcConfig::new().with_body_font_size(11.0);
        let report = DocQc::new()
            .with_config(strict)
            .with_acronyms(AcronymTable::new())
            .check_bytes(&sample())
            .unwrap();
        let body_size = report.results_for(2).next().unwrap();
        assert!(!body_size.passed);
        assert_eq!(report.summary.overall_status, OverallStatus::Fail);
    }

    #[test]
    fn test_docqc_check_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.docx");
        std::fs::write(&path, sample()).unwrap();

        let report = DocQc::new().check(&path).unwrap();
        assert_eq!(report.document_path, path.display().to_string());
        assert_eq!(report.checks.len(), 14);
    }
}
