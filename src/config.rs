//! Checker configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Font every body and table run is expected to use.
pub const DEFAULT_FONT: &str = "Times New Roman";

/// Words that look like acronyms but are ordinary capitalized words,
/// placeholders or agency names conventionally used without definition.
const DEFAULT_STOP_WORDS: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HAD", "HER", "WAS", "ONE",
    "OUR", "OUT", "DAY", "GET", "HAS", "HIM", "HIS", "HOW", "MAN", "NEW", "NOW", "OLD", "SEE",
    "TWO", "WAY", "WHO", "DID", "ITS", "LET", "PUT", "SAY", "SHE", "TOO", "USE", "YES", "NO",
    "OK", "IT", "OF", "IN", "ON", "AT", "TO", "IS", "AS", "BE", "OR", "IF", "DO", "GO", "SO",
    "UP", "BY", "MY", "ME", "WE", "HE", "US", "AM", "AN", "ETC", "EG", "IE", "VS", "REF", "FIG",
    "TAB", "SEC", "CH", "PAGE", "PAGES", "VOL", "NUM", "LIST", "DEFINITIONS", "CONTENTS", "TOC",
    "INDEX", "OUTLINE", "XXX",
];

/// Where an inline expansion may appear relative to the first use of an
/// acronym.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcronymAdjacency {
    /// Only inside the paragraph of first use
    SameParagraph,
    /// Inside the paragraph of first use, or at the start of the next one
    #[default]
    SameOrNextParagraph,
}

/// Formatting expected of headings at one outline level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingExpectation {
    /// Heading level (1-9)
    pub level: u8,
    /// Required bold state, if any
    #[serde(default)]
    pub bold: Option<bool>,
    /// Minimum font size in points, if any
    #[serde(default)]
    pub min_size: Option<f32>,
    /// Required paragraph style id, if any
    #[serde(default)]
    pub style_id: Option<String>,
}

impl HeadingExpectation {
    /// Bold headings of at least `min_size` points.
    pub fn bold(level: u8, min_size: f32) -> Self {
        Self {
            level,
            bold: Some(true),
            min_size: Some(min_size),
            style_id: None,
        }
    }

    /// Also require the paragraph to carry `style_id`.
    pub fn with_style_id(mut self, style_id: impl Into<String>) -> Self {
        self.style_id = Some(style_id.into());
        self
    }
}

/// Indicator words used by the tense consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenseIndicators {
    pub present: Vec<String>,
    pub past: Vec<String>,
    pub future: Vec<String>,
}

impl Default for TenseIndicators {
    fn default() -> Self {
        Self {
            present: to_strings(&[
                "is", "are", "has", "have", "does", "do", "goes", "go", "runs", "run", "works",
                "work",
            ]),
            past: to_strings(&[
                "was", "were", "had", "did", "went", "came", "made", "ran", "worked",
            ]),
            future: to_strings(&["will", "shall", "going to", "gonna", "about to"]),
        }
    }
}

/// Configuration shared by the default rule catalogue.
///
/// Lengths are in inches and sizes in points.
///
/// # Example
/// ```
/// use docqc::QcConfig;
///
/// let config = QcConfig::new()
///     .with_body_font_size(11.0)
///     .with_max_locations(10);
/// assert_eq!(config.required_font, "Times New Roman");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    /// Font name every run must use
    pub required_font: String,

    /// Additional accepted spellings (compared case-insensitively)
    pub font_variants: Vec<String>,

    /// Size of non-table body text
    pub body_font_size: f32,

    /// Size of table text
    pub table_font_size: f32,

    /// Margin every side should have
    pub required_margin: f64,

    /// Margins below this are errors
    pub min_margin: f64,

    /// Allowed deviation from `required_margin` before warning
    pub margin_tolerance: f64,

    /// Minimum header and footer distance
    pub min_header_footer_distance: f64,

    /// Per-level heading expectations
    pub headings: Vec<HeadingExpectation>,

    /// Require every row of a table to span the same number of grid columns
    pub uniform_table_rows: bool,

    /// Tokens never treated as acronyms
    pub acronym_stop_words: BTreeSet<String>,

    /// Where inline acronym expansions may appear
    pub acronym_adjacency: AcronymAdjacency,

    /// Tense indicator words
    pub tense_indicators: TenseIndicators,

    /// Case-insensitive texts that mark a table of contents
    pub toc_patterns: Vec<String>,

    /// Maximum locations attached to one result
    pub max_locations: usize,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            required_font: DEFAULT_FONT.to_string(),
            font_variants: to_strings(&["times", "timesnewroman", "times new roman,serif"]),
            body_font_size: 12.0,
            table_font_size: 9.0,
            required_margin: 1.0,
            min_margin: 0.75,
            margin_tolerance: 0.01,
            min_header_footer_distance: 0.38,
            headings: vec![
                HeadingExpectation::bold(1, 12.0),
                HeadingExpectation::bold(2, 12.0),
                HeadingExpectation::bold(3, 12.0),
            ],
            uniform_table_rows: true,
            acronym_stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
            acronym_adjacency: AcronymAdjacency::default(),
            tense_indicators: TenseIndicators::default(),
            toc_patterns: to_strings(&["table of contents", "contents"]),
            max_locations: 50,
        }
    }
}

impl QcConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file; missing keys take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from JSON; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: QcConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.required_font.trim().is_empty() {
            return Err(Error::Config("required_font must not be empty".into()));
        }
        if self.body_font_size <= 0.0 || self.table_font_size <= 0.0 {
            return Err(Error::Config("font sizes must be positive".into()));
        }
        if self.min_margin < 0.0 || self.margin_tolerance < 0.0 {
            return Err(Error::Config("margins must not be negative".into()));
        }
        if self.min_margin > self.required_margin {
            return Err(Error::Config(format!(
                "min_margin {} exceeds required_margin {}",
                self.min_margin, self.required_margin
            )));
        }
        if self.max_locations == 0 {
            return Err(Error::Config("max_locations must be at least 1".into()));
        }
        if let Some(h) = self.headings.iter().find(|h| !(1..=9).contains(&h.level)) {
            return Err(Error::Config(format!("invalid heading level {}", h.level)));
        }
        Ok(())
    }

    /// Whether a font name is the required font or an accepted variant.
    pub fn accepts_font(&self, name: &str) -> bool {
        let name = name.trim();
        name.eq_ignore_ascii_case(&self.required_font)
            || self
                .font_variants
                .iter()
                .any(|v| name.eq_ignore_ascii_case(v.trim()))
    }

    /// Expectation for a heading level, if configured.
    pub fn heading(&self, level: u8) -> Option<&HeadingExpectation> {
        self.headings.iter().find(|h| h.level == level)
    }

    /// Set the required font.
    pub fn with_required_font(mut self, font: impl Into<String>) -> Self {
        self.required_font = font.into();
        self
    }

    /// Add an accepted font spelling.
    pub fn with_font_variant(mut self, variant: impl Into<String>) -> Self {
        self.font_variants.push(variant.into());
        self
    }

    /// Set the body text size.
    pub fn with_body_font_size(mut self, size: f32) -> Self {
        self.body_font_size = size;
        self
    }

    /// Set the table text size.
    pub fn with_table_font_size(mut self, size: f32) -> Self {
        self.table_font_size = size;
        self
    }

    /// Set required margin, minimum margin and tolerance.
    pub fn with_margins(mut self, required: f64, minimum: f64, tolerance: f64) -> Self {
        self.required_margin = required;
        self.min_margin = minimum;
        self.margin_tolerance = tolerance;
        self
    }

    /// Set the minimum header/footer distance.
    pub fn with_min_header_footer_distance(mut self, inches: f64) -> Self {
        self.min_header_footer_distance = inches;
        self
    }

    /// Replace the heading expectations.
    pub fn with_headings(mut self, headings: Vec<HeadingExpectation>) -> Self {
        self.headings = headings;
        self
    }

    /// Toggle the uniform row width requirement for tables.
    pub fn with_uniform_table_rows(mut self, uniform: bool) -> Self {
        self.uniform_table_rows = uniform;
        self
    }

    /// Add a token that is never treated as an acronym.
    pub fn with_stop_word(mut self, word: impl Into<String>) -> Self {
        self.acronym_stop_words.insert(word.into());
        self
    }

    /// Set where inline acronym expansions may appear.
    pub fn with_acronym_adjacency(mut self, adjacency: AcronymAdjacency) -> Self {
        self.acronym_adjacency = adjacency;
        self
    }

    /// Replace the tense indicator words.
    pub fn with_tense_indicators(mut self, indicators: TenseIndicators) -> Self {
        self.tense_indicators = indicators;
        self
    }

    /// Replace the TOC text patterns.
    pub fn with_toc_patterns(mut self, patterns: Vec<String>) -> Self {
        self.toc_patterns = patterns;
        self
    }

    /// Set the maximum number of locations per result.
    pub fn with_max_locations(mut self, max: usize) -> Self {
        self.max_locations = max;
        self
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = QcConfig::default();
        assert_eq!(config.body_font_size, 12.0);
        assert_eq!(config.table_font_size, 9.0);
        assert_eq!(config.min_header_footer_distance, 0.38);
        assert_eq!(config.max_locations, 50);
        assert_eq!(config.acronym_adjacency, AcronymAdjacency::SameOrNextParagraph);
        assert!(config.acronym_stop_words.contains("THE"));
        assert!(config.heading(1).is_some());
        assert!(config.heading(4).is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_accepts_font() {
        let config = QcConfig::default();
        assert!(config.accepts_font("Times New Roman"));
        assert!(config.accepts_font("times new roman"));
        assert!(config.accepts_font(" Times "));
        assert!(!config.accepts_font("Arial"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = QcConfig::new()
            .with_required_font("Arial")
            .with_body_font_size(11.0)
            .with_margins(1.25, 1.0, 0.05)
            .with_stop_word("FOO")
            .with_acronym_adjacency(AcronymAdjacency::SameParagraph)
            .with_max_locations(5);
        assert!(config.accepts_font("arial"));
        assert_eq!(config.body_font_size, 11.0);
        assert_eq!(config.required_margin, 1.25);
        assert!(config.acronym_stop_words.contains("FOO"));
        assert_eq!(config.max_locations, 5);
    }

    #[test]
    fn test_from_json_partial() {
        let config = QcConfig::from_json(r#"{"body_font_size": 11, "acronym_adjacency": "same_paragraph"}"#)
            .unwrap();
        assert_eq!(config.body_font_size, 11.0);
        assert_eq!(config.table_font_size, 9.0);
        assert_eq!(config.acronym_adjacency, AcronymAdjacency::SameParagraph);
        assert_eq!(config.heading(1).unwrap().style_id, None);
    }

    #[test]
    fn test_heading_style_id_from_json() {
        let config = QcConfig::from_json(
            r#"{"headings": [{"level": 1, "bold": true, "style_id": "Heading1"}]}"#,
        )
        .unwrap();
        let heading = config.heading(1).unwrap();
        assert_eq!(heading.style_id.as_deref(), Some("Heading1"));
        assert_eq!(heading.min_size, None);
        assert!(config.heading(2).is_none());
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            QcConfig::from_json(r#"{"min_margin": 2.0}"#),
            Err(Error::Config(_))
        ));
        assert!(QcConfig::new().with_max_locations(0).validate().is_err());
        assert!(QcConfig::new().with_body_font_size(0.0).validate().is_err());
        assert!(QcConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"required_font": "Georgia"}}"#).unwrap();
        let config = QcConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.required_font, "Georgia");

        let err = QcConfig::from_json_file("/nonexistent/docqc.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
