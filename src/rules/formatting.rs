//! Run formatting rules: font family, font sizes, heading style.

use super::{locations, Rule, RuleId};
use crate::acronym::AcronymTable;
use crate::config::QcConfig;
use crate::model::{Coordinate, Document, Paragraph, Run};
use crate::report::CheckResult;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

const SIZE_EPSILON: f32 = 0.01;

fn word_count(run: &Run) -> usize {
    run.text.split_whitespace().count()
}

fn size_matches(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < SIZE_EPSILON
}

/// Offending runs gathered by a formatting scan.
#[derive(Default)]
struct Offenders<'d> {
    coords: Vec<&'d Coordinate>,
    words: usize,
    /// value -> words using it
    values: BTreeMap<String, usize>,
}

impl<'d> Offenders<'d> {
    fn add(&mut self, run: &'d Run, value: String) {
        let words = word_count(run);
        self.coords.push(&run.coord);
        self.words += words;
        *self.values.entry(value).or_default() += words;
    }
}

/// Rule 1: every body and table run uses the required font.
///
/// Whitespace-only runs carry no words and are not checked.
pub struct FontFamilyRule {
    config: Arc<QcConfig>,
}

impl FontFamilyRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for FontFamilyRule {
    fn id(&self) -> RuleId {
        RuleId::new(1, "Font Family Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let font = &self.config.required_font;
        let mut offenders = Offenders::default();
        let mut checked = 0;

        for run in doc.all_paragraphs().flat_map(|p| p.text_runs()) {
            checked += word_count(run);
            if !self.config.accepts_font(&run.format.font_name) {
                offenders.add(run, run.format.font_name.clone());
            }
        }

        if offenders.coords.is_empty() {
            return vec![CheckResult::success(&id, format!("All words use {} font", font))
                .with_details(json!({ "words_checked": checked }))];
        }
        vec![CheckResult::error(
            &id,
            format!("Found {} words not using {}", offenders.words, font),
        )
        .with_details(json!({
            "fonts": offenders.values,
            "runs": offenders.coords.len(),
        }))
        .with_locations(locations(offenders.coords, self.config.max_locations))]
    }
}

/// Rule 2: non-table body text uses the body size.
///
/// Headings are left to [`HeadingStyleRule`].
pub struct BodyFontSizeRule {
    config: Arc<QcConfig>,
}

impl BodyFontSizeRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for BodyFontSizeRule {
    fn id(&self) -> RuleId {
        RuleId::new(2, "Normal Text Font Size Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let paragraphs = doc.paragraphs().filter(|p| !p.is_heading());
        check_sizes(
            &self.id(),
            paragraphs,
            self.config.body_font_size,
            "",
            &self.config,
        )
    }
}

/// Rule 3: table text uses the table size.
pub struct TableFontSizeRule {
    config: Arc<QcConfig>,
}

impl TableFontSizeRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for TableFontSizeRule {
    fn id(&self) -> RuleId {
        RuleId::new(3, "Table Font Size Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let paragraphs = doc.tables().flat_map(|t| t.paragraphs());
        check_sizes(
            &self.id(),
            paragraphs,
            self.config.table_font_size,
            "table ",
            &self.config,
        )
    }
}

fn check_sizes<'d>(
    id: &RuleId,
    paragraphs: impl Iterator<Item = &'d Paragraph>,
    expected: f32,
    label: &str,
    config: &QcConfig,
) -> Vec<CheckResult> {
    let mut offenders = Offenders::default();
    let mut checked = 0;

    for run in paragraphs.flat_map(|p| p.text_runs()) {
        checked += word_count(run);
        if !size_matches(run.format.font_size, expected) {
            offenders.add(run, format!("{}pt", run.format.font_size));
        }
    }

    if offenders.coords.is_empty() {
        let message = if label.is_empty() {
            format!("All normal text uses {}pt font size", expected)
        } else {
            format!("All {}text uses {}pt font size", label, expected)
        };
        return vec![CheckResult::success(id, message).with_details(json!({ "words_checked": checked }))];
    }
    vec![CheckResult::error(
        id,
        format!(
            "Found {} {}words not using {}pt",
            offenders.words, label, expected
        ),
    )
    .with_details(json!({
        "sizes": offenders.values,
        "runs": offenders.coords.len(),
    }))
    .with_locations(locations(offenders.coords, config.max_locations))]
}

/// Rule 13: headings match the configured style, bold state and minimum size.
pub struct HeadingStyleRule {
    config: Arc<QcConfig>,
}

impl HeadingStyleRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }

    fn problems(&self, paragraph: &Paragraph, level: u8) -> Vec<String> {
        let Some(expected) = self.config.heading(level) else {
            return Vec::new();
        };
        let mut problems = Vec::new();
        let runs: Vec<&Run> = paragraph.text_runs().collect();

        if let Some(ref style_id) = expected.style_id {
            let actual = paragraph.format.style_id.as_deref();
            if actual != Some(style_id.as_str()) {
                problems.push(format!(
                    "style {} instead of {}",
                    actual.unwrap_or("(none)"),
                    style_id
                ));
            }
        }

        if let Some(bold) = expected.bold {
            if runs.iter().any(|r| r.format.bold != bold) {
                problems.push(if bold {
                    "not bold".to_string()
                } else {
                    "unexpectedly bold".to_string()
                });
            }
        }
        if let Some(min) = expected.min_size {
            if let Some(size) = runs
                .iter()
                .map(|r| r.format.font_size)
                .find(|&s| s + SIZE_EPSILON < min)
            {
                problems.push(format!("{}pt is below {}pt", size, min));
            }
        }
        problems
    }
}

impl Rule for HeadingStyleRule {
    fn id(&self) -> RuleId {
        RuleId::new(13, "Heading Style Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let mut checked = 0;
        let mut coords = Vec::new();
        let mut details = Vec::new();

        for paragraph in doc.paragraphs() {
            let Some(level) = paragraph.heading_level() else {
                continue;
            };
            checked += 1;
            let problems = self.problems(paragraph, level);
            if !problems.is_empty() {
                coords.push(&paragraph.coord);
                details.push(json!({
                    "text": paragraph.plain_text().trim(),
                    "level": level,
                    "problems": problems,
                }));
            }
        }

        if coords.is_empty() {
            let message = if checked == 0 {
                "No headings found".to_string()
            } else {
                format!("All {} headings match the expected style", checked)
            };
            return vec![CheckResult::success(&id, message)];
        }
        vec![CheckResult::error(
            &id,
            format!("Found {} headings not matching the expected style", coords.len()),
        )
        .with_details(json!({ "headings": details }))
        .with_locations(locations(coords, self.config.max_locations))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeadingExpectation;
    use crate::location::ElementType;
    use crate::report::ViolationType;
    use crate::testing::{document, para, styled_para, table};

    fn config() -> Arc<QcConfig> {
        Arc::new(QcConfig::default())
    }

    fn run_rule(rule: &dyn Rule, body: &str) -> CheckResult {
        let doc = document(body);
        let mut results = rule.evaluate(&doc, &AcronymTable::new());
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    #[test]
    fn test_uniform_font_passes() {
        let body = format!("{}{}", para("First paragraph."), para("Second one."));
        let result = run_rule(&FontFamilyRule::new(config()), &body);
        assert!(result.passed);
        assert_eq!(result.message, "All words use Times New Roman font");
        assert_eq!(result.details.unwrap()["words_checked"], 4);
    }

    #[test]
    fn test_offending_font_reported_per_run() {
        let body = format!(
            r#"{}<w:p><w:r><w:t xml:space="preserve">Fine </w:t></w:r><w:r><w:rPr><w:rFonts w:ascii="Arial"/></w:rPr><w:t>two words</w:t></w:r></w:p>"#,
            para("Intro")
        );
        let result = run_rule(&FontFamilyRule::new(config()), &body);
        assert!(!result.passed);
        assert_eq!(result.violation_type, ViolationType::Error);
        assert_eq!(result.message, "Found 2 words not using Times New Roman");
        assert_eq!(result.details.as_ref().unwrap()["fonts"]["Arial"], 2);
        assert_eq!(result.locations.len(), 1);
        assert_eq!(result.locations[0].element_type, ElementType::Run);
        assert_eq!(result.locations[0].descriptor, "Section 1 / Paragraph 2 / Run 2");
    }

    #[test]
    fn test_whitespace_runs_are_not_checked() {
        let body = r#"<w:p><w:r><w:t xml:space="preserve">Fine</w:t></w:r><w:r><w:rPr><w:rFonts w:ascii="Arial"/></w:rPr><w:t xml:space="preserve">   </w:t></w:r><w:r><w:t>text</w:t></w:r></w:p>"#;
        let result = run_rule(&FontFamilyRule::new(config()), body);
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.details.unwrap()["words_checked"], 2);
    }

    #[test]
    fn test_locations_are_capped() {
        let body: String = (0..5)
            .map(|i| {
                format!(
                    r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Arial"/></w:rPr><w:t>word{}</w:t></w:r></w:p>"#,
                    i
                )
            })
            .collect();
        let rule = FontFamilyRule::new(Arc::new(QcConfig::new().with_max_locations(3)));
        let result = run_rule(&rule, &body);
        assert_eq!(result.message, "Found 5 words not using Times New Roman");
        assert_eq!(result.locations.len(), 3);
    }

    #[test]
    fn test_body_size_ignores_tables_and_headings() {
        let body = format!(
            "{}{}{}",
            styled_para("Heading1", "Introduction"),
            para("Body text at twelve points."),
            table(&[&["a", "b"]])
        );
        let result = run_rule(&BodyFontSizeRule::new(config()), &body);
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.message, "All normal text uses 12pt font size");
    }

    #[test]
    fn test_body_size_violation() {
        let body = r#"<w:p><w:r><w:rPr><w:sz w:val="20"/></w:rPr><w:t>ten point text</w:t></w:r></w:p>"#;
        let result = run_rule(&BodyFontSizeRule::new(config()), body);
        assert!(!result.passed);
        assert_eq!(result.message, "Found 3 words not using 12pt");
        assert_eq!(result.details.unwrap()["sizes"]["10pt"], 3);
    }

    #[test]
    fn test_table_size() {
        let result = run_rule(&TableFontSizeRule::new(config()), &table(&[&["x", "y"]]));
        assert!(result.passed);
        assert_eq!(result.message, "All table text uses 9pt font size");

        let body = r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>twelve</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let result = run_rule(&TableFontSizeRule::new(config()), body);
        assert!(!result.passed);
        assert_eq!(result.message, "Found 1 table words not using 9pt");
        assert_eq!(
            result.locations[0].descriptor,
            "Section 1 / Table 1, Row 1, Cell 1 / Paragraph 1 / Run 1"
        );
    }

    #[test]
    fn test_heading_style() {
        let body = styled_para("Heading1", "Methods");
        let result = run_rule(&HeadingStyleRule::new(config()), &body);
        assert!(result.passed);
        assert_eq!(result.message, "All 1 headings match the expected style");

        let body = r#"<w:p><w:pPr><w:pStyle w:val="Heading2"/></w:pPr><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>Results</w:t></w:r></w:p>"#;
        let result = run_rule(&HeadingStyleRule::new(config()), body);
        assert!(!result.passed);
        let details = result.details.unwrap();
        assert_eq!(details["headings"][0]["problems"][0], "not bold");
        assert_eq!(details["headings"][0]["level"], 2);
    }

    #[test]
    fn test_heading_style_id() {
        let headings = vec![HeadingExpectation::bold(1, 12.0).with_style_id("Heading1")];
        let rule = HeadingStyleRule::new(Arc::new(QcConfig::new().with_headings(headings)));

        let result = run_rule(&rule, &styled_para("Heading1", "Methods"));
        assert!(result.passed, "{}", result.message);

        // Outline level set directly on a Normal paragraph.
        let body = r#"<w:p><w:pPr><w:outlineLvl w:val="0"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Methods</w:t></w:r></w:p>"#;
        let result = run_rule(&rule, body);
        assert!(!result.passed);
        assert_eq!(
            result.details.unwrap()["headings"][0]["problems"][0],
            "style Normal instead of Heading1"
        );
    }

    #[test]
    fn test_no_headings() {
        let result = run_rule(&HeadingStyleRule::new(config()), &para("text"));
        assert!(result.passed);
        assert_eq!(result.message, "No headings found");
    }
}
