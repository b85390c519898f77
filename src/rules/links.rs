//! Table of contents and hyperlink rules.

use super::{Rule, RuleId};
use crate::acronym::AcronymTable;
use crate::config::QcConfig;
use crate::location::{self, Location};
use crate::model::{Document, HyperlinkTarget, Paragraph};
use crate::report::CheckResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::sync::Arc;

static HTTP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)https?://([a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*|\[[0-9a-f:.]+\])(?::\d{1,5})?(?:[/?#]\S*)?$")
        .expect("valid URL pattern")
});

static MAILTO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)mailto:[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid mailto pattern")
});

/// Word's implicit bookmark for the start of the document.
const TOP_BOOKMARK: &str = "_top";

/// How a table of contents was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TocEvidence {
    Field,
    Style,
    Text,
}

impl TocEvidence {
    fn as_str(self) -> &'static str {
        match self {
            TocEvidence::Field => "field",
            TocEvidence::Style => "style",
            TocEvidence::Text => "text",
        }
    }
}

fn first_token(instruction: &str) -> Option<&str> {
    instruction.split_whitespace().next()
}

fn has_toc_field(paragraph: &Paragraph) -> bool {
    paragraph
        .fields
        .iter()
        .any(|f| first_token(f).is_some_and(|t| t.eq_ignore_ascii_case("TOC")))
}

fn has_toc_style(doc: &Document, paragraph: &Paragraph) -> bool {
    paragraph.is_toc_entry()
        || paragraph
            .format
            .style_id
            .as_deref()
            .and_then(|id| doc.styles().get(id))
            .is_some_and(|s| s.display_name().to_lowercase().starts_with("toc"))
}

fn has_toc_text(paragraph: &Paragraph, patterns: &[String]) -> bool {
    let text = paragraph.plain_text();
    let text = text.trim().trim_end_matches(':').trim();
    patterns.iter().any(|p| text.eq_ignore_ascii_case(p.trim()))
}

/// Locate the table of contents: a TOC field wins over a TOC style, which
/// wins over a heading text such as "Table of Contents".
fn find_toc<'d>(doc: &'d Document, config: &QcConfig) -> Option<(TocEvidence, &'d Paragraph)> {
    let paragraphs = || doc.all_paragraphs();
    paragraphs()
        .find(|p| has_toc_field(p))
        .map(|p| (TocEvidence::Field, p))
        .or_else(|| {
            paragraphs()
                .find(|p| has_toc_style(doc, p))
                .map(|p| (TocEvidence::Style, p))
        })
        .or_else(|| {
            paragraphs()
                .find(|p| has_toc_text(p, &config.toc_patterns))
                .map(|p| (TocEvidence::Text, p))
        })
}

/// Rule 7: the document contains a table of contents.
pub struct TocRule {
    config: Arc<QcConfig>,
}

impl TocRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for TocRule {
    fn id(&self) -> RuleId {
        RuleId::new(7, "Table of Contents Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        match find_toc(doc, &self.config) {
            Some((evidence, paragraph)) => vec![CheckResult::success(&id, "Table of Contents found")
                .with_details(json!({
                    "detected_by": evidence.as_str(),
                    "text": paragraph.plain_text().trim(),
                }))
                .with_locations(vec![location::resolve(&paragraph.coord)])],
            None => vec![
                CheckResult::warning(&id, "No Table of Contents found in document").with_details(
                    json!({ "checked": ["field codes", "styles", "heading text"] }),
                ),
            ],
        }
    }
}

/// A link that failed validation.
struct Broken {
    location: Location,
    target: String,
    text: String,
    reason: &'static str,
}

fn broken_details(broken: &[Broken]) -> serde_json::Value {
    let entries: Vec<_> = broken
        .iter()
        .map(|b| {
            json!({
                "target": b.target,
                "text": b.text,
                "reason": b.reason,
                "location": b.location.descriptor,
            })
        })
        .collect();
    json!({ "broken": entries })
}

fn link_location(paragraph: &Paragraph, first_run: Option<usize>) -> Location {
    match first_run {
        Some(run) if run < paragraph.runs.len() => location::resolve(&paragraph.coord.with_run(run)),
        _ => location::resolve(&paragraph.coord),
    }
}

fn bookmark_exists(doc: &Document, name: &str) -> bool {
    name == TOP_BOOKMARK || doc.has_bookmark(name)
}

/// Rule 8: every link inside table-of-contents entries targets an existing
/// bookmark.
pub struct TocLinksRule {
    config: Arc<QcConfig>,
}

impl TocLinksRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for TocLinksRule {
    fn id(&self) -> RuleId {
        RuleId::new(8, "TOC Links Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let mut total = 0;
        let mut broken = Vec::new();

        for paragraph in doc.all_paragraphs().filter(|p| has_toc_style(doc, p)) {
            let text = paragraph.plain_text().trim().to_string();
            for link in &paragraph.hyperlinks {
                let (target, valid, reason) = match &link.target {
                    HyperlinkTarget::Anchor(name) => {
                        (name, bookmark_exists(doc, name), "missing bookmark")
                    }
                    HyperlinkTarget::Unresolved(rid) => (rid, false, "unresolved relationship"),
                    HyperlinkTarget::External(_) => continue,
                };
                total += 1;
                if valid {
                    continue;
                }
                broken.push(Broken {
                    location: link_location(paragraph, link.first_run),
                    target: target.clone(),
                    text: link.text.clone(),
                    reason,
                });
            }
            for bookmark in paragraph.fields.iter().filter_map(|f| pageref_target(f)) {
                total += 1;
                if !bookmark_exists(doc, bookmark) {
                    broken.push(Broken {
                        location: location::resolve(&paragraph.coord),
                        target: bookmark.to_string(),
                        text: text.clone(),
                        reason: "missing bookmark",
                    });
                }
            }
        }

        if total == 0 {
            return vec![CheckResult::success(&id, "No TOC links to check")];
        }
        if broken.is_empty() {
            return vec![CheckResult::success(
                &id,
                format!("All {} TOC links are valid", total),
            )];
        }
        let message = format!("Found {} broken TOC links", broken.len());
        let details = broken_details(&broken);
        let locations = broken
            .into_iter()
            .take(self.config.max_locations)
            .map(|b| b.location)
            .collect();
        vec![CheckResult::error(&id, message)
            .with_details(details)
            .with_locations(locations)]
    }
}

/// Bookmark named by a `PAGEREF` field instruction.
fn pageref_target(instruction: &str) -> Option<&str> {
    let mut tokens = instruction.split_whitespace();
    let keyword = tokens.next()?;
    if !keyword.eq_ignore_ascii_case("PAGEREF") {
        return None;
    }
    tokens
        .next()
        .map(|t| t.trim_matches('"'))
        .filter(|t| !t.is_empty())
}

/// Rule 9: every anchor hyperlink resolves to a bookmark.
pub struct InternalLinksRule {
    config: Arc<QcConfig>,
}

impl InternalLinksRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for InternalLinksRule {
    fn id(&self) -> RuleId {
        RuleId::new(9, "Internal Hyperlinks Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let mut total = 0;
        let mut broken = Vec::new();

        for paragraph in doc.all_paragraphs().chain(doc.header_footer_paragraphs()) {
            for link in &paragraph.hyperlinks {
                let HyperlinkTarget::Anchor(anchor) = &link.target else {
                    continue;
                };
                total += 1;
                if !bookmark_exists(doc, anchor) {
                    broken.push(Broken {
                        location: link_location(paragraph, link.first_run),
                        target: anchor.clone(),
                        text: link.text.clone(),
                        reason: "missing bookmark",
                    });
                }
            }
        }

        if total == 0 {
            return vec![CheckResult::success(
                &id,
                "No internal hyperlinks found (no issues)",
            )];
        }
        if broken.is_empty() {
            return vec![CheckResult::success(
                &id,
                format!("All {} internal hyperlinks are valid", total),
            )
            .with_details(json!({ "bookmarks": doc.bookmarks().len() }))];
        }
        let message = format!(
            "Found {} broken internal links out of {} total links",
            broken.len(),
            total
        );
        let details = broken_details(&broken);
        let locations = broken
            .into_iter()
            .take(self.config.max_locations)
            .map(|b| b.location)
            .collect();
        vec![CheckResult::error(&id, message)
            .with_details(details)
            .with_locations(locations)]
    }
}

/// Why an external target is not acceptable, if it is not.
fn external_problem(uri: &str) -> Option<&'static str> {
    let uri = uri.trim();
    let scheme = uri.split_once(':').map(|(s, _)| s.to_ascii_lowercase());
    match scheme.as_deref() {
        Some("http") | Some("https") => (!HTTP_URL.is_match(uri)).then_some("malformed URL"),
        Some("mailto") => (!MAILTO.is_match(uri)).then_some("malformed mail address"),
        Some(_) => Some("unsupported scheme"),
        None => Some("missing scheme"),
    }
}

/// Rule 10: external targets are well-formed http(s) or mailto URLs.
///
/// Validation is syntactic; nothing is fetched.
pub struct ExternalLinksRule {
    config: Arc<QcConfig>,
}

impl ExternalLinksRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for ExternalLinksRule {
    fn id(&self) -> RuleId {
        RuleId::new(10, "External Hyperlinks Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let mut total = 0;
        let mut broken = Vec::new();

        for paragraph in doc.all_paragraphs().chain(doc.header_footer_paragraphs()) {
            for link in &paragraph.hyperlinks {
                let (target, problem) = match &link.target {
                    HyperlinkTarget::External(uri) => (uri, external_problem(uri)),
                    HyperlinkTarget::Unresolved(rid) => (rid, Some("unresolved relationship")),
                    HyperlinkTarget::Anchor(_) => continue,
                };
                total += 1;
                if let Some(reason) = problem {
                    broken.push(Broken {
                        location: link_location(paragraph, link.first_run),
                        target: target.clone(),
                        text: link.text.clone(),
                        reason,
                    });
                }
            }
        }

        if total == 0 {
            return vec![CheckResult::success(
                &id,
                "No external hyperlinks found (no issues)",
            )];
        }
        if broken.is_empty() {
            return vec![CheckResult::success(
                &id,
                format!("All {} external hyperlinks are valid", total),
            )];
        }
        let message = format!("Found {} broken external links", broken.len());
        let details = broken_details(&broken);
        let locations = broken
            .into_iter()
            .take(self.config.max_locations)
            .map(|b| b.location)
            .collect();
        vec![CheckResult::error(&id, message)
            .with_details(details)
            .with_locations(locations)]
    }
}
