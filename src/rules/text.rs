//! Text scanning rules: verb tense consistency and acronym definitions.

use super::{locations, Rule, RuleId};
use crate::acronym::{is_acronym_token, AcronymTable};
use crate::config::{AcronymAdjacency, QcConfig};
use crate::location;
use crate::model::{Coordinate, Document, Paragraph};
use crate::report::CheckResult;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

static ACRONYM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Z0-9]{1,9}\b").expect("valid acronym pattern"));

/// `(expansion)` at the start of the text.
static LEADING_EXPANSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\(\s*[^()\s][^()]*\)").expect("valid expansion pattern"));

/// `expansion (` at the end of the text.
static TRAILING_EXPANSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^()\s][^()]*\(\s*$").expect("valid expansion pattern"));

static CLOSING_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\)").expect("valid closing pattern"));

/// Lowercased words of a text, apostrophes kept.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Occurrences of indicator words or phrases in a word sequence.
fn count_indicators(words: &[String], indicators: &[String]) -> usize {
    indicators
        .iter()
        .map(|indicator| {
            let phrase: Vec<&str> = indicator.split_whitespace().collect();
            if phrase.is_empty() || phrase.len() > words.len() {
                return 0;
            }
            words
                .windows(phrase.len())
                .filter(|w| w.iter().zip(&phrase).all(|(a, b)| a == b))
                .count()
        })
        .sum()
}

#[derive(Debug, Default, Clone, Copy)]
struct TenseCounts {
    present: usize,
    past: usize,
    future: usize,
}

impl TenseCounts {
    fn active(&self) -> usize {
        [self.present, self.past, self.future]
            .iter()
            .filter(|&&c| c > 0)
            .count()
    }

    fn max(&self) -> usize {
        self.present.max(self.past).max(self.future)
    }

    fn primary(&self) -> &'static str {
        if self.present > self.past && self.present > self.future {
            "Present"
        } else if self.past > self.future {
            "Past"
        } else {
            "Future"
        }
    }

    fn mixture(&self) -> Option<&'static str> {
        match (self.present > 0, self.past > 0, self.future > 0) {
            (true, true, _) => Some("Mixed present and past tense"),
            (true, false, true) => Some("Mixed present and future tense"),
            (false, true, true) => Some("Mixed past and future tense"),
            _ => None,
        }
    }
}

/// Rule 11: verb tenses are used consistently.
///
/// Indicator words are counted over the whole body. Only when all three
/// tenses occur and one of them more than three times are paragraphs that
/// mix tenses reported.
pub struct TenseRule {
    config: Arc<QcConfig>,
}

impl TenseRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }

    fn counts(&self, words: &[String]) -> TenseCounts {
        let indicators = &self.config.tense_indicators;
        TenseCounts {
            present: count_indicators(words, &indicators.present),
            past: count_indicators(words, &indicators.past),
            future: count_indicators(words, &indicators.future),
        }
    }
}

impl Rule for TenseRule {
    fn id(&self) -> RuleId {
        RuleId::new(11, "Verb Tense Consistency Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let paragraphs: Vec<(&Paragraph, TenseCounts)> = doc
            .paragraphs()
            .map(|p| (p, self.counts(&words(&p.plain_text()))))
            .collect();

        let mut total = TenseCounts::default();
        for (_, counts) in &paragraphs {
            total.present += counts.present;
            total.past += counts.past;
            total.future += counts.future;
        }

        let mut mixed = Vec::new();
        if total.active() > 2 && total.max() > 3 {
            for (paragraph, counts) in &paragraphs {
                if let Some(mixture) = counts.mixture() {
                    mixed.push((&paragraph.coord, mixture));
                }
            }
        }

        let counts = json!({
            "present": total.present,
            "past": total.past,
            "future": total.future,
        });
        if mixed.is_empty() {
            return vec![CheckResult::success(&id, "Verb tenses appear to be consistent")
                .with_details(json!({ "primary_tense": total.primary(), "counts": counts }))];
        }

        let inconsistencies: Vec<String> = mixed
            .iter()
            .map(|(coord, mixture)| format!("{}: {}", location::resolve(coord), mixture))
            .collect();
        vec![CheckResult::warning(
            &id,
            "Multiple verb tenses detected - potential inconsistency",
        )
        .with_details(json!({ "counts": counts, "inconsistencies": inconsistencies }))
        .with_locations(locations(
            mixed.iter().map(|(coord, _)| *coord),
            self.config.max_locations,
        ))]
    }
}

/// First occurrence of a candidate acronym.
struct FirstUse<'d> {
    token: &'d str,
    paragraph: usize,
    start: usize,
    end: usize,
}

/// Rule 12: acronyms are defined at first use or known.
///
/// Body paragraphs are scanned once in document order, table cells
/// included. Only the first occurrence of each token is examined.
pub struct AcronymRule {
    config: Arc<QcConfig>,
}

impl AcronymRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }

    fn defined_inline(&self, texts: &[String], first: &FirstUse<'_>) -> bool {
        let text = &texts[first.paragraph];
        let before = &text[..first.start];
        let after = &text[first.end..];

        // TOKEN (expansion)
        if LEADING_EXPANSION.is_match(after) {
            return true;
        }
        // expansion (TOKEN)
        if TRAILING_EXPANSION.is_match(before) && CLOSING_PAREN.is_match(after) {
            return true;
        }
        match self.config.acronym_adjacency {
            AcronymAdjacency::SameParagraph => false,
            AcronymAdjacency::SameOrNextParagraph => {
                after.trim().is_empty()
                    && texts
                        .get(first.paragraph + 1)
                        .is_some_and(|next| LEADING_EXPANSION.is_match(next))
            }
        }
    }
}

/// Coordinate of the run holding a byte offset of the paragraph text.
fn run_at(paragraph: &Paragraph, offset: usize) -> Coordinate {
    let mut end = 0;
    for run in &paragraph.runs {
        end += run.text.len();
        if offset < end {
            return run.coord;
        }
    }
    paragraph.coord
}

impl Rule for AcronymRule {
    fn id(&self) -> RuleId {
        RuleId::new(12, "Acronym Definition Check")
    }

    fn evaluate(&self, doc: &Document, acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let paragraphs: Vec<&Paragraph> = doc.all_paragraphs().collect();
        let texts: Vec<String> = paragraphs.iter().map(|p| p.plain_text()).collect();

        let mut seen = HashSet::new();
        let mut first_uses = Vec::new();
        for (index, text) in texts.iter().enumerate() {
            for m in ACRONYM.find_iter(text) {
                let token = m.as_str();
                if !is_acronym_token(token)
                    || self.config.acronym_stop_words.contains(token)
                    || !seen.insert(token)
                {
                    continue;
                }
                first_uses.push(FirstUse {
                    token,
                    paragraph: index,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }

        let mut defined = Vec::new();
        let mut known = Vec::new();
        let mut undefined = Vec::new();
        for first in &first_uses {
            if self.defined_inline(&texts, first) {
                defined.push(first.token);
            } else if acronyms.has_definition(first.token) {
                known.push(first.token);
            } else {
                undefined.push(first);
            }
        }

        if undefined.is_empty() {
            return vec![CheckResult::success(
                &id,
                "All acronyms are properly defined or recognized",
            )
            .with_details(json!({
                "checked": first_uses.len(),
                "defined": defined,
                "known": known,
            }))];
        }

        let coords: Vec<Coordinate> = undefined
            .iter()
            .map(|u| run_at(paragraphs[u.paragraph], u.start))
            .collect();
        let tokens: Vec<&str> = undefined.iter().map(|u| u.token).collect();
        vec![CheckResult::warning(
            &id,
            format!("Found {} acronyms that may not be defined", undefined.len()),
        )
        .with_details(json!({
            "undefined": tokens,
            "defined": defined,
            "known": known,
        }))
        .with_locations(locations(&coords, self.config.max_locations))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acronym::AcronymEntry;
    use crate::report::ViolationType;
    use crate::testing::{document, para, table};

    fn evaluate(rule: &dyn Rule, body: &str, acronyms: &AcronymTable) -> CheckResult {
        let doc = document(body);
        let mut results = rule.evaluate(&doc, acronyms);
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    fn acronym_rule() -> AcronymRule {
        AcronymRule::new(Arc::new(QcConfig::default()))
    }

    fn undefined(result: &CheckResult) -> Vec<String> {
        result.details.as_ref().unwrap()["undefined"]
            .as_array()
            .map(|a| a.iter().map(|v| v.as_str().unwrap().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_count_indicators() {
        let w = words("It is going to rain, and it was wet. This isn't it.");
        assert_eq!(count_indicators(&w, &["is".to_string()]), 1);
        assert_eq!(count_indicators(&w, &["going to".to_string()]), 1);
        assert_eq!(count_indicators(&w, &["was".to_string(), "were".to_string()]), 1);
    }

    #[test]
    fn test_consistent_tense() {
        let body = format!(
            "{}{}",
            para("The system runs daily and the team works on it."),
            para("It has two parts and does its job.")
        );
        let rule = TenseRule::new(Arc::new(QcConfig::default()));
        let result = evaluate(&rule, &body, &AcronymTable::new());
        assert!(result.passed);
        assert_eq!(result.details.unwrap()["primary_tense"], "Present");
    }

    #[test]
    fn test_mixed_tense_reported() {
        let body = format!(
            "{}{}{}",
            para("The tool is fast and it is simple, it is small, it is here."),
            para("It was slow before and we will fix the rest."),
            para("The plan will succeed.")
        );
        let rule = TenseRule::new(Arc::new(QcConfig::default()));
        let result = evaluate(&rule, &body, &AcronymTable::new());
        assert!(!result.passed);
        assert_eq!(result.violation_type, ViolationType::Warning);
        let details = result.details.unwrap();
        assert_eq!(
            details["inconsistencies"][0],
            "Section 1 / Paragraph 2: Mixed past and future tense"
        );
        assert_eq!(result.locations.len(), 1);
    }

    #[test]
    fn test_acronym_defined_after_token() {
        let body = para("The QCX (Quality Control Extended) process. Later QCX again.");
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.details.unwrap()["defined"][0], "QCX");
    }

    #[test]
    fn test_acronym_defined_before_token() {
        let body = para("We follow Quality Control Extended (QCX) here.");
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert!(result.passed);
    }

    #[test]
    fn test_acronym_defined_in_next_paragraph() {
        let body = format!("{}{}", para("Acronym: ZQW"), para("(Zero Quantum Wave) is used."));
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert!(result.passed);

        let same_only = AcronymRule::new(Arc::new(
            QcConfig::new().with_acronym_adjacency(AcronymAdjacency::SameParagraph),
        ));
        let result = evaluate(&same_only, &body, &AcronymTable::new());
        assert!(!result.passed);
    }

    #[test]
    fn test_only_first_occurrence_counts() {
        let body = format!(
            "{}{}",
            para("We used ZQW in the lab."),
            para("ZQW (Zero Quantum Wave) was defined too late.")
        );
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert!(!result.passed);
        assert_eq!(result.message, "Found 1 acronyms that may not be defined");
        assert_eq!(undefined(&result), vec!["ZQW"]);
        assert_eq!(result.locations[0].descriptor, "Section 1 / Paragraph 1 / Run 1");
    }

    #[test]
    fn test_table_definition_satisfies() {
        let table_data = AcronymTable::new()
            .with_entry("ZQW", AcronymEntry::new("Zero Quantum Wave", "Physics"))
            .unwrap();
        let body = para("The ZQW detector.");
        let result = evaluate(&acronym_rule(), &body, &table_data);
        assert!(result.passed);
        assert_eq!(result.details.unwrap()["known"][0], "ZQW");
    }

    #[test]
    fn test_stop_words_and_non_tokens_ignored() {
        let body = para("THE plan is OK. Item A1 and 2FA and Api are fine.");
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert!(result.passed);
        assert_eq!(result.details.unwrap()["checked"], 0);
    }

    #[test]
    fn test_acronyms_in_tables_are_scanned() {
        let body = format!("{}{}", para("Intro"), table(&[&["KPQ value"]]));
        let result = evaluate(&acronym_rule(), &body, &AcronymTable::new());
        assert_eq!(undefined(&result), vec!["KPQ"]);
        assert_eq!(
            result.locations[0].descriptor,
            "Section 1 / Table 1, Row 1, Cell 1 / Paragraph 1 / Run 1"
        );
    }
}
