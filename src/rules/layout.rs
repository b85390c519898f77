//! Page setup and table layout rules.

use super::{locations, Rule, RuleId};
use crate::acronym::AcronymTable;
use crate::config::QcConfig;
use crate::location::Location;
use crate::model::{Document, Orientation};
use crate::report::CheckResult;
use serde_json::json;
use std::sync::Arc;

/// Rule 4: every section is portrait.
pub struct OrientationRule {
    config: Arc<QcConfig>,
}

impl OrientationRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for OrientationRule {
    fn id(&self) -> RuleId {
        RuleId::new(4, "Page Orientation Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let sections = doc.sections();
        if sections.is_empty() {
            return vec![CheckResult::success(
                &id,
                "Page orientation appears to be Portrait (default)",
            )];
        }

        let dimensions: Vec<String> = sections
            .iter()
            .map(|s| {
                format!(
                    "{:.2}\" x {:.2}\"",
                    s.layout.width_inches(),
                    s.layout.height_inches()
                )
            })
            .collect();
        let landscape: Vec<usize> = sections
            .iter()
            .filter(|s| s.layout.orientation() == Orientation::Landscape)
            .map(|s| s.index)
            .collect();

        if landscape.is_empty() {
            return vec![CheckResult::success(&id, "Page orientation is Portrait")
                .with_details(json!({ "dimensions": dimensions }))];
        }

        let message = if landscape.len() == sections.len() {
            "Page orientation is Landscape (should be Portrait)".to_string()
        } else {
            format!(
                "{} of {} sections are Landscape (should be Portrait)",
                landscape.len(),
                sections.len()
            )
        };
        let locations = landscape
            .iter()
            .take(self.config.max_locations)
            .map(|&i| Location::section(i))
            .collect();
        vec![CheckResult::error(&id, message)
            .with_details(json!({ "dimensions": dimensions }))
            .with_locations(locations)]
    }
}

/// Rule 5: margins are at least the minimum (error) and equal to the
/// required value within tolerance (warning).
pub struct MarginsRule {
    config: Arc<QcConfig>,
}

impl MarginsRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for MarginsRule {
    fn id(&self) -> RuleId {
        RuleId::new(5, "Page Margins Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let config = &self.config;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut error_sections = Vec::new();
        let mut warning_sections = Vec::new();

        for section in doc.sections() {
            for (side, inches) in section.layout.margins.sides_inches() {
                if inches < config.min_margin {
                    errors.push(format!(
                        "Section {} {} margin: {:.2}\" (below minimum {}\")",
                        section.index + 1,
                        side,
                        inches,
                        config.min_margin
                    ));
                    push_unique(&mut error_sections, section.index);
                } else if (inches - config.required_margin).abs() > config.margin_tolerance {
                    warnings.push(format!(
                        "Section {} {} margin: {:.2}\" (should be {}\")",
                        section.index + 1,
                        side,
                        inches,
                        config.required_margin
                    ));
                    push_unique(&mut warning_sections, section.index);
                }
            }
        }

        let section_locations = |indices: Vec<usize>| -> Vec<Location> {
            indices
                .into_iter()
                .take(config.max_locations)
                .map(Location::section)
                .collect()
        };

        if !errors.is_empty() {
            return vec![CheckResult::error(&id, format!("Found {} margin errors", errors.len()))
                .with_details(json!({ "errors": errors, "warnings": warnings }))
                .with_locations(section_locations(error_sections))];
        }
        if !warnings.is_empty() {
            return vec![CheckResult::warning(
                &id,
                format!("Margins acceptable but {} warnings", warnings.len()),
            )
            .with_details(json!({ "warnings": warnings }))
            .with_locations(section_locations(warning_sections))];
        }
        if doc.sections().is_empty() {
            return vec![CheckResult::success(&id, "No page layout to check")];
        }
        vec![CheckResult::success(
            &id,
            format!("All margins are exactly {} inch", config.required_margin),
        )]
    }
}

fn push_unique(indices: &mut Vec<usize>, index: usize) {
    if indices.last() != Some(&index) {
        indices.push(index);
    }
}

/// Rule 6: header and footer distances are at least the minimum.
pub struct HeaderFooterDistanceRule {
    config: Arc<QcConfig>,
}

impl HeaderFooterDistanceRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for HeaderFooterDistanceRule {
    fn id(&self) -> RuleId {
        RuleId::new(6, "Header/Footer Distance Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        let min = self.config.min_header_footer_distance;
        let mut details = Vec::new();
        let mut failing = Vec::new();

        for section in doc.sections() {
            let header = section.layout.header_distance_inches();
            let footer = section.layout.footer_distance_inches();
            details.push(format!(
                "Section {}: Header {:.2}\", Footer {:.2}\"",
                section.index + 1,
                header,
                footer
            ));
            if header < min || footer < min {
                failing.push(Location::section(section.index));
            }
        }

        if failing.is_empty() {
            return vec![CheckResult::success(&id, "Header and footer distances are acceptable")
                .with_details(json!({ "distances": details }))];
        }
        failing.truncate(self.config.max_locations);
        vec![CheckResult::error(&id, "Header or footer distance is below minimum")
            .with_details(json!({ "distances": details, "minimum": min }))
            .with_locations(failing)]
    }
}

/// Rule 14: rows of each table span the same number of grid columns.
pub struct TableLayoutRule {
    config: Arc<QcConfig>,
}

impl TableLayoutRule {
    pub fn new(config: Arc<QcConfig>) -> Self {
        Self { config }
    }
}

impl Rule for TableLayoutRule {
    fn id(&self) -> RuleId {
        RuleId::new(14, "Table Layout Check")
    }

    fn evaluate(&self, doc: &Document, _acronyms: &AcronymTable) -> Vec<CheckResult> {
        let id = self.id();
        if !self.config.uniform_table_rows {
            return vec![CheckResult::success(&id, "Table row consistency not required")];
        }

        let mut checked = 0;
        let mut coords = Vec::new();
        let mut details = Vec::new();
        for table in doc.tables().filter(|t| !t.is_empty()) {
            checked += 1;
            let widths: Vec<usize> = table.rows.iter().map(|r| r.span_width()).collect();
            let expected = table.column_count();
            if widths.iter().any(|&w| w != expected) {
                coords.push(&table.coord);
                details.push(json!({
                    "columns": expected,
                    "row_widths": widths,
                }));
            }
        }

        if coords.is_empty() {
            let message = if checked == 0 {
                "No tables found".to_string()
            } else {
                format!("All {} tables have consistent rows", checked)
            };
            return vec![CheckResult::success(&id, message)];
        }
        vec![CheckResult::warning(
            &id,
            format!("Found {} tables with inconsistent row widths", coords.len()),
        )
        .with_details(json!({ "tables": details }))
        .with_locations(locations(coords, self.config.max_locations))]
    }
}
