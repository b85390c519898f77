//! Document-level types.

use super::{Block, Paragraph, Section, StyleSheet, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A loaded document.
///
/// Built once by the document builder and then only read. Rules receive a
/// shared reference; there is no mutating API.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    sections: Vec<Section>,
    styles: StyleSheet,
    core_properties: CoreProperties,
    warnings: Vec<BuildWarning>,
    bookmarks: BTreeSet<String>,
}

impl Document {
    pub(crate) fn new(
        sections: Vec<Section>,
        styles: StyleSheet,
        core_properties: CoreProperties,
        warnings: Vec<BuildWarning>,
        bookmarks: BTreeSet<String>,
    ) -> Self {
        Self {
            sections,
            styles,
            core_properties,
            warnings,
            bookmarks,
        }
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get a section by index (0-based).
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Style definitions and document defaults.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Package core properties.
    pub fn core_properties(&self) -> &CoreProperties {
        &self.core_properties
    }

    /// Diagnostics recorded while building.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    /// Names of every bookmark started in the body.
    pub fn bookmarks(&self) -> &BTreeSet<String> {
        &self.bookmarks
    }

    /// Check whether a bookmark exists.
    pub fn has_bookmark(&self, name: &str) -> bool {
        self.bookmarks.contains(name)
    }

    /// Check if the document has no body content.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.is_empty())
    }

    /// Every body block in document order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    /// Top-level body paragraphs, excluding table content.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.paragraphs())
    }

    /// Every body paragraph in document order, table cells included.
    pub fn all_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.all_paragraphs())
    }

    /// Body tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().flat_map(|s| s.tables())
    }

    /// Header and footer paragraphs of every section.
    pub fn header_footer_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.sections.iter().flat_map(|s| s.header_footer_paragraphs())
    }

    /// Get plain text content of the body.
    pub fn plain_text(&self) -> String {
        self.blocks()
            .map(|b| b.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Collect content statistics.
    pub fn stats(&self) -> DocumentStats {
        let mut stats = DocumentStats {
            section_count: self.sections.len() as u32,
            ..Default::default()
        };
        for block in self.blocks() {
            if let Block::Table(_) = block {
                stats.table_count += 1;
            }
        }
        for paragraph in self.all_paragraphs() {
            stats.paragraph_count += 1;
            stats.run_count += paragraph.runs.len() as u32;
            if paragraph.is_heading() {
                stats.heading_count += 1;
            }
            stats.hyperlink_count += paragraph.hyperlinks.len() as u32;
            let text = paragraph.plain_text();
            stats.word_count += text.split_whitespace().count() as u32;
            stats.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
        }
        stats.bookmark_count = self.bookmarks.len() as u32;
        stats
    }
}

/// Package core properties (`docProps/core.xml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    /// `dc:creator`
    pub author: Option<String>,
    pub keywords: Option<String>,
    pub description: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// A non-fatal diagnostic recorded by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Part the diagnostic refers to
    pub part: String,
    /// Human-readable message
    pub message: String,
}

impl BuildWarning {
    pub fn new(part: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.part, self.message)
    }
}

/// Content statistics of a document body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub section_count: u32,
    /// Paragraphs including table cell paragraphs
    pub paragraph_count: u32,
    pub table_count: u32,
    pub run_count: u32,
    pub heading_count: u32,
    pub hyperlink_count: u32,
    pub bookmark_count: u32,
    /// Whitespace-separated tokens
    pub word_count: u32,
    /// Characters excluding whitespace
    pub char_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Coordinate, ParagraphRole, Region, Run, RunFormat, TableCell, TableRow, ValueOrigin,
    };

    fn paragraph(coord: Coordinate, text: &str) -> Paragraph {
        let mut p = Paragraph::new(coord);
        p.runs.push(Run {
            coord: coord.with_run(0),
            text: text.to_string(),
            format: RunFormat {
                font_name: "Times New Roman".into(),
                font_size: 12.0,
                bold: false,
                italic: false,
                underline: false,
                color: None,
                font_origin: ValueOrigin::Fallback,
                size_origin: ValueOrigin::Fallback,
            },
            page_break: false,
        });
        p
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new(
            Vec::new(),
            StyleSheet::default(),
            CoreProperties::default(),
            Vec::new(),
            BTreeSet::new(),
        );
        assert!(doc.is_empty());
        assert_eq!(doc.stats(), DocumentStats::default());
        assert_eq!(doc.plain_text(), "");
    }

    #[test]
    fn test_stats_and_iteration() {
        let mut section = Section::new(0);
        let mut heading = paragraph(Coordinate::block(0, Region::Body, 0, 0), "Introduction");
        heading.role = ParagraphRole::Heading { level: 1 };
        section.blocks.push(Block::Paragraph(heading));

        let table_coord = Coordinate::table_block(0, Region::Body, 1, 0);
        let mut table = Table::new(table_coord);
        table.rows.push(TableRow {
            coord: table_coord.row(0),
            cells: vec![TableCell {
                coord: table_coord.row(0).cell(0),
                paragraphs: vec![paragraph(
                    table_coord.row(0).cell(0).cell_paragraph(0),
                    "cell text here",
                )],
                grid_span: 1,
                merged_continuation: false,
            }],
            is_header: false,
        });
        section.blocks.push(Block::Table(table));

        let doc = Document::new(
            vec![section],
            StyleSheet::default(),
            CoreProperties::default(),
            Vec::new(),
            BTreeSet::from(["_Toc1".to_string()]),
        );

        assert_eq!(doc.paragraphs().count(), 1);
        assert_eq!(doc.all_paragraphs().count(), 2);
        assert!(doc.has_bookmark("_Toc1"));

        let stats = doc.stats();
        assert_eq!(stats.section_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.bookmark_count, 1);
    }
}
