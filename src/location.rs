//! Human-readable locations for report entries.

use crate::model::{BlockKind, Coordinate, HeaderFooterKind, Region};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Kind of element a location points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Document,
    Section,
    Paragraph,
    Run,
    Table,
    Row,
    Cell,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Document => "document",
            ElementType::Section => "section",
            ElementType::Paragraph => "paragraph",
            ElementType::Run => "run",
            ElementType::Table => "table",
            ElementType::Row => "row",
            ElementType::Cell => "cell",
        };
        f.write_str(name)
    }
}

/// A resolved location: element type, descriptor and the coordinate it was
/// derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub element_type: ElementType,
    /// e.g. `Section 1 / Table 2, Row 3, Cell 1 / Paragraph 1`
    pub descriptor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl Location {
    /// The whole document.
    pub fn document() -> Self {
        Self {
            element_type: ElementType::Document,
            descriptor: "Document".to_string(),
            coordinate: None,
        }
    }

    /// A section as a whole (0-based index).
    pub fn section(index: usize) -> Self {
        Self {
            element_type: ElementType::Section,
            descriptor: format!("Section {}", index + 1),
            coordinate: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor)
    }
}

impl From<&Coordinate> for Location {
    fn from(coord: &Coordinate) -> Self {
        resolve(coord)
    }
}

/// Format a coordinate as a location.
///
/// The result depends only on the coordinate, so equal coordinates always
/// produce equal descriptors.
pub fn resolve(coord: &Coordinate) -> Location {
    let mut descriptor = format!("Section {}", coord.section + 1);
    match coord.region {
        Region::Body => {}
        Region::Header(kind) => push_story(&mut descriptor, "Header", kind),
        Region::Footer(kind) => push_story(&mut descriptor, "Footer", kind),
    }

    let mut element_type = match coord.kind {
        BlockKind::Paragraph => {
            let _ = write!(descriptor, " / Paragraph {}", coord.ordinal + 1);
            ElementType::Paragraph
        }
        BlockKind::Table => {
            let _ = write!(descriptor, " / Table {}", coord.ordinal + 1);
            ElementType::Table
        }
    };

    if let Some(path) = coord.table {
        let _ = write!(descriptor, ", Row {}", path.row + 1);
        element_type = ElementType::Row;
        if let Some(cell) = path.cell {
            let _ = write!(descriptor, ", Cell {}", cell + 1);
            element_type = ElementType::Cell;
        }
        if let Some(paragraph) = path.paragraph {
            let _ = write!(descriptor, " / Paragraph {}", paragraph + 1);
            element_type = ElementType::Paragraph;
        }
    }

    if let Some(run) = coord.run {
        let _ = write!(descriptor, " / Run {}", run + 1);
        element_type = ElementType::Run;
    }

    Location {
        element_type,
        descriptor,
        coordinate: Some(*coord),
    }
}

fn push_story(descriptor: &mut String, name: &str, kind: HeaderFooterKind) {
    descriptor.push_str(" / ");
    descriptor.push_str(name);
    match kind {
        HeaderFooterKind::Default => {}
        HeaderFooterKind::First => descriptor.push_str(" (first page)"),
        HeaderFooterKind::Even => descriptor.push_str(" (even pages)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_paragraph_and_run() {
        let para = Coordinate::block(0, Region::Body, 14, 11);
        let loc = resolve(&para);
        assert_eq!(loc.descriptor, "Section 1 / Paragraph 12");
        assert_eq!(loc.element_type, ElementType::Paragraph);

        let run = resolve(&para.with_run(2));
        assert_eq!(run.descriptor, "Section 1 / Paragraph 12 / Run 3");
        assert_eq!(run.element_type, ElementType::Run);
    }

    #[test]
    fn test_table_paths() {
        let table = Coordinate::table_block(0, Region::Body, 5, 1);
        assert_eq!(resolve(&table).descriptor, "Section 1 / Table 2");
        assert_eq!(resolve(&table).element_type, ElementType::Table);

        let row = table.row(2);
        assert_eq!(resolve(&row).descriptor, "Section 1 / Table 2, Row 3");
        assert_eq!(resolve(&row).element_type, ElementType::Row);

        let cell = row.cell(0);
        assert_eq!(resolve(&cell).element_type, ElementType::Cell);

        let para = cell.cell_paragraph(0);
        assert_eq!(
            resolve(&para).descriptor,
            "Section 1 / Table 2, Row 3, Cell 1 / Paragraph 1"
        );
        assert_eq!(
            resolve(&para.with_run(0)).descriptor,
            "Section 1 / Table 2, Row 3, Cell 1 / Paragraph 1 / Run 1"
        );
    }

    #[test]
    fn test_header_footer_prefixes() {
        let header = Coordinate::block(0, Region::Header(HeaderFooterKind::Default), 0, 0);
        assert_eq!(resolve(&header).descriptor, "Section 1 / Header / Paragraph 1");

        let footer = Coordinate::block(2, Region::Footer(HeaderFooterKind::First), 1, 1);
        assert_eq!(
            resolve(&footer).descriptor,
            "Section 3 / Footer (first page) / Paragraph 2"
        );
    }

    #[test]
    fn test_stable_across_serde_round_trip() {
        let coord = Coordinate::table_block(1, Region::Body, 3, 0)
            .row(1)
            .cell(2)
            .cell_paragraph(0)
            .with_run(4);
        let loc = resolve(&coord);
        let json = serde_json::to_string(&loc).unwrap();
        let back: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);
        assert_eq!(resolve(&back.coordinate.unwrap()).descriptor, loc.descriptor);
    }

    #[test]
    fn test_section_and_document() {
        assert_eq!(Location::section(0).descriptor, "Section 1");
        assert_eq!(Location::document().to_string(), "Document");
    }
}
