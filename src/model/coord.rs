//! Structural coordinates.

use serde::{Deserialize, Serialize};

/// Which story of a section an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Main document body
    Body,
    /// Section header
    Header(HeaderFooterKind),
    /// Section footer
    Footer(HeaderFooterKind),
}

/// Header/footer variant selected by `w:type`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterKind {
    /// Used on every page unless overridden
    #[default]
    Default,
    /// First page of the section
    First,
    /// Even pages
    Even,
}

impl HeaderFooterKind {
    /// Parse the `w:type` attribute value.
    pub fn from_xml(value: &str) -> Self {
        match value {
            "first" => Self::First,
            "even" => Self::Even,
            _ => Self::Default,
        }
    }
}

/// Kind of top-level block a coordinate points into.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Table,
}

/// Position of an element inside a table: row, cell, paragraph within cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TablePath {
    /// Row index (0-based)
    pub row: usize,
    /// Cell index within the row (0-based), if the element is inside a cell
    pub cell: Option<usize>,
    /// Paragraph index within the cell (0-based), if the element is a paragraph
    pub paragraph: Option<usize>,
}

/// Stable address of a structural element.
///
/// Assigned once by the builder and never renumbered. `block` counts every
/// block (paragraphs and tables) in the region of the section; `ordinal`
/// counts only blocks of the same kind, which is what people read in a
/// location ("Table 2", "Paragraph 12").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Section index (0-based)
    pub section: usize,
    /// Region inside the section
    pub region: Region,
    /// Block index in the region (0-based)
    pub block: usize,
    /// Whether the block is a paragraph or a table
    #[serde(default)]
    pub kind: BlockKind,
    /// Index among blocks of the same kind in the region (0-based)
    pub ordinal: usize,
    /// Path inside a table block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TablePath>,
    /// Run index inside the paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<usize>,
}

impl Coordinate {
    /// Coordinate of a top-level paragraph.
    pub fn block(section: usize, region: Region, block: usize, ordinal: usize) -> Self {
        Self {
            section,
            region,
            block,
            kind: BlockKind::Paragraph,
            ordinal,
            table: None,
            run: None,
        }
    }

    /// Coordinate of a top-level table.
    pub fn table_block(section: usize, region: Region, block: usize, ordinal: usize) -> Self {
        Self {
            kind: BlockKind::Table,
            ..Self::block(section, region, block, ordinal)
        }
    }

    /// Coordinate of a table row.
    pub fn row(self, row: usize) -> Self {
        Self {
            kind: BlockKind::Table,
            table: Some(TablePath {
                row,
                cell: None,
                paragraph: None,
            }),
            ..self
        }
    }

    /// Coordinate of a cell in this row.
    pub fn cell(self, cell: usize) -> Self {
        let row = self.table.map(|t| t.row).unwrap_or(0);
        Self {
            kind: BlockKind::Table,
            table: Some(TablePath {
                row,
                cell: Some(cell),
                paragraph: None,
            }),
            ..self
        }
    }

    /// Coordinate of a paragraph in this cell.
    pub fn cell_paragraph(self, paragraph: usize) -> Self {
        let mut path = self.table.unwrap_or(TablePath {
            row: 0,
            cell: Some(0),
            paragraph: None,
        });
        path.paragraph = Some(paragraph);
        Self {
            kind: BlockKind::Table,
            table: Some(path),
            ..self
        }
    }

    /// Coordinate of a run in this paragraph.
    pub fn with_run(self, run: usize) -> Self {
        Self {
            run: Some(run),
            ..self
        }
    }

    /// The enclosing paragraph coordinate (drops the run index).
    pub fn paragraph(self) -> Self {
        Self { run: None, ..self }
    }

    /// Whether the element is a table or sits inside one.
    pub fn in_table(&self) -> bool {
        self.kind == BlockKind::Table
    }

    /// Whether the element belongs to the main body.
    pub fn in_body(&self) -> bool {
        self.region == Region::Body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_builders() {
        let table = Coordinate::table_block(0, Region::Body, 3, 1);
        assert!(table.in_table());
        assert!(!Coordinate::block(0, Region::Body, 2, 2).in_table());
        let para = table.row(2).cell(1).cell_paragraph(0);
        let path = para.table.unwrap();
        assert_eq!(path.row, 2);
        assert_eq!(path.cell, Some(1));
        assert_eq!(path.paragraph, Some(0));
        assert!(para.in_table());

        let run = para.with_run(4);
        assert_eq!(run.run, Some(4));
        assert_eq!(run.paragraph(), para);
    }

    #[test]
    fn test_coordinate_ordering_is_document_order() {
        let a = Coordinate::block(0, Region::Body, 1, 1).with_run(5);
        let b = Coordinate::block(0, Region::Body, 2, 2);
        let c = Coordinate::block(1, Region::Body, 0, 0);
        assert!(a < b && b < c);
    }
}
