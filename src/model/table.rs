//! Table types.

use super::{Coordinate, Paragraph};
use serde::{Deserialize, Serialize};

/// A table structure.
///
/// Cells hold paragraphs only. Tables nested in a cell are flattened by the
/// builder, so table depth is always one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Stable structural address
    pub coord: Coordinate,

    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Number of columns declared by the table grid
    pub grid_columns: usize,

    /// Applied table style id
    pub style_id: Option<String>,
}

impl Table {
    /// Create a new empty table.
    pub fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            rows: Vec::new(),
            grid_columns: 0,
            style_id: None,
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (grid, else widest row).
    pub fn column_count(&self) -> usize {
        if self.grid_columns > 0 {
            self.grid_columns
        } else {
            self.rows.iter().map(|r| r.span_width()).max().unwrap_or(0)
        }
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Paragraphs of every cell in row-major order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .flat_map(|c| c.paragraphs.iter())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Stable structural address
    pub coord: Coordinate,

    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this row repeats as a header
    pub is_header: bool,
}

impl TableRow {
    /// Total grid columns covered by the cells of this row.
    pub fn span_width(&self) -> usize {
        self.cells.iter().map(|c| c.grid_span.max(1)).sum()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Stable structural address
    pub coord: Coordinate,

    /// Cell content
    pub paragraphs: Vec<Paragraph>,

    /// Number of grid columns this cell spans
    pub grid_span: usize,

    /// Whether this cell continues a vertical merge from the row above
    pub merged_continuation: bool,
}

impl TableCell {
    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell has no visible text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.is_empty())
    }
}
