//! Document model types for WordprocessingML content.
//!
//! This module defines the read-only representation the rules work on.
//! Every element carries a [`Coordinate`] assigned by the builder, and every
//! run carries fully resolved formatting so rules never walk style
//! inheritance themselves.

mod coord;
mod document;
mod paragraph;
mod section;
mod style;
mod table;

pub use coord::{BlockKind, Coordinate, HeaderFooterKind, Region, TablePath};
pub use document::{BuildWarning, CoreProperties, Document, DocumentStats};
pub use paragraph::{
    Alignment, Hyperlink, HyperlinkTarget, Paragraph, ParagraphFormat, ParagraphRole, Run,
    RunFormat, ValueOrigin,
};
pub use section::{
    twips_to_inches, Block, HeaderFooter, Margins, Orientation, PageLayout, Section,
    TWIPS_PER_INCH,
};
pub use style::{
    DocDefaults, ParagraphProperties, RunProperties, StyleDefinition, StyleSheet, StyleType,
};
pub use table::{Table, TableCell, TableRow};
