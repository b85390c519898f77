//! Paragraph and run types.

use super::Coordinate;
use serde::{Deserialize, Serialize};

/// A paragraph of text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Stable structural address
    pub coord: Coordinate,

    /// Runs in reading order
    pub runs: Vec<Run>,

    /// Resolved paragraph formatting
    pub format: ParagraphFormat,

    /// Structural role derived from style and numbering
    pub role: ParagraphRole,

    /// Hyperlinks in the paragraph
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hyperlinks: Vec<Hyperlink>,

    /// Bookmark names started in the paragraph
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bookmarks: Vec<String>,

    /// Field instructions (`TOC \o "1-3"`, `PAGE`, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl Paragraph {
    /// Create an empty body paragraph at the given coordinate.
    pub fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            runs: Vec::new(),
            format: ParagraphFormat::default(),
            role: ParagraphRole::Body,
            hyperlinks: Vec::new(),
            bookmarks: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.trim().is_empty())
    }

    /// Heading level (0 = title, 1-9) or None.
    pub fn heading_level(&self) -> Option<u8> {
        match self.role {
            ParagraphRole::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Check if this paragraph is a table-of-contents entry.
    pub fn is_toc_entry(&self) -> bool {
        matches!(self.role, ParagraphRole::TocEntry { .. })
    }

    /// Runs that carry visible text.
    pub fn text_runs(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter().filter(|r| !r.text.trim().is_empty())
    }
}

/// Structural role of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParagraphRole {
    /// Ordinary body text
    #[default]
    Body,
    /// Heading; level 0 is the document title
    Heading { level: u8 },
    /// Figure or table caption
    Caption,
    /// Entry generated by a table-of-contents field
    TocEntry { level: u8 },
    /// Numbered or bulleted list item
    ListItem { num_id: u32, level: u8 },
}

/// Resolved paragraph formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Applied paragraph style id
    pub style_id: Option<String>,

    /// Text alignment
    pub alignment: Alignment,

    /// Space before the paragraph in points
    pub space_before: f32,

    /// Space after the paragraph in points
    pub space_after: f32,

    /// Left indentation in points
    pub indent_left: f32,

    /// First-line indentation in points (negative for hanging)
    pub indent_first_line: f32,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl Alignment {
    /// Parse a `w:jc` value.
    pub fn from_xml(value: &str) -> Self {
        match value {
            "center" => Self::Center,
            "right" | "end" => Self::Right,
            "both" | "distribute" | "justify" => Self::Justify,
            _ => Self::Left,
        }
    }
}

/// A run of text with uniform, fully resolved formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Stable structural address
    pub coord: Coordinate,

    /// Literal text (may be empty for fields and breaks)
    pub text: String,

    /// Resolved formatting
    pub format: RunFormat,

    /// Whether the run contains an explicit page break
    #[serde(default)]
    pub page_break: bool,
}

impl Run {
    /// Check if this run has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Where a resolved run attribute came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Set directly on the run
    Direct,
    /// Inherited from a character or paragraph style
    Style,
    /// Taken from the document defaults
    DocDefaults,
    /// Nothing in the document set it; builder fallback applied
    #[default]
    Fallback,
}

/// Fully resolved run formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    /// Font family name
    pub font_name: String,

    /// Font size in points
    pub font_size: f32,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Text color as `RRGGBB`, None for automatic
    pub color: Option<String>,

    /// Origin of `font_name`
    pub font_origin: ValueOrigin,

    /// Origin of `font_size`
    pub size_origin: ValueOrigin,
}

/// Hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum HyperlinkTarget {
    /// Bookmark inside the document
    Anchor(String),
    /// Resolved external URI
    External(String),
    /// Relationship id that did not resolve
    Unresolved(String),
}

/// A hyperlink found in a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    /// Link destination
    pub target: HyperlinkTarget,
    /// Visible text
    pub text: String,
    /// Index of the first run of the link in the paragraph
    pub first_run: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;

    fn run(text: &str) -> Run {
        Run {
            coord: Coordinate::block(0, Region::Body, 0, 0),
            text: text.to_string(),
            format: RunFormat {
                font_name: "Times New Roman".into(),
                font_size: 12.0,
                bold: false,
                italic: false,
                underline: false,
                color: None,
                font_origin: ValueOrigin::Direct,
                size_origin: ValueOrigin::Direct,
            },
            page_break: false,
        }
    }

    #[test]
    fn test_paragraph_plain_text() {
        let mut p = Paragraph::new(Coordinate::block(0, Region::Body, 0, 0));
        p.runs.push(run("Hello "));
        p.runs.push(run("world"));
        p.runs.push(run(""));
        assert_eq!(p.plain_text(), "Hello world");
        assert_eq!(p.text_runs().count(), 2);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_heading_role() {
        let mut p = Paragraph::new(Coordinate::block(0, Region::Body, 0, 0));
        assert!(!p.is_heading());
        p.role = ParagraphRole::Heading { level: 2 };
        assert_eq!(p.heading_level(), Some(2));
    }

    #[test]
    fn test_alignment_from_xml() {
        assert_eq!(Alignment::from_xml("both"), Alignment::Justify);
        assert_eq!(Alignment::from_xml("center"), Alignment::Center);
        assert_eq!(Alignment::from_xml("start"), Alignment::Left);
    }
}
