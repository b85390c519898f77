//! Section types: block content plus page layout.

use super::{HeaderFooterKind, Paragraph, Table};
use serde::{Deserialize, Serialize};

/// Twips (twentieths of a point) per inch.
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Convert twips to inches.
pub fn twips_to_inches(twips: i64) -> f64 {
    twips as f64 / TWIPS_PER_INCH
}

/// A section of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section index (0-based)
    pub index: usize,

    /// Body blocks in reading order
    pub blocks: Vec<Block>,

    /// Page setup
    pub layout: PageLayout,

    /// Header stories referenced by this section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderFooter>,

    /// Footer stories referenced by this section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footers: Vec<HeaderFooter>,
}

impl Section {
    /// Create an empty section with default layout.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            blocks: Vec::new(),
            layout: PageLayout::default(),
            headers: Vec::new(),
            footers: Vec::new(),
        }
    }

    /// Top-level body paragraphs (excludes table content).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Tables in the section body.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Every body paragraph in document order, including table cells.
    pub fn all_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(|b| b.paragraphs())
    }

    /// Every header and footer paragraph.
    pub fn header_footer_paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.headers
            .iter()
            .chain(self.footers.iter())
            .flat_map(|hf| hf.blocks.iter())
            .flat_map(|b| b.paragraphs())
    }

    /// Check if the section body has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block-level element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    /// Paragraph of text
    Paragraph(Paragraph),
    /// Table
    Table(Table),
}

impl Block {
    /// Paragraphs contained in this block, in reading order.
    pub fn paragraphs(&self) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
        match self {
            Block::Paragraph(p) => Box::new(std::iter::once(p)),
            Block::Table(t) => Box::new(t.paragraphs()),
        }
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph(p) => p.plain_text(),
            Block::Table(t) => t.plain_text(),
        }
    }
}

/// A header or footer story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Which pages it applies to
    pub kind: HeaderFooterKind,
    /// Part the story was read from
    pub part: String,
    /// Story content
    pub blocks: Vec<Block>,
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Portrait (default)
    #[default]
    Portrait,
    /// Landscape
    Landscape,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
        }
    }
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub left: i64,
}

impl Margins {
    /// Margins as `(side name, inches)` pairs in top/right/bottom/left order.
    pub fn sides_inches(&self) -> [(&'static str, f64); 4] {
        [
            ("Top", twips_to_inches(self.top)),
            ("Right", twips_to_inches(self.right)),
            ("Bottom", twips_to_inches(self.bottom)),
            ("Left", twips_to_inches(self.left)),
        ]
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1440,
            bottom: 1440,
            left: 1440,
        }
    }
}

/// Page layout of a section, in twips.
///
/// Values absent from `w:sectPr` take the Word application defaults
/// (US Letter, 1" margins, 0.5" header/footer distance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page width
    pub width: i64,
    /// Page height
    pub height: i64,
    /// Orientation as declared by `w:orient`, if any
    pub declared_orientation: Option<Orientation>,
    /// Page margins
    pub margins: Margins,
    /// Distance from the page top to the header
    pub header_distance: i64,
    /// Distance from the page bottom to the footer
    pub footer_distance: i64,
    /// Gutter margin
    pub gutter: i64,
}

impl PageLayout {
    /// Effective orientation.
    ///
    /// The declared attribute wins; otherwise the page is landscape only
    /// when it is wider than tall.
    pub fn orientation(&self) -> Orientation {
        match self.declared_orientation {
            Some(o) => o,
            None if self.width > self.height => Orientation::Landscape,
            None => Orientation::Portrait,
        }
    }

    /// Page width in inches.
    pub fn width_inches(&self) -> f64 {
        twips_to_inches(self.width)
    }

    /// Page height in inches.
    pub fn height_inches(&self) -> f64 {
        twips_to_inches(self.height)
    }

    /// Header distance in inches.
    pub fn header_distance_inches(&self) -> f64 {
        twips_to_inches(self.header_distance)
    }

    /// Footer distance in inches.
    pub fn footer_distance_inches(&self) -> f64 {
        twips_to_inches(self.footer_distance)
    }

    /// Gutter in inches.
    pub fn gutter_inches(&self) -> f64 {
        twips_to_inches(self.gutter)
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 12240,
            height: 15840,
            declared_orientation: None,
            margins: Margins::default(),
            header_distance: 720,
            footer_distance: 720,
            gutter: 0,
        }
    }
}
