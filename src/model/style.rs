//! Style definitions as declared in the styles part.
//!
//! Property sets here are partial: `None` means "not set at this level".
//! The builder merges them along the `basedOn` chain and stores fully
//! resolved values on runs and paragraphs.

use super::Alignment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of a style definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    /// Parse the `w:type` attribute of `w:style`.
    pub fn from_xml(value: &str) -> Self {
        match value {
            "character" => Self::Character,
            "table" => Self::Table,
            "numbering" => Self::Numbering,
            _ => Self::Paragraph,
        }
    }
}

/// Run properties set at one level of the inheritance chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunProperties {
    pub font_name: Option<String>,
    /// Size in points
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<String>,
}

impl RunProperties {
    /// Fill every unset property from `parent`.
    pub fn inherit(&mut self, parent: &RunProperties) {
        if self.font_name.is_none() {
            self.font_name = parent.font_name.clone();
        }
        if self.font_size.is_none() {
            self.font_size = parent.font_size;
        }
        if self.bold.is_none() {
            self.bold = parent.bold;
        }
        if self.italic.is_none() {
            self.italic = parent.italic;
        }
        if self.underline.is_none() {
            self.underline = parent.underline;
        }
        if self.color.is_none() {
            self.color = parent.color.clone();
        }
    }

    /// Check if nothing is set.
    pub fn is_empty(&self) -> bool {
        *self == RunProperties::default()
    }
}

/// Paragraph properties set at one level of the inheritance chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphProperties {
    pub alignment: Option<Alignment>,
    /// Points
    pub space_before: Option<f32>,
    /// Points
    pub space_after: Option<f32>,
    /// Points
    pub indent_left: Option<f32>,
    /// Points, negative for a hanging indent
    pub indent_first_line: Option<f32>,
    /// Outline level (0-based, as written in `w:outlineLvl`)
    pub outline_level: Option<u8>,
    /// Numbering reference `(numId, ilvl)`
    pub numbering: Option<(u32, u8)>,
}

impl ParagraphProperties {
    /// Fill every unset property from `parent`.
    pub fn inherit(&mut self, parent: &ParagraphProperties) {
        self.alignment = self.alignment.or(parent.alignment);
        self.space_before = self.space_before.or(parent.space_before);
        self.space_after = self.space_after.or(parent.space_after);
        self.indent_left = self.indent_left.or(parent.indent_left);
        self.indent_first_line = self.indent_first_line.or(parent.indent_first_line);
        self.outline_level = self.outline_level.or(parent.outline_level);
        self.numbering = self.numbering.or(parent.numbering);
    }
}

/// A single `w:style` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Style id referenced by `w:pStyle`/`w:rStyle`
    pub id: String,
    /// Display name (`w:name`)
    pub name: Option<String>,
    pub style_type: StyleType,
    /// Parent style id
    pub based_on: Option<String>,
    /// Whether this is the default style of its type
    pub is_default: bool,
    /// Run properties set by this style only
    pub run: RunProperties,
    /// Paragraph properties set by this style only
    pub paragraph: ParagraphProperties,
}

impl StyleDefinition {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Document defaults (`w:docDefaults`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocDefaults {
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

/// All styles of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleSheet {
    styles: BTreeMap<String, StyleDefinition>,
    defaults: DocDefaults,
}

impl StyleSheet {
    /// Create a style sheet.
    pub fn new(styles: BTreeMap<String, StyleDefinition>, defaults: DocDefaults) -> Self {
        Self { styles, defaults }
    }

    /// Look up a style by id.
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.styles.get(id)
    }

    /// Look up a style by display name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles
            .values()
            .find(|s| s.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    /// The default style of a type (e.g. "Normal" for paragraphs).
    pub fn default_of(&self, style_type: StyleType) -> Option<&StyleDefinition> {
        self.styles
            .values()
            .find(|s| s.is_default && s.style_type == style_type)
    }

    /// Document defaults.
    pub fn defaults(&self) -> &DocDefaults {
        &self.defaults
    }

    /// Iterate over all styles sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.values()
    }

    /// Number of styles.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no styles are declared.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
