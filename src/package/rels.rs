//! Relationship parts (`_rels/*.rels`).

use crate::error::Result;
use crate::xml;
use std::collections::BTreeMap;

/// Relationship type suffixes used by the builder.
pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str = "/officeDocument";
    pub const STYLES: &str = "/styles";
    pub const NUMBERING: &str = "/numbering";
    pub const THEME: &str = "/theme";
    pub const HEADER: &str = "/header";
    pub const FOOTER: &str = "/footer";
    pub const HYPERLINK: &str = "/hyperlink";
    pub const CORE_PROPERTIES: &str = "/core-properties";
}

/// A single relationship from a source part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target as written in the relationship part
    pub target: String,
    /// Whether the target lives outside the package (hyperlinks)
    pub external: bool,
}

impl Relationship {
    /// Whether the relationship type URI ends with the given suffix.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type.ends_with(suffix)
    }
}

/// Relationships declared by one source part, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    source: String,
    rels: Vec<Relationship>,
    /// id -> index into `rels`
    by_id: BTreeMap<String, usize>,
}

impl Relationships {
    /// An empty relationship set for a part without a `.rels` part.
    pub fn empty(source: &str) -> Self {
        Self {
            source: source.to_string(),
            rels: Vec::new(),
            by_id: BTreeMap::new(),
        }
    }

    /// Parse a `.rels` part belonging to `source`.
    pub fn parse(source: &str, rels_part: &str, bytes: &[u8]) -> Result<Self> {
        let root = xml::parse(rels_part, bytes)?;
        let mut rels = Self::empty(source);
        for rel in root.children_named("Relationship") {
            let (Some(id), Some(rel_type), Some(target)) =
                (rel.attr("Id"), rel.attr("Type"), rel.attr("Target"))
            else {
                log::warn!("{}: skipping incomplete relationship", rels_part);
                continue;
            };
            let external = rel
                .attr("TargetMode")
                .map(|m| m.eq_ignore_ascii_case("External"))
                .unwrap_or(false);
            rels.push(Relationship {
                id: id.to_string(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                external,
            });
        }
        Ok(rels)
    }

    /// Add a relationship; a repeated ID replaces the earlier entry in place.
    fn push(&mut self, rel: Relationship) {
        match self.by_id.get(&rel.id) {
            Some(&index) => self.rels[index] = rel,
            None => {
                self.by_id.insert(rel.id.clone(), self.rels.len());
                self.rels.push(rel);
            }
        }
    }

    /// Look up a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&index| &self.rels[index])
    }

    /// First relationship of the given type in declaration order.
    pub fn first_of_type(&self, suffix: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.is_type(suffix))
    }

    /// Resolve an internal relationship to an absolute part name.
    pub fn target_part(&self, id: &str) -> Option<String> {
        self.get(id)
            .filter(|r| !r.external)
            .map(|r| resolve_target(&self.source, &r.target))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Whether no relationships are declared.
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

/// Name of the relationship part for a source part.
///
/// `word/document.xml` maps to `word/_rels/document.xml.rels`; the package
/// itself (empty source) maps to `_rels/.rels`.
pub fn rels_part_name(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", source),
    }
}

/// Resolve a relative relationship target against its source part.
pub fn resolve_target(source: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/a?b=1&amp;c=2" TargetMode="External"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="../word/header1.xml"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse("word/document.xml", "word/_rels/document.xml.rels", DOC_RELS)
            .unwrap();
        assert_eq!(rels.len(), 3);
        assert!(rels.get("rId2").unwrap().external);
        assert_eq!(rels.get("rId2").unwrap().target, "https://example.com/a?b=1&c=2");
        assert_eq!(rels.target_part("rId1").as_deref(), Some("word/styles.xml"));
        assert_eq!(rels.target_part("rId3").as_deref(), Some("word/header1.xml"));
        assert_eq!(rels.target_part("rId2"), None);
        assert!(rels.first_of_type(rel_type::STYLES).is_some());
    }

    #[test]
    fn test_first_of_type_follows_declaration_order() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header2.xml"/>
  <Relationship Id="rId10" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header10.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header3.xml"/>
</Relationships>"#;
        let rels = Relationships::parse("word/document.xml", "word/_rels/document.xml.rels", xml)
            .unwrap();
        assert_eq!(rels.len(), 2);
        let first = rels.first_of_type(rel_type::HEADER).unwrap();
        assert_eq!(first.id, "rId2");
        assert_eq!(first.target, "header3.xml");
    }

    #[test]
    fn test_rels_part_name() {
        assert_eq!(rels_part_name("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_part_name(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/document.xml", "/customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word/document.xml", "theme/theme1.xml"), "word/theme/theme1.xml");
        assert_eq!(resolve_target("word/document.xml", "../docProps/core.xml"), "docProps/core.xml");
    }
}
