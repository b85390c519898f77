//! Numbering part: list instances and their abstract definitions.

use crate::error::{Error, Result};
use crate::model::StyleSheet;
use crate::xml;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default)]
struct AbstractNum {
    num_style_link: Option<String>,
}

/// Parsed numbering definitions.
#[derive(Debug, Clone, Default)]
pub(crate) struct Numbering {
    /// numId -> abstractNumId
    nums: BTreeMap<u32, u32>,
    abstracts: BTreeMap<u32, AbstractNum>,
}

impl Numbering {
    /// Parse a numbering part and validate that no instance reaches itself
    /// through `numStyleLink` indirection.
    pub fn parse(part: &str, bytes: &[u8], styles: &StyleSheet) -> Result<Self> {
        let root = xml::parse(part, bytes)?;
        let mut numbering = Numbering::default();

        for abs in root.children_named("abstractNum") {
            let Some(id) = abs.attr_i64("abstractNumId").and_then(|v| u32::try_from(v).ok())
            else {
                continue;
            };
            numbering.abstracts.insert(
                id,
                AbstractNum {
                    num_style_link: abs
                        .child("numStyleLink")
                        .and_then(|l| l.val())
                        .map(str::to_string),
                },
            );
        }

        for num in root.children_named("num") {
            let num_id = num.attr_i64("numId").and_then(|v| u32::try_from(v).ok());
            let abstract_id = num
                .child("abstractNumId")
                .and_then(|a| a.attr_i64("val"))
                .and_then(|v| u32::try_from(v).ok());
            if let (Some(num_id), Some(abstract_id)) = (num_id, abstract_id) {
                numbering.nums.insert(num_id, abstract_id);
            }
        }

        for &num_id in numbering.nums.keys() {
            numbering.follow_links(part, num_id, styles)?;
        }
        log::debug!(
            "{}: {} list instances, {} abstract definitions",
            part,
            numbering.nums.len(),
            numbering.abstracts.len()
        );
        Ok(numbering)
    }

    /// Whether a list instance exists.
    pub fn contains(&self, num_id: u32) -> bool {
        self.nums.contains_key(&num_id)
    }

    /// Follow `numStyleLink` hops until a concrete definition is reached.
    fn follow_links(&self, part: &str, start: u32, styles: &StyleSheet) -> Result<()> {
        let mut visited = HashSet::new();
        let mut current = start;
        loop {
            if !visited.insert(current) {
                return Err(Error::CircularNumbering {
                    part: part.to_string(),
                    num_id: current,
                });
            }
            let Some(abstract_id) = self.nums.get(&current) else {
                return Ok(());
            };
            let Some(link) = self
                .abstracts
                .get(abstract_id)
                .and_then(|a| a.num_style_link.as_deref())
            else {
                return Ok(());
            };
            match styles.get(link).and_then(|s| s.paragraph.numbering) {
                Some((next, _)) => current = next,
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::styles::{parse_styles, ThemeFonts};

    const STYLES: &[u8] = br#"<w:styles xmlns:w="w">
  <w:style w:type="numbering" w:styleId="ListA"><w:pPr><w:numPr><w:numId w:val="2"/></w:numPr></w:pPr></w:style>
  <w:style w:type="numbering" w:styleId="ListB"><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr></w:style>
</w:styles>"#;

    #[test]
    fn test_parse_numbering() {
        let styles = parse_styles("word/styles.xml", STYLES, &ThemeFonts::default()).unwrap();
        let xml = br#"<w:numbering xmlns:w="w">
  <w:abstractNum w:abstractNumId="0"><w:lvl w:ilvl="0"><w:numFmt w:val="bullet"/><w:lvlText w:val="*"/></w:lvl></w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#;
        let numbering = Numbering::parse("word/numbering.xml", xml, &styles).unwrap();
        assert!(numbering.contains(1));
        assert!(!numbering.contains(7));
    }

    #[test]
    fn test_circular_style_links() {
        let styles = parse_styles("word/styles.xml", STYLES, &ThemeFonts::default()).unwrap();
        let xml = br#"<w:numbering xmlns:w="w">
  <w:abstractNum w:abstractNumId="0"><w:numStyleLink w:val="ListA"/></w:abstractNum>
  <w:abstractNum w:abstractNumId="1"><w:numStyleLink w:val="ListB"/></w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>
</w:numbering>"#;
        let err = Numbering::parse("word/numbering.xml", xml, &styles).unwrap_err();
        assert!(matches!(err, Error::CircularNumbering { num_id: 1, .. }));
    }
}
