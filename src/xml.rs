//! Minimal owned XML element tree built on quick-xml.
//!
//! Parts of a document package are small enough to hold in memory, and the
//! builder needs random access to siblings (section properties live at the end
//! of a paragraph, table grids precede rows), so each part is parsed once into
//! this tree and then walked.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node in the element tree.
#[derive(Debug, Clone)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its qualified name, attributes and children.
#[derive(Debug, Clone, Default)]
pub(crate) struct XmlElement {
    /// Qualified name as written (e.g. `w:p`)
    pub name: String,
    /// Attributes as (qualified key, unescaped value)
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Local part of the element name.
    pub fn local(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Attribute value by local name.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| local_part(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value by exact qualified name.
    pub fn attr_qualified(&self, qname: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == qname)
            .map(|(_, v)| v.as_str())
    }

    /// The `val` attribute, used by most WordprocessingML property elements.
    pub fn val(&self) -> Option<&str> {
        self.attr("val")
    }

    /// Parse an attribute as an integer.
    pub fn attr_i64(&self, local: &str) -> Option<i64> {
        self.attr(local).and_then(|v| v.trim().parse::<f64>().ok()).map(|v| v as i64)
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local() == local)
    }

    /// All child elements with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.local() == local)
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Interpret a WordprocessingML on/off property (`<w:b/>`, `<w:b w:val="0"/>`).
    pub fn on_off(&self) -> bool {
        !matches!(self.val(), Some("0") | Some("false") | Some("off") | Some("none"))
    }
}

/// Strip a namespace prefix.
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}

/// Parse a part into its root element.
pub(crate) fn parse(part: &str, bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::with_capacity(1024);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let element = start_element(&e, &reader, part)?;
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e, &reader, part)?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    let raw = std::str::from_utf8(t.as_ref()).map_err(|e| Error::xml(part, e))?;
                    let text = if raw.contains('&') {
                        quick_xml::escape::unescape(raw)
                            .map_err(|e| Error::xml(part, e))?
                            .into_owned()
                    } else {
                        raw.to_string()
                    };
                    push_text(top, &text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    let text = std::str::from_utf8(c.as_ref()).map_err(|e| Error::xml(part, e))?;
                    push_text(top, text);
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(top) = stack.last_mut() {
                    let name = std::str::from_utf8(r.as_ref()).map_err(|e| Error::xml(part, e))?;
                    match resolve_reference(name) {
                        Some(text) => push_text(top, &text),
                        None => log::debug!("{}: unresolved entity reference &{};", part, name),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::xml(part, e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::xml(part, "unexpected end of document"));
    }
    root.ok_or_else(|| Error::xml(part, "no root element"))
}

fn start_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>, part: &str) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(part, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| Error::xml(part, err))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(XmlElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn push_text(element: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(last)) = element.children.last_mut() {
        last.push_str(text);
    } else {
        element.children.push(XmlNode::Text(text.to_string()));
    }
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    quick_xml::escape::resolve_predefined_entity(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let xml = br#"<?xml version="1.0"?><w:p xmlns:w="x"><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:r><w:b/><w:t>world</w:t></w:r></w:p>"#;
        let root = parse("test.xml", xml).unwrap();
        assert_eq!(root.local(), "p");
        assert_eq!(root.prefix(), Some("w"));
        assert_eq!(root.children_named("r").count(), 2);
        assert_eq!(root.text(), "Hello world");
    }

    #[test]
    fn test_entities_resolved() {
        let xml = br#"<a><t>R&amp;D &lt;&#65;&#x42;&gt;</t></a>"#;
        let root = parse("test.xml", xml).unwrap();
        assert_eq!(root.text(), "R&D <AB>");
    }

    #[test]
    fn test_attributes_by_local_name() {
        let xml = br#"<w:pgSz xmlns:w="x" w:w="12240" w:h="15840" w:orient="portrait"/>"#;
        let root = parse("test.xml", xml).unwrap();
        assert_eq!(root.attr("w"), Some("12240"));
        assert_eq!(root.attr_i64("h"), Some(15840));
        assert_eq!(root.attr_qualified("w:orient"), Some("portrait"));
    }

    #[test]
    fn test_on_off() {
        let root = parse("t", br#"<r><b/><i val="0"/><u val="single"/></r>"#).unwrap();
        assert!(root.child("b").unwrap().on_off());
        assert!(!root.child("i").unwrap().on_off());
    }

    #[test]
    fn test_malformed_xml() {
        let result = parse("word/document.xml", b"<a><b></a>");
        assert!(matches!(result, Err(Error::Xml { .. })));
    }

    #[test]
    fn test_truncated_xml() {
        let result = parse("word/document.xml", b"<a><b>");
        assert!(result.is_err());
    }
}
