//! In-memory package fixtures for unit tests.

use crate::builder::{self, BuildOptions};
use crate::model::Document;
use crate::package::Package;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub(crate) const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

/// Zip the given parts.
pub(crate) fn docx(entries: &[(&str, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub(crate) fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><w:document {}><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

/// Styles where body text is Times New Roman 12pt and headings are bold.
pub(crate) fn styles_xml() -> String {
    format!(
        r#"<w:styles {}>
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman"/><w:sz w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="TOC1"><w:name w:val="toc 1"/><w:basedOn w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="TableText"><w:name w:val="Table Text"/><w:basedOn w:val="Normal"/><w:rPr><w:sz w:val="18"/></w:rPr></w:style>
</w:styles>"#,
        W_NS
    )
}

pub(crate) fn rels_xml(relationships: &str) -> String {
    format!(
        r#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        relationships
    )
}

/// Build a document from body XML with the standard styles.
pub(crate) fn document(body: &str) -> Document {
    document_with(&[
        ("word/document.xml", document_xml(body)),
        ("word/styles.xml", styles_xml()),
    ])
}

/// Build a document from arbitrary parts.
pub(crate) fn document_with(entries: &[(&str, String)]) -> Document {
    let data = docx(entries);
    let package = Package::from_bytes(&data).unwrap();
    builder::build(&package, &BuildOptions::default()).unwrap()
}

/// A document with one empty section.
pub(crate) fn empty_document() -> Document {
    document("")
}

/// A paragraph with one run of text.
pub(crate) fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

/// A paragraph with one run of text and a paragraph style.
pub(crate) fn styled_para(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        style, text
    )
}

/// A table whose rows hold the given cell texts, in 9pt table style.
pub(crate) fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in *row {
            xml.push_str("<w:tc>");
            xml.push_str(&styled_para("TableText", cell));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// Section properties with page size and margins in twips.
pub(crate) fn sect_pr(width: u32, height: u32, margin: u32, header: u32) -> String {
    format!(
        r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="{hd}" w:footer="{hd}" w:gutter="0"/></w:sectPr>"#,
        w = width,
        h = height,
        m = margin,
        hd = header
    )
}
