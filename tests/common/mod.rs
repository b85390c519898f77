//! Shared fixtures for integration tests: in-memory `.docx` packages.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

pub const W_NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

/// US Letter portrait, 1" margins, 0.5" header and footer distance.
pub const LETTER_SECT_PR: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

pub fn zip_parts(entries: &[(&str, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}</w:body></w:document>"#,
        W_NS, body
    )
}

/// Times New Roman 12pt defaults, bold headings and a 9pt table text style.
pub fn styles_xml() -> String {
    format!(
        r#"<w:styles {}>
<w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Times New Roman" w:hAnsi="Times New Roman"/><w:sz w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults>
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="TOC1"><w:name w:val="toc 1"/><w:basedOn w:val="Normal"/></w:style>
<w:style w:type="paragraph" w:styleId="TableText"><w:name w:val="Table Text"/><w:basedOn w:val="Normal"/><w:rPr><w:sz w:val="18"/></w:rPr></w:style>
<w:style w:type="character" w:styleId="Code"><w:name w:val="Code"/><w:rPr><w:rFonts w:ascii="Courier New" w:hAnsi="Courier New"/></w:rPr></w:style>
</w:styles>"#,
        W_NS
    )
}

/// A `.docx` package with the standard styles and the given body.
pub fn docx(body: &str) -> Vec<u8> {
    zip_parts(&[
        ("word/document.xml", document_xml(body)),
        ("word/styles.xml", styles_xml()),
    ])
}

pub fn para(text: &str) -> String {
    format!(
        r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        text
    )
}

pub fn styled_para(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        style, text
    )
}

/// A paragraph of runs, each optionally carrying a character style.
pub fn runs_para(runs: &[(Option<&str>, &str)]) -> String {
    let mut xml = String::from("<w:p>");
    for (style, text) in runs {
        xml.push_str("<w:r>");
        if let Some(style) = style {
            xml.push_str(&format!(r#"<w:rPr><w:rStyle w:val="{}"/></w:rPr>"#, style));
        }
        xml.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t></w:r>"#, text));
    }
    xml.push_str("</w:p>");
    xml
}

pub fn table(rows: &[&[&str]]) -> String {
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

/// A document that satisfies every rule in the default catalogue.
pub fn compliant_body() -> String {
    format!(
        "{}{}{}{}{}",
        para("Table of Contents"),
        styled_para("Heading1", "Introduction"),
        para("This report describes the quarterly review."),
        table(&[&["Item", "Value"], &["Budget", "Approved"]]),
        LETTER_SECT_PR
    )
}
