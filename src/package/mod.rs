//! Package reader: the zip container of XML parts.
//!
//! The reader knows nothing about WordprocessingML beyond locating the main
//! document part. It keeps XML and relationship parts in memory and exposes
//! them by name; binary media is skipped.

mod rels;

pub use rels::{rel_type, rels_part_name, resolve_target, Relationship, Relationships};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// Default location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// An opened document package.
#[derive(Debug, Clone)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
    main_part: String,
}

impl Package {
    /// Open a package from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Open a package from an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| match e {
            zip::result::ZipError::InvalidArchive(msg) => Error::CorruptArchive(msg.to_string()),
            other => Error::from(other),
        })?;

        let mut parts = BTreeMap::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            if !is_xml_part(&name) {
                continue;
            }
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)
                .map_err(|e| Error::CorruptArchive(format!("{}: {}", name, e)))?;
            parts.insert(name, content);
        }
        log::debug!("package holds {} XML parts", parts.len());

        let main_part = locate_main_part(&parts)?;
        if !parts.contains_key(&main_part) {
            return Err(Error::MissingPart(main_part));
        }

        Ok(Self { parts, main_part })
    }

    /// Open a package from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Get a part by name.
    ///
    /// Part names are matched exactly first, then case-insensitively, since
    /// package part names are case-insensitive.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        let name = name.trim_start_matches('/');
        self.parts
            .get(name)
            .or_else(|| {
                self.parts
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(|v| v.as_slice())
    }

    /// Check whether a part exists.
    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    /// Names of all retained parts, sorted.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }

    /// Name of the main document part.
    pub fn main_part_name(&self) -> &str {
        &self.main_part
    }

    /// Relationships declared by a part (empty when it has no `.rels` part).
    pub fn relationships(&self, source: &str) -> Result<Relationships> {
        let rels_name = rels_part_name(source);
        match self.part(&rels_name) {
            Some(bytes) => Relationships::parse(source, &rels_name, bytes),
            None => Ok(Relationships::empty(source)),
        }
    }
}

fn is_xml_part(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".xml") || lower.ends_with(".rels")
}

fn locate_main_part(parts: &BTreeMap<String, Vec<u8>>) -> Result<String> {
    let rels_name = rels_part_name("");
    let Some(bytes) = parts.get(&rels_name) else {
        return Ok(DEFAULT_MAIN_PART.to_string());
    };
    let rels = Relationships::parse("", &rels_name, bytes)?;
    Ok(rels
        .first_of_type(rel_type::OFFICE_DOCUMENT)
        .map(|r| resolve_target("", &r.target))
        .unwrap_or_else(|| DEFAULT_MAIN_PART.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_minimal_package() {
        let data = build_zip(&[
            ("word/document.xml", "<w:document/>"),
            ("word/media/image1.png", "binary"),
        ]);
        let package = Package::from_bytes(&data).unwrap();
        assert_eq!(package.main_part_name(), "word/document.xml");
        assert!(package.has_part("word/document.xml"));
        assert!(package.has_part("/WORD/Document.xml"));
        assert!(!package.has_part("word/media/image1.png"));
    }

    #[test]
    fn test_main_part_from_root_rels() {
        let rels = r#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document2.xml"/></Relationships>"#;
        let data = build_zip(&[("_rels/.rels", rels), ("word/document2.xml", "<w:document/>")]);
        let package = Package::from_bytes(&data).unwrap();
        assert_eq!(package.main_part_name(), "word/document2.xml");
    }

    #[test]
    fn test_missing_main_part() {
        let data = build_zip(&[("word/styles.xml", "<w:styles/>")]);
        let err = Package::from_bytes(&data).unwrap_err();
        assert!(matches!(err, Error::MissingPart(ref p) if p == "word/document.xml"));
    }

    #[test]
    fn test_not_a_package() {
        let err = Package::from_bytes(b"<html></html>").unwrap_err();
        assert!(matches!(err, Error::NotAPackage));
    }

    #[test]
    fn test_truncated_archive() {
        let data = build_zip(&[("word/document.xml", "<w:document/>")]);
        let truncated = &data[..data.len() / 2];
        assert!(Package::from_bytes(truncated).is_err());
    }
}
