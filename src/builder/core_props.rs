//! Core properties part (`docProps/core.xml`).

use crate::error::Result;
use crate::model::CoreProperties;
use crate::xml;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse the core properties part.
pub(crate) fn parse_core_properties(part: &str, bytes: &[u8]) -> Result<CoreProperties> {
    let root = xml::parse(part, bytes)?;
    let mut props = CoreProperties::default();

    for el in root.elements() {
        let text = el.text().trim().to_string();
        if text.is_empty() {
            continue;
        }
        match el.local() {
            "title" => props.title = Some(text),
            "subject" => props.subject = Some(text),
            "creator" => props.author = Some(text),
            "keywords" => props.keywords = Some(text),
            "description" => props.description = Some(text),
            "lastModifiedBy" => props.last_modified_by = Some(text),
            "revision" => props.revision = Some(text),
            "created" => props.created = parse_w3c_date(&text),
            "modified" => props.modified = parse_w3c_date(&text),
            _ => {}
        }
    }

    Ok(props)
}

/// Parse a W3CDTF timestamp; values without a zone are taken as UTC.
fn parse_w3c_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_core_properties() {
        let xml = br#"<cp:coreProperties xmlns:cp="cp" xmlns:dc="dc" xmlns:dcterms="dcterms">
  <dc:title>Quarterly Report</dc:title>
  <dc:creator>Jordan Smith</dc:creator>
  <cp:lastModifiedBy>Editor</cp:lastModifiedBy>
  <cp:revision>4</cp:revision>
  <dcterms:created xsi:type="dcterms:W3CDTF">2024-03-01T09:30:00Z</dcterms:created>
  <dcterms:modified>2024-03-02</dcterms:modified>
  <dc:subject></dc:subject>
</cp:coreProperties>"#;
        let props = parse_core_properties("docProps/core.xml", xml).unwrap();
        assert_eq!(props.title.as_deref(), Some("Quarterly Report"));
        assert_eq!(props.author.as_deref(), Some("Jordan Smith"));
        assert_eq!(props.last_modified_by.as_deref(), Some("Editor"));
        assert_eq!(props.revision.as_deref(), Some("4"));
        assert_eq!(props.subject, None);
        assert_eq!(props.created.unwrap().month(), 3);
        assert_eq!(props.modified.unwrap().day(), 2);
    }

    #[test]
    fn test_parse_w3c_date_variants() {
        assert!(parse_w3c_date("2024-01-05T10:00:00+02:00").is_some());
        assert!(parse_w3c_date("2024-01-05T10:00:00").is_some());
        assert!(parse_w3c_date("yesterday").is_none());
    }
}
