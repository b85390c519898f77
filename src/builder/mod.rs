//! Document model builder.
//!
//! Turns the XML parts of a [`Package`] into a [`Document`]. Each part is
//! parsed once; style inheritance is resolved lazily and memoized so every
//! run leaves the builder with final formatting values.

mod core_props;
mod document;
mod numbering;
mod options;
mod styles;

pub use options::{BuildOptions, ErrorMode, FALLBACK_FONT, FALLBACK_FONT_SIZE};
pub use styles::MAX_STYLE_DEPTH;

use crate::error::Result;
use crate::model::{CoreProperties, Document, StyleSheet};
use crate::package::{rel_type, resolve_target, Package, Relationships};
use crate::xml;
use document::StoryBuilder;
use numbering::Numbering;
use styles::{StyleResolver, ThemeFonts};

/// Conventional part names used when the relationship part does not list them.
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const CORE_PART: &str = "docProps/core.xml";

/// Build a document model from an opened package.
pub fn build(package: &Package, options: &BuildOptions) -> Result<Document> {
    let main = package.main_part_name();
    let rels = package.relationships(main)?;

    let theme = match related_part(package, &rels, main, rel_type::THEME, None) {
        Some(part) => styles::parse_theme(&part, package_part(package, &part))?,
        None => ThemeFonts::default(),
    };

    let styles_part = related_part(package, &rels, main, rel_type::STYLES, Some(STYLES_PART));
    let sheet = match &styles_part {
        Some(part) => styles::parse_styles(part, package_part(package, part), &theme)?,
        None => StyleSheet::default(),
    };

    let numbering = match related_part(package, &rels, main, rel_type::NUMBERING, Some(NUMBERING_PART)) {
        Some(part) => Some(Numbering::parse(&part, package_part(package, &part), &sheet)?),
        None => None,
    };

    let core_properties = core_properties(package)?;

    let root = xml::parse(main, package_part(package, main))?;
    let styles_part_name = styles_part.as_deref().unwrap_or(STYLES_PART);
    let resolver = StyleResolver::new(&sheet, styles_part_name, options.is_lenient());
    let mut stories = StoryBuilder::new(package, options, &theme, resolver, numbering.as_ref());
    let sections = stories.body(main, &root, &rels)?;
    let (warnings, bookmarks) = stories.finish();

    log::info!(
        "built {}: {} sections, {} styles, {} warnings",
        main,
        sections.len(),
        sheet.len(),
        warnings.len()
    );

    Ok(Document::new(
        sections,
        sheet,
        core_properties,
        warnings,
        bookmarks,
    ))
}

/// Resolve the part targeted by the first internal relationship of a type,
/// falling back to a conventional name when the package holds it.
fn related_part(
    package: &Package,
    rels: &Relationships,
    source: &str,
    rel_type: &str,
    fallback: Option<&str>,
) -> Option<String> {
    rels.first_of_type(rel_type)
        .filter(|r| !r.external)
        .map(|r| resolve_target(source, &r.target))
        .filter(|part| package.has_part(part))
        .or_else(|| {
            fallback
                .filter(|part| package.has_part(part))
                .map(str::to_string)
        })
}

fn package_part<'p>(package: &'p Package, name: &str) -> &'p [u8] {
    package.part(name).unwrap_or_default()
}

fn core_properties(package: &Package) -> Result<CoreProperties> {
    let root_rels = package.relationships("")?;
    match related_part(package, &root_rels, "", rel_type::CORE_PROPERTIES, Some(CORE_PART)) {
        Some(part) => core_props::parse_core_properties(&part, package_part(package, &part)),
        None => Ok(CoreProperties::default()),
    }
}
