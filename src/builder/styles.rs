//! Styles part, theme fonts and memoized style resolution.

use crate::error::{Error, Result};
use crate::model::{
    Alignment, BuildWarning, DocDefaults, ParagraphProperties, RunProperties, StyleDefinition,
    StyleSheet, StyleType,
};
use crate::xml::{self, XmlElement};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum length of a `basedOn` chain before it is treated as a cycle.
pub const MAX_STYLE_DEPTH: usize = 32;

/// Major/minor Latin typefaces of the theme font scheme.
#[derive(Debug, Clone, Default)]
pub(crate) struct ThemeFonts {
    pub major: Option<String>,
    pub minor: Option<String>,
}

impl ThemeFonts {
    fn lookup(&self, theme_ref: &str) -> Option<&str> {
        if theme_ref.starts_with("major") {
            self.major.as_deref()
        } else if theme_ref.starts_with("minor") {
            self.minor.as_deref()
        } else {
            None
        }
    }
}

/// Parse `a:fontScheme` out of a theme part.
pub(crate) fn parse_theme(part: &str, bytes: &[u8]) -> Result<ThemeFonts> {
    let root = xml::parse(part, bytes)?;
    let scheme = root
        .child("themeElements")
        .and_then(|e| e.child("fontScheme"));
    let typeface = |name: &str| {
        scheme
            .and_then(|s| s.child(name))
            .and_then(|f| f.child("latin"))
            .and_then(|l| l.attr("typeface"))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    };
    Ok(ThemeFonts {
        major: typeface("majorFont"),
        minor: typeface("minorFont"),
    })
}

/// Parse a styles part into a style sheet.
pub(crate) fn parse_styles(part: &str, bytes: &[u8], theme: &ThemeFonts) -> Result<StyleSheet> {
    let root = xml::parse(part, bytes)?;

    let mut defaults = DocDefaults::default();
    if let Some(doc_defaults) = root.child("docDefaults") {
        if let Some(rpr) = doc_defaults.child("rPrDefault").and_then(|d| d.child("rPr")) {
            defaults.run = parse_run_properties(rpr, theme);
        }
        if let Some(ppr) = doc_defaults.child("pPrDefault").and_then(|d| d.child("pPr")) {
            defaults.paragraph = parse_paragraph_properties(ppr);
        }
    }

    let mut styles = BTreeMap::new();
    for style in root.children_named("style") {
        let Some(id) = style.attr("styleId") else {
            log::debug!("{}: style without styleId skipped", part);
            continue;
        };
        let definition = StyleDefinition {
            id: id.to_string(),
            name: style.child("name").and_then(|n| n.val()).map(str::to_string),
            style_type: style
                .attr("type")
                .map(StyleType::from_xml)
                .unwrap_or_default(),
            based_on: style
                .child("basedOn")
                .and_then(|b| b.val())
                .filter(|b| *b != id)
                .map(str::to_string),
            is_default: style.attr("default").is_some_and(|d| d == "1" || d == "true"),
            run: style
                .child("rPr")
                .map(|r| parse_run_properties(r, theme))
                .unwrap_or_default(),
            paragraph: style
                .child("pPr")
                .map(parse_paragraph_properties)
                .unwrap_or_default(),
        };
        styles.insert(id.to_string(), definition);
    }
    log::debug!("{}: {} styles", part, styles.len());

    Ok(StyleSheet::new(styles, defaults))
}

/// Read the run properties set directly on an `w:rPr` element.
pub(crate) fn parse_run_properties(rpr: &XmlElement, theme: &ThemeFonts) -> RunProperties {
    let mut props = RunProperties::default();
    for el in rpr.elements() {
        match el.local() {
            "rFonts" => {
                props.font_name = el
                    .attr("ascii")
                    .or_else(|| el.attr("hAnsi"))
                    .map(str::to_string)
                    .or_else(|| {
                        el.attr("asciiTheme")
                            .or_else(|| el.attr("hAnsiTheme"))
                            .and_then(|t| theme.lookup(t))
                            .map(str::to_string)
                    });
            }
            "sz" => {
                props.font_size = el.attr_i64("val").map(|half_points| half_points as f32 / 2.0);
            }
            "b" => props.bold = Some(el.on_off()),
            "i" => props.italic = Some(el.on_off()),
            "u" => props.underline = Some(el.val().map(|v| v != "none").unwrap_or(true)),
            "color" => {
                props.color = el
                    .val()
                    .filter(|v| !v.eq_ignore_ascii_case("auto"))
                    .map(str::to_string);
            }
            _ => {}
        }
    }
    props
}

/// Read the paragraph properties set directly on a `w:pPr` element.
pub(crate) fn parse_paragraph_properties(ppr: &XmlElement) -> ParagraphProperties {
    let mut props = ParagraphProperties::default();
    for el in ppr.elements() {
        match el.local() {
            "jc" => props.alignment = el.val().map(Alignment::from_xml),
            "spacing" => {
                props.space_before = el.attr_i64("before").map(twips_to_points);
                props.space_after = el.attr_i64("after").map(twips_to_points);
            }
            "ind" => {
                props.indent_left = el
                    .attr_i64("left")
                    .or_else(|| el.attr_i64("start"))
                    .map(twips_to_points);
                props.indent_first_line = match el.attr_i64("hanging") {
                    Some(hanging) => Some(-twips_to_points(hanging)),
                    None => el.attr_i64("firstLine").map(twips_to_points),
                };
            }
            "outlineLvl" => {
                props.outline_level = el.attr_i64("val").and_then(|v| u8::try_from(v).ok());
            }
            "numPr" => {
                let num_id = el
                    .child("numId")
                    .and_then(|n| n.attr_i64("val"))
                    .and_then(|v| u32::try_from(v).ok());
                let level = el
                    .child("ilvl")
                    .and_then(|n| n.attr_i64("val"))
                    .and_then(|v| u8::try_from(v).ok())
                    .unwrap_or(0);
                props.numbering = num_id.map(|id| (id, level));
            }
            _ => {}
        }
    }
    props
}

fn twips_to_points(twips: i64) -> f32 {
    twips as f32 / 20.0
}

/// Merged properties of a style and all its ancestors.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedStyle {
    pub run: RunProperties,
    pub paragraph: ParagraphProperties,
}

/// Lazily resolves `basedOn` chains, caching every style it walks through.
pub(crate) struct StyleResolver<'a> {
    sheet: &'a StyleSheet,
    styles_part: &'a str,
    lenient: bool,
    cache: HashMap<String, ResolvedStyle>,
    reported: HashSet<String>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(sheet: &'a StyleSheet, styles_part: &'a str, lenient: bool) -> Self {
        Self {
            sheet,
            styles_part,
            lenient,
            cache: HashMap::new(),
            reported: HashSet::new(),
        }
    }

    /// The style sheet being resolved.
    pub fn sheet(&self) -> &'a StyleSheet {
        self.sheet
    }

    /// Resolve a style referenced from `referencing_part`.
    ///
    /// Returns `Ok(None)` for a missing style in lenient mode, after recording
    /// a warning once per id.
    pub fn resolve(
        &mut self,
        id: &str,
        referencing_part: &str,
        warnings: &mut Vec<BuildWarning>,
    ) -> Result<Option<ResolvedStyle>> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(Some(cached.clone()));
        }
        let sheet = self.sheet;
        if sheet.get(id).is_none() {
            self.missing(id, referencing_part, warnings)?;
            return Ok(None);
        }

        let mut chain: Vec<&StyleDefinition> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut base = ResolvedStyle::default();
        let mut current = Some(id);

        while let Some(style_id) = current {
            if let Some(cached) = self.cache.get(style_id) {
                base = cached.clone();
                break;
            }
            if !visited.insert(style_id) || chain.len() >= MAX_STYLE_DEPTH {
                return Err(Error::StyleCycle {
                    part: self.styles_part.to_string(),
                    style_id: style_id.to_string(),
                });
            }
            let Some(definition) = sheet.get(style_id) else {
                let part = self.styles_part;
                self.missing(style_id, part, warnings)?;
                break;
            };
            chain.push(definition);
            current = definition.based_on.as_deref();
        }

        // Root-most ancestor first, so each level overrides its parent.
        for definition in chain.into_iter().rev() {
            let mut run = definition.run.clone();
            run.inherit(&base.run);
            let mut paragraph = definition.paragraph.clone();
            paragraph.inherit(&base.paragraph);
            base = ResolvedStyle { run, paragraph };
            self.cache.insert(definition.id.clone(), base.clone());
        }

        Ok(Some(base))
    }

    fn missing(
        &mut self,
        style_id: &str,
        part: &str,
        warnings: &mut Vec<BuildWarning>,
    ) -> Result<()> {
        if !self.lenient {
            return Err(Error::MissingStyle {
                part: part.to_string(),
                style_id: style_id.to_string(),
            });
        }
        if self.reported.insert(style_id.to_string()) {
            log::warn!("{}: missing style '{}' ignored", part, style_id);
            warnings.push(BuildWarning::new(
                part,
                format!("reference to missing style '{}'", style_id),
            ));
        }
        Ok(())
    }
}
