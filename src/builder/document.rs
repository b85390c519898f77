//! Main document, header and footer stories.

use super::numbering::Numbering;
use super::options::BuildOptions;
use super::styles::{
    parse_paragraph_properties, parse_run_properties, ResolvedStyle, StyleResolver, ThemeFonts,
};
use crate::error::{Error, Result};
use crate::model::{
    Block, BuildWarning, Coordinate, HeaderFooter, HeaderFooterKind, Hyperlink, HyperlinkTarget,
    Margins, Orientation, PageLayout, Paragraph, ParagraphFormat, ParagraphProperties,
    ParagraphRole, Region, Run, RunFormat, RunProperties, Section, StyleDefinition, StyleType,
    Table, TableCell, TableRow, ValueOrigin,
};
use crate::package::{Package, Relationships};
use crate::xml::{self, XmlElement};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use unicode_normalization::UnicodeNormalization;

/// Block-level markup with no content of interest.
const SKIPPED_BLOCK: &[&str] = &[
    "bookmarkEnd",
    "proofErr",
    "permStart",
    "permEnd",
    "commentRangeStart",
    "commentRangeEnd",
    "moveFromRangeStart",
    "moveFromRangeEnd",
    "moveToRangeStart",
    "moveToRangeEnd",
    "del",
    "moveFrom",
    "sdtPr",
    "sdtEndPr",
    "tcPr",
];

/// Paragraph-level markup with no content of interest.
const SKIPPED_INLINE: &[&str] = &[
    "pPr",
    "bookmarkEnd",
    "proofErr",
    "del",
    "moveFrom",
    "oMath",
    "oMathPara",
    "permStart",
    "permEnd",
    "commentRangeStart",
    "commentRangeEnd",
    "moveFromRangeStart",
    "moveFromRangeEnd",
    "moveToRangeStart",
    "moveToRangeEnd",
    "customXmlPr",
    "smartTagPr",
    "sdtPr",
    "sdtEndPr",
];

/// Part-level context of the story being walked.
struct Story<'s> {
    part: &'s str,
    rels: &'s Relationships,
    region: Region,
}

/// Per-section, per-region block numbering.
#[derive(Debug, Default)]
struct Counters {
    block: usize,
    paragraphs: usize,
    tables: usize,
}

impl Counters {
    fn paragraph(&mut self, section: usize, region: Region) -> Coordinate {
        let coord = Coordinate::block(section, region, self.block, self.paragraphs);
        self.block += 1;
        self.paragraphs += 1;
        coord
    }

    fn table(&mut self, section: usize, region: Region) -> Coordinate {
        let coord = Coordinate::table_block(section, region, self.block, self.tables);
        self.block += 1;
        self.tables += 1;
        coord
    }
}

/// Accumulated blocks of one story walk.
struct BlockState<'x> {
    section: usize,
    counters: Counters,
    blocks: Vec<Block>,
    /// (number of blocks so far, `w:sectPr`) for each paragraph that ends a section
    breaks: Vec<(usize, &'x XmlElement)>,
    /// Body-level `w:sectPr` describing the last section
    final_sect: Option<&'x XmlElement>,
}

impl BlockState<'_> {
    fn new(section: usize) -> Self {
        Self {
            section,
            counters: Counters::default(),
            blocks: Vec::new(),
            breaks: Vec::new(),
            final_sect: None,
        }
    }
}

/// Complex field (`w:fldChar`) tracking within one paragraph.
#[derive(Debug, Default)]
struct FieldState {
    stack: Vec<Option<String>>,
}

impl FieldState {
    fn begin(&mut self) {
        self.stack.push(Some(String::new()));
    }

    fn instruction(&mut self, text: &str) {
        if self.stack.is_empty() {
            self.begin();
        }
        if let Some(Some(buffer)) = self.stack.last_mut() {
            buffer.push_str(text);
        }
    }

    fn separate(&mut self, fields: &mut Vec<String>) {
        if let Some(buffer) = self.stack.last_mut().and_then(Option::take) {
            push_field(fields, &buffer);
        }
    }

    fn end(&mut self, fields: &mut Vec<String>) {
        if let Some(Some(buffer)) = self.stack.pop() {
            push_field(fields, &buffer);
        }
    }

    fn flush(&mut self, fields: &mut Vec<String>) {
        for buffer in self.stack.drain(..).flatten() {
            push_field(fields, &buffer);
        }
    }
}

fn push_field(fields: &mut Vec<String>, instruction: &str) {
    let instruction = instruction.trim();
    if !instruction.is_empty() {
        fields.push(instruction.to_string());
    }
}

/// Walks the stories of a package and produces sections.
pub(crate) struct StoryBuilder<'a> {
    package: &'a Package,
    options: &'a BuildOptions,
    theme: &'a ThemeFonts,
    resolver: StyleResolver<'a>,
    numbering: Option<&'a Numbering>,
    warnings: Vec<BuildWarning>,
    reported: HashSet<(String, String)>,
    bookmarks: BTreeSet<String>,
}

impl<'a> StoryBuilder<'a> {
    pub fn new(
        package: &'a Package,
        options: &'a BuildOptions,
        theme: &'a ThemeFonts,
        resolver: StyleResolver<'a>,
        numbering: Option<&'a Numbering>,
    ) -> Self {
        Self {
            package,
            options,
            theme,
            resolver,
            numbering,
            warnings: Vec::new(),
            reported: HashSet::new(),
            bookmarks: BTreeSet::new(),
        }
    }

    /// Record a builder diagnostic.
    pub fn warn(&mut self, part: &str, message: impl Into<String>) {
        let warning = BuildWarning::new(part, message);
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Consume the builder, returning diagnostics and collected bookmarks.
    pub fn finish(self) -> (Vec<BuildWarning>, BTreeSet<String>) {
        (self.warnings, self.bookmarks)
    }

    /// Build every section of the main document part.
    pub fn body(&mut self, part: &str, root: &XmlElement, rels: &Relationships) -> Result<Vec<Section>> {
        let body = root.child("body").ok_or_else(|| Error::Malformed {
            part: part.to_string(),
            reason: "missing w:body element".to_string(),
        })?;

        let story = Story {
            part,
            rels,
            region: Region::Body,
        };
        let mut state = BlockState::new(0);
        self.walk_blocks(body, &story, &mut state)?;

        let BlockState {
            blocks,
            breaks,
            final_sect,
            ..
        } = state;
        let mut remaining = blocks.into_iter();
        let mut refs = BTreeMap::new();
        let mut sections = Vec::with_capacity(breaks.len() + 1);
        let mut consumed = 0;

        for (index, (end, sect)) in breaks.iter().enumerate() {
            let chunk: Vec<Block> = remaining.by_ref().take(end - consumed).collect();
            consumed = *end;
            sections.push(self.section(index, chunk, Some(*sect), &story, &mut refs)?);
        }

        let rest: Vec<Block> = remaining.collect();
        if final_sect.is_some() || !rest.is_empty() {
            let index = breaks.len();
            sections.push(self.section(index, rest, final_sect, &story, &mut refs)?);
        }

        log::debug!("{}: {} sections", part, sections.len());
        Ok(sections)
    }

    fn section(
        &mut self,
        index: usize,
        blocks: Vec<Block>,
        sect: Option<&XmlElement>,
        story: &Story,
        refs: &mut BTreeMap<Region, String>,
    ) -> Result<Section> {
        let mut section = Section::new(index);
        section.blocks = blocks;

        // Header/footer references not restated by a section carry over
        // from the previous one.
        if let Some(sect) = sect {
            section.layout = parse_layout(sect);
            for reference in sect.elements() {
                let kind = HeaderFooterKind::from_xml(reference.attr("type").unwrap_or("default"));
                let region = match reference.local() {
                    "headerReference" => Region::Header(kind),
                    "footerReference" => Region::Footer(kind),
                    _ => continue,
                };
                match reference.attr("id").and_then(|id| story.rels.target_part(id)) {
                    Some(target) => {
                        refs.insert(region, target);
                    }
                    None => self.warn(
                        story.part,
                        format!("unresolved {} in section {}", reference.local(), index + 1),
                    ),
                }
            }
        }

        if self.options.include_headers_footers {
            for (region, target) in refs.iter() {
                let Some(content) = self.header_footer(target, index, *region)? else {
                    continue;
                };
                match region {
                    Region::Header(_) => section.headers.push(content),
                    Region::Footer(_) => section.footers.push(content),
                    Region::Body => {}
                }
            }
        }

        Ok(section)
    }

    fn header_footer(
        &mut self,
        part: &str,
        section: usize,
        region: Region,
    ) -> Result<Option<HeaderFooter>> {
        let package = self.package;
        let Some(bytes) = package.part(part) else {
            self.warn(part, "referenced part is missing from the package");
            return Ok(None);
        };
        let root = xml::parse(part, bytes)?;
        let rels = package.relationships(part)?;
        let story = Story {
            part,
            rels: &rels,
            region,
        };
        let mut state = BlockState::new(section);
        self.walk_blocks(&root, &story, &mut state)?;

        let kind = match region {
            Region::Header(kind) | Region::Footer(kind) => kind,
            Region::Body => HeaderFooterKind::Default,
        };
        Ok(Some(HeaderFooter {
            kind,
            part: part.to_string(),
            blocks: state.blocks,
        }))
    }

    fn walk_blocks<'x>(
        &mut self,
        container: &'x XmlElement,
        story: &Story,
        state: &mut BlockState<'x>,
    ) -> Result<()> {
        for el in container.elements() {
            match el.local() {
                "p" => {
                    let coord = state.counters.paragraph(state.section, story.region);
                    let paragraph = self.paragraph(el, story, coord)?;
                    state.blocks.push(Block::Paragraph(paragraph));

                    let sect = el.child("pPr").and_then(|p| p.child("sectPr"));
                    if let (Some(sect), Region::Body) = (sect, story.region) {
                        state.breaks.push((state.blocks.len(), sect));
                        state.section += 1;
                        state.counters = Counters::default();
                    }
                }
                "tbl" => {
                    let coord = state.counters.table(state.section, story.region);
                    let table = self.table(el, story, coord)?;
                    state.blocks.push(Block::Table(table));
                }
                "sdt" => {
                    if let Some(content) = el.child("sdtContent") {
                        self.walk_blocks(content, story, state)?;
                    }
                }
                "customXml" | "ins" | "moveTo" => self.walk_blocks(el, story, state)?,
                "bookmarkStart" => self.bookmark(el, None),
                "sectPr" => state.final_sect = Some(el),
                name if SKIPPED_BLOCK.contains(&name) => {}
                _ => self.unsupported(story.part, el),
            }
        }
        Ok(())
    }

    fn paragraph(&mut self, p: &XmlElement, story: &Story, coord: Coordinate) -> Result<Paragraph> {
        let sheet = self.resolver.sheet();
        let ppr = p.child("pPr");

        let style_id = ppr
            .and_then(|ppr| ppr.child("pStyle"))
            .and_then(|s| s.val())
            .map(str::to_string)
            .or_else(|| {
                sheet
                    .default_of(StyleType::Paragraph)
                    .map(|s| s.id.clone())
            });
        let style = match style_id.as_deref() {
            Some(id) => self.resolver.resolve(id, story.part, &mut self.warnings)?,
            None => None,
        };

        let mut props = ppr.map(parse_paragraph_properties).unwrap_or_default();
        if let Some(style) = &style {
            props.inherit(&style.paragraph);
        }
        props.inherit(&sheet.defaults().paragraph);

        let definition = style_id.as_deref().and_then(|id| sheet.get(id));
        let mut paragraph = Paragraph::new(coord);
        paragraph.role = self.role(definition, &props);
        paragraph.format = ParagraphFormat {
            style_id,
            alignment: props.alignment.unwrap_or_default(),
            space_before: props.space_before.unwrap_or(0.0),
            space_after: props.space_after.unwrap_or(0.0),
            indent_left: props.indent_left.unwrap_or(0.0),
            indent_first_line: props.indent_first_line.unwrap_or(0.0),
        };

        let mut fields = FieldState::default();
        self.inline_content(p, story, &mut paragraph, style.as_ref(), &mut fields)?;
        fields.flush(&mut paragraph.fields);

        let field_links: Vec<HyperlinkTarget> = paragraph
            .fields
            .iter()
            .filter_map(|f| hyperlink_field_target(f))
            .collect();
        for target in field_links {
            paragraph.hyperlinks.push(Hyperlink {
                target,
                text: String::new(),
                first_run: None,
            });
        }

        Ok(paragraph)
    }

    fn role(&self, style: Option<&StyleDefinition>, props: &ParagraphProperties) -> ParagraphRole {
        if let Some(role) = style.and_then(|s| {
            role_from_style_name(s.display_name()).or_else(|| role_from_style_name(&s.id))
        }) {
            return role;
        }
        if let Some(level) = props.outline_level.filter(|l| *l < 9) {
            return ParagraphRole::Heading { level: level + 1 };
        }
        if let Some((num_id, level)) = props.numbering.filter(|(id, _)| *id != 0) {
            if self.numbering.is_some_and(|n| n.contains(num_id)) {
                return ParagraphRole::ListItem { num_id, level };
            }
        }
        ParagraphRole::Body
    }

    fn inline_content(
        &mut self,
        container: &XmlElement,
        story: &Story,
        paragraph: &mut Paragraph,
        style: Option<&ResolvedStyle>,
        fields: &mut FieldState,
    ) -> Result<()> {
        for el in container.elements() {
            match el.local() {
                "r" => self.run(el, story, paragraph, style, fields)?,
                "hyperlink" => {
                    let first = paragraph.runs.len();
                    self.inline_content(el, story, paragraph, style, fields)?;

                    let target = match (el.attr("anchor"), el.attr("id")) {
                        (Some(anchor), _) => Some(HyperlinkTarget::Anchor(anchor.to_string())),
                        (None, Some(id)) => Some(match story.rels.get(id) {
                            Some(rel) => HyperlinkTarget::External(rel.target.clone()),
                            None => HyperlinkTarget::Unresolved(id.to_string()),
                        }),
                        (None, None) => None,
                    };
                    if let Some(target) = target {
                        let text = paragraph.runs[first..]
                            .iter()
                            .map(|r| r.text.as_str())
                            .collect();
                        paragraph.hyperlinks.push(Hyperlink {
                            target,
                            text,
                            first_run: (paragraph.runs.len() > first).then_some(first),
                        });
                    }
                }
                "fldSimple" => {
                    if let Some(instr) = el.attr("instr") {
                        push_field(&mut paragraph.fields, instr);
                    }
                    self.inline_content(el, story, paragraph, style, fields)?;
                }
                "sdt" => {
                    if let Some(content) = el.child("sdtContent") {
                        self.inline_content(content, story, paragraph, style, fields)?;
                    }
                }
                "ins" | "smartTag" | "customXml" | "moveTo" | "dir" | "bdo" => {
                    self.inline_content(el, story, paragraph, style, fields)?
                }
                "bookmarkStart" => self.bookmark(el, Some(paragraph)),
                name if SKIPPED_INLINE.contains(&name) => {}
                _ => self.unsupported(story.part, el),
            }
        }
        Ok(())
    }

    fn run(
        &mut self,
        r: &XmlElement,
        story: &Story,
        paragraph: &mut Paragraph,
        paragraph_style: Option<&ResolvedStyle>,
        fields: &mut FieldState,
    ) -> Result<()> {
        let rpr = r.child("rPr");
        let direct = rpr
            .map(|rpr| parse_run_properties(rpr, self.theme))
            .unwrap_or_default();
        let character_style = match rpr.and_then(|x| x.child("rStyle")).and_then(|s| s.val()) {
            Some(id) => self.resolver.resolve(id, story.part, &mut self.warnings)?,
            None => None,
        };
        let format = self.run_format(&direct, character_style.as_ref(), paragraph_style);

        let mut text = String::new();
        let mut page_break = false;
        for child in r.elements() {
            match child.local() {
                "t" => text.push_str(&child.text()),
                "tab" | "ptab" => text.push('\t'),
                "br" => {
                    if child.attr("type") == Some("page") {
                        page_break = true;
                    } else {
                        text.push('\n');
                    }
                }
                "cr" => text.push('\n'),
                "noBreakHyphen" => text.push('-'),
                "sym" => {
                    if let Some(c) = child
                        .attr("char")
                        .and_then(|c| u32::from_str_radix(c, 16).ok())
                        .and_then(char::from_u32)
                    {
                        text.push(c);
                    }
                }
                "instrText" => fields.instruction(&child.text()),
                "fldChar" => match child.attr("fldCharType") {
                    Some("begin") => fields.begin(),
                    Some("separate") => fields.separate(&mut paragraph.fields),
                    Some("end") => fields.end(&mut paragraph.fields),
                    _ => {}
                },
                _ => {}
            }
        }
        if self.options.normalize_text && !text.is_ascii() {
            text = text.nfc().collect();
        }

        let index = paragraph.runs.len();
        paragraph.runs.push(Run {
            coord: paragraph.coord.with_run(index),
            text,
            format,
            page_break,
        });
        Ok(())
    }

    /// Resolve run formatting: direct, character style, paragraph style,
    /// document defaults, then the configured fallback.
    fn run_format(
        &self,
        direct: &RunProperties,
        character_style: Option<&ResolvedStyle>,
        paragraph_style: Option<&ResolvedStyle>,
    ) -> RunFormat {
        let defaults = &self.resolver.sheet().defaults().run;

        let mut merged = direct.clone();
        for style in [character_style, paragraph_style].into_iter().flatten() {
            merged.inherit(&style.run);
        }
        merged.inherit(defaults);

        let origin = |is_set: fn(&RunProperties) -> bool| {
            if is_set(direct) {
                ValueOrigin::Direct
            } else if [character_style, paragraph_style]
                .into_iter()
                .flatten()
                .any(|s| is_set(&s.run))
            {
                ValueOrigin::Style
            } else if is_set(defaults) {
                ValueOrigin::DocDefaults
            } else {
                ValueOrigin::Fallback
            }
        };

        RunFormat {
            font_origin: origin(|p| p.font_name.is_some()),
            size_origin: origin(|p| p.font_size.is_some()),
            font_name: merged
                .font_name
                .unwrap_or_else(|| self.options.fallback_font.clone()),
            font_size: merged.font_size.unwrap_or(self.options.fallback_font_size),
            bold: merged.bold.unwrap_or(false),
            italic: merged.italic.unwrap_or(false),
            underline: merged.underline.unwrap_or(false),
            color: merged.color,
        }
    }

    fn table(&mut self, tbl: &XmlElement, story: &Story, coord: Coordinate) -> Result<Table> {
        let mut table = Table::new(coord);
        table.style_id = tbl
            .child("tblPr")
            .and_then(|p| p.child("tblStyle"))
            .and_then(|s| s.val())
            .map(str::to_string);
        table.grid_columns = tbl
            .child("tblGrid")
            .map(|g| g.children_named("gridCol").count())
            .unwrap_or(0);

        for (r, tr) in table_rows(tbl).into_iter().enumerate() {
            let row_coord = coord.row(r);
            let is_header = tr
                .child("trPr")
                .and_then(|p| p.child("tblHeader"))
                .is_some_and(|h| h.on_off());

            let mut cells = Vec::new();
            for (c, tc) in row_cells(tr).into_iter().enumerate() {
                let cell_coord = row_coord.cell(c);
                let tcpr = tc.child("tcPr");
                let grid_span = tcpr
                    .and_then(|p| p.child("gridSpan"))
                    .and_then(|g| g.attr_i64("val"))
                    .map(|v| v.max(1) as usize)
                    .unwrap_or(1);
                let merged_continuation = tcpr
                    .and_then(|p| p.child("vMerge"))
                    .is_some_and(|v| v.val() != Some("restart"));

                let mut paragraphs = Vec::new();
                self.cell_content(tc, story, cell_coord, &mut paragraphs)?;
                cells.push(TableCell {
                    coord: cell_coord,
                    paragraphs,
                    grid_span,
                    merged_continuation,
                });
            }

            table.rows.push(TableRow {
                coord: row_coord,
                cells,
                is_header,
            });
        }

        Ok(table)
    }

    fn cell_content(
        &mut self,
        container: &XmlElement,
        story: &Story,
        cell: Coordinate,
        out: &mut Vec<Paragraph>,
    ) -> Result<()> {
        for el in container.elements() {
            match el.local() {
                "p" => {
                    let coord = cell.cell_paragraph(out.len());
                    let paragraph = self.paragraph(el, story, coord)?;
                    out.push(paragraph);
                }
                "tbl" => {
                    let row = cell.table.map(|t| t.row).unwrap_or(0);
                    let column = cell.table.and_then(|t| t.cell).unwrap_or(0);
                    self.warn(
                        story.part,
                        format!(
                            "nested table in section {} table {} row {} cell {} flattened",
                            cell.section + 1,
                            cell.ordinal + 1,
                            row + 1,
                            column + 1
                        ),
                    );
                    for tr in table_rows(el) {
                        for tc in row_cells(tr) {
                            self.cell_content(tc, story, cell, out)?;
                        }
                    }
                }
                "sdt" => {
                    if let Some(content) = el.child("sdtContent") {
                        self.cell_content(content, story, cell, out)?;
                    }
                }
                "customXml" => self.cell_content(el, story, cell, out)?,
                "bookmarkStart" => self.bookmark(el, None),
                name if SKIPPED_BLOCK.contains(&name) => {}
                _ => self.unsupported(story.part, el),
            }
        }
        Ok(())
    }

    fn bookmark(&mut self, el: &XmlElement, paragraph: Option<&mut Paragraph>) {
        let Some(name) = el.attr("name").filter(|n| !n.is_empty()) else {
            return;
        };
        self.bookmarks.insert(name.to_string());
        if let Some(paragraph) = paragraph {
            paragraph.bookmarks.push(name.to_string());
        }
    }

    fn unsupported(&mut self, part: &str, el: &XmlElement) {
        if self.reported.insert((part.to_string(), el.name.clone())) {
            self.warn(part, format!("unsupported element <{}> skipped", el.name));
        }
    }
}

/// Rows of a table, looking through content controls.
fn table_rows(tbl: &XmlElement) -> Vec<&XmlElement> {
    let mut rows = Vec::new();
    collect_named(tbl, "tr", &mut rows);
    rows
}

/// Cells of a row, looking through content controls.
fn row_cells(tr: &XmlElement) -> Vec<&XmlElement> {
    let mut cells = Vec::new();
    collect_named(tr, "tc", &mut cells);
    cells
}

fn collect_named<'x>(container: &'x XmlElement, local: &str, out: &mut Vec<&'x XmlElement>) {
    for el in container.elements() {
        match el.local() {
            name if name == local => out.push(el),
            "sdt" => {
                if let Some(content) = el.child("sdtContent") {
                    collect_named(content, local, out);
                }
            }
            "customXml" => collect_named(el, local, out),
            _ => {}
        }
    }
}

fn parse_layout(sect: &XmlElement) -> PageLayout {
    let mut layout = PageLayout::default();
    if let Some(size) = sect.child("pgSz") {
        layout.width = size.attr_i64("w").unwrap_or(layout.width);
        layout.height = size.attr_i64("h").unwrap_or(layout.height);
        layout.declared_orientation = size.attr("orient").map(|o| match o {
            "landscape" => Orientation::Landscape,
            _ => Orientation::Portrait,
        });
    }
    if let Some(margins) = sect.child("pgMar") {
        let defaults = Margins::default();
        layout.margins = Margins {
            top: margins.attr_i64("top").unwrap_or(defaults.top),
            right: margins.attr_i64("right").unwrap_or(defaults.right),
            bottom: margins.attr_i64("bottom").unwrap_or(defaults.bottom),
            left: margins.attr_i64("left").unwrap_or(defaults.left),
        };
        layout.header_distance = margins.attr_i64("header").unwrap_or(layout.header_distance);
        layout.footer_distance = margins.attr_i64("footer").unwrap_or(layout.footer_distance);
        layout.gutter = margins.attr_i64("gutter").unwrap_or(layout.gutter);
    }
    layout
}

/// Map well-known style names and ids to a structural role.
fn role_from_style_name(name: &str) -> Option<ParagraphRole> {
    let compact: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let level = |rest: &str| rest.parse::<u8>().ok().filter(|l| (1..=9).contains(l));

    match compact.as_str() {
        "title" => Some(ParagraphRole::Heading { level: 0 }),
        "caption" => Some(ParagraphRole::Caption),
        _ => {
            if let Some(level) = compact.strip_prefix("heading").and_then(level) {
                Some(ParagraphRole::Heading { level })
            } else {
                compact
                    .strip_prefix("toc")
                    .and_then(level)
                    .map(|level| ParagraphRole::TocEntry { level })
            }
        }
    }
}

/// Target of a `HYPERLINK` field instruction.
fn hyperlink_field_target(instruction: &str) -> Option<HyperlinkTarget> {
    let tokens = field_tokens(instruction);
    let (keyword, args) = tokens.split_first()?;
    if !keyword.eq_ignore_ascii_case("HYPERLINK") {
        return None;
    }

    let mut url = None;
    let mut anchor = None;
    let mut iter = args.iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "\\l" => anchor = iter.next().cloned(),
            "\\o" | "\\t" | "\\m" => {
                iter.next();
            }
            switch if switch.starts_with('\\') => {}
            value if url.is_none() => url = Some(value.to_string()),
            _ => {}
        }
    }

    match (url, anchor) {
        (Some(url), _) => Some(HyperlinkTarget::External(url)),
        (None, Some(anchor)) => Some(HyperlinkTarget::Anchor(anchor)),
        (None, None) => None,
    }
}

/// Split a field instruction into whitespace-separated tokens, honoring quotes.
fn field_tokens(instruction: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in instruction.chars() {
        match c {
            '"' => {
                if quoted || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_style_name() {
        assert_eq!(
            role_from_style_name("heading 2"),
            Some(ParagraphRole::Heading { level: 2 })
        );
        assert_eq!(
            role_from_style_name("Heading1"),
            Some(ParagraphRole::Heading { level: 1 })
        );
        assert_eq!(
            role_from_style_name("Title"),
            Some(ParagraphRole::Heading { level: 0 })
        );
        assert_eq!(
            role_from_style_name("toc 3"),
            Some(ParagraphRole::TocEntry { level: 3 })
        );
        assert_eq!(role_from_style_name("caption"), Some(ParagraphRole::Caption));
        assert_eq!(role_from_style_name("TOC Heading"), None);
        assert_eq!(role_from_style_name("Heading 12"), None);
        assert_eq!(role_from_style_name("Normal"), None);
    }

    #[test]
    fn test_hyperlink_field_target() {
        assert_eq!(
            hyperlink_field_target(r#"HYPERLINK "https://example.com" \o "tip""#),
            Some(HyperlinkTarget::External("https://example.com".into()))
        );
        assert_eq!(
            hyperlink_field_target(r#" HYPERLINK \l "_Toc123" "#),
            Some(HyperlinkTarget::Anchor("_Toc123".into()))
        );
        assert_eq!(hyperlink_field_target(r#"PAGEREF _Toc123 \h"#), None);
    }

    #[test]
    fn test_field_state() {
        let mut fields = Vec::new();
        let mut state = FieldState::default();
        state.begin();
        state.instruction(" TOC \\o ");
        state.instruction("\"1-3\" \\h ");
        state.separate(&mut fields);
        state.begin();
        state.instruction("PAGEREF _Toc1 \\h");
        state.end(&mut fields);
        state.flush(&mut fields);
        assert_eq!(fields, vec!["TOC \\o \"1-3\" \\h", "PAGEREF _Toc1 \\h"]);
    }

    #[test]
    fn test_parse_layout() {
        let sect = xml::parse(
            "word/document.xml",
            br#"<w:sectPr xmlns:w="w"><w:pgSz w:w="15840" w:h="12240" w:orient="landscape"/>
<w:pgMar w:top="720" w:right="1440" w:bottom="1440" w:left="1080" w:header="360" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        )
        .unwrap();
        let layout = parse_layout(&sect);
        assert_eq!(layout.orientation(), Orientation::Landscape);
        assert_eq!(layout.margins.top, 720);
        assert_eq!(layout.margins.left, 1080);
        assert_eq!(layout.header_distance, 360);
    }
}
