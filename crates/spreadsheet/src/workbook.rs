//! Loading, listing and rewriting the translatable text of a workbook.
//!
//! Text lives in two places: the shared-string table (`t="s"` cells) and
//! inline in the worksheet (`t="inlineStr"` cells). Element names may carry
//! a namespace prefix (`<x:si>`, `<x:c>`), as some writers emit.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::xml::{attribute, escape_text, unescape};

/// Archive path of the workbook part.
const WORKBOOK_PART: &str = "xl/workbook.xml";
/// Archive path of the workbook relationships.
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
/// Shared-string part used when the relationships do not name one.
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

const REL_TYPE_WORKSHEET: &str = "/worksheet";
const REL_TYPE_SHARED_STRINGS: &str = "/sharedStrings";

static SHEET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:\w+:)?sheet\b([^>]*?)/?>").expect("valid sheet regex"));
static RELATIONSHIP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:\w+:)?Relationship\b([^>]*?)/?>").expect("valid relationship regex")
});
static STRING_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(\w+:)?si\b[^>]*?(?:/>|>(.*?)</(?:\w+:)?si>)").expect("valid si regex")
});
static INLINE_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(\w+:)?is\b[^>]*?(?:/>|>(.*?)</(?:\w+:)?is>)").expect("valid is regex")
});
static PHONETIC_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?rPh\b.*?</(?:\w+:)?rPh>").expect("valid rPh regex")
});
static TEXT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?t\b[^>]*?(?:/>|>(.*?)</(?:\w+:)?t>)").expect("valid t regex")
});
static CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?c\b([^>]*?)(?:/>|>(.*?)</(?:\w+:)?c>)").expect("valid cell regex")
});
static CELL_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(?:\w+:)?v\b[^>]*>(.*?)</(?:\w+:)?v>").expect("valid value regex")
});

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable workbook archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed workbook: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One unit of translation: a distinct shared string (listed at the first
/// cell that displays it) or a single inline-string cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableCell {
    /// Name of the sheet holding the cell.
    pub sheet: String,
    /// A1-style coordinate of the cell.
    pub coordinate: String,
    /// Current text.
    pub text: String,
    /// Style index (`s` attribute) of the cell.
    pub style: Option<u32>,
    source: TextSource,
}

/// Where a translatable text is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TextSource {
    /// Index into the shared-string table.
    Shared(usize),
    /// The `<is>` element of a cell inside worksheet part `part`.
    Inline { part: String, span: Range<usize> },
}

/// A string element (`<si>` or `<is>`) located in its part.
#[derive(Debug)]
struct StringItem {
    /// Byte range of the whole element.
    span: Range<usize>,
    /// Namespace prefix including the colon, empty when unprefixed.
    prefix: String,
    text: String,
}

impl StringItem {
    fn from_captures(caps: &regex::Captures<'_>, offset: usize) -> Self {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        Self {
            span: whole.start + offset..whole.end + offset,
            prefix: caps.get(1).map_or("", |m| m.as_str()).to_string(),
            text: item_text(caps.get(2).map_or("", |m| m.as_str())),
        }
    }
}

#[derive(Debug)]
struct SharedStrings {
    part: String,
    xml: String,
    items: Vec<StringItem>,
}

/// An opened workbook with its translatable strings indexed.
///
/// Strings shared by several cells are listed once and translated once.
#[derive(Debug)]
pub struct Workbook {
    archive: Vec<u8>,
    shared: Option<SharedStrings>,
    /// Worksheet parts holding inline strings, with their `<is>` prefixes.
    inline_parts: HashMap<String, InlinePart>,
    cells: Vec<TranslatableCell>,
    /// New text by cell index.
    replacements: HashMap<usize, String>,
}

#[derive(Debug)]
struct InlinePart {
    xml: String,
    /// Prefix of each `<is>` element, by start offset.
    prefixes: HashMap<usize, String>,
}

impl Workbook {
    /// Read and index the workbook at `path`.
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    /// Index a workbook held in memory.
    pub fn from_bytes(archive: Vec<u8>) -> Result<Self, WorkbookError> {
        let mut zip = ZipArchive::new(Cursor::new(archive.as_slice()))?;

        let workbook_xml = read_part(&mut zip, WORKBOOK_PART)?
            .ok_or_else(|| WorkbookError::Malformed(format!("missing {WORKBOOK_PART}")))?;
        let rels_xml = read_part(&mut zip, WORKBOOK_RELS_PART)?.unwrap_or_default();
        let rels = parse_relationships(&rels_xml);

        let shared_part = rels
            .values()
            .find(|rel| rel.kind.ends_with(REL_TYPE_SHARED_STRINGS))
            .map(|rel| resolve_target(&rel.target))
            .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PART.to_string());

        let shared = read_part(&mut zip, &shared_part)?
            .map(|xml| parse_shared_strings(shared_part, xml));

        let mut cells = Vec::new();
        let mut inline_parts = HashMap::new();
        let mut seen = HashSet::new();
        for (sheet_name, sheet_part) in sheet_parts(&workbook_xml, &rels) {
            let Some(sheet_xml) = read_part(&mut zip, &sheet_part)? else {
                tracing::warn!(sheet = %sheet_name, part = %sheet_part, "Worksheet part missing");
                continue;
            };
            let mut sheet = SheetScan {
                name: &sheet_name,
                part: &sheet_part,
                shared: shared.as_ref(),
                seen: &mut seen,
                prefixes: HashMap::new(),
            };
            sheet.collect(&sheet_xml, &mut cells);
            if !sheet.prefixes.is_empty() {
                let prefixes = sheet.prefixes;
                inline_parts.insert(sheet_part, InlinePart { xml: sheet_xml, prefixes });
            }
        }

        drop(zip);
        Ok(Self {
            archive,
            shared,
            inline_parts,
            cells,
            replacements: HashMap::new(),
        })
    }

    /// Cells with non-blank text, in sheet order then document order.
    pub fn translatable_cells(&self) -> &[TranslatableCell] {
        &self.cells
    }

    /// Replace the text of the `index`-th translatable cell.
    ///
    /// Every cell sharing the string shows the new text.
    pub fn set_cell_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), WorkbookError> {
        let cell = self.cells.get_mut(index).ok_or_else(|| {
            WorkbookError::Malformed(format!("no translatable cell at index {index}"))
        })?;
        let text = text.into();
        cell.text.clone_from(&text);
        self.replacements.insert(index, text);
        Ok(())
    }

    /// Write the workbook, with replacements applied, to `path`.
    pub fn save(&self, path: &Path) -> Result<(), WorkbookError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize the workbook with replacements applied.
    ///
    /// Parts without replaced text are copied without recompression.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WorkbookError> {
        let rewritten = self.rewritten_parts();
        let mut source = ZipArchive::new(Cursor::new(self.archive.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(self.archive.len())));

        for i in 0..source.len() {
            let entry = source.by_index_raw(i)?;
            match rewritten.get(entry.name()) {
                Some(xml) => {
                    let options =
                        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                    writer
                        .start_file(entry.name().to_string(), options)
                        .map_err(WorkbookError::from)?;
                    writer.write_all(xml.as_bytes())?;
                }
                None => writer.raw_copy_file(entry)?,
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    /// New contents of every part touched by a replacement.
    fn rewritten_parts(&self) -> HashMap<String, String> {
        let mut shared_edits: Vec<(usize, &str)> = Vec::new();
        let mut inline_edits: HashMap<&str, Vec<(Range<usize>, &str)>> = HashMap::new();
        for (&index, text) in &self.replacements {
            match &self.cells[index].source {
                TextSource::Shared(item) => shared_edits.push((*item, text.as_str())),
                TextSource::Inline { part, span } => inline_edits
                    .entry(part.as_str())
                    .or_default()
                    .push((span.clone(), text.as_str())),
            }
        }

        let mut parts = HashMap::new();
        if let Some(shared) = self.shared.as_ref().filter(|_| !shared_edits.is_empty()) {
            let edits = shared_edits
                .into_iter()
                .filter_map(|(item, text)| shared.items.get(item).map(|i| (i, text)))
                .map(|(item, text)| (item.span.clone(), string_element("si", &item.prefix, text)))
                .collect();
            parts.insert(shared.part.clone(), splice(&shared.xml, edits));
        }
        for (part, edits) in inline_edits {
            let Some(sheet) = self.inline_parts.get(part) else {
                continue;
            };
            let edits = edits
                .into_iter()
                .map(|(span, text)| {
                    let prefix = sheet.prefixes.get(&span.start).map_or("", String::as_str);
                    (span, string_element("is", prefix, text))
                })
                .collect();
            parts.insert(part.to_string(), splice(&sheet.xml, edits));
        }
        parts
    }
}

/// `<{prefix}{tag}><{prefix}t xml:space="preserve">text</{prefix}t></{prefix}{tag}>`
fn string_element(tag: &str, prefix: &str, text: &str) -> String {
    format!(
        r#"<{prefix}{tag}><{prefix}t xml:space="preserve">{}</{prefix}t></{prefix}{tag}>"#,
        escape_text(text)
    )
}

/// Replace non-overlapping byte ranges of `xml`.
fn splice(xml: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);
    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        out.push_str(&xml[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&xml[cursor..]);
    out
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

struct Relationship {
    kind: String,
    target: String,
}

fn read_part<R: Read + std::io::Seek>(
    zip: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, WorkbookError> {
    let mut file = match zip.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| WorkbookError::Malformed(format!("{name} is not UTF-8 XML: {e}")))?;
    Ok(Some(xml))
}

fn parse_relationships(xml: &str) -> HashMap<String, Relationship> {
    RELATIONSHIP_TAG
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = &caps[1];
            let id = attribute(attrs, "Id")?;
            Some((
                id,
                Relationship {
                    kind: attribute(attrs, "Type").unwrap_or_default(),
                    target: attribute(attrs, "Target")?,
                },
            ))
        })
        .collect()
}

/// Archive path of a relationship target declared relative to `xl/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target.trim_start_matches("./")),
    }
}

/// `(sheet name, archive path)` for every worksheet, in workbook order.
fn sheet_parts(workbook_xml: &str, rels: &HashMap<String, Relationship>) -> Vec<(String, String)> {
    SHEET_TAG
        .captures_iter(workbook_xml)
        .filter_map(|caps| {
            let attrs = &caps[1];
            let name = attribute(attrs, "name")?;
            let rel = rels.get(&attribute(attrs, "r:id")?)?;
            // Chartsheets and dialog sheets carry no cells to translate.
            rel.kind
                .ends_with(REL_TYPE_WORKSHEET)
                .then(|| (name, resolve_target(&rel.target)))
        })
        .collect()
}

fn parse_shared_strings(part: String, xml: String) -> SharedStrings {
    let items = STRING_ITEM
        .captures_iter(&xml)
        .map(|caps| StringItem::from_captures(&caps, 0))
        .collect();
    SharedStrings { part, xml, items }
}

/// Plain text of a `<si>`/`<is>` body: all runs concatenated, phonetic hints dropped.
fn item_text(body: &str) -> String {
    let body = PHONETIC_RUN.replace_all(body, "");
    TEXT_RUN
        .captures_iter(&body)
        .filter_map(|caps| caps.get(1))
        .map(|m| unescape(m.as_str()).into_owned())
        .collect()
}

/// Walks one worksheet, collecting its translatable cells.
struct SheetScan<'a> {
    name: &'a str,
    part: &'a str,
    shared: Option<&'a SharedStrings>,
    /// Shared-string indexes already listed by an earlier cell.
    seen: &'a mut HashSet<usize>,
    /// Prefix of every collected `<is>` element, by start offset.
    prefixes: HashMap<usize, String>,
}

impl SheetScan<'_> {
    fn collect(&mut self, sheet_xml: &str, cells: &mut Vec<TranslatableCell>) {
        for caps in CELL.captures_iter(sheet_xml) {
            let attrs = &caps[1];
            let body = caps.get(2);
            let found = match attribute(attrs, "t").as_deref() {
                Some("s") => body.and_then(|b| self.shared_text(b.as_str())),
                Some("inlineStr") => body.and_then(|b| self.inline_text(b)),
                _ => None,
            };
            let Some((text, source)) = found else {
                continue;
            };
            cells.push(TranslatableCell {
                sheet: self.name.to_string(),
                coordinate: attribute(attrs, "r").unwrap_or_default(),
                text,
                style: attribute(attrs, "s").and_then(|s| s.parse().ok()),
                source,
            });
        }
    }

    fn shared_text(&mut self, body: &str) -> Option<(String, TextSource)> {
        let shared = self.shared?;
        let index = CELL_VALUE
            .captures(body)
            .and_then(|v| v[1].trim().parse::<usize>().ok())?;
        let Some(item) = shared.items.get(index) else {
            tracing::warn!(sheet = self.name, index, "Cell references a missing shared string");
            return None;
        };
        if item.text.trim().is_empty() || !self.seen.insert(index) {
            return None;
        }
        Some((item.text.clone(), TextSource::Shared(index)))
    }

    fn inline_text(&mut self, body: regex::Match<'_>) -> Option<(String, TextSource)> {
        let caps = INLINE_STRING.captures(body.as_str())?;
        let item = StringItem::from_captures(&caps, body.start());
        if item.text.trim().is_empty() {
            return None;
        }
        self.prefixes.insert(item.span.start, item.prefix);
        Some((
            item.text,
            TextSource::Inline {
                part: self.part.to_string(),
                span: item.span,
            },
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
