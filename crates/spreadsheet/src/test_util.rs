//! Builders for small in-memory workbooks used by tests across the workspace.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// A cell in a fixture sheet.
pub struct Cell {
    pub coordinate: &'static str,
    pub value: CellValue,
    pub style: Option<u32>,
}

pub enum CellValue {
    /// Stored in the shared-string table.
    Text(&'static str),
    /// Stored in the cell itself (`t="inlineStr"`).
    Inline(&'static str),
    /// Stored inline as a number.
    Number(&'static str),
}

impl Cell {
    pub fn text(coordinate: &'static str, text: &'static str, style: Option<u32>) -> Self {
        Self {
            coordinate,
            value: CellValue::Text(text),
            style,
        }
    }

    pub fn inline(coordinate: &'static str, text: &'static str, style: Option<u32>) -> Self {
        Self {
            coordinate,
            value: CellValue::Inline(text),
            style,
        }
    }

    pub fn number(coordinate: &'static str, value: &'static str) -> Self {
        Self {
            coordinate,
            value: CellValue::Number(value),
            style: None,
        }
    }
}

pub struct Sheet {
    pub name: &'static str,
    pub cells: Vec<Cell>,
    /// Merged ranges such as `"A1:C1"`.
    pub merges: Vec<&'static str>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Row number of an A1-style coordinate.
fn row_of(coordinate: &str) -> u32 {
    coordinate
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .unwrap_or(1)
}

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="14"/><name val="Calibri"/></font></fonts><fills count="1"><fill><patternFill patternType="none"/></fill></fills><borders count="1"><border/></borders><cellXfs count="3"><xf fontId="0"/><xf fontId="1" applyFont="1"/><xf fontId="0" applyAlignment="1"><alignment wrapText="1"/></xf></cellXfs></styleSheet>"#;

/// Serialize `sheets` as a minimal but valid `.xlsx` archive.
///
/// Identical texts share one shared-string entry, like a real spreadsheet
/// application writes them.
pub fn xlsx(sheets: &[Sheet]) -> Vec<u8> {
    let mut strings: Vec<&str> = Vec::new();
    let mut sheet_xmls = Vec::new();
    let mut references = 0usize;

    for sheet in sheets {
        let mut rows: Vec<(u32, String)> = Vec::new();
        for cell in &sheet.cells {
            let style = cell.style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
            let xml = match cell.value {
                CellValue::Text(text) => {
                    references += 1;
                    let index = match strings.iter().position(|s| *s == text) {
                        Some(i) => i,
                        None => {
                            strings.push(text);
                            strings.len() - 1
                        }
                    };
                    format!(r#"<c r="{}"{style} t="s"><v>{index}</v></c>"#, cell.coordinate)
                }
                CellValue::Inline(text) => format!(
                    r#"<c r="{}"{style} t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                    cell.coordinate,
                    escape(text)
                ),
                CellValue::Number(value) => {
                    format!(r#"<c r="{}"{style}><v>{value}</v></c>"#, cell.coordinate)
                }
            };
            let row = row_of(cell.coordinate);
            match rows.iter_mut().find(|(r, _)| *r == row) {
                Some((_, body)) => body.push_str(&xml),
                None => rows.push((row, xml)),
            }
        }
        rows.sort_by_key(|(r, _)| *r);

        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (row, cells) in rows {
            xml.push_str(&format!(r#"<row r="{row}">{cells}</row>"#));
        }
        xml.push_str("</sheetData>");
        if !sheet.merges.is_empty() {
            xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges.len()));
            for range in &sheet.merges {
                xml.push_str(&format!(r#"<mergeCell ref="{range}"/>"#));
            }
            xml.push_str("</mergeCells>");
        }
        xml.push_str("</worksheet>");
        sheet_xmls.push(xml);
    }

    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut overrides = String::new();
    for (i, sheet) in sheets.iter().enumerate() {
        let n = i + 1;
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape(sheet.name)
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
        overrides.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    workbook.push_str("</sheets></workbook>");
    let styles_id = sheets.len() + 1;
    rels.push_str(&format!(
        r#"<Relationship Id="rId{styles_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));

    let shared = if strings.is_empty() {
        None
    } else {
        let shared_id = sheets.len() + 2;
        rels.push_str(&format!(
            r#"<Relationship Id="rId{shared_id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#
        ));
        overrides.push_str(
            r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{references}" uniqueCount="{}">"#,
            strings.len()
        );
        for text in &strings {
            xml.push_str(&format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(text)));
        }
        xml.push_str("</sst>");
        Some(xml)
    };
    rels.push_str("</Relationships>");

    let content_types = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>{overrides}</Types>"#
    );
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    let mut parts: Vec<(String, String)> = vec![
        ("[Content_Types].xml".into(), content_types),
        ("_rels/.rels".into(), root_rels.into()),
        ("xl/workbook.xml".into(), workbook),
        ("xl/_rels/workbook.xml.rels".into(), rels),
        ("xl/styles.xml".into(), STYLES_XML.into()),
    ];
    for (i, xml) in sheet_xmls.into_iter().enumerate() {
        parts.push((format!("xl/worksheets/sheet{}.xml", i + 1), xml));
    }
    if let Some(xml) = shared {
        parts.push(("xl/sharedStrings.xml".into(), xml));
    }

    let entries: Vec<(&str, &str)> = parts.iter().map(|(n, x)| (n.as_str(), x.as_str())).collect();
    archive(&entries)
}

/// Zip `(entry name, contents)` pairs into an archive, in order.
pub fn archive(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, xml) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start fixture entry");
        writer.write_all(xml.as_bytes()).expect("write fixture entry");
    }
    writer.finish().expect("finish fixture archive").into_inner()
}

/// Text of archive entry `name`.
pub fn read_part(archive: &[u8], name: &str) -> String {
    let mut zip = ZipArchive::new(Cursor::new(archive)).expect("open fixture archive");
    let mut file = zip.by_name(name).expect("fixture entry exists");
    let mut xml = String::new();
    file.read_to_string(&mut xml).expect("fixture entry is UTF-8");
    xml
}

/// Write a one-sheet workbook holding `texts` in column A to `path`.
pub fn write_column(path: &std::path::Path, sheet: &'static str, texts: &[&'static str]) {
    const ROWS: [&str; 10] = ["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10"];
    let cells = texts
        .iter()
        .zip(ROWS)
        .map(|(text, coordinate)| Cell::text(coordinate, *text, None))
        .collect();
    let bytes = xlsx(&[Sheet {
        name: sheet,
        cells,
        merges: vec![],
    }]);
    std::fs::write(path, bytes).expect("write fixture workbook");
}
