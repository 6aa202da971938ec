//! Minimal XLSX packages built at test time.
//!
//! Cell style 1 carries the built-in date number format (id 14), so a
//! numeric cell written with `s="1"` reads back as a date.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Inline text cell
pub fn text(r: &str, value: &str) -> String {
    format!(r#"<c r="{r}" t="inlineStr"><is><t>{value}</t></is></c>"#)
}

/// Plain numeric cell
pub fn num(r: &str, value: f64) -> String {
    format!(r#"<c r="{r}"><v>{value}</v></c>"#)
}

/// Numeric cell with the date format
pub fn date(r: &str, serial: f64) -> String {
    format!(r#"<c r="{r}" s="1"><v>{serial}</v></c>"#)
}

/// Styled cell with no value
pub fn styled_blank(r: &str) -> String {
    format!(r#"<c r="{r}" s="1"/>"#)
}

/// Boolean cell
pub fn boolean(r: &str, value: bool) -> String {
    format!(r#"<c r="{r}" t="b"><v>{}</v></c>"#, u8::from(value))
}

/// Error cell
pub fn error(r: &str, code: &str) -> String {
    format!(r#"<c r="{r}" t="e"><v>{code}</v></c>"#)
}

/// Numeric formula cell with its cached result
pub fn formula(r: &str, expression: &str, cached: f64) -> String {
    format!(r#"<c r="{r}"><f>{expression}</f><v>{cached}</v></c>"#)
}

/// A `<row>` element (1-based row number, as in the file format)
pub fn row(number: u32, cells: &[String]) -> String {
    format!(r#"<row r="{number}">{}</row>"#, cells.concat())
}

/// Build an XLSX package from `(sheet name, rows xml)` pairs
pub fn build_xlsx(sheets: &[(&str, Vec<String>)]) -> Vec<u8> {
    build_package(sheets, false)
}

/// Build an XLSX package that uses the 1904 date system
pub fn build_xlsx_1904(sheets: &[(&str, Vec<String>)]) -> Vec<u8> {
    build_package(sheets, true)
}

fn build_package(sheets: &[(&str, Vec<String>)], date1904: bool) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let overrides: String = (1..=sheets.len())
        .map(|i| {
            format!(
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            )
        })
        .collect();
    zip.start_file("[Content_Types].xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
  <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
  {overrides}
</Types>"#
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#).unwrap();

    let sheet_entries: String = sheets
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            format!(
                r#"<sheet name="{name}" sheetId="{id}" r:id="rId{id}"/>"#,
                id = i + 1
            )
        })
        .collect();
    let workbook_pr = if date1904 {
        r#"<workbookPr date1904="1"/>"#
    } else {
        ""
    };
    zip.start_file("xl/workbook.xml", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  {workbook_pr}
  <sheets>{sheet_entries}</sheets>
</workbook>"#
    )
    .unwrap();

    let sheet_rels: String = (1..=sheets.len())
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
            )
        })
        .collect();
    zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
    write!(
        zip,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  {sheet_rels}
  <Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
    )
    .unwrap();

    zip.start_file("xl/styles.xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
  <fills count="1"><fill><patternFill patternType="none"/></fill></fills>
  <borders count="1"><border/></borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="2">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
  </cellXfs>
</styleSheet>"#).unwrap();

    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
            .unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData>{}</sheetData>
</worksheet>"#,
            rows.concat()
        )
        .unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

/// Write an XLSX package into `dir` and return its path
pub fn write_xlsx(dir: &Path, file_name: &str, sheets: &[(&str, Vec<String>)]) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, build_xlsx(sheets)).unwrap();
    path
}

/// `People`: Name/Age with Alice (30) and Bob (age cell missing)
pub fn people_sheet() -> (&'static str, Vec<String>) {
    (
        "People",
        vec![
            row(1, &[text("A1", "Name"), text("B1", "Age")]),
            row(2, &[text("A2", "Alice"), num("B2", 30.0)]),
            row(3, &[text("A3", "Bob")]),
        ],
    )
}

/// `Letters`: header A, B, C and one data row
pub fn letters_sheet() -> (&'static str, Vec<String>) {
    (
        "Letters",
        vec![
            row(1, &[text("A1", "A"), text("B1", "B"), text("C1", "C")]),
            row(2, &[num("A2", 1.0), num("B2", 2.0), num("C2", 3.0)]),
        ],
    )
}

/// `Mixed`: one row covering every cell kind
pub fn mixed_sheet() -> (&'static str, Vec<String>) {
    (
        "Mixed",
        vec![
            row(
                1,
                &[
                    text("A1", "When"),
                    text("B1", "Serial"),
                    text("C1", "Double"),
                    text("D1", "Flag"),
                    text("E1", "Broken"),
                ],
            ),
            row(
                2,
                &[
                    date("A2", 45000.5),
                    num("B2", 45000.5),
                    formula("C2", "B2*2", 90001.0),
                    boolean("D2", true),
                    error("E2", "#DIV/0!"),
                ],
            ),
        ],
    )
}
