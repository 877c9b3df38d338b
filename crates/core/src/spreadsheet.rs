//! Spreadsheet reading for imports and the downloadable import template.
//!
//! Workbooks (`.xlsx`, `.xls`) are read with calamine, `.csv` with the csv
//! crate. Both produce plain rows of trimmed-later strings so the import
//! logic never sees cell types.

use std::io::{Cursor, Write};

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::CoreError;
use crate::import::{OPTIONAL_COLUMNS, REQUIRED_COLUMNS};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const TEMPLATE_FILE_NAME: &str = "company_template.xlsx";

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Xls,
    Csv,
}

impl SheetFormat {
    /// Pick the format from an uploaded file name.
    pub fn from_file_name(name: &str) -> Result<Self, CoreError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(SheetFormat::Xlsx),
            "xls" => Ok(SheetFormat::Xls),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(CoreError::Validation(
                "The file field must be a file of type: xlsx, xls, csv.".to_string(),
            )),
        }
    }
}

/// Read the first sheet of an uploaded file into rows of cell text.
pub fn read_rows(format: SheetFormat, bytes: &[u8]) -> Result<Vec<Vec<String>>, CoreError> {
    match format {
        SheetFormat::Csv => read_csv(bytes),
        SheetFormat::Xlsx | SheetFormat::Xls => read_workbook(bytes),
    }
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, CoreError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| CoreError::Validation(format!("Unable to read the spreadsheet: {e}")))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => {
            range.map_err(|e| CoreError::Validation(format!("Unable to read the sheet: {e}")))?
        }
        None => return Ok(Vec::new()),
    };

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| CoreError::Validation(format!("Unable to read the CSV file: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        // Whole numbers (pincodes, phone numbers) come back as floats.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({e:?})"),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Header labels of the import template, required columns first.
pub fn template_headers() -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .chain(OPTIONAL_COLUMNS.iter())
        .map(|c| c.label)
        .collect()
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Companies" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Build the import template workbook: one sheet holding the header row.
pub fn template_xlsx() -> Result<Vec<u8>, CoreError> {
    let sheet = sheet_xml(&template_headers());

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("xl/workbook.xml", WORKBOOK_XML),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    for (name, body) in parts {
        zip.start_file(name, options)
            .map_err(|e| CoreError::Internal(format!("template zip: {e}")))?;
        zip.write_all(body.as_bytes())
            .map_err(|e| CoreError::Internal(format!("template write: {e}")))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| CoreError::Internal(format!("template finish: {e}")))?;
    Ok(cursor.into_inner())
}

fn sheet_xml(headers: &[&str]) -> String {
    let mut cells = String::new();
    for (index, label) in headers.iter().enumerate() {
        cells.push_str(&format!(
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letters(index),
            xml_escape(label)
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1">{cells}</row></sheetData></worksheet>"#
    )
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA).
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import;
    use assert_matches::assert_matches;

    #[test]
    fn format_from_extension() {
        assert_eq!(SheetFormat::from_file_name("a.XLSX").unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_file_name("a.b.csv").unwrap(), SheetFormat::Csv);
        assert_matches!(SheetFormat::from_file_name("a.pdf"), Err(CoreError::Validation(_)));
        assert_matches!(SheetFormat::from_file_name("noext"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
    }

    #[test]
    fn csv_rows_keep_ragged_lengths_and_drop_bom() {
        let data = "\u{feff}Company Name,State\nAcme,Kerala,extra\n\nBeta\n";
        let rows = read_rows(SheetFormat::Csv, data.as_bytes()).unwrap();
        assert_eq!(rows[0], vec!["Company Name", "State"]);
        assert_eq!(rows[1], vec!["Acme", "Kerala", "extra"]);
        assert_eq!(rows.last().unwrap(), &vec!["Beta".to_string()]);
    }

    #[test]
    fn garbage_workbook_is_a_validation_error() {
        assert_matches!(
            read_rows(SheetFormat::Xlsx, b"definitely not a zip"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn template_reads_back_with_required_headers() {
        let bytes = template_xlsx().unwrap();
        let rows = read_rows(SheetFormat::Xlsx, &bytes).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), template_headers().len());

        // A header-only template maps cleanly but carries no data rows.
        assert!(import::ColumnMap::from_header(&rows[0]).is_ok());
        assert_matches!(import::prepare(&rows), Err(CoreError::Validation(_)));
    }

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(cell_to_string(&Data::Float(682001.0)), "682001");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
