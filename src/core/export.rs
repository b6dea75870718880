use crate::domain::model::{CompanyRecord, ExportFormat};
use crate::utils::error::{FinderError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SHEET_NAME: &str = "companies";
const COLUMNS: [&str; 2] = ["name", "url"];

pub fn render(format: ExportFormat, records: &[CompanyRecord]) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Xlsx => to_xlsx(records),
    }
}

/// CSV with a `name,url` header row.
pub fn to_csv(records: &[CompanyRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if records.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| FinderError::IoError(e.into_error()))
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // XML 1.0 forbids most control characters
            c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn inline_cell(reference: String, value: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        escape_xml(value)
    )
}

fn sheet_row(row: usize, values: [&str; 2]) -> String {
    let cells: String = ["A", "B"]
        .iter()
        .zip(values)
        .map(|(column, value)| inline_cell(format!("{}{}", column, row), value))
        .collect();
    format!(r#"<row r="{}">{}</row>"#, row, cells)
}

fn worksheet_xml(records: &[CompanyRecord]) -> String {
    let mut rows = vec![sheet_row(1, COLUMNS)];
    rows.extend(
        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                sheet_row(i + 2, [record.name.as_str(), record.url.as_str()])
            }),
    );
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows.concat()
    )
}

/// Single-sheet Office Open XML workbook with inline string cells.
pub fn to_xlsx(records: &[CompanyRecord]) -> Result<Vec<u8>> {
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(records)),
    ];

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(name, SimpleFileOptions::default())?;
        zip.write_all(content.as_bytes())?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Two aligned columns for terminal display.
pub fn render_table(records: &[CompanyRecord]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.name.chars().count())
        .chain(std::iter::once(COLUMNS[0].len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!("{:<width$}  {}", COLUMNS[0], COLUMNS[1], width = name_width),
        format!("{}  {}", "-".repeat(name_width), "-".repeat(COLUMNS[1].len())),
    ];
    lines.extend(
        records
            .iter()
            .map(|r| format!("{:<width$}  {}", r.name, r.url, width = name_width)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn records() -> Vec<CompanyRecord> {
        vec![
            CompanyRecord {
                name: "Acme, Inc.".to_string(),
                url: "https://www.linkedin.com/company/acme".to_string(),
            },
            CompanyRecord {
                name: "Smith & <Sons>".to_string(),
                url: "https://www.linkedin.com/company/smith-sons".to_string(),
            },
        ]
    }

    fn read_part(xlsx: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(xlsx)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_csv_has_header_and_quotes_commas() {
        let csv = String::from_utf8(to_csv(&records()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "name,url");
        assert_eq!(lines[1], "\"Acme, Inc.\",https://www.linkedin.com/company/acme");
        assert_eq!(lines[2], "Smith & <Sons>,https://www.linkedin.com/company/smith-sons");
    }

    #[test]
    fn test_csv_empty_still_has_header() {
        let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv, "name,url\n");
    }

    #[test]
    fn test_xlsx_package_parts() {
        let xlsx = to_xlsx(&records()).unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(xlsx)).unwrap();

        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn test_xlsx_sheet_content_is_escaped() {
        let xlsx = to_xlsx(&records()).unwrap();
        let workbook = read_part(xlsx.clone(), "xl/workbook.xml");
        let sheet = read_part(xlsx, "xl/worksheets/sheet1.xml");

        assert!(workbook.contains(r#"<sheet name="companies""#));
        assert!(sheet.contains(r#"<row r="1">"#));
        assert!(sheet.contains(">name</t>"));
        assert!(sheet.contains(r#"<c r="A3" t="inlineStr">"#));
        assert!(sheet.contains("Smith &amp; &lt;Sons&gt;"));
        assert!(!sheet.contains("<Sons>"));
    }

    #[test]
    fn test_escape_drops_control_characters() {
        assert_eq!(escape_xml("a\u{0}b\tc"), "ab\tc");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(&records());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("name            url"));
        assert!(lines[2].starts_with("Acme, Inc.      https://"));
        assert!(lines[3].starts_with("Smith & <Sons>  https://"));
    }
}
