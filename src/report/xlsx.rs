//! Spreadsheet encoder for the case-list report
//!
//! An XLSX package is a zip container of SpreadsheetML parts; this encoder
//! assembles the minimal part set (content types, relationships, workbook,
//! styles, one "Chamados" worksheet) in memory. Cell values are inline
//! strings, so the worksheet is self-contained.

use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::models::Inspection;
use crate::report::{header_labels, row_values, ExportError};

pub fn render(records: &[Inspection]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(WORKBOOK.as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(WORKBOOK_RELS.as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(worksheet_xml(records).as_bytes())?;

        zip.finish()?;
    }
    Ok(buffer.into_inner())
}

fn worksheet_xml(records: &[Inspection]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>",
    );

    push_row(&mut xml, 1, &header_labels());
    for (index, record) in records.iter().enumerate() {
        let values = row_values(record);
        let refs: Vec<&str> = values.iter().map(|v| v.as_str()).collect();
        push_row(&mut xml, index + 2, &refs);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row(xml: &mut String, row: usize, values: &[&str]) {
    xml.push_str(&format!("<row r=\"{}\">", row));
    for (col, value) in values.iter().enumerate() {
        xml.push_str(&format!(
            "<c r=\"{}{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
            column_ref(col),
            row,
            xml_escape(value)
        ));
    }
    xml.push_str("</row>");
}

/// 0-based column index to spreadsheet letters (0 → A, 25 → Z, 26 → AA).
fn column_ref(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap()
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
<Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
</Types>";

const ROOT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
</Relationships>";

const WORKBOOK: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
<sheets><sheet name=\"Chamados\" sheetId=\"1\" r:id=\"rId1\"/></sheets>\
</workbook>";

const WORKBOOK_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
</Relationships>";

const STYLES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
<fonts count=\"1\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>\
<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill>\
<fill><patternFill patternType=\"gray125\"/></fill></fills>\
<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>\
<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\
<cellXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/></cellXfs>\
</styleSheet>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_inspection;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(package: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(package.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    /// Pull the inline-string texts of one worksheet row, in column order.
    fn row_texts(sheet: &str, row: usize) -> Vec<String> {
        let marker = format!("<row r=\"{}\">", row);
        let start = sheet.find(&marker).unwrap() + marker.len();
        let end = start + sheet[start..].find("</row>").unwrap();
        sheet[start..end]
            .split("<t>")
            .skip(1)
            .map(|chunk| chunk.split("</t>").next().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_package_contains_required_parts() {
        let package = render(&[]).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {}", name);
        }
    }

    #[test]
    fn test_single_worksheet_named_chamados() {
        let package = render(&[]).unwrap();
        let workbook = read_part(&package, "xl/workbook.xml");
        assert!(workbook.contains("name=\"Chamados\""));
        assert_eq!(workbook.matches("<sheet ").count(), 1);
    }

    #[test]
    fn test_header_row_then_record_rows() {
        let records = vec![sample_inspection("2024-003")];
        let package = render(&records).unwrap();
        let sheet = read_part(&package, "xl/worksheets/sheet1.xml");

        let header = row_texts(&sheet, 1);
        assert_eq!(header.len(), 9);
        assert_eq!(header[0], "Protocolo");

        let row = row_texts(&sheet, 2);
        assert_eq!(row[0], "2024-003");
        assert_eq!(row[4], "Em Andamento");
    }

    #[test]
    fn test_cell_values_match_other_encoders() {
        let records = vec![sample_inspection("2024-003")];
        let package = render(&records).unwrap();
        let sheet = read_part(&package, "xl/worksheets/sheet1.xml");
        let row = row_texts(&sheet, 2);
        let expected: Vec<String> = row_values(&records[0])
            .iter()
            .map(|v| xml_escape(v))
            .collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn test_xml_escaping() {
        let mut inspection = sample_inspection("2024-001");
        inspection.address = "Quadra <3> & Lote".to_string();
        let package = render(&[inspection]).unwrap();
        let sheet = read_part(&package, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("Quadra &lt;3&gt; &amp; Lote"));
    }

    #[test]
    fn test_column_ref() {
        assert_eq!(column_ref(0), "A");
        assert_eq!(column_ref(8), "I");
        assert_eq!(column_ref(25), "Z");
        assert_eq!(column_ref(26), "AA");
    }
}
