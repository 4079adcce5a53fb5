//! Report/export transform
//!
//! One column-descriptor list feeds every export encoder, so the four
//! formats can never drift apart on cell values: they differ only in
//! encoding. Subset selection mirrors the list screen (text/status
//! filters) or an explicit creation-date range.

pub mod csv;
pub mod detail;
pub mod doc;
pub mod pdf;
pub mod xlsx;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Inspection, InspectionStatus};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to assemble spreadsheet: {0}")]
    Spreadsheet(#[from] zip::result::ZipError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render PDF: {0}")]
    Pdf(String),
}

// =============================================================================
// Columns
// =============================================================================

pub struct Column {
    pub label: &'static str,
    extract: fn(&Inspection) -> String,
}

impl Column {
    pub fn value(&self, inspection: &Inspection) -> String {
        (self.extract)(inspection)
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// The shared column list of the case-list report. Empty optionals render
/// "N/A" in every format; actions join with ", " in every format.
pub const COLUMNS: &[Column] = &[
    Column {
        label: "Protocolo",
        extract: |i| i.protocol.clone(),
    },
    Column {
        label: "Endereço do Reclamado / Ocorrência",
        extract: |i| or_na(Some(i.address.as_str())),
    },
    Column {
        label: "Ponto de Referência",
        extract: |i| or_na(i.reference_point.as_deref()),
    },
    Column {
        label: "Tipo",
        extract: |i| i.kind.label().to_string(),
    },
    Column {
        label: "Status",
        extract: |i| i.status.label().to_string(),
    },
    Column {
        label: "Data da Reclamação",
        extract: |i| match i.complaint_date {
            Some(date) => format_date(date),
            None => "N/A".to_string(),
        },
    },
    Column {
        label: "Data de Abertura",
        extract: |i| format_date(i.created_at.date_naive()),
    },
    Column {
        label: "Fiscal Responsável",
        extract: |i| or_na(i.inspector.as_deref()),
    },
    Column {
        label: "Ações",
        extract: |i| {
            if i.actions.is_empty() {
                "N/A".to_string()
            } else {
                i.actions
                    .iter()
                    .map(|a| a.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        },
    },
];

pub fn header_labels() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.label).collect()
}

pub fn row_values(inspection: &Inspection) -> Vec<String> {
    COLUMNS.iter().map(|c| c.value(inspection)).collect()
}

// =============================================================================
// Subset Selection
// =============================================================================

/// Same semantics as the list screen: free text matches protocol, address
/// or type label (case-insensitive substring); status is an exact match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<InspectionStatus>,
}

pub fn matches_filter(inspection: &Inspection, filter: &ListFilter) -> bool {
    let matches_text = match filter.search.as_deref() {
        None | Some("") => true,
        Some(text) => {
            let needle = text.to_lowercase();
            inspection.protocol.to_lowercase().contains(&needle)
                || inspection.address.to_lowercase().contains(&needle)
                || inspection.kind.label().to_lowercase().contains(&needle)
        }
    };
    let matches_status = match filter.status {
        None => true,
        Some(status) => inspection.status == status,
    };
    matches_text && matches_status
}

/// Inclusive creation-date range. `end` covers its whole day: the cutoff
/// is `end + 24h - 1ms`.
pub fn in_date_range(inspection: &Inspection, start: NaiveDate, end: NaiveDate) -> bool {
    let start_at = start.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end_at =
        end.and_hms_opt(0, 0, 0).unwrap().and_utc() + Duration::hours(24) - Duration::milliseconds(1);
    inspection.created_at >= start_at && inspection.created_at <= end_at
}

/// Output encoding of the case-list report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Csv,
    Xlsx,
    Doc,
}

impl ReportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "relatorio_chamados.pdf",
            ReportFormat::Csv => "relatorio_chamados.csv",
            ReportFormat::Xlsx => "relatorio_chamados.xlsx",
            ReportFormat::Doc => "relatorio_chamados.doc",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Doc => "application/msword",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{
        EnforcementAction, InspectionSource, InspectionType,
    };
    use chrono::TimeZone;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    pub fn inspection_at(protocol: &str, created_at: DateTime<Utc>) -> Inspection {
        Inspection {
            id: Uuid::new_v4(),
            protocol: protocol.to_string(),
            address: "Av. Brasil, 1200".to_string(),
            latitude: None,
            longitude: None,
            source: InspectionSource::Ombudsman,
            kind: InspectionType::Infiltration,
            description: "Infiltração na empena do vizinho.".to_string(),
            status: InspectionStatus::InProgress,
            created_at,
            updated_at: created_at,
            inspector: Some("João Silva".to_string()),
            report: None,
            report_summary: None,
            photos: vec![],
            follow_ups: vec![],
            actions: vec![EnforcementAction::Notification, EnforcementAction::Fine],
            verified_infractions: BTreeMap::new(),
            complainant_name: Some("Carlos Souza".to_string()),
            complainant_address: None,
            respondent_name: None,
            contact_phone: None,
            attachments: vec![],
            reference_point: None,
            complaint_date: Some(NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()),
            history: vec![],
        }
    }

    pub fn sample_inspection(protocol: &str) -> Inspection {
        inspection_at(
            protocol,
            Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{inspection_at, sample_inspection};
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_nine_columns() {
        assert_eq!(COLUMNS.len(), 9);
        assert_eq!(header_labels()[0], "Protocolo");
        assert_eq!(header_labels()[8], "Ações");
    }

    #[test]
    fn test_row_values_render_missing_optionals_as_na() {
        let mut inspection = sample_inspection("2024-007");
        inspection.reference_point = None;
        inspection.inspector = None;
        inspection.complaint_date = None;
        inspection.actions.clear();

        let values = row_values(&inspection);
        assert_eq!(values[0], "2024-007");
        assert_eq!(values[2], "N/A");
        assert_eq!(values[5], "N/A");
        assert_eq!(values[7], "N/A");
        assert_eq!(values[8], "N/A");
    }

    #[test]
    fn test_row_values_join_actions_with_comma() {
        let values = row_values(&sample_inspection("2024-001"));
        assert_eq!(values[8], "Notificação, Autuação");
        assert_eq!(values[6], "01/03/2024");
        assert_eq!(values[5], "28/02/2024");
    }

    #[test]
    fn test_text_filter_matches_protocol_address_and_type() {
        let inspection = sample_inspection("2024-042");
        let hit = |needle: &str| {
            matches_filter(
                &inspection,
                &ListFilter {
                    search: Some(needle.to_string()),
                    status: None,
                },
            )
        };
        assert!(hit("2024-042"));
        assert!(hit("av. brasil"));
        assert!(hit("infiltra"));
        assert!(!hit("demolição"));
    }

    #[test]
    fn test_status_filter_is_exact() {
        let inspection = sample_inspection("2024-001");
        assert!(matches_filter(
            &inspection,
            &ListFilter {
                search: None,
                status: Some(InspectionStatus::InProgress),
            }
        ));
        assert!(!matches_filter(
            &inspection,
            &ListFilter {
                search: None,
                status: Some(InspectionStatus::Closed),
            }
        ));
    }

    #[test]
    fn test_date_range_includes_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let inside = inspection_at(
            "2024-001",
            Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap(),
        );
        let outside = inspection_at(
            "2024-002",
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 1).unwrap(),
        );

        assert!(in_date_range(&inside, start, end));
        assert!(!in_date_range(&outside, start, end));
    }

    #[test]
    fn test_format_names_and_types() {
        assert_eq!(ReportFormat::Xlsx.file_name(), "relatorio_chamados.xlsx");
        assert_eq!(ReportFormat::Doc.content_type(), "application/msword");
    }

    fn parse_csv_line(line: &str) -> Vec<String> {
        let mut cells = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        cells.push(current);
        cells
    }

    fn extract_html_cells(html: &str) -> Vec<String> {
        html.split("<td")
            .skip(1)
            .map(|chunk| {
                let after_tag = &chunk[chunk.find('>').unwrap() + 1..];
                let cell = &after_tag[..after_tag.find("</td>").unwrap()];
                cell.replace("&lt;", "<")
                    .replace("&gt;", ">")
                    .replace("&amp;", "&")
            })
            .collect()
    }

    fn extract_xlsx_row(package: &[u8], row: usize) -> Vec<String> {
        use std::io::{Cursor, Read};
        let mut archive = zip::ZipArchive::new(Cursor::new(package.to_vec())).unwrap();
        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        let marker = format!("<row r=\"{}\">", row);
        let start = sheet.find(&marker).unwrap() + marker.len();
        let end = start + sheet[start..].find("</row>").unwrap();
        sheet[start..end]
            .split("<t>")
            .skip(1)
            .map(|chunk| {
                chunk
                    .split("</t>")
                    .next()
                    .unwrap()
                    .replace("&quot;", "\"")
                    .replace("&lt;", "<")
                    .replace("&gt;", ">")
                    .replace("&amp;", "&")
            })
            .collect()
    }

    /// The delimited, spreadsheet and rich-text encoders must agree on
    /// every cell value; the formats differ only in encoding.
    #[test]
    fn test_cross_format_cell_values_agree() {
        let mut inspection = sample_inspection("2024-010");
        inspection.address = "Rua A, \"Centro\"".to_string();
        let records = vec![inspection];
        let expected = row_values(&records[0]);

        let csv_output = super::csv::render(&records);
        assert_eq!(parse_csv_line(csv_output.lines().nth(1).unwrap()), expected);

        let doc_output = super::doc::render(&records);
        assert_eq!(extract_html_cells(&doc_output), expected);

        let xlsx_output = super::xlsx::render(&records).unwrap();
        assert_eq!(extract_xlsx_row(&xlsx_output, 2), expected);
    }
}
