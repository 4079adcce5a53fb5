//! Delimited-text encoder for the case-list report

use crate::models::Inspection;
use crate::report::{header_labels, row_values};

/// Render the report as comma-separated text: header row plus one row per
/// record. No BOM — the payload is plain UTF-8.
pub fn render(records: &[Inspection]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(
        header_labels()
            .iter()
            .map(|label| escape_cell(label))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        rows.push(
            row_values(record)
                .iter()
                .map(|value| escape_cell(value))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    rows.join("\n")
}

/// Quote a cell only when it needs it (embedded comma, quote or newline),
/// doubling any embedded quote.
fn escape_cell(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_inspection;

    #[test]
    fn test_escape_only_when_needed() {
        assert_eq!(escape_cell("Rua A 100"), "Rua A 100");
        assert_eq!(escape_cell("Rua A, 100"), "\"Rua A, 100\"");
        assert_eq!(
            escape_cell("Rua A, \"Centro\""),
            "\"Rua A, \"\"Centro\"\"\""
        );
        assert_eq!(escape_cell("linha1\nlinha2"), "\"linha1\nlinha2\"");
    }

    #[test]
    fn test_header_row_comes_first() {
        let output = render(&[]);
        assert!(output.starts_with("Protocolo,"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_no_bom() {
        let output = render(&[sample_inspection("2024-001")]);
        assert!(!output.starts_with('\u{feff}'));
    }

    #[test]
    fn test_row_with_embedded_comma_is_quoted() {
        let mut inspection = sample_inspection("2024-001");
        inspection.address = "Rua A, \"Centro\"".to_string();
        let output = render(&[inspection]);
        let data_row = output.lines().nth(1).unwrap();
        assert!(data_row.contains("\"Rua A, \"\"Centro\"\"\""));
        // Actions join with ", ", so that cell is quoted too.
        assert!(data_row.contains("\"Notificação, Autuação\""));
    }
}
