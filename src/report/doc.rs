//! Rich-text encoder for the case-list report
//!
//! An HTML table in a minimal Word-compatible shell, BOM-prefixed and
//! served as `application/msword` so the host OS hands it to a word
//! processor.

use crate::models::Inspection;
use crate::presentation::status_presentation;
use crate::report::{header_labels, row_values, COLUMNS};

const STATUS_COLUMN: usize = 4;

pub fn render(records: &[Inspection]) -> String {
    debug_assert_eq!(COLUMNS[STATUS_COLUMN].label, "Status");

    let mut table = String::from("<table border=\"1\"><tr>");
    for label in header_labels() {
        table.push_str(&format!("<th>{}</th>", html_escape(label)));
    }
    table.push_str("</tr>");

    for record in records {
        let badge = status_presentation(record.status);
        table.push_str("<tr>");
        for (index, value) in row_values(record).iter().enumerate() {
            if index == STATUS_COLUMN {
                table.push_str(&format!(
                    "<td style=\"background:{};color:{}\">{}</td>",
                    badge.background,
                    badge.foreground,
                    html_escape(value)
                ));
            } else {
                table.push_str(&format!("<td>{}</td>", html_escape(value)));
            }
        }
        table.push_str("</tr>");
    }
    table.push_str("</table>");

    format!(
        "\u{feff}<html xmlns:o='urn:schemas-microsoft-com:office:office' \
         xmlns:w='urn:schemas-microsoft-com:office:word' \
         xmlns='http://www.w3.org/TR/REC-html40'>\
         <head><meta charset='utf-8'><title>Relatório</title></head>\
         <body>{}</body></html>",
        table
    )
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
