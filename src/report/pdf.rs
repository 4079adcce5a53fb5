//! Tabular-document encoder for the case-list report

use crate::models::Inspection;
use crate::pdf::{DocWriter, A4_LANDSCAPE};
use crate::presentation::TABLE_HEADER_FILL;
use crate::report::{header_labels, row_values, ExportError};

pub fn render(records: &[Inspection]) -> Result<Vec<u8>, ExportError> {
    let mut writer = DocWriter::new(
        "Relatório de Chamados de Fiscalização",
        A4_LANDSCAPE,
        None,
        false,
    )?;

    writer.set_fill(0, 0, 0);
    writer.draw_text("Relatório de Chamados de Fiscalização", 18.0, 14.0, 22.0, true);
    writer.advance(30.0 - writer.cursor());

    let headers = header_labels();
    let rows: Vec<Vec<String>> = records.iter().map(row_values).collect();
    writer.auto_table(&headers, &rows, TABLE_HEADER_FILL);

    writer.finish()
}
