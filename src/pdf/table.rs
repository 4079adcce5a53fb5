//! Generic auto-layout grid table
//!
//! Column widths are derived from the widest content of each column and
//! scaled to fill the content width exactly. Cells wrap to their column,
//! rows grow to the tallest cell, and the header row is repeated after
//! every page break.

use super::{metrics, rgb, DocWriter, FOOTER_RESERVE};

const FONT_SIZE: f64 = 8.0;
const LINE_HEIGHT: f64 = 3.5;
const PAD_X: f64 = 1.5;
const PAD_Y: f64 = 1.5;
/// Pre-scaling cap: no column's natural width may claim more than this
/// share of the content width, so one verbose column cannot starve the
/// rest when the table has to shrink.
const MAX_COLUMN_SHARE: f64 = 0.35;

impl DocWriter {
    pub fn auto_table(&mut self, headers: &[&str], rows: &[Vec<String>], header_fill: (u8, u8, u8)) {
        let widths = column_widths(self.content_width(), headers, rows);
        self.table_header_row(headers, &widths, header_fill);

        for row in rows {
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| metrics::wrap(cell, FONT_SIZE, width - 2.0 * PAD_X))
                .collect();
            let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
            let height = line_count as f64 * LINE_HEIGHT + 2.0 * PAD_Y;

            if self.y + height > self.page_height - FOOTER_RESERVE {
                self.new_page();
                self.table_header_row(headers, &widths, header_fill);
            }

            let mut x = self.margin;
            for (cell, width) in wrapped.iter().zip(&widths) {
                self.outline_rect(x, self.y, *width, height, rgb(180, 180, 180), 0.2);
                self.set_fill(0, 0, 0);
                for (index, line) in cell.iter().enumerate() {
                    self.draw_text(
                        line,
                        FONT_SIZE,
                        x + PAD_X,
                        self.y + PAD_Y + (index + 1) as f64 * LINE_HEIGHT - 0.8,
                        false,
                    );
                }
                x += width;
            }
            self.y += height;
        }
    }

    fn table_header_row(&mut self, headers: &[&str], widths: &[f64], fill: (u8, u8, u8)) {
        let wrapped: Vec<Vec<String>> = headers
            .iter()
            .zip(widths)
            .map(|(cell, width)| metrics::wrap(cell, FONT_SIZE, width - 2.0 * PAD_X))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let height = line_count as f64 * LINE_HEIGHT + 2.0 * PAD_Y;

        self.ensure_space(height);
        self.fill_rect(
            self.margin,
            self.y,
            widths.iter().sum(),
            height,
            rgb(fill.0, fill.1, fill.2),
        );

        let mut x = self.margin;
        for (cell, width) in wrapped.iter().zip(widths) {
            self.outline_rect(x, self.y, *width, height, rgb(180, 180, 180), 0.2);
            self.set_fill(255, 255, 255);
            for (index, line) in cell.iter().enumerate() {
                self.draw_text(
                    line,
                    FONT_SIZE,
                    x + PAD_X,
                    self.y + PAD_Y + (index + 1) as f64 * LINE_HEIGHT - 0.8,
                    true,
                );
            }
            x += width;
        }
        self.y += height;
    }
}

/// Natural width per column (widest header or cell, padded, capped), then
/// scaled so the table spans the content width exactly.
fn column_widths(content_width: f64, headers: &[&str], rows: &[Vec<String>]) -> Vec<f64> {
    let cap = content_width * MAX_COLUMN_SHARE;
    let mut natural: Vec<f64> = headers
        .iter()
        .map(|h| metrics::text_width(h, FONT_SIZE) + 2.0 * PAD_X)
        .collect();

    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if index < natural.len() {
                let width = metrics::text_width(cell, FONT_SIZE) + 2.0 * PAD_X;
                natural[index] = natural[index].max(width);
            }
        }
    }

    for width in &mut natural {
        *width = width.min(cap);
    }

    let total: f64 = natural.iter().sum();
    natural.iter().map(|w| w * content_width / total).collect()
}
