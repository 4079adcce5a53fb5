//! Paginated document engine
//!
//! Draws report documents onto fixed-size pages with fixed margins,
//! tracking a top-down cursor in millimeters. Every block checks the
//! remaining space before it draws and starts a fresh page (re-emitting
//! the page header) when it would not fit. printpdf's coordinate system
//! grows upward, so the cursor is flipped at the single point where
//! coordinates leave this module.

pub mod metrics;
pub mod table;

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rect, Rgb,
};

use crate::report::ExportError;

pub const A4_PORTRAIT: (f64, f64) = (210.0, 297.0);
pub const A4_LANDSCAPE: (f64, f64) = (297.0, 210.0);
pub const MARGIN: f64 = 15.0;

/// Space reserved at the bottom of every page for the footer.
pub(crate) const FOOTER_RESERVE: f64 = 20.0;

const LABEL_SIZE: f64 = 8.0;
const VALUE_SIZE: f64 = 10.0;
const LINE_HEIGHT: f64 = 4.0;

/// Two centered title lines re-emitted at the top of every page.
#[derive(Debug, Clone)]
pub struct PageHeader {
    pub title: String,
    pub subtitle: String,
}

/// A photo ready for placement: either decoded pixels or, when only a
/// remote URL is known, a labelled frame drawn at the default 4:3 ratio.
pub enum PhotoContent {
    Bitmap(DynamicImage),
    Frame { name: String },
}

impl PhotoContent {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            PhotoContent::Bitmap(image) => (image.width(), image.height()),
            PhotoContent::Frame { .. } => (4, 3),
        }
    }
}

pub struct DocWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    header: Option<PageHeader>,
    paginate_footer: bool,
    pub(crate) page_width: f64,
    pub(crate) page_height: f64,
    pub(crate) margin: f64,
    /// Cursor, measured from the top edge.
    pub(crate) y: f64,
}

pub(crate) fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

impl DocWriter {
    pub fn new(
        doc_title: &str,
        (page_width, page_height): (f64, f64),
        header: Option<PageHeader>,
        paginate_footer: bool,
    ) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(doc_title, Mm(page_width as f32), Mm(page_height as f32), "Camada 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer_ref = doc.get_page(page).get_layer(layer);

        let mut writer = Self {
            doc,
            pages: vec![(page, layer)],
            layer: layer_ref,
            regular,
            bold,
            header,
            paginate_footer,
            page_width,
            page_height,
            margin: MARGIN,
            y: MARGIN,
        };
        writer.emit_page_header();
        Ok(writer)
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn cursor(&self) -> f64 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Flip the top-down cursor into PDF coordinates.
    fn baseline(&self, y_top: f64) -> Mm {
        Mm((self.page_height - y_top) as f32)
    }

    pub(crate) fn set_fill(&self, r: u8, g: u8, b: u8) {
        self.layer.set_fill_color(rgb(r, g, b));
    }

    pub(crate) fn draw_text(&self, text: &str, size: f64, x: f64, y_top: f64, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size as f32, Mm(x as f32), self.baseline(y_top), font);
    }

    fn draw_text_centered(&self, text: &str, size: f64, y_top: f64, bold: bool) {
        let x = (self.page_width - metrics::text_width(text, size)) / 2.0;
        self.draw_text(text, size, x, y_top, bold);
    }

    pub(crate) fn hline(&self, x1: f64, x2: f64, y_top: f64, color: Color, thickness: f64) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness as f32);
        let line = Line {
            points: vec![
                (Point::new(Mm(x1 as f32), self.baseline(y_top)), false),
                (Point::new(Mm(x2 as f32), self.baseline(y_top)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }

    pub(crate) fn fill_rect(&self, x: f64, y_top: f64, width: f64, height: f64, color: Color) {
        self.layer.set_fill_color(color);
        let rect = Rect::new(
            Mm(x as f32),
            self.baseline(y_top + height),
            Mm((x + width) as f32),
            self.baseline(y_top),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    pub(crate) fn outline_rect(
        &self,
        x: f64,
        y_top: f64,
        width: f64,
        height: f64,
        color: Color,
        thickness: f64,
    ) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness as f32);
        let line = Line {
            points: vec![
                (Point::new(Mm(x as f32), self.baseline(y_top)), false),
                (Point::new(Mm((x + width) as f32), self.baseline(y_top)), false),
                (Point::new(Mm((x + width) as f32), self.baseline(y_top + height)), false),
                (Point::new(Mm(x as f32), self.baseline(y_top + height)), false),
            ],
            is_closed: true,
        };
        self.layer.add_line(line);
    }

    fn emit_page_header(&mut self) {
        self.y = self.margin;
        if let Some(header) = self.header.clone() {
            self.set_fill(0, 0, 0);
            self.draw_text_centered(&header.title, 14.0, self.y, true);
            self.y += 8.0;
            self.draw_text_centered(&header.subtitle, 12.0, self.y, false);
            self.y += 8.0;
            self.hline(
                self.margin,
                self.page_width - self.margin,
                self.y,
                rgb(200, 200, 200),
                0.3,
            );
            self.y += 10.0;
        }
    }

    pub fn new_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(Mm(self.page_width as f32), Mm(self.page_height as f32), "Camada 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages.push((page, layer));
        self.emit_page_header();
    }

    /// Page-break check: start a new page when fewer than `needed`
    /// millimeters remain above the footer reserve.
    pub fn ensure_space(&mut self, needed: f64) {
        if self.y + needed > self.page_height - FOOTER_RESERVE {
            self.new_page();
        }
    }

    pub fn advance(&mut self, dy: f64) {
        self.y += dy;
    }

    /// Filled label bar opening a section.
    pub fn section_header(&mut self, title: &str) {
        self.ensure_space(15.0);
        self.y += 5.0;
        self.fill_rect(self.margin, self.y, self.content_width(), 8.0, rgb(243, 244, 246));
        self.set_fill(55, 65, 81);
        self.draw_text(title, 12.0, self.margin + 3.0, self.y + 6.0, true);
        self.y += 12.0;
    }

    /// Small gray label line preceding a list or photo grid.
    pub fn caption(&mut self, label: &str) {
        self.ensure_space(8.0);
        self.set_fill(107, 114, 128);
        self.draw_text(label, LABEL_SIZE, self.margin, self.y, false);
        self.y += LINE_HEIGHT;
    }

    /// Two label+value pairs side by side; each value wraps independently
    /// in its column and the row advances by the taller of the two.
    pub fn grid_field(&mut self, label1: &str, value1: &str, label2: &str, value2: &str) {
        self.ensure_space(15.0);

        let col1_x = self.margin;
        let col2_x = self.margin + self.content_width() / 2.0 + 5.0;
        let col_width = self.content_width() / 2.0 - 5.0;

        self.set_fill(107, 114, 128);
        self.draw_text(label1, LABEL_SIZE, col1_x, self.y, false);
        self.draw_text(label2, LABEL_SIZE, col2_x, self.y, false);

        self.set_fill(0, 0, 0);
        let lines1 = metrics::wrap(value1, VALUE_SIZE, col_width);
        let lines2 = metrics::wrap(value2, VALUE_SIZE, col_width);
        for (index, line) in lines1.iter().enumerate() {
            self.draw_text(line, VALUE_SIZE, col1_x, self.y + 4.0 + index as f64 * LINE_HEIGHT, false);
        }
        for (index, line) in lines2.iter().enumerate() {
            self.draw_text(line, VALUE_SIZE, col2_x, self.y + 4.0 + index as f64 * LINE_HEIGHT, false);
        }

        self.y += lines1.len().max(lines2.len()) as f64 * LINE_HEIGHT + 4.0;
    }

    /// Full-width label+value. A blank value emits nothing at all — no
    /// label, no gap.
    pub fn full_width_field(&mut self, label: &str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        let lines = metrics::wrap(value, VALUE_SIZE, self.content_width());
        self.ensure_space(15.0 + lines.len() as f64 * LINE_HEIGHT);

        if !label.is_empty() {
            self.set_fill(107, 114, 128);
            self.draw_text(label, LABEL_SIZE, self.margin, self.y, false);
        }

        self.set_fill(0, 0, 0);
        for (index, line) in lines.iter().enumerate() {
            self.draw_text(line, VALUE_SIZE, self.margin, self.y + 4.0 + index as f64 * LINE_HEIGHT, false);
        }
        self.y += lines.len() as f64 * LINE_HEIGHT + 4.0;
    }

    /// Indented, wrapped bullet per item; an empty list renders the single
    /// fallback item instead.
    pub fn bulleted_list(&mut self, items: &[String], fallback: &str) {
        let fallback_items;
        let items = if items.is_empty() {
            fallback_items = [fallback.to_string()];
            &fallback_items[..]
        } else {
            items
        };

        self.set_fill(0, 0, 0);
        for item in items {
            let text = format!("- {}", item);
            let lines = metrics::wrap(&text, VALUE_SIZE, self.content_width() - 2.0);
            self.ensure_space(lines.len() as f64 * LINE_HEIGHT + 2.0);
            for (index, line) in lines.iter().enumerate() {
                self.draw_text(line, VALUE_SIZE, self.margin + 2.0, self.y + index as f64 * LINE_HEIGHT, false);
            }
            self.y += lines.len() as f64 * LINE_HEIGHT + 1.0;
        }
        self.y += 3.0;
    }

    /// Two photos per row at a fixed column width; each rendered height
    /// follows the intrinsic aspect ratio, with the break check applied
    /// before every placement.
    pub fn photo_grid(&mut self, photos: &[PhotoContent]) {
        let photo_width = (self.content_width() - 5.0) / 2.0;
        let mut x = self.margin;

        for (index, photo) in photos.iter().enumerate() {
            let (px_w, px_h) = photo.dimensions();
            let photo_height = px_h as f64 * photo_width / px_w as f64;
            self.ensure_space(photo_height + 5.0);

            match photo {
                PhotoContent::Bitmap(image) => {
                    self.place_image(image, x, self.y, photo_width, photo_height);
                }
                PhotoContent::Frame { name } => {
                    self.outline_rect(x, self.y, photo_width, photo_height, rgb(150, 150, 150), 0.3);
                    self.set_fill(107, 114, 128);
                    let label_x = x + (photo_width - metrics::text_width(name, LABEL_SIZE)) / 2.0;
                    self.draw_text(name, LABEL_SIZE, label_x, self.y + photo_height / 2.0, false);
                }
            }

            if (index + 1) % 2 == 0 {
                x = self.margin;
                self.y += photo_height + 5.0;
            } else if index < photos.len() - 1 {
                x += photo_width + 5.0;
            } else {
                self.y += photo_height + 5.0;
            }
        }
    }

    fn place_image(&self, image: &DynamicImage, x: f64, y_top: f64, width: f64, height: f64) {
        // printpdf sizes images from their pixel count at the given DPI;
        // the scale factors map that native size onto the layout box.
        let native_width = image.width() as f64 * 25.4 / 300.0;
        let native_height = image.height() as f64 * 25.4 / 300.0;
        let pdf_image = Image::from_dynamic_image(image);
        pdf_image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x as f32)),
                translate_y: Some(self.baseline(y_top + height)),
                scale_x: Some((width / native_width) as f32),
                scale_y: Some((height / native_height) as f32),
                dpi: Some(300.0),
                ..Default::default()
            },
        );
    }

    /// Horizontal signature rule with a centered caption underneath.
    pub fn signature_block(&mut self, caption: &str) {
        self.y += 20.0;
        self.ensure_space(20.0);
        let rule_width = 100.0;
        let x = (self.page_width - rule_width) / 2.0;
        self.hline(x, x + rule_width, self.y, rgb(0, 0, 0), 0.3);
        self.y += 5.0;
        self.set_fill(0, 0, 0);
        self.draw_text_centered(caption, VALUE_SIZE, self.y, false);
    }

    /// Apply the per-page footer (when enabled) and serialize the document.
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        if self.paginate_footer {
            let total = self.pages.len();
            for (number, (page, layer)) in self.pages.iter().enumerate() {
                let layer = self.doc.get_page(*page).get_layer(*layer);
                layer.set_fill_color(rgb(150, 150, 150));
                let text = format!("Página {} de {}", number + 1, total);
                let x = self.page_width - self.margin - metrics::text_width(&text, LABEL_SIZE);
                layer.use_text(text, LABEL_SIZE as f32, Mm(x as f32), Mm(10.0), &self.regular);
            }
        }
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }
}
