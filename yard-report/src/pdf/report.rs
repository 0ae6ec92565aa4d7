//! Paginated stock report.
//!
//! Layout works in millimetres from the top-left corner of an A4
//! landscape page and converts to points only when drawing. Every page
//! carries the same header and a numbered footer; the detail table
//! repeats its column header after each page break.

use super::fonts::{encode_win_ansi, Font};
use super::writer::{Canvas, Document, Paint, Rgb};
use crate::error::{ReportError, Result};
use chrono::NaiveDateTime;
use log::info;
use yard_core::Species;
use yard_data::{RecordRow, SpeciesSummary, Summary};
use yard_utils::{dates, numbers::group_thousands};

const PT_PER_MM: f64 = 72.0 / 25.4;
const PAGE_WIDTH: f64 = 297.0;
const PAGE_HEIGHT: f64 = 210.0;
const MARGIN: f64 = 10.0;
const CELL_PADDING: f64 = 1.0;
/// A cell reaching below this starts a new page.
const BREAK_AT: f64 = PAGE_HEIGHT - 20.0;
const BODY_TOP: f64 = 40.0;
const FOOTER_TOP: f64 = PAGE_HEIGHT - 15.0;
const LOGO_TOP: f64 = 8.0;
const LOGO_WIDTH: f64 = 30.0;

const SECTION_HEIGHT: f64 = 10.0;
const SUMMARY_HEIGHT: f64 = 8.0;
const SUMMARY_WIDTH: f64 = 80.0;
const HEADER_ROW_HEIGHT: f64 = 8.0;
const ROW_HEIGHT: f64 = 7.0;

pub const DEFAULT_TITLE: &str = "Stock Control Report";

/// Detail table column widths in millimetres.
pub const COLUMN_WIDTHS: [f64; 9] = [25.0, 25.0, 25.0, 30.0, 20.0, 30.0, 30.0, 25.0, 25.0];
pub const COLUMN_TITLES: [&str; 9] = [
    "Date", "Pile", "Species", "Vol (m3)", "Dens", "Est.(t)", "Real(t)", "Error %", "Var %",
];

const BLACK: Rgb = (0, 0, 0);
const HEADER_FILL: Rgb = (230, 230, 230);

pub fn species_color(species: Species) -> Rgb {
    match species {
        Species::Pinus => (34, 139, 34),
        Species::Eucalipto => (0, 0, 139),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct CellStyle {
    font: Font,
    /// points
    size: f64,
    align: Align,
    color: Rgb,
    border: bool,
    fill: Option<Rgb>,
}

const PLAIN: CellStyle = CellStyle {
    font: Font::Regular,
    size: 10.0,
    align: Align::Left,
    color: BLACK,
    border: false,
    fill: None,
};
const TITLE: CellStyle = CellStyle {
    font: Font::Bold,
    size: 14.0,
    align: Align::Center,
    ..PLAIN
};
const SUBTITLE: CellStyle = CellStyle {
    font: Font::Oblique,
    align: Align::Center,
    ..PLAIN
};
const FOOTER: CellStyle = CellStyle {
    font: Font::Oblique,
    size: 8.0,
    align: Align::Center,
    ..PLAIN
};
const SECTION: CellStyle = CellStyle {
    font: Font::Bold,
    size: 12.0,
    ..PLAIN
};
const TABLE_HEADER: CellStyle = CellStyle {
    font: Font::Bold,
    size: 9.0,
    align: Align::Center,
    border: true,
    fill: Some(HEADER_FILL),
    ..PLAIN
};
const TABLE_BODY: CellStyle = CellStyle {
    size: 9.0,
    align: Align::Center,
    border: true,
    ..PLAIN
};

#[derive(Debug, Clone)]
pub struct PdfOptions<'a> {
    pub title: String,
    /// Printed in every page header
    pub generated_at: NaiveDateTime,
    /// JPEG drawn at both top corners of every page
    pub logo_jpeg: Option<&'a [u8]>,
    pub compress: bool,
}

impl<'a> PdfOptions<'a> {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        PdfOptions {
            title: DEFAULT_TITLE.to_string(),
            generated_at,
            logo_jpeg: None,
            compress: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_logo(mut self, jpeg: &'a [u8]) -> Self {
        self.logo_jpeg = Some(jpeg);
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// Render the report for `rows`, in the order given.
///
/// The summary figures are computed from the same rows as the table.
pub fn render_pdf(rows: &[RecordRow<'_>], options: &PdfOptions<'_>) -> Result<Vec<u8>> {
    if rows.is_empty() {
        return Err(ReportError::EmptySelection);
    }
    let mut layout = Layout::new(options)?;
    executive_summary(&mut layout, rows);
    detail_table(&mut layout, rows);
    let pages = layout.page;
    let bytes = layout.finish()?;
    info!(
        "pdf: rendered {} rows on {} pages ({} bytes)",
        rows.len(),
        pages,
        bytes.len()
    );
    Ok(bytes)
}

fn executive_summary(layout: &mut Layout<'_>, rows: &[RecordRow<'_>]) {
    section_title(layout, "1. Executive summary");
    let totals = Summary::compute(rows);
    let by_species = SpeciesSummary::compute(rows);

    layout.ensure_space(SUMMARY_HEIGHT);
    let volume = format!(
        "Total volume: {} m3",
        group_thousands(totals.total_volume, 0)
    );
    let stock = format!(
        "Total stock: {} t",
        group_thousands(totals.total_estimated_mass, 0)
    );
    layout.cell(MARGIN, SUMMARY_WIDTH, SUMMARY_HEIGHT, &volume, &PLAIN);
    layout.cell(
        MARGIN + SUMMARY_WIDTH,
        SUMMARY_WIDTH,
        SUMMARY_HEIGHT,
        &stock,
        &PLAIN,
    );
    layout.y += SUMMARY_HEIGHT;

    for pair in Species::ALL.chunks(2) {
        layout.ensure_space(SUMMARY_HEIGHT);
        for (i, &species) in pair.iter().enumerate() {
            let text = format!(
                "Mean error {}: {:.2}%",
                species.name().to_uppercase(),
                by_species.get(species).mean_abs_error_pct
            );
            let style = CellStyle {
                color: species_color(species),
                ..PLAIN
            };
            let x = MARGIN + SUMMARY_WIDTH * i as f64;
            layout.cell(x, SUMMARY_WIDTH, SUMMARY_HEIGHT, &text, &style);
        }
        layout.y += SUMMARY_HEIGHT;
    }
    layout.y += 5.0;
}

fn detail_table(layout: &mut Layout<'_>, rows: &[RecordRow<'_>]) {
    section_title(layout, "2. Detail");
    // never leave the column header alone at the bottom of a page
    layout.ensure_space(HEADER_ROW_HEIGHT + ROW_HEIGHT);
    table_header(layout);
    for row in rows {
        if layout.ensure_space(ROW_HEIGHT) {
            table_header(layout);
        }
        let mut x = MARGIN;
        for (text, width) in row_cells(row).iter().zip(COLUMN_WIDTHS) {
            layout.cell(x, width, ROW_HEIGHT, text, &TABLE_BODY);
            x += width;
        }
        layout.y += ROW_HEIGHT;
    }
}

fn section_title(layout: &mut Layout<'_>, text: &str) {
    layout.ensure_space(SECTION_HEIGHT);
    layout.cell(MARGIN, 0.0, SECTION_HEIGHT, text, &SECTION);
    layout.y += SECTION_HEIGHT;
}

fn table_header(layout: &mut Layout<'_>) {
    let mut x = MARGIN;
    for (title, width) in COLUMN_TITLES.iter().zip(COLUMN_WIDTHS) {
        layout.cell(x, width, HEADER_ROW_HEIGHT, title, &TABLE_HEADER);
        x += width;
    }
    layout.y += HEADER_ROW_HEIGHT;
}

fn row_cells(row: &RecordRow<'_>) -> [String; 9] {
    let r = row.record;
    [
        dates::format_display(&r.date()),
        r.pile_id().to_string(),
        r.species().to_string(),
        format!("{:.0}", r.drone_volume()),
        format!("{:.0}", r.applied_density()),
        format!("{:.0}", r.estimated_mass()),
        r.weighed_scale_mass()
            .map_or_else(|| "-".to_string(), |mass| format!("{mass:.0}")),
        r.weighed_error_pct()
            .map_or_else(|| "-".to_string(), |pct| format!("{pct:+.1}%")),
        format!("{:.1}%", row.mass_delta_pct),
    ]
}

/// Cursor over the page being drawn.
struct Layout<'a> {
    options: &'a PdfOptions<'a>,
    doc: Document,
    /// mm, from the logo's aspect ratio
    logo_height: Option<f64>,
    canvas: Canvas,
    page: usize,
    y: f64,
}

impl<'a> Layout<'a> {
    fn new(options: &'a PdfOptions<'a>) -> Result<Self> {
        let mut doc = Document::new(PAGE_WIDTH * PT_PER_MM, PAGE_HEIGHT * PT_PER_MM)
            .compress(options.compress);
        let logo_height = match options.logo_jpeg {
            Some(bytes) => {
                let info = doc.set_image(bytes)?;
                Some(LOGO_WIDTH * f64::from(info.height) / f64::from(info.width))
            }
            None => None,
        };
        let mut layout = Layout {
            options,
            doc,
            logo_height,
            canvas: Canvas::new(),
            page: 0,
            y: 0.0,
        };
        layout.begin_page();
        Ok(layout)
    }

    fn begin_page(&mut self) {
        self.page += 1;
        self.canvas = Canvas::new();
        self.canvas.set_line_width(0.2 * PT_PER_MM);
        self.canvas.set_stroke_rgb(BLACK);
        if let Some(height) = self.logo_height {
            for x in [MARGIN, PAGE_WIDTH - MARGIN - LOGO_WIDTH] {
                self.canvas.image(
                    x * PT_PER_MM,
                    (PAGE_HEIGHT - LOGO_TOP - height) * PT_PER_MM,
                    LOGO_WIDTH * PT_PER_MM,
                    height * PT_PER_MM,
                );
            }
        }

        let options = self.options;
        self.y = MARGIN;
        self.cell(MARGIN, 0.0, 10.0, &options.title, &TITLE);
        self.y += 10.0;
        let generated = format!(
            "Generated: {}",
            dates::format_timestamp(&options.generated_at)
        );
        self.cell(MARGIN, 0.0, 5.0, &generated, &SUBTITLE);
        self.y = BODY_TOP;
    }

    fn finish_page(&mut self) {
        self.y = FOOTER_TOP;
        let footer = format!("Page {}", self.page);
        self.cell(MARGIN, 0.0, 10.0, &footer, &FOOTER);
        let canvas = std::mem::take(&mut self.canvas);
        self.doc.add_page(canvas);
    }

    /// Start a new page when `height` does not fit; true if it did.
    fn ensure_space(&mut self, height: f64) -> bool {
        if self.y + height > BREAK_AT {
            self.finish_page();
            self.begin_page();
            true
        } else {
            false
        }
    }

    /// Draw a cell at the cursor line. A width of zero runs to the right
    /// margin. The cursor does not move.
    fn cell(&mut self, x: f64, width: f64, height: f64, text: &str, style: &CellStyle) {
        let width = if width > 0.0 {
            width
        } else {
            PAGE_WIDTH - MARGIN - x
        };
        let top = self.y;
        let bottom = (PAGE_HEIGHT - top - height) * PT_PER_MM;
        match (style.fill, style.border) {
            (Some(fill), border) => {
                self.canvas.set_fill_rgb(fill);
                let paint = if border { Paint::FillStroke } else { Paint::Fill };
                self.canvas.rect(
                    x * PT_PER_MM,
                    bottom,
                    width * PT_PER_MM,
                    height * PT_PER_MM,
                    paint,
                );
            }
            (None, true) => {
                self.canvas.rect(
                    x * PT_PER_MM,
                    bottom,
                    width * PT_PER_MM,
                    height * PT_PER_MM,
                    Paint::Stroke,
                );
            }
            (None, false) => {}
        }

        let size_mm = style.size / PT_PER_MM;
        let encoded = fit_text(
            encode_win_ansi(text),
            style.font,
            size_mm,
            width - 2.0 * CELL_PADDING,
        );
        if encoded.is_empty() {
            return;
        }
        let text_width = style.font.text_width(&encoded, size_mm);
        let text_x = match style.align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (width - text_width) / 2.0,
        };
        let baseline = top + height / 2.0 + 0.3 * size_mm;
        self.canvas.set_fill_rgb(style.color);
        self.canvas.text(
            style.font,
            style.size,
            text_x * PT_PER_MM,
            (PAGE_HEIGHT - baseline) * PT_PER_MM,
            &encoded,
        );
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        self.finish_page();
        self.doc.to_bytes()
    }
}

/// Drop trailing characters until the text fits `max_width` mm.
fn fit_text(mut encoded: Vec<u8>, font: Font, size_mm: f64, max_width: f64) -> Vec<u8> {
    while !encoded.is_empty() && font.text_width(&encoded, size_mm) > max_width {
        encoded.pop();
    }
    encoded
}
