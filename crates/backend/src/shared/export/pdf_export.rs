use chrono::{DateTime, Utc};
use contracts::shared::format::generated_on;
use contracts::shared::list::ListRecord;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use super::{ExportArtifact, PDF_CONTENT_TYPE};
use crate::shared::error::AppError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 10.0;
const CELL_SIZE: f32 = 9.0;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 1.5;
/// Top of the table on the first page, below title and timestamp
const FIRST_TABLE_TOP: f32 = PAGE_HEIGHT - 40.0;
const TABLE_TOP: f32 = PAGE_HEIGHT - MARGIN;
/// Average Helvetica glyph width as a share of the font size
const GLYPH_WIDTH: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

/// How a PDF column reads its text from a record
pub enum ColumnValue<T> {
    /// `ListRecord` field key; missing values print empty
    Key(&'static str),
    Derive(fn(&T) -> String),
}

pub struct PdfColumn<T> {
    pub header: &'static str,
    pub value: ColumnValue<T>,
}

impl<T: ListRecord> PdfColumn<T> {
    pub fn key(header: &'static str, key: &'static str) -> Self {
        Self {
            header,
            value: ColumnValue::Key(key),
        }
    }

    pub fn derive(header: &'static str, value: fn(&T) -> String) -> Self {
        Self {
            header,
            value: ColumnValue::Derive(value),
        }
    }

    fn text(&self, record: &T) -> String {
        match &self.value {
            ColumnValue::Key(key) => record.field(key).as_text().into_owned(),
            ColumnValue::Derive(derive) => derive(record),
        }
    }
}

/// Renders a titled A4 table under `<name>.pdf`. The header row repeats on
/// every page; cells longer than their column are cut with `...`.
pub fn export_pdf<T: ListRecord>(
    records: &[&T],
    columns: &[PdfColumn<T>],
    title: &str,
    name: &str,
    generated_at: DateTime<Utc>,
) -> Result<ExportArtifact, AppError> {
    let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| columns.iter().map(|c| c.text(record)).collect())
        .collect();

    let bytes = render_table(title, &generated_on(generated_at), &headers, &rows)
        .map_err(|e| AppError::ExportFailure(format!("{:#}", e)))?;

    tracing::info!("Rendered {} ({} rows) to {}.pdf", title, rows.len(), name);
    Ok(ExportArtifact {
        file_name: format!("{}.pdf", name),
        content_type: PDF_CONTENT_TYPE,
        bytes,
    })
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn render_table(
    title: &str,
    subtitle: &str,
    headers: &[String],
    rows: &[Vec<String>],
) -> anyhow::Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };
    let column_width = if headers.is_empty() {
        PAGE_WIDTH - 2.0 * MARGIN
    } else {
        (PAGE_WIDTH - 2.0 * MARGIN) / headers.len() as f32
    };

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(title, TITLE_SIZE, Mm(MARGIN), Mm(PAGE_HEIGHT - 22.0), &fonts.bold);
    current.use_text(subtitle, SUBTITLE_SIZE, Mm(MARGIN), Mm(PAGE_HEIGHT - 30.0), &fonts.regular);

    let pages = page_row_counts(rows.len());
    let mut remaining = rows.iter();
    for (index, count) in pages.into_iter().enumerate() {
        let top = if index == 0 {
            FIRST_TABLE_TOP
        } else {
            current = new_page(&doc);
            TABLE_TOP
        };
        draw_header_row(&current, &fonts, headers, column_width, top);
        let mut y = top - ROW_HEIGHT;
        for row in remaining.by_ref().take(count) {
            draw_body_row(&current, &fonts, row, column_width, y);
            y -= ROW_HEIGHT;
        }
        draw_grid(&current, headers.len(), column_width, top, y);
    }

    Ok(doc.save_to_bytes()?)
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    doc.get_page(page).get_layer(layer)
}

/// Body rows per page: the first page holds fewer because of the title.
/// Always at least one page, so an empty table still shows its header.
fn page_row_counts(total: usize) -> Vec<usize> {
    let first = rows_fitting(FIRST_TABLE_TOP);
    let next = rows_fitting(TABLE_TOP);
    let mut counts = vec![total.min(first)];
    let mut left = total.saturating_sub(first);
    while left > 0 {
        counts.push(left.min(next));
        left = left.saturating_sub(next);
    }
    counts
}

/// Body rows that fit below a header row starting at `top`
fn rows_fitting(top: f32) -> usize {
    (((top - MARGIN) / ROW_HEIGHT).floor() as usize).saturating_sub(1)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(y)), false)
}

fn draw_header_row(layer: &PdfLayerReference, fonts: &Fonts, headers: &[String], width: f32, top: f32) {
    let right = PAGE_WIDTH - MARGIN;
    let bottom = top - ROW_HEIGHT;
    layer.set_fill_color(rgb(41, 128, 185));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            point(MARGIN, bottom),
            point(right, bottom),
            point(right, top),
            point(MARGIN, top),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });

    layer.set_fill_color(rgb(255, 255, 255));
    for (idx, header) in headers.iter().enumerate() {
        let x = MARGIN + idx as f32 * width + CELL_PADDING;
        layer.use_text(
            truncate_to_width(header, width, CELL_SIZE),
            CELL_SIZE,
            Mm(x),
            Mm(bottom + 2.5),
            &fonts.bold,
        );
    }
    layer.set_fill_color(rgb(0, 0, 0));
}

fn draw_body_row(layer: &PdfLayerReference, fonts: &Fonts, cells: &[String], width: f32, top: f32) {
    let baseline = top - ROW_HEIGHT + 2.5;
    for (idx, cell) in cells.iter().enumerate() {
        let x = MARGIN + idx as f32 * width + CELL_PADDING;
        layer.use_text(
            truncate_to_width(cell, width, CELL_SIZE),
            CELL_SIZE,
            Mm(x),
            Mm(baseline),
            &fonts.regular,
        );
    }
}

/// Row separators from `top` down to `bottom` plus column borders
fn draw_grid(layer: &PdfLayerReference, columns: usize, width: f32, top: f32, bottom: f32) {
    let right = PAGE_WIDTH - MARGIN;
    layer.set_outline_color(rgb(200, 200, 200));
    layer.set_outline_thickness(0.3);

    let mut y = top;
    while y >= bottom - 0.01 {
        layer.add_line(Line {
            points: vec![point(MARGIN, y), point(right, y)],
            is_closed: false,
        });
        y -= ROW_HEIGHT;
    }
    for idx in 0..=columns.max(1) {
        let x = (MARGIN + idx as f32 * width).min(right);
        layer.add_line(Line {
            points: vec![point(x, top), point(x, bottom)],
            is_closed: false,
        });
    }
}

/// Cuts `text` to what fits in a column of `width` mm at `size` pt
fn truncate_to_width(text: &str, width: f32, size: f32) -> String {
    let glyph = size * GLYPH_WIDTH * PT_TO_MM;
    let fits = ((width - 2.0 * CELL_PADDING) / glyph).floor().max(0.0) as usize;
    if text.chars().count() <= fits {
        return text.to_string();
    }
    let keep = fits.saturating_sub(3);
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::list::FieldValue;

    struct Row {
        id: String,
        amount: f64,
    }

    impl ListRecord for Row {
        fn record_id(&self) -> String {
            self.id.clone()
        }

        fn field(&self, key: &str) -> FieldValue<'_> {
            match key {
                "id" => FieldValue::text(&self.id),
                "amount" => FieldValue::Number(self.amount),
                _ => FieldValue::Missing,
            }
        }

        fn search_fields() -> &'static [&'static str] {
            &["id"]
        }
    }

    fn columns() -> Vec<PdfColumn<Row>> {
        vec![
            PdfColumn::key("Order ID", "id"),
            PdfColumn::key("Missing", "nothing"),
            PdfColumn::derive("Double", |r: &Row| format!("{}", r.amount * 2.0)),
        ]
    }

    #[test]
    fn test_column_values() {
        let row = Row { id: "ORD-2024-001".into(), amount: 2.5 };
        let cols = columns();
        assert_eq!(cols[0].text(&row), "ORD-2024-001");
        assert_eq!(cols[1].text(&row), "");
        assert_eq!(cols[2].text(&row), "5");
    }

    #[test]
    fn test_page_row_counts() {
        let first = rows_fitting(FIRST_TABLE_TOP);
        let next = rows_fitting(TABLE_TOP);
        assert!(next > first);
        assert_eq!(page_row_counts(0), vec![0]);
        assert_eq!(page_row_counts(first), vec![first]);
        assert_eq!(page_row_counts(first + 1), vec![first, 1]);
        assert_eq!(page_row_counts(first + next + 2), vec![first, next, 2]);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Line A", 36.4, CELL_SIZE), "Line A");
        let cut = truncate_to_width(&"x".repeat(200), 36.4, CELL_SIZE);
        assert!(cut.ends_with("..."));
        assert!(cut.chars().count() < 200);
    }

    #[test]
    fn test_renders_multi_page_pdf() {
        let rows: Vec<Row> = (0..80)
            .map(|i| Row { id: format!("ORD-2024-{i:03}"), amount: f64::from(i) })
            .collect();
        let refs: Vec<&Row> = rows.iter().collect();
        let now = DateTime::parse_from_rfc3339("2024-01-15T14:05:09Z").unwrap().with_timezone(&Utc);
        let artifact = export_pdf(&refs, &columns(), "Sales Report", "sales_report", now).unwrap();
        assert_eq!(artifact.file_name, "sales_report.pdf");
        assert_eq!(artifact.content_type, PDF_CONTENT_TYPE);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }
}
