//! Paginated document layout
//!
//! Lays out a report as pages of drawing operations: a header (optional logo,
//! title, period line), a summary box, then one section per category with a
//! banded line-item table. All measurements are millimetres from the top-left
//! corner of an A4 page. Page breaks come from arithmetic over fixed row and
//! section heights; nothing is measured from rendered output.

use std::path::Path;

use crate::display::currency::CurrencyFormatter;
use crate::error::{ReportError, ReportResult};
use crate::models::{CategoryCatalog, ExpenseRecord, Money, PeriodSelector, ResolvedInterval};
use crate::reports::ReportSummary;
use crate::services::period::PeriodResolver;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const LEFT_MARGIN: f32 = 20.0;
pub const CONTENT_WIDTH: f32 = 170.0;
/// Where the cursor starts on every page
pub const TOP_MARGIN: f32 = 20.0;
/// Nothing may extend below this line
pub const PAGE_BOTTOM_MARGIN: f32 = 270.0;

pub const LOGO_MAX_WIDTH: f32 = 40.0;
pub const LOGO_MAX_HEIGHT: f32 = 20.0;
const TITLE_HEIGHT: f32 = 10.0;
const PERIOD_LINE_HEIGHT: f32 = 8.0;
pub const SUMMARY_BOX_HEIGHT: f32 = 30.0;
const BREAKDOWN_HEADING_HEIGHT: f32 = 10.0;
pub const SECTION_HEADER_HEIGHT: f32 = 10.0;
pub const TABLE_HEADER_HEIGHT: f32 = 8.0;
pub const ROW_HEIGHT: f32 = 7.0;
const SECTION_GAP: f32 = 6.0;
const BLOCK_GAP: f32 = 8.0;

const DESCRIPTION_X: f32 = LEFT_MARGIN + 3.0;
const AMOUNT_X: f32 = LEFT_MARGIN + 105.0;
const DATE_X: f32 = LEFT_MARGIN + 140.0;
const DESCRIPTION_MAX_CHARS: usize = 48;

/// RGB fill or text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const MUTED: Rgb = Rgb(100, 100, 100);
pub const SUMMARY_FILL: Rgb = Rgb(240, 244, 248);
pub const SECTION_FILL: Rgb = Rgb(59, 130, 246);
pub const TABLE_HEADER_FILL: Rgb = Rgb(226, 232, 240);
pub const BAND_FILL: Rgb = Rgb(248, 250, 252);

/// One drawing instruction; `y` is the top of the element for shapes and
/// the text baseline for text
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// What a table row belongs to, kept for inspection and tests
#[derive(Debug, Clone, PartialEq)]
pub struct RowPlacement {
    pub category: String,
    pub row_index: usize,
    pub page: usize,
    pub top: f32,
    pub bottom: f32,
}

/// A single page of drawing operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// JPEG logo embedded as-is
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub width_px: u32,
    pub height_px: u32,
    pub components: u8,
    pub data: Vec<u8>,
}

impl LogoImage {
    /// Load a baseline or progressive JPEG and read its dimensions
    pub fn load(path: &Path) -> ReportResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| ReportError::Io(format!("Failed to read logo {}: {}", path.display(), e)))?;
        Self::from_jpeg_bytes(data)
    }

    /// Parse the JPEG frame header for width, height and component count
    pub fn from_jpeg_bytes(data: Vec<u8>) -> ReportResult<Self> {
        let unsupported = || ReportError::Validation("Logo must be a JPEG image".into());
        if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
            return Err(unsupported());
        }

        let mut pos = 2;
        while pos + 4 <= data.len() {
            if data[pos] != 0xFF {
                return Err(unsupported());
            }
            let marker = data[pos + 1];
            // Fill bytes and standalone markers carry no length
            if marker == 0xFF {
                pos += 1;
                continue;
            }
            if marker == 0x01 || (0xD0..=0xD9).contains(&marker) {
                pos += 2;
                continue;
            }
            let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
            let is_frame_header =
                (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
            if is_frame_header {
                if pos + 10 > data.len() {
                    return Err(unsupported());
                }
                let height_px = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
                let width_px = u16::from_be_bytes([data[pos + 7], data[pos + 8]]) as u32;
                let components = data[pos + 9];
                if width_px == 0 || height_px == 0 {
                    return Err(unsupported());
                }
                return Ok(Self {
                    width_px,
                    height_px,
                    components,
                    data,
                });
            }
            pos += 2 + length;
        }

        Err(unsupported())
    }

    /// Size on the page, aspect ratio preserved
    ///
    /// The larger source dimension is scaled to its cap and the other follows
    /// the aspect ratio; the result is shrunk further if that still overflows
    /// the box.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect = self.width_px as f32 / self.height_px as f32;
        let (mut width, mut height) = if self.width_px >= self.height_px {
            (max_width, max_width / aspect)
        } else {
            (max_height * aspect, max_height)
        };
        if width > max_width {
            height *= max_width / width;
            width = max_width;
        }
        if height > max_height {
            width *= max_height / height;
            height = max_height;
        }
        (width, height)
    }
}

/// Presentation inputs that don't come from the data
pub struct DocumentOptions<'a> {
    pub title: &'a str,
    pub date_format: &'a str,
    pub currency_code: &'a str,
    pub catalog: &'a CategoryCatalog,
    pub formatter: &'a dyn CurrencyFormatter,
    pub logo: Option<LogoImage>,
}

/// A fully laid-out report
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
    pub logo: Option<LogoImage>,
    pub rows: Vec<RowPlacement>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Vertical position and page index while laying out
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    page: usize,
    y: f32,
}

struct Layout {
    pages: Vec<Page>,
    cursor: LayoutCursor,
    rows: Vec<RowPlacement>,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: LayoutCursor {
                page: 0,
                y: TOP_MARGIN,
            },
            rows: Vec::new(),
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = LayoutCursor {
            page: self.pages.len() - 1,
            y: TOP_MARGIN,
        };
    }

    /// Break the page if `height` more would cross the bottom margin.
    /// Returns true when a break happened.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor.y + height > PAGE_BOTTOM_MARGIN {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.cursor.page].ops.push(op);
    }

    fn text(&mut self, x: f32, baseline_offset: f32, size: f32, bold: bool, color: Rgb, text: String) {
        let y = self.cursor.y + baseline_offset;
        self.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            text,
        });
    }

    fn rect(&mut self, height: f32, fill: Rgb) {
        let y = self.cursor.y;
        self.push(DrawOp::Rect {
            x: LEFT_MARGIN,
            y,
            width: CONTENT_WIDTH,
            height,
            fill,
        });
    }

    fn table_header(&mut self) {
        self.rect(TABLE_HEADER_HEIGHT, TABLE_HEADER_FILL);
        for (x, label) in [(DESCRIPTION_X, "Description"), (AMOUNT_X, "Amount"), (DATE_X, "Date")] {
            self.text(x, 5.5, 9.0, true, BLACK, label.to_string());
        }
        self.cursor.y += TABLE_HEADER_HEIGHT;
    }
}

/// Lay out a report
///
/// Sections follow the descending-total order, then any categories whose
/// records all had unreadable amounts, in first-seen order. Rows inside a
/// section follow the order of `records`. Every row and section is checked against
/// `PAGE_BOTTOM_MARGIN` before it is placed, so nothing straddles a page.
pub fn render_document(
    summary: &ReportSummary,
    records: &[ExpenseRecord],
    interval: &ResolvedInterval,
    selector: &PeriodSelector,
    options: DocumentOptions<'_>,
) -> Document {
    let mut layout = Layout::new();
    let money = |amount: Money| options.formatter.format(amount, options.currency_code);

    // Header
    if let Some(logo) = &options.logo {
        let (width, height) = logo.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT);
        let y = layout.cursor.y;
        layout.push(DrawOp::Logo {
            x: LEFT_MARGIN,
            y,
            width,
            height,
        });
        layout.cursor.y += height + 4.0;
    }
    layout.text(LEFT_MARGIN, 7.0, 20.0, true, BLACK, options.title.to_string());
    layout.cursor.y += TITLE_HEIGHT;
    let period_line = PeriodResolver::describe(selector, interval, options.date_format);
    layout.text(LEFT_MARGIN, 5.0, 11.0, false, MUTED, period_line);
    layout.cursor.y += PERIOD_LINE_HEIGHT + 4.0;

    // Summary box
    layout.rect(SUMMARY_BOX_HEIGHT, SUMMARY_FILL);
    let left = LEFT_MARGIN + 5.0;
    let right = LEFT_MARGIN + 90.0;
    layout.text(left, 8.0, 10.0, false, MUTED, "Total Spent".into());
    layout.text(left, 15.0, 14.0, true, BLACK, money(summary.total_spent));
    layout.text(right, 8.0, 10.0, false, MUTED, "Transactions".into());
    layout.text(right, 15.0, 14.0, true, BLACK, summary.transaction_count.to_string());
    layout.text(left, 24.0, 10.0, false, MUTED, "Average Transaction".into());
    layout.text(right, 24.0, 10.0, true, BLACK, money(summary.average_money()));
    layout.cursor.y += SUMMARY_BOX_HEIGHT + BLOCK_GAP;

    let mut sections = summary.category_totals.sorted_descending();
    for record in records {
        let category = record.category.as_str();
        if !sections.iter().any(|(key, _)| *key == category) {
            sections.push((category, Money::zero()));
        }
    }

    if sections.is_empty() {
        layout.text(LEFT_MARGIN, 5.0, 11.0, false, MUTED, "No expenses in this period.".into());
        layout.cursor.y += PERIOD_LINE_HEIGHT;
    } else {
        layout.ensure_space(BREAKDOWN_HEADING_HEIGHT + SECTION_HEADER_HEIGHT + TABLE_HEADER_HEIGHT + ROW_HEIGHT);
        layout.text(LEFT_MARGIN, 7.0, 14.0, true, BLACK, "Category Breakdown".into());
        layout.cursor.y += BREAKDOWN_HEADING_HEIGHT;
    }

    for (category, total) in sections {
        // A section starts only where its header, table header and first row fit
        layout.ensure_space(SECTION_HEADER_HEIGHT + TABLE_HEADER_HEIGHT + ROW_HEIGHT);

        layout.rect(SECTION_HEADER_HEIGHT, SECTION_FILL);
        let name = options.catalog.display_name(category).to_string();
        layout.text(LEFT_MARGIN + 3.0, 7.0, 11.0, true, WHITE, name);
        layout.text(AMOUNT_X, 7.0, 11.0, true, WHITE, money(total));
        layout.cursor.y += SECTION_HEADER_HEIGHT;
        layout.table_header();

        let items = records.iter().filter(|r| r.category == category);
        for (row_index, record) in items.enumerate() {
            if layout.ensure_space(ROW_HEIGHT) {
                layout.table_header();
            }

            if row_index % 2 == 1 {
                layout.rect(ROW_HEIGHT, BAND_FILL);
            }
            let amount = match record.amount.parse() {
                Ok(value) => money(value),
                Err(_) => record.amount.as_str().to_string(),
            };
            let description = truncate_chars(record.description_or_empty(), DESCRIPTION_MAX_CHARS);
            layout.text(DESCRIPTION_X, 5.0, 9.0, false, BLACK, description);
            layout.text(AMOUNT_X, 5.0, 9.0, false, BLACK, amount);
            layout.text(
                DATE_X,
                5.0,
                9.0,
                false,
                BLACK,
                record.date.format(options.date_format).to_string(),
            );

            let top = layout.cursor.y;
            layout.rows.push(RowPlacement {
                category: category.to_string(),
                row_index,
                page: layout.cursor.page,
                top,
                bottom: top + ROW_HEIGHT,
            });
            layout.cursor.y += ROW_HEIGHT;
        }

        layout.cursor.y += SECTION_GAP;
    }

    Document {
        title: options.title.to_string(),
        pages: layout.pages,
        logo: options.logo,
        rows: layout.rows,
    }
}

/// Truncate to `max_chars` characters, ending in "..." when shortened
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// File name for a document export: `<prefix>-<token>.pdf`
pub fn document_file_name(prefix: &str, selector: &PeriodSelector, interval: &ResolvedInterval) -> String {
    format!("{}-{}.pdf", prefix, PeriodResolver::file_token(selector, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::currency::SymbolFormatter;
    use crate::models::{PeriodKind, RawAmount};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn interval() -> ResolvedInterval {
        ResolvedInterval::new(date(1), date(31))
    }

    fn render(records: &[ExpenseRecord], logo: Option<LogoImage>) -> Document {
        let summary = ReportSummary::aggregate(records);
        let catalog = CategoryCatalog::default();
        let options = DocumentOptions {
            title: "Expense Report",
            date_format: "%Y-%m-%d",
            currency_code: "USD",
            catalog: &catalog,
            formatter: &SymbolFormatter,
            logo,
        };
        render_document(
            &summary,
            records,
            &interval(),
            &PeriodSelector::named(PeriodKind::Month),
            options,
        )
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 0x08]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[0x03, 0x00, 0x00]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn test_single_page_report() {
        let records = vec![
            ExpenseRecord::new(RawAmount::new("12.50"), "food", date(1)).with_description("Lunch"),
            ExpenseRecord::new(RawAmount::new("40"), "transport", date(2)),
        ];
        let doc = render(&records, None);

        assert_eq!(doc.page_count(), 1);
        let page = texts(&doc.pages[0]);
        assert!(page.contains(&"Expense Report"));
        assert!(page.contains(&"This Month (2024-03-01 to 2024-03-31)"));
        assert!(page.contains(&"$52.50"));
        assert!(page.contains(&"Lunch"));
    }

    #[test]
    fn test_sections_in_descending_total_order() {
        let records = vec![
            ExpenseRecord::new(RawAmount::new("5"), "food", date(1)),
            ExpenseRecord::new(RawAmount::new("90"), "travel", date(2)),
            ExpenseRecord::new(RawAmount::new("20"), "bills", date(3)),
        ];
        let doc = render(&records, None);
        let page = texts(&doc.pages[0]);
        let pos = |name| page.iter().position(|t| *t == name).unwrap();

        assert!(pos("Travel") < pos("Bills & Utilities"));
        assert!(pos("Bills & Utilities") < pos("Food & Dining"));
    }

    #[test]
    fn test_rows_follow_record_order_and_band_by_parity() {
        let records: Vec<_> = (1..=4)
            .map(|i| {
                ExpenseRecord::new(RawAmount::new("1"), "food", date(i))
                    .with_description(format!("item {}", i))
            })
            .collect();
        let doc = render(&records, None);

        let indices: Vec<_> = doc.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        let banded_tops: Vec<f32> = doc.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { y, fill, .. } if *fill == BAND_FILL => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(banded_tops, vec![doc.rows[1].top, doc.rows[3].top]);
    }

    #[test]
    fn test_many_rows_paginate_without_splitting() {
        let records: Vec<_> = (0..200)
            .map(|i| {
                ExpenseRecord::new(RawAmount::new("1.25"), "food", date(1 + (i % 28)))
                    .with_description(format!("Expense {}", i))
            })
            .collect();
        let doc = render(&records, None);

        assert!(doc.page_count() > 1);
        assert_eq!(doc.rows.len(), 200);
        for row in &doc.rows {
            assert!(row.top >= TOP_MARGIN);
            assert!(row.bottom <= PAGE_BOTTOM_MARGIN);
        }

        // Every text baseline sits inside the printable band of its page
        for page in &doc.pages {
            for op in &page.ops {
                if let DrawOp::Text { y, .. } = op {
                    assert!(*y >= TOP_MARGIN && *y <= PAGE_BOTTOM_MARGIN);
                }
            }
        }

        // Pages after the first repeat the table header
        assert!(texts(&doc.pages[1]).contains(&"Description"));
    }

    #[test]
    fn test_section_header_not_orphaned() {
        // Twenty rows leave room for a section header on page one but not
        // for header, table header and a row together
        let mut records: Vec<_> = (0..20)
            .map(|_| ExpenseRecord::new(RawAmount::new("10"), "food", date(1)))
            .collect();
        records.push(ExpenseRecord::new(RawAmount::new("1"), "travel", date(2)));
        let doc = render(&records, None);

        let travel_row = doc.rows.iter().find(|r| r.category == "travel").unwrap();
        let travel_header_page = doc
            .pages
            .iter()
            .position(|p| texts(p).contains(&"Travel"))
            .unwrap();
        assert_eq!(travel_header_page, travel_row.page);
        assert_eq!(travel_row.page, 1);
    }

    #[test]
    fn test_empty_summary_renders_notice() {
        let doc = render(&[], None);
        assert_eq!(doc.page_count(), 1);
        assert!(texts(&doc.pages[0]).contains(&"No expenses in this period."));
    }

    #[test]
    fn test_category_with_only_unreadable_amounts_gets_a_section() {
        let records = vec![
            ExpenseRecord::new(RawAmount::new("10"), "food", date(1)),
            ExpenseRecord::new(RawAmount::new("n/a"), "travel", date(2)).with_description("Flight"),
        ];
        let doc = render(&records, None);
        let page = texts(&doc.pages[0]);
        let pos = |name| page.iter().position(|t| *t == name).unwrap();

        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[1].category, "travel");
        assert!(pos("Food & Dining") < pos("Travel"));
        assert!(pos("Travel") < pos("Flight"));
        assert!(page.contains(&"n/a"));
        assert!(page.contains(&"$0.00"));
    }

    #[test]
    fn test_logo_parsing_and_fit() {
        let wide = LogoImage::from_jpeg_bytes(jpeg(400, 100)).unwrap();
        assert_eq!((wide.width_px, wide.height_px, wide.components), (400, 100, 3));
        let (w, h) = wide.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT);
        assert!((w - 40.0).abs() < 1e-4 && (h - 10.0).abs() < 1e-4);

        let tall = LogoImage::from_jpeg_bytes(jpeg(50, 200)).unwrap();
        let (w, h) = tall.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT);
        assert!((w - 5.0).abs() < 1e-4 && (h - 20.0).abs() < 1e-4);

        // Nearly square: width hits its cap first, then the box clamps height
        let square = LogoImage::from_jpeg_bytes(jpeg(100, 90)).unwrap();
        let (w, h) = square.fit_within(LOGO_MAX_WIDTH, LOGO_MAX_HEIGHT);
        assert!(h <= LOGO_MAX_HEIGHT + 1e-4 && w <= LOGO_MAX_WIDTH + 1e-4);
        assert!((w / h - 100.0 / 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_logo_pushes_content_down() {
        let records = vec![ExpenseRecord::new(RawAmount::new("1"), "food", date(1))];
        let logo = LogoImage::from_jpeg_bytes(jpeg(400, 100)).unwrap();
        let with_logo = render(&records, Some(logo));
        let without = render(&records, None);

        assert!(matches!(with_logo.pages[0].ops[0], DrawOp::Logo { .. }));
        assert!(with_logo.rows[0].top > without.rows[0].top);
    }

    #[test]
    fn test_non_jpeg_logo_rejected() {
        assert!(LogoImage::from_jpeg_bytes(b"\x89PNG\r\n\x1a\n".to_vec()).is_err());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("ünïcödé strïng", 8), "ünïcö...");
    }

    #[test]
    fn test_document_file_name() {
        let custom = PeriodSelector::custom(Some(date(1)), Some(date(31)));
        assert_eq!(
            document_file_name("expense-report", &custom, &interval()),
            "expense-report-2024-03-01_to_2024-03-31.pdf"
        );
        assert_eq!(
            document_file_name("expense-report", &PeriodSelector::named(PeriodKind::All), &interval()),
            "expense-report-all-time.pdf"
        );
    }
}
