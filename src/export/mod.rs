//! Export module for the expense reporter
//!
//! Provides report export in two formats:
//! - CSV: the raw records of the period, spreadsheet-compatible
//! - PDF: the paginated summary document with per-category line items
//!
//! Both run against a `ReportSnapshot` and never trigger a refresh. Output is
//! built fully in memory before anything is written.

pub mod csv;
pub mod delivery;
pub mod document;
pub mod pdf;

pub use self::csv::{csv_file_name, to_delimited_text, CSV_HEADER};
pub use delivery::{Delivery, DeliveryMethod, ExportDestination};
pub use document::{document_file_name, render_document, Document, DocumentOptions, LogoImage};
pub use pdf::to_pdf_bytes;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::display::currency::CurrencyFormatter;
use crate::error::{ReportError, ReportResult};
use crate::models::{CategoryCatalog, ResolvedInterval};
use crate::services::orchestrator::ReportSnapshot;
use crate::services::period::PeriodResolver;

/// Runs exports for a snapshot and hands the bytes to delivery
pub struct ReportExporter<'a> {
    settings: &'a Settings,
    catalog: &'a CategoryCatalog,
    formatter: &'a dyn CurrencyFormatter,
    destination: ExportDestination,
}

impl<'a> ReportExporter<'a> {
    pub fn new(
        settings: &'a Settings,
        catalog: &'a CategoryCatalog,
        formatter: &'a dyn CurrencyFormatter,
        destination: ExportDestination,
    ) -> Self {
        Self {
            settings,
            catalog,
            formatter,
            destination,
        }
    }

    /// Export the snapshot's records as CSV
    pub fn export_csv(&self, snapshot: &ReportSnapshot, today: NaiveDate) -> ReportResult<Delivery> {
        let interval = require_interval(snapshot)?;
        let text = to_delimited_text(&snapshot.records, self.catalog)?;
        let token = PeriodResolver::file_token(&snapshot.selector, interval);
        let file_name = csv_file_name(&self.settings.csv_prefix, &token, today);

        self.destination.deliver(&file_name, text.as_bytes())
    }

    /// Lay out and export the snapshot as a PDF document
    pub fn export_document(&self, snapshot: &ReportSnapshot) -> ReportResult<Delivery> {
        let interval = require_interval(snapshot)?;
        if snapshot.records.is_empty() {
            return Err(ReportError::EmptyDataset);
        }

        let bytes = self.render_pdf(snapshot, interval)?;
        let file_name =
            document_file_name(&self.settings.document_prefix, &snapshot.selector, interval);

        self.destination.deliver(&file_name, &bytes)
    }

    /// Render the PDF bytes without delivering them
    pub fn render_pdf(
        &self,
        snapshot: &ReportSnapshot,
        interval: &ResolvedInterval,
    ) -> ReportResult<Vec<u8>> {
        let options = DocumentOptions {
            title: &self.settings.report_title,
            date_format: &self.settings.date_format,
            currency_code: &self.settings.currency_code,
            catalog: self.catalog,
            formatter: self.formatter,
            logo: self.load_logo(),
        };
        let document = render_document(
            &snapshot.summary,
            &snapshot.records,
            interval,
            &snapshot.selector,
            options,
        );
        tracing::debug!(pages = document.page_count(), "Document laid out");

        to_pdf_bytes(&document).map_err(|e| match e {
            ReportError::ExportFailed(_) => e,
            other => ReportError::ExportFailed(other.to_string()),
        })
    }

    /// A logo that fails to load is left out rather than failing the export
    fn load_logo(&self) -> Option<LogoImage> {
        let path = self.settings.logo_path.as_ref()?;
        match LogoImage::load(path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Logo not loaded, continuing without it");
                None
            }
        }
    }
}

fn require_interval(snapshot: &ReportSnapshot) -> ReportResult<&ResolvedInterval> {
    snapshot
        .interval
        .as_ref()
        .ok_or(ReportError::IncompleteSelector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::currency::SymbolFormatter;
    use crate::models::{ExpenseRecord, PeriodKind, PeriodSelector, RawAmount};
    use crate::reports::ReportSummary;
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn snapshot(records: Vec<ExpenseRecord>) -> ReportSnapshot {
        let summary = ReportSummary::aggregate(&records);
        ReportSnapshot {
            selector: PeriodSelector::named(PeriodKind::Month),
            interval: Some(ResolvedInterval::new(date(1), date(31))),
            records,
            budgets: Vec::new(),
            summary,
        }
    }

    fn destination(temp: &TempDir) -> ExportDestination {
        ExportDestination::new(Some(temp.path().join("docs")), temp.path().join("downloads"))
    }

    #[test]
    fn test_export_csv_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default();
        let catalog = CategoryCatalog::default();
        let exporter = ReportExporter::new(&settings, &catalog, &SymbolFormatter, destination(&temp));
        let snap = snapshot(vec![ExpenseRecord::new(RawAmount::new("3.5"), "food", date(2))]);

        let delivery = exporter.export_csv(&snap, date(15)).unwrap();

        assert_eq!(delivery.method, DeliveryMethod::Native);
        assert_eq!(
            delivery.path,
            temp.path().join("docs").join("expenses-month-2024-03-15.csv")
        );
        let text = std::fs::read_to_string(&delivery.path).unwrap();
        assert!(text.starts_with("Date,Description,Category,Amount,Notes"));
    }

    #[test]
    fn test_export_csv_empty_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default();
        let catalog = CategoryCatalog::default();
        let exporter = ReportExporter::new(&settings, &catalog, &SymbolFormatter, destination(&temp));

        let err = exporter.export_csv(&snapshot(Vec::new()), date(15)).unwrap_err();

        assert!(err.is_empty_dataset());
        assert!(!temp.path().join("docs").exists());
        assert!(!temp.path().join("downloads").exists());
    }

    #[test]
    fn test_export_requires_resolved_interval() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::default();
        let catalog = CategoryCatalog::default();
        let exporter = ReportExporter::new(&settings, &catalog, &SymbolFormatter, destination(&temp));
        let mut snap = snapshot(vec![ExpenseRecord::new(RawAmount::new("1"), "food", date(2))]);
        snap.interval = None;

        assert!(exporter.export_document(&snap).unwrap_err().is_incomplete_selector());
    }

    #[test]
    fn test_export_document_with_unreadable_logo() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            logo_path: Some(temp.path().join("missing-logo.jpg")),
            ..Settings::default()
        };
        let catalog = CategoryCatalog::default();
        let exporter = ReportExporter::new(&settings, &catalog, &SymbolFormatter, destination(&temp));
        let snap = snapshot(vec![ExpenseRecord::new(RawAmount::new("1"), "food", date(2))]);

        let delivery = exporter.export_document(&snap).unwrap();

        assert_eq!(
            delivery.path,
            temp.path().join("docs").join("expense-report-month.pdf")
        );
        let bytes = std::fs::read(&delivery.path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }
}
