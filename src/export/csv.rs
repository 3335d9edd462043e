//! CSV Export functionality
//!
//! Flattens raw expense records into `Date,Description,Category,Amount,Notes`
//! rows. Quoting follows the usual rules: fields containing the delimiter, a
//! quote or a line break are quoted and embedded quotes are doubled.

use chrono::NaiveDate;

use crate::error::{ReportError, ReportResult};
use crate::models::{CategoryCatalog, ExpenseRecord};

/// Column order of the export
pub const CSV_HEADER: [&str; 5] = ["Date", "Description", "Category", "Amount", "Notes"];

/// Export records as CSV text
///
/// Returns `ReportError::EmptyDataset` when there is nothing to export, so
/// callers can show a notice instead of writing an empty file.
pub fn to_delimited_text(
    records: &[ExpenseRecord],
    catalog: &CategoryCatalog,
) -> ReportResult<String> {
    if records.is_empty() {
        return Err(ReportError::EmptyDataset);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        // Unparseable amounts are exported as delivered rather than dropped
        let amount = record
            .amount
            .parse()
            .map(|m| m.to_string())
            .unwrap_or_else(|_| record.amount.as_str().to_string());

        writer.write_record([
            record.date.format("%Y-%m-%d").to_string().as_str(),
            record.description_or_empty(),
            catalog.display_name(&record.category),
            amount.as_str(),
            record.notes_or_empty(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::ExportFailed(format!("Failed to flush CSV: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| ReportError::ExportFailed(e.to_string()))
}

/// File name for a CSV export: `<prefix>-<period>-<isoDate>.csv`
pub fn csv_file_name(prefix: &str, period_token: &str, exported_on: NaiveDate) -> String {
    format!(
        "{}-{}-{}.csv",
        prefix,
        period_token,
        exported_on.format("%Y-%m-%d")
    )
}
