//! User settings for the expense reporter
//!
//! Manages reporting preferences: currency, date formatting, week start,
//! account creation date (the floor for all-time reports), export naming and
//! the fetch timeout.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paths::ReporterPaths;
use crate::error::ReportError;
use crate::storage::file_io::write_json_atomic;

/// User settings for the expense reporter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// ISO 4217 currency code used when formatting amounts
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// When the account was created; start of the "all" period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_created_at: Option<DateTime<Utc>>,

    /// Title printed at the top of document reports
    #[serde(default = "default_report_title")]
    pub report_title: String,

    /// Optional JPEG logo placed in the document header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<PathBuf>,

    /// File name prefix for CSV exports
    #[serde(default = "default_csv_prefix")]
    pub csv_prefix: String,

    /// File name prefix for document exports
    #[serde(default = "default_document_prefix")]
    pub document_prefix: String,

    /// Overrides the platform documents directory for exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<PathBuf>,

    /// Upper bound on a single fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

fn default_report_title() -> String {
    "Expense Report".to_string()
}

fn default_csv_prefix() -> String {
    "expenses".to_string()
}

fn default_document_prefix() -> String {
    "expense-report".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_code: default_currency_code(),
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
            account_created_at: None,
            report_title: default_report_title(),
            logo_path: None,
            csv_prefix: default_csv_prefix(),
            document_prefix: default_document_prefix(),
            documents_dir: None,
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ReporterPaths) -> Result<Self, ReportError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ReportError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ReportError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReporterPaths) -> Result<(), ReportError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Reject values that would make period resolution or fetching misbehave
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.first_day_of_week > 6 {
            return Err(ReportError::Config(format!(
                "first_day_of_week must be 0-6, got {}",
                self.first_day_of_week
            )));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ReportError::Config(format!(
                "Invalid date_format: {}",
                self.date_format
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ReportError::Config(
                "fetch_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_code, "USD");
        assert_eq!(settings.first_day_of_week, 0);
        assert_eq!(settings.csv_prefix, "expenses");
        assert!(settings.account_created_at.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_code = "EUR".into();
        settings.first_day_of_week = 1;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_code, "EUR");
        assert_eq!(loaded.first_day_of_week, 1);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_code": "JPY"}"#).unwrap();
        assert_eq!(settings.currency_code, "JPY");
        assert_eq!(settings.report_title, "Expense Report");
        assert_eq!(settings.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_week_start_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReporterPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"first_day_of_week": 9}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        let mut settings = Settings::default();
        settings.date_format = "%Y-%Q".into();
        assert!(settings.validate().is_err());

        settings.date_format = "%d/%m/%Y".into();
        assert!(settings.validate().is_ok());
    }
}
