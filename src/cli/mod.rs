//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod report;

pub use export::{handle_export_command, ExportCommands};
pub use report::{handle_chart_command, handle_summary_command, ChartCommands};

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;

use crate::config::{ReporterPaths, Settings};
use crate::display::{ReportStyle, SymbolFormatter};
use crate::error::{ReportError, ReportResult};
use crate::models::{CategoryCatalog, PeriodKind, PeriodSelector};
use crate::services::{JsonExpenseSource, ReportOrchestrator, ReportSnapshot};

/// Period selection shared by every report command
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Period: today, week, month, last-month, year, last-year, all, custom
    #[arg(short, long)]
    pub period: Option<String>,

    /// Start date for a custom period (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date for a custom period (YYYY-MM-DD); also ends an `all` period
    #[arg(short, long)]
    pub end: Option<String>,
}

impl PeriodArgs {
    /// Build the selector; dates without a period imply a custom range
    pub fn to_selector(&self) -> ReportResult<PeriodSelector> {
        let start = self.start.as_deref().map(parse_date).transpose()?;
        let end = self.end.as_deref().map(parse_date).transpose()?;

        let kind = match &self.period {
            Some(period) => period
                .parse::<PeriodKind>()
                .map_err(|e| ReportError::Validation(e.to_string()))?,
            None if start.is_some() || end.is_some() => PeriodKind::Custom,
            None => PeriodKind::default(),
        };

        Ok(match kind {
            PeriodKind::Custom => PeriodSelector::custom(start, end),
            PeriodKind::All => PeriodSelector {
                custom_end: end,
                ..PeriodSelector::named(PeriodKind::All)
            },
            kind => PeriodSelector::named(kind),
        })
    }
}

fn parse_date(s: &str) -> ReportResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ReportError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", s)))
}

/// Everything a command needs: paths, settings and the data source
pub struct ReportContext {
    pub paths: ReporterPaths,
    pub settings: Settings,
    pub catalog: CategoryCatalog,
    pub formatter: SymbolFormatter,
    source: Arc<JsonExpenseSource>,
}

impl ReportContext {
    pub fn new(paths: ReporterPaths, settings: Settings) -> Self {
        let source = Arc::new(JsonExpenseSource::new(&paths));
        Self {
            paths,
            settings,
            catalog: CategoryCatalog::default(),
            formatter: SymbolFormatter,
            source,
        }
    }

    pub fn orchestrator(&self) -> ReportOrchestrator {
        ReportOrchestrator::new(self.source.clone(), &self.settings)
    }

    /// Fetch and aggregate the selected period
    pub async fn load(&self, period: &PeriodArgs) -> ReportResult<Arc<ReportSnapshot>> {
        let orchestrator = self.orchestrator();
        orchestrator.set_period(period.to_selector()?).await?;
        Ok(orchestrator.snapshot())
    }

    pub fn style(&self) -> ReportStyle<'_> {
        ReportStyle {
            catalog: &self.catalog,
            formatter: &self.formatter,
            currency_code: &self.settings.currency_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> PeriodArgs {
        PeriodArgs {
            period: period.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
        }
    }

    #[test]
    fn test_default_is_this_month() {
        assert_eq!(
            PeriodArgs::default().to_selector().unwrap(),
            PeriodSelector::named(PeriodKind::Month)
        );
    }

    #[test]
    fn test_dates_alone_imply_custom() {
        let selector = args(None, Some("2024-03-01"), None).to_selector().unwrap();
        assert_eq!(selector.kind, PeriodKind::Custom);
        assert!(!selector.is_complete());
    }

    #[test]
    fn test_all_keeps_end_override() {
        let selector = args(Some("all"), None, Some("2024-06-30")).to_selector().unwrap();
        assert_eq!(selector.kind, PeriodKind::All);
        assert_eq!(selector.custom_end, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_bad_input_is_validation_error() {
        assert!(args(Some("fortnight"), None, None).to_selector().unwrap_err().is_validation());
        assert!(args(None, Some("03/01/2024"), None).to_selector().unwrap_err().is_validation());
    }
}
