//! Expense reporter - spending summaries, charts and exports for a period
//!
//! This library turns a reporting period ("this month", "last year", a custom
//! range) into an aggregated spending summary, chart-ready projections, a CSV
//! export of the underlying records and a paginated PDF report.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, budgets, categories, money, periods)
//! - `storage`: JSON file storage with atomic writes
//! - `services`: Period resolution, the expense source, change notifications
//!   and the report orchestrator
//! - `reports`: Aggregation and chart projections
//! - `export`: CSV and PDF exports and their delivery
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `expense-report` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use expense_reporter::config::{ReporterPaths, Settings};
//! use expense_reporter::services::{JsonExpenseSource, ReportOrchestrator};
//!
//! let paths = ReporterPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let source = Arc::new(JsonExpenseSource::new(&paths));
//! let orchestrator = ReportOrchestrator::new(source, &settings);
//! orchestrator.refresh().await?;
//! println!("{}", orchestrator.summary().total_spent);
//! ```

use std::sync::Once;

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ReportError, ReportResult};

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber once
///
/// `RUST_LOG` overrides the default `expense_reporter=info`. Output goes to
/// stderr so report text on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("expense_reporter=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
