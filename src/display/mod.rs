//! Display formatting for terminal output
//!
//! Provides currency formatting and plain-text renderings of reports and
//! chart data.

pub mod currency;
pub mod report;

pub use currency::{CurrencyFormatter, SymbolFormatter};
pub use report::{
    format_distribution, format_heading, format_summary, format_top_categories, format_trend,
    ReportStyle,
};
