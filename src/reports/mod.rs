//! Reports module for the expense reporter
//!
//! Provides the aggregated spending summary for a period and the chart-ready
//! projections derived from it.

pub mod charts;
pub mod summary;

pub use charts::{CategoryDistribution, DailyTrend, TopCategories, TOP_CATEGORY_LIMIT};
pub use summary::{CategoryTotals, ReportSummary};
