//! Chart data projections
//!
//! Reshapes a `ReportSummary` into the parallel label/value arrays chart
//! widgets consume. Each projection is independent and recomputed on demand.

use chrono::NaiveDate;
use serde::Serialize;

use super::summary::ReportSummary;
use crate::models::CategoryCatalog;

/// Number of entries in the top-categories projection
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// Fill colors cycled across distribution slices
pub const CHART_PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#C9CBCF", "#8BC34A",
];

/// Category distribution: one slice per category, in first-seen order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

/// Largest categories, largest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategories {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// Per-day totals in calendar order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl CategoryDistribution {
    pub fn from_summary(summary: &ReportSummary, catalog: &CategoryCatalog) -> Self {
        let mut labels = Vec::with_capacity(summary.category_totals.len());
        let mut values = Vec::with_capacity(summary.category_totals.len());
        let mut colors = Vec::with_capacity(summary.category_totals.len());

        for (index, (key, total)) in summary.category_totals.iter().enumerate() {
            labels.push(catalog.display_name(key).to_string());
            values.push(total.to_f64());
            colors.push(CHART_PALETTE[index % CHART_PALETTE.len()]);
        }

        Self {
            labels,
            values,
            colors,
        }
    }
}

impl TopCategories {
    pub fn from_summary(summary: &ReportSummary, catalog: &CategoryCatalog) -> Self {
        let (labels, values) = summary
            .category_totals
            .sorted_descending()
            .into_iter()
            .take(TOP_CATEGORY_LIMIT)
            .map(|(key, total)| (catalog.display_name(key).to_string(), total.to_f64()))
            .unzip();

        Self { labels, values }
    }
}

impl DailyTrend {
    pub fn from_summary(summary: &ReportSummary) -> Self {
        // BTreeMap keys are NaiveDate, so iteration is already calendar order
        let (dates, values) = summary
            .daily_totals
            .iter()
            .map(|(date, total)| (*date, total.to_f64()))
            .unzip();

        Self { dates, values }
    }

    /// Dates rendered for axis labels
    pub fn labels(&self, date_format: &str) -> Vec<String> {
        self.dates
            .iter()
            .map(|d| d.format(date_format).to_string())
            .collect()
    }
}
