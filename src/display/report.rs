//! Report formatting for terminal output
//!
//! Renders summaries and chart projections as plain-text tables and bars.

use crate::models::{Budget, CategoryCatalog, ResolvedInterval};
use crate::reports::{CategoryDistribution, DailyTrend, ReportSummary, TopCategories};

use super::currency::CurrencyFormatter;

const BAR_WIDTH: usize = 30;

/// Formatting inputs shared by all report views
pub struct ReportStyle<'a> {
    pub catalog: &'a CategoryCatalog,
    pub formatter: &'a dyn CurrencyFormatter,
    pub currency_code: &'a str,
}

impl ReportStyle<'_> {
    fn money(&self, amount: crate::models::Money) -> String {
        self.formatter.format(amount, self.currency_code)
    }
}

/// Format the summary: totals, then a category breakdown largest first
pub fn format_summary(
    heading: &str,
    summary: &ReportSummary,
    budgets: &[Budget],
    style: &ReportStyle<'_>,
) -> String {
    let mut output = String::new();
    output.push_str(heading);
    output.push('\n');
    output.push_str(&separator(heading.chars().count().max(40)));
    output.push('\n');

    if summary.is_empty() {
        output.push_str("No expenses in this period.\n");
        return output;
    }

    output.push_str(&format!("Total spent:   {}\n", style.money(summary.total_spent)));
    output.push_str(&format!("Transactions:  {}\n", summary.transaction_count));
    output.push_str(&format!("Average:       {}\n", style.money(summary.average_money())));
    if summary.skipped_records > 0 {
        output.push_str(&format!(
            "Skipped:       {} record(s) with unreadable amounts\n",
            summary.skipped_records
        ));
    }
    output.push('\n');

    let rows: Vec<_> = summary
        .category_totals
        .sorted_descending()
        .into_iter()
        .map(|(key, total)| {
            let budget = budgets
                .iter()
                .find(|b| b.category == key)
                .and_then(|b| b.amount.parse().ok())
                .map(|limit| style.money(limit))
                .unwrap_or_default();
            (
                style.catalog.display_name(key).to_string(),
                style.money(total),
                format_percentage(summary.category_percentage(key)),
                budget,
            )
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|r| r.0.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    output.push_str(&format!(
        "{:<name_width$}  {:>12}  {:>6}  {:>12}\n",
        "Category",
        "Amount",
        "Share",
        "Budget",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->12}  {:->6}  {:->12}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));
    for (name, amount, share, budget) in rows {
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>6}  {:>12}\n",
            name,
            amount,
            share,
            budget,
            name_width = name_width,
        ));
    }

    output
}

/// Format the category distribution as labelled bars
pub fn format_distribution(chart: &CategoryDistribution, style: &ReportStyle<'_>) -> String {
    let amounts: Vec<String> = chart.values.iter().map(|v| money_from_f64(*v, style)).collect();
    format_bars(&chart.labels, &chart.values, &amounts)
}

/// Format the top categories, largest first
pub fn format_top_categories(chart: &TopCategories, style: &ReportStyle<'_>) -> String {
    let labels: Vec<String> = chart
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}", i + 1, label))
        .collect();
    let amounts: Vec<String> = chart.values.iter().map(|v| money_from_f64(*v, style)).collect();
    format_bars(&labels, &chart.values, &amounts)
}

/// Format the daily trend, one line per day with spending
pub fn format_trend(chart: &DailyTrend, date_format: &str, style: &ReportStyle<'_>) -> String {
    let labels = chart.labels(date_format);
    let amounts: Vec<String> = chart.values.iter().map(|v| money_from_f64(*v, style)).collect();
    format_bars(&labels, &chart.values, &amounts)
}

/// Heading for a report over `interval`
pub fn format_heading(title: &str, period_line: &str, interval: Option<&ResolvedInterval>) -> String {
    match interval {
        Some(interval) => format!("{} - {} ({} days)", title, period_line, interval.num_days()),
        None => format!("{} - select both a start and an end date", title),
    }
}

fn money_from_f64(value: f64, style: &ReportStyle<'_>) -> String {
    style.money(crate::models::Money::from_cents((value * 100.0).round() as i64))
}

fn format_bars(labels: &[String], values: &[f64], amounts: &[String]) -> String {
    if labels.is_empty() {
        return "No expenses in this period.\n".to_string();
    }

    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max_value = values.iter().cloned().fold(0.0_f64, f64::max);

    let mut output = String::new();
    for ((label, value), amount) in labels.iter().zip(values).zip(amounts) {
        output.push_str(&format!(
            "{:<label_width$}  {}  {}\n",
            label,
            format_bar(*value, max_value, BAR_WIDTH),
            amount,
            label_width = label_width,
        ));
    }
    output
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}
