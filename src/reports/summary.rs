//! Report Summary
//!
//! Aggregates expense records into totals, per-category totals and per-day
//! totals in a single pass. A summary is always rebuilt from scratch; there
//! is no incremental update path.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ReportError;
use crate::models::{ExpenseRecord, Money};

/// Category totals in first-seen order
///
/// Insertion order is what the category distribution chart shows; every
/// other consumer re-sorts explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    entries: Vec<(String, Money)>,
}

impl CategoryTotals {
    /// Set a category's total, appending the category on first sight
    pub fn set(&mut self, category: &str, total: Money) {
        match self.entries.iter_mut().find(|(key, _)| key == category) {
            Some((_, existing)) => *existing = total,
            None => self.entries.push((category.to_string(), total)),
        }
    }

    /// Total for one category
    pub fn get(&self, category: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|(key, _)| key == category)
            .map(|(_, total)| *total)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.entries.iter().map(|(key, total)| (key.as_str(), *total))
    }

    /// Entries sorted by total, largest first; ties keep insertion order
    pub fn sorted_descending(&self) -> Vec<(&str, Money)> {
        let mut sorted: Vec<_> = self.iter().collect();
        // sort_by is stable, which is what makes the tie order defined
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all category totals
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, total)| *total).sum()
    }
}

/// Aggregated view of one period's expenses
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Sum of all accumulated amounts
    pub total_spent: Money,
    /// Per-category totals, categories present in the data only
    pub category_totals: CategoryTotals,
    /// Per-day totals
    pub daily_totals: BTreeMap<NaiveDate, Money>,
    /// Number of records that were accumulated
    pub transaction_count: usize,
    /// `total_spent / transaction_count`, zero for an empty summary
    pub average_transaction: f64,
    /// Records dropped because their amount did not parse or overflowed
    pub skipped_records: usize,
}

impl ReportSummary {
    /// The summary of nothing, used for incomplete periods and failed fetches
    pub fn empty() -> Self {
        Self::default()
    }

    /// Aggregate a set of records
    ///
    /// Records whose amount does not parse, or would push a total past the
    /// representable range, are skipped with a warning and counted in
    /// `skipped_records`; one bad record never blanks a report.
    pub fn aggregate(records: &[ExpenseRecord]) -> Self {
        let mut summary = Self::default();

        for record in records {
            let amount = match record.amount.parse() {
                Ok(amount) => amount,
                Err(_) => {
                    let err = ReportError::malformed_amount(
                        record.id.to_string(),
                        record.amount.as_str(),
                    );
                    tracing::warn!(expense = %record.id, "{}; record skipped", err);
                    summary.skipped_records += 1;
                    continue;
                }
            };

            let Some((total, category_total, day_total)) = summary.accumulated(record, amount)
            else {
                tracing::warn!(
                    expense = %record.id,
                    amount = record.amount.as_str(),
                    "Amount overflows the report totals; record skipped"
                );
                summary.skipped_records += 1;
                continue;
            };

            summary.total_spent = total;
            summary.category_totals.set(&record.category, category_total);
            summary.daily_totals.insert(record.date, day_total);
            summary.transaction_count += 1;
        }

        summary.average_transaction = if summary.transaction_count == 0 {
            0.0
        } else {
            summary.total_spent.to_f64() / summary.transaction_count as f64
        };

        summary
    }

    /// Totals after adding `amount`, or `None` if any of them overflows
    fn accumulated(&self, record: &ExpenseRecord, amount: Money) -> Option<(Money, Money, Money)> {
        let total = self.total_spent.checked_add(amount)?;
        let category_total = self
            .category_totals
            .get(&record.category)
            .unwrap_or_default()
            .checked_add(amount)?;
        let day_total = self
            .daily_totals
            .get(&record.date)
            .copied()
            .unwrap_or_default()
            .checked_add(amount)?;
        Some((total, category_total, day_total))
    }

    /// True when nothing was accumulated
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// Share of total spending for one category, in percent
    pub fn category_percentage(&self, category: &str) -> f64 {
        match self.category_totals.get(category) {
            Some(total) if !self.total_spent.is_zero() => {
                total.to_f64() / self.total_spent.to_f64() * 100.0
            }
            _ => 0.0,
        }
    }

    /// Average as money, rounded to the nearest cent
    pub fn average_money(&self) -> Money {
        Money::from_cents((self.average_transaction * 100.0).round() as i64)
    }
}
