//! Expense sources
//!
//! The orchestrator fetches through `ExpenseSource`, the one asynchronous
//! boundary in the crate. `JsonExpenseSource` serves the JSON data files in
//! the reporter's data directory.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ReporterPaths;
use crate::error::{ReportError, ReportResult};
use crate::models::{Budget, ExpenseRecord};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Where expenses and budgets come from
#[async_trait::async_trait]
pub trait ExpenseSource: Send + Sync {
    /// Expenses dated within `start..=end`, in source order
    async fn fetch_expenses(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReportResult<Vec<ExpenseRecord>>;

    /// All budgets
    async fn fetch_budgets(&self) -> ReportResult<Vec<Budget>>;
}

/// Serializable expense file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseData {
    pub expenses: Vec<ExpenseRecord>,
}

/// Serializable budget file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetData {
    pub budgets: Vec<Budget>,
}

/// Source backed by `expenses.json` and `budgets.json`
///
/// Missing files read as empty.
#[derive(Debug, Clone)]
pub struct JsonExpenseSource {
    expenses_file: PathBuf,
    budgets_file: PathBuf,
}

impl JsonExpenseSource {
    pub fn new(paths: &ReporterPaths) -> Self {
        Self {
            expenses_file: paths.expenses_file(),
            budgets_file: paths.budgets_file(),
        }
    }

    /// Replace the stored expenses
    pub fn save_expenses(&self, expenses: Vec<ExpenseRecord>) -> ReportResult<()> {
        write_json_atomic(&self.expenses_file, &ExpenseData { expenses })
    }

    /// Replace the stored budgets
    pub fn save_budgets(&self, budgets: Vec<Budget>) -> ReportResult<()> {
        write_json_atomic(&self.budgets_file, &BudgetData { budgets })
    }
}

/// Run a blocking file read off the async executor
async fn blocking<T, F>(f: F) -> ReportResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ReportResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ReportError::Storage(format!("Read task failed: {}", e)))?
}

#[async_trait::async_trait]
impl ExpenseSource for JsonExpenseSource {
    async fn fetch_expenses(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ReportResult<Vec<ExpenseRecord>> {
        let path = self.expenses_file.clone();
        let data: ExpenseData = blocking(move || read_json(path)).await?;

        let expenses: Vec<_> = data
            .expenses
            .into_iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect();
        tracing::debug!(count = expenses.len(), %start, %end, "Fetched expenses");
        Ok(expenses)
    }

    async fn fetch_budgets(&self) -> ReportResult<Vec<Budget>> {
        let path = self.budgets_file.clone();
        let data: BudgetData = blocking(move || read_json(path)).await?;
        Ok(data.budgets)
    }
}
