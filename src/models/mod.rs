//! Core data models for the expense reporter
//!
//! This module contains the data structures that describe the reporting
//! domain: expenses, budgets, categories, money and reporting periods.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod period;

pub use budget::Budget;
pub use category::{CategoryCatalog, CategoryInfo};
pub use expense::{ExpenseRecord, RawAmount};
pub use ids::{BudgetId, ExpenseId};
pub use money::Money;
pub use period::{PeriodKind, PeriodSelector, ResolvedInterval};
