//! Service layer for the expense reporter
//!
//! The service layer turns a period selection into a published report:
//! period resolution, the expense source boundary, change notifications and
//! the orchestrator tying them together.

pub mod events;
pub mod orchestrator;
pub mod period;
pub mod source;

pub use events::{DataChangeBus, DataChangeEvent, WatchHandle};
pub use orchestrator::{RefreshOutcome, ReportOrchestrator, ReportSnapshot};
pub use period::PeriodResolver;
pub use source::{ExpenseSource, JsonExpenseSource};
