//! Report orchestration
//!
//! `ReportOrchestrator` owns the selected period and the latest report. A
//! refresh resolves the period, fetches through the `ExpenseSource`,
//! aggregates, and publishes an immutable `ReportSnapshot`. Refreshes may
//! overlap; each takes a generation number and only the newest generation
//! is allowed to publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::sync::broadcast::error::RecvError;

use super::events::{DataChangeBus, WatchHandle};
use super::period::PeriodResolver;
use super::source::ExpenseSource;
use crate::config::Settings;
use crate::error::{ReportError, ReportResult};
use crate::models::{Budget, ExpenseRecord, PeriodSelector, ResolvedInterval};
use crate::reports::ReportSummary;

/// Everything one report view or export needs, captured at one moment
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub selector: PeriodSelector,
    /// `None` while a custom range is incomplete or after a failure
    pub interval: Option<ResolvedInterval>,
    pub records: Vec<ExpenseRecord>,
    pub budgets: Vec<Budget>,
    pub summary: ReportSummary,
}

impl ReportSnapshot {
    /// No data for `selector`
    pub fn empty(selector: PeriodSelector) -> Self {
        Self {
            selector,
            interval: None,
            records: Vec::new(),
            budgets: Vec::new(),
            summary: ReportSummary::empty(),
        }
    }
}

/// What a refresh did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was published
    Updated,
    /// The custom range is missing a bound; the empty report was published
    Incomplete,
    /// A newer refresh started first; this result was dropped
    Superseded,
}

struct State {
    selector: PeriodSelector,
    snapshot: Arc<ReportSnapshot>,
    loading: bool,
    last_error: Option<String>,
}

/// Coordinates period selection, fetching and aggregation
pub struct ReportOrchestrator {
    source: Arc<dyn ExpenseSource>,
    resolver: PeriodResolver,
    account_created: Option<NaiveDate>,
    fetch_timeout: Duration,
    fixed_today: Option<NaiveDate>,
    generation: AtomicU64,
    state: Mutex<State>,
}

impl ReportOrchestrator {
    pub fn new(source: Arc<dyn ExpenseSource>, settings: &Settings) -> Self {
        let selector = PeriodSelector::default();
        Self {
            source,
            resolver: PeriodResolver::from_settings(settings),
            account_created: settings.account_created_at.map(local_date),
            fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
            fixed_today: None,
            generation: AtomicU64::new(0),
            state: Mutex::new(State {
                snapshot: Arc::new(ReportSnapshot::empty(selector.clone())),
                selector,
                loading: false,
                last_error: None,
            }),
        }
    }

    /// Resolve periods against a fixed date instead of the clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // State stays consistent across a panic elsewhere, so a poisoned lock is usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(PeriodResolver::today)
    }

    /// Select a period and refresh
    pub async fn set_period(&self, selector: PeriodSelector) -> ReportResult<RefreshOutcome> {
        self.state().selector = selector;
        self.refresh().await
    }

    /// Switch to a custom range and refresh
    ///
    /// Either bound may be missing while the user is still picking; that
    /// publishes the empty report without fetching.
    pub async fn set_custom_bounds(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ReportResult<RefreshOutcome> {
        self.set_period(PeriodSelector::custom(start, end)).await
    }

    /// Resolve, fetch and aggregate for the current selection
    ///
    /// Safe to call redundantly. A fetch failure publishes the empty report,
    /// records the error and returns it; the orchestrator stays usable.
    pub async fn refresh(&self) -> ReportResult<RefreshOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let selector = self.state().selector.clone();
        self.run(generation, selector).await
    }

    async fn run(&self, generation: u64, selector: PeriodSelector) -> ReportResult<RefreshOutcome> {
        let interval = match self
            .resolver
            .resolve(&selector, self.account_created, self.today())
        {
            Ok(interval) => interval,
            Err(ReportError::IncompleteSelector) => {
                self.publish(generation, ReportSnapshot::empty(selector), None);
                return Ok(RefreshOutcome::Incomplete);
            }
            Err(e) => {
                self.publish(generation, ReportSnapshot::empty(selector), Some(e.to_string()));
                return Err(e);
            }
        };

        if !self.mark_loading(generation) {
            tracing::debug!(generation, "Refresh superseded before fetching");
            return Ok(RefreshOutcome::Superseded);
        }
        tracing::debug!(generation, %interval, "Refreshing report");

        let fetched = match tokio::time::timeout(self.fetch_timeout, self.fetch(&interval)).await {
            Ok(result) => result,
            Err(_) => Err(ReportError::FetchFailed(format!(
                "timed out after {}s",
                self.fetch_timeout.as_secs_f32()
            ))),
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Refresh superseded, result dropped");
            return Ok(RefreshOutcome::Superseded);
        }

        match fetched {
            Ok((records, budgets)) => {
                let summary = ReportSummary::aggregate(&records);
                let snapshot = ReportSnapshot {
                    selector,
                    interval: Some(interval),
                    records,
                    budgets,
                    summary,
                };
                if self.publish(generation, snapshot, None) {
                    Ok(RefreshOutcome::Updated)
                } else {
                    Ok(RefreshOutcome::Superseded)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Report fetch failed");
                self.publish(generation, ReportSnapshot::empty(selector), Some(e.to_string()));
                Err(e)
            }
        }
    }

    async fn fetch(
        &self,
        interval: &ResolvedInterval,
    ) -> ReportResult<(Vec<ExpenseRecord>, Vec<Budget>)> {
        let as_fetch_failure = |e: ReportError| match e {
            ReportError::FetchFailed(_) => e,
            other => ReportError::FetchFailed(other.to_string()),
        };
        let records = self
            .source
            .fetch_expenses(interval.start, interval.end)
            .await
            .map_err(as_fetch_failure)?;
        let budgets = self.source.fetch_budgets().await.map_err(as_fetch_failure)?;
        Ok((records, budgets))
    }

    /// Set the loading flag if `generation` is still the newest
    fn mark_loading(&self, generation: u64) -> bool {
        let mut state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        state.loading = true;
        true
    }

    /// Publish a snapshot if `generation` is still the newest.
    /// Returns false when a newer refresh has started.
    fn publish(&self, generation: u64, snapshot: ReportSnapshot, error: Option<String>) -> bool {
        let mut state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        state.snapshot = Arc::new(snapshot);
        state.loading = false;
        state.last_error = error;
        true
    }

    /// The latest published report
    pub fn snapshot(&self) -> Arc<ReportSnapshot> {
        Arc::clone(&self.state().snapshot)
    }

    pub fn summary(&self) -> ReportSummary {
        self.snapshot().summary.clone()
    }

    pub fn selector(&self) -> PeriodSelector {
        self.state().selector.clone()
    }

    /// True while the newest refresh is waiting on the source
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Message of the last failed refresh, cleared by the next success
    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Refresh whenever a data change is published on `bus`
    ///
    /// The listener holds only a weak reference, so it never keeps the
    /// orchestrator alive; dropping the handle stops it.
    pub fn watch(self: &Arc<Self>, bus: &DataChangeBus) -> WatchHandle {
        let mut events = bus.subscribe();
        let orchestrator = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => tracing::debug!(%event, "Data changed, refreshing report"),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::debug!(missed, "Missed data change events, refreshing report")
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(orchestrator) = orchestrator.upgrade() else {
                    break;
                };
                // Failures are recorded in last_error by refresh itself
                let _ = orchestrator.refresh().await;
            }
        });

        WatchHandle::new(task)
    }
}

/// Calendar date of an instant in the local time zone
fn local_date(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}
