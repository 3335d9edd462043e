//! Data change notifications
//!
//! Whoever mutates expenses, budgets or the currency publishes on a
//! `DataChangeBus`; report orchestrators watching the bus refresh.

use std::fmt;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const DEFAULT_CAPACITY: usize = 64;

/// Kinds of external mutation that invalidate a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataChangeEvent {
    ExpenseAdded,
    ExpenseUpdated,
    ExpenseDeleted,
    BudgetAdded,
    BudgetUpdated,
    BudgetDeleted,
    CurrencyChanged,
}

impl DataChangeEvent {
    pub const ALL: [DataChangeEvent; 7] = [
        Self::ExpenseAdded,
        Self::ExpenseUpdated,
        Self::ExpenseDeleted,
        Self::BudgetAdded,
        Self::BudgetUpdated,
        Self::BudgetDeleted,
        Self::CurrencyChanged,
    ];
}

impl fmt::Display for DataChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExpenseAdded => "expense-added",
            Self::ExpenseUpdated => "expense-updated",
            Self::ExpenseDeleted => "expense-deleted",
            Self::BudgetAdded => "budget-added",
            Self::BudgetUpdated => "budget-updated",
            Self::BudgetDeleted => "budget-deleted",
            Self::CurrencyChanged => "currency-changed",
        };
        write!(f, "{}", name)
    }
}

/// Broadcast channel for data change events
#[derive(Debug, Clone)]
pub struct DataChangeBus {
    sender: broadcast::Sender<DataChangeEvent>,
}

impl DataChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event, returning how many listeners received it
    pub fn publish(&self, event: DataChangeEvent) -> usize {
        match self.sender.send(event) {
            Ok(listeners) => listeners,
            Err(_) => {
                tracing::debug!(%event, "No listeners for data change");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DataChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for DataChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Owns a listener task; dropping the handle stops the listener
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub(crate) fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stop listening now
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_listeners() {
        let bus = DataChangeBus::default();
        assert_eq!(bus.publish(DataChangeEvent::ExpenseAdded), 0);
    }

    #[test]
    fn test_every_kind_is_delivered() {
        let bus = DataChangeBus::default();
        let mut rx = bus.subscribe();

        for event in DataChangeEvent::ALL {
            assert_eq!(bus.publish(event), 1);
        }
        for event in DataChangeEvent::ALL {
            assert_eq!(rx.try_recv().unwrap(), event);
        }
    }

    #[tokio::test]
    async fn test_dropping_handle_aborts_task() {
        let bus = DataChangeBus::default();
        let mut rx = bus.subscribe();
        let handle = WatchHandle::new(tokio::spawn(async move {
            while rx.recv().await.is_ok() {}
        }));
        assert_eq!(bus.listener_count(), 1);

        handle.unsubscribe();
        for _ in 0..50 {
            if bus.listener_count() == 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(bus.listener_count(), 0);
    }
}
