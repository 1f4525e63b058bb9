//! Core domain logic for Taskly.
//! This crate is the single source of truth for business invariants.

pub mod logging;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod workspace;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::reminder::{Reminder, ReminderDateError, ReminderRule};
pub use model::task::{
    Task, TaskId, TaskStatus, TaskUpdate, TaskValidationError, DEFAULT_PRIORITY,
};
pub use scheduler::{
    dispatch_due_reminders, NotificationSink, ReminderNotification, ReminderScheduler,
    DEFAULT_TICK_INTERVAL,
};
pub use storage::{
    CategoryGateway, DocumentGateway, JsonGateway, PriorityGateway, ReminderGateway, StorageError,
    StorageResult, TaskGateway,
};
pub use store::category_registry::CategoryRegistry;
pub use store::priority_registry::PriorityRegistry;
pub use store::reminder_store::{ReminderAddOutcome, ReminderStore};
pub use store::task_store::{TaskQuery, TaskStore, TaskStoreError, TaskSummary};
pub use workspace::Workspace;

use chrono::NaiveDate;

/// Today's date in the local timezone.
///
/// Call sites pass this into the time-dependent store operations, so tests
/// can pin dates instead.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
