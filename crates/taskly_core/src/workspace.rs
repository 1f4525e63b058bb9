//! Shared working set: the four stores over one backend.
//!
//! # Responsibility
//! - Wire every store to the same gateway and restore them together.
//! - Offer the cross-store operations a front end needs as one call.
//!
//! # Invariants
//! - Loading runs the overdue sweep, so no caller ever observes a stale
//!   status from a previous session.
//! - Removing a task always removes its reminders with it.

use crate::model::task::{Task, TaskId};
use crate::storage::{DocumentGateway, StorageResult};
use crate::store::category_registry::CategoryRegistry;
use crate::store::priority_registry::PriorityRegistry;
use crate::store::reminder_store::ReminderStore;
use crate::store::task_store::TaskStore;
use chrono::NaiveDate;
use log::info;

/// Every store of one data directory, loaded together.
///
/// Front ends share a `Workspace` between their command loop and the
/// reminder scheduler behind a mutex; all store access stays serialized.
pub struct Workspace<G: DocumentGateway> {
    pub tasks: TaskStore<G>,
    pub categories: CategoryRegistry<G>,
    pub priorities: PriorityRegistry<G>,
    pub reminders: ReminderStore<G>,
}

impl<G: DocumentGateway> Workspace<G> {
    /// Restores all four collections through `gateway` and runs the startup
    /// overdue sweep.
    ///
    /// # Errors
    /// Fails when any present document cannot be read or decoded. Missing
    /// documents load as empty collections.
    pub fn load(gateway: G, today: NaiveDate) -> StorageResult<Self>
    where
        G: Clone,
    {
        let mut tasks = TaskStore::load(gateway.clone())?;
        let categories = CategoryRegistry::load(gateway.clone())?;
        let priorities = PriorityRegistry::load(gateway.clone())?;
        let reminders = ReminderStore::load(gateway)?;

        tasks.refresh_overdue_statuses(today);
        info!(
            "event=workspace_load module=core status=ok tasks={} categories={} priorities={} reminders={}",
            tasks.len(),
            categories.categories().len(),
            priorities.priorities().len(),
            reminders.len()
        );

        Ok(Self {
            tasks,
            categories,
            priorities,
            reminders,
        })
    }

    /// Removes a task together with its reminders.
    ///
    /// Returns the removed task, or `None` when the ID is unknown (in which
    /// case nothing is touched).
    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let removed = self.tasks.remove(id)?;
        self.reminders.delete_for_task(id);
        Some(removed)
    }

    /// Best-effort flush of every collection, for shutdown paths.
    pub fn save_all(&self) {
        self.tasks.persist();
        self.categories.persist();
        self.priorities.persist();
        self.reminders.save();
        info!("event=workspace_save module=core status=ok");
    }
}
