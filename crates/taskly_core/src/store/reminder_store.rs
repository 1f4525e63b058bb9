//! Reminder store: dedupe, due queries, delivery bookkeeping.
//!
//! # Responsibility
//! - Own the in-memory reminder list and keep `reminders.json` in sync.
//! - Enforce the add rules (no duplicates, no reminders for completed
//!   tasks).
//!
//! # Invariants
//! - At most one reminder exists per `(task_id, date)` pair.
//! - `mark_shown` mutates memory only; delivery passes batch their saves
//!   through [`ReminderStore::save`].

use crate::model::reminder::Reminder;
use crate::model::task::{Task, TaskId, TaskStatus};
use crate::storage::{ReminderGateway, StorageResult};
use chrono::NaiveDate;
use log::{debug, warn};

/// Result of attempting to add a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderAddOutcome {
    /// Reminder stored and persisted.
    Added,
    /// A reminder for this task and date already exists; nothing changed.
    Duplicate,
    /// The task is completed; completed tasks take no reminders.
    TaskCompleted,
}

/// In-memory reminder collection backed by a [`ReminderGateway`].
pub struct ReminderStore<G: ReminderGateway> {
    gateway: G,
    reminders: Vec<Reminder>,
}

impl<G: ReminderGateway> ReminderStore<G> {
    /// Loads the persisted reminder list through `gateway`.
    pub fn load(gateway: G) -> StorageResult<Self> {
        let reminders = gateway.load_reminders()?;
        Ok(Self {
            gateway,
            reminders,
        })
    }

    /// All reminders in insertion order.
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Adds a reminder for `task` on `date` and persists.
    ///
    /// Declined without side effects when the task is completed or an equal
    /// reminder already exists.
    pub fn add(&mut self, task: &Task, date: NaiveDate) -> ReminderAddOutcome {
        if task.status == TaskStatus::Completed {
            debug!(
                "event=reminder_add module=store status=declined reason=task_completed task_id={}",
                task.id
            );
            return ReminderAddOutcome::TaskCompleted;
        }
        if self.contains(task.id, date) {
            debug!(
                "event=reminder_add module=store status=declined reason=duplicate task_id={} date={date}",
                task.id
            );
            return ReminderAddOutcome::Duplicate;
        }

        self.reminders.push(Reminder::new(task.id, date));
        debug!(
            "event=reminder_add module=store status=ok task_id={} date={date}",
            task.id
        );
        self.save();
        ReminderAddOutcome::Added
    }

    /// Removes the reminder equal to `reminder` and persists.
    ///
    /// Returns `false` when no equal reminder exists.
    pub fn delete(&mut self, reminder: &Reminder) -> bool {
        let Some(index) = self.reminders.iter().position(|entry| entry == reminder) else {
            return false;
        };
        self.reminders.remove(index);
        self.save();
        true
    }

    /// Removes every reminder belonging to `task_id` and persists.
    ///
    /// Returns how many reminders were removed. Called when a task is
    /// deleted so no orphans survive it.
    pub fn delete_for_task(&mut self, task_id: TaskId) -> usize {
        let before = self.reminders.len();
        self.reminders.retain(|entry| entry.task_id != task_id);
        let removed = before - self.reminders.len();
        if removed > 0 {
            debug!(
                "event=reminder_cascade module=store status=ok task_id={task_id} removed={removed}"
            );
        }
        self.save();
        removed
    }

    /// All reminders belonging to `task_id`, in insertion order.
    pub fn reminders_for_task(&self, task_id: TaskId) -> Vec<&Reminder> {
        self.reminders
            .iter()
            .filter(|entry| entry.task_id == task_id)
            .collect()
    }

    /// Snapshot of reminders that are due and not yet delivered.
    ///
    /// Returns owned copies so a delivery pass can mark entries shown while
    /// iterating.
    pub fn due_unshown(&self, today: NaiveDate) -> Vec<Reminder> {
        self.reminders
            .iter()
            .filter(|entry| !entry.shown && entry.is_due(today))
            .cloned()
            .collect()
    }

    /// Marks the reminder for `(task_id, date)` as delivered, in memory only.
    ///
    /// Returns whether a reminder was newly marked.
    pub fn mark_shown(&mut self, task_id: TaskId, date: NaiveDate) -> bool {
        let Some(entry) = self
            .reminders
            .iter_mut()
            .find(|entry| entry.task_id == task_id && entry.date == date)
        else {
            return false;
        };
        if entry.shown {
            return false;
        }
        entry.shown = true;
        true
    }

    /// Best-effort save of the whole collection.
    pub fn save(&self) {
        if let Err(err) = self.gateway.save_reminders(&self.reminders) {
            warn!("event=reminder_save module=store status=error error={err}");
        }
    }

    fn contains(&self, task_id: TaskId, date: NaiveDate) -> bool {
        self.reminders
            .iter()
            .any(|entry| entry.task_id == task_id && entry.date == date)
    }
}
