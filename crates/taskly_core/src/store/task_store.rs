//! Task store: CRUD, search, overdue sweep, summary.
//!
//! # Responsibility
//! - Own the in-memory task list and keep `tasks.json` in sync with it.
//! - Answer filtered queries without touching storage.
//!
//! # Invariants
//! - Every mutation persists the whole collection afterwards (best-effort).
//! - The overdue sweep persists even when nothing changed, so the document
//!   always reflects the swept state.
//! - Rejected updates leave both memory and storage untouched.

use crate::model::task::{Task, TaskId, TaskStatus, TaskUpdate, TaskValidationError};
use crate::storage::{StorageResult, TaskGateway};
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a task store operation.
#[derive(Debug)]
pub enum TaskStoreError {
    Validation(TaskValidationError),
    NotFound(TaskId),
}

impl Display for TaskStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for TaskStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for TaskStoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Filter options for searching tasks. All filters are conjunctive.
///
/// Empty-string filters count as absent, mirroring blank form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Case-insensitive substring match against the title.
    pub title: Option<String>,
    /// Exact priority name match.
    pub priority: Option<String>,
    /// Exact category name match; tasks without a category never match.
    pub category: Option<String>,
}

impl TaskQuery {
    /// Returns whether `task` satisfies every supplied filter.
    pub fn matches(&self, task: &Task) -> bool {
        let title_ok = match active_filter(&self.title) {
            Some(needle) => task.title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        let priority_ok = match active_filter(&self.priority) {
            Some(priority) => task.priority == priority,
            None => true,
        };
        let category_ok = match active_filter(&self.category) {
            Some(category) => task.category.as_deref() == Some(category),
            None => true,
        };
        title_ok && priority_ok && category_ok
    }
}

/// Aggregate counts over the current task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub delayed: usize,
    pub due_within_week: usize,
}

impl Display for TaskSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total: {} | Completed: {} | Delayed: {} | Due within a week: {}",
            self.total, self.completed, self.delayed, self.due_within_week
        )
    }
}

/// In-memory task collection backed by a [`TaskGateway`].
pub struct TaskStore<G: TaskGateway> {
    gateway: G,
    tasks: Vec<Task>,
}

impl<G: TaskGateway> TaskStore<G> {
    /// Loads the persisted task list through `gateway`.
    ///
    /// A missing document yields an empty store; a malformed one is an error.
    pub fn load(gateway: G) -> StorageResult<Self> {
        let tasks = gateway.load_tasks()?;
        Ok(Self { gateway, tasks })
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up one task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Appends a task and persists. Returns the task's ID.
    pub fn add(&mut self, task: Task) -> TaskId {
        let id = task.id;
        debug!("event=task_add module=store status=ok id={id}");
        self.tasks.push(task);
        self.persist();
        id
    }

    /// Replaces the editable fields of the task identified by `id`.
    ///
    /// # Errors
    /// - [`TaskStoreError::NotFound`] when no task has this ID.
    /// - [`TaskStoreError::Validation`] when the update fails validation;
    ///   the stored task is left unchanged.
    pub fn update(&mut self, id: TaskId, update: TaskUpdate) -> Result<(), TaskStoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskStoreError::NotFound(id))?;
        task.apply(update)?;
        debug!("event=task_update module=store status=ok id={id}");
        self.persist();
        Ok(())
    }

    /// Removes the task identified by `id` and persists.
    ///
    /// Returns the removed task, or `None` when the ID is unknown. Callers
    /// that track reminders delete those separately.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);
        debug!("event=task_remove module=store status=ok id={id}");
        self.persist();
        Some(removed)
    }

    /// Tasks satisfying every filter in `query`, in insertion order.
    pub fn search(&self, query: &TaskQuery) -> Vec<&Task> {
        self.tasks.iter().filter(|task| query.matches(task)).collect()
    }

    /// Moves every overdue task to `Delayed` and persists the collection.
    ///
    /// Persists even when nothing changed. Returns how many tasks moved.
    pub fn refresh_overdue_statuses(&mut self, today: NaiveDate) -> usize {
        let mut corrected = 0;
        for task in &mut self.tasks {
            if task.refresh_overdue(today) {
                corrected += 1;
            }
        }
        if corrected > 0 {
            info!("event=overdue_sweep module=store status=ok corrected={corrected}");
        }
        self.persist();
        corrected
    }

    /// Tasks currently in the `Delayed` state, in insertion order.
    pub fn delayed(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Delayed)
            .collect()
    }

    /// Aggregate counts for the status report.
    ///
    /// `delayed` counts tasks whose deadline has passed without completion,
    /// independent of the stored status label. A task is due within the week
    /// when its deadline falls inside `[today, today + 7 days)`, regardless
    /// of status.
    pub fn summary(&self, today: NaiveDate) -> TaskSummary {
        let week_end = today
            .checked_add_days(Days::new(7))
            .unwrap_or(NaiveDate::MAX);
        let mut summary = TaskSummary {
            total: self.tasks.len(),
            ..TaskSummary::default()
        };
        for task in &self.tasks {
            if task.status == TaskStatus::Completed {
                summary.completed += 1;
            }
            if task.is_overdue(today) {
                summary.delayed += 1;
            }
            if task
                .deadline
                .is_some_and(|deadline| deadline >= today && deadline < week_end)
            {
                summary.due_within_week += 1;
            }
        }
        summary
    }

    /// Re-files every task in category `old` under `new`. Memory-only; the
    /// registry cascade decides when to persist.
    pub(crate) fn reassign_category(&mut self, old: &str, new: &str) -> usize {
        let mut reassigned = 0;
        for task in &mut self.tasks {
            if task.category.as_deref() == Some(old) {
                task.category = Some(new.to_string());
                reassigned += 1;
            }
        }
        reassigned
    }

    /// Removes every task filed under `category`. Memory-only.
    pub(crate) fn remove_in_category(&mut self, category: &str) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|task| task.category.as_deref() != Some(category));
        before - self.tasks.len()
    }

    /// Re-labels every task with priority `old` to `new`. Memory-only.
    pub(crate) fn reassign_priority(&mut self, old: &str, new: &str) -> usize {
        let mut reassigned = 0;
        for task in &mut self.tasks {
            if task.priority == old {
                task.priority = new.to_string();
                reassigned += 1;
            }
        }
        reassigned
    }

    /// Best-effort save of the whole collection.
    pub(crate) fn persist(&self) {
        if let Err(err) = self.gateway.save_tasks(&self.tasks) {
            warn!("event=task_save module=store status=error error={err}");
        }
    }
}

fn active_filter(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.trim().is_empty())
}
