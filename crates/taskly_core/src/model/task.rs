//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its lifecycle states.
//! - Validate user-supplied fields before they enter a store.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reused.
//! - `title` is non-empty after trimming.
//! - `priority` always names an entry of the priority registry; tasks created
//!   without an explicit priority fall back to [`DEFAULT_PRIORITY`].
//! - `status` is never silently rewritten by edits; only the overdue sweep and
//!   explicit updates change it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Priority every task falls back to, and the one registry entry that can
/// never be renamed or deleted.
pub const DEFAULT_PRIORITY: &str = "Default";

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    Open,
    /// Work is in progress.
    InProgress,
    /// Deliberately parked by the user.
    Postponed,
    /// Finished; excluded from overdue checks and reminder creation.
    Completed,
    /// Deadline passed without completion. Assigned by the overdue sweep.
    Delayed,
}

impl TaskStatus {
    /// All states in presentation order.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Postponed,
        TaskStatus::Completed,
        TaskStatus::Delayed,
    ];

    /// Parses a user-entered status name.
    ///
    /// Accepts the wire spelling (`in_progress`) as well as spaced or
    /// hyphenated variants, case-insensitively.
    pub fn parse(value: &str) -> Option<TaskStatus> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "open" => Some(TaskStatus::Open),
            "in_progress" => Some(TaskStatus::InProgress),
            "postponed" => Some(TaskStatus::Postponed),
            "completed" | "done" => Some(TaskStatus::Completed),
            "delayed" => Some(TaskStatus::Delayed),
            _ => None,
        }
    }

    /// Stable lowercase label used for display and logging.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Postponed => "postponed",
            TaskStatus::Completed => "completed",
            TaskStatus::Delayed => "delayed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failure for task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title was empty or whitespace-only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable surrogate ID; reminders and edits address the task through it.
    pub id: TaskId,
    /// Non-empty, trimmed title.
    pub title: String,
    /// Free-form description; may be empty.
    pub description: String,
    /// Category name, when the task is filed under one.
    pub category: Option<String>,
    /// Priority registry entry name. Defaults to [`DEFAULT_PRIORITY`].
    pub priority: String,
    /// Calendar-date deadline; tasks without one are never overdue.
    pub deadline: Option<NaiveDate>,
    /// Current lifecycle state.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new open task with a generated stable ID.
    ///
    /// # Errors
    /// - [`TaskValidationError::EmptyTitle`] when `title` trims to nothing.
    pub fn new(
        title: &str,
        description: impl Into<String>,
        category: Option<String>,
        priority: Option<String>,
        deadline: Option<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        Self::with_id(Uuid::new_v4(), title, description, category, priority, deadline)
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by tests and import paths where identity already exists.
    pub fn with_id(
        id: TaskId,
        title: &str,
        description: impl Into<String>,
        category: Option<String>,
        priority: Option<String>,
        deadline: Option<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id,
            title: normalize_title(title)?,
            description: description.into(),
            category,
            priority: priority.unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            deadline,
            status: TaskStatus::Open,
        })
    }

    /// Replaces every editable field from `update`, keeping `id`.
    ///
    /// Fields are only written after validation passes, so a rejected update
    /// leaves the task untouched.
    pub fn apply(&mut self, update: TaskUpdate) -> Result<(), TaskValidationError> {
        let title = normalize_title(&update.title)?;
        self.title = title;
        self.description = update.description;
        self.category = update.category;
        self.priority = update
            .priority
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
        self.deadline = update.deadline;
        self.status = update.status;
        Ok(())
    }

    /// Returns whether this task's deadline has passed without completion.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Completed
            && self.deadline.is_some_and(|deadline| deadline < today)
    }

    /// Moves an overdue task to `Delayed`. Returns whether the status changed.
    ///
    /// Tasks already delayed, completed, or without a passed deadline are left
    /// alone; the sweep never un-delays a task whose deadline moved forward.
    pub fn refresh_overdue(&mut self, today: NaiveDate) -> bool {
        if self.status != TaskStatus::Delayed && self.is_overdue(today) {
            self.status = TaskStatus::Delayed;
            return true;
        }
        false
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] - {} (Deadline: {}, Priority: {})",
            self.title,
            self.category.as_deref().unwrap_or("-"),
            self.status,
            match self.deadline {
                Some(deadline) => deadline.to_string(),
                None => "none".to_string(),
            },
            self.priority
        )
    }
}

/// Full-field replacement payload for editing a task.
///
/// Carries every editable field; `TaskStore::update` replaces them wholesale,
/// so callers start from the current task values when building one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    /// `None` falls back to [`DEFAULT_PRIORITY`], like task creation.
    pub priority: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl From<&Task> for TaskUpdate {
    /// Snapshot of a task's editable fields, ready for partial edits.
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            priority: Some(task.priority.clone()),
            deadline: task.deadline,
            status: task.status,
        }
    }
}

fn normalize_title(title: &str) -> Result<String, TaskValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}
