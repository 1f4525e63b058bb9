//! Persistence contracts and the JSON document backend.
//!
//! # Responsibility
//! - Define narrow load/save contracts per persisted collection.
//! - Keep file-format details out of the in-memory stores.
//!
//! # Invariants
//! - A missing document loads as an empty collection; a present but
//!   unreadable document is reported, never masked.
//! - Saves always write the whole collection.

pub mod json;

pub use json::JsonGateway;

use crate::model::reminder::Reminder;
use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while loading or saving a persisted document.
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem-level read/write failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document exists but does not decode as the expected collection.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "document I/O failed for `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "malformed document `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
        }
    }
}

/// Load/save contract for the task collection.
pub trait TaskGateway {
    fn load_tasks(&self) -> StorageResult<Vec<Task>>;
    fn save_tasks(&self, tasks: &[Task]) -> StorageResult<()>;
}

/// Load/save contract for the category name list.
pub trait CategoryGateway {
    fn load_categories(&self) -> StorageResult<Vec<String>>;
    fn save_categories(&self, categories: &[String]) -> StorageResult<()>;
}

/// Load/save contract for the priority name list.
pub trait PriorityGateway {
    fn load_priorities(&self) -> StorageResult<Vec<String>>;
    fn save_priorities(&self, priorities: &[String]) -> StorageResult<()>;
}

/// Load/save contract for the reminder collection.
pub trait ReminderGateway {
    fn load_reminders(&self) -> StorageResult<Vec<Reminder>>;
    fn save_reminders(&self, reminders: &[Reminder]) -> StorageResult<()>;
}

/// Backend that persists every collection. Blanket-implemented, so any type
/// covering the four narrow contracts qualifies.
pub trait DocumentGateway:
    TaskGateway + CategoryGateway + PriorityGateway + ReminderGateway
{
}

impl<T> DocumentGateway for T where
    T: TaskGateway + CategoryGateway + PriorityGateway + ReminderGateway
{
}
