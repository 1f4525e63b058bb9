//! JSON file backend.
//!
//! # Responsibility
//! - Persist each collection as one pretty-printed JSON array document
//!   inside a data directory.
//!
//! # Invariants
//! - Document names are fixed; the data directory is the only moving part.
//! - Loading tolerates missing, empty, and `null` documents (all decode to
//!   an empty collection); anything else malformed is surfaced.

use crate::model::reminder::Reminder;
use crate::model::task::Task;
use crate::storage::{
    CategoryGateway, PriorityGateway, ReminderGateway, StorageError, StorageResult, TaskGateway,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const TASKS_DOCUMENT: &str = "tasks.json";
const CATEGORIES_DOCUMENT: &str = "categories.json";
const PRIORITIES_DOCUMENT: &str = "priorities.json";
const REMINDERS_DOCUMENT: &str = "reminders.json";

/// File-backed gateway storing every collection under one data directory.
///
/// Cloning is cheap and clones share the same directory, so one gateway can
/// serve all four stores.
#[derive(Debug, Clone)]
pub struct JsonGateway {
    data_dir: PathBuf,
}

impl JsonGateway {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn document_path(&self, document: &str) -> PathBuf {
        self.data_dir.join(document)
    }

    fn load_document<T: DeserializeOwned>(&self, document: &str) -> StorageResult<Vec<T>> {
        let path = self.document_path(document);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        // A bare `null` document also decodes as an empty collection.
        let items: Option<Vec<T>> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Malformed { path, source })?;
        Ok(items.unwrap_or_default())
    }

    fn save_document<T: Serialize>(&self, document: &str, items: &[T]) -> StorageResult<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let path = self.document_path(document);
        let raw = serde_json::to_string_pretty(items).map_err(|source| StorageError::Malformed {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, raw).map_err(|source| StorageError::Io { path, source })
    }
}

impl TaskGateway for JsonGateway {
    fn load_tasks(&self) -> StorageResult<Vec<Task>> {
        self.load_document(TASKS_DOCUMENT)
    }

    fn save_tasks(&self, tasks: &[Task]) -> StorageResult<()> {
        self.save_document(TASKS_DOCUMENT, tasks)
    }
}

impl CategoryGateway for JsonGateway {
    fn load_categories(&self) -> StorageResult<Vec<String>> {
        self.load_document(CATEGORIES_DOCUMENT)
    }

    fn save_categories(&self, categories: &[String]) -> StorageResult<()> {
        self.save_document(CATEGORIES_DOCUMENT, categories)
    }
}

impl PriorityGateway for JsonGateway {
    fn load_priorities(&self) -> StorageResult<Vec<String>> {
        self.load_document(PRIORITIES_DOCUMENT)
    }

    fn save_priorities(&self, priorities: &[String]) -> StorageResult<()> {
        self.save_document(PRIORITIES_DOCUMENT, priorities)
    }
}

impl ReminderGateway for JsonGateway {
    fn load_reminders(&self) -> StorageResult<Vec<Reminder>> {
        self.load_document(REMINDERS_DOCUMENT)
    }

    fn save_reminders(&self, reminders: &[Reminder]) -> StorageResult<()> {
        self.save_document(REMINDERS_DOCUMENT, reminders)
    }
}
