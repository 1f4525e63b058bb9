//! Category registry and its task cascades.
//!
//! # Responsibility
//! - Own the ordered list of category names and keep `categories.json`
//!   in sync with it.
//! - Apply rename/delete cascades to the task store.
//!
//! # Invariants
//! - Names are unique and non-empty after trimming.
//! - Renaming re-files every matching task, then re-runs the overdue sweep.
//! - Deleting a category hard-deletes every task filed under it.

use crate::storage::{CategoryGateway, StorageResult, TaskGateway};
use crate::store::task_store::TaskStore;
use chrono::NaiveDate;
use log::{info, warn};

/// Ordered, duplicate-free list of category names backed by a
/// [`CategoryGateway`].
pub struct CategoryRegistry<G: CategoryGateway> {
    gateway: G,
    categories: Vec<String>,
}

impl<G: CategoryGateway> CategoryRegistry<G> {
    /// Loads the persisted category list through `gateway`.
    pub fn load(gateway: G) -> StorageResult<Self> {
        let categories = gateway.load_categories()?;
        Ok(Self {
            gateway,
            categories,
        })
    }

    /// All category names in insertion order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|category| category == name)
    }

    /// Adds a category and persists.
    ///
    /// Returns `false` without side effects when the trimmed name is empty
    /// or already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.categories.push(name.to_string());
        self.persist();
        true
    }

    /// Renames a category and re-files every task under the new name.
    ///
    /// After the cascade the overdue sweep runs, so tasks touched by the
    /// rename carry a current status. Returns `false` without side effects
    /// when `old` is absent, or the trimmed `new` is empty or already taken.
    pub fn rename<T: TaskGateway>(
        &mut self,
        old: &str,
        new: &str,
        tasks: &mut TaskStore<T>,
        today: NaiveDate,
    ) -> bool {
        let new = new.trim();
        if new.is_empty() || self.contains(new) {
            return false;
        }
        let Some(index) = self.categories.iter().position(|category| category == old) else {
            return false;
        };

        self.categories[index] = new.to_string();
        let reassigned = tasks.reassign_category(old, new);
        tasks.refresh_overdue_statuses(today);
        self.persist();
        tasks.persist();
        info!(
            "event=category_rename module=store status=ok old={old} new={new} reassigned={reassigned}"
        );
        true
    }

    /// Deletes a category and every task filed under it.
    ///
    /// Returns `false` without side effects when the category is absent.
    pub fn delete<T: TaskGateway>(&mut self, name: &str, tasks: &mut TaskStore<T>) -> bool {
        let Some(index) = self.categories.iter().position(|category| category == name) else {
            return false;
        };

        self.categories.remove(index);
        let removed = tasks.remove_in_category(name);
        self.persist();
        tasks.persist();
        info!("event=category_delete module=store status=ok name={name} removed_tasks={removed}");
        true
    }

    pub(crate) fn persist(&self) {
        if let Err(err) = self.gateway.save_categories(&self.categories) {
            warn!("event=category_save module=store status=error error={err}");
        }
    }
}
