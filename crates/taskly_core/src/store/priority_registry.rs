//! Priority registry and its task cascades.
//!
//! # Responsibility
//! - Own the ordered list of priority names and keep `priorities.json`
//!   in sync with it.
//! - Guarantee the default sentinel exists and re-point tasks at it when
//!   their priority is deleted.
//!
//! # Invariants
//! - Names are unique and non-empty after trimming.
//! - [`DEFAULT_PRIORITY`] is always present and can be neither renamed nor
//!   deleted.
//! - Deleting a priority reassigns its tasks to the default instead of
//!   touching the tasks themselves.

use crate::model::task::DEFAULT_PRIORITY;
use crate::storage::{PriorityGateway, StorageResult, TaskGateway};
use crate::store::task_store::TaskStore;
use log::{info, warn};

/// Ordered, duplicate-free list of priority names backed by a
/// [`PriorityGateway`].
pub struct PriorityRegistry<G: PriorityGateway> {
    gateway: G,
    priorities: Vec<String>,
}

impl<G: PriorityGateway> PriorityRegistry<G> {
    /// Loads the persisted priority list, re-seeding the default sentinel
    /// when it is missing (including the empty first-run document).
    pub fn load(gateway: G) -> StorageResult<Self> {
        let priorities = gateway.load_priorities()?;
        let mut registry = Self {
            gateway,
            priorities,
        };
        if !registry.contains(DEFAULT_PRIORITY) {
            registry.priorities.push(DEFAULT_PRIORITY.to_string());
            registry.persist();
        }
        Ok(registry)
    }

    /// All priority names in insertion order.
    pub fn priorities(&self) -> &[String] {
        &self.priorities
    }

    pub fn contains(&self, name: &str) -> bool {
        self.priorities.iter().any(|priority| priority == name)
    }

    /// Adds a priority and persists.
    ///
    /// Returns `false` without side effects when the trimmed name is empty
    /// or already present.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.priorities.push(name.to_string());
        self.persist();
        true
    }

    /// Renames a priority and re-labels every task carrying it.
    ///
    /// Returns `false` without side effects when `old` is the protected
    /// default or absent, or when the trimmed `new` is empty or taken.
    pub fn rename<T: TaskGateway>(
        &mut self,
        old: &str,
        new: &str,
        tasks: &mut TaskStore<T>,
    ) -> bool {
        if old == DEFAULT_PRIORITY {
            return false;
        }
        let new = new.trim();
        if new.is_empty() || self.contains(new) {
            return false;
        }
        let Some(index) = self.priorities.iter().position(|priority| priority == old) else {
            return false;
        };

        self.priorities[index] = new.to_string();
        let reassigned = tasks.reassign_priority(old, new);
        tasks.persist();
        self.persist();
        info!(
            "event=priority_rename module=store status=ok old={old} new={new} reassigned={reassigned}"
        );
        true
    }

    /// Deletes a priority, re-pointing its tasks at the default.
    ///
    /// Returns `false` without side effects when `name` is the protected
    /// default or absent.
    pub fn delete<T: TaskGateway>(&mut self, name: &str, tasks: &mut TaskStore<T>) -> bool {
        if name == DEFAULT_PRIORITY {
            return false;
        }
        let Some(index) = self.priorities.iter().position(|priority| priority == name) else {
            return false;
        };

        self.priorities.remove(index);
        let reassigned = tasks.reassign_priority(name, DEFAULT_PRIORITY);
        self.persist();
        tasks.persist();
        info!(
            "event=priority_delete module=store status=ok name={name} reassigned={reassigned}"
        );
        true
    }

    pub(crate) fn persist(&self) {
        if let Err(err) = self.gateway.save_priorities(&self.priorities) {
            warn!("event=priority_save module=store status=error error={err}");
        }
    }
}
