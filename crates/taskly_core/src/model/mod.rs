//! Domain model for tasks and reminders.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Keep validation rules next to the data they protect.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Reminders reference tasks by `TaskId`, never by an embedded copy.

pub mod reminder;
pub mod task;
