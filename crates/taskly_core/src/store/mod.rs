//! In-memory stores over the persistence gateways.
//!
//! # Responsibility
//! - Hold the working set for each collection and keep it persisted.
//! - Enforce the cross-store rules (category cascades, the protected
//!   default priority, reminder dedupe).
//!
//! # Invariants
//! - Stores are the only writers of their collection's document.
//! - Mutations apply in memory first; persistence failures are logged and
//!   never roll the mutation back.

pub mod category_registry;
pub mod priority_registry;
pub mod reminder_store;
pub mod task_store;
