//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction over the transactional
//! document store, allowing Curator to reconcile against different backends
//! (in-memory, PostgreSQL).

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::{create_registry, create_store, create_store_and_registry, SharedRegistry, SharedStore};
pub use memory::InMemoryStore;
pub use traits::{
    check_operation_ceiling, ExhibitionStore, PlanFn, ReadSet, StoredRead, WriteOp,
};
