//! Durable-store contracts and the in-process reference implementation.
//!
//! The core treats persistence as an external collaborator: anything that
//! satisfies [`SummaryStore`], [`QuotaStore`] and [`AuditStore`] can back
//! the service. [`MemoryStore`] implements all three with the required
//! uniqueness and atomic-upsert guarantees and is what the tests use.

pub mod error;
pub mod memory;
pub mod repos;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repos::{AuditStore, QuotaStore, SummaryStore};
