//! Durable-store contracts.
//!
//! The real backing store is an external collaborator; these traits pin
//! down the semantics the core relies on: keyed lookup returning the most
//! recent entry, a race-safe keyed daily counter, and an append-only audit
//! log. [`crate::MemoryStore`] is the in-process reference implementation.

use async_trait::async_trait;
use chrono::NaiveDate;

use ytsum_models::{Language, SummaryRecord, UsageRecord, VideoKey};

use crate::error::StoreResult;

/// Storage for finished summaries, keyed by (video, language).
///
/// Entries are write-once: `store` never overwrites, and concurrent stores
/// for the same key may both land. `lookup` must deterministically return
/// the most recently created entry so racing readers see one answer.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn lookup(&self, key: &VideoKey, language: Language)
        -> StoreResult<Option<SummaryRecord>>;

    async fn store(&self, record: SummaryRecord) -> StoreResult<()>;
}

/// Per-account, per-calendar-day usage counters.
///
/// One row per (user, date), enforced by the store. A missing row reads as
/// zero; rows are materialized lazily on first increment. Increments from
/// concurrent requests must all be observed (no lost updates, no duplicate
/// rows).
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Today's count for the user; 0 when no row exists.
    async fn count(&self, user_id: &str, date: NaiveDate) -> StoreResult<u32>;

    /// Atomically increment the (user, date) counter, creating the row if
    /// needed. Returns the new count.
    async fn increment(&self, user_id: &str, date: NaiveDate) -> StoreResult<u32>;

    /// Administrative reset of one (user, date) counter to zero.
    async fn reset(&self, user_id: &str, date: NaiveDate) -> StoreResult<()>;

    /// Delete all rows strictly older than the given date.
    async fn purge_before(&self, date: NaiveDate) -> StoreResult<u64>;
}

/// Append-only audit log of attempted generations.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, record: UsageRecord) -> StoreResult<()>;
}
