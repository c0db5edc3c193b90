//! In-process store implementation.
//!
//! Backs the repository traits with `RwLock`-guarded maps. Quota updates
//! take the write lock for the whole read-modify-write, which gives the
//! atomic-upsert guarantee the contract asks for; summary entries are kept
//! as an append-only vector per key so duplicate stores survive and lookup
//! can pick the most recent.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;

use ytsum_models::{Language, SummaryRecord, UsageRecord, VideoKey};

use crate::error::StoreResult;
use crate::repos::{AuditStore, QuotaStore, SummaryStore};

type SummaryKey = (VideoKey, Language);
type QuotaKey = (String, NaiveDate);

/// In-memory store satisfying all three repository contracts.
#[derive(Clone, Default)]
pub struct MemoryStore {
    summaries: Arc<RwLock<HashMap<SummaryKey, Vec<SummaryRecord>>>>,
    quotas: Arc<RwLock<HashMap<QuotaKey, u32>>>,
    audit: Arc<RwLock<Vec<UsageRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of audit rows recorded so far.
    pub async fn audit_len(&self) -> usize {
        self.audit.read().await.len()
    }

    /// Snapshot of the audit log, oldest first.
    pub async fn audit_records(&self) -> Vec<UsageRecord> {
        self.audit.read().await.clone()
    }
}

#[async_trait]
impl SummaryStore for MemoryStore {
    async fn lookup(
        &self,
        key: &VideoKey,
        language: Language,
    ) -> StoreResult<Option<SummaryRecord>> {
        let summaries = self.summaries.read().await;
        let entry = summaries
            .get(&(key.clone(), language))
            .and_then(|records| records.iter().max_by_key(|r| r.created_at))
            .cloned();
        Ok(entry)
    }

    async fn store(&self, record: SummaryRecord) -> StoreResult<()> {
        let mut summaries = self.summaries.write().await;
        summaries
            .entry((record.video_key.clone(), record.language))
            .or_default()
            .push(record);
        Ok(())
    }
}

#[async_trait]
impl QuotaStore for MemoryStore {
    async fn count(&self, user_id: &str, date: NaiveDate) -> StoreResult<u32> {
        let quotas = self.quotas.read().await;
        Ok(quotas
            .get(&(user_id.to_string(), date))
            .copied()
            .unwrap_or(0))
    }

    async fn increment(&self, user_id: &str, date: NaiveDate) -> StoreResult<u32> {
        // Holding the write lock across the read-modify-write makes the
        // upsert atomic: concurrent increments serialize here.
        let mut quotas = self.quotas.write().await;
        let count = quotas.entry((user_id.to_string(), date)).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn reset(&self, user_id: &str, date: NaiveDate) -> StoreResult<()> {
        let mut quotas = self.quotas.write().await;
        if let Some(count) = quotas.get_mut(&(user_id.to_string(), date)) {
            *count = 0;
        }
        Ok(())
    }

    async fn purge_before(&self, date: NaiveDate) -> StoreResult<u64> {
        let mut quotas = self.quotas.write().await;
        let before = quotas.len();
        quotas.retain(|(_, row_date), _| *row_date >= date);
        let removed = (before - quotas.len()) as u64;
        if removed > 0 {
            debug!(removed, "Purged old quota rows");
        }
        Ok(removed)
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, record: UsageRecord) -> StoreResult<()> {
        self.audit.write().await.push(record);
        Ok(())
    }
}
