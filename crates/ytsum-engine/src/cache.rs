//! Finished-summary cache.
//!
//! A summary is cached forever under (video key, output language); the
//! underlying transcript does not change, so there is no expiry. Racing
//! generations for the same key may both store; lookups return the most
//! recent entry.

use std::sync::Arc;

use tracing::{debug, info};

use ytsum_models::{Language, SummaryRecord, VideoKey};
use ytsum_store::SummaryStore;

use crate::error::GenerateResult;

pub struct ResultCache {
    store: Arc<dyn SummaryStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn SummaryStore>) -> Self {
        Self { store }
    }

    /// Most recent stored summary for this (video, language), if any.
    pub async fn lookup(
        &self,
        key: &VideoKey,
        language: Language,
    ) -> GenerateResult<Option<SummaryRecord>> {
        let found = self.store.lookup(key, language).await?;
        match &found {
            Some(_) => info!(video = %key, language = language.code(), "Cache hit"),
            None => debug!(video = %key, language = language.code(), "Cache miss"),
        }
        Ok(found)
    }

    /// Persist a freshly generated summary.
    pub async fn store(&self, record: SummaryRecord) -> GenerateResult<()> {
        self.store.store(record).await?;
        Ok(())
    }
}
