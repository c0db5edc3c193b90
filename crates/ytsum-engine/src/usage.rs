//! Usage recording.
//!
//! Every attempted generation leaves one audit row, success or failure.
//! Only successful attempts, cache hits included, charge the account's
//! daily quota.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, warn};

use ytsum_models::{Account, Language, UsageRecord, VideoKey};
use ytsum_store::AuditStore;

use crate::error::{GenerateError, GenerateResult};
use crate::quota::UserQuotaTracker;

pub struct UsageRecorder {
    audit: Arc<dyn AuditStore>,
    quota: Arc<UserQuotaTracker>,
}

impl UsageRecorder {
    pub fn new(audit: Arc<dyn AuditStore>, quota: Arc<UserQuotaTracker>) -> Self {
        Self { audit, quota }
    }

    /// Record a successful generation: charge quota, then audit.
    ///
    /// Returns the account's new daily count.
    pub async fn record_success(
        &self,
        account: &Account,
        key: &VideoKey,
        language: Language,
        cached: bool,
        elapsed_ms: u64,
        on: NaiveDate,
    ) -> GenerateResult<u32> {
        let count = self.quota.record_usage(account, on).await?;
        let record = UsageRecord::success(&account.id, key.clone(), language, cached, elapsed_ms);
        self.audit.append(record).await?;
        Ok(count)
    }

    /// Record a failed attempt. Quota is not charged.
    ///
    /// Audit-append failures are logged and swallowed here so they cannot
    /// mask the original error the caller is about to surface.
    pub async fn record_failure(
        &self,
        account: &Account,
        key: &VideoKey,
        language: Language,
        error: &GenerateError,
        elapsed_ms: u64,
    ) {
        warn!(
            user_id = %account.id,
            video = %key,
            kind = error.kind(),
            "Generation attempt failed"
        );
        let record =
            UsageRecord::failure(&account.id, key.clone(), language, error.kind(), elapsed_ms);
        if let Err(e) = self.audit.append(record).await {
            error!(error = %e, "Failed to append failure audit row");
        }
    }
}
