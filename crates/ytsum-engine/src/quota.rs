//! Per-account daily generation allowance.
//!
//! Each account tier carries a daily cap; usage is counted per calendar
//! day (UTC) in the quota store. Admission checks the count before any
//! provider work starts; successful generations, including cache hits,
//! consume one unit.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, info};

use ytsum_models::Account;
use ytsum_store::QuotaStore;

use crate::error::{GenerateError, GenerateResult};

/// Days of counter history kept by [`UserQuotaTracker::purge_old`].
const RETENTION_DAYS: u64 = 30;

/// Tracks and enforces per-account daily usage.
pub struct UserQuotaTracker {
    store: Arc<dyn QuotaStore>,
}

impl UserQuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>) -> Self {
        Self { store }
    }

    /// Today's date in UTC, the calendar the quota runs on.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Reject when the account has already used its daily allowance.
    ///
    /// Checking consumes nothing; the unit is only charged by
    /// [`record_usage`] once the request actually produces a summary.
    ///
    /// [`record_usage`]: UserQuotaTracker::record_usage
    pub async fn check(&self, account: &Account, on: NaiveDate) -> GenerateResult<()> {
        let limit = account.tier.daily_limit();
        let used = self.store.count(&account.id, on).await?;
        debug!(user_id = %account.id, used, limit, "Quota admission check");
        if used >= limit {
            return Err(GenerateError::QuotaExceeded { limit });
        }
        Ok(())
    }

    /// Charge one unit to the account and return the new count.
    pub async fn record_usage(&self, account: &Account, on: NaiveDate) -> GenerateResult<u32> {
        let count = self.store.increment(&account.id, on).await?;
        debug!(user_id = %account.id, count, "Quota charged");
        Ok(count)
    }

    /// Generations the account can still run today.
    pub async fn remaining(&self, account: &Account, on: NaiveDate) -> GenerateResult<u32> {
        let limit = account.tier.daily_limit();
        let used = self.store.count(&account.id, on).await?;
        Ok(limit.saturating_sub(used))
    }

    /// Administrative reset of an account's counter for one day.
    pub async fn reset(&self, account: &Account, on: NaiveDate) -> GenerateResult<()> {
        self.store.reset(&account.id, on).await?;
        info!(user_id = %account.id, date = %on, "Quota counter reset");
        Ok(())
    }

    /// Drop counters older than the retention window.
    pub async fn purge_old(&self, today: NaiveDate) -> GenerateResult<u64> {
        let cutoff = today
            .checked_sub_days(Days::new(RETENTION_DAYS))
            .unwrap_or(today);
        let purged = self.store.purge_before(cutoff).await?;
        if purged > 0 {
            info!(purged, cutoff = %cutoff, "Purged old quota counters");
        }
        Ok(purged)
    }
}
