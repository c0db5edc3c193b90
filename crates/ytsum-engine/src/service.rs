//! Request orchestration.
//!
//! [`SummarizeService`] owns the full life of a request: IP admission,
//! input validation, quota admission, cache lookup, pipeline run,
//! persistence and usage recording. Admission gates run in cost order,
//! cheapest first, so rejected requests touch as little state as possible.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use ytsum_models::{Account, Language, SummaryRecord, VideoKey, WordCountRange};

use crate::cache::ResultCache;
use crate::error::{GenerateError, GenerateResult};
use crate::pipeline::GenerationPipeline;
use crate::quota::UserQuotaTracker;
use crate::rate_limit::IpWindowLimiter;
use crate::usage::UsageRecorder;

/// One inbound summary request, as received from the outer surface.
#[derive(Debug, Clone)]
pub struct SummarizeRequest {
    pub account: Account,
    /// Absent for trusted internal callers, which skip the IP gate.
    pub client_ip: Option<IpAddr>,
    /// Video URL or bare ID, in any accepted shape.
    pub video_reference: String,
    /// ISO language code; unknown codes fall back to the default.
    pub language_code: String,
    /// Requested length range string, validated strictly.
    pub word_count_range: String,
}

/// Successful outcome handed back to the caller.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub record: SummaryRecord,
    /// Generations the account can still run today, after this one.
    pub remaining_quota: u32,
    /// Whether the summary came from the cache.
    pub cached: bool,
}

pub struct SummarizeService {
    limiter: Arc<IpWindowLimiter>,
    quota: Arc<UserQuotaTracker>,
    cache: Arc<ResultCache>,
    pipeline: Arc<GenerationPipeline>,
    recorder: Arc<UsageRecorder>,
}

impl SummarizeService {
    pub fn new(
        limiter: Arc<IpWindowLimiter>,
        quota: Arc<UserQuotaTracker>,
        cache: Arc<ResultCache>,
        pipeline: Arc<GenerationPipeline>,
        recorder: Arc<UsageRecorder>,
    ) -> Self {
        Self {
            limiter,
            quota,
            cache,
            pipeline,
            recorder,
        }
    }

    /// Run one request end to end.
    #[instrument(skip(self, request), fields(user_id = %request.account.id))]
    pub async fn handle(&self, request: SummarizeRequest) -> GenerateResult<GenerationOutcome> {
        let started = Instant::now();

        // Cheapest gate first; rejected requests never touch the store.
        if let Some(ip) = request.client_ip {
            self.limiter.try_acquire(ip)?;
        }

        let range: WordCountRange = request.word_count_range.parse()?;
        let language = Language::from_code(&request.language_code);
        let key = VideoKey::resolve(&request.video_reference)?;

        let account = &request.account;
        let today = UserQuotaTracker::today();

        if let Err(e) = self.quota.check(account, today).await {
            self.record_failure(account, &key, language, &e, started).await;
            return Err(e);
        }

        if let Some(record) = self.cache.lookup(&key, language).await? {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let count = self
                .recorder
                .record_success(account, &key, language, true, elapsed_ms, today)
                .await?;
            return Ok(GenerationOutcome {
                record,
                remaining_quota: account.tier.daily_limit().saturating_sub(count),
                cached: true,
            });
        }

        let record = match self.pipeline.generate(&key, language, range).await {
            Ok(record) => record,
            Err(e) => {
                self.record_failure(account, &key, language, &e, started).await;
                return Err(e);
            }
        };

        self.cache.store(record.clone()).await?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let count = self
            .recorder
            .record_success(account, &key, language, false, elapsed_ms, today)
            .await?;

        info!(
            video = %key,
            language = language.code(),
            elapsed_ms,
            "Request completed"
        );
        Ok(GenerationOutcome {
            record,
            remaining_quota: account.tier.daily_limit().saturating_sub(count),
            cached: false,
        })
    }

    /// Administrative reset of an account's counter for today.
    pub async fn reset_quota(&self, account: &Account) -> GenerateResult<()> {
        self.quota.reset(account, UserQuotaTracker::today()).await
    }

    /// Drop quota counters older than the retention window.
    pub async fn purge_old_counters(&self) -> GenerateResult<u64> {
        self.quota.purge_old(UserQuotaTracker::today()).await
    }

    async fn record_failure(
        &self,
        account: &Account,
        key: &VideoKey,
        language: Language,
        error: &GenerateError,
        started: Instant,
    ) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.recorder
            .record_failure(account, key, language, error, elapsed_ms)
            .await;
    }
}
