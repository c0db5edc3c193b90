//! Usage audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Language;
use crate::video_key::VideoKey;

/// Outcome of one attempted generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    Success,
    Failed,
}

/// Append-only audit row, one per attempted generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub user_id: String,
    pub video_key: VideoKey,
    pub language: Language,
    pub status: UsageStatus,
    /// Stable error-kind name when the attempt failed.
    pub error_kind: Option<String>,
    /// Whether the result was served from the cache.
    pub cached: bool,
    pub elapsed_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn success(
        user_id: impl Into<String>,
        video_key: VideoKey,
        language: Language,
        cached: bool,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            video_key,
            language,
            status: UsageStatus::Success,
            error_kind: None,
            cached,
            elapsed_ms,
            created_at: Utc::now(),
        }
    }

    pub fn failure(
        user_id: impl Into<String>,
        video_key: VideoKey,
        language: Language,
        error_kind: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            video_key,
            language,
            status: UsageStatus::Failed,
            error_kind: Some(error_kind.into()),
            cached: false,
            elapsed_ms,
            created_at: Utc::now(),
        }
    }
}
