//! Persisted summary artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::video_key::VideoKey;

/// A finished summary for one (video, language) pair.
///
/// Immutable once written: published video content for a given language does
/// not change, so an entry is a permanent fact and the cache never evicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub video_key: VideoKey,
    pub language: Language,
    /// Video title as reported by the acquisition service, when available.
    pub title: Option<String>,
    pub summary_text: String,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
}

impl SummaryRecord {
    /// Build a record, deriving the word count from the text.
    pub fn new(
        video_key: VideoKey,
        language: Language,
        title: Option<String>,
        summary_text: impl Into<String>,
    ) -> Self {
        let summary_text = summary_text.into();
        let word_count = summary_text.split_whitespace().count() as u32;
        Self {
            video_key,
            language,
            title,
            summary_text,
            word_count,
            created_at: Utc::now(),
        }
    }
}
