//! Shared data models for the ytsum backend.
//!
//! This crate provides Serde-serializable types for:
//! - Canonical video key resolution
//! - Summary languages and word-count ranges
//! - Account tiers and daily quota limits
//! - Persisted summary and usage-audit records

pub mod language;
pub mod summary;
pub mod tier;
pub mod usage;
pub mod video_key;
pub mod word_count;

// Re-export common types
pub use language::Language;
pub use summary::SummaryRecord;
pub use tier::{Account, AccountTier};
pub use usage::{UsageRecord, UsageStatus};
pub use video_key::{VideoKey, VideoKeyError, VideoKeyResult};
pub use word_count::{InvalidWordCountRange, WordCountRange};
