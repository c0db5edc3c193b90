//! Request admission and summary generation.
//!
//! The engine takes a raw request (account, client address, video
//! reference, language, length), admits or rejects it against the per-IP
//! windows and the account's daily quota, and either serves a cached
//! summary or runs the fetch-transcribe-summarize pipeline and persists
//! the result. [`SummarizeService`] is the entry point.

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod quota;
pub mod rate_limit;
pub mod service;
pub mod usage;

pub use cache::ResultCache;
pub use config::EngineConfig;
pub use error::{GenerateError, GenerateResult};
pub use pipeline::GenerationPipeline;
pub use quota::UserQuotaTracker;
pub use rate_limit::{IpWindowLimiter, WindowConfig};
pub use service::{GenerationOutcome, SummarizeRequest, SummarizeService};
pub use usage::UsageRecorder;
