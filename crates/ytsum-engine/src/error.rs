//! User-facing error taxonomy.
//!
//! Every failure a request can see is one of these kinds. Provider errors
//! are mapped in through [`crate::classify`]; raw provider detail is logged
//! there and never carried out to the caller.

use thiserror::Error;

use ytsum_models::{InvalidWordCountRange, VideoKeyError};
use ytsum_store::StoreError;

pub type GenerateResult<T> = Result<T, GenerateError>;

/// Failure kinds a summary request can end in.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The caller's IP exceeded a sliding request window.
    #[error("Too many requests from this address, retry later")]
    RateLimited,

    /// The account used up its daily generation allowance.
    #[error("Daily limit of {limit} summaries reached")]
    QuotaExceeded { limit: u32 },

    /// The video reference is malformed, or the video cannot be processed.
    #[error("Invalid video reference: {0}")]
    InvalidReference(String),

    /// The audio track exceeds what the transcription provider accepts.
    #[error("Audio of {size_bytes} bytes exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { size_bytes: u64, limit_bytes: u64 },

    /// An upstream dependency failed or is out of capacity.
    #[error("External service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    /// An upstream dependency rejected our credentials.
    #[error("Upstream authorization failed: {0}")]
    Unauthorized(String),

    /// The provider chain completed but produced no usable text.
    #[error("Generation produced no content")]
    EmptyGeneration,
}

impl GenerateError {
    /// Stable snake_case name recorded in audit rows.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::InvalidReference(_) => "invalid_reference",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::ExternalServiceUnavailable(_) => "external_service_unavailable",
            Self::Unauthorized(_) => "unauthorized",
            Self::EmptyGeneration => "empty_generation",
        }
    }

    /// Whether retrying the same request later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ExternalServiceUnavailable(_) | Self::EmptyGeneration
        )
    }
}

impl From<VideoKeyError> for GenerateError {
    fn from(e: VideoKeyError) -> Self {
        Self::InvalidReference(e.to_string())
    }
}

impl From<InvalidWordCountRange> for GenerateError {
    fn from(e: InvalidWordCountRange) -> Self {
        Self::InvalidReference(e.to_string())
    }
}

impl From<StoreError> for GenerateError {
    fn from(e: StoreError) -> Self {
        Self::ExternalServiceUnavailable(e.to_string())
    }
}
