//! Provider-failure classification.
//!
//! Providers report failures as status codes plus free-text bodies. This is
//! the single place that turns those into the user-facing taxonomy; the raw
//! detail is logged here and dropped.

use tracing::warn;

use ytsum_providers::ProviderError;

use crate::error::GenerateError;

/// Body substrings that mean the video itself cannot be processed. These
/// are permanent for the given video, so the user sees an invalid-reference
/// error rather than a retryable one.
const VIDEO_REJECTED_MARKERS: &[&str] = &[
    "video unavailable",
    "video is unavailable",
    "private video",
    "age-restricted",
    "age restricted",
    "region",
    "removed by the uploader",
];

/// Body substrings that mean the provider is out of capacity right now.
const CAPACITY_MARKERS: &[&str] = &[
    "quota",
    "resource exhausted",
    "resource_exhausted",
    "overloaded",
    "rate limit",
    "limit",
    "limite",
    "límite",
];

/// Body substrings that mean our credentials were rejected.
const AUTH_MARKERS: &[&str] = &["api key", "api_key", "permission", "unauthorized", "forbidden"];

/// Map a provider failure into the user-facing taxonomy.
pub fn classify(stage: &'static str, error: ProviderError) -> GenerateError {
    warn!(stage, error = %error, "Provider call failed");

    if matches!(error, ProviderError::EmptyResponse) {
        return GenerateError::EmptyGeneration;
    }
    if error.is_timeout() {
        return GenerateError::ExternalServiceUnavailable(format!("{stage} timed out"));
    }

    let status = error.status();
    let body = error.body().map(|b| b.to_lowercase()).unwrap_or_default();

    if matches!(status, Some(401) | Some(403))
        || AUTH_MARKERS.iter().any(|m| body.contains(m))
    {
        return GenerateError::Unauthorized(format!("{stage} rejected credentials"));
    }

    if VIDEO_REJECTED_MARKERS.iter().any(|m| body.contains(m)) {
        return GenerateError::InvalidReference("video cannot be processed".to_string());
    }

    if status == Some(429) || CAPACITY_MARKERS.iter().any(|m| body.contains(m)) {
        return GenerateError::ExternalServiceUnavailable(format!("{stage} is over capacity"));
    }

    GenerateError::ExternalServiceUnavailable(format!("{stage} failed"))
}
