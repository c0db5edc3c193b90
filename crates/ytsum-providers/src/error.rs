//! Provider error types.
//!
//! Providers do not expose structured error codes, so the raw status and
//! body are kept intact here; classification into the user-facing taxonomy
//! happens in one place upstream.

use thiserror::Error;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors from an external provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP response; body preserved for classification.
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response arrived but a required field was missing.
    #[error("Provider response missing {0}")]
    MissingField(&'static str),

    /// Provider returned no usable text.
    #[error("Provider returned empty output")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Whether the failure was a bounded-timeout expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// HTTP status code, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw provider error body, when one exists.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Turn a non-success response into [`ProviderError::Status`], keeping the
/// body text for the classifier.
pub(crate) async fn status_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Status { status, body }
}
