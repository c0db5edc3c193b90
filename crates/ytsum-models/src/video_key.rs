//! Canonical video key resolution.
//!
//! Every accepted reference shape (full watch URLs, short links, embeds,
//! bare ids) resolves to the same 11-character key, so cache and audit
//! lookups never depend on how the user pasted the link.
//!
//! References are treated as untrusted input: ids are strictly validated
//! (11 chars, alphanumeric + `-_`) and anything unrecognized is an error,
//! never an empty key.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a video id.
const VIDEO_ID_LEN: usize = 11;

/// Errors that can occur while resolving a video reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoKeyError {
    #[error("reference is not a recognized video URL")]
    UnrecognizedReference,

    #[error("video id has invalid format")]
    InvalidVideoId,

    #[error("video id not found in URL")]
    VideoIdNotFound,
}

pub type VideoKeyResult<T> = Result<T, VideoKeyError>;

/// Canonical, validated video key.
///
/// Construct via [`VideoKey::resolve`]; the inner id is guaranteed to be
/// exactly 11 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoKey(String);

impl VideoKey {
    /// Resolve a raw reference to its canonical key.
    ///
    /// Accepted shapes:
    /// - `youtube.com/watch?v=VIDEO_ID` (with or without extra parameters)
    /// - `youtu.be/VIDEO_ID`
    /// - `youtube.com/embed/VIDEO_ID`
    /// - `youtube.com/v/VIDEO_ID`
    /// - a bare 11-character id
    pub fn resolve(raw: &str) -> VideoKeyResult<Self> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(VideoKeyError::UnrecognizedReference);
        }

        // Bare id: no URL machinery involved.
        if raw.len() == VIDEO_ID_LEN && is_valid_id_chars(raw) {
            return Ok(Self(raw.to_string()));
        }

        if !is_youtube_domain(raw) {
            return Err(VideoKeyError::UnrecognizedReference);
        }

        // Try extraction strategies in order of how common the shape is.
        if let Some(id) = extract_from_watch_url(raw) {
            return validate_id(id).map(Self);
        }

        if let Some(id) = extract_from_short_url(raw) {
            return validate_id(id).map(Self);
        }

        if let Some(id) = extract_from_path_segment(raw, "/embed/") {
            return validate_id(id).map(Self);
        }

        if let Some(id) = extract_from_path_segment(raw, "/v/") {
            return validate_id(id).map(Self);
        }

        Err(VideoKeyError::VideoIdNotFound)
    }

    /// The raw 11-character id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Re-serialize to the single canonical URL form.
    ///
    /// All equivalent inputs produce this exact string, so it doubles as
    /// the request URL handed to the audio acquisition service.
    pub fn canonical_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check if the reference points at a YouTube domain.
fn is_youtube_domain(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// Extract id from `watch?v=VIDEO_ID` or `watch?...&v=VIDEO_ID`.
fn extract_from_watch_url(url: &str) -> Option<String> {
    let pos = url.find("?v=").or_else(|| url.find("&v="))?;
    extract_id_segment(&url[pos + 3..])
}

/// Extract id from `youtu.be/VIDEO_ID`.
fn extract_from_short_url(url: &str) -> Option<String> {
    let pos = url.find("youtu.be/")?;
    let start = pos + "youtu.be/".len();
    if start >= url.len() {
        return None;
    }
    extract_id_segment(&url[start..])
}

/// Extract id from a path marker like `/embed/` or `/v/`.
fn extract_from_path_segment(url: &str, marker: &str) -> Option<String> {
    let pos = url.find(marker)?;
    let start = pos + marker.len();
    if start >= url.len() {
        return None;
    }
    extract_id_segment(&url[start..])
}

/// Take the id up to the first delimiter, ignoring trailing parameters.
fn extract_id_segment(segment: &str) -> Option<String> {
    let delimiters = ['&', '#', '?', '/'];
    let end = segment
        .find(|c| delimiters.contains(&c))
        .unwrap_or(segment.len());
    let id = segment[..end].trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn is_valid_id_chars(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_id(id: String) -> VideoKeyResult<String> {
    if id.len() != VIDEO_ID_LEN {
        return Err(VideoKeyError::InvalidVideoId);
    }
    if !is_valid_id_chars(&id) {
        return Err(VideoKeyError::InvalidVideoId);
    }
    Ok(id)
}
