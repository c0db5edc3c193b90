//! Audio acquisition client.
//!
//! The acquisition service uses a token-based two-step flow: request a
//! download token for a video URL, then fetch the MP3 bytes with that
//! token. Downloaded bytes are spilled to a named temp file owned by the
//! returned [`AudioArtifact`].

use std::path::Path;

use serde::Deserialize;
use tempfile::TempPath;
use tracing::{debug, info};

use crate::error::{status_error, ProviderError, ProviderResult};

/// A temporary audio file owned by one pipeline job.
///
/// The underlying temp file is deleted when the artifact is dropped, so the
/// file cannot outlive the job no matter how the job ends. [`release`]
/// exists for the deliberate path so the deletion is logged.
///
/// [`release`]: AudioArtifact::release
#[derive(Debug)]
pub struct AudioArtifact {
    path: TempPath,
    size_bytes: u64,
    title: Option<String>,
}

impl AudioArtifact {
    /// Spill a downloaded byte buffer into a fresh temp file.
    pub fn from_bytes(bytes: &[u8], title: Option<String>) -> ProviderResult<Self> {
        let file = tempfile::Builder::new()
            .prefix("ytsum-audio-")
            .suffix(".mp3")
            .tempfile()?;
        std::fs::write(file.path(), bytes)?;

        Ok(Self {
            path: file.into_temp_path(),
            size_bytes: bytes.len() as u64,
            title,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Video title as reported by the acquisition service, when it was.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Delete the temp file now, consuming the artifact.
    pub fn release(self) {
        let shown = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => debug!(path = %shown.display(), "Released audio artifact"),
            Err(e) => tracing::warn!(path = %shown.display(), error = %e, "Failed to delete audio artifact"),
        }
    }
}

/// Token handed back by the acquisition service.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
    /// Some deployments of the service also report the video title.
    #[serde(default)]
    title: Option<String>,
}

/// Client for the audio acquisition service.
pub struct AudioApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl AudioApiClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: trim_trailing_slash(base_url.into()),
            client,
        })
    }

    /// Download the audio track for a canonical video URL.
    pub async fn fetch_audio(&self, canonical_url: &str) -> ProviderResult<AudioArtifact> {
        info!(url = %canonical_url, "Requesting audio download token");
        let token = self.request_token(canonical_url).await?;

        debug!("Downloading audio bytes");
        let bytes = self.download_bytes(&token.token).await?;
        if bytes.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        let artifact = AudioArtifact::from_bytes(&bytes, token.title)?;
        info!(
            size_bytes = artifact.size_bytes(),
            path = %artifact.path().display(),
            "Audio downloaded"
        );
        Ok(artifact)
    }

    async fn request_token(&self, canonical_url: &str) -> ProviderResult<TokenResponse> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("url", canonical_url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let token: TokenResponse = response.json().await?;
        if token.token.is_empty() {
            return Err(ProviderError::MissingField("token"));
        }
        Ok(token)
    }

    async fn download_bytes(&self, token: &str) -> ProviderResult<Vec<u8>> {
        let response = self
            .client
            .get(format!("{}/download", self.base_url))
            .query(&[("token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl crate::traits::AudioFetcher for AudioApiClient {
    async fn fetch(&self, canonical_url: &str) -> ProviderResult<AudioArtifact> {
        self.fetch_audio(canonical_url).await
    }
}

fn trim_trailing_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn artifact_file_is_deleted_on_release() {
        let artifact = AudioArtifact::from_bytes(b"mp3 bytes", None).unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.size_bytes(), 9);

        artifact.release();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn artifact_file_is_deleted_on_drop() {
        let artifact = AudioArtifact::from_bytes(b"mp3 bytes", None).unwrap();
        let path = artifact.path().to_path_buf();
        drop(artifact);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn fetch_audio_runs_the_token_flow() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("url", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"token": "t-123", "title": "A talk"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/download"))
            .and(query_param("token", "t-123"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            AudioApiClient::new(server.uri(), std::time::Duration::from_secs(5)).unwrap();
        let artifact = client
            .fetch_audio("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(artifact.size_bytes(), 11);
        assert_eq!(artifact.title(), Some("A talk"));
        artifact.release();
    }

    #[tokio::test]
    async fn provider_error_body_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string("Failed to download: Video unavailable"),
            )
            .mount(&server)
            .await;

        let client =
            AudioApiClient::new(server.uri(), std::time::Duration::from_secs(5)).unwrap();
        let err = client
            .fetch_audio("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.body().unwrap().contains("Video unavailable"));
    }
}
