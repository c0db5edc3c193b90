//! Audio transcription via the Gemini Files API.
//!
//! Audio is too large to inline in a generateContent call, so the client
//! runs the resumable-upload flow first: start an upload session, push the
//! bytes, then reference the returned file URI from the prompt.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use ytsum_models::Language;

use crate::audio::AudioArtifact;
use crate::error::{status_error, ProviderError, ProviderResult};
use crate::gemini::{extract_text, GeminiRequest, GeminiResponse};
use crate::traits::Transcriber;

/// Largest audio payload the transcription provider accepts.
pub const MAX_AUDIO_BYTES: u64 = 20 * 1024 * 1024;

const AUDIO_MIME_TYPE: &str = "audio/mp3";

/// Leading lines some model outputs prepend before the actual transcript.
const BOILERPLATE_PREFIXES: &[&str] = &[
    "aqui esta la transcripcion",
    "aquí está la transcripción",
    "here is the transcription",
    "here's the transcription",
    "transcription:",
    "transcripcion:",
    "transcripción:",
];

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    uri: String,
}

/// Gemini-backed transcription client.
pub struct TranscriptClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl TranscriptClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: std::time::Duration,
    ) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    /// Start a resumable upload session and return the session URL.
    async fn start_upload(&self, size_bytes: u64) -> ProviderResult<String> {
        let response = self
            .client
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size_bytes)
            .header("X-Goog-Upload-Header-Content-Type", AUDIO_MIME_TYPE)
            .json(&serde_json::json!({"file": {"display_name": "audio"}}))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .headers()
            .get("X-Goog-Upload-URL")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or(ProviderError::MissingField("X-Goog-Upload-URL"))
    }

    /// Push the audio bytes and finalize, returning the file URI.
    async fn upload_bytes(&self, upload_url: &str, bytes: Vec<u8>) -> ProviderResult<String> {
        let response = self
            .client
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let uploaded: UploadResponse = response.json().await?;
        if uploaded.file.uri.is_empty() {
            return Err(ProviderError::MissingField("file.uri"));
        }
        Ok(uploaded.file.uri)
    }

    async fn generate_transcript(
        &self,
        file_uri: &str,
        language: Language,
    ) -> ProviderResult<String> {
        let prompt = format!(
            "Transcribe this audio completely and accurately. \
             The spoken language is {}. Return only the transcription text, \
             without any introduction or commentary.",
            language.display_name()
        );
        let request = GeminiRequest::text_with_file(prompt, AUDIO_MIME_TYPE, file_uri);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: GeminiResponse = response.json().await?;
        extract_text(body)
    }
}

#[async_trait]
impl Transcriber for TranscriptClient {
    async fn transcribe(
        &self,
        artifact: &AudioArtifact,
        language: Language,
    ) -> ProviderResult<String> {
        let bytes = tokio::fs::read(artifact.path()).await?;
        info!(
            size_bytes = bytes.len(),
            language = language.code(),
            "Uploading audio for transcription"
        );

        let upload_url = self.start_upload(bytes.len() as u64).await?;
        let file_uri = self.upload_bytes(&upload_url, bytes).await?;
        debug!(file_uri = %file_uri, "Audio upload finalized");

        let raw = self.generate_transcript(&file_uri, language).await?;
        let cleaned = strip_boilerplate(&raw);
        if cleaned.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        info!(chars = cleaned.len(), "Transcription complete");
        Ok(cleaned)
    }
}

/// Drop leading announcement lines the model sometimes adds.
fn strip_boilerplate(raw: &str) -> String {
    let mut lines = raw.trim().lines().peekable();
    while let Some(line) = lines.peek() {
        let normalized = line.trim().to_lowercase();
        if !normalized.is_empty()
            && BOILERPLATE_PREFIXES
                .iter()
                .any(|p| normalized.starts_with(p))
        {
            lines.next();
        } else if normalized.is_empty() {
            lines.next();
        } else {
            break;
        }
    }
    lines.collect::<Vec<_>>().join("\n").trim().to_string()
}
