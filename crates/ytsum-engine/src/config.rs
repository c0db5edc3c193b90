//! Environment-driven configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use ytsum_providers::{AudioApiClient, SummaryClient, TranscriptClient};

use crate::pipeline::GenerationPipeline;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Settings for the engine and its provider clients.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the audio acquisition service.
    pub audio_api_base_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub transcription_model: String,
    pub summary_model: String,
    /// Per-request timeout for provider calls.
    pub provider_timeout: Duration,
}

impl EngineConfig {
    /// Load from the environment, reading a `.env` file when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            audio_api_base_url: std::env::var("AUDIO_API_BASE_URL")
                .context("AUDIO_API_BASE_URL must be set")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY must be set")?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            transcription_model: std::env::var("TRANSCRIPTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            summary_model: std::env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            provider_timeout: Duration::from_secs(
                std::env::var("PROVIDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(120),
            ),
        })
    }

    /// Wire the real provider clients into a pipeline.
    pub fn build_pipeline(&self) -> anyhow::Result<GenerationPipeline> {
        let fetcher = AudioApiClient::new(self.audio_api_base_url.as_str(), self.provider_timeout)
            .context("building audio client")?;
        let transcriber = TranscriptClient::new(
            self.gemini_api_key.as_str(),
            self.gemini_base_url.as_str(),
            self.transcription_model.as_str(),
            self.provider_timeout,
        )
        .context("building transcription client")?;
        let summarizer = SummaryClient::new(
            self.gemini_api_key.as_str(),
            self.gemini_base_url.as_str(),
            self.summary_model.as_str(),
            self.provider_timeout,
        )
        .context("building summarization client")?;

        Ok(GenerationPipeline::new(
            Arc::new(fetcher),
            Arc::new(transcriber),
            Arc::new(summarizer),
        ))
    }
}
