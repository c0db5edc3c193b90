//! Provider seams the generation pipeline works against.
//!
//! The pipeline never talks to HTTP clients directly; it sees one trait per
//! stage so tests can substitute scripted providers.

use async_trait::async_trait;

use ytsum_models::{Language, WordCountRange};

use crate::audio::AudioArtifact;
use crate::error::ProviderResult;

/// Stage 1: acquire the audio track for a canonical video URL.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    async fn fetch(&self, canonical_url: &str) -> ProviderResult<AudioArtifact>;
}

/// Stage 2: turn an audio artifact into transcript text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        artifact: &AudioArtifact,
        language: Language,
    ) -> ProviderResult<String>;
}

/// Stage 3: condense a transcript into a summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        transcript: &str,
        language: Language,
        range: WordCountRange,
        title: Option<&str>,
    ) -> ProviderResult<String>;
}
