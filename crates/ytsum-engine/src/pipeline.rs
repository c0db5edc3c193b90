//! The generation pipeline: fetch audio, transcribe, summarize.
//!
//! Stages run strictly in order and the pipeline stops at the first
//! failure. The audio artifact is an owned temp file: it is released
//! exactly once on every exit path, deliberately after transcription on
//! the happy path and before returning on every failure path.

use std::sync::Arc;

use tracing::info;

use ytsum_models::{Language, SummaryRecord, VideoKey, WordCountRange};
use ytsum_providers::{AudioFetcher, Summarizer, Transcriber, MAX_AUDIO_BYTES};

use crate::classify::classify;
use crate::error::{GenerateError, GenerateResult};

pub struct GenerationPipeline {
    fetcher: Arc<dyn AudioFetcher>,
    transcriber: Arc<dyn Transcriber>,
    summarizer: Arc<dyn Summarizer>,
}

impl GenerationPipeline {
    pub fn new(
        fetcher: Arc<dyn AudioFetcher>,
        transcriber: Arc<dyn Transcriber>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            fetcher,
            transcriber,
            summarizer,
        }
    }

    /// Run the full chain for one admitted request.
    ///
    /// Returns the finished record without persisting it; storage is the
    /// caller's step.
    pub async fn generate(
        &self,
        key: &VideoKey,
        language: Language,
        range: WordCountRange,
    ) -> GenerateResult<SummaryRecord> {
        let canonical = key.canonical_url();

        let artifact = self
            .fetcher
            .fetch(&canonical)
            .await
            .map_err(|e| classify("fetch_audio", e))?;

        if artifact.size_bytes() > MAX_AUDIO_BYTES {
            let size_bytes = artifact.size_bytes();
            artifact.release();
            return Err(GenerateError::PayloadTooLarge {
                size_bytes,
                limit_bytes: MAX_AUDIO_BYTES,
            });
        }

        let title = artifact.title().map(|t| t.to_string());
        let transcript = match self.transcriber.transcribe(&artifact, language).await {
            Ok(text) => {
                artifact.release();
                text
            }
            Err(e) => {
                artifact.release();
                return Err(classify("transcribe", e));
            }
        };

        let summary = self
            .summarizer
            .summarize(&transcript, language, range, title.as_deref())
            .await
            .map_err(|e| classify("summarize", e))?;

        if summary.trim().is_empty() {
            return Err(GenerateError::EmptyGeneration);
        }

        let record = SummaryRecord::new(key.clone(), language, title, summary);
        info!(
            video = %key,
            language = language.code(),
            words = record.word_count,
            "Summary generated"
        );
        Ok(record)
    }
}
