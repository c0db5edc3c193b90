//! Transcript summarization client.

use async_trait::async_trait;
use tracing::{info, warn};

use ytsum_models::{Language, WordCountRange};

use crate::error::{status_error, ProviderResult};
use crate::gemini::{extract_text, GeminiRequest, GeminiResponse};
use crate::traits::Summarizer;

/// Transcripts longer than this are cut before prompting; the provider's
/// context window cannot take unbounded input.
pub const TRANSCRIPT_CHAR_CEILING: usize = 80_000;

/// Gemini-backed summarization client.
pub struct SummaryClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl SummaryClient {
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
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn summarize(
        &self,
        transcript: &str,
        language: Language,
        range: WordCountRange,
        title: Option<&str>,
    ) -> ProviderResult<String> {
        let bounded = truncate_chars(transcript, TRANSCRIPT_CHAR_CEILING);
        if bounded.len() < transcript.len() {
            warn!(
                original_chars = transcript.chars().count(),
                kept_chars = TRANSCRIPT_CHAR_CEILING,
                "Transcript truncated before summarization"
            );
        }

        let prompt = build_prompt(bounded, language, range, title);
        let request = GeminiRequest::text(prompt);

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
        let summary = strip_code_fence(&extract_text(body)?);
        info!(
            language = language.code(),
            range = range.as_str(),
            words = summary.split_whitespace().count(),
            "Summary generated"
        );
        Ok(summary)
    }
}

fn build_prompt(
    transcript: &str,
    language: Language,
    range: WordCountRange,
    title: Option<&str>,
) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Summarize the following video transcript in {}.\n",
        language.display_name()
    ));
    if let Some(title) = title {
        prompt.push_str(&format!("The video is titled \"{}\".\n", title));
    }
    prompt.push_str(&format!(
        "The summary must be between {} and {} words.\n\
         Structure it as:\n\
         - One opening paragraph stating the main topic.\n\
         - Bullet points covering the key ideas, in the order they appear.\n\
         - One closing sentence with the main takeaway.\n\
         Return only the summary, without preamble.\n\n\
         Transcript:\n{}",
        range.min_words(),
        range.max_words(),
        transcript
    ));
    prompt
}

/// Cut to at most `limit` characters, on a char boundary.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Models occasionally wrap output in a markdown code fence.
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(inner) = trimmed.strip_prefix("```") {
        let inner = inner.strip_prefix("markdown").unwrap_or(inner);
        let inner = inner.strip_suffix("```").unwrap_or(inner);
        return inner.trim().to_string();
    }
    trimmed.to_string()
}
