//! Gemini generateContent wire types shared by the transcription and
//! summarization clients.

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// Gemini API request.
#[derive(Debug, Serialize)]
pub(crate) struct GeminiRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text { text: String },
    File { file_data: FileData },
}

#[derive(Debug, Serialize)]
pub(crate) struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: ResponseContent,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub text: String,
}

impl GeminiRequest {
    /// Request with a single text part.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: prompt.into(),
                }],
            }],
        }
    }

    /// Request with a text part followed by an uploaded-file part.
    pub fn text_with_file(prompt: impl Into<String>, mime_type: &str, file_uri: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.into(),
                    },
                    Part::File {
                        file_data: FileData {
                            mime_type: mime_type.to_string(),
                            file_uri: file_uri.to_string(),
                        },
                    },
                ],
            }],
        }
    }
}

/// Pull the first candidate's text out of a response.
pub(crate) fn extract_text(response: GeminiResponse) -> ProviderResult<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or(ProviderError::MissingField("candidates[0].content.parts"))?;

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}
