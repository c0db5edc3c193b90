//! HTTP clients for the three external providers the pipeline depends on:
//! audio acquisition, transcription and summarization.
//!
//! Each client sits behind a trait in [`traits`] so the pipeline can be
//! tested without the network. Errors keep the raw provider status and
//! body; mapping into the user-facing taxonomy happens upstream.

pub mod audio;
pub mod error;
mod gemini;
pub mod summarize;
pub mod traits;
pub mod transcribe;

pub use audio::{AudioApiClient, AudioArtifact};
pub use error::{ProviderError, ProviderResult};
pub use summarize::{SummaryClient, TRANSCRIPT_CHAR_CEILING};
pub use traits::{AudioFetcher, Summarizer, Transcriber};
pub use transcribe::{TranscriptClient, MAX_AUDIO_BYTES};
