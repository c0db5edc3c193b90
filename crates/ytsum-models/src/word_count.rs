//! Summary length selection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for an unrecognized word-count range string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized word count range: {0}")]
pub struct InvalidWordCountRange(pub String);

/// Requested summary length, as a small closed set of ranges.
///
/// Validated at admission: a request carrying anything but one of the three
/// known range strings is rejected before the pipeline starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCountRange {
    /// 100-200 words, target 150.
    Brief,
    /// 200-400 words, target 300.
    Standard,
    /// 400-600 words, target 500.
    Detailed,
}

impl WordCountRange {
    /// Minimum words asked of the summarization provider.
    pub fn min_words(&self) -> u32 {
        match self {
            Self::Brief => 100,
            Self::Standard => 200,
            Self::Detailed => 400,
        }
    }

    /// Maximum words asked of the summarization provider.
    pub fn max_words(&self) -> u32 {
        match self {
            Self::Brief => 200,
            Self::Standard => 400,
            Self::Detailed => 600,
        }
    }

    /// Midpoint target used for logging and length adjustment.
    pub fn target_words(&self) -> u32 {
        match self {
            Self::Brief => 150,
            Self::Standard => 300,
            Self::Detailed => 500,
        }
    }

    /// The request-facing range string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brief => "100-200",
            Self::Standard => "200-400",
            Self::Detailed => "400-600",
        }
    }
}

impl std::str::FromStr for WordCountRange {
    type Err = InvalidWordCountRange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "100-200" => Ok(Self::Brief),
            "200-400" => Ok(Self::Standard),
            "400-600" => Ok(Self::Detailed),
            other => Err(InvalidWordCountRange(other.to_string())),
        }
    }
}

impl std::fmt::Display for WordCountRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
