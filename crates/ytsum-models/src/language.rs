//! Output language handling.

use serde::{Deserialize, Serialize};

/// Supported summary output languages.
///
/// Provider prompts want the human-readable name, storage and cache keys
/// want the ISO code. Unknown codes fall back to [`Language::default`]
/// rather than failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
    Fr,
    De,
    It,
    Pt,
    Ca,
    Gl,
}

impl Language {
    /// Parse an ISO-639-1 code, falling back to the default language.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "es" => Self::Es,
            "en" => Self::En,
            "fr" => Self::Fr,
            "de" => Self::De,
            "it" => Self::It,
            "pt" => Self::Pt,
            "ca" => Self::Ca,
            "gl" => Self::Gl,
            _ => Self::default(),
        }
    }

    /// ISO code used for cache keys and provider hints.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ca => "ca",
            Self::Gl => "gl",
        }
    }

    /// Native name used when building provider prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Es => "Español",
            Self::En => "English",
            Self::Fr => "Français",
            Self::De => "Deutsch",
            Self::It => "Italiano",
            Self::Pt => "Português",
            Self::Ca => "Català",
            Self::Gl => "Galego",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Es
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
