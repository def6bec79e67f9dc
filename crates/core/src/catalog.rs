//! Static catalogue of target languages and translation providers.
//!
//! Served verbatim by the metadata endpoints.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Provider name constants
// ---------------------------------------------------------------------------

/// Groq (OpenAI-compatible chat completions).
pub const PROVIDER_GROQ: &str = "groq";
/// OpenAI chat completions.
pub const PROVIDER_OPENAI: &str = "openai";
/// Anthropic messages API.
pub const PROVIDER_ANTHROPIC: &str = "anthropic";
/// Google Gemini `generateContent`.
pub const PROVIDER_GOOGLE: &str = "google";

/// All providers a job may be submitted against.
pub const VALID_PROVIDERS: &[&str] = &[
    PROVIDER_GROQ,
    PROVIDER_OPENAI,
    PROVIDER_GOOGLE,
    PROVIDER_ANTHROPIC,
];

/// Provider used when the request leaves `provider` empty.
pub const DEFAULT_PROVIDER: &str = PROVIDER_GROQ;

/// Target language used when the request leaves `target_language` empty.
pub const DEFAULT_TARGET_LANGUAGE: &str = "es";

// ---------------------------------------------------------------------------
// Catalogue entries
// ---------------------------------------------------------------------------

/// A selectable target language.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// A provider together with the models offered for it in the UI.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderModels {
    pub name: &'static str,
    pub models: &'static [&'static str],
}

/// Short provider listing with a display name (`GET /ai-providers`).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub models: &'static [&'static str],
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "it", name: "Italian" },
    Language { code: "pt", name: "Portuguese" },
];

pub const PROVIDER_MODELS: &[ProviderModels] = &[
    ProviderModels {
        name: PROVIDER_GROQ,
        models: &[
            "gemma2-9b-it",
            "llama-3.3-70b-versatile",
            "llama-3.1-8b-instant",
            "llama-guard-3-8b",
            "llama3-70b-8192",
            "llama3-8b-8192",
            "mixtral-8x7b-32768",
            "whisper-large-v3",
            "whisper-large-v3-turbo",
        ],
    },
    ProviderModels {
        name: PROVIDER_OPENAI,
        models: &[
            "gpt-4o-mini-realtime-preview-2024-12-17",
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-3.5-turbo",
        ],
    },
    ProviderModels {
        name: PROVIDER_GOOGLE,
        models: &[
            "gemini-1.5-flash",
            "gemini-2.0-flash-exp",
            "gemini-1.5-flash-8b",
            "gemini-1.5-pro",
        ],
    },
    ProviderModels {
        name: PROVIDER_ANTHROPIC,
        models: &[
            "claude-3-5-sonnet-20241022",
            "claude-3-5-haiku-20241022",
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240307",
        ],
    },
];

pub const AI_PROVIDERS: &[ProviderSummary] = &[
    ProviderSummary { id: PROVIDER_GROQ, name: "Groq AI", models: &["llama3-8b-8192"] },
    ProviderSummary {
        id: PROVIDER_ANTHROPIC,
        name: "Anthropic AI",
        models: &["claude-3-5-sonnet-20241022"],
    },
    ProviderSummary { id: PROVIDER_OPENAI, name: "OpenAI", models: &["gpt-4"] },
    ProviderSummary { id: PROVIDER_GOOGLE, name: "Google AI", models: &["gemini-2.0-flash-exp"] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_provider_is_valid() {
        for entry in PROVIDER_MODELS {
            assert!(VALID_PROVIDERS.contains(&entry.name), "{}", entry.name);
        }
        for entry in AI_PROVIDERS {
            assert!(VALID_PROVIDERS.contains(&entry.id), "{}", entry.id);
        }
    }

    #[test]
    fn default_provider_is_valid() {
        assert!(VALID_PROVIDERS.contains(&DEFAULT_PROVIDER));
    }
}
