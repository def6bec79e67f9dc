use std::time::Duration;

use lingosheet_core::catalog::{PROVIDER_ANTHROPIC, PROVIDER_GOOGLE, PROVIDER_GROQ, PROVIDER_OPENAI};

/// Credentials and endpoint of one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl ProviderSettings {
    fn from_env(key_var: &str, base_var: &str, default_base: &str) -> Self {
        let api_key = std::env::var(key_var)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let base_url = std::env::var(base_var)
            .unwrap_or_else(|_| default_base.into())
            .trim_end_matches('/')
            .to_string();
        Self { api_key, base_url }
    }
}

/// Provider configuration loaded from environment variables.
///
/// | Env Var                 | Default                                        |
/// |-------------------------|------------------------------------------------|
/// | `GROQ_API_KEY`          | unset                                          |
/// | `GROQ_API_BASE`         | `https://api.groq.com/openai/v1`               |
/// | `OPENAI_API_KEY`        | unset                                          |
/// | `OPENAI_API_BASE`       | `https://api.openai.com/v1`                    |
/// | `ANTHROPIC_API_KEY`     | unset                                          |
/// | `ANTHROPIC_API_BASE`    | `https://api.anthropic.com`                    |
/// | `GOOGLE_API_KEY`        | unset                                          |
/// | `GOOGLE_API_BASE`       | `https://generativelanguage.googleapis.com`    |
/// | `PROVIDER_TIMEOUT_SECS` | `60`                                           |
///
/// A missing key is not a startup error; jobs using that provider fail.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub groq: ProviderSettings,
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub google: ProviderSettings,
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let request_timeout_secs: u64 = std::env::var("PROVIDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("PROVIDER_TIMEOUT_SECS must be a valid u64");

        let config = Self {
            groq: ProviderSettings::from_env(
                "GROQ_API_KEY",
                "GROQ_API_BASE",
                "https://api.groq.com/openai/v1",
            ),
            openai: ProviderSettings::from_env(
                "OPENAI_API_KEY",
                "OPENAI_API_BASE",
                "https://api.openai.com/v1",
            ),
            anthropic: ProviderSettings::from_env(
                "ANTHROPIC_API_KEY",
                "ANTHROPIC_API_BASE",
                "https://api.anthropic.com",
            ),
            google: ProviderSettings::from_env(
                "GOOGLE_API_KEY",
                "GOOGLE_API_BASE",
                "https://generativelanguage.googleapis.com",
            ),
            request_timeout: Duration::from_secs(request_timeout_secs),
        };

        for (name, settings) in [
            (PROVIDER_GROQ, &config.groq),
            (PROVIDER_OPENAI, &config.openai),
            (PROVIDER_ANTHROPIC, &config.anthropic),
            (PROVIDER_GOOGLE, &config.google),
        ] {
            if settings.api_key.is_none() {
                tracing::warn!(provider = name, "No API key configured; jobs using it will fail");
            }
        }

        config
    }
}
