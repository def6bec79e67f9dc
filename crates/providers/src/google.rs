//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lingosheet_core::catalog::PROVIDER_GOOGLE;

use crate::config::ProviderSettings;
use crate::error::{ensure_success, non_empty, ProviderError};
use crate::translator::{TranslationRequest, Translator};

pub const GOOGLE_DEFAULT_MODEL: &str = "gemini-1.5-pro";

pub struct GeminiClient {
    client: reqwest::Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Translator for GeminiClient {
    fn name(&self) -> &'static str {
        PROVIDER_GOOGLE
    }

    fn default_model(&self) -> &'static str {
        GOOGLE_DEFAULT_MODEL
    }

    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey {
                provider: PROVIDER_GOOGLE,
                env_var: "GOOGLE_API_KEY",
            })?;

        let prompt = request.prompt();
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };
        let model = request.model_or(GOOGLE_DEFAULT_MODEL);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.settings.base_url, model
            ))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateResponse = ensure_success(PROVIDER_GOOGLE, response)
            .await?
            .json()
            .await?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text);

        non_empty(PROVIDER_GOOGLE, text)
    }
}
