//! Anthropic messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lingosheet_core::catalog::PROVIDER_ANTHROPIC;

use crate::config::ProviderSettings;
use crate::error::{ensure_success, non_empty, ProviderError};
use crate::translator::{TranslationRequest, Translator};

pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Value of the `anthropic-version` header.
const API_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 1000;

pub struct AnthropicClient {
    client: reqwest::Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl Translator for AnthropicClient {
    fn name(&self) -> &'static str {
        PROVIDER_ANTHROPIC
    }

    fn default_model(&self) -> &'static str {
        ANTHROPIC_DEFAULT_MODEL
    }

    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey {
                provider: PROVIDER_ANTHROPIC,
                env_var: "ANTHROPIC_API_KEY",
            })?;

        let prompt = request.prompt();
        let body = MessagesRequest {
            model: request.model_or(ANTHROPIC_DEFAULT_MODEL),
            max_tokens: MAX_TOKENS,
            messages: [Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.settings.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let parsed: MessagesResponse = ensure_success(PROVIDER_ANTHROPIC, response)
            .await?
            .json()
            .await?;
        let text = parsed.content.into_iter().find_map(|block| block.text);

        non_empty(PROVIDER_ANTHROPIC, text)
    }
}
