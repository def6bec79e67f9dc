//! Chat-completions client shared by OpenAI and Groq.
//!
//! Groq exposes the OpenAI wire format under its own base URL, so one
//! client serves both; they differ only in defaults and in how the prompt
//! is laid out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lingosheet_core::catalog::{PROVIDER_GROQ, PROVIDER_OPENAI};

use crate::config::ProviderSettings;
use crate::error::{ensure_success, non_empty, ProviderError};
use crate::translator::{TranslationRequest, Translator};

pub const GROQ_DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// How the translation request is turned into chat messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptLayout {
    /// System instruction plus the bare text as the user message.
    SystemAndText,
    /// A single user message carrying the full prompt.
    SinglePrompt,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    provider: &'static str,
    key_env: &'static str,
    default_model: &'static str,
    layout: PromptLayout,
    client: reqwest::Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionsClient {
    /// Groq client: system instruction + raw text, `max_tokens = 1024`.
    pub fn groq(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self {
            provider: PROVIDER_GROQ,
            key_env: "GROQ_API_KEY",
            default_model: GROQ_DEFAULT_MODEL,
            layout: PromptLayout::SystemAndText,
            client,
            settings,
        }
    }

    /// OpenAI client: one user message with the full prompt.
    pub fn openai(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self {
            provider: PROVIDER_OPENAI,
            key_env: "OPENAI_API_KEY",
            default_model: OPENAI_DEFAULT_MODEL,
            layout: PromptLayout::SinglePrompt,
            client,
            settings,
        }
    }
}

#[async_trait]
impl Translator for ChatCompletionsClient {
    fn name(&self) -> &'static str {
        self.provider
    }

    fn default_model(&self) -> &'static str {
        self.default_model
    }

    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String, ProviderError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey {
                provider: self.provider,
                env_var: self.key_env,
            })?;

        let system;
        let prompt;
        let (messages, temperature, max_tokens) = match self.layout {
            PromptLayout::SystemAndText => {
                system = request.system_instruction();
                (
                    vec![
                        ChatMessage { role: "system", content: &system },
                        ChatMessage { role: "user", content: request.text },
                    ],
                    Some(1.0),
                    Some(1024),
                )
            }
            PromptLayout::SinglePrompt => {
                prompt = request.prompt();
                (vec![ChatMessage { role: "user", content: &prompt }], None, None)
            }
        };

        let body = ChatRequest {
            model: request.model_or(self.default_model),
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.settings.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = ensure_success(self.provider, response).await?.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        non_empty(self.provider, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use mockito::Matcher;
    use serde_json::json;

    fn settings(base_url: String, api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            api_key: api_key.map(str::to_string),
            base_url,
        }
    }

    fn request() -> TranslationRequest<'static> {
        TranslationRequest {
            text: "Hello",
            source_language: "auto",
            target_language: "fr",
            model: None,
        }
    }

    #[tokio::test]
    async fn groq_sends_system_instruction_and_trims_answer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": GROQ_DEFAULT_MODEL,
                "messages": [
                    {"role": "system"},
                    {"role": "user", "content": "Hello"}
                ],
                "max_tokens": 1024,
                "stream": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"choices": [{"message": {"content": "  Bonjour \n"}}]}).to_string())
            .create_async()
            .await;

        let client = ChatCompletionsClient::groq(
            reqwest::Client::new(),
            settings(server.url(), Some("test-key")),
        );
        let translated = client.translate(&request()).await.unwrap();

        assert_eq!(translated, "Bonjour");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn openai_uses_requested_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(json!({"model": "gpt-4o"})))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "Bonjour"}}]}).to_string())
            .create_async()
            .await;

        let client = ChatCompletionsClient::openai(
            reqwest::Client::new(),
            settings(server.url(), Some("k")),
        );
        let mut req = request();
        req.model = Some("gpt-4o");

        assert_eq!(client.translate(&req).await.unwrap(), "Bonjour");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = ChatCompletionsClient::groq(
            reqwest::Client::new(),
            settings(server.url(), Some("k")),
        );

        assert_matches!(
            client.translate(&request()).await,
            Err(ProviderError::Api { status: 429, ref body, .. }) if body == "rate limited"
        );
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let client = ChatCompletionsClient::openai(
            reqwest::Client::new(),
            settings(server.url(), Some("k")),
        );

        assert_matches!(
            client.translate(&request()).await,
            Err(ProviderError::EmptyResponse("openai"))
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let client = ChatCompletionsClient::groq(
            reqwest::Client::new(),
            settings("http://127.0.0.1:9".to_string(), None),
        );

        assert_matches!(
            client.translate(&request()).await,
            Err(ProviderError::MissingApiKey { env_var: "GROQ_API_KEY", .. })
        );
    }
}
