//! Lookup of translation clients by provider name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::anthropic::AnthropicClient;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::google::GeminiClient;
use crate::openai::ChatCompletionsClient;
use crate::translator::Translator;

/// Maps provider names to their [`Translator`].
///
/// Cheap to clone; the clients themselves are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<&'static str, Arc<dyn Translator>>,
}

impl ProviderRegistry {
    /// An empty registry (tests register their own translators).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the four HTTP-backed providers sharing one connection pool.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::new()
            .with(Arc::new(ChatCompletionsClient::groq(
                client.clone(),
                config.groq.clone(),
            )))
            .with(Arc::new(ChatCompletionsClient::openai(
                client.clone(),
                config.openai.clone(),
            )))
            .with(Arc::new(AnthropicClient::new(
                client.clone(),
                config.anthropic.clone(),
            )))
            .with(Arc::new(GeminiClient::new(client, config.google.clone()))))
    }

    /// Register (or replace) a translator under its own name.
    pub fn with(mut self, translator: Arc<dyn Translator>) -> Self {
        self.providers.insert(translator.name(), translator);
        self
    }

    /// Translator for `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Translator>, ProviderError> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::UnsupportedProvider(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
