//! The provider abstraction used by translation workers.

use async_trait::async_trait;

use crate::error::ProviderError;

/// One text fragment to translate.
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    /// Source language code or name; `"auto"` when unknown.
    pub source_language: &'a str,
    pub target_language: &'a str,
    /// Model override; `None` selects the provider's default model.
    pub model: Option<&'a str>,
}

impl<'a> TranslationRequest<'a> {
    /// Single-message prompt for providers without a system role.
    pub fn prompt(&self) -> String {
        format!(
            "Translate the following text from {} to {}. Preserve any special characters, \
             numbers, and formatting. Only return the translated text, without any \
             explanations:\n\n{}",
            self.source_language, self.target_language, self.text
        )
    }

    /// System instruction for providers that take the text as a bare user message.
    pub fn system_instruction(&self) -> String {
        format!(
            "You are a professional translator. Translate from {} to {}. \
             Only return the translated text.",
            self.source_language, self.target_language
        )
    }

    /// The requested model, falling back to `default`.
    pub fn model_or<'b>(&'b self, default: &'b str) -> &'b str {
        match self.model {
            Some(m) if !m.trim().is_empty() => m,
            _ => default,
        }
    }
}

/// A large-language-model backend able to translate text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Provider name as used in requests (e.g. `"groq"`).
    fn name(&self) -> &'static str;

    /// Model used when the request does not name one.
    fn default_model(&self) -> &'static str;

    /// Translate `request.text`, returning the trimmed translation.
    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String, ProviderError>;
}
