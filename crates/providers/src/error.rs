/// Errors from a translation provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider's API key is not configured.
    #[error("{provider} API key is not configured (set {env_var})")]
    MissingApiKey {
        provider: &'static str,
        env_var: &'static str,
    },

    /// No client is registered under this provider name.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The provider answered without any text.
    #[error("{0} returned an empty translation")]
    EmptyResponse(&'static str),
}

/// Ensure the response has a success status code.
///
/// Returns the response unchanged on success, or a [`ProviderError::Api`]
/// carrying the status and body text on failure.
pub(crate) async fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            provider,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Trim provider output and reject blank answers.
pub(crate) fn non_empty(provider: &'static str, text: Option<String>) -> Result<String, ProviderError> {
    match text.map(|t| t.trim().to_string()) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ProviderError::EmptyResponse(provider)),
    }
}
