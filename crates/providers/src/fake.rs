//! Scripted in-process translator for tests in downstream crates.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::translator::{TranslationRequest, Translator};

/// Provider name the fake registers under.
pub const FAKE_PROVIDER: &str = "fake";

/// Answers `"[<target>] <text>"` without any network access.
///
/// Calls are counted from zero; the builder methods make a given call fail,
/// panic or wait first.
#[derive(Default)]
pub struct FakeTranslator {
    calls: AtomicUsize,
    fail_at: Option<usize>,
    panic_at: Option<usize>,
    delay: Duration,
}

impl FakeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call number `call` returns an API error.
    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Call number `call` panics.
    pub fn panicking_at(mut self, call: usize) -> Self {
        self.panic_at = Some(call);
        self
    }

    /// Every call sleeps `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `translate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    fn name(&self) -> &'static str {
        FAKE_PROVIDER
    }

    fn default_model(&self) -> &'static str {
        "fake-model"
    }

    async fn translate(&self, request: &TranslationRequest<'_>) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panic_at == Some(call) {
            panic!("fake translator panicked on call {call}");
        }
        if self.fail_at == Some(call) {
            return Err(ProviderError::Api {
                provider: FAKE_PROVIDER,
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(format!("[{}] {}", request.target_language, request.text))
    }
}
