//! Translation provider clients.
//!
//! Every large-language-model backend implements [`Translator`]; the
//! [`ProviderRegistry`] maps the `provider` field of a translation request
//! to one of them. HTTP calls go through [`reqwest`].

pub mod anthropic;
pub mod config;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
pub mod google;
pub mod openai;
pub mod registry;
pub mod translator;

pub use config::{ProviderConfig, ProviderSettings};
pub use error::ProviderError;
pub use registry::ProviderRegistry;
pub use translator::{TranslationRequest, Translator};
