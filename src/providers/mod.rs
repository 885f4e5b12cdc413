/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for various LLM providers:
 * - Gemini: Google Generative Language API
 * - Anthropic: Anthropic API integration
 * - Ollama: Local LLM server
 *
 * Clients implement `Provider`. The glossary engine only sees `Translator`,
 * an instruction + text → text function; `CredentialedTranslator` joins the two
 * and applies the credential policy.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod credentials;
pub mod gemini;
pub mod mock;
pub mod ollama;

pub use credentials::{CredentialedTranslator, Credentials, API_KEY_STORE_KEY};

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translator.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Whether requests need an API key
    fn requires_api_key(&self) -> bool {
        true
    }

    /// Run one instruction over one input
    ///
    /// # Arguments
    /// * `api_key` - Credential to send; empty for providers without keys
    /// * `instruction` - System instruction
    /// * `input` - Text the instruction applies to
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text or an error
    async fn complete(
        &self,
        api_key: &str,
        instruction: &str,
        input: &str,
    ) -> Result<String, ProviderError>;
}

/// Instruction-following text transformer consumed by the glossary engine
#[async_trait]
pub trait Translator: Send + Sync {
    /// Apply `instruction` to `input`
    async fn ask(&self, instruction: &str, input: &str) -> Result<String, ProviderError>;
}

/// Build the client for the configured provider
pub fn from_config(config: &TranslationConfig) -> Box<dyn Provider> {
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let endpoint = config.get_endpoint();
    let model = config.get_model();

    match config.provider {
        TranslationProvider::Gemini => Box::new(gemini::Gemini::new(endpoint, model, timeout)),
        TranslationProvider::Anthropic => {
            Box::new(anthropic::Anthropic::new(endpoint, model, timeout))
        }
        TranslationProvider::Ollama => Box::new(ollama::Ollama::new(endpoint, model, timeout)),
    }
}

/// Map an HTTP failure status to a provider error
pub(crate) fn status_error(status_code: u16, message: String) -> ProviderError {
    match status_code {
        401 | 403 => ProviderError::AuthenticationError(message),
        _ => ProviderError::ApiError {
            status_code,
            message,
        },
    }
}

/// Map a reqwest transport failure to a provider error
pub(crate) fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}
