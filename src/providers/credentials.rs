/*!
 * API key caching and the credential policy around provider calls.
 *
 * The key lives in the key-value store. When it is missing the user is asked
 * for it; when a provider rejects it, it is deleted so the next call asks again.
 */

use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;

use super::{Provider, Translator};
use crate::database::KeyValueStore;
use crate::errors::{AppError, ProviderError};
use crate::page::SecretPrompt;

/// Store key of the cached API key
pub const API_KEY_STORE_KEY: &str = "apiKey";

/// Cached API key backed by a key-value store and a secret prompt
pub struct Credentials<S: KeyValueStore, P: SecretPrompt> {
    store: S,
    prompt: P,
    cached: Mutex<Option<String>>,
}

impl<S: KeyValueStore, P: SecretPrompt> Credentials<S, P> {
    /// Create a credential cache
    pub fn new(store: S, prompt: P) -> Self {
        Self {
            store,
            prompt,
            cached: Mutex::new(None),
        }
    }

    /// Current API key: memory, then store, then prompt.
    ///
    /// A prompted key is trimmed and persisted. A blank answer fails with
    /// `ProviderError::MissingCredential`.
    pub async fn api_key(&self) -> Result<String, AppError> {
        let cached = self.cached.lock().clone();
        if let Some(key) = cached {
            return Ok(key);
        }

        let stored = self
            .store
            .get(API_KEY_STORE_KEY)
            .await?
            .filter(|key| !key.trim().is_empty());

        let key = match stored {
            Some(key) => key,
            None => {
                let entered = self
                    .prompt
                    .secret("Enter your API key")
                    .map(|key| key.trim().to_string())
                    .unwrap_or_default();
                if entered.is_empty() {
                    return Err(ProviderError::MissingCredential("No API key".to_string()).into());
                }
                self.store.set(API_KEY_STORE_KEY, &entered).await?;
                debug!("Stored new API key");
                entered
            }
        };

        *self.cached.lock() = Some(key.clone());
        Ok(key)
    }

    /// Forget the key in memory and in the store
    pub async fn invalidate(&self) -> Result<(), AppError> {
        warn!("Invalidating stored API key");
        self.cached.lock().take();
        self.store.delete(API_KEY_STORE_KEY).await?;
        Ok(())
    }
}

/// A `Translator` running a provider under the credential policy
pub struct CredentialedTranslator<'a, S: KeyValueStore, P: SecretPrompt> {
    provider: &'a dyn Provider,
    credentials: &'a Credentials<S, P>,
}

impl<'a, S: KeyValueStore, P: SecretPrompt> CredentialedTranslator<'a, S, P> {
    /// Wrap `provider` with `credentials`
    pub fn new(provider: &'a dyn Provider, credentials: &'a Credentials<S, P>) -> Self {
        Self {
            provider,
            credentials,
        }
    }
}

#[async_trait]
impl<S: KeyValueStore, P: SecretPrompt> Translator for CredentialedTranslator<'_, S, P> {
    async fn ask(&self, instruction: &str, input: &str) -> Result<String, ProviderError> {
        let api_key = if self.provider.requires_api_key() {
            self.credentials.api_key().await.map_err(|e| match e {
                AppError::Provider(inner) => inner,
                other => ProviderError::MissingCredential(other.to_string()),
            })?
        } else {
            String::new()
        };

        match self.provider.complete(&api_key, instruction, input).await {
            Err(e) if e.is_auth() => {
                if let Err(store_error) = self.credentials.invalidate().await {
                    warn!("Failed to invalidate API key: {}", store_error);
                }
                Err(e)
            }
            other => other,
        }
    }
}
