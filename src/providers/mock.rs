/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, tagging the input
 * - `MockProvider::scripted(..)` - Replays canned responses in order
 * - `MockProvider::failing()` - Always fails with a transport error
 * - `MockProvider::rejecting_key()` - Always fails with an authentication error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, Translator};

/// A request observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Key sent with the request
    pub api_key: String,
    /// System instruction
    pub instruction: String,
    /// Input text
    pub input: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[TRANSLATED] <input>` or the custom generator output
    Working,
    /// Pops the next scripted response; fails once the script is exhausted
    Scripted,
    /// Always fails with a transport error
    Failing,
    /// Always rejects the credential
    RejectingKey,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Responses replayed in scripted mode
    script: Arc<Mutex<VecDeque<String>>>,
    /// Every request received, in order
    calls: Arc<Mutex<Vec<MockCall>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, &str) -> String>,
    /// Whether requests need a key
    requires_key: bool,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
            requires_key: true,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock replaying `responses` in order
    pub fn scripted(responses: Vec<String>) -> Self {
        let mock = Self::new(MockBehavior::Scripted);
        mock.script.lock().extend(responses);
        mock
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that rejects every credential
    pub fn rejecting_key() -> Self {
        Self::new(MockBehavior::RejectingKey)
    }

    /// Set a custom response generator taking (instruction, input)
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Mark the mock as a keyless provider
    pub fn without_key(mut self) -> Self {
        self.requires_key = false;
        self
    }

    /// Queue another scripted response
    pub fn push_response(&self, response: impl Into<String>) {
        self.script.lock().push_back(response.into());
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn requires_api_key(&self) -> bool {
        self.requires_key
    }

    async fn complete(
        &self,
        api_key: &str,
        instruction: &str,
        input: &str,
    ) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(MockCall {
            api_key: api_key.to_string(),
            instruction: instruction.to_string(),
            input: input.to_string(),
        });

        match self.behavior {
            MockBehavior::Working => Ok(match self.custom_response {
                Some(generator) => generator(instruction, input),
                None => format!("[TRANSLATED] {}", input),
            }),
            MockBehavior::Scripted => self.script.lock().pop_front().ok_or_else(|| {
                ProviderError::RequestFailed("Mock script exhausted".to_string())
            }),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated API failure".to_string(),
            }),
            MockBehavior::RejectingKey => Err(ProviderError::AuthenticationError(
                "Simulated invalid API key".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Translator for MockProvider {
    async fn ask(&self, instruction: &str, input: &str) -> Result<String, ProviderError> {
        self.complete("", instruction, input).await
    }
}
