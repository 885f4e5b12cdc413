use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{status_error, transport_error, Provider};
use crate::errors::ProviderError;

/// Gemini client for the generateContent endpoint
#[derive(Debug)]
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API base URL
    endpoint: String,
    /// Model name, e.g. "gemini-2.0-flash"
    model: String,
}

/// A block of text inside a Gemini message
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// Message content made of parts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    pub parts: Vec<GeminiPart>,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// System instruction guiding the model
    pub system_instruction: GeminiContent,
    /// Conversation contents
    pub contents: Vec<GeminiContent>,
}

impl GeminiRequest {
    /// Build a single-turn request
    pub fn new(instruction: &str, input: &str) -> Self {
        Self {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: instruction.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: input.to_string(),
                }],
            }],
        }
    }
}

/// One generated candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// URL of the generateContent call, key passed as a query parameter
    pub fn request_url(&self, api_key: &str) -> Result<Url, ProviderError> {
        let base = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&base)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", base, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn complete(
        &self,
        api_key: &str,
        instruction: &str,
        input: &str,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(api_key)?;
        let request = GeminiRequest::new(instruction, input);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            // Gemini answers an invalid key with 400 rather than 401
            if status.as_u16() == 400 && error_text.contains("API_KEY_INVALID") {
                return Err(ProviderError::AuthenticationError(
                    "Gemini API key is invalid".to_string(),
                ));
            }
            return Err(status_error(status.as_u16(), error_text));
        }

        let body = response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        body.first_text()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Gemini response has no candidates".to_string()))
    }
}
