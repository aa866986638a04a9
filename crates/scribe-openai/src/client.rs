// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Azure OpenAI chat-completions endpoint.
//!
//! Provides [`AzureOpenAiClient`] which handles URL construction,
//! `api-key` authentication and error decoding. It never retries.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use scribe_core::{CompletionRequest, ScribeError};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client bound to one Azure OpenAI resource.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_version: String,
}

impl AzureOpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - resource key, sent as the `api-key` header
    /// * `endpoint` - resource URL, e.g. `https://my-resource.openai.azure.com`
    /// * `api_version` - REST API version query parameter
    /// * `timeout` - whole-request timeout
    pub fn new(
        api_key: &SecretString,
        endpoint: &str,
        api_version: String,
        timeout: Duration,
    ) -> Result<Self, ScribeError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|e| ScribeError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ScribeError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
            api_version,
        })
    }

    /// Chat-completions URL for a deployment.
    pub fn completions_url(&self, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, deployment, self.api_version
        )
    }

    /// Sends one chat-completion request and decodes the response.
    pub async fn chat_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChatCompletionResponse, ScribeError> {
        let body = ChatCompletionRequest {
            messages: &request.messages,
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
            top_p: request.options.top_p,
            frequency_penalty: request.options.frequency_penalty,
            presence_penalty: request.options.presence_penalty,
        };

        let response = self
            .client
            .post(self.completions_url(&request.deployment))
            .json(&body)
            .send()
            .await
            .map_err(|e| ScribeError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(
            status = %status,
            deployment = request.deployment.as_str(),
            messages = request.messages.len(),
            "chat completion response received"
        );

        let text = response.text().await.map_err(|e| ScribeError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => match api_err.error.code {
                    Some(code) => format!("Azure OpenAI error ({code}): {}", api_err.error.message),
                    None => format!("Azure OpenAI error: {}", api_err.error.message),
                },
                Err(_) => format!("API returned {status}: {text}"),
            };
            return Err(ScribeError::provider(message));
        }

        serde_json::from_str(&text).map_err(|e| ScribeError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
