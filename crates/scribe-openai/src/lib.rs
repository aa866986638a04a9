// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Azure OpenAI completion client for Scribe.
//!
//! This crate implements [`CompletionClient`] for the Azure OpenAI
//! chat-completions API and provides [`AzureClientFactory`] so a session can
//! rebuild its client whenever credentials change.

pub mod client;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scribe_config::model::CompletionConfig;
use scribe_core::{
    ClientFactory, CompletionClient, CompletionRequest, Credentials, ScribeError,
};
use tracing::{debug, info};

pub use crate::client::AzureOpenAiClient;

#[async_trait]
impl CompletionClient for AzureOpenAiClient {
    fn name(&self) -> &str {
        "azure-openai"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ScribeError> {
        let response = self.chat_completion(request).await?;
        let content = response.first_content();
        debug!(
            id = response.id.as_deref().unwrap_or("-"),
            chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}

/// Builds [`AzureOpenAiClient`]s with the transport settings from configuration.
#[derive(Debug, Clone)]
pub struct AzureClientFactory {
    api_version: String,
    timeout: Duration,
}

impl AzureClientFactory {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl ClientFactory for AzureClientFactory {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn CompletionClient>, ScribeError> {
        let client = AzureOpenAiClient::new(
            &credentials.api_key,
            &credentials.endpoint,
            self.api_version.clone(),
            self.timeout,
        )?;
        info!(
            endpoint = credentials.endpoint.as_str(),
            deployment = credentials.deployment.as_str(),
            "Azure OpenAI client initialized"
        );
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::{ChatMessage, CompletionOptions};
    use secrecy::SecretString;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn factory_client_returns_empty_string_for_null_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let factory = AzureClientFactory::new(&CompletionConfig::default());
        let client = factory
            .build(&Credentials {
                api_key: SecretString::from("k"),
                endpoint: server.uri(),
                deployment: "d".into(),
            })
            .unwrap();

        let content = client
            .complete(&CompletionRequest {
                deployment: "d".into(),
                messages: vec![ChatMessage::user("I want to book a flight to Varanasi.")],
                options: CompletionOptions::default(),
            })
            .await
            .unwrap();
        assert_eq!(content, "");
        assert_eq!(client.name(), "azure-openai");
    }
}
