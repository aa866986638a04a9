// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion session: a connected client bound to a deployment.
//!
//! Owned by the orchestrator and rebuilt on reconnect. There is no
//! process-wide client.

use std::fmt;
use std::sync::Arc;

use scribe_core::error::ScribeError;
use scribe_core::traits::CompletionClient;
use scribe_core::types::{ChatMessage, CompletionOptions, CompletionRequest};
use tracing::debug;

/// A completion client together with the deployment and sampling options
/// every call uses.
#[derive(Clone)]
pub struct CompletionSession {
    client: Arc<dyn CompletionClient>,
    deployment: String,
    options: CompletionOptions,
}

impl CompletionSession {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        deployment: impl Into<String>,
        options: CompletionOptions,
    ) -> Self {
        Self {
            client,
            deployment: deployment.into(),
            options,
        }
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub fn request(&self, messages: Vec<ChatMessage>) -> CompletionRequest {
        CompletionRequest {
            deployment: self.deployment.clone(),
            messages,
            options: self.options,
        }
    }

    /// Sends `messages` and returns the raw content of the first choice.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ScribeError> {
        let request = self.request(messages);
        debug!(
            client = self.client.name(),
            deployment = %self.deployment,
            messages = request.messages.len(),
            "sending completion request"
        );
        self.client.complete(&request).await
    }
}

impl fmt::Debug for CompletionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionSession")
            .field("client", &self.client.name())
            .field("deployment", &self.deployment)
            .field("options", &self.options)
            .finish()
    }
}
