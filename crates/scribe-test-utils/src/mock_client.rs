// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion client for deterministic testing.
//!
//! `MockCompletionClient` implements `CompletionClient` with scripted
//! replies, so tests never reach the network.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use scribe_core::error::ScribeError;
use scribe_core::traits::{ClientFactory, CompletionClient};
use scribe_core::types::{CompletionRequest, Credentials};

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct MockReply {
    /// Content on `Ok`, upstream error message on `Err`.
    pub outcome: Result<String, String>,
    /// How long the call takes before resolving.
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            outcome: Ok(content.into()),
            delay: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A completion client that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue in call order. When the queue is
/// empty, "mock response" is returned. Every request is captured.
pub struct MockCompletionClient {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A client pre-loaded with immediate text replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(responses.into_iter().map(MockReply::text).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn push(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn push_text(&self, content: impl Into<String>) {
        self.push(MockReply::text(content)).await;
    }

    pub async fn push_error(&self, message: impl Into<String>) {
        self.push(MockReply::error(message)).await;
    }

    /// Requests received so far, in call order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn clear_requests(&self) {
        self.requests.lock().await.clear();
    }

    pub async fn pending_replies(&self) -> usize {
        self.replies.lock().await.len()
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "mock-completion"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ScribeError> {
        self.requests.lock().await.push(request.clone());
        let scripted = self.replies.lock().await.pop_front();
        let reply = scripted.unwrap_or_else(|| {
            debug!("reply queue empty, serving default");
            MockReply::text("mock response")
        });

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.outcome.map_err(|message| {
            debug!(error = %message, "serving scripted error");
            ScribeError::provider(message)
        })
    }
}

/// Hands out the same mock client for any credentials and counts builds.
pub struct MockClientFactory {
    client: Arc<MockCompletionClient>,
    builds: AtomicUsize,
    last_endpoint: std::sync::Mutex<Option<String>>,
}

impl MockClientFactory {
    pub fn new(client: Arc<MockCompletionClient>) -> Self {
        Self {
            client,
            builds: AtomicUsize::new(0),
            last_endpoint: std::sync::Mutex::new(None),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn last_endpoint(&self) -> Option<String> {
        self.last_endpoint.lock().ok().and_then(|e| e.clone())
    }
}

impl ClientFactory for MockClientFactory {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn CompletionClient>, ScribeError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_endpoint.lock() {
            *last = Some(credentials.endpoint.clone());
        }
        Ok(self.client.clone())
    }
}
