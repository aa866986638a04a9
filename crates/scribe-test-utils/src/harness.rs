// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end orchestrator tests.
//!
//! `TestHarness` builds a [`CommandOrchestrator`] over mock collaborators,
//! optionally connects it (consuming one scripted verify reply), and then
//! queues the test's replies.

use std::sync::Arc;

use scribe_agent::{Collaborators, CommandOrchestrator, Reply};
use scribe_config::ScribeConfig;
use scribe_config::model::PromptMode;
use scribe_core::error::ScribeError;
use scribe_core::types::{Anchor, DocumentId, MessageId, TextRange};
use tokio_util::sync::CancellationToken;

use crate::mock_client::{MockClientFactory, MockCompletionClient, MockReply};
use crate::mock_host::{MockConfigStore, MockDocumentHost, MockPrompter, RecordingUi};

/// Builder for test environments.
pub struct TestHarnessBuilder {
    config: ScribeConfig,
    documents: Vec<(String, String)>,
    replies: Vec<MockReply>,
    config_store: MockConfigStore,
    prompter: MockPrompter,
    connect: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: ScribeConfig::default(),
            documents: Vec::new(),
            replies: Vec::new(),
            config_store: MockConfigStore::complete(),
            prompter: MockPrompter::dismissing(),
            connect: true,
        }
    }

    pub fn with_document(mut self, id: &str, text: &str) -> Self {
        self.documents.push((id.to_string(), text.to_string()));
        self
    }

    /// Immediate text replies, queued after the connect reply.
    pub fn with_responses(mut self, responses: Vec<&str>) -> Self {
        self.replies
            .extend(responses.into_iter().map(MockReply::text));
        self
    }

    pub fn with_reply(mut self, reply: MockReply) -> Self {
        self.replies.push(reply);
        self
    }

    pub fn with_config(mut self, config: ScribeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn serialize_asks(mut self, on: bool) -> Self {
        self.config.orchestrator.serialize_asks = on;
        self
    }

    pub fn legacy_prompts(mut self) -> Self {
        self.config.prompt.mode = PromptMode::Legacy;
        self
    }

    pub fn with_config_store(mut self, store: MockConfigStore) -> Self {
        self.config_store = store;
        self
    }

    pub fn with_prompter(mut self, prompter: MockPrompter) -> Self {
        self.prompter = prompter;
        self
    }

    /// Leave the orchestrator unconnected; the first model command connects.
    pub fn lazy(mut self) -> Self {
        self.connect = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, ScribeError> {
        let documents = Arc::new(MockDocumentHost::new());
        for (id, text) in &self.documents {
            documents.insert(id, text);
        }
        let client = Arc::new(MockCompletionClient::new());
        let factory = Arc::new(MockClientFactory::new(client.clone()));
        let config_store = Arc::new(self.config_store);
        let prompter = Arc::new(self.prompter);
        let ui = Arc::new(RecordingUi::new());

        let orchestrator = Arc::new(CommandOrchestrator::new(
            &self.config,
            Collaborators {
                documents: documents.clone(),
                view: ui.clone(),
                config_store: config_store.clone(),
                prompter: prompter.clone(),
                clients: factory.clone(),
            },
        ));

        if self.connect {
            client.push_text("Connected.").await;
            orchestrator.connect().await?;
            client.clear_requests().await;
        }
        for reply in self.replies {
            client.push(reply).await;
        }

        Ok(TestHarness {
            orchestrator,
            client,
            factory,
            documents,
            config_store,
            prompter,
            ui,
        })
    }
}

/// A connected orchestrator and handles to every mock behind it.
pub struct TestHarness {
    pub orchestrator: Arc<CommandOrchestrator>,
    pub client: Arc<MockCompletionClient>,
    pub factory: Arc<MockClientFactory>,
    pub documents: Arc<MockDocumentHost>,
    pub config_store: Arc<MockConfigStore>,
    pub prompter: Arc<MockPrompter>,
    pub ui: Arc<RecordingUi>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Anchor over whole lines `first..=last` of `document`.
    pub fn anchor(document: &str, first: u32, last: u32) -> Anchor {
        Anchor::new(DocumentId(document.into()), TextRange::lines(first, last))
    }

    /// Asks on `anchor` with a fresh cancellation token.
    pub async fn ask(&self, anchor: &Anchor, question: &str) -> Result<MessageId, ScribeError> {
        self.orchestrator
            .ask(
                Reply::on_range(anchor.clone(), question),
                &CancellationToken::new(),
            )
            .await
    }

    /// Bodies of the thread on `anchor`, in order. Empty when no thread.
    pub async fn bodies(&self, anchor: &Anchor) -> Vec<String> {
        let Some(thread) = self.orchestrator.thread_for(anchor).await else {
            return Vec::new();
        };
        self.orchestrator
            .snapshot(thread)
            .await
            .map(|s| s.messages.into_iter().map(|m| m.body).collect())
            .unwrap_or_default()
    }
}
