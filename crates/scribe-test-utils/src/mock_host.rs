// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock host collaborators: documents, config store, prompter, and a view
//! that records everything shown to the user.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use scribe_core::error::ScribeError;
use scribe_core::traits::{ConfigStore, CredentialPrompter, DocumentHost, ThreadView};
use scribe_core::types::{
    ConfigKey, DocumentId, PromptSpec, Severity, TextRange, ThreadId, ThreadSnapshot,
};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory documents. Reads always see the latest text.
#[derive(Default)]
pub struct MockDocumentHost {
    documents: Mutex<HashMap<DocumentId, String>>,
}

impl MockDocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, id: &str, text: &str) -> Self {
        self.insert(id, text);
        self
    }

    /// Opens or overwrites a document.
    pub fn insert(&self, id: &str, text: &str) {
        lock(&self.documents).insert(DocumentId(id.into()), text.to_string());
    }

    /// Closes a document; later reads and writes fail.
    pub fn close(&self, id: &str) {
        lock(&self.documents).remove(&DocumentId(id.into()));
    }

    pub fn text(&self, id: &str) -> Option<String> {
        lock(&self.documents).get(&DocumentId(id.into())).cloned()
    }

    fn unavailable(document: &DocumentId) -> ScribeError {
        ScribeError::DocumentUnavailable {
            document: document.clone(),
            message: "no open editor for document".into(),
        }
    }
}

#[async_trait]
impl DocumentHost for MockDocumentHost {
    async fn read_range(
        &self,
        document: &DocumentId,
        range: TextRange,
    ) -> Result<String, ScribeError> {
        let documents = lock(&self.documents);
        let text = documents
            .get(document)
            .ok_or_else(|| Self::unavailable(document))?;
        Ok(text[range.byte_span(text)].to_string())
    }

    async fn replace_range(
        &self,
        document: &DocumentId,
        range: TextRange,
        replacement: &str,
    ) -> Result<(), ScribeError> {
        let mut documents = lock(&self.documents);
        let text = documents
            .get_mut(document)
            .ok_or_else(|| Self::unavailable(document))?;
        let span = range.byte_span(text);
        text.replace_range(span, replacement);
        Ok(())
    }

    async fn line_count(&self, document: &DocumentId) -> Result<u32, ScribeError> {
        let documents = lock(&self.documents);
        let text = documents
            .get(document)
            .ok_or_else(|| Self::unavailable(document))?;
        Ok(text.lines().count().max(1) as u32)
    }
}

/// A config store backed by a map.
#[derive(Default)]
pub struct MockConfigStore {
    values: Mutex<HashMap<ConfigKey, String>>,
}

impl MockConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All three items set to test values.
    pub fn complete() -> Self {
        let store = Self::new();
        store.insert(ConfigKey::ApiKey, "test-key");
        store.insert(ConfigKey::Endpoint, "https://test.openai.azure.com");
        store.insert(ConfigKey::DeploymentName, "test-deployment");
        store
    }

    pub fn insert(&self, key: ConfigKey, value: &str) {
        lock(&self.values).insert(key, value.to_string());
    }

    pub fn value(&self, key: ConfigKey) -> Option<String> {
        lock(&self.values).get(&key).cloned()
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    async fn get(&self, key: ConfigKey) -> Option<String> {
        self.value(key)
    }

    async fn set(&self, key: ConfigKey, value: &str) -> Result<(), ScribeError> {
        self.insert(key, value);
        Ok(())
    }
}

/// Answers credential prompts from a fixed table and records every prompt.
#[derive(Default)]
pub struct MockPrompter {
    answers: HashMap<ConfigKey, String>,
    asked: Mutex<Vec<PromptSpec>>,
}

impl MockPrompter {
    /// Dismisses every prompt.
    pub fn dismissing() -> Self {
        Self::default()
    }

    pub fn answering<'a>(answers: impl IntoIterator<Item = (ConfigKey, &'a str)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<PromptSpec> {
        lock(&self.asked).clone()
    }

    fn key_for(spec: &PromptSpec) -> Option<ConfigKey> {
        if spec.title.contains("API Key") {
            Some(ConfigKey::ApiKey)
        } else if spec.title.contains("Endpoint") {
            Some(ConfigKey::Endpoint)
        } else if spec.title.contains("Deployment") {
            Some(ConfigKey::DeploymentName)
        } else {
            None
        }
    }
}

#[async_trait]
impl CredentialPrompter for MockPrompter {
    async fn prompt(&self, spec: &PromptSpec) -> Option<String> {
        lock(&self.asked).push(spec.clone());
        Self::key_for(spec).and_then(|key| self.answers.get(&key).cloned())
    }
}

/// A thread view that records renders, disposals, and notices.
#[derive(Default)]
pub struct RecordingUi {
    renders: Mutex<Vec<ThreadSnapshot>>,
    disposed: Mutex<Vec<ThreadId>>,
    notices: Mutex<Vec<(Severity, String)>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(Severity, String)> {
        lock(&self.notices).clone()
    }

    fn last_with(&self, severity: Severity) -> Option<String> {
        lock(&self.notices)
            .iter()
            .rev()
            .find(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
    }

    pub fn last_info(&self) -> Option<String> {
        self.last_with(Severity::Info)
    }

    pub fn last_warning(&self) -> Option<String> {
        self.last_with(Severity::Warning)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_with(Severity::Error)
    }

    pub fn render_count(&self) -> usize {
        lock(&self.renders).len()
    }

    /// The most recent render of `thread`.
    pub fn last_render(&self, thread: ThreadId) -> Option<ThreadSnapshot> {
        lock(&self.renders)
            .iter()
            .rev()
            .find(|s| s.id == thread)
            .cloned()
    }

    pub fn disposed_threads(&self) -> Vec<ThreadId> {
        lock(&self.disposed).clone()
    }
}

impl ThreadView for RecordingUi {
    fn render(&self, thread: &ThreadSnapshot) {
        lock(&self.renders).push(thread.clone());
    }

    fn disposed(&self, thread: ThreadId) {
        lock(&self.disposed).push(thread);
    }

    fn notify(&self, severity: Severity, message: &str) {
        lock(&self.notices).push((severity, message.to_string()));
    }
}
