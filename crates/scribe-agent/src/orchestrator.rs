// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command orchestrator.
//!
//! Binds user intents (note, ask, ask-and-edit, docstring, lifecycle
//! actions) to conversation store mutations and model calls. Every command
//! reports its own failure through the [`ThreadView`] and also returns it.
//!
//! The store lock is never held across a suspension point. Model calls on
//! one anchor are mutually exclusive when `serialize_asks` is set, so
//! responses land in question order.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use scribe_config::ScribeConfig;
use scribe_context::{AuthorRoles, PromptCompiler, compile_edit, replayable_label};
use scribe_core::error::ScribeError;
use scribe_core::traits::{
    ClientFactory, ConfigStore, CredentialPrompter, DocumentHost, ThreadView,
};
use scribe_core::types::{
    Anchor, Author, CompletionOptions, DocumentId, Message, MessageId, MessageRole, Severity,
    TextRange, ThreadId, ThreadSnapshot,
};
use scribe_store::{ConversationStore, NewMessage};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::credentials::CredentialResolver;
use crate::session::CompletionSession;

/// Appended in place of an empty model response.
pub const FALLBACK_NOTICE: &str = "Azure Scribe AI: An error occurred. Please try again...";

/// Question substituted by the docstring command.
pub const DOCSTRING_INSTRUCTION: &str =
    "Write a docstring for the above code and use syntax of the coding language to format it.";

/// Composer prompt shown on an empty thread.
pub const COMPOSER_PROMPT: &str = "Ask Azure Scribe AI...";

/// Composer placeholder text.
pub const COMPOSER_PLACEHOLDER: &str =
    "Ask me anything! Example: \"Explain the above code in plain English\"";

pub const HUMAN_ICON: &str = "https://img.icons8.com/fluency/96/null/user-male-circle.png";
pub const ASSISTANT_ICON: &str = "https://img.icons8.com/fluency/96/null/chatbot.png";

/// Where a reply goes: an existing thread, or a range that may not have one yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    Thread(ThreadId),
    Range(Anchor),
}

/// Text submitted from a thread's composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub target: ThreadRef,
    pub text: String,
}

impl Reply {
    pub fn new(target: ThreadRef, text: impl Into<String>) -> Self {
        Self {
            target,
            text: text.into(),
        }
    }

    pub fn on_range(anchor: Anchor, text: impl Into<String>) -> Self {
        Self::new(ThreadRef::Range(anchor), text)
    }

    pub fn on_thread(thread: ThreadId, text: impl Into<String>) -> Self {
        Self::new(ThreadRef::Thread(thread), text)
    }
}

/// Host-side collaborators the orchestrator is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub documents: Arc<dyn DocumentHost>,
    pub view: Arc<dyn ThreadView>,
    pub config_store: Arc<dyn ConfigStore>,
    pub prompter: Arc<dyn CredentialPrompter>,
    pub clients: Arc<dyn ClientFactory>,
}

pub struct CommandOrchestrator {
    documents: Arc<dyn DocumentHost>,
    view: Arc<dyn ThreadView>,
    clients: Arc<dyn ClientFactory>,
    resolver: CredentialResolver,
    compiler: PromptCompiler,
    options: CompletionOptions,
    human: Author,
    assistant: Author,
    roles: AuthorRoles,
    serialize_asks: bool,
    store: Mutex<ConversationStore>,
    session: Mutex<Option<CompletionSession>>,
    /// One lock per anchor; held for the whole of a model command.
    in_flight: Mutex<HashMap<Anchor, Arc<Mutex<()>>>>,
    disposed: AtomicBool,
}

impl CommandOrchestrator {
    pub fn new(config: &ScribeConfig, collaborators: Collaborators) -> Self {
        let resolver = CredentialResolver::new(
            collaborators.config_store,
            collaborators.prompter,
            collaborators.view.clone(),
        );
        Self {
            documents: collaborators.documents,
            view: collaborators.view,
            clients: collaborators.clients,
            resolver,
            compiler: PromptCompiler::new(&config.prompt),
            options: config.completion.options(),
            human: Author::new(config.agent.human_name.clone()).with_icon(HUMAN_ICON),
            assistant: Author::new(config.agent.assistant_name.clone()).with_icon(ASSISTANT_ICON),
            roles: AuthorRoles::from_config(&config.agent),
            serialize_asks: config.orchestrator.serialize_asks,
            store: Mutex::new(ConversationStore::new()),
            session: Mutex::new(None),
            in_flight: Mutex::new(HashMap::new()),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn compiler(&self) -> &PromptCompiler {
        &self.compiler
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    // --- Session ---

    /// Ensures a verified session exists, connecting if needed.
    pub async fn connect(&self) -> Result<(), ScribeError> {
        let result = self.connect_inner().await;
        self.report(result)
    }

    async fn connect_inner(&self) -> Result<(), ScribeError> {
        self.ensure_live()?;
        self.session().await.map(|_| ())
    }

    /// Drops the current session and connects again with freshly resolved
    /// credentials.
    pub async fn reconnect(&self) -> Result<(), ScribeError> {
        self.session.lock().await.take();
        info!("session cleared, reconnecting");
        self.connect().await
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn session(&self) -> Result<CompletionSession, ScribeError> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }
        let session = self
            .resolver
            .connect(self.clients.as_ref(), self.options)
            .await?;
        *slot = Some(session.clone());
        Ok(session)
    }

    // --- Reads ---

    /// The ranges in `document` that accept new threads: all of it.
    pub async fn commenting_ranges(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<TextRange>, ScribeError> {
        let lines = self.documents.line_count(document).await?;
        Ok(vec![TextRange::new(0, 0, lines.saturating_sub(1), 0)])
    }

    pub async fn thread_for(&self, anchor: &Anchor) -> Option<ThreadId> {
        self.store.lock().await.thread_for(anchor)
    }

    pub async fn snapshot(&self, thread: ThreadId) -> Option<ThreadSnapshot> {
        self.store.lock().await.snapshot(thread)
    }

    pub async fn threads(&self) -> Vec<ThreadSnapshot> {
        let store = self.store.lock().await;
        store
            .thread_ids()
            .into_iter()
            .filter_map(|id| store.snapshot(id))
            .collect()
    }

    pub async fn message(&self, id: MessageId) -> Option<Message> {
        self.store.lock().await.message(id).cloned()
    }

    /// Anchors currently holding a turn lock.
    pub async fn turn_lock_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    // --- Notes ---

    /// Appends `text` as a NOTE. No model call.
    pub async fn reply_note(&self, reply: Reply) -> Result<MessageId, ScribeError> {
        let result = self.reply_note_inner(reply).await;
        self.report(result)
    }

    async fn reply_note_inner(&self, reply: Reply) -> Result<MessageId, ScribeError> {
        self.ensure_live()?;
        let note = NewMessage::note(self.human.clone(), reply.text);
        let (thread, id) = self.append(&reply.target, note).await?;
        debug!(thread_id = %thread, message_id = %id, "note added");
        Ok(id)
    }

    /// Appends a message written elsewhere, for example a comment the host
    /// restored from disk. Its role comes from `author` once, here: the
    /// configured human and assistant names replay into prompts, any other
    /// author is kept as an annotation.
    pub async fn import_message(
        &self,
        target: ThreadRef,
        author: &str,
        body: &str,
    ) -> Result<MessageId, ScribeError> {
        let result = self.import_message_inner(target, author, body).await;
        self.report(result)
    }

    async fn import_message_inner(
        &self,
        target: ThreadRef,
        author: &str,
        body: &str,
    ) -> Result<MessageId, ScribeError> {
        self.ensure_live()?;
        let role = self.roles.classify(author);
        let author = match role {
            MessageRole::Human => self.human.clone(),
            MessageRole::Assistant => self.assistant.clone(),
            MessageRole::Annotation => Author::new(author),
        };
        let (thread, id) = self
            .append(&target, NewMessage::new(author, role, body))
            .await?;
        debug!(thread_id = %thread, message_id = %id, ?role, "message imported");
        Ok(id)
    }

    // --- Model commands ---

    /// Asks the model about the anchored code.
    ///
    /// The prompt is compiled from the thread as it stands, then the
    /// question is appended, then the model is called. Returns the id of
    /// the appended assistant message. On failure the question stays and no
    /// assistant message is added; an empty response is replaced by
    /// [`FALLBACK_NOTICE`].
    pub async fn ask(
        &self,
        reply: Reply,
        cancel: &CancellationToken,
    ) -> Result<MessageId, ScribeError> {
        let question = reply.text.trim().to_string();
        let result = self.ask_inner(reply.target, &question, cancel).await;
        self.prune_turn_locks().await;
        self.report(result)
    }

    /// [`ask`](Self::ask) with the question replaced by a docstring request.
    pub async fn generate_docstring(
        &self,
        target: ThreadRef,
        cancel: &CancellationToken,
    ) -> Result<MessageId, ScribeError> {
        let result = self.ask_inner(target, DOCSTRING_INSTRUCTION, cancel).await;
        self.prune_turn_locks().await;
        self.report(result)
    }

    async fn ask_inner(
        &self,
        target: ThreadRef,
        question: &str,
        cancel: &CancellationToken,
    ) -> Result<MessageId, ScribeError> {
        self.ensure_live()?;
        let anchor = self.anchor_of(&target).await?;
        let _turn = self.acquire_turn(&anchor, cancel).await?;

        let history = self.history(&anchor).await;
        let prompt = self
            .compiler
            .compile(self.documents.as_ref(), &anchor, &history, question)
            .await?;

        let (thread, question_id) = self
            .append(
                &ThreadRef::Range(anchor.clone()),
                NewMessage::human(self.human.clone(), question),
            )
            .await?;
        debug!(thread_id = %thread, message_id = %question_id, "question appended");

        let session = self.session().await?;
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(thread_id = %thread, "ask cancelled");
                return Err(ScribeError::Cancelled);
            }
            response = session.complete(prompt.into_messages()) => response?,
        };

        let body = match response.trim() {
            "" => {
                warn!(thread_id = %thread, "empty completion, appending fallback notice");
                FALLBACK_NOTICE
            }
            text => text,
        };

        let answer = NewMessage::assistant(self.assistant.clone(), body);
        let (_, answer_id) = self.append(&ThreadRef::Thread(thread), answer).await?;
        debug!(thread_id = %thread, message_id = %answer_id, "answer appended");
        Ok(answer_id)
    }

    /// Asks for a code-only rewrite of the anchor range and writes it into
    /// the document. Nothing is added to the conversation.
    pub async fn ai_edit(&self, reply: Reply, cancel: &CancellationToken) -> Result<(), ScribeError> {
        let result = self.ai_edit_inner(reply, cancel).await;
        self.prune_turn_locks().await;
        self.report(result)
    }

    async fn ai_edit_inner(&self, reply: Reply, cancel: &CancellationToken) -> Result<(), ScribeError> {
        self.ensure_live()?;
        let anchor = self.anchor_of(&reply.target).await?;
        let _turn = self.acquire_turn(&anchor, cancel).await?;

        let messages = compile_edit(self.documents.as_ref(), &anchor, &reply.text).await?;
        let session = self.session().await?;
        let code = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(anchor = %anchor, "edit cancelled");
                return Err(ScribeError::Cancelled);
            }
            response = session.complete(messages) => response?,
        };

        if code.trim().is_empty() {
            return Err(ScribeError::provider(FALLBACK_NOTICE));
        }

        self.documents
            .replace_range(&anchor.document, anchor.range, &code)
            .await
            .map_err(|e| match e {
                ScribeError::DocumentUnavailable { .. } => e,
                other => ScribeError::DocumentUnavailable {
                    document: anchor.document.clone(),
                    message: other.to_string(),
                },
            })?;
        info!(anchor = %anchor, bytes = code.len(), "anchor range replaced");
        Ok(())
    }

    // --- Lifecycle ---

    /// Puts a message into Editing mode. Unknown ids are a no-op.
    pub async fn begin_edit(&self, id: MessageId) -> Result<bool, ScribeError> {
        self.transition(id, "begin_edit", |store| store.begin_edit(id)).await
    }

    /// Replaces the body of a message being edited.
    pub async fn set_body(&self, id: MessageId, text: &str) -> Result<bool, ScribeError> {
        self.transition(id, "set_body", |store| store.set_body(id, text)).await
    }

    /// Commits the edited body.
    pub async fn save_edit(&self, id: MessageId) -> Result<bool, ScribeError> {
        self.transition(id, "save_edit", |store| store.commit(id)).await
    }

    /// Discards unsaved changes.
    pub async fn cancel_edit(&self, id: MessageId) -> Result<bool, ScribeError> {
        self.transition(id, "cancel_edit", |store| store.cancel(id)).await
    }

    async fn transition<F>(&self, id: MessageId, action: &str, apply: F) -> Result<bool, ScribeError>
    where
        F: FnOnce(&mut ConversationStore) -> bool,
    {
        self.report(self.ensure_live())?;
        let snapshot = {
            let mut store = self.store.lock().await;
            let Some(thread) = store.owner_of(id) else {
                debug!(message_id = %id, action, "no owning thread, ignoring");
                return Ok(false);
            };
            if !apply(&mut store) {
                debug!(message_id = %id, action, "transition not valid in current mode");
                return Ok(false);
            }
            store.snapshot(thread)
        };
        if let Some(snapshot) = snapshot {
            self.view.render(&snapshot);
        }
        Ok(true)
    }

    /// Removes one message, destroying its thread if it was the last.
    ///
    /// A thread's first message is only removable once it is alone.
    pub async fn delete_message(&self, id: MessageId) -> Result<bool, ScribeError> {
        self.report(self.ensure_live())?;
        let (outcome, snapshot) = {
            let mut store = self.store.lock().await;
            let pinned = store.message(id).is_some_and(|m| {
                !m.deletable && store.thread(m.thread).is_some_and(|t| t.messages.len() > 1)
            });
            if pinned {
                debug!(message_id = %id, "first message of a thread with replies, not deleted");
                return Ok(false);
            }
            let Some(outcome) = store.delete(id) else {
                return Ok(false);
            };
            let snapshot = store.snapshot(outcome.thread);
            (outcome, snapshot)
        };

        if outcome.thread_destroyed {
            info!(thread_id = %outcome.thread, "last message deleted, thread destroyed");
            self.prune_turn_locks().await;
            self.view.disposed(outcome.thread);
        } else if let Some(snapshot) = snapshot {
            self.view.render(&snapshot);
        }
        Ok(true)
    }

    /// Destroys a thread and all of its messages.
    pub async fn delete_thread(&self, thread: ThreadId) -> Result<bool, ScribeError> {
        self.report(self.ensure_live())?;
        let removed = self.store.lock().await.delete_thread(thread);
        if removed {
            self.prune_turn_locks().await;
            info!(thread_id = %thread, "thread deleted");
            self.view.disposed(thread);
        }
        Ok(removed)
    }

    /// Drops every thread. Later commands fail with `ControllerDisposed`.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let threads = self.store.lock().await.dispose();
        self.in_flight.lock().await.clear();
        info!(threads = threads.len(), "controller disposed");
        for thread in threads {
            self.view.disposed(thread);
        }
    }

    // --- Helpers ---

    fn ensure_live(&self) -> Result<(), ScribeError> {
        if self.is_disposed() {
            Err(ScribeError::ControllerDisposed)
        } else {
            Ok(())
        }
    }

    async fn anchor_of(&self, target: &ThreadRef) -> Result<Anchor, ScribeError> {
        match target {
            ThreadRef::Range(anchor) => Ok(anchor.clone()),
            ThreadRef::Thread(id) => self
                .store
                .lock()
                .await
                .thread(*id)
                .map(|t| t.anchor.clone())
                .ok_or(ScribeError::ThreadNotFound(*id)),
        }
    }

    /// Replayable messages of the thread on `anchor`, oldest first.
    async fn history(&self, anchor: &Anchor) -> Vec<Message> {
        let store = self.store.lock().await;
        match store.thread_for(anchor) {
            Some(thread) => store
                .filter_by_label(thread, replayable_label)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Waits for this anchor's turn when asks are serialized.
    async fn acquire_turn(
        &self,
        anchor: &Anchor,
        cancel: &CancellationToken,
    ) -> Result<Option<OwnedMutexGuard<()>>, ScribeError> {
        if !self.serialize_asks {
            return Ok(None);
        }
        let lock = self
            .in_flight
            .lock()
            .await
            .entry(anchor.clone())
            .or_default()
            .clone();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ScribeError::Cancelled),
            guard = lock.lock_owned() => Ok(Some(guard)),
        }
    }

    /// Drops turn locks of anchors that no longer have a thread and that
    /// nobody holds or waits on.
    async fn prune_turn_locks(&self) {
        let live: Vec<Anchor> = {
            let store = self.store.lock().await;
            store
                .thread_ids()
                .into_iter()
                .filter_map(|id| store.thread(id).map(|t| t.anchor.clone()))
                .collect()
        };
        self.in_flight
            .lock()
            .await
            .retain(|anchor, lock| live.contains(anchor) || Arc::strong_count(lock) > 1);
    }

    async fn append(
        &self,
        target: &ThreadRef,
        message: NewMessage,
    ) -> Result<(ThreadId, MessageId), ScribeError> {
        let (thread, id, snapshot) = {
            let mut store = self.store.lock().await;
            let (thread, id) = match target {
                ThreadRef::Range(anchor) => store.append(anchor, message),
                ThreadRef::Thread(thread) => {
                    let id = store
                        .append_to(*thread, message)
                        .ok_or(ScribeError::ThreadNotFound(*thread))?;
                    (*thread, id)
                }
            };
            (thread, id, store.snapshot(thread))
        };
        if let Some(snapshot) = snapshot {
            self.view.render(&snapshot);
        }
        Ok((thread, id))
    }

    /// Shows a failed command's error to the user and passes it on.
    fn report<T>(&self, result: Result<T, ScribeError>) -> Result<T, ScribeError> {
        if let Err(e) = &result {
            warn!(error = %e, "command failed");
            match e {
                // The resolver has already shown these.
                ScribeError::ConfigurationMissing { .. } | ScribeError::CredentialInvalid { .. } => {}
                ScribeError::Cancelled => self.view.notify(Severity::Info, "Request cancelled."),
                ScribeError::Provider { message, .. } => self.view.notify(Severity::Error, message),
                other => self.view.notify(Severity::Error, &other.to_string()),
            }
        }
        result
    }
}
