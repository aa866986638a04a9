// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread and message bookkeeping.
//!
//! Messages move through `Viewing -> Editing -> Viewing`; `commit` keeps the
//! edited body, `cancel` restores the last committed one. Any other
//! transition is ignored and reported as `false`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use scribe_core::types::{
    Anchor, Author, CommentMode, Message, MessageId, MessageRole, NOTE_LABEL, ThreadId,
    ThreadSnapshot,
};
use tracing::debug;

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> MessageId {
    MessageId(NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed))
}

fn next_thread_id() -> ThreadId {
    ThreadId(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed))
}

/// A message about to be appended. The store assigns id, thread and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub body: String,
    pub author: Author,
    pub role: MessageRole,
    pub label: Option<String>,
}

impl NewMessage {
    pub fn new(author: Author, role: MessageRole, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            author,
            role,
            label: None,
        }
    }

    /// A plain annotation by the user. Kept out of every prompt.
    pub fn note(author: Author, body: impl Into<String>) -> Self {
        Self::new(author, MessageRole::Human, body).with_label(NOTE_LABEL)
    }

    pub fn human(author: Author, body: impl Into<String>) -> Self {
        Self::new(author, MessageRole::Human, body)
    }

    pub fn assistant(author: Author, body: impl Into<String>) -> Self {
        Self::new(author, MessageRole::Assistant, body)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// What a single-message delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub thread: ThreadId,
    /// The message was the last one, so the thread is gone too.
    pub thread_destroyed: bool,
}

/// In-memory store of every thread.
///
/// Not internally synchronized: callers own it behind whatever lock their
/// execution model needs and never hold it across a suspension point.
#[derive(Debug, Default)]
pub struct ConversationStore {
    threads: BTreeMap<ThreadId, ThreadSnapshot>,
    by_anchor: HashMap<Anchor, ThreadId>,
    /// Message -> owning thread. Relation only; the thread owns the message.
    owners: HashMap<MessageId, ThreadId>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live thread anchored at `anchor`, if any.
    pub fn thread_for(&self, anchor: &Anchor) -> Option<ThreadId> {
        self.by_anchor.get(anchor).copied()
    }

    pub fn thread(&self, id: ThreadId) -> Option<&ThreadSnapshot> {
        self.threads.get(&id)
    }

    /// Owned copy for rendering.
    pub fn snapshot(&self, id: ThreadId) -> Option<ThreadSnapshot> {
        self.threads.get(&id).cloned()
    }

    pub fn thread_ids(&self) -> Vec<ThreadId> {
        self.threads.keys().copied().collect()
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        let thread = self.owners.get(&id)?;
        self.threads
            .get(thread)?
            .messages
            .iter()
            .find(|m| m.id == id)
    }

    /// The thread owning `id`, if both still exist.
    pub fn owner_of(&self, id: MessageId) -> Option<ThreadId> {
        self.owners.get(&id).copied()
    }

    /// Appends to the thread at `anchor`, creating the thread on first use.
    pub fn append(&mut self, anchor: &Anchor, new: NewMessage) -> (ThreadId, MessageId) {
        let thread_id = match self.by_anchor.get(anchor) {
            Some(id) => *id,
            None => {
                let id = next_thread_id();
                self.threads.insert(
                    id,
                    ThreadSnapshot {
                        id,
                        anchor: anchor.clone(),
                        messages: Vec::new(),
                    },
                );
                self.by_anchor.insert(anchor.clone(), id);
                debug!(thread_id = %id, anchor = %anchor, "thread created");
                id
            }
        };

        let message_id = self.push(thread_id, new);
        (thread_id, message_id)
    }

    /// Appends to an existing thread. Returns `None` if the thread is gone.
    pub fn append_to(&mut self, thread: ThreadId, new: NewMessage) -> Option<MessageId> {
        if !self.threads.contains_key(&thread) {
            return None;
        }
        Some(self.push(thread, new))
    }

    fn push(&mut self, thread_id: ThreadId, new: NewMessage) -> MessageId {
        let id = next_message_id();
        let Some(thread) = self.threads.get_mut(&thread_id) else {
            return id;
        };
        let deletable = !thread.messages.is_empty();
        thread.messages.push(Message {
            id,
            thread: thread_id,
            saved_body: new.body.clone(),
            body: new.body,
            mode: CommentMode::Viewing,
            author: new.author,
            role: new.role,
            label: new.label,
            deletable,
            created_at: chrono::Utc::now(),
        });
        self.owners.insert(id, thread_id);
        debug!(thread_id = %thread_id, message_id = %id, "message appended");
        id
    }

    /// Messages of `thread` whose label satisfies `predicate`, in thread order.
    pub fn filter_by_label<F>(&self, thread: ThreadId, predicate: F) -> Vec<&Message>
    where
        F: Fn(Option<&str>) -> bool,
    {
        self.threads
            .get(&thread)
            .map(|t| {
                t.messages
                    .iter()
                    .filter(|m| predicate(m.label.as_deref()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        let thread = self.owners.get(&id)?;
        self.threads
            .get_mut(thread)?
            .messages
            .iter_mut()
            .find(|m| m.id == id)
    }

    /// `Viewing -> Editing`.
    pub fn begin_edit(&mut self, id: MessageId) -> bool {
        match self.message_mut(id) {
            Some(msg) if msg.mode == CommentMode::Viewing => {
                msg.mode = CommentMode::Editing;
                true
            }
            _ => false,
        }
    }

    /// Replaces the displayed body of a message being edited.
    pub fn set_body(&mut self, id: MessageId, body: impl Into<String>) -> bool {
        match self.message_mut(id) {
            Some(msg) if msg.mode == CommentMode::Editing => {
                msg.body = body.into();
                true
            }
            _ => false,
        }
    }

    /// `Editing -> Viewing`, keeping the edited body.
    pub fn commit(&mut self, id: MessageId) -> bool {
        match self.message_mut(id) {
            Some(msg) if msg.mode == CommentMode::Editing => {
                msg.saved_body = msg.body.clone();
                msg.mode = CommentMode::Viewing;
                true
            }
            _ => false,
        }
    }

    /// `Editing -> Viewing`, restoring the last committed body.
    pub fn cancel(&mut self, id: MessageId) -> bool {
        match self.message_mut(id) {
            Some(msg) if msg.mode == CommentMode::Editing => {
                msg.body = msg.saved_body.clone();
                msg.mode = CommentMode::Viewing;
                true
            }
            _ => false,
        }
    }

    /// Removes one message, destroying its thread if it was the last.
    pub fn delete(&mut self, id: MessageId) -> Option<DeleteOutcome> {
        let thread_id = self.owners.remove(&id)?;
        let thread = self.threads.get_mut(&thread_id)?;
        thread.messages.retain(|m| m.id != id);

        let thread_destroyed = thread.messages.is_empty();
        if thread_destroyed {
            self.remove_thread(thread_id);
        }
        debug!(thread_id = %thread_id, message_id = %id, thread_destroyed, "message deleted");
        Some(DeleteOutcome {
            thread: thread_id,
            thread_destroyed,
        })
    }

    /// Destroys a thread and all its messages. Returns `false` if it did not exist.
    pub fn delete_thread(&mut self, id: ThreadId) -> bool {
        let existed = self.remove_thread(id);
        if existed {
            debug!(thread_id = %id, "thread deleted");
        }
        existed
    }

    /// Destroys every thread, returning the ids that were live.
    pub fn dispose(&mut self) -> Vec<ThreadId> {
        let ids = self.thread_ids();
        self.threads.clear();
        self.by_anchor.clear();
        self.owners.clear();
        ids
    }

    fn remove_thread(&mut self, id: ThreadId) -> bool {
        let Some(thread) = self.threads.remove(&id) else {
            return false;
        };
        self.by_anchor.remove(&thread.anchor);
        for msg in &thread.messages {
            self.owners.remove(&msg.id);
        }
        true
    }
}
