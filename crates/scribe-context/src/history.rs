// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replay of stored thread messages as role-tagged chat turns.
//!
//! Notes are filtered out first, then only the most recent `window`
//! messages are kept (oldest first), then each is mapped by its stored
//! role. Annotations are dropped at the mapping step, after windowing, so
//! they still occupy a window slot.

use scribe_core::types::{Message, MessageRole, NOTE_LABEL};
use scribe_core::ChatMessage;

/// Whether a message with this label may be replayed to the model.
pub fn replayable_label(label: Option<&str>) -> bool {
    label != Some(NOTE_LABEL)
}

/// Windowed replay of `messages` (thread order, oldest first).
pub fn replay(messages: &[Message], window: usize) -> Vec<ChatMessage> {
    let filtered: Vec<&Message> = messages
        .iter()
        .filter(|m| replayable_label(m.label.as_deref()))
        .collect();

    let start = filtered.len().saturating_sub(window);
    filtered[start..]
        .iter()
        .filter_map(|m| match m.role {
            MessageRole::Human => Some(ChatMessage::user(m.body.clone())),
            MessageRole::Assistant => Some(ChatMessage::assistant(m.body.clone())),
            MessageRole::Annotation => None,
        })
        .collect()
}
