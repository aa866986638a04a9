// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation store for Scribe.
//!
//! Holds every thread and its ordered messages in memory. Threads are keyed
//! by [`ThreadId`](scribe_core::ThreadId) and indexed by their anchor; a
//! thread exists only while it has at least one message.

pub mod store;

pub use store::{ConversationStore, DeleteOutcome, NewMessage};
