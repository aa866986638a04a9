// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the collaborator traits and the Scribe crates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Label marking a message as a plain annotation that is never sent to the model.
pub const NOTE_LABEL: &str = "NOTE";

/// Identifies a document known to the host editor (a path or URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a conversation thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadId(pub u64);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Unique identifier for a message. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A zero-based (line, character) position in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Byte offset of this position in `text`, clamped to the text.
    ///
    /// `character` counts chars, not bytes. A line past the end maps to the
    /// end of the text, and a character past the end of its line maps to the
    /// end of that line.
    pub fn byte_offset(&self, text: &str) -> usize {
        let mut offset = 0;
        for (index, line) in text.split_inclusive('\n').enumerate() {
            if index == self.line as usize {
                let content = line.strip_suffix('\n').unwrap_or(line);
                let content = content.strip_suffix('\r').unwrap_or(content);
                let column = content
                    .char_indices()
                    .nth(self.character as usize)
                    .map_or(content.len(), |(byte, _)| byte);
                return offset + column;
            }
            offset += line.len();
        }
        text.len()
    }
}

/// A half-open span of document text between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Whole lines `first..=last`, ending at the start of the line after `last`.
    pub fn lines(first: u32, last: u32) -> Self {
        Self::new(first, 0, last + 1, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Byte range this span covers in `text`.
    pub fn byte_span(&self, text: &str) -> std::ops::Range<usize> {
        let start = self.start.byte_offset(text);
        let end = self.end.byte_offset(text).max(start);
        start..end
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.character, self.end.line, self.end.character
        )
    }
}

/// The code range a thread is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Anchor {
    pub document: DocumentId,
    pub range: TextRange,
}

impl Anchor {
    pub fn new(document: DocumentId, range: TextRange) -> Self {
        Self { document, range }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.document, self.range)
    }
}

// --- Completion wire types ---

/// Role tag of a message sent to the completion API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: 500,
            top_p: 1.0,
            frequency_penalty: 1.0,
            presence_penalty: 1.0,
        }
    }
}

/// A request to the completion client.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Deployment (model) identifier.
    pub deployment: String,
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

// --- Configuration surface ---

/// The three credential items held in user configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    ApiKey,
    Endpoint,
    DeploymentName,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::ApiKey,
        ConfigKey::Endpoint,
        ConfigKey::DeploymentName,
    ];

    /// Name shown to users in warnings and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ConfigKey::ApiKey => "API Key",
            ConfigKey::Endpoint => "Endpoint",
            ConfigKey::DeploymentName => "Deployment Name",
        }
    }
}

/// Everything an interactive prompt needs to ask for one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub title: String,
    pub placeholder: String,
    pub prompt: String,
    /// Input should not be echoed.
    pub secret: bool,
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

// --- Conversation types ---

/// Whether a message is being edited or displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum CommentMode {
    Viewing,
    Editing,
}

/// Conversation role fixed when a message is created.
///
/// Only `Human` and `Assistant` messages are replayed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum MessageRole {
    Human,
    Assistant,
    Annotation,
}

/// Who wrote a message, as displayed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Cosmetic icon reference (URL or theme icon id).
    pub icon: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// One turn in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Owning thread, by id only.
    pub thread: ThreadId,
    /// Currently displayed markdown text.
    pub body: String,
    /// Last committed text, restored on cancel.
    pub saved_body: String,
    pub mode: CommentMode,
    pub author: Author,
    pub role: MessageRole,
    pub label: Option<String>,
    /// Whether the host should offer a delete action for this message.
    pub deletable: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn is_note(&self) -> bool {
        self.label.as_deref() == Some(NOTE_LABEL)
    }
}

/// An owned copy of a thread, handed to the view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSnapshot {
    pub id: ThreadId,
    pub anchor: Anchor,
    pub messages: Vec<Message>,
}

/// A complete, non-empty set of credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: secrecy::SecretString,
    pub endpoint: String,
    pub deployment: String,
}
