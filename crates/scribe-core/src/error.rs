// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Scribe.

use thiserror::Error;

use crate::types::{ConfigKey, DocumentId, MessageId, ThreadId};

/// The primary error type used across collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum ScribeError {
    /// Configuration errors (invalid TOML, unreadable user config file).
    #[error("configuration error: {0}")]
    Config(String),

    /// One or more credential fields are not set.
    #[error("the following configuration item(s) are not set: {}", format_fields(fields))]
    ConfigurationMissing { fields: Vec<ConfigKey> },

    /// The verification round-trip failed; any of the three fields may be wrong.
    #[error("credential verification failed: {message}")]
    CredentialInvalid { message: String },

    /// Completion API errors (network failure, auth failure, bad deployment).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The anchor document could not be read or edited.
    #[error("document unavailable: {document}: {message}")]
    DocumentUnavailable { document: DocumentId, message: String },

    /// No thread with this id exists (it may have been destroyed).
    #[error("thread not found: {0}")]
    ThreadNotFound(ThreadId),

    /// No message with this id exists.
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// A model call is already in flight on this thread.
    #[error("a request is already pending on thread {0}")]
    ThreadBusy(ThreadId),

    /// The caller cancelled the operation before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// The comment controller was disposed; no further commands are accepted.
    #[error("controller has been disposed")]
    ControllerDisposed,

    /// Filesystem errors from host-side collaborators.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScribeError {
    /// Convenience constructor for provider errors without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        ScribeError::Provider {
            message: message.into(),
            source: None,
        }
    }
}

fn format_fields(fields: &[ConfigKey]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}
