// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Scribe.
//!
//! This crate provides the error type, shared domain types and the
//! collaborator traits (completion backend, documents, configuration,
//! thread view) used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ScribeError;
pub use types::{
    Anchor, ChatMessage, ChatRole, CompletionOptions, CompletionRequest, ConfigKey, Credentials, DocumentId,
    MessageId, TextRange, ThreadId,
};

pub use traits::{ClientFactory, CompletionClient, ConfigStore, CredentialPrompter, DocumentHost, ThreadView};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::{Message, MessageRole, NOTE_LABEL};

    #[test]
    fn configuration_missing_names_fields_in_order() {
        let err = ScribeError::ConfigurationMissing {
            fields: vec![ConfigKey::ApiKey, ConfigKey::DeploymentName],
        };
        assert_eq!(
            err.to_string(),
            "the following configuration item(s) are not set: API Key, Deployment Name"
        );
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        assert_eq!(ChatRole::from_str("system").unwrap(), ChatRole::System);
        assert_eq!(ChatRole::User.to_string(), "user");
    }

    #[test]
    fn config_key_round_trips_through_strum() {
        for key in ConfigKey::ALL {
            let parsed = ConfigKey::from_str(&key.to_string()).expect("should parse back");
            assert_eq!(parsed, key);
        }
        assert_eq!(ConfigKey::DeploymentName.to_string(), "deployment_name");
    }

    #[test]
    fn default_completion_options() {
        let opts = CompletionOptions::default();
        assert_eq!(opts.temperature, 0.0);
        assert_eq!(opts.max_tokens, 500);
        assert_eq!(opts.top_p, 1.0);
        assert_eq!(opts.frequency_penalty, 1.0);
        assert_eq!(opts.presence_penalty, 1.0);
    }

    #[test]
    fn range_emptiness() {
        assert!(TextRange::new(3, 4, 3, 4).is_empty());
        assert!(!TextRange::lines(0, 0).is_empty());
        assert_eq!(TextRange::lines(2, 4), TextRange::new(2, 0, 5, 0));
    }

    #[test]
    fn byte_span_of_whole_lines() {
        let text = "fn a() {}\nfn b() {}\nfn c() {}\n";
        assert_eq!(&text[TextRange::lines(1, 1).byte_span(text)], "fn b() {}\n");
        assert_eq!(&text[TextRange::lines(2, 2).byte_span(text)], "fn c() {}\n");
        assert_eq!(&text[TextRange::lines(1, 9).byte_span(text)], "fn b() {}\nfn c() {}\n");
    }

    #[test]
    fn byte_offset_counts_chars_and_clamps() {
        let text = "héllo\r\nworld";
        assert_eq!(types::Position::new(0, 2).byte_offset(text), 3);
        assert_eq!(types::Position::new(0, 99).byte_offset(text), "héllo".len());
        assert_eq!(types::Position::new(1, 1).byte_offset(text), "héllo\r\nw".len());
        assert_eq!(types::Position::new(7, 0).byte_offset(text), text.len());
    }

    #[test]
    fn inverted_range_is_empty_span() {
        let text = "abc\ndef";
        let span = TextRange::new(1, 0, 0, 0).byte_span(text);
        assert!(span.is_empty());
    }

    #[test]
    fn note_label_detection() {
        let msg = Message {
            id: MessageId(1),
            thread: ThreadId(1),
            body: "remember this".into(),
            saved_body: "remember this".into(),
            mode: types::CommentMode::Viewing,
            author: types::Author::new("VS Code"),
            role: MessageRole::Human,
            label: Some(NOTE_LABEL.into()),
            deletable: false,
            created_at: chrono::Utc::now(),
        };
        assert!(msg.is_note());
    }
}
