// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt compiler for Scribe.
//!
//! Builds the model input for a question asked on an anchored thread:
//! - **Preamble**: role-play instruction plus the anchor's code, fenced
//! - **Identity example**: a fixed two-turn exchange
//! - **History**: the last N non-note messages of the thread, by role
//! - **Question**: the new human turn
//!
//! The anchor code is re-read from the [`DocumentHost`] on every compile so
//! the prompt always reflects the current document text.

pub mod history;
pub mod preamble;
pub mod roles;

use scribe_config::model::{PromptConfig, PromptMode};
use scribe_core::error::ScribeError;
use scribe_core::traits::DocumentHost;
use scribe_core::types::{Anchor, Message};
use scribe_core::ChatMessage;
use serde::Serialize;
use tracing::debug;

pub use history::{replay, replayable_label};
pub use roles::AuthorRoles;

/// Model input produced by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "prompt", rename_all = "lowercase")]
pub enum CompiledPrompt {
    /// Role-tagged message sequence for chat completions.
    Messages(Vec<ChatMessage>),
    /// Single flattened string (legacy mode).
    Text(String),
}

impl CompiledPrompt {
    /// Messages to send on the chat endpoint. A legacy string becomes one
    /// user message.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            CompiledPrompt::Messages(messages) => messages,
            CompiledPrompt::Text(text) => vec![ChatMessage::user(text)],
        }
    }
}

/// Compiles anchored threads into model input.
#[derive(Debug, Clone)]
pub struct PromptCompiler {
    window: usize,
    mode: PromptMode,
}

impl PromptCompiler {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            window: config.history_window,
            mode: config.mode,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn mode(&self) -> PromptMode {
        self.mode
    }

    /// Compile in the configured mode.
    pub async fn compile(
        &self,
        docs: &dyn DocumentHost,
        anchor: &Anchor,
        history: &[Message],
        question: &str,
    ) -> Result<CompiledPrompt, ScribeError> {
        match self.mode {
            PromptMode::Chat => self
                .compile_chat(docs, anchor, history, question)
                .await
                .map(CompiledPrompt::Messages),
            PromptMode::Legacy => compile_legacy(docs, anchor, question)
                .await
                .map(CompiledPrompt::Text),
        }
    }

    /// `[system(preamble + code), identity example, history..., user(question)]`.
    ///
    /// `history` is the thread's messages in order, excluding the question
    /// itself. An empty slice is a first question.
    pub async fn compile_chat(
        &self,
        docs: &dyn DocumentHost,
        anchor: &Anchor,
        history: &[Message],
        question: &str,
    ) -> Result<Vec<ChatMessage>, ScribeError> {
        let code = anchor_code(docs, anchor).await?;
        let replayed = replay(history, self.window);
        debug!(
            anchor = %anchor,
            history = history.len(),
            replayed = replayed.len(),
            "compiled chat prompt"
        );

        let mut messages = Vec::with_capacity(replayed.len() + 4);
        messages.push(preamble::system_message(&code));
        messages.extend(preamble::identity_example());
        messages.extend(replayed);
        messages.push(ChatMessage::user(question));
        Ok(messages)
    }
}

/// Legacy single-string prompt. History is not included.
pub async fn compile_legacy(
    docs: &dyn DocumentHost,
    anchor: &Anchor,
    question: &str,
) -> Result<String, ScribeError> {
    let code = anchor_code(docs, anchor).await?;
    Ok(format!(
        "{}{}Human: {question}\n\nAI: ",
        preamble::legacy_header(&code),
        preamble::LEGACY_EXAMPLE
    ))
}

/// Ask-and-edit prompt: `[system(instruction), user(request), system(code)]`.
pub async fn compile_edit(
    docs: &dyn DocumentHost,
    anchor: &Anchor,
    instruction: &str,
) -> Result<Vec<ChatMessage>, ScribeError> {
    let code = anchor_code(docs, anchor).await?;
    Ok(vec![
        ChatMessage::system(preamble::EDIT_INSTRUCTION),
        ChatMessage::user(instruction.trim()),
        ChatMessage::system(code),
    ])
}

/// Current text of the anchor range, trimmed.
pub async fn anchor_code(docs: &dyn DocumentHost, anchor: &Anchor) -> Result<String, ScribeError> {
    docs.read_range(&anchor.document, anchor.range)
        .await
        .map(|text| text.trim().to_string())
        .map_err(|e| match e {
            ScribeError::DocumentUnavailable { .. } => e,
            other => ScribeError::DocumentUnavailable {
                document: anchor.document.clone(),
                message: other.to_string(),
            },
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use scribe_core::types::{
        Author, CommentMode, DocumentId, MessageId, MessageRole, NOTE_LABEL, TextRange, ThreadId,
    };
    use scribe_core::ChatRole;

    use super::*;

    /// In-memory documents keyed by id, one string per line.
    #[derive(Default)]
    struct Docs {
        files: Mutex<HashMap<DocumentId, Vec<String>>>,
    }

    impl Docs {
        fn with(id: &str, text: &str) -> Self {
            let docs = Self::default();
            docs.put(id, text);
            docs
        }

        fn put(&self, id: &str, text: &str) {
            self.files.lock().unwrap().insert(
                DocumentId(id.into()),
                text.split('\n').map(str::to_string).collect(),
            );
        }
    }

    #[async_trait]
    impl DocumentHost for Docs {
        async fn read_range(&self, doc: &DocumentId, range: TextRange) -> Result<String, ScribeError> {
            let files = self.files.lock().unwrap();
            let lines = files.get(doc).ok_or_else(|| ScribeError::DocumentUnavailable {
                document: doc.clone(),
                message: "closed".into(),
            })?;
            let first = range.start.line as usize;
            let last = (range.end.line as usize).min(lines.len());
            Ok(lines[first.min(last)..last].join("\n"))
        }

        async fn replace_range(&self, _: &DocumentId, _: TextRange, _: &str) -> Result<(), ScribeError> {
            Ok(())
        }

        async fn line_count(&self, doc: &DocumentId) -> Result<u32, ScribeError> {
            Ok(self.files.lock().unwrap().get(doc).map_or(0, |l| l.len() as u32))
        }
    }

    fn anchor(first: u32, last: u32) -> Anchor {
        Anchor::new(DocumentId("a.rs".into()), TextRange::lines(first, last))
    }

    fn message(id: u64, role: MessageRole, body: &str, label: Option<&str>) -> Message {
        Message {
            id: MessageId(id),
            thread: ThreadId(1),
            body: body.into(),
            saved_body: body.into(),
            mode: CommentMode::Viewing,
            author: Author::new("x"),
            role,
            label: label.map(str::to_string),
            deletable: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn compiler(window: usize) -> PromptCompiler {
        PromptCompiler::new(&PromptConfig {
            history_window: window,
            mode: PromptMode::Chat,
        })
    }

    #[tokio::test]
    async fn first_question_has_preamble_example_and_question() {
        let docs = Docs::with("a.rs", "fn add(a:i32,b:i32)->i32{a+b}\n");
        let out = compiler(8)
            .compile_chat(&docs, &anchor(0, 0), &[], "What does this do?")
            .await
            .unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].role, ChatRole::System);
        assert!(out[0].content.contains("```\nfn add(a:i32,b:i32)->i32{a+b}\n```"));
        assert_eq!(out[1], ChatMessage::user("Who are you?"));
        assert_eq!(out[2], ChatMessage::assistant("I am an intelligent and helpful AI chatbot."));
        assert_eq!(out[3], ChatMessage::user("What does this do?"));
    }

    #[tokio::test]
    async fn long_history_is_windowed_and_notes_skipped() {
        let docs = Docs::with("a.rs", "code");
        let mut history: Vec<Message> = (1..=10)
            .map(|i| {
                let role = if i % 2 == 1 { MessageRole::Human } else { MessageRole::Assistant };
                message(i, role, &format!("m{i}"), None)
            })
            .collect();
        history.insert(4, message(99, MessageRole::Human, "remember me", Some(NOTE_LABEL)));

        let out = compiler(8)
            .compile_chat(&docs, &anchor(0, 0), &history, "next")
            .await
            .unwrap();

        // system + 2 example + 8 history + question
        assert_eq!(out.len(), 12);
        assert_eq!(out[3], ChatMessage::user("m3"));
        assert_eq!(out[10], ChatMessage::assistant("m10"));
        assert!(out.iter().all(|m| m.content != "remember me"));
    }

    #[tokio::test]
    async fn empty_range_gives_empty_fence() {
        let docs = Docs::with("a.rs", "line");
        let empty = Anchor::new(DocumentId("a.rs".into()), TextRange::new(0, 0, 0, 0));
        let out = compiler(8).compile_chat(&docs, &empty, &[], "q").await.unwrap();
        assert!(out[0].content.ends_with("```\n\n```"));
    }

    #[tokio::test]
    async fn each_compile_rereads_the_document() {
        let docs = Docs::with("a.rs", "old body");
        let c = compiler(8);
        let first = c.compile_chat(&docs, &anchor(0, 0), &[], "q").await.unwrap();
        docs.put("a.rs", "new body");
        let second = c.compile_chat(&docs, &anchor(0, 0), &[], "q").await.unwrap();

        assert!(first[0].content.contains("old body"));
        assert!(second[0].content.contains("new body"));
    }

    #[tokio::test]
    async fn closed_document_is_unavailable() {
        let docs = Docs::default();
        let err = compiler(8)
            .compile_chat(&docs, &anchor(0, 0), &[], "q")
            .await
            .unwrap_err();
        assert!(matches!(err, ScribeError::DocumentUnavailable { .. }));
    }

    #[tokio::test]
    async fn legacy_prompt_is_flattened_and_ignores_history() {
        let docs = Docs::with("a.rs", "  x = 1  ");
        let c = PromptCompiler::new(&PromptConfig {
            history_window: 8,
            mode: PromptMode::Legacy,
        });
        let history = vec![message(1, MessageRole::Human, "earlier", None)];
        let prompt = c.compile(&docs, &anchor(0, 0), &history, "why?").await.unwrap();

        let CompiledPrompt::Text(text) = &prompt else {
            panic!("expected text prompt");
        };
        assert!(text.starts_with(preamble::ROLE_PLAY));
        assert!(text.contains("\n```\nx = 1\n```\n\n\nHuman: Who are you?"));
        assert!(text.ends_with("Human: why?\n\nAI: "));
        assert!(!text.contains("earlier"));

        let messages = prompt.into_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
    }

    #[tokio::test]
    async fn edit_prompt_orders_instruction_request_code() {
        let docs = Docs::with("a.rs", "let v = vec![];");
        let out = compile_edit(&docs, &anchor(0, 0), "  make it mutable \n").await.unwrap();
        assert_eq!(
            out,
            vec![
                ChatMessage::system(preamble::EDIT_INSTRUCTION),
                ChatMessage::user("make it mutable"),
                ChatMessage::system("let v = vec![];"),
            ]
        );
    }

    #[test]
    fn compiled_prompt_serializes_with_kind_tag() {
        let json = serde_json::to_string(&CompiledPrompt::Text("hi".into())).unwrap();
        assert_eq!(json, r#"{"kind":"text","prompt":"hi"}"#);
    }
}
