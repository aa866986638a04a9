// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal implementations of the host collaborators.
//!
//! - [`FileDocument`]: documents are files on disk, re-read on every access
//! - [`TerminalUi`]: prints threads and notices
//! - [`TerminalPrompter`]: asks for credentials on the terminal

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use colored::Colorize;
use rustyline::DefaultEditor;
use scribe_core::error::ScribeError;
use scribe_core::traits::{CredentialPrompter, DocumentHost, ThreadView};
use scribe_core::types::{
    CommentMode, DocumentId, PromptSpec, Severity, TextRange, ThreadId, ThreadSnapshot,
};
use tracing::{debug, warn};

/// Documents backed by files. The [`DocumentId`] is the file path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDocument;

impl FileDocument {
    pub fn new() -> Self {
        Self
    }

    pub fn id_for(path: &Path) -> DocumentId {
        DocumentId(path.to_string_lossy().into_owned())
    }

    async fn read(document: &DocumentId) -> Result<String, ScribeError> {
        tokio::fs::read_to_string(&document.0)
            .await
            .map_err(|e| ScribeError::DocumentUnavailable {
                document: document.clone(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DocumentHost for FileDocument {
    async fn read_range(
        &self,
        document: &DocumentId,
        range: TextRange,
    ) -> Result<String, ScribeError> {
        let text = Self::read(document).await?;
        Ok(text[range.byte_span(&text)].to_string())
    }

    async fn replace_range(
        &self,
        document: &DocumentId,
        range: TextRange,
        replacement: &str,
    ) -> Result<(), ScribeError> {
        let mut text = Self::read(document).await?;
        let span = range.byte_span(&text);
        text.replace_range(span, replacement);

        let path = PathBuf::from(&document.0);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".scribe-tmp");
        let unavailable = |e: std::io::Error| ScribeError::DocumentUnavailable {
            document: document.clone(),
            message: e.to_string(),
        };
        tokio::fs::write(&tmp, &text).await.map_err(unavailable)?;
        tokio::fs::rename(&tmp, &path).await.map_err(unavailable)?;
        debug!(document = %document, range = %range, "document range replaced");
        Ok(())
    }

    async fn line_count(&self, document: &DocumentId) -> Result<u32, ScribeError> {
        let text = Self::read(document).await?;
        Ok(text.lines().count().max(1) as u32)
    }
}

/// Prints thread renders and notices to the terminal.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }
}

/// One rendered thread, without colour codes.
pub fn format_thread(thread: &ThreadSnapshot) -> String {
    let mut out = format!("── {} · {} ──\n", thread.id, thread.anchor);
    for msg in &thread.messages {
        let mut header = format!("[{}] {}", msg.id, msg.author.name);
        if let Some(label) = &msg.label {
            header.push_str(&format!(" ({label})"));
        }
        if msg.mode == CommentMode::Editing {
            header.push_str(" [editing]");
        }
        out.push_str(&header);
        out.push('\n');
        for line in msg.body.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

impl ThreadView for TerminalUi {
    fn render(&self, thread: &ThreadSnapshot) {
        let text = format_thread(thread);
        let mut lines = text.lines();
        if let Some(header) = lines.next() {
            println!("{}", header.dimmed());
        }
        for line in lines {
            if line.starts_with('[') {
                println!("{}", line.bold());
            } else {
                println!("{line}");
            }
        }
        println!();
    }

    fn disposed(&self, thread: ThreadId) {
        println!("{}", format!("thread {thread} closed").dimmed());
    }

    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => println!("{}", message.green()),
            Severity::Warning => eprintln!("{}: {message}", "warning".yellow()),
            Severity::Error => eprintln!("{}: {message}", "error".red()),
        }
    }
}

/// Asks for credential values on the terminal. Secret values are read
/// without echo.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn ask_blocking(spec: &PromptSpec) -> Option<String> {
        println!("{}", spec.title.bold());
        println!("{}", spec.prompt);
        let label = format!("{}: ", spec.placeholder);

        let entered = if spec.secret {
            rpassword::prompt_password(label).map_err(|e| e.to_string())
        } else {
            DefaultEditor::new()
                .and_then(|mut rl| rl.readline(&label))
                .map_err(|e| e.to_string())
        };

        match entered {
            Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!(title = %spec.title, error = %e, "credential prompt dismissed");
                None
            }
        }
    }
}

#[async_trait]
impl CredentialPrompter for TerminalPrompter {
    async fn prompt(&self, spec: &PromptSpec) -> Option<String> {
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || Self::ask_blocking(&spec))
            .await
            .ok()
            .flatten()
    }
}
