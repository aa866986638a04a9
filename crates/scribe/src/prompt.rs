// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scribe prompt` command implementation.
//!
//! Compiles the prompt a first question on a line range would send and
//! prints it as JSON. No credentials are read and no request is made.

use std::path::Path;

use scribe_config::model::{PromptConfig, PromptMode};
use scribe_context::{CompiledPrompt, PromptCompiler};
use scribe_core::error::ScribeError;
use scribe_core::types::{Anchor, TextRange};

use crate::host::FileDocument;

/// Compiles the prompt for `question` on `range` of `path`.
pub async fn compile_prompt(
    config: &PromptConfig,
    path: &Path,
    range: TextRange,
    legacy: bool,
    question: &str,
) -> Result<CompiledPrompt, ScribeError> {
    let mut config = config.clone();
    if legacy {
        config.mode = PromptMode::Legacy;
    }
    let anchor = Anchor::new(FileDocument::id_for(path), range);
    PromptCompiler::new(&config)
        .compile(&FileDocument::new(), &anchor, &[], question)
        .await
}

/// Run the `scribe prompt` command.
pub async fn run_prompt(
    config: &PromptConfig,
    path: &Path,
    range: TextRange,
    legacy: bool,
    question: &str,
) -> Result<(), ScribeError> {
    let prompt = compile_prompt(config, path, range, legacy, question).await?;
    let json = serde_json::to_string_pretty(&prompt)
        .map_err(|e| ScribeError::Internal(format!("failed to serialize prompt: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_prompt_embeds_selected_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.py");
        std::fs::write(&path, "import math\ndef area(r):\n    return math.pi * r * r\n").unwrap();

        let prompt = compile_prompt(
            &PromptConfig::default(),
            &path,
            TextRange::lines(1, 2),
            false,
            "What does this compute?",
        )
        .await
        .unwrap();

        let messages = prompt.into_messages();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].content.contains("def area(r):\n    return math.pi * r * r"));
        assert!(!messages[0].content.contains("import math"));
        assert_eq!(messages[3].content, "What does this compute?");
    }

    #[tokio::test]
    async fn legacy_flag_overrides_configured_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rs");
        std::fs::write(&path, "fn main() {}\n").unwrap();

        let prompt = compile_prompt(&PromptConfig::default(), &path, TextRange::lines(0, 0), true, "why?")
            .await
            .unwrap();
        let CompiledPrompt::Text(text) = &prompt else {
            panic!("expected legacy text prompt, got {prompt:?}");
        };
        assert!(text.ends_with("Human: why?\n\nAI: "));

        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["kind"], "text");
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = compile_prompt(
            &PromptConfig::default(),
            Path::new("/no/such/file.rs"),
            TextRange::lines(0, 0),
            false,
            "q",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ScribeError::DocumentUnavailable { .. }));
    }
}
