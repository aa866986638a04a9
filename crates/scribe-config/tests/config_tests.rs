// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Scribe configuration system.

use scribe_config::diagnostic::ConfigError;
use scribe_config::{PromptMode, load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_scribe_config() {
    let toml = r#"
[agent]
log_level = "debug"
human_name = "Me"

[credentials]
api_key = "abc123"
endpoint = "https://my-resource.openai.azure.com"
deployment_name = "gpt-35-turbo"

[completion]
temperature = 0.2
max_tokens = 800
api_version = "2024-06-01"

[prompt]
history_window = 4
mode = "legacy"

[orchestrator]
serialize_asks = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.human_name, "Me");
    assert_eq!(config.agent.assistant_name, "Azure Scribe AI");
    assert_eq!(config.credentials.api_key.as_deref(), Some("abc123"));
    assert_eq!(
        config.credentials.deployment_name.as_deref(),
        Some("gpt-35-turbo")
    );
    assert_eq!(config.completion.max_tokens, 800);
    assert_eq!(config.completion.frequency_penalty, 1.0);
    assert_eq!(config.completion.api_version, "2024-06-01");
    assert_eq!(config.prompt.history_window, 4);
    assert_eq!(config.prompt.mode, PromptMode::Legacy);
    assert!(!config.orchestrator.serialize_asks);

    let opts = config.completion.options();
    assert_eq!(opts.temperature, 0.2);
    assert_eq!(opts.max_tokens, 800);
}

#[test]
fn unknown_key_gets_a_suggestion() {
    let toml = r#"
[credentials]
endpont = "https://x.example"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "endpont");
            assert_eq!(suggestion.as_deref(), Some("endpoint"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[prompt]
history_window = "eight"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("history_window")))
    );
}

#[test]
fn validation_runs_after_parse() {
    let toml = r#"
[completion]
temperature = 5.0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { key, .. } if key == "completion.temperature"))
    );
}

#[test]
fn unknown_prompt_mode_is_rejected() {
    let toml = r#"
[prompt]
mode = "streaming"
"#;
    assert!(load_and_validate_str(toml).is_err());
}
