// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Scribe.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use scribe_core::CompletionOptions;
use serde::{Deserialize, Serialize};

/// Top-level Scribe configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScribeConfig {
    /// Logging and author display settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Azure OpenAI credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Sampling parameters and transport settings for completion calls.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Prompt compiler settings.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Command orchestration settings.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Logging and author identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Display name given to messages typed by the user.
    #[serde(default = "default_human_name")]
    pub human_name: String,

    /// Display name given to model responses.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            human_name: default_human_name(),
            assistant_name: default_assistant_name(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_human_name() -> String {
    "VS Code".to_string()
}

fn default_assistant_name() -> String {
    "Azure Scribe AI".to_string()
}

/// The three values needed to reach an Azure OpenAI deployment.
///
/// Any of them may be unset; the credential resolver prompts for the gaps.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub deployment_name: Option<String>,
}

/// Sampling parameters and transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionConfig {
    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_one")]
    pub top_p: f32,

    #[serde(default = "default_one")]
    pub frequency_penalty: f32,

    #[serde(default = "default_one")]
    pub presence_penalty: f32,

    /// Azure OpenAI REST API version query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            top_p: default_one(),
            frequency_penalty: default_one(),
            presence_penalty: default_one(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CompletionConfig {
    /// Sampling options sent with every request.
    pub fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
        }
    }
}

fn default_max_tokens() -> u32 {
    500
}

fn default_one() -> f32 {
    1.0
}

fn default_api_version() -> String {
    "2024-02-01".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// How the prompt compiler renders a thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Role-tagged message list with replayed history.
    #[default]
    Chat,
    /// One flattened string, no history. Cheaper per call.
    Legacy,
}

/// Prompt compiler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Number of most recent replayable messages kept in a prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default)]
    pub mode: PromptMode,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            mode: PromptMode::default(),
        }
    }
}

fn default_history_window() -> usize {
    8
}

/// Command orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrchestratorConfig {
    /// Run at most one model call per thread at a time, in submission order.
    #[serde(default = "default_serialize_asks")]
    pub serialize_asks: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            serialize_asks: default_serialize_asks(),
        }
    }
}

fn default_serialize_asks() -> bool {
    true
}
