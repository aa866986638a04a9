// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./scribe.toml` > `~/.config/scribe/scribe.toml` > `/etc/scribe/scribe.toml`
//! with environment variable overrides via `SCRIBE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ScribeConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/scribe/scribe.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "scribe.toml";

/// Returns the user-level configuration file, `~/.config/scribe/scribe.toml`.
///
/// This is where interactively entered credentials are persisted.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("scribe/scribe.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/scribe/scribe.toml` (system-wide)
/// 3. `~/.config/scribe/scribe.toml` (user XDG config)
/// 4. `./scribe.toml` (local directory)
/// 5. `SCRIBE_*` environment variables
pub fn load_config() -> Result<ScribeConfig, figment::Error> {
    build_figment(&user_config_path()).extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ScribeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScribeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ScribeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScribeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment with `user_path` standing in for the user XDG file.
///
/// Returns the Figment before extraction so callers can read single keys.
pub fn build_figment(user_path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ScribeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_path))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SCRIBE_CREDENTIALS_API_KEY` must map to `credentials.api_key`,
/// not `credentials.api.key`.
fn env_provider() -> Env {
    Env::prefixed("SCRIBE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("credentials_", "credentials.", 1)
            .replacen("completion_", "completion.", 1)
            .replacen("prompt_", "prompt.", 1)
            .replacen("orchestrator_", "orchestrator.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PromptMode;

    #[test]
    fn defaults_when_empty() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.prompt.history_window, 8);
        assert_eq!(config.prompt.mode, PromptMode::Chat);
        assert!(config.orchestrator.serialize_asks);
        assert!(config.credentials.api_key.is_none());
    }

    #[test]
    fn env_overrides_credentials() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SCRIBE_CREDENTIALS_DEPLOYMENT_NAME", "gpt-4o");
            jail.set_env("SCRIBE_PROMPT_HISTORY_WINDOW", "4");
            let config: ScribeConfig = build_figment(Path::new("missing.toml")).extract()?;
            assert_eq!(config.credentials.deployment_name.as_deref(), Some("gpt-4o"));
            assert_eq!(config.prompt.history_window, 4);
            Ok(())
        });
    }

    #[test]
    fn user_file_is_layered_under_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "user.toml",
                "[credentials]\nendpoint = \"https://user.example\"\napi_key = \"k\"\n",
            )?;
            jail.create_file(
                LOCAL_CONFIG_FILE,
                "[credentials]\nendpoint = \"https://local.example\"\n",
            )?;
            let config: ScribeConfig = build_figment(Path::new("user.toml")).extract()?;
            assert_eq!(
                config.credentials.endpoint.as_deref(),
                Some("https://local.example")
            );
            assert_eq!(config.credentials.api_key.as_deref(), Some("k"));
            Ok(())
        });
    }
}
