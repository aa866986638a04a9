// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable credential storage in the user-level configuration file.
//!
//! Reads go through the full Figment hierarchy so environment and local
//! overrides are honoured. Writes land in the user XDG file only, keeping
//! every other key of that file intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scribe_core::{ConfigKey, ConfigStore, ScribeError};
use tracing::{debug, info};

use crate::loader::{build_figment, user_config_path};

/// Section of the TOML file holding the credential keys.
const CREDENTIALS_SECTION: &str = "credentials";

/// [`ConfigStore`] backed by `~/.config/scribe/scribe.toml`.
#[derive(Debug, Clone)]
pub struct UserConfigStore {
    user_path: PathBuf,
}

impl UserConfigStore {
    /// Store writing to the standard user configuration file.
    pub fn new() -> Self {
        Self::at(user_config_path())
    }

    /// Store writing to an explicit file (tests, portable installs).
    pub fn at(user_path: impl Into<PathBuf>) -> Self {
        Self {
            user_path: user_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.user_path
    }
}

impl Default for UserConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for UserConfigStore {
    async fn get(&self, key: ConfigKey) -> Option<String> {
        let path = format!("{CREDENTIALS_SECTION}.{key}");
        build_figment(&self.user_path)
            .extract_inner::<Option<String>>(&path)
            .ok()
            .flatten()
    }

    async fn set(&self, key: ConfigKey, value: &str) -> Result<(), ScribeError> {
        let mut doc = match tokio::fs::read_to_string(&self.user_path).await {
            Ok(content) => content
                .parse::<toml::Table>()
                .map_err(|e| ScribeError::Config(format!(
                    "cannot update {}: {e}",
                    self.user_path.display()
                )))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };

        let section = doc
            .entry(CREDENTIALS_SECTION)
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let toml::Value::Table(section) = section else {
            return Err(ScribeError::Config(format!(
                "`{CREDENTIALS_SECTION}` in {} is not a table",
                self.user_path.display()
            )));
        };
        section.insert(key.to_string(), toml::Value::String(value.to_string()));

        let rendered = toml::to_string_pretty(&doc)
            .map_err(|e| ScribeError::Config(format!("failed to serialize config: {e}")))?;

        if let Some(parent) = self.user_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.user_path.with_extension("toml.tmp");
        tokio::fs::write(&tmp, rendered).await?;
        tokio::fs::rename(&tmp, &self.user_path).await?;

        debug!(path = %self.user_path.display(), key = %key, "persisted configuration value");
        info!(key = %key, "updated user configuration");
        Ok(())
    }
}
