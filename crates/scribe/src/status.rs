// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scribe verify` and `scribe config` command implementations.

use std::path::Path;

use colored::Colorize;
use scribe_agent::CommandOrchestrator;
use scribe_core::error::ScribeError;
use scribe_core::traits::ConfigStore;
use scribe_core::types::ConfigKey;

/// How one credential field is shown by `scribe config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    Unset,
    /// Set, value withheld.
    Hidden,
    Set(String),
}

/// Reads each credential field. The API key is never revealed.
pub async fn credential_status(store: &dyn ConfigStore) -> Vec<(ConfigKey, FieldStatus)> {
    let mut rows = Vec::with_capacity(ConfigKey::ALL.len());
    for key in ConfigKey::ALL {
        let status = match store.get(key).await {
            Some(v) if v.trim().is_empty() => FieldStatus::Unset,
            None => FieldStatus::Unset,
            Some(_) if key == ConfigKey::ApiKey => FieldStatus::Hidden,
            Some(v) => FieldStatus::Set(v),
        };
        rows.push((key, status));
    }
    rows
}

/// Run the `scribe config` command.
pub async fn run_config(store: &dyn ConfigStore, path: &Path) {
    println!("{} {}", "config file:".bold(), path.display());
    for (key, status) in credential_status(store).await {
        let shown = match status {
            FieldStatus::Unset => "not set".red().to_string(),
            FieldStatus::Hidden => "set".green().to_string(),
            FieldStatus::Set(v) => v.green().to_string(),
        };
        println!("  {:<16} {shown}", key.label());
    }
}

/// Run the `scribe verify` command.
///
/// Resolves credentials (prompting for gaps) and makes the verification
/// call. The outcome is shown by the orchestrator's view.
pub async fn run_verify(orchestrator: &CommandOrchestrator) -> Result<(), ScribeError> {
    orchestrator.connect().await
}
