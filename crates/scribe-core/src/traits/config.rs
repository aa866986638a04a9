// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration surface and interactive credential prompts.

use async_trait::async_trait;

use crate::error::ScribeError;
use crate::types::{ConfigKey, PromptSpec};

/// Persisted key/value configuration. Writes are durable and user-level.
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// Returns the stored value, or `None` when unset.
    async fn get(&self, key: ConfigKey) -> Option<String>;

    /// Persists `value` for `key`.
    async fn set(&self, key: ConfigKey, value: &str) -> Result<(), ScribeError>;
}

/// Asks the user for a single value.
#[async_trait]
pub trait CredentialPrompter: Send + Sync + 'static {
    /// Returns the entered text, or `None` if the user dismissed the prompt.
    async fn prompt(&self, spec: &PromptSpec) -> Option<String>;
}
