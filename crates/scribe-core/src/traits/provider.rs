// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion client trait for chat-completion backends.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ScribeError;
use crate::types::{CompletionRequest, Credentials};

/// A stateless chat-completion backend.
///
/// One call type only: an ordered list of role-tagged messages plus sampling
/// options in, one completion out. Implementations never retry.
#[async_trait]
pub trait CompletionClient: Send + Sync + 'static {
    /// Returns the human-readable name of this client.
    fn name(&self) -> &str;

    /// Sends the request and returns the first choice's content.
    ///
    /// An absent or null content field is returned as an empty string; the
    /// caller decides what to show instead.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ScribeError>;
}

/// Builds completion clients from credentials.
///
/// Lets the session owner construct a fresh client whenever credentials
/// change, and lets tests substitute mocks.
pub trait ClientFactory: Send + Sync + 'static {
    fn build(&self, credentials: &Credentials) -> Result<Arc<dyn CompletionClient>, ScribeError>;
}
