// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Scribe treats the editor, the configuration surface and the completion
//! API as black boxes. Each one is a trait here and uses `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod config;
pub mod document;
pub mod provider;
pub mod view;

pub use config::{ConfigStore, CredentialPrompter};
pub use document::DocumentHost;
pub use provider::{ClientFactory, CompletionClient};
pub use view::ThreadView;
