// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent layer for Scribe.
//!
//! Wires the prompt compiler, the conversation store, and a completion
//! session together behind the [`CommandOrchestrator`]:
//! - **Credentials**: resolve, prompt, persist, and verify the three items
//! - **Session**: the connected client owned by the orchestrator
//! - **Orchestrator**: one method per user action
//! - **Commands**: a dispatchable enum over those methods

pub mod commands;
pub mod credentials;
pub mod orchestrator;
pub mod session;

pub use commands::{Command, CommandKind, CommandOutcome};
pub use credentials::{CredentialResolver, ResolvedCredentials};
pub use orchestrator::{
    COMPOSER_PLACEHOLDER, COMPOSER_PROMPT, Collaborators, CommandOrchestrator,
    DOCSTRING_INSTRUCTION, FALLBACK_NOTICE, Reply, ThreadRef,
};
pub use session::CompletionSession;
