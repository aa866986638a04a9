// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Scribe.
//!
//! Mock implementations of every collaborator trait, plus a
//! [`TestHarness`] that wires them into a connected orchestrator.

pub mod harness;
pub mod mock_client;
pub mod mock_host;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_client::{MockClientFactory, MockCompletionClient, MockReply};
pub use mock_host::{MockConfigStore, MockDocumentHost, MockPrompter, RecordingUi};
