// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document collaborator: live reads and edits of editor buffers.

use async_trait::async_trait;

use crate::error::ScribeError;
use crate::types::{DocumentId, TextRange};

/// Read/write access to documents open in the host.
#[async_trait]
pub trait DocumentHost: Send + Sync + 'static {
    /// Returns the text currently spanned by `range`. Must not serve a cached copy.
    async fn read_range(&self, document: &DocumentId, range: TextRange)
    -> Result<String, ScribeError>;

    /// Replaces the text spanned by `range` with `text`.
    async fn replace_range(
        &self,
        document: &DocumentId,
        range: TextRange,
        text: &str,
    ) -> Result<(), ScribeError>;

    /// Number of lines in the document.
    async fn line_count(&self, document: &DocumentId) -> Result<u32, ScribeError>;
}
