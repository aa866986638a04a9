// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread/UI collaborator.

use crate::types::{Severity, ThreadId, ThreadSnapshot};

/// Renders threads and surfaces notices to the user.
///
/// Calls are synchronous; implementations must not block on user input.
pub trait ThreadView: Send + Sync + 'static {
    /// Re-renders a thread after any change to its messages.
    fn render(&self, thread: &ThreadSnapshot);

    /// The thread was destroyed and should disappear from the view.
    fn disposed(&self, thread: ThreadId);

    /// Shows a transient notice.
    fn notify(&self, severity: Severity, message: &str);
}
