// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assigns a conversation role from a display author name.
//!
//! Used where messages arrive from outside the orchestrator (for example a
//! host replaying persisted comments); messages created by the orchestrator
//! carry their role from the start.

use scribe_config::model::AgentConfig;
use scribe_core::types::MessageRole;

/// The configured human and assistant display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRoles {
    pub human: String,
    pub assistant: String,
}

impl AuthorRoles {
    pub fn new(human: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            human: human.into(),
            assistant: assistant.into(),
        }
    }

    pub fn from_config(agent: &AgentConfig) -> Self {
        Self::new(agent.human_name.clone(), agent.assistant_name.clone())
    }

    /// Exact-match classification. Any other name is an annotation.
    pub fn classify(&self, author_name: &str) -> MessageRole {
        if author_name == self.human {
            MessageRole::Human
        } else if author_name == self.assistant {
            MessageRole::Assistant
        } else {
            MessageRole::Annotation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_classify() {
        let roles = AuthorRoles::from_config(&AgentConfig::default());
        assert_eq!(roles.classify("VS Code"), MessageRole::Human);
        assert_eq!(roles.classify("Azure Scribe AI"), MessageRole::Assistant);
        assert_eq!(roles.classify("Reviewer Bot"), MessageRole::Annotation);
    }

    #[test]
    fn classification_is_case_sensitive() {
        let roles = AuthorRoles::new("me", "bot");
        assert_eq!(roles.classify("Me"), MessageRole::Annotation);
    }
}
