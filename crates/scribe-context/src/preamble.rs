// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed prompt text: the role-play preamble, the identity example and the
//! code-only edit instruction.

use scribe_core::ChatMessage;

/// Establishes the assistant as a code-aware expert answering in markdown.
pub const ROLE_PLAY: &str = "I want you to act as a highly intelligent AI chatbot that has deep understanding of any coding language and its API documentations. I will provide you with a code block and your role is to provide a comprehensive answer to any questions or requests that I will ask about the code block. Please answer in as much detail as possible and not be limited to brevity. It is very important that you provide verbose answers and answer in markdown format.";

/// First turn of the identity example prepended to every chat prompt.
pub const EXAMPLE_QUESTION: &str = "Who are you?";

/// Second turn of the identity example.
pub const EXAMPLE_ANSWER: &str = "I am an intelligent and helpful AI chatbot.";

/// Identity example in the flattened legacy form.
pub const LEGACY_EXAMPLE: &str = "Human: Who are you?\n\nAI: I am an intelligent AI chatbot\n\n";

/// System instruction for ask-and-edit: the reply must be usable code only.
pub const EDIT_INSTRUCTION: &str = "You are an AI chatbot that has deep understanding of any coding language and its API documentations. I will provide you with an instruction and then a code. Your role is to return the code modified according to the instructions. Return only the code, do not make any comment. The code should be usable as you return it.";

/// Preamble plus the fenced anchor code, as one system message.
pub fn system_message(code: &str) -> ChatMessage {
    ChatMessage::system(format!("{ROLE_PLAY}\nCode:\n```\n{code}\n```"))
}

/// The two-turn identity example.
pub fn identity_example() -> [ChatMessage; 2] {
    [
        ChatMessage::user(EXAMPLE_QUESTION),
        ChatMessage::assistant(EXAMPLE_ANSWER),
    ]
}

/// Preamble plus fenced code for the legacy single-string prompt.
pub fn legacy_header(code: &str) -> String {
    format!("{ROLE_PLAY}\n```\n{code}\n```\n\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::ChatRole;

    #[test]
    fn system_message_fences_code() {
        let msg = system_message("fn main() {}");
        assert_eq!(msg.role, ChatRole::System);
        assert!(msg.content.starts_with(ROLE_PLAY));
        assert!(msg.content.ends_with("\nCode:\n```\nfn main() {}\n```"));
    }

    #[test]
    fn empty_code_still_produces_a_fence() {
        assert!(system_message("").content.ends_with("```\n\n```"));
        assert!(legacy_header("").ends_with("```\n\n```\n\n\n"));
    }

    #[test]
    fn identity_example_is_user_then_assistant() {
        let [q, a] = identity_example();
        assert_eq!(q, ChatMessage::user("Who are you?"));
        assert_eq!(a.role, ChatRole::Assistant);
    }
}
