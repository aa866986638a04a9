// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command surface a host binds to its UI actions.

use scribe_core::error::ScribeError;
use scribe_core::types::{MessageId, ThreadId};
use strum::{Display, EnumDiscriminants};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::orchestrator::{CommandOrchestrator, Reply, ThreadRef};

/// Every user-triggerable action.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(CommandKind), derive(Display))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum Command {
    CreateNote(Reply),
    Reply(Reply),
    /// A message authored outside the orchestrator.
    ImportMessage {
        target: ThreadRef,
        author: String,
        body: String,
    },
    AskAi(Reply),
    AiEdit(Reply),
    GenerateDocstring(ThreadRef),
    BeginEdit(MessageId),
    SetBody { message: MessageId, text: String },
    SaveEdit(MessageId),
    CancelEdit(MessageId),
    DeleteMessage(MessageId),
    DeleteThread(ThreadId),
    DisposeController,
}

/// What a dispatched command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A message was appended (the note, the import, or the assistant's answer).
    Appended(MessageId),
    /// The anchor range was rewritten in the document.
    DocumentEdited,
    /// A lifecycle action; `false` when it was a no-op.
    Applied(bool),
    Disposed,
}

impl CommandOrchestrator {
    /// Routes `command` to the matching operation.
    pub async fn dispatch(
        &self,
        command: Command,
        cancel: &CancellationToken,
    ) -> Result<CommandOutcome, ScribeError> {
        debug!(command = %CommandKind::from(&command), "dispatching");
        match command {
            Command::CreateNote(reply) | Command::Reply(reply) => {
                self.reply_note(reply).await.map(CommandOutcome::Appended)
            }
            Command::ImportMessage { target, author, body } => self
                .import_message(target, &author, &body)
                .await
                .map(CommandOutcome::Appended),
            Command::AskAi(reply) => self.ask(reply, cancel).await.map(CommandOutcome::Appended),
            Command::AiEdit(reply) => self
                .ai_edit(reply, cancel)
                .await
                .map(|()| CommandOutcome::DocumentEdited),
            Command::GenerateDocstring(target) => self
                .generate_docstring(target, cancel)
                .await
                .map(CommandOutcome::Appended),
            Command::BeginEdit(id) => self.begin_edit(id).await.map(CommandOutcome::Applied),
            Command::SetBody { message, text } => {
                self.set_body(message, &text).await.map(CommandOutcome::Applied)
            }
            Command::SaveEdit(id) => self.save_edit(id).await.map(CommandOutcome::Applied),
            Command::CancelEdit(id) => self.cancel_edit(id).await.map(CommandOutcome::Applied),
            Command::DeleteMessage(id) => {
                self.delete_message(id).await.map(CommandOutcome::Applied)
            }
            Command::DeleteThread(id) => self.delete_thread(id).await.map(CommandOutcome::Applied),
            Command::DisposeController => {
                self.dispose().await;
                Ok(CommandOutcome::Disposed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scribe_core::types::{Anchor, DocumentId, TextRange};

    use super::*;

    #[test]
    fn command_kinds_use_kebab_case() {
        let anchor = Anchor::new(DocumentId("a.rs".into()), TextRange::lines(0, 0));
        let ask = Command::AskAi(Reply::on_range(anchor, "q"));
        assert_eq!(CommandKind::from(&ask).to_string(), "ask-ai");
        assert_eq!(
            CommandKind::from(&Command::DisposeController).to_string(),
            "dispose-controller"
        );
    }
}
