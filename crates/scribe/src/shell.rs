// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scribe shell` command implementation.
//!
//! An interactive REPL over one file. The user selects a line range, which
//! becomes the anchor for notes, questions and edits. Bare input asks the
//! model. Ctrl-C while a model call is running cancels it.

use std::future::Future;
use std::path::Path;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scribe_agent::{COMPOSER_PLACEHOLDER, CommandOrchestrator, Reply, ThreadRef};
use scribe_core::error::ScribeError;
use scribe_core::types::{Anchor, MessageId, TextRange};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::host::{FileDocument, format_thread};

const HELP: &str = "\
/select A:B      anchor to lines A..=B (1-based)
/note TEXT       add a note (never sent to the model)
/ask TEXT        ask about the selection (also: bare text)
/edit TEXT       rewrite the selection as instructed
/doc             generate a docstring for the selection
/show            show the selected thread
/threads         list all threads
/begin N         start editing message N
/set N TEXT      replace the body of message N while editing
/save N          commit the edit of message N
/cancel N        discard the edit of message N
/delete N        delete message N
/delete-thread   delete the selected thread
/reconnect       re-read credentials and reconnect
/quit            exit";

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Select(TextRange),
    Note(String),
    Ask(String),
    Edit(String),
    Docstring,
    Show,
    Threads,
    Begin(MessageId),
    Set(MessageId, String),
    Save(MessageId),
    Cancel(MessageId),
    Delete(MessageId),
    DeleteThread,
    Reconnect,
    Help,
    Quit,
}

/// Parses `A:B` or `A` (1-based, inclusive) into whole-line range.
pub fn parse_lines(arg: &str) -> Result<TextRange, String> {
    let (first, last) = match arg.split_once(':') {
        Some((a, b)) => (a, b),
        None => (arg, arg),
    };
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid line number `{}`", s.trim()))
    };
    let (first, last) = (parse(first)?, parse(last)?);
    if first == 0 || last < first {
        return Err(format!("invalid line range `{arg}`: expected A:B with 1 <= A <= B"));
    }
    Ok(TextRange::lines(first - 1, last - 1))
}

fn parse_id(arg: &str) -> Result<MessageId, String> {
    arg.trim()
        .parse::<u64>()
        .map(MessageId)
        .map_err(|_| format!("invalid message id `{}`", arg.trim()))
}

fn require_text(command: &str, text: &str) -> Result<String, String> {
    if text.is_empty() {
        Err(format!("{command} needs text"))
    } else {
        Ok(text.to_string())
    }
}

pub fn parse_input(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    if !line.starts_with('/') {
        return Ok(ShellInput::Ask(line.to_string()));
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };

    match command {
        "/select" => parse_lines(rest).map(ShellInput::Select),
        "/note" => require_text(command, rest).map(ShellInput::Note),
        "/ask" => Ok(ShellInput::Ask(rest.to_string())),
        "/edit" => require_text(command, rest).map(ShellInput::Edit),
        "/doc" => Ok(ShellInput::Docstring),
        "/show" => Ok(ShellInput::Show),
        "/threads" => Ok(ShellInput::Threads),
        "/begin" => parse_id(rest).map(ShellInput::Begin),
        "/set" => {
            let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(ShellInput::Set(parse_id(id)?, text.trim().to_string()))
        }
        "/save" => parse_id(rest).map(ShellInput::Save),
        "/cancel" => parse_id(rest).map(ShellInput::Cancel),
        "/delete" => parse_id(rest).map(ShellInput::Delete),
        "/delete-thread" => Ok(ShellInput::DeleteThread),
        "/reconnect" => Ok(ShellInput::Reconnect),
        "/help" => Ok(ShellInput::Help),
        "/quit" | "/exit" => Ok(ShellInput::Quit),
        other => Err(format!("unknown command `{other}`, try /help")),
    }
}

/// Drives `future`, cancelling `cancel` on Ctrl-C.
async fn interruptible<F: Future>(future: F, cancel: &CancellationToken) -> F::Output {
    tokio::pin!(future);
    loop {
        tokio::select! {
            output = &mut future => return output,
            _ = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                cancel.cancel();
            }
        }
    }
}

struct Shell<'a> {
    orchestrator: &'a CommandOrchestrator,
    document: scribe_core::types::DocumentId,
    selection: Option<Anchor>,
}

impl Shell<'_> {
    fn anchor(&self) -> Result<Anchor, ScribeError> {
        self.selection
            .clone()
            .ok_or_else(|| ScribeError::Internal("no selection, use /select A:B first".into()))
    }

    /// Returns `false` on quit.
    async fn handle(&mut self, input: ShellInput) -> Result<bool, ScribeError> {
        let o = self.orchestrator;
        let cancel = CancellationToken::new();
        match input {
            ShellInput::Select(range) => {
                let anchor = Anchor::new(self.document.clone(), range);
                println!("{}", format!("selected {anchor}").dimmed());
                if let Some(thread) = o.thread_for(&anchor).await {
                    if let Some(snapshot) = o.snapshot(thread).await {
                        print!("{}", format_thread(&snapshot));
                    }
                }
                self.selection = Some(anchor);
            }
            ShellInput::Note(text) => {
                o.reply_note(Reply::on_range(self.anchor()?, text)).await?;
            }
            ShellInput::Ask(text) => {
                let reply = Reply::on_range(self.anchor()?, text);
                interruptible(o.ask(reply, &cancel), &cancel).await?;
            }
            ShellInput::Edit(text) => {
                let reply = Reply::on_range(self.anchor()?, text);
                interruptible(o.ai_edit(reply, &cancel), &cancel).await?;
                println!("{}", "selection rewritten".green());
            }
            ShellInput::Docstring => {
                let target = ThreadRef::Range(self.anchor()?);
                interruptible(o.generate_docstring(target, &cancel), &cancel).await?;
            }
            ShellInput::Show => {
                let anchor = self.anchor()?;
                match o.thread_for(&anchor).await {
                    Some(thread) => {
                        if let Some(snapshot) = o.snapshot(thread).await {
                            print!("{}", format_thread(&snapshot));
                        }
                    }
                    None => println!("{}", COMPOSER_PLACEHOLDER.dimmed()),
                }
            }
            ShellInput::Threads => {
                let threads = o.threads().await;
                if threads.is_empty() {
                    println!("{}", "no threads".dimmed());
                }
                for thread in threads {
                    println!("{} {} ({} messages)", thread.id, thread.anchor, thread.messages.len());
                }
            }
            ShellInput::Begin(id) => report_applied(o.begin_edit(id).await?, id),
            ShellInput::Set(id, text) => report_applied(o.set_body(id, &text).await?, id),
            ShellInput::Save(id) => report_applied(o.save_edit(id).await?, id),
            ShellInput::Cancel(id) => report_applied(o.cancel_edit(id).await?, id),
            ShellInput::Delete(id) => report_applied(o.delete_message(id).await?, id),
            ShellInput::DeleteThread => {
                let anchor = self.anchor()?;
                match o.thread_for(&anchor).await {
                    Some(thread) => {
                        o.delete_thread(thread).await?;
                    }
                    None => println!("{}", "no thread on the selection".dimmed()),
                }
            }
            ShellInput::Reconnect => o.reconnect().await?,
            ShellInput::Help => println!("{HELP}"),
            ShellInput::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn report_applied(applied: bool, id: MessageId) {
    if !applied {
        println!("{}", format!("message {id}: nothing to do").dimmed());
    }
}

/// Runs the REPL on `path` until `/quit` or end of input.
pub async fn run_shell(orchestrator: &CommandOrchestrator, path: &Path) -> Result<(), ScribeError> {
    let document = FileDocument::id_for(path);
    let lines = orchestrator.commenting_ranges(&document).await?;
    debug!(document = %document, ranges = lines.len(), "shell started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| ScribeError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("scribe shell · {}", path.display()).bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let mut shell = Shell {
        orchestrator,
        document,
        selection: None,
    };
    let prompt = format!("{}> ", "scribe".green());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let input = match parse_input(trimmed) {
                    Ok(input) => input,
                    Err(e) => {
                        eprintln!("{}: {e}", "error".red());
                        continue;
                    }
                };
                match shell.handle(input).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    // Orchestrator errors were already shown by the view.
                    Err(ScribeError::Internal(message)) => eprintln!("{}: {message}", "error".red()),
                    Err(e) => debug!(error = %e, "command failed"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    orchestrator.dispose().await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_text_is_a_question() {
        assert_eq!(
            parse_input("  what does this do?  "),
            Ok(ShellInput::Ask("what does this do?".into()))
        );
    }

    #[test]
    fn select_is_one_based_and_inclusive() {
        assert_eq!(
            parse_input("/select 3:5"),
            Ok(ShellInput::Select(TextRange::lines(2, 4)))
        );
        assert_eq!(parse_lines("7"), Ok(TextRange::lines(6, 6)));
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert!(parse_lines("0:3").is_err());
        assert!(parse_lines("5:2").is_err());
        assert!(parse_lines("a:b").is_err());
    }

    #[test]
    fn set_takes_id_then_text() {
        assert_eq!(
            parse_input("/set 12 new body text"),
            Ok(ShellInput::Set(MessageId(12), "new body text".into()))
        );
    }

    #[test]
    fn note_and_edit_need_text() {
        assert!(parse_input("/note").is_err());
        assert!(parse_input("/edit   ").is_err());
        assert_eq!(parse_input("/doc"), Ok(ShellInput::Docstring));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_input("/frobnicate").unwrap_err().contains("/help"));
    }
}
