// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scribe - code-anchored conversations with Azure OpenAI.
//!
//! This is the binary entry point for the Scribe terminal host.

mod host;
mod prompt;
mod shell;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use scribe_agent::{Collaborators, CommandOrchestrator};
use scribe_config::{ScribeConfig, UserConfigStore};
use scribe_openai::AzureClientFactory;

use crate::host::{FileDocument, TerminalPrompter, TerminalUi};

/// Scribe - code-anchored conversations with Azure OpenAI.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open an interactive session on a file.
    Shell {
        file: PathBuf,
    },
    /// Print the prompt a question would send, without calling the model.
    Prompt {
        file: PathBuf,
        /// Line range, 1-based and inclusive (`A:B` or `A`).
        #[arg(long, default_value = "1")]
        lines: String,
        /// Use the single-string legacy prompt.
        #[arg(long)]
        legacy: bool,
        question: String,
    },
    /// Resolve credentials and make a verification call.
    Verify,
    /// Show which credential fields are set.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match scribe_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            scribe_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Shell { file } => {
            let orchestrator = build_orchestrator(&config);
            shell::run_shell(&orchestrator, &file).await
        }
        Commands::Prompt {
            file,
            lines,
            legacy,
            question,
        } => match shell::parse_lines(&lines) {
            Ok(range) => prompt::run_prompt(&config.prompt, &file, range, legacy, &question).await,
            Err(message) => {
                eprintln!("{}: {message}", "error".red());
                std::process::exit(2);
            }
        },
        Commands::Verify => status::run_verify(&build_orchestrator(&config)).await,
        Commands::Config => {
            let store = UserConfigStore::new();
            status::run_config(&store, store.path()).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn build_orchestrator(config: &ScribeConfig) -> CommandOrchestrator {
    CommandOrchestrator::new(
        config,
        Collaborators {
            documents: Arc::new(FileDocument::new()),
            view: Arc::new(TerminalUi::new()),
            config_store: Arc::new(UserConfigStore::new()),
            prompter: Arc::new(TerminalPrompter::new()),
            clients: Arc::new(AzureClientFactory::new(&config.completion)),
        },
    )
}

/// Logs go to stderr so they never mix with command output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scribe={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prompt_command() {
        let cli = Cli::try_parse_from([
            "scribe", "prompt", "src/lib.rs", "--lines", "3:9", "--legacy", "what is this?",
        ])
        .unwrap();
        match cli.command {
            Commands::Prompt {
                file,
                lines,
                legacy,
                question,
            } => {
                assert_eq!(file, PathBuf::from("src/lib.rs"));
                assert_eq!(lines, "3:9");
                assert!(legacy);
                assert_eq!(question, "what is this?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_requires_a_file() {
        assert!(Cli::try_parse_from(["scribe", "shell"]).is_err());
        assert!(Cli::try_parse_from(["scribe", "verify"]).is_ok());
    }
}
