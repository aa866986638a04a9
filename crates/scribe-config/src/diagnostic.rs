// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors become miette reports pointing into the TOML file that
//! caused them, with a "did you mean" hint for misspelled keys. Every
//! report names the `SCRIBE_*` variable that can override the key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a known key must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// One problem found while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {section}")]
    #[diagnostic(
        code(scribe::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// `[section]`, or "the top level".
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a Scribe setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(
        code(scribe::config::invalid_type),
        help("{}", invalid_type_help(expected, key))
    )]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A value that parsed but is out of range.
    #[error("invalid `{key}`: {message}")]
    #[diagnostic(code(scribe::config::validation), help("{}", validation_help(key)))]
    Validation { key: String, message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(scribe::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? known keys: {valid_keys}"),
        None => format!("known keys: {valid_keys}"),
    }
}

fn invalid_type_help(expected: &str, key: &str) -> String {
    format!("expected {expected} (in TOML or via {})", env_var_for(key))
}

fn validation_help(key: &str) -> String {
    format!("check `{key}` or {}", env_var_for(key))
}

/// Environment variable overriding a dotted key.
///
/// `credentials.api_key` → `SCRIBE_CREDENTIALS_API_KEY`.
pub fn env_var_for(key: &str) -> String {
    format!("SCRIBE_{}", key.replace('.', "_").to_ascii_uppercase())
}

/// TOML files that fed the Figment, by display path.
struct Sources<'a>(&'a [(String, String)]);

impl Sources<'_> {
    /// File named by the error's metadata. Inline strings carry no
    /// metadata, so a lone source is assumed.
    fn of(&self, error: &figment::Error) -> Option<&(String, String)> {
        let file = error.metadata.as_ref().and_then(|m| match &m.source {
            Some(figment::Source::File(path)) => Some(path.display().to_string()),
            _ => None,
        });
        match file {
            Some(file) => self.0.iter().find(|(p, _)| *p == file),
            None if self.0.len() == 1 => self.0.first(),
            None => None,
        }
    }

    fn locate(
        &self,
        error: &figment::Error,
        section: &[String],
        field: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some((path, content)) = self.of(error) else {
            return (None, None);
        };
        match find_key_offset(content, section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ),
            None => (None, None),
        }
    }
}

/// Converts a Figment error (which may hold several) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let sources = Sources(toml_sources);
    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = sources.locate(&error, &section, field);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: match section.first() {
                            Some(s) => format!("[{s}]"),
                            None => "the top level".to_string(),
                        },
                        suggestion: suggest_key(field, &expected[..]),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: section.join("."),
                    detail: format!("found {actual}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Byte offset of `field` inside `[section]` (or the top level).
///
/// The key must start a line and be followed by whitespace or `=`.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let body = line.trim_start();
        if body.starts_with('[') && section.is_empty() {
            break;
        }
        let is_key = body
            .strip_prefix(field)
            .is_some_and(|rest| rest.starts_with([' ', '\t', '=']));
        if is_key {
            return Some(offset + (line.len() - body.len()));
        }
        offset += line.len();
    }
    None
}

/// The known key most similar to `unknown`, if any is close enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|k| (k.as_ref(), strsim::jaro_winkler(unknown, k.as_ref())))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k.to_string())
}

/// Prints every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
    eprintln!("scribe: {} configuration error(s), not starting", errors.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDENTIAL_KEYS: [&str; 3] = ["api_key", "endpoint", "deployment_name"];

    #[test]
    fn suggests_closest_credential_key() {
        assert_eq!(suggest_key("endpont", &CREDENTIAL_KEYS), Some("endpoint".into()));
        assert_eq!(suggest_key("deployment", &CREDENTIAL_KEYS), Some("deployment_name".into()));
        assert_eq!(suggest_key("zzzzzz", &CREDENTIAL_KEYS), None);
    }

    #[test]
    fn key_offset_is_scoped_to_section() {
        let content = "[agent]\nendpont = 1\n\n[credentials]\n  endpont = \"x\"\n";
        let section = vec!["credentials".to_string()];
        let o = find_key_offset(content, &section, "endpont").unwrap();
        assert!(o > content.find("[credentials]").unwrap());
        assert_eq!(&content[o..o + 7], "endpont");
    }

    #[test]
    fn prefix_of_longer_key_is_not_a_match() {
        let content = "[prompt]\nmode_x = 1\nmode = \"chat\"\n";
        let o = find_key_offset(content, &["prompt".to_string()], "mode").unwrap();
        assert_eq!(&content[o..o + 6], "mode =");
    }

    #[test]
    fn env_var_names_follow_loader_mapping() {
        assert_eq!(env_var_for("credentials.api_key"), "SCRIBE_CREDENTIALS_API_KEY");
        assert_eq!(env_var_for("prompt.history_window"), "SCRIBE_PROMPT_HISTORY_WINDOW");
    }
}
