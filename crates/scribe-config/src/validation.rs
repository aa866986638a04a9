// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates ranges that serde attributes cannot express: sampling
//! parameters, the history window, and the endpoint scheme.

use crate::diagnostic::ConfigError;
use crate::model::ScribeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ScribeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let completion = &config.completion;

    if !(0.0..=2.0).contains(&completion.temperature) {
        errors.push(ConfigError::invalid(
            "completion.temperature",
            format!("must be between 0 and 2, got {}", completion.temperature),
        ));
    }

    if !(completion.top_p > 0.0 && completion.top_p <= 1.0) {
        errors.push(ConfigError::invalid(
            "completion.top_p",
            format!("must be in (0, 1], got {}", completion.top_p),
        ));
    }

    for (name, value) in [
        ("frequency_penalty", completion.frequency_penalty),
        ("presence_penalty", completion.presence_penalty),
    ] {
        if !(-2.0..=2.0).contains(&value) {
            errors.push(ConfigError::invalid(
                &format!("completion.{name}"),
                format!("must be between -2 and 2, got {value}"),
            ));
        }
    }

    if completion.max_tokens == 0 {
        errors.push(ConfigError::invalid("completion.max_tokens", "must be at least 1"));
    }

    if completion.timeout_secs == 0 {
        errors.push(ConfigError::invalid("completion.timeout_secs", "must be at least 1"));
    }

    if config.prompt.history_window == 0 {
        errors.push(ConfigError::invalid("prompt.history_window", "must be at least 1"));
    }

    // An empty endpoint counts as unset and is prompted for later.
    if let Some(endpoint) = config.credentials.endpoint.as_deref() {
        let endpoint = endpoint.trim();
        if !endpoint.is_empty()
            && !endpoint.starts_with("https://")
            && !endpoint.starts_with("http://")
        {
            errors.push(ConfigError::invalid(
                "credentials.endpoint",
                format!("`{endpoint}` is not an http(s) URL"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { key, .. } if key.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ScribeConfig::default()).is_ok());
    }

    #[test]
    fn out_of_range_sampling_is_reported_together() {
        let mut config = ScribeConfig::default();
        config.completion.temperature = 3.0;
        config.completion.top_p = 0.0;
        config.completion.presence_penalty = -4.0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "temperature"));
        assert!(has_message(&errors, "top_p"));
        assert!(has_message(&errors, "presence_penalty"));
    }

    #[test]
    fn zero_history_window_fails() {
        let mut config = ScribeConfig::default();
        config.prompt.history_window = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "history_window"));
    }

    #[test]
    fn endpoint_without_scheme_fails() {
        let mut config = ScribeConfig::default();
        config.credentials.endpoint = Some("my-resource.openai.azure.com".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "credentials.endpoint"));
    }

    #[test]
    fn empty_endpoint_is_treated_as_unset() {
        let mut config = ScribeConfig::default();
        config.credentials.endpoint = Some(String::new());
        assert!(validate_config(&config).is_ok());
    }
}
