// SPDX-FileCopyrightText: 2026 Scribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution, verification, and session construction.
//!
//! Each of the three credential items is read from the config store; a
//! missing or empty item is asked for once through the prompter and the
//! answer persisted to the user-level store. Nothing is validated for
//! format here. A single canary completion decides whether the set works.

use std::sync::Arc;

use scribe_core::error::ScribeError;
use scribe_core::traits::{ClientFactory, ConfigStore, CredentialPrompter, ThreadView};
use scribe_core::types::{
    ChatMessage, CompletionOptions, ConfigKey, Credentials, PromptSpec, Severity,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::session::CompletionSession;

/// Message sent by [`CredentialResolver::verify`].
pub const VERIFY_CANARY: &str = "I want to book a flight to Varanasi.";

/// Shown when the canary round-trip succeeds.
pub const CONNECTED_NOTICE: &str = "Successfully connected to Azure OpenAI API.";

/// Prompt wording for one credential item.
pub fn prompt_spec(key: ConfigKey) -> PromptSpec {
    let (title, prompt, placeholder) = match key {
        ConfigKey::ApiKey => (
            "Azure OpenAI API Key",
            "Please enter your Azure OpenAI API key.",
            "Your Azure OpenAI API Key",
        ),
        ConfigKey::Endpoint => (
            "Azure OpenAI Endpoint",
            "Please enter your Azure OpenAI endpoint.",
            "Enter your Azure OpenAI endpoint",
        ),
        ConfigKey::DeploymentName => (
            "Azure OpenAI Deployment name",
            "Please enter your Azure OpenAI Deployment name.",
            "Enter your Azure OpenAI Deployment name",
        ),
    };
    PromptSpec {
        title: title.to_string(),
        placeholder: placeholder.to_string(),
        prompt: prompt.to_string(),
        secret: key == ConfigKey::ApiKey,
    }
}

/// Warning listing the unset items, in [`ConfigKey::ALL`] order.
pub fn missing_fields_warning(fields: &[ConfigKey]) -> String {
    let names: Vec<&str> = fields.iter().map(ConfigKey::label).collect();
    format!(
        "The following configuration item(s) are not set: {}. Please go to extension settings to set them.",
        names.join(", ")
    )
}

/// Error text for a failed canary round-trip. All three fields are suspect.
pub fn verify_failure_message(upstream: &str) -> String {
    format!(
        "Error: {upstream}\n\nPlease check your API Key, Endpoint, and Deployment Name in your settings."
    )
}

/// Whatever credential values were available after prompting.
#[derive(Debug, Default, Clone)]
pub struct ResolvedCredentials {
    pub api_key: Option<SecretString>,
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
}

impl ResolvedCredentials {
    /// Unset items, in [`ConfigKey::ALL`] order.
    pub fn missing(&self) -> Vec<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| match key {
                ConfigKey::ApiKey => self.api_key.is_none(),
                ConfigKey::Endpoint => self.endpoint.is_none(),
                ConfigKey::DeploymentName => self.deployment.is_none(),
            })
            .collect()
    }

    /// The complete set, or `ConfigurationMissing` naming the gaps.
    pub fn into_credentials(self) -> Result<Credentials, ScribeError> {
        let missing = self.missing();
        match (self.api_key, self.endpoint, self.deployment) {
            (Some(api_key), Some(endpoint), Some(deployment)) => Ok(Credentials {
                api_key,
                endpoint,
                deployment,
            }),
            _ => Err(ScribeError::ConfigurationMissing { fields: missing }),
        }
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        match key {
            ConfigKey::ApiKey => self.api_key = Some(SecretString::from(value)),
            ConfigKey::Endpoint => self.endpoint = Some(value),
            ConfigKey::DeploymentName => self.deployment = Some(value),
        }
    }
}

/// Resolves, persists, and verifies the three credential items.
pub struct CredentialResolver {
    store: Arc<dyn ConfigStore>,
    prompter: Arc<dyn CredentialPrompter>,
    view: Arc<dyn ThreadView>,
}

impl CredentialResolver {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        prompter: Arc<dyn CredentialPrompter>,
        view: Arc<dyn ThreadView>,
    ) -> Self {
        Self {
            store,
            prompter,
            view,
        }
    }

    /// Reads every item, prompting once for each that is missing or empty.
    ///
    /// Entered values are written back to the store. A dismissed prompt
    /// leaves the item unset; there is no retry loop.
    pub async fn resolve(&self) -> ResolvedCredentials {
        let mut resolved = ResolvedCredentials::default();

        for key in ConfigKey::ALL {
            let stored = self
                .store
                .get(key)
                .await
                .filter(|v| !v.trim().is_empty());

            let value = match stored {
                Some(v) => Some(v),
                None => self.ask(key).await,
            };

            if let Some(v) = value {
                resolved.set(key, v);
            }
        }

        debug!(missing = ?resolved.missing(), "credentials resolved");
        resolved
    }

    async fn ask(&self, key: ConfigKey) -> Option<String> {
        let entered = self.prompter.prompt(&prompt_spec(key)).await?;
        let entered = entered.trim().to_string();
        if entered.is_empty() {
            return None;
        }

        if let Err(e) = self.store.set(key, &entered).await {
            warn!(key = %key, error = %e, "failed to persist credential");
            self.view.notify(
                Severity::Warning,
                &format!("Could not save {}: {e}", key.label()),
            );
        }

        let notice = if key == ConfigKey::ApiKey {
            format!("{} has been set.", key.label())
        } else {
            format!("{} has been set to {entered}.", key.label())
        };
        self.view.notify(Severity::Info, &notice);
        Some(entered)
    }

    /// One canary round-trip through `session`.
    pub async fn verify(&self, session: &CompletionSession) -> Result<(), ScribeError> {
        match session.complete(vec![ChatMessage::user(VERIFY_CANARY)]).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let upstream = match &e {
                    ScribeError::Provider { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                Err(ScribeError::CredentialInvalid {
                    message: verify_failure_message(&upstream),
                })
            }
        }
    }

    /// Resolve, build a client, and verify it.
    ///
    /// Warns and returns `ConfigurationMissing` when any item is still
    /// unset, without making a call. Reports a verification failure as an
    /// error naming all three items.
    pub async fn connect(
        &self,
        factory: &dyn ClientFactory,
        options: CompletionOptions,
    ) -> Result<CompletionSession, ScribeError> {
        let resolved = self.resolve().await;
        let missing = resolved.missing();
        if !missing.is_empty() {
            self.view
                .notify(Severity::Warning, &missing_fields_warning(&missing));
            return Err(ScribeError::ConfigurationMissing { fields: missing });
        }

        let credentials = resolved.into_credentials()?;
        let client = factory.build(&credentials)?;
        let session = CompletionSession::new(client, credentials.deployment.clone(), options);

        if let Err(e) = self.verify(&session).await {
            warn!(error = %e, "credential verification failed");
            if let ScribeError::CredentialInvalid { message } = &e {
                self.view.notify(Severity::Error, message);
            }
            return Err(e);
        }

        info!(
            client = session.client_name(),
            deployment = %session.deployment(),
            "connected"
        );
        self.view.notify(Severity::Info, CONNECTED_NOTICE);
        Ok(session)
    }
}
