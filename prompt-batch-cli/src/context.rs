//! CLI execution context

use anyhow::{Context as _, Result};
use prompt_batch_sdk::{AuthConfig, PromptBatchClient, SdkConfig};
use std::time::Duration;

use crate::cli::Cli;
use crate::config::{keyring_entry, AuthMethod, CliConfig, Credentials, Profile};
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// CLI configuration
    pub config: CliConfig,

    /// Credentials storage
    pub credentials: Credentials,

    /// Active profile name
    pub profile_name: Option<String>,

    /// Active profile
    pub profile: Profile,

    /// Output writer
    pub output: OutputWriter,

    /// Verbose mode
    pub verbose: bool,

    /// API URL override
    pub api_url_override: Option<String>,

    /// API key override
    pub api_key_override: Option<String>,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = CliConfig::load()?;
        let credentials = Credentials::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring unreadable credentials file");
            Credentials::default()
        });

        let profile_name = cli
            .profile
            .clone()
            .or_else(|| config.default_profile.clone());
        let profile = config
            .get_profile(profile_name.as_deref())
            .cloned()
            .unwrap_or_default();

        let no_color = cli.no_color || !config.settings.color;
        let output = OutputWriter::new(cli.output, no_color);

        Ok(Self {
            config,
            credentials,
            profile_name,
            profile,
            output,
            verbose: cli.verbose,
            api_url_override: cli.api_url.clone(),
            api_key_override: cli.api_key.clone(),
        })
    }

    /// Name of the active profile, `default` when none is set
    pub fn active_profile(&self) -> &str {
        self.profile_name.as_deref().unwrap_or("default")
    }

    /// Get the effective API URL
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or_else(|| self.profile.api_url())
    }

    /// Get the SDK authentication configuration
    pub fn get_auth_config(&self) -> Result<AuthConfig> {
        if let Some(ref api_key) = self.api_key_override {
            return Ok(AuthConfig::ApiKey(api_key.clone()));
        }

        let profile_name = self.active_profile();

        if let Some(creds) = self.credentials.get(profile_name) {
            if let Some(ref key) = creds.api_key {
                return Ok(AuthConfig::ApiKey(key.clone()));
            }
            if let Some(ref token) = creds.token {
                return Ok(AuthConfig::BearerToken(token.clone()));
            }
        }

        match &self.profile.auth {
            AuthMethod::None => Ok(AuthConfig::None),
            AuthMethod::ApiKey { key, use_keyring } => {
                if *use_keyring {
                    Ok(AuthConfig::ApiKey(keyring_secret(profile_name, "api-key")?))
                } else {
                    Ok(AuthConfig::ApiKey(key.clone()))
                }
            }
            AuthMethod::BearerToken { token, use_keyring } => {
                if *use_keyring {
                    Ok(AuthConfig::BearerToken(keyring_secret(profile_name, "token")?))
                } else {
                    Ok(AuthConfig::BearerToken(token.clone()))
                }
            }
            AuthMethod::Basic {
                username,
                password,
                use_keyring,
            } => {
                let password = if *use_keyring {
                    keyring_secret(profile_name, "password")?
                } else {
                    password.clone()
                };
                Ok(AuthConfig::Basic {
                    username: username.clone(),
                    password,
                })
            }
        }
    }

    /// SDK configuration for the active profile and global settings
    pub fn sdk_config(&self) -> Result<SdkConfig> {
        let mut config = SdkConfig::new(self.api_url())
            .with_auth(self.get_auth_config()?)
            .with_timeout(Duration::from_secs(self.config.settings.timeout_secs))
            .with_max_retries(self.config.settings.max_retries)
            .with_preview_utterances(self.config.wizard.transcript_preview_utterances)
            .with_logging(self.verbose);

        for (name, value) in &self.profile.headers {
            config = config.with_header(name.clone(), value.clone());
        }

        Ok(config)
    }

    /// Create an SDK client
    pub fn create_client(&self) -> Result<PromptBatchClient> {
        PromptBatchClient::new(self.sdk_config()?).context("Failed to create API client")
    }

    /// Check if we have any authentication configured
    pub fn has_auth(&self) -> bool {
        if self.api_key_override.is_some() {
            return true;
        }

        if let Some(creds) = self.credentials.get(self.active_profile()) {
            if creds.api_key.is_some() || creds.token.is_some() {
                return true;
            }
        }

        !matches!(self.profile.auth, AuthMethod::None)
    }

    /// Whether output should be machine-readable
    pub fn is_structured_output(&self) -> bool {
        self.output.format() != OutputFormat::Table
    }
}

fn keyring_secret(profile: &str, kind: &str) -> Result<String> {
    keyring_entry(profile, kind)?.get_password().with_context(|| {
        format!(
            "No {} found in keyring. Run 'prompt-batch auth login --profile {}' to set credentials.",
            kind.replace('-', " "),
            profile
        )
    })
}
