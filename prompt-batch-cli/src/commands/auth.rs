//! Authentication commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use dialoguer::{Input, Password, Select};
use prompt_batch_core::BatchService;

use crate::config::{keyring_entry, AuthMethod, ProfileCredentials, DEFAULT_API_URL};
use crate::context::Context;
use crate::output::print_field;

const SECRET_KINDS: [&str; 3] = ["api-key", "token", "password"];

/// Authentication management commands
#[derive(Debug, Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthSubcommand {
    /// Store credentials for a profile
    Login {
        /// API key (otherwise asked for interactively)
        #[arg(long)]
        api_key: Option<String>,

        /// Use system keyring for secure storage
        #[arg(long)]
        use_keyring: bool,
    },

    /// Clear stored credentials
    Logout {
        /// Clear all profiles
        #[arg(long)]
        all: bool,
    },

    /// Show how the active profile authenticates
    Status,

    /// Check the credentials against the data service
    Test,
}

/// Execute authentication commands
pub async fn execute(ctx: &Context, cmd: AuthCommands) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login {
            api_key,
            use_keyring,
        } => login(ctx, api_key, use_keyring),
        AuthSubcommand::Logout { all } => logout(ctx, all),
        AuthSubcommand::Status => status(ctx),
        AuthSubcommand::Test => test_auth(ctx).await,
    }
}

fn login(ctx: &Context, api_key: Option<String>, use_keyring: bool) -> Result<()> {
    let profile_name = ctx.active_profile();
    ctx.output
        .info(&format!("Configuring authentication for profile: {}", profile_name));

    let selection = if api_key.is_some() {
        0
    } else {
        Select::new()
            .with_prompt("Select authentication method")
            .items(&["API Key", "Access Token", "Basic Auth"])
            .default(1)
            .interact()
            .context("Failed to get user selection")?
    };

    let mut config = ctx.config.clone();
    let mut credentials = ctx.credentials.clone();

    match selection {
        0 => {
            let key = match api_key {
                Some(k) => k,
                None => Password::new()
                    .with_prompt("Enter your API key")
                    .interact()
                    .context("Failed to get API key")?,
            };

            if use_keyring {
                store_secret(profile_name, "api-key", &key)?;
                config.get_or_create_profile(profile_name).auth = AuthMethod::ApiKey {
                    key: String::new(),
                    use_keyring: true,
                };
                ctx.output.success("API key stored in system keyring");
            } else {
                credentials.set(profile_name, ProfileCredentials::api_key(key));
                ctx.output.success("API key stored in credentials file");
            }
        }
        1 => {
            let token = Password::new()
                .with_prompt("Enter your access token")
                .interact()
                .context("Failed to get token")?;

            if use_keyring {
                store_secret(profile_name, "token", &token)?;
                config.get_or_create_profile(profile_name).auth = AuthMethod::BearerToken {
                    token: String::new(),
                    use_keyring: true,
                };
                ctx.output.success("Token stored in system keyring");
            } else {
                credentials.set(profile_name, ProfileCredentials::token(token));
                ctx.output.success("Token stored in credentials file");
            }
        }
        _ => {
            let username: String = Input::new()
                .with_prompt("Enter username")
                .interact_text()
                .context("Failed to get username")?;

            let password = Password::new()
                .with_prompt("Enter password")
                .interact()
                .context("Failed to get password")?;

            let password = if use_keyring {
                store_secret(profile_name, "password", &password)?;
                ctx.output.success("Password stored in system keyring");
                String::new()
            } else {
                password
            };
            config.get_or_create_profile(profile_name).auth = AuthMethod::Basic {
                username,
                password,
                use_keyring,
            };
        }
    }

    let current_url = config
        .get_profile(Some(profile_name))
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let api_url: String = Input::new()
        .with_prompt("Data service URL")
        .default(current_url)
        .interact_text()
        .context("Failed to get API URL")?;
    config.get_or_create_profile(profile_name).api_url = Some(api_url);

    if config.default_profile.is_none() {
        config.set_default_profile(profile_name);
        ctx.output
            .info(&format!("Set '{}' as default profile", profile_name));
    }

    config.save().context("Failed to save configuration")?;
    credentials.save().context("Failed to save credentials")?;

    tracing::info!(profile = profile_name, use_keyring, "Credentials stored");
    ctx.output
        .success(&format!("Successfully configured profile '{}'", profile_name));
    Ok(())
}

fn logout(ctx: &Context, all: bool) -> Result<()> {
    let mut credentials = ctx.credentials.clone();
    let mut config = ctx.config.clone();

    if all {
        credentials.profiles.clear();
        for profile_name in config.list_profiles() {
            clear_keyring_entries(profile_name);
        }
        for profile in config.profiles.values_mut() {
            profile.auth = AuthMethod::None;
        }

        credentials.save().context("Failed to save credentials")?;
        config.save().context("Failed to save configuration")?;
        ctx.output.success("Logged out from all profiles");
    } else {
        let profile_name = ctx.active_profile();

        credentials.remove(profile_name);
        clear_keyring_entries(profile_name);
        if let Some(p) = config.profiles.get_mut(profile_name) {
            p.auth = AuthMethod::None;
        }

        credentials.save().context("Failed to save credentials")?;
        config.save().context("Failed to save configuration")?;
        ctx.output
            .success(&format!("Logged out from profile '{}'", profile_name));
    }

    Ok(())
}

fn store_secret(profile: &str, kind: &str, secret: &str) -> Result<()> {
    keyring_entry(profile, kind)?
        .set_password(secret)
        .with_context(|| format!("Failed to store {} in keyring", kind.replace('-', " ")))
}

fn clear_keyring_entries(profile: &str) {
    for kind in SECRET_KINDS {
        // Missing entries are fine.
        if let Ok(entry) = keyring_entry(profile, kind) {
            let _ = entry.delete_credential();
        }
    }
}

fn status(ctx: &Context) -> Result<()> {
    let profile_name = ctx.active_profile();
    print_field("Profile", profile_name);
    print_field("Data service", ctx.api_url());

    match ctx.config.profiles.get(profile_name) {
        Some(profile) => {
            print_field("Auth", &profile.auth.describe());
            if ctx.credentials.get(profile_name).is_some() {
                print_field("Credentials", "Found in credentials file");
            }
            if ctx.config.default_profile.as_deref() == Some(profile_name) {
                print_field("Default", "Yes");
            }
        }
        None if ctx.has_auth() => print_field("Auth", "From command line or environment"),
        None => ctx.output.warning(&format!(
            "Profile not found. Run 'prompt-batch auth login --profile {}' to configure.",
            profile_name
        )),
    }

    Ok(())
}

async fn test_auth(ctx: &Context) -> Result<()> {
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner("Testing authentication...");
    let result = client.list_status_options().await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    match result {
        Ok(options) => {
            ctx.output.success("Authentication successful!");
            ctx.output.info(&format!(
                "Connected to: {} ({} status options available)",
                ctx.api_url(),
                options.len()
            ));
            Ok(())
        }
        Err(err) => {
            ctx.output
                .error(&format!("Authentication failed: {}", err));
            Err(err.into())
        }
    }
}
