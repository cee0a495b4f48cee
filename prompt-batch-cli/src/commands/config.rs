//! Configuration commands

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::{CliConfig, Profile, ENV_PREFIX};
use crate::context::Context;
use crate::output::{print_field, print_section, OutputFormat};

/// Configuration management commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration, including environment overrides
    Show,

    /// List all profiles
    Profiles,

    /// Set the default profile
    UseProfile {
        /// Profile name to use as default
        name: String,
    },

    /// Create a new profile
    CreateProfile {
        /// Profile name
        name: String,

        /// Data service URL for this profile
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Delete a profile
    DeleteProfile {
        /// Profile name to delete
        name: String,

        /// Force deletion without confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file paths
    Path,
}

/// Execute configuration commands
pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Profiles => list_profiles(ctx),
        ConfigSubcommand::UseProfile { name } => use_profile(ctx, &name),
        ConfigSubcommand::CreateProfile { name, api_url } => {
            create_profile(ctx, &name, api_url)
        }
        ConfigSubcommand::DeleteProfile { name, force } => delete_profile(ctx, &name, force),
        ConfigSubcommand::Path => show_paths(),
    }
}

fn show(ctx: &Context) -> Result<()> {
    match ctx.output.format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&ctx.config)?);
            return Ok(());
        }
        OutputFormat::Table | OutputFormat::Compact => {}
    }

    let settings = &ctx.config.settings;
    print_section("Settings");
    print_field("output_format", &settings.output_format);
    print_field("color", &settings.color.to_string());
    print_field("timeout_secs", &settings.timeout_secs.to_string());
    print_field("max_retries", &settings.max_retries.to_string());

    let wizard = &ctx.config.wizard;
    let unset = |v: &Option<String>| v.clone().unwrap_or_else(|| "not set".to_string());
    print_section("Wizard");
    print_field("template_page_size", &wizard.template_page_size.to_string());
    print_field("conversation_page_size", &wizard.conversation_page_size.to_string());
    print_field("case_page_size", &wizard.case_page_size.to_string());
    print_field("voice_call_page_size", &wizard.voice_call_page_size.to_string());
    print_field(
        "transcript_preview_utterances",
        &wizard.transcript_preview_utterances.to_string(),
    );
    print_field("default_retriever_id", &unset(&wizard.default_retriever_id));
    print_field(
        "default_faithfulness_template_id",
        &unset(&wizard.default_faithfulness_template_id),
    );
    print_field(
        "default_relevancy_template_id",
        &unset(&wizard.default_relevancy_template_id),
    );
    print_field(
        "default_context_quality_template_id",
        &unset(&wizard.default_context_quality_template_id),
    );

    print_section("Profiles");
    if ctx.config.profiles.is_empty() {
        println!("  No profiles configured");
    }
    for name in ctx.config.list_profiles() {
        let Some(profile) = ctx.config.profiles.get(name) else {
            continue;
        };
        let default_marker = if ctx.config.default_profile.as_deref() == Some(name) {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!("  [{}]{}", name, default_marker);
        println!("    api_url: {}", profile.api_url());
        println!("    auth: {}", profile.auth.describe());
        for (header, value) in &profile.headers {
            println!("    header {}: {}", header, value);
        }
    }

    println!(
        "\n{}",
        format!(
            "Environment variables such as {}__WIZARD__CASE_PAGE_SIZE override file values.",
            ENV_PREFIX
        )
        .dimmed()
    );
    Ok(())
}

fn list_profiles(ctx: &Context) -> Result<()> {
    if ctx.config.profiles.is_empty() {
        ctx.output
            .info("No profiles configured. Run 'prompt-batch auth login' to create one.");
        return Ok(());
    }

    println!("{}", "Configured profiles:".bold());
    println!();

    for name in ctx.config.list_profiles() {
        if ctx.config.default_profile.as_deref() == Some(name) {
            println!("  {} {}", "→".green(), name.green().bold());
        } else {
            println!("    {}", name);
        }
    }

    Ok(())
}

fn use_profile(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!(
            "Profile '{}' not found. Run 'prompt-batch config profiles' to list available profiles.",
            name
        );
    }

    config.set_default_profile(name);
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Now using profile '{}'", name));
    Ok(())
}

fn create_profile(ctx: &Context, name: &str, api_url: Option<String>) -> Result<()> {
    let mut config = ctx.config.clone();

    if config.profiles.contains_key(name) {
        bail!("Profile '{}' already exists", name);
    }

    config.profiles.insert(
        name.to_string(),
        Profile {
            api_url,
            ..Default::default()
        },
    );
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Created profile '{}'", name));
    Ok(())
}

fn delete_profile(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!("Profile '{}' not found", name);
    }

    if !force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete profile '{}'?", name))
            .default(false)
            .interact()
            .context("Failed to get confirmation")?;

        if !confirm {
            ctx.output.info("Cancelled");
            return Ok(());
        }
    }

    config.remove_profile(name);
    config.save().context("Failed to save configuration")?;

    let mut credentials = ctx.credentials.clone();
    if credentials.remove(name).is_some() {
        credentials.save().context("Failed to save credentials")?;
    }

    ctx.output.success(&format!("Deleted profile '{}'", name));
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("{}", "Configuration paths:".bold());
    println!();

    for (label, path) in [
        ("Config:     ", CliConfig::config_path()),
        ("Credentials:", CliConfig::credentials_path()),
    ] {
        match path {
            Ok(path) => {
                let status = if path.exists() { "✓".green() } else { "✗".red() };
                println!("  {} {} {}", label, status, path.display());
            }
            Err(e) => println!("  {} Error: {}", label, e),
        }
    }

    Ok(())
}
