//! Command-line argument definitions

use clap::{Parser, Subcommand};

use crate::commands::{
    auth::AuthCommands, config::ConfigCommands, preview::PreviewArgs, records::RecordsCommands,
    templates::TemplatesCommands, wizard::WizardArgs,
};
use crate::output::OutputFormat;

/// Assemble and submit prompt test batches
#[derive(Debug, Parser)]
#[command(name = "prompt-batch", version, about, long_about = None)]
pub struct Cli {
    /// Configuration profile to use
    #[arg(short, long, global = true, env = "PROMPT_BATCH_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging and request tracing
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the data service URL
    #[arg(long, global = true, env = "PROMPT_BATCH_API_URL")]
    pub api_url: Option<String>,

    /// Override the API key
    #[arg(long, global = true, env = "PROMPT_BATCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk through test type, template and record selection, then submit a batch
    Wizard(WizardArgs),

    /// Browse prompt templates
    Templates(TemplatesCommands),

    /// Browse messaging sessions, cases and voice calls
    Records(RecordsCommands),

    /// Preview how a transcript will be shown, without contacting the service
    Preview(PreviewArgs),

    /// Manage credentials
    Auth(AuthCommands),

    /// Manage configuration and profiles
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["prompt-batch", "preview", "--text", "hi", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Preview(_)));
    }
}
