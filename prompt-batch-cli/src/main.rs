//! `prompt-batch` command-line interface

mod cli;
mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", colored::Colorize::red("Error:"), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::new(&cli)?;

    match cli.command {
        Commands::Wizard(args) => commands::wizard::execute(&ctx, args).await,
        Commands::Templates(cmd) => commands::templates::execute(&ctx, cmd).await,
        Commands::Records(cmd) => commands::records::execute(&ctx, cmd).await,
        Commands::Preview(args) => commands::preview::execute(&ctx, args),
        Commands::Auth(cmd) => commands::auth::execute(&ctx, cmd).await,
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd).await,
    }
}

/// Logs go to stderr so table and JSON output stay clean on stdout.
fn init_tracing(verbose: bool) {
    // Matches every workspace crate by target prefix.
    let default_directive = if verbose {
        "prompt_batch=debug"
    } else {
        "prompt_batch=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
