//! Offline transcript preview

use anyhow::{bail, Context as _, Result};
use clap::Args;
use prompt_batch_core::segment_transcript;
use serde::Serialize;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use crate::context::Context;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// File holding the raw transcript; reads stdin when omitted
    #[arg(conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Transcript text given inline
    #[arg(long)]
    pub text: Option<String>,

    /// Utterances to keep, defaults to the wizard setting
    #[arg(short, long)]
    pub utterances: Option<usize>,
}

#[derive(Debug, Serialize)]
struct PreviewOutput {
    utterances: usize,
    preview: String,
}

/// Execute the preview command
pub fn execute(ctx: &Context, args: PreviewArgs) -> Result<()> {
    let transcript = read_transcript(&args)?;
    let utterances = args
        .utterances
        .unwrap_or(ctx.config.wizard.transcript_preview_utterances);
    let preview = segment_transcript(Some(&transcript), utterances);

    match ctx.output.format() {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&PreviewOutput { utterances, preview })?
        ),
        OutputFormat::Yaml => print!(
            "{}",
            serde_yaml::to_string(&PreviewOutput { utterances, preview })?
        ),
        OutputFormat::Table | OutputFormat::Compact => println!("{}", preview),
    }
    Ok(())
}

fn read_transcript(args: &PreviewArgs) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript from {:?}", path));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No transcript given. Pass a file, --text, or pipe it on stdin.");
    }
    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("Failed to read transcript from stdin")?;
    Ok(buffer)
}
