//! Source record listing commands

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use comfy_table::Cell;
use prompt_batch_core::{
    BatchService, DataRecord, PaginationState, RecordFilter, RecordKind, RecordLayout,
    RecordQuery,
};
use serde::Serialize;

use crate::context::Context;
use crate::output::{format_timestamp, or_dash, print_field, print_section, status_badge, TableDisplay};

/// Source record commands
#[derive(Debug, Args)]
pub struct RecordsCommands {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordsSubcommand {
    /// List messaging sessions, cases or voice calls
    List(ListRecordsArgs),
}

/// Record kind as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Messaging sessions with transcript previews
    Session,
    /// Support cases
    Case,
    /// Voice calls
    VoiceCall,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Session => RecordKind::ConversationSession,
            KindArg::Case => RecordKind::Case,
            KindArg::VoiceCall => RecordKind::VoiceCall,
        }
    }
}

#[derive(Debug, Args)]
pub struct ListRecordsArgs {
    /// Which records to list
    #[arg(short, long, value_enum, default_value_t = KindArg::Session)]
    pub kind: KindArg,

    /// Filter by session name or case subject
    #[arg(short, long)]
    pub name: Option<String>,

    /// Filter by status
    #[arg(short, long)]
    pub status: Option<String>,

    /// Earliest creation date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest creation date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Records per page, defaults to the wizard setting for the kind
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Execute record commands
pub async fn execute(ctx: &Context, cmd: RecordsCommands) -> Result<()> {
    match cmd.command {
        RecordsSubcommand::List(args) => list(ctx, args).await,
    }
}

/// Displayable record for output
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RecordDisplay(pub DataRecord);

impl TableDisplay for RecordDisplay {
    fn to_row(&self) -> Vec<Cell> {
        match &self.0 {
            DataRecord::ConversationSession(session) => vec![
                Cell::new(&session.name),
                Cell::new(&session.transcript_preview),
            ],
            DataRecord::Case(case) => vec![
                Cell::new(or_dash(case.case_number.as_deref())),
                Cell::new(or_dash(case.subject.as_deref())),
                Cell::new(status_badge(or_dash(case.status.as_deref()))),
                Cell::new(or_dash(case.priority.as_deref())),
                Cell::new(
                    case.created_date
                        .as_ref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ],
            DataRecord::VoiceCall(call) => vec![
                Cell::new(or_dash(call.name.as_deref())),
                Cell::new(or_dash(call.call_type.as_deref())),
                Cell::new(
                    call.call_start_date_time
                        .as_ref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(
                    call.call_duration_in_seconds
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(or_dash(call.from_phone_number.as_deref())),
                Cell::new(or_dash(call.to_phone_number.as_deref())),
            ],
        }
    }

    fn display_single(&self) {
        print_section(self.0.kind().record_type_label());
        print_field("ID", self.0.id().as_str());
        match &self.0 {
            DataRecord::ConversationSession(session) => {
                print_field("Name", &session.name);
                print_field("Link", &session.detail_path());
                print_section("Transcript Preview");
                println!("  {}", session.transcript_preview);
            }
            DataRecord::Case(case) => {
                print_field("Case Number", or_dash(case.case_number.as_deref()));
                print_field("Subject", or_dash(case.subject.as_deref()));
                print_field("Status", or_dash(case.status.as_deref()));
                print_field("Priority", or_dash(case.priority.as_deref()));
            }
            DataRecord::VoiceCall(call) => {
                print_field("Name", or_dash(call.name.as_deref()));
                print_field("Call Type", or_dash(call.call_type.as_deref()));
                print_field("From", or_dash(call.from_phone_number.as_deref()));
                print_field("To", or_dash(call.to_phone_number.as_deref()));
            }
        }
    }

    fn display_compact(&self) {
        println!("{}\t{}", self.0.id(), self.0.display_name());
    }
}

fn build_query(ctx_page_size: u32, args: &ListRecordsArgs) -> Result<RecordQuery> {
    let kind = RecordKind::from(args.kind);
    let layout = RecordLayout::for_kind(kind);

    let mut filter = RecordFilter::default();
    if layout.filters.name_label.is_some() {
        filter.set_name_or_subject(args.name.clone());
    } else if args.name.is_some() {
        tracing::warn!(kind = %kind, "Name filter is not available for this record kind; ignoring it");
    }
    if layout.filters.status {
        filter.set_status(args.status.clone());
    }
    if layout.filters.date_range {
        filter.set_date_range(args.from, args.to);
    }
    filter.validate()?;

    Ok(RecordQuery::new(
        kind,
        args.page_size.unwrap_or(ctx_page_size).max(1),
        args.page.max(1),
        &filter,
    ))
}

async fn list(ctx: &Context, args: ListRecordsArgs) -> Result<()> {
    let kind = RecordKind::from(args.kind);
    let query = build_query(ctx.config.wizard.page_size_for(kind), &args)?;
    let client = ctx.create_client()?;

    let spinner = ctx.output.spinner(&kind.loading_message());
    let result = client.list_records(&query).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let page = result?;

    let pagination =
        PaginationState::from_counts(query.page_size, query.page_number, page.total_count);
    let records: Vec<RecordDisplay> = page.records.into_iter().map(RecordDisplay).collect();

    ctx.output
        .write_page(&records, &RecordLayout::for_kind(kind).headers(), &pagination)
}
