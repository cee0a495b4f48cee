//! Template listing commands

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use prompt_batch_core::{
    BatchService, PaginationState, PromptTemplate, TemplateFilter, TemplateQuery,
    TEMPLATE_COLUMNS,
};
use serde::Serialize;

use crate::context::Context;
use crate::output::{or_dash, print_field, print_section, status_badge, TableDisplay};

/// Prompt template commands
#[derive(Debug, Args)]
pub struct TemplatesCommands {
    #[command(subcommand)]
    pub command: TemplatesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesSubcommand {
    /// List prompt templates
    List(ListTemplatesArgs),
}

#[derive(Debug, Args)]
pub struct ListTemplatesArgs {
    /// Filter by name (substring match)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Filter by template type
    #[arg(short = 't', long = "type")]
    pub template_type: Option<String>,

    /// Filter by status (Active or Inactive)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Templates per page, defaults to the wizard setting
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Execute template commands
pub async fn execute(ctx: &Context, cmd: TemplatesCommands) -> Result<()> {
    match cmd.command {
        TemplatesSubcommand::List(args) => list(ctx, args).await,
    }
}

/// Displayable template for output
#[derive(Debug, Serialize)]
pub struct TemplateDisplay {
    id: String,
    name: String,
    template_type: Option<String>,
    status: Option<String>,
}

impl From<PromptTemplate> for TemplateDisplay {
    fn from(t: PromptTemplate) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name,
            template_type: t.template_type,
            status: t.status,
        }
    }
}

impl TableDisplay for TemplateDisplay {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.name),
            Cell::new(or_dash(self.template_type.as_deref())),
            Cell::new(status_badge(or_dash(self.status.as_deref()))),
        ]
    }

    fn display_single(&self) {
        print_section("Prompt Template");
        print_field("ID", &self.id);
        print_field("Name", &self.name);
        print_field("Type", or_dash(self.template_type.as_deref()));
        print_field("Status", or_dash(self.status.as_deref()));
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}\t{}",
            self.id,
            self.name,
            or_dash(self.template_type.as_deref()),
            or_dash(self.status.as_deref())
        );
    }
}

fn build_query(args: &ListTemplatesArgs, default_page_size: u32) -> TemplateQuery {
    let mut filter = TemplateFilter::default();
    filter.set_name(args.name.clone());
    filter.set_template_type(args.template_type.clone());
    filter.set_status(args.status.clone());

    TemplateQuery::new(
        args.page_size.unwrap_or(default_page_size).max(1),
        args.page.max(1),
        &filter,
    )
}

async fn list(ctx: &Context, args: ListTemplatesArgs) -> Result<()> {
    let client = ctx.create_client()?;
    let query = build_query(&args, ctx.config.wizard.template_page_size);

    let spinner = ctx.output.spinner("Loading prompt templates...");
    let result = client.list_templates(&query).await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    let page = result?;

    let pagination =
        PaginationState::from_counts(query.page_size, query.page_number, page.total_count);
    let templates: Vec<TemplateDisplay> = page.templates.into_iter().map(Into::into).collect();
    let headers: Vec<&str> = TEMPLATE_COLUMNS.iter().map(|c| c.label).collect();

    ctx.output.write_page(&templates, &headers, &pagination)
}
