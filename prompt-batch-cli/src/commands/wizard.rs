//! Interactive prompt test wizard

use anyhow::{bail, Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use colored::Colorize;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use prompt_batch_core::{
    DataRecord, PaginationState, PromptTemplate, QualityMetric, RecordId, RecordKind,
    TemplateAction, TemplateFilter, TemplateId, TestType, WizardStep, WorkSummarySource,
    TEMPLATE_COLUMNS,
};
use prompt_batch_workflow::PromptTestWizard;
use std::future::Future;
use std::sync::Arc;

use crate::commands::records::RecordDisplay;
use crate::commands::templates::TemplateDisplay;
use crate::context::Context;
use crate::output::{
    build_table, or_dash, print_field, print_page_footer, print_section, severity_badge,
};

#[derive(Debug, Args)]
pub struct WizardArgs {
    /// Start with this test type already chosen
    #[arg(short, long, value_enum)]
    pub test_type: Option<TestTypeArg>,
}

/// Test type as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestTypeArg {
    ServiceReplies,
    CaseSummary,
    WorkSummary,
}

impl From<TestTypeArg> for TestType {
    fn from(arg: TestTypeArg) -> Self {
        match arg {
            TestTypeArg::ServiceReplies => TestType::ServiceReplies,
            TestTypeArg::CaseSummary => TestType::CaseSummary,
            TestTypeArg::WorkSummary => TestType::WorkSummary,
        }
    }
}

const LOADING_TEMPLATES: &str = "Loading prompt templates...";

enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum TemplateMenu {
    Pick,
    NameFilter,
    TypeFilter,
    StatusFilter,
    ClearFilters,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    Reload,
    Retriever,
    Grounding,
    ToggleQuality,
    Continue,
    Back,
    StartOver,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum RecordMenu {
    Choose,
    SelectAll,
    ClearSelection,
    QuickSearch,
    NameFilter,
    StatusFilter,
    DateRange,
    ClearFilters,
    SwitchSource(WorkSummarySource),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    Reload,
    Submit,
    Back,
    StartOver,
    Quit,
}

/// Run the wizard until the operator quits
pub async fn execute(ctx: &Context, args: WizardArgs) -> Result<()> {
    if ctx.is_structured_output() {
        bail!("The wizard is interactive and only supports table output");
    }
    if !console::Term::stdout().is_term() {
        bail!("The wizard needs an interactive terminal");
    }

    let client = ctx.create_client()?;
    let mut wizard = PromptTestWizard::new(Arc::new(client), ctx.config.wizard.clone());

    if let Err(err) = with_spinner(ctx, "Loading status options...", wizard.initialize()).await {
        ctx.output.warning(&err.to_string());
    }

    if let Some(test_type) = args.test_type {
        wizard.select_test_type(test_type.into());
        let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.continue_to_templates()).await;
        report(ctx, result);
    }

    loop {
        let flow = match wizard.step() {
            WizardStep::TestTypeSelection => test_type_step(ctx, &mut wizard).await?,
            WizardStep::TemplateSelection => template_step(ctx, &mut wizard).await?,
            WizardStep::RecordSelection => record_step(ctx, &mut wizard).await?,
        };
        if let Flow::Quit = flow {
            break;
        }
    }

    Ok(())
}

// ===== Step 1 =====

async fn test_type_step(ctx: &Context, wizard: &mut PromptTestWizard) -> Result<Flow> {
    print_section(&format!(
        "Step {}: {}",
        WizardStep::TestTypeSelection.number(),
        WizardStep::TestTypeSelection.label()
    ));

    let mut options: Vec<(String, Option<TestType>)> = TestType::ALL
        .iter()
        .map(|t| (format!("{}  {}", t.label(), t.description().dimmed()), Some(*t)))
        .collect();
    options.push(("Quit".to_string(), None));

    let Some(test_type) = choose("Select the type of prompt test", &options)? else {
        return Ok(Flow::Quit);
    };

    wizard.select_test_type(test_type);
    let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.continue_to_templates()).await;
    report(ctx, result);
    Ok(Flow::Continue)
}

// ===== Step 2 =====

async fn template_step(ctx: &Context, wizard: &mut PromptTestWizard) -> Result<Flow> {
    let Some(test_type) = wizard.test_type() else {
        wizard.reset();
        return Ok(Flow::Continue);
    };

    print_section(&format!(
        "Step {}: {} ({})",
        WizardStep::TemplateSelection.number(),
        WizardStep::TemplateSelection.label(),
        test_type
    ));
    show_template_selection(wizard, test_type);
    show_template_listing(wizard);

    let model = wizard.templates();
    let pagination = *model.pagination();
    let mut options: Vec<(String, TemplateMenu)> = Vec::new();
    if !model.templates().is_empty() {
        options.push(("Select a template".to_string(), TemplateMenu::Pick));
    }
    options.push(("Filter by name".to_string(), TemplateMenu::NameFilter));
    if model.is_type_filter_enabled() {
        options.push(("Filter by template type".to_string(), TemplateMenu::TypeFilter));
    }
    options.push(("Filter by status".to_string(), TemplateMenu::StatusFilter));
    if !model.filter().is_empty() {
        options.push(("Clear filters".to_string(), TemplateMenu::ClearFilters));
    }
    push_paging(
        &mut options,
        &pagination,
        [
            TemplateMenu::NextPage,
            TemplateMenu::PreviousPage,
            TemplateMenu::FirstPage,
            TemplateMenu::LastPage,
        ],
    );
    options.push(("Reload".to_string(), TemplateMenu::Reload));
    if test_type.requires_retriever() {
        options.push(("Set retriever ID".to_string(), TemplateMenu::Retriever));
    }
    if model.selection().shows_knowledge_grounding() {
        options.push(("Knowledge grounding".to_string(), TemplateMenu::Grounding));
    }
    let quality_label = if model.quality().enabled {
        "Disable quality assessment"
    } else {
        "Enable quality assessment"
    };
    options.push((quality_label.to_string(), TemplateMenu::ToggleQuality));
    options.push((
        test_type.continue_to_records_label().to_string(),
        TemplateMenu::Continue,
    ));
    options.push(("Back to test types".to_string(), TemplateMenu::Back));
    options.push(("Start over".to_string(), TemplateMenu::StartOver));
    options.push(("Quit".to_string(), TemplateMenu::Quit));

    match choose("What next?", &options)? {
        TemplateMenu::Pick => pick_template(ctx, wizard, test_type)?,
        TemplateMenu::NameFilter => {
            let current = wizard.templates().filter().name.clone();
            let name = prompt_text("Template name contains", current)?;
            report(ctx, wizard.set_template_name_filter(name));
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.apply_template_filters()).await;
            report(ctx, result);
        }
        TemplateMenu::TypeFilter => {
            let mut types: Vec<(String, Option<String>)> = vec![("All types".to_string(), None)];
            types.extend(
                wizard
                    .templates()
                    .template_type_options()
                    .iter()
                    .map(|o| (o.label.clone(), Some(o.value.clone()))),
            );
            let template_type = choose("Template type", &types)?;
            let result = with_spinner(
                ctx,
                LOADING_TEMPLATES,
                wizard.set_template_type_filter(template_type),
            )
            .await;
            report(ctx, result);
        }
        TemplateMenu::StatusFilter => {
            let statuses: Vec<(String, Option<String>)> = TemplateFilter::status_options()
                .into_iter()
                .map(|o| (o.label, Some(o.value)))
                .collect();
            let status = choose("Status", &statuses)?;
            report(ctx, wizard.set_template_status_filter(status));
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.apply_template_filters()).await;
            report(ctx, result);
        }
        TemplateMenu::ClearFilters => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.clear_template_filters()).await;
            report(ctx, result);
        }
        TemplateMenu::NextPage => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.next_template_page()).await;
            report(ctx, result);
        }
        TemplateMenu::PreviousPage => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.previous_template_page()).await;
            report(ctx, result);
        }
        TemplateMenu::FirstPage => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.first_template_page()).await;
            report(ctx, result);
        }
        TemplateMenu::LastPage => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.last_template_page()).await;
            report(ctx, result);
        }
        TemplateMenu::Reload => {
            let result = with_spinner(ctx, LOADING_TEMPLATES, wizard.reload_templates()).await;
            report(ctx, result);
        }
        TemplateMenu::Retriever => {
            let current = wizard.templates().selection().retriever_id.clone();
            let retriever_id = prompt_text("Retriever ID", current)?;
            report(ctx, wizard.set_retriever_id(retriever_id));
        }
        TemplateMenu::Grounding => set_grounding(ctx, wizard, test_type)?,
        TemplateMenu::ToggleQuality => {
            let enabled = !wizard.templates().quality().enabled;
            report(ctx, wizard.set_quality_assessment_enabled(enabled));
        }
        TemplateMenu::Continue => {
            let message = wizard.records().kind().loading_message();
            let result = with_spinner(ctx, &message, wizard.continue_to_records()).await;
            report(ctx, result);
        }
        TemplateMenu::Back => report(ctx, wizard.back()),
        TemplateMenu::StartOver => wizard.reset(),
        TemplateMenu::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn show_template_selection(wizard: &PromptTestWizard, test_type: TestType) {
    let model = wizard.templates();
    let selection = model.selection();
    let name_of = |t: &Option<PromptTemplate>| {
        t.as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "Not selected".dimmed().to_string())
    };

    print_field(test_type.primary_template_label(), &name_of(&selection.primary));
    if let Some(label) = test_type.secondary_template_label() {
        print_field(label, &name_of(&selection.secondary));
    }
    if test_type.requires_retriever() {
        print_field(
            "Retriever ID",
            selection.retriever_id.as_deref().unwrap_or("Not set"),
        );
    }
    if selection.shows_knowledge_grounding() {
        let on_off = |on: bool| if on { "on" } else { "off" };
        let mut grounding = format!(
            "{}: {}",
            test_type.primary_template_label(),
            on_off(selection.primary_uses_knowledge_grounding)
        );
        if let Some(label) = test_type.secondary_template_label() {
            grounding.push_str(&format!(
                ", {}: {}",
                label,
                on_off(selection.secondary_uses_knowledge_grounding)
            ));
        }
        print_field("Knowledge Grounding", &grounding);
    }

    let quality = model.quality();
    let status = quality.status();
    print_field(
        "Quality Assessment",
        &severity_badge(&status.label, status.severity),
    );
    if quality.enabled {
        for metric in QualityMetric::ALL {
            let template = quality.template_id(metric).map(|id| {
                model
                    .find(id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| id.to_string())
            });
            print_field(
                &format!("  {}", metric.label()),
                template.as_deref().unwrap_or("Not set"),
            );
        }
    }
}

fn show_template_listing(wizard: &PromptTestWizard) {
    let model = wizard.templates();
    if model.templates().is_empty() {
        println!("\n{}", "No templates found.".dimmed());
        return;
    }

    let rows: Vec<TemplateDisplay> = model.templates().iter().cloned().map(Into::into).collect();
    let headers: Vec<&str> = TEMPLATE_COLUMNS.iter().map(|c| c.label).collect();
    println!("\n{}", build_table(&rows, &headers));
    print_page_footer(model.pagination());
}

fn pick_template(ctx: &Context, wizard: &mut PromptTestWizard, test_type: TestType) -> Result<()> {
    let model = wizard.templates();
    let mut templates: Vec<(String, Option<TemplateId>)> = model
        .templates()
        .iter()
        .map(|t| (template_label(wizard, test_type, t), Some(t.id.clone())))
        .collect();
    templates.push(("Cancel".to_string(), None));

    let Some(id) = choose("Template", &templates)? else {
        return Ok(());
    };

    let mut actions: Vec<(String, Option<TemplateAction>)> = test_type
        .template_actions()
        .iter()
        .map(|o| (o.label.to_string(), Some(o.action)))
        .collect();
    if model.quality().enabled {
        for metric in QualityMetric::ALL {
            actions.push((
                format!("Use for {}", metric.label()),
                Some(metric_action(metric)),
            ));
        }
    }
    actions.push(("Cancel".to_string(), None));

    if let Some(action) = choose("Use this template as", &actions)? {
        report(ctx, wizard.apply_template_action(action, &id));
    }
    Ok(())
}

/// Template name tagged with every slot it currently fills
fn template_label(wizard: &PromptTestWizard, test_type: TestType, template: &PromptTemplate) -> String {
    let model = wizard.templates();
    let selection = model.selection();
    let mut roles: Vec<&str> = Vec::new();

    if selection.primary.as_ref().map(|t| &t.id) == Some(&template.id) {
        roles.push(test_type.primary_template_label());
    }
    if let Some(label) = test_type.secondary_template_label() {
        if selection.secondary.as_ref().map(|t| &t.id) == Some(&template.id) {
            roles.push(label);
        }
    }
    for metric in QualityMetric::ALL {
        if model.quality().template_id(metric) == Some(&template.id) {
            roles.push(metric.label());
        }
    }

    if roles.is_empty() {
        template.name.clone()
    } else {
        format!("{} [{}]", template.name, roles.join(", ").green())
    }
}

fn metric_action(metric: QualityMetric) -> TemplateAction {
    match metric {
        QualityMetric::Faithfulness => TemplateAction::SelectFaithfulness,
        QualityMetric::Relevancy => TemplateAction::SelectRelevancy,
        QualityMetric::ContextQuality => TemplateAction::SelectContextQuality,
    }
}

fn set_grounding(ctx: &Context, wizard: &mut PromptTestWizard, test_type: TestType) -> Result<()> {
    let selection = wizard.templates().selection().clone();

    if selection.primary.is_some() {
        let enabled = Confirm::new()
            .with_prompt(format!(
                "Use knowledge grounding for the {}?",
                test_type.primary_template_label()
            ))
            .default(selection.primary_uses_knowledge_grounding)
            .interact()
            .context("Failed to read confirmation")?;
        report(ctx, wizard.set_primary_knowledge_grounding(enabled));
    }

    if let (Some(label), Some(_)) = (test_type.secondary_template_label(), &selection.secondary) {
        let enabled = Confirm::new()
            .with_prompt(format!("Use knowledge grounding for the {}?", label))
            .default(selection.secondary_uses_knowledge_grounding)
            .interact()
            .context("Failed to read confirmation")?;
        report(ctx, wizard.set_secondary_knowledge_grounding(enabled));
    }

    Ok(())
}

// ===== Step 3 =====

async fn record_step(ctx: &Context, wizard: &mut PromptTestWizard) -> Result<Flow> {
    let Some(test_type) = wizard.test_type() else {
        wizard.reset();
        return Ok(Flow::Continue);
    };

    let records = wizard.records();
    let kind = records.kind();
    let layout = *records.layout();

    print_section(&kind.step_title());
    println!("{}", kind.selection_description(test_type).dimmed());
    if test_type == TestType::WorkSummary {
        print_field("Source", records.source().label());
    }
    show_record_filters(wizard);
    show_record_listing(wizard);

    let records = wizard.records();
    let pagination = *records.pagination();
    let selected = records.selected_ids().len();
    let has_rows = !records.visible_records().is_empty();

    let mut options: Vec<(String, RecordMenu)> = Vec::new();
    if has_rows {
        options.push(("Choose records on this page".to_string(), RecordMenu::Choose));
        options.push(("Select all visible".to_string(), RecordMenu::SelectAll));
    }
    if selected > 0 {
        options.push(("Clear selection".to_string(), RecordMenu::ClearSelection));
    }
    options.push((kind.quick_search_label().to_string(), RecordMenu::QuickSearch));
    if let Some(label) = layout.filters.name_label {
        options.push((format!("Filter by {}", label.to_lowercase()), RecordMenu::NameFilter));
    }
    if layout.filters.status {
        options.push(("Filter by status".to_string(), RecordMenu::StatusFilter));
    }
    if layout.filters.date_range {
        options.push(("Filter by date range".to_string(), RecordMenu::DateRange));
    }
    if !records.filter().is_empty() {
        options.push(("Clear filters".to_string(), RecordMenu::ClearFilters));
    }
    if test_type == TestType::WorkSummary {
        for source in WorkSummarySource::ALL {
            if source != records.source() {
                options.push((
                    format!("Switch to {}", source.label()),
                    RecordMenu::SwitchSource(source),
                ));
            }
        }
    }
    push_paging(
        &mut options,
        &pagination,
        [
            RecordMenu::NextPage,
            RecordMenu::PreviousPage,
            RecordMenu::FirstPage,
            RecordMenu::LastPage,
        ],
    );
    options.push(("Reload".to_string(), RecordMenu::Reload));
    options.push((
        format!(
            "Create test batch ({} record{} selected)",
            selected,
            if selected == 1 { "" } else { "s" }
        ),
        RecordMenu::Submit,
    ));
    options.push(("Back to templates".to_string(), RecordMenu::Back));
    options.push(("Start over".to_string(), RecordMenu::StartOver));
    options.push(("Quit".to_string(), RecordMenu::Quit));

    let loading = kind.loading_message();
    match choose("What next?", &options)? {
        RecordMenu::Choose => choose_records(ctx, wizard)?,
        RecordMenu::SelectAll => report(ctx, wizard.select_all_visible()),
        RecordMenu::ClearSelection => report(ctx, wizard.clear_selection()),
        RecordMenu::QuickSearch => {
            let current = wizard.records().quick_search().to_string();
            let query = prompt_text(kind.quick_search_label(), Some(current))?;
            report(ctx, wizard.set_quick_search(query.unwrap_or_default()));
        }
        RecordMenu::NameFilter => {
            let current = wizard.records().filter().name_or_subject.clone();
            let label = layout.filters.name_label.unwrap_or("Name");
            let value = prompt_text(label, current)?;
            report(ctx, wizard.set_record_name_filter(value));
            let result = with_spinner(ctx, &loading, wizard.apply_record_filters()).await;
            report(ctx, result);
        }
        RecordMenu::StatusFilter => {
            let status = prompt_record_status(wizard)?;
            report(ctx, wizard.set_record_status_filter(status));
            let result = with_spinner(ctx, &loading, wizard.apply_record_filters()).await;
            report(ctx, result);
        }
        RecordMenu::DateRange => {
            let filter = wizard.records().filter().clone();
            let start = prompt_date("Start date", filter.start_date)?;
            let end = prompt_date("End date", filter.end_date)?;
            report(ctx, wizard.set_record_date_range(start, end));
            let result = with_spinner(ctx, &loading, wizard.apply_record_filters()).await;
            report(ctx, result);
        }
        RecordMenu::ClearFilters => {
            let result = with_spinner(ctx, &loading, wizard.clear_record_filters()).await;
            report(ctx, result);
        }
        RecordMenu::SwitchSource(source) => {
            let message = RecordKind::resolve(test_type, source).loading_message();
            let result = with_spinner(ctx, &message, wizard.select_work_summary_source(source)).await;
            report(ctx, result);
        }
        RecordMenu::NextPage => {
            let result = with_spinner(ctx, &loading, wizard.next_record_page()).await;
            report(ctx, result);
        }
        RecordMenu::PreviousPage => {
            let result = with_spinner(ctx, &loading, wizard.previous_record_page()).await;
            report(ctx, result);
        }
        RecordMenu::FirstPage => {
            let result = with_spinner(ctx, &loading, wizard.first_record_page()).await;
            report(ctx, result);
        }
        RecordMenu::LastPage => {
            let result = with_spinner(ctx, &loading, wizard.last_record_page()).await;
            report(ctx, result);
        }
        RecordMenu::Reload => {
            let result = with_spinner(ctx, &loading, wizard.reload_records()).await;
            report(ctx, result);
        }
        RecordMenu::Submit => submit(ctx, wizard, test_type).await?,
        RecordMenu::Back => report(ctx, wizard.back()),
        RecordMenu::StartOver => wizard.reset(),
        RecordMenu::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn show_record_filters(wizard: &PromptTestWizard) {
    let records = wizard.records();
    let filter = records.filter();

    if let (Some(label), Some(value)) = (records.layout().filters.name_label, &filter.name_or_subject) {
        print_field(label, value);
    }
    if let Some(ref status) = filter.status {
        print_field("Status", status);
    }
    if filter.start_date.is_some() || filter.end_date.is_some() {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "any".to_string());
        print_field(
            "Created",
            &format!("{} to {}", date(filter.start_date), date(filter.end_date)),
        );
    }
    if !records.quick_search().is_empty() {
        print_field(records.kind().quick_search_label(), records.quick_search());
    }
}

fn show_record_listing(wizard: &PromptTestWizard) {
    let records = wizard.records();
    let visible: Vec<RecordDisplay> = records
        .visible_records()
        .into_iter()
        .cloned()
        .map(RecordDisplay)
        .collect();

    if visible.is_empty() {
        println!("\n{}", "No records found.".dimmed());
    } else {
        println!("\n{}", build_table(&visible, &records.layout().headers()));
        print_page_footer(records.pagination());
    }
    print_field("Selected", &records.selected_ids().len().to_string());
}

fn choose_records(ctx: &Context, wizard: &mut PromptTestWizard) -> Result<()> {
    let records = wizard.records();
    let visible: Vec<(RecordId, String, bool)> = records
        .visible_records()
        .into_iter()
        .map(|r| (r.id().clone(), record_label(r), records.is_selected(r.id())))
        .collect();

    let labels: Vec<&str> = visible.iter().map(|(_, label, _)| label.as_str()).collect();
    let defaults: Vec<bool> = visible.iter().map(|(_, _, selected)| *selected).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Space toggles a record, Enter confirms")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("Failed to read record selection")?;

    for (index, (id, _, was_selected)) in visible.iter().enumerate() {
        let wanted = chosen.contains(&index);
        if wanted && !was_selected {
            report(ctx, wizard.select_record(id));
        } else if !wanted && *was_selected {
            report(ctx, wizard.deselect_record(id));
        }
    }
    Ok(())
}

fn record_label(record: &DataRecord) -> String {
    match record {
        DataRecord::ConversationSession(session) => session.name.clone(),
        DataRecord::Case(case) => format!(
            "{}  {}",
            or_dash(case.case_number.as_deref()),
            or_dash(case.subject.as_deref())
        ),
        DataRecord::VoiceCall(call) => format!(
            "{}  ({})",
            or_dash(call.name.as_deref()),
            or_dash(call.call_type.as_deref())
        ),
    }
}

/// Status picked from the service vocabulary, or typed when none was loaded
fn prompt_record_status(wizard: &PromptTestWizard) -> Result<Option<String>> {
    let vocabulary = &wizard.state().status_options;
    if vocabulary.is_empty() {
        let current = wizard.records().filter().status.clone();
        return prompt_text("Status", current);
    }

    let mut statuses: Vec<(String, Option<String>)> = vec![("All Status".to_string(), None)];
    statuses.extend(
        vocabulary
            .iter()
            .map(|o| (o.label.clone(), Some(o.value.clone()))),
    );
    choose("Status", &statuses)
}

async fn submit(ctx: &Context, wizard: &mut PromptTestWizard, test_type: TestType) -> Result<()> {
    let count = wizard.records().selected_ids().len();
    if count > 0 {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Create a {} test batch from {} record{}?",
                test_type,
                count,
                if count == 1 { "" } else { "s" }
            ))
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            return Ok(());
        }
    }

    match with_spinner(ctx, "Creating test batch...", wizard.submit()).await {
        Ok(result) => {
            let summary = result.summary();
            let mut lines = summary.lines();
            if let Some(headline) = lines.next() {
                ctx.output.success(headline);
            }
            for line in lines {
                println!("  {}", line);
            }
        }
        Err(err) => report::<()>(ctx, Err(err)),
    }
    Ok(())
}

// ===== Prompts =====

fn choose<T: Clone>(prompt: &str, options: &[(String, T)]) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| label.as_str()).collect();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to get user selection")?;

    options
        .get(index)
        .map(|(_, value)| value.clone())
        .context("Selection out of range")
}

/// Paging entries in next, previous, first, last order
fn push_paging<T: Copy>(
    options: &mut Vec<(String, T)>,
    pagination: &PaginationState,
    [next, previous, first, last]: [T; 4],
) {
    if !pagination.show_controls() {
        return;
    }
    if pagination.has_next() {
        options.push(("Next page".to_string(), next));
    }
    if pagination.has_previous() {
        options.push(("Previous page".to_string(), previous));
    }
    options.push(("First page".to_string(), first));
    options.push(("Last page".to_string(), last));
}

/// Free text input; blank clears the value
fn prompt_text(prompt: &str, current: Option<String>) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(format!("{} (blank to clear)", prompt))
        .with_initial_text(current.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn prompt_date(prompt: &str, current: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let value: String = Input::new()
        .with_prompt(format!("{} (YYYY-MM-DD, blank for none)", prompt))
        .with_initial_text(current.map(|d| d.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            parse_optional_date(input)
                .map(|_| ())
                .map_err(|_| "Use the YYYY-MM-DD format".to_string())
        })
        .interact_text()
        .context("Failed to read date")?;

    parse_optional_date(&value)
}

fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("Invalid date '{}'", value))
}

async fn with_spinner<F: Future>(ctx: &Context, message: &str, work: F) -> F::Output {
    let spinner = ctx.output.spinner(message);
    let output = work.await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    output
}

/// Validation failures are operator-correctable; everything else is an error
fn report<T>(ctx: &Context, result: prompt_batch_core::Result<T>) {
    if let Err(err) = result {
        if err.is_validation() {
            ctx.output.warning(&err.to_string());
        } else {
            ctx.output.error(&err.to_string());
        }
    }
}
