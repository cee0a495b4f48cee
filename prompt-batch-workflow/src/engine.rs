use chrono::NaiveDate;
use prompt_batch_core::{
    BatchResult, BatchService, CoreError, QualityMetric, RecordId, RecordKind, Result,
    SelectOption, SessionId, TemplateAction, TemplateId, TestType, ValidationFailure,
    WizardSettings, WizardStep, WorkSummarySource,
};
use serde::Serialize;
use std::sync::Arc;

use crate::builder::BatchRequestBuilder;
use crate::data_model::DataSelectionModel;
use crate::template_model::TemplateSelectionModel;

// ===== Wizard State =====

/// Everything one wizard session owns. Nothing here outlives the session.
#[derive(Debug, Clone, Serialize)]
pub struct WizardState {
    pub session_id: SessionId,
    pub step: WizardStep,
    pub test_type: Option<TestType>,
    pub templates: TemplateSelectionModel,
    pub records: DataSelectionModel,
    pub status_options: Vec<SelectOption>,
    pub submitting: bool,
    pub last_result: Option<BatchResult>,
}

impl WizardState {
    fn new(settings: &WizardSettings) -> Self {
        Self {
            session_id: SessionId::new(),
            step: WizardStep::default(),
            test_type: None,
            templates: TemplateSelectionModel::new(
                settings.template_page_size,
                settings.default_retriever_id.clone(),
            ),
            records: DataSelectionModel::new(
                RecordKind::ConversationSession,
                settings.page_size_for(RecordKind::ConversationSession),
            ),
            status_options: Vec::new(),
            submitting: false,
            last_result: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.submitting || self.templates.is_loading() || self.records.is_loading()
    }
}

// ===== Wizard =====

/// Drives one operator through test type, templates and records to a submitted batch.
///
/// Every action takes `&mut self`, so at most one remote call is outstanding
/// per wizard. Guard failures come back as [`CoreError::Validation`] and leave
/// the state exactly as it was.
pub struct PromptTestWizard {
    service: Arc<dyn BatchService>,
    settings: WizardSettings,
    state: WizardState,
}

impl PromptTestWizard {
    pub fn new(service: Arc<dyn BatchService>, settings: WizardSettings) -> Self {
        let state = WizardState::new(&settings);
        tracing::debug!(session_id = %state.session_id, "Wizard session created");
        Self {
            service,
            settings,
            state,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn test_type(&self) -> Option<TestType> {
        self.state.test_type
    }

    pub fn templates(&self) -> &TemplateSelectionModel {
        &self.state.templates
    }

    pub fn records(&self) -> &DataSelectionModel {
        &self.state.records
    }

    /// Loads the status vocabulary. A failure is reported but the wizard stays usable.
    pub async fn initialize(&mut self) -> Result<()> {
        match self.service.list_status_options().await {
            Ok(options) => {
                self.state.status_options = options;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.state.session_id,
                    "Failed to load status options: {}",
                    err
                );
                Err(CoreError::fetch("status options", &err))
            }
        }
    }

    // ===== Navigation =====

    /// Chooses the test type. From a later step this starts over at step one.
    pub fn select_test_type(&mut self, test_type: TestType) {
        self.state.test_type = Some(test_type);
        self.state.templates.reset_for_test_type();
        self.configure_records(test_type, WorkSummarySource::default());
        self.state.step = WizardStep::TestTypeSelection;
        self.state.last_result = None;
        tracing::info!(
            session_id = %self.state.session_id,
            test_type = %test_type,
            "Test type selected"
        );
    }

    /// Moves to template selection and loads the first template page.
    ///
    /// The step changes even when that load fails; the error is returned so it can be shown.
    pub async fn continue_to_templates(&mut self) -> Result<()> {
        self.require_step(WizardStep::TestTypeSelection)?;
        self.require_idle()?;
        self.state.test_type.ok_or(ValidationFailure::NoTestType)?;

        self.state.templates.clear_filter();
        self.state.step = WizardStep::TemplateSelection;
        tracing::info!(session_id = %self.state.session_id, "Entered template selection");
        self.fetch_templates(1).await
    }

    /// Moves to record selection once the template picks satisfy the test type.
    pub async fn continue_to_records(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.require_idle()?;
        let test_type = self.state.test_type.ok_or(ValidationFailure::NoTestType)?;

        let selection = self.state.templates.selection();
        if selection.primary.is_none() {
            return Err(ValidationFailure::MissingPrimaryTemplate {
                label: test_type.primary_template_label(),
            }
            .into());
        }
        if test_type.requires_secondary_template() {
            if selection.secondary.is_none() {
                return Err(ValidationFailure::MissingSecondaryTemplate(test_type).into());
            }
            if !selection.has_retriever() {
                return Err(ValidationFailure::MissingRetriever(test_type).into());
            }
        }

        let source = self.state.records.source();
        self.configure_records(test_type, source);
        self.state.step = WizardStep::RecordSelection;
        tracing::info!(
            session_id = %self.state.session_id,
            record_kind = %self.state.records.kind(),
            "Entered record selection"
        );
        self.fetch_records(1).await
    }

    /// Steps back once. Leaving record selection drops the loaded records and the selection.
    pub fn back(&mut self) -> Result<()> {
        self.require_idle()?;
        match self.state.step {
            WizardStep::TestTypeSelection => {}
            WizardStep::TemplateSelection => {
                self.state.step = WizardStep::TestTypeSelection;
            }
            WizardStep::RecordSelection => {
                self.state.records.clear_listing();
                self.state.step = WizardStep::TemplateSelection;
            }
        }
        tracing::debug!(session_id = %self.state.session_id, step = %self.state.step, "Stepped back");
        Ok(())
    }

    /// Starts the session over with nothing chosen. The status vocabulary is kept.
    pub fn reset(&mut self) {
        let status_options = std::mem::take(&mut self.state.status_options);
        let session_id = self.state.session_id;
        self.state = WizardState::new(&self.settings);
        self.state.session_id = session_id;
        self.state.status_options = status_options;
        tracing::info!(session_id = %self.state.session_id, "Wizard reset");
    }

    // ===== Template Listing =====

    pub fn set_template_name_filter(&mut self, name: Option<String>) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.filter_mut().set_name(name);
        Ok(())
    }

    pub fn set_template_status_filter(&mut self, status: Option<String>) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.filter_mut().set_status(status);
        Ok(())
    }

    /// The type filter applies immediately rather than waiting for `apply_template_filters`.
    pub async fn set_template_type_filter(&mut self, template_type: Option<String>) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.require_idle()?;
        self.state.templates.filter_mut().set_template_type(template_type);
        self.fetch_templates(1).await
    }

    pub async fn apply_template_filters(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.fetch_templates(1).await
    }

    pub async fn clear_template_filters(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.require_idle()?;
        self.state.templates.clear_filter();
        self.fetch_templates(1).await
    }

    pub async fn next_template_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        match self.state.templates.pagination().next_target() {
            Some(page) => self.fetch_templates(page).await,
            None => Ok(()),
        }
    }

    pub async fn previous_template_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        match self.state.templates.pagination().previous_target() {
            Some(page) => self.fetch_templates(page).await,
            None => Ok(()),
        }
    }

    pub async fn first_template_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        let page = self.state.templates.pagination().first_target();
        self.fetch_templates(page).await
    }

    pub async fn last_template_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        let page = self.state.templates.pagination().last_target();
        self.fetch_templates(page).await
    }

    /// Re-issues the current template query, e.g. after a failed load.
    pub async fn reload_templates(&mut self) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        let page = self.state.templates.pagination().current_page();
        self.fetch_templates(page).await
    }

    // ===== Template Picks =====

    pub fn apply_template_action(&mut self, action: TemplateAction, id: &TemplateId) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        let test_type = self.state.test_type.ok_or(ValidationFailure::NoTestType)?;
        self.state.templates.apply_action(test_type, action, id)?;
        tracing::info!(
            session_id = %self.state.session_id,
            action = action.name(),
            template_id = %id,
            "Template selected"
        );
        Ok(())
    }

    pub fn set_retriever_id(&mut self, retriever_id: Option<String>) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.set_retriever_id(retriever_id);
        Ok(())
    }

    pub fn set_primary_knowledge_grounding(&mut self, enabled: bool) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.set_primary_knowledge_grounding(enabled);
        Ok(())
    }

    pub fn set_secondary_knowledge_grounding(&mut self, enabled: bool) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.set_secondary_knowledge_grounding(enabled);
        Ok(())
    }

    pub fn set_quality_assessment_enabled(&mut self, enabled: bool) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        let defaults = self.settings.quality_defaults();
        self.state.templates.set_quality_enabled(enabled, &defaults);
        tracing::debug!(session_id = %self.state.session_id, enabled, "Quality assessment toggled");
        Ok(())
    }

    pub fn set_quality_template(&mut self, metric: QualityMetric, id: Option<TemplateId>) -> Result<()> {
        self.require_step(WizardStep::TemplateSelection)?;
        self.state.templates.set_quality_template(metric, id)?;
        Ok(())
    }

    // ===== Record Listing =====

    /// Switches work summaries between sessions and calls, reloading page one.
    pub async fn select_work_summary_source(&mut self, source: WorkSummarySource) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.require_idle()?;
        let test_type = self.state.test_type.ok_or(ValidationFailure::NoTestType)?;
        if test_type != TestType::WorkSummary {
            return Err(ValidationFailure::SourceNotSelectable.into());
        }
        if source == self.state.records.source() {
            return Ok(());
        }

        self.configure_records(test_type, source);
        tracing::info!(
            session_id = %self.state.session_id,
            record_kind = %self.state.records.kind(),
            "Record source changed"
        );
        self.fetch_records(1).await
    }

    pub fn set_record_name_filter(&mut self, value: Option<String>) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.filter_mut().set_name_or_subject(value);
        Ok(())
    }

    pub fn set_record_status_filter(&mut self, status: Option<String>) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.filter_mut().set_status(status);
        Ok(())
    }

    pub fn set_record_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.filter_mut().set_date_range(start, end);
        Ok(())
    }

    pub async fn apply_record_filters(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.fetch_records(1).await
    }

    pub async fn clear_record_filters(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.require_idle()?;
        self.state.records.filter_mut().clear();
        self.fetch_records(1).await
    }

    pub async fn next_record_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        match self.state.records.pagination().next_target() {
            Some(page) => self.fetch_records(page).await,
            None => Ok(()),
        }
    }

    pub async fn previous_record_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        match self.state.records.pagination().previous_target() {
            Some(page) => self.fetch_records(page).await,
            None => Ok(()),
        }
    }

    pub async fn first_record_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        let page = self.state.records.pagination().first_target();
        self.fetch_records(page).await
    }

    pub async fn last_record_page(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        let page = self.state.records.pagination().last_target();
        self.fetch_records(page).await
    }

    pub async fn reload_records(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        let page = self.state.records.pagination().current_page();
        self.fetch_records(page).await
    }

    // ===== Record Selection =====

    pub fn set_quick_search(&mut self, query: impl Into<String>) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.set_quick_search(query);
        Ok(())
    }

    pub fn select_record(&mut self, id: &RecordId) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.select(id)?;
        Ok(())
    }

    pub fn deselect_record(&mut self, id: &RecordId) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.deselect(id);
        Ok(())
    }

    pub fn toggle_record(&mut self, id: &RecordId) -> Result<bool> {
        self.require_step(WizardStep::RecordSelection)?;
        Ok(self.state.records.toggle(id)?)
    }

    pub fn select_all_visible(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.select_all_visible();
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.require_step(WizardStep::RecordSelection)?;
        self.state.records.clear_selection();
        Ok(())
    }

    // ===== Submission =====

    /// Creates a batch from the current selections. Never retried.
    ///
    /// On success the record selection is cleared so another batch can be built
    /// straight away; on failure everything is kept for an unmodified retry.
    pub async fn submit(&mut self) -> Result<BatchResult> {
        self.require_step(WizardStep::RecordSelection)?;
        self.require_idle()?;

        let mut builder = BatchRequestBuilder::new()
            .record_ids(self.state.records.selected_ids().iter().cloned())
            .templates(self.state.templates.selection().clone())
            .quality(self.state.templates.quality().clone());
        if let Some(test_type) = self.state.test_type {
            builder = builder.test_type(test_type);
        }
        let request = builder.build()?;

        tracing::info!(
            session_id = %self.state.session_id,
            test_type = %request.test_type,
            records = request.record_ids.len(),
            quality_assessment = request.quality_assessment.enabled,
            "Submitting test batch"
        );

        self.state.submitting = true;
        let outcome = self.service.submit_batch(&request).await;
        self.state.submitting = false;

        match outcome {
            Ok(result) => {
                tracing::info!(
                    session_id = %self.state.session_id,
                    batch_id = %result.batch_id,
                    test_records_created = result.test_records_created,
                    "Test batch created"
                );
                self.state.records.clear_selection();
                self.state.last_result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.state.session_id,
                    "Test batch creation failed: {}",
                    err
                );
                Err(CoreError::submission(&err))
            }
        }
    }

    // ===== Internals =====

    fn require_step(&self, step: WizardStep) -> Result<()> {
        if self.state.step == step {
            Ok(())
        } else {
            Err(ValidationFailure::WrongStep(self.state.step).into())
        }
    }

    fn require_idle(&self) -> Result<()> {
        if self.state.is_busy() {
            Err(ValidationFailure::OperationInProgress.into())
        } else {
            Ok(())
        }
    }

    fn configure_records(&mut self, test_type: TestType, source: WorkSummarySource) {
        let kind = RecordKind::resolve(test_type, source);
        let page_size = self.settings.page_size_for(kind);
        self.state.records.configure(kind, source, page_size);
    }

    async fn fetch_templates(&mut self, page: u32) -> Result<()> {
        self.require_idle()?;
        let query = self.state.templates.begin_fetch(page)?;
        tracing::debug!(
            session_id = %self.state.session_id,
            page = query.page_number,
            page_size = query.page_size,
            "Fetching templates"
        );

        let session_id = self.state.session_id;
        let result = self.service.list_templates(&query).await;
        self.state
            .templates
            .finish_fetch(&query, result)
            .inspect_err(|err| tracing::warn!(session_id = %session_id, "{}", err))
    }

    async fn fetch_records(&mut self, page: u32) -> Result<()> {
        self.require_idle()?;
        let query = self.state.records.begin_fetch(page)?;
        tracing::debug!(
            session_id = %self.state.session_id,
            kind = %query.kind,
            page = query.page_number,
            page_size = query.page_size,
            "Fetching records"
        );

        let session_id = self.state.session_id;
        let result = self.service.list_records(&query).await;
        self.state
            .records
            .finish_fetch(&query, result)
            .inspect_err(|err| tracing::warn!(session_id = %session_id, "{}", err))
    }
}
