use prompt_batch_core::{
    CoreError, PaginationState, PromptTemplate, QualityAssessmentConfig, QualityDefaults,
    QualityMetric, Result, SelectOption, ServiceResult, TemplateAction, TemplateFilter,
    TemplateId, TemplatePage, TemplateQuery, TemplateSelection, TestType, ValidationFailure,
};
use serde::Serialize;

/// The paged template listing plus the operator's template picks.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSelectionModel {
    templates: Vec<PromptTemplate>,
    filter: TemplateFilter,
    pagination: PaginationState,
    template_type_options: Vec<SelectOption>,
    loading: bool,
    selection: TemplateSelection,
    quality: QualityAssessmentConfig,
}

impl TemplateSelectionModel {
    pub fn new(page_size: u32, retriever_id: Option<String>) -> Self {
        Self {
            templates: Vec::new(),
            filter: TemplateFilter::default(),
            pagination: PaginationState::new(page_size),
            template_type_options: Vec::new(),
            loading: false,
            selection: TemplateSelection::with_retriever(retriever_id),
            quality: QualityAssessmentConfig::default(),
        }
    }

    // ===== Accessors =====

    pub fn templates(&self) -> &[PromptTemplate] {
        &self.templates
    }

    pub fn filter(&self) -> &TemplateFilter {
        &self.filter
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn template_type_options(&self) -> &[SelectOption] {
        &self.template_type_options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The type filter only makes sense once the service has offered some types.
    pub fn is_type_filter_enabled(&self) -> bool {
        !self.loading && !self.template_type_options.is_empty()
    }

    pub fn selection(&self) -> &TemplateSelection {
        &self.selection
    }

    pub fn quality(&self) -> &QualityAssessmentConfig {
        &self.quality
    }

    pub fn find(&self, id: &TemplateId) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    // ===== Fetching =====

    /// Marks the listing busy and returns the query for `page_number`.
    pub fn begin_fetch(&mut self, page_number: u32) -> std::result::Result<TemplateQuery, ValidationFailure> {
        if self.loading {
            return Err(ValidationFailure::OperationInProgress);
        }
        self.loading = true;
        Ok(TemplateQuery::new(
            self.pagination.page_size(),
            page_number.max(1),
            &self.filter,
        ))
    }

    /// Replaces the listing with the service's answer. A failure keeps the previous listing.
    pub fn finish_fetch(&mut self, query: &TemplateQuery, result: ServiceResult<TemplatePage>) -> Result<()> {
        self.loading = false;
        let page = result.map_err(|err| CoreError::fetch("prompt templates", &err))?;

        self.templates = page.templates;
        self.pagination =
            PaginationState::from_counts(query.page_size, query.page_number, page.total_count);
        if let Some(options) = page.template_type_options {
            self.template_type_options = options;
        }
        Ok(())
    }

    // ===== Filters =====

    pub fn filter_mut(&mut self) -> &mut TemplateFilter {
        &mut self.filter
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    // ===== Picks =====

    /// Puts the listed template `id` into the slot named by `action`, replacing any prior pick.
    pub fn apply_action(
        &mut self,
        test_type: TestType,
        action: TemplateAction,
        id: &TemplateId,
    ) -> std::result::Result<(), ValidationFailure> {
        if !test_type.offers_action(action) {
            return Err(ValidationFailure::ActionUnavailable {
                test_type,
                action: action.name(),
            });
        }
        let template = self
            .find(id)
            .cloned()
            .ok_or_else(|| ValidationFailure::UnknownTemplate(id.to_string()))?;

        match action {
            TemplateAction::SelectPrimary => self.selection.primary = Some(template),
            TemplateAction::SelectSecondary => self.selection.secondary = Some(template),
            TemplateAction::SelectFaithfulness
            | TemplateAction::SelectRelevancy
            | TemplateAction::SelectContextQuality => {
                let metric = action
                    .quality_metric()
                    .ok_or(ValidationFailure::ActionUnavailable {
                        test_type,
                        action: action.name(),
                    })?;
                self.set_quality_template(metric, Some(template.id))?;
            }
        }
        Ok(())
    }

    pub fn set_retriever_id(&mut self, retriever_id: Option<String>) {
        self.selection.set_retriever_id(retriever_id);
    }

    pub fn set_primary_knowledge_grounding(&mut self, enabled: bool) {
        self.selection.primary_uses_knowledge_grounding = enabled;
    }

    pub fn set_secondary_knowledge_grounding(&mut self, enabled: bool) {
        self.selection.secondary_uses_knowledge_grounding = enabled;
    }

    /// Switching off clears every metric template but never the primary/secondary picks.
    pub fn set_quality_enabled(&mut self, enabled: bool, defaults: &QualityDefaults) {
        self.quality.set_enabled(enabled, defaults);
    }

    pub fn set_quality_template(
        &mut self,
        metric: QualityMetric,
        id: Option<TemplateId>,
    ) -> std::result::Result<(), ValidationFailure> {
        if self.quality.set_template_id(metric, id) {
            Ok(())
        } else {
            Err(ValidationFailure::QualityAssessmentDisabled(metric))
        }
    }

    /// Forgets the listing and the template picks. Retriever, grounding and quality settings are kept.
    pub fn reset_for_test_type(&mut self) {
        self.templates.clear();
        self.filter.clear();
        self.pagination = PaginationState::new(self.pagination.page_size());
        self.selection.clear_templates();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_batch_core::ServiceError;

    fn loaded() -> TemplateSelectionModel {
        let mut model = TemplateSelectionModel::new(20, Some("ret-1".to_string()));
        let query = model.begin_fetch(1).unwrap();
        model
            .finish_fetch(
                &query,
                Ok(TemplatePage {
                    templates: vec![
                        PromptTemplate::new("0hf1", "Reply A"),
                        PromptTemplate::new("0hf2", "Reply B"),
                    ],
                    template_type_options: Some(vec![SelectOption::new("Email", "email")]),
                    total_count: 42,
                }),
            )
            .unwrap();
        model
    }

    #[test]
    fn begin_fetch_refuses_while_busy() {
        let mut model = TemplateSelectionModel::new(20, None);
        model.begin_fetch(1).unwrap();
        assert!(!model.is_type_filter_enabled());
        assert_eq!(
            model.begin_fetch(2),
            Err(ValidationFailure::OperationInProgress)
        );
    }

    #[test]
    fn failed_fetch_keeps_previous_listing() {
        let mut model = loaded();
        let query = model.begin_fetch(2).unwrap();
        let err = model
            .finish_fetch(&query, Err(ServiceError::new("boom")))
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to load prompt templates: boom");
        assert!(!model.is_loading());
        assert_eq!(model.templates().len(), 2);
        assert_eq!(model.pagination().current_page(), 1);
        assert_eq!(model.pagination().total_pages(), 3);
    }

    #[test]
    fn last_write_wins_per_slot() {
        let mut model = loaded();
        model
            .apply_action(TestType::ServiceReplies, TemplateAction::SelectPrimary, &"0hf1".into())
            .unwrap();
        model
            .apply_action(TestType::ServiceReplies, TemplateAction::SelectPrimary, &"0hf2".into())
            .unwrap();
        assert_eq!(model.selection().primary.as_ref().unwrap().name, "Reply B");
    }

    #[test]
    fn grounded_slot_is_service_replies_only() {
        let mut model = loaded();
        let err = model
            .apply_action(TestType::CaseSummary, TemplateAction::SelectSecondary, &"0hf1".into())
            .unwrap_err();
        assert!(matches!(err, ValidationFailure::ActionUnavailable { .. }));
        assert!(model.selection().secondary.is_none());
    }

    #[test]
    fn quality_action_needs_quality_enabled() {
        let mut model = loaded();
        let err = model
            .apply_action(TestType::WorkSummary, TemplateAction::SelectRelevancy, &"0hf1".into())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationFailure::QualityAssessmentDisabled(QualityMetric::Relevancy)
        );

        model.set_quality_enabled(true, &QualityDefaults::default());
        model
            .apply_action(TestType::WorkSummary, TemplateAction::SelectRelevancy, &"0hf1".into())
            .unwrap();
        assert_eq!(model.quality().relevancy_template_id, Some("0hf1".into()));
    }

    #[test]
    fn reset_keeps_retriever() {
        let mut model = loaded();
        model
            .apply_action(TestType::ServiceReplies, TemplateAction::SelectPrimary, &"0hf1".into())
            .unwrap();
        model.reset_for_test_type();

        assert!(model.templates().is_empty());
        assert!(model.selection().primary.is_none());
        assert_eq!(model.selection().retriever_id.as_deref(), Some("ret-1"));
    }
}
