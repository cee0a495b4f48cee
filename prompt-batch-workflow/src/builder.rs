use prompt_batch_core::{
    BatchRequest, KnowledgeGrounding, QualityAssessmentConfig, RecordId, TemplateSelection,
    TestType, ValidationFailure,
};

/// Assembles a [`BatchRequest`] from a snapshot of the wizard's selections.
///
/// Checks run in a fixed order and stop at the first failure: records,
/// primary template, then the grounded template for service replies.
///
/// A service-reply request without a retriever id is rejected last. The
/// wizard refuses to leave template selection in that state, so only direct
/// callers of the builder can reach this check.
#[derive(Debug, Clone, Default)]
pub struct BatchRequestBuilder {
    test_type: Option<TestType>,
    record_ids: Vec<RecordId>,
    templates: TemplateSelection,
    quality: QualityAssessmentConfig,
}

impl BatchRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn test_type(mut self, test_type: TestType) -> Self {
        self.test_type = Some(test_type);
        self
    }

    pub fn record_ids(mut self, record_ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.record_ids = record_ids.into_iter().collect();
        self
    }

    pub fn templates(mut self, templates: TemplateSelection) -> Self {
        self.templates = templates;
        self
    }

    pub fn quality(mut self, quality: QualityAssessmentConfig) -> Self {
        self.quality = quality;
        self
    }

    pub fn build(self) -> Result<BatchRequest, ValidationFailure> {
        let test_type = self.test_type.ok_or(ValidationFailure::NoTestType)?;

        if self.record_ids.is_empty() {
            return Err(ValidationFailure::NoRecordsSelected);
        }

        let primary = self
            .templates
            .primary
            .ok_or(ValidationFailure::MissingPrimaryTemplate {
                label: test_type.primary_template_label(),
            })?;

        let (secondary_template_id, retriever_id) = if test_type.requires_secondary_template() {
            let secondary = self
                .templates
                .secondary
                .ok_or(ValidationFailure::MissingSecondaryTemplate(test_type))?;
            let retriever = self
                .templates
                .retriever_id
                .ok_or(ValidationFailure::MissingRetriever(test_type))?;
            (Some(secondary.id), Some(retriever))
        } else {
            (None, None)
        };

        Ok(BatchRequest {
            test_type,
            record_ids: self.record_ids,
            primary_template_id: primary.id,
            secondary_template_id,
            retriever_id,
            quality_assessment: self.quality,
            knowledge_grounding: KnowledgeGrounding {
                primary: self.templates.primary_uses_knowledge_grounding,
                secondary: test_type.requires_secondary_template()
                    && self.templates.secondary_uses_knowledge_grounding,
            },
        })
    }
}
