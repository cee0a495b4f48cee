use serde::{Deserialize, Serialize};
use std::fmt;

// ===== Test Type =====

/// Category of evaluation a batch is configured for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TestType {
    #[serde(rename = "Service Replies")]
    ServiceReplies,
    #[serde(rename = "Case Summary")]
    CaseSummary,
    #[serde(rename = "Work Summary")]
    WorkSummary,
}

impl TestType {
    pub const ALL: [TestType; 3] = [
        TestType::ServiceReplies,
        TestType::CaseSummary,
        TestType::WorkSummary,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TestType::ServiceReplies => "Service Replies",
            TestType::CaseSummary => "Case Summary",
            TestType::WorkSummary => "Work Summary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TestType::ServiceReplies => {
                "Test Einstein service reply suggestions for chat conversations using contextual and grounded templates."
            }
            TestType::CaseSummary => {
                "Test Einstein case summarization for support cases using a single summary template."
            }
            TestType::WorkSummary => {
                "Test Einstein work summarization for conversations and calls using a single summary template."
            }
        }
    }

    /// Only service replies pair a contextual template with a grounded one.
    pub fn requires_secondary_template(&self) -> bool {
        matches!(self, TestType::ServiceReplies)
    }

    pub fn requires_retriever(&self) -> bool {
        matches!(self, TestType::ServiceReplies)
    }

    pub fn primary_template_label(&self) -> &'static str {
        match self {
            TestType::ServiceReplies => "Contextual Template",
            TestType::CaseSummary | TestType::WorkSummary => "Summary Template",
        }
    }

    pub fn secondary_template_label(&self) -> Option<&'static str> {
        self.requires_secondary_template()
            .then_some("Grounded Template")
    }

    /// Row actions offered on the template listing.
    pub fn template_actions(&self) -> &'static [TemplateActionOption] {
        const SERVICE_REPLIES: &[TemplateActionOption] = &[
            TemplateActionOption {
                label: "Select as Contextual",
                action: TemplateAction::SelectPrimary,
            },
            TemplateActionOption {
                label: "Select as Grounded",
                action: TemplateAction::SelectSecondary,
            },
        ];
        const SUMMARY: &[TemplateActionOption] = &[TemplateActionOption {
            label: "Select as Summary",
            action: TemplateAction::SelectPrimary,
        }];

        match self {
            TestType::ServiceReplies => SERVICE_REPLIES,
            TestType::CaseSummary | TestType::WorkSummary => SUMMARY,
        }
    }

    pub fn offers_action(&self, action: TemplateAction) -> bool {
        if action.quality_metric().is_some() {
            return true;
        }
        self.template_actions().iter().any(|option| option.action == action)
    }

    pub fn continue_to_records_label(&self) -> &'static str {
        match self {
            TestType::ServiceReplies => "Continue to Messaging Sessions",
            TestType::CaseSummary => "Continue to Cases",
            TestType::WorkSummary => "Continue to Records",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Template Actions =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TemplateAction {
    SelectPrimary,
    SelectSecondary,
    SelectFaithfulness,
    SelectRelevancy,
    SelectContextQuality,
}

impl TemplateAction {
    pub fn name(&self) -> &'static str {
        match self {
            TemplateAction::SelectPrimary => "select_primary",
            TemplateAction::SelectSecondary => "select_secondary",
            TemplateAction::SelectFaithfulness => "select_faithfulness",
            TemplateAction::SelectRelevancy => "select_relevancy",
            TemplateAction::SelectContextQuality => "select_context_quality",
        }
    }

    pub fn quality_metric(&self) -> Option<QualityMetric> {
        match self {
            TemplateAction::SelectFaithfulness => Some(QualityMetric::Faithfulness),
            TemplateAction::SelectRelevancy => Some(QualityMetric::Relevancy),
            TemplateAction::SelectContextQuality => Some(QualityMetric::ContextQuality),
            TemplateAction::SelectPrimary | TemplateAction::SelectSecondary => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateActionOption {
    pub label: &'static str,
    pub action: TemplateAction,
}

// ===== Quality Metrics =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QualityMetric {
    Faithfulness,
    Relevancy,
    ContextQuality,
}

impl QualityMetric {
    pub const ALL: [QualityMetric; 3] = [
        QualityMetric::Faithfulness,
        QualityMetric::Relevancy,
        QualityMetric::ContextQuality,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            QualityMetric::Faithfulness => "Faithfulness",
            QualityMetric::Relevancy => "Relevancy",
            QualityMetric::ContextQuality => "Context Quality",
        }
    }
}

impl fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Wizard Steps =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    TestTypeSelection,
    TemplateSelection,
    RecordSelection,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::TestTypeSelection => 1,
            WizardStep::TemplateSelection => 2,
            WizardStep::RecordSelection => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::TestTypeSelection => "Test Type Selection",
            WizardStep::TemplateSelection => "Template Selection",
            WizardStep::RecordSelection => "Record Selection",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
