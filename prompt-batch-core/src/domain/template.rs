use serde::{Deserialize, Serialize};

use super::ids::TemplateId;
use super::test_type::QualityMetric;

// ===== Prompt Template =====

/// A prompt template row as served by the data service. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PromptTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub template_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl PromptTemplate {
    pub fn new(id: impl Into<TemplateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            template_type: None,
            status: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

// ===== Template Selection =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TemplateSelection {
    pub primary: Option<PromptTemplate>,
    /// Only meaningful for service replies.
    pub secondary: Option<PromptTemplate>,
    pub primary_uses_knowledge_grounding: bool,
    pub secondary_uses_knowledge_grounding: bool,
    /// Only meaningful for service replies.
    pub retriever_id: Option<String>,
}

impl TemplateSelection {
    pub fn with_retriever(retriever_id: Option<String>) -> Self {
        Self {
            retriever_id: non_blank(retriever_id),
            ..Default::default()
        }
    }

    pub fn has_retriever(&self) -> bool {
        self.retriever_id.is_some()
    }

    pub fn set_retriever_id(&mut self, retriever_id: Option<String>) {
        self.retriever_id = non_blank(retriever_id);
    }

    /// Drops the template picks. Retriever and grounding flags survive a test type switch.
    pub fn clear_templates(&mut self) {
        self.primary = None;
        self.secondary = None;
    }

    pub fn shows_knowledge_grounding(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }
}

// ===== Quality Assessment =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct QualityAssessmentConfig {
    pub enabled: bool,
    pub faithfulness_template_id: Option<TemplateId>,
    pub relevancy_template_id: Option<TemplateId>,
    pub context_quality_template_id: Option<TemplateId>,
}

/// Default metric templates pre-filled when quality assessment is switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityDefaults {
    pub faithfulness_template_id: Option<TemplateId>,
    pub relevancy_template_id: Option<TemplateId>,
    pub context_quality_template_id: Option<TemplateId>,
}

impl QualityAssessmentConfig {
    /// Turning the feature off clears every metric template; turning it on fills empty slots from `defaults`.
    pub fn set_enabled(&mut self, enabled: bool, defaults: &QualityDefaults) {
        self.enabled = enabled;
        if enabled {
            for metric in QualityMetric::ALL {
                if self.template_id(metric).is_none() {
                    let default = match metric {
                        QualityMetric::Faithfulness => &defaults.faithfulness_template_id,
                        QualityMetric::Relevancy => &defaults.relevancy_template_id,
                        QualityMetric::ContextQuality => &defaults.context_quality_template_id,
                    };
                    *self.slot_mut(metric) = default.clone();
                }
            }
        } else {
            self.faithfulness_template_id = None;
            self.relevancy_template_id = None;
            self.context_quality_template_id = None;
        }
    }

    pub fn template_id(&self, metric: QualityMetric) -> Option<&TemplateId> {
        match metric {
            QualityMetric::Faithfulness => self.faithfulness_template_id.as_ref(),
            QualityMetric::Relevancy => self.relevancy_template_id.as_ref(),
            QualityMetric::ContextQuality => self.context_quality_template_id.as_ref(),
        }
    }

    /// Returns false, leaving the config untouched, while the feature is disabled.
    pub fn set_template_id(&mut self, metric: QualityMetric, id: Option<TemplateId>) -> bool {
        if !self.enabled {
            return false;
        }
        *self.slot_mut(metric) = id.filter(|id| !id.as_str().trim().is_empty());
        true
    }

    fn slot_mut(&mut self, metric: QualityMetric) -> &mut Option<TemplateId> {
        match metric {
            QualityMetric::Faithfulness => &mut self.faithfulness_template_id,
            QualityMetric::Relevancy => &mut self.relevancy_template_id,
            QualityMetric::ContextQuality => &mut self.context_quality_template_id,
        }
    }

    pub fn configured_count(&self) -> usize {
        QualityMetric::ALL
            .iter()
            .filter(|metric| self.template_id(**metric).is_some())
            .count()
    }

    pub fn status(&self) -> QualityStatus {
        if !self.enabled {
            return QualityStatus {
                label: "Disabled".to_string(),
                severity: StatusSeverity::Inverse,
            };
        }

        match self.configured_count() {
            0 => QualityStatus {
                label: "No Templates Configured".to_string(),
                severity: StatusSeverity::Warning,
            },
            n => QualityStatus {
                label: format!("{} Metric{} Configured", n, if n > 1 { "s" } else { "" }),
                severity: StatusSeverity::Success,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusSeverity {
    Inverse,
    Warning,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityStatus {
    pub label: String,
    pub severity: StatusSeverity,
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
