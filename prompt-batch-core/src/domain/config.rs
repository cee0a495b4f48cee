use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::RecordKind;
use super::template::QualityDefaults;
use crate::transcript::DEFAULT_MAX_UTTERANCES;

pub const DEFAULT_RECORD_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TEMPLATE_PAGE_SIZE: u32 = 20;

// ===== Wizard Settings =====

/// Externally supplied defaults for one wizard session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct WizardSettings {
    #[validate(range(min = 1, max = 200))]
    pub conversation_page_size: u32,
    #[validate(range(min = 1, max = 200))]
    pub case_page_size: u32,
    #[validate(range(min = 1, max = 200))]
    pub voice_call_page_size: u32,
    #[validate(range(min = 1, max = 200))]
    pub template_page_size: u32,
    pub default_retriever_id: Option<String>,
    pub default_faithfulness_template_id: Option<String>,
    pub default_relevancy_template_id: Option<String>,
    pub default_context_quality_template_id: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub transcript_preview_utterances: usize,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            conversation_page_size: DEFAULT_RECORD_PAGE_SIZE,
            case_page_size: DEFAULT_RECORD_PAGE_SIZE,
            voice_call_page_size: DEFAULT_RECORD_PAGE_SIZE,
            template_page_size: DEFAULT_TEMPLATE_PAGE_SIZE,
            default_retriever_id: None,
            default_faithfulness_template_id: None,
            default_relevancy_template_id: None,
            default_context_quality_template_id: None,
            transcript_preview_utterances: DEFAULT_MAX_UTTERANCES,
        }
    }
}

impl WizardSettings {
    pub fn page_size_for(&self, kind: RecordKind) -> u32 {
        match kind {
            RecordKind::ConversationSession => self.conversation_page_size,
            RecordKind::Case => self.case_page_size,
            RecordKind::VoiceCall => self.voice_call_page_size,
        }
    }

    pub fn quality_defaults(&self) -> QualityDefaults {
        let id = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(Into::into)
        };
        QualityDefaults {
            faithfulness_template_id: id(&self.default_faithfulness_template_id),
            relevancy_template_id: id(&self.default_relevancy_template_id),
            context_quality_template_id: id(&self.default_context_quality_template_id),
        }
    }
}
