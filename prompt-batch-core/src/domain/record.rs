use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecordId;
use super::test_type::TestType;
use crate::transcript::{segment_transcript, DEFAULT_MAX_UTTERANCES};

// ===== Record Kinds =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ConversationSession,
    Case,
    VoiceCall,
}

/// Record source chosen by the operator for work summary tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WorkSummarySource {
    #[default]
    #[serde(rename = "MessagingSession")]
    MessagingSession,
    #[serde(rename = "VoiceCall")]
    VoiceCall,
}

impl WorkSummarySource {
    pub const ALL: [WorkSummarySource; 2] =
        [WorkSummarySource::MessagingSession, WorkSummarySource::VoiceCall];

    pub fn label(&self) -> &'static str {
        match self {
            WorkSummarySource::MessagingSession => "Messaging Sessions",
            WorkSummarySource::VoiceCall => "Voice Calls",
        }
    }
}

impl RecordKind {
    /// The source choice only matters for work summaries.
    pub fn resolve(test_type: TestType, source: WorkSummarySource) -> Self {
        match (test_type, source) {
            (TestType::ServiceReplies, _) => RecordKind::ConversationSession,
            (TestType::CaseSummary, _) => RecordKind::Case,
            (TestType::WorkSummary, WorkSummarySource::MessagingSession) => {
                RecordKind::ConversationSession
            }
            (TestType::WorkSummary, WorkSummarySource::VoiceCall) => RecordKind::VoiceCall,
        }
    }

    pub fn plural_label(&self) -> &'static str {
        match self {
            RecordKind::ConversationSession => "Messaging Sessions",
            RecordKind::Case => "Cases",
            RecordKind::VoiceCall => "Voice Calls",
        }
    }

    pub fn record_type_label(&self) -> &'static str {
        match self {
            RecordKind::ConversationSession => "messaging session",
            RecordKind::Case => "case",
            RecordKind::VoiceCall => "voice call",
        }
    }

    pub fn step_title(&self) -> String {
        format!("Step 3: Select {}", self.plural_label())
    }

    pub fn quick_search_label(&self) -> &'static str {
        match self {
            RecordKind::ConversationSession => "Quick Search Sessions",
            RecordKind::Case => "Quick Search Cases",
            RecordKind::VoiceCall => "Quick Search Voice Calls",
        }
    }

    pub fn loading_message(&self) -> String {
        format!("Loading {}...", self.plural_label().to_lowercase())
    }

    pub fn selection_description(&self, test_type: TestType) -> &'static str {
        match (test_type, self) {
            (TestType::ServiceReplies, _) => {
                "These sessions will be processed for customer utterances to test service reply suggestions."
            }
            (TestType::CaseSummary, _) => {
                "These cases will be processed to test case summarization."
            }
            (TestType::WorkSummary, RecordKind::VoiceCall) => {
                "These voice calls will be processed to test work summarization."
            }
            (TestType::WorkSummary, _) => {
                "These sessions will be processed to test work summarization."
            }
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_type_label())
    }
}

// ===== Records =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationSession {
    pub id: RecordId,
    pub name: String,
    pub transcript_preview: String,
}

impl ConversationSession {
    /// Builds the row, deriving its preview from the raw transcript once.
    pub fn from_transcript(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        transcript: Option<&str>,
        max_utterances: usize,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            transcript_preview: segment_transcript(transcript, max_utterances),
        }
    }

    pub fn detail_path(&self) -> String {
        format!("/lightning/r/MessagingSession/{}/view", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CaseRecord {
    pub id: RecordId,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceCallRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub call_type: Option<String>,
    #[serde(default)]
    pub call_start_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub call_duration_in_seconds: Option<i64>,
    #[serde(default)]
    pub from_phone_number: Option<String>,
    #[serde(default)]
    pub to_phone_number: Option<String>,
}

/// A selectable source record. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataRecord {
    ConversationSession(ConversationSession),
    Case(CaseRecord),
    VoiceCall(VoiceCallRecord),
}

impl DataRecord {
    pub fn conversation(
        id: impl Into<RecordId>,
        name: impl Into<String>,
        transcript: Option<&str>,
    ) -> Self {
        DataRecord::ConversationSession(ConversationSession::from_transcript(
            id,
            name,
            transcript,
            DEFAULT_MAX_UTTERANCES,
        ))
    }

    pub fn id(&self) -> &RecordId {
        match self {
            DataRecord::ConversationSession(session) => &session.id,
            DataRecord::Case(case) => &case.id,
            DataRecord::VoiceCall(call) => &call.id,
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            DataRecord::ConversationSession(_) => RecordKind::ConversationSession,
            DataRecord::Case(_) => RecordKind::Case,
            DataRecord::VoiceCall(_) => RecordKind::VoiceCall,
        }
    }

    /// Primary display text: session name, case subject or call name.
    pub fn display_name(&self) -> &str {
        match self {
            DataRecord::ConversationSession(session) => &session.name,
            DataRecord::Case(case) => case.subject.as_deref().unwrap_or_default(),
            DataRecord::VoiceCall(call) => call.name.as_deref().unwrap_or_default(),
        }
    }

    /// Fields inspected by quick search for this record's kind.
    pub fn quick_search_fields(&self) -> Vec<&str> {
        match self {
            DataRecord::ConversationSession(session) => vec![session.name.as_str()],
            DataRecord::Case(case) => case
                .subject
                .iter()
                .chain(case.case_number.iter())
                .map(String::as_str)
                .collect(),
            DataRecord::VoiceCall(call) => call.name.iter().map(String::as_str).collect(),
        }
    }

    /// Case-insensitive substring match. An empty query matches everything.
    pub fn matches_quick_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.quick_search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
