//! Source records resource client
//!
//! Lists messaging sessions, cases and voice calls. Conversation transcripts
//! are reduced to bounded previews as each page is mapped.

use crate::client::HttpClient;
use crate::error::SdkResult;
use crate::resources::templates::PaginationInfo;
use chrono::NaiveDate;
use prompt_batch_core::{
    CaseRecord, ConversationSession, DataRecord, RecordKind, RecordPage, RecordQuery,
    SelectOption, VoiceCallRecord,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client for record listings
#[derive(Debug, Clone)]
pub struct RecordsClient {
    client: Arc<HttpClient>,
}

impl RecordsClient {
    /// Create a new records client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// List one page of messaging sessions with their raw transcripts
    pub async fn list_sessions(
        &self,
        params: &ListRecordsParams,
    ) -> SdkResult<SessionListResponse> {
        self.client
            .get_with_query("/records/messaging-sessions", params)
            .await
    }

    /// List one page of cases
    pub async fn list_cases(&self, params: &ListRecordsParams) -> SdkResult<CaseListResponse> {
        self.client.get_with_query("/records/cases", params).await
    }

    /// List one page of voice calls
    pub async fn list_voice_calls(
        &self,
        params: &ListRecordsParams,
    ) -> SdkResult<VoiceCallListResponse> {
        self.client.get_with_query("/records/voice-calls", params).await
    }

    /// Fetch the page a query describes and map it to listing rows
    pub async fn list(&self, query: &RecordQuery) -> SdkResult<RecordPage> {
        let params = ListRecordsParams::from(query);
        let preview_utterances = self.client.config().preview_utterances;

        let page = match query.kind {
            RecordKind::ConversationSession => self
                .list_sessions(&params)
                .await?
                .into_page(preview_utterances),
            RecordKind::Case => self.list_cases(&params).await?.into(),
            RecordKind::VoiceCall => self.list_voice_calls(&params).await?.into(),
        };

        Ok(page)
    }

    /// Case status picklist used by the record status filter
    pub async fn status_options(&self) -> SdkResult<Vec<SelectOption>> {
        self.client.get("/records/status-options").await
    }
}

/// Query parameters shared by the record listings.
///
/// The name filter is sent as `sessionName` for sessions and `subject` for cases.
/// Voice calls take no name filter.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListRecordsParams {
    pub page_size: u32,
    pub page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl From<&RecordQuery> for ListRecordsParams {
    fn from(query: &RecordQuery) -> Self {
        let (session_name, subject) = match query.kind {
            RecordKind::ConversationSession => (query.name_or_subject.clone(), None),
            RecordKind::Case => (None, query.name_or_subject.clone()),
            RecordKind::VoiceCall => (None, None),
        };

        Self {
            page_size: query.page_size,
            page_number: query.page_number,
            session_name,
            subject,
            status: query.status.clone(),
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

/// A messaging session row as served, transcript included
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SessionRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "transcript")]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<SessionRow>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

impl SessionListResponse {
    /// Maps the rows, segmenting each transcript into a preview of at most `max_utterances`.
    pub fn into_page(self, max_utterances: usize) -> RecordPage {
        let records = self
            .sessions
            .into_iter()
            .map(|row| {
                DataRecord::ConversationSession(ConversationSession::from_transcript(
                    row.id,
                    row.name.unwrap_or_default(),
                    row.transcript.as_deref(),
                    max_utterances,
                ))
            })
            .collect();

        RecordPage {
            records,
            total_count: self.pagination.total_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseListResponse {
    #[serde(default)]
    pub cases: Vec<CaseRecord>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

impl From<CaseListResponse> for RecordPage {
    fn from(response: CaseListResponse) -> Self {
        RecordPage {
            records: response.cases.into_iter().map(DataRecord::Case).collect(),
            total_count: response.pagination.total_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceCallListResponse {
    #[serde(default)]
    pub voice_calls: Vec<VoiceCallRecord>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

impl From<VoiceCallListResponse> for RecordPage {
    fn from(response: VoiceCallListResponse) -> Self {
        RecordPage {
            records: response
                .voice_calls
                .into_iter()
                .map(DataRecord::VoiceCall)
                .collect(),
            total_count: response.pagination.total_count,
        }
    }
}
