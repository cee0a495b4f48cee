use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    BatchRequest, BatchResult, DataRecord, PromptTemplate, RecordFilter, RecordKind,
    SelectOption, TemplateFilter,
};
use crate::error::ServiceResult;

// ===== Listing Queries =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateQuery {
    pub page_size: u32,
    pub page_number: u32,
    pub name: Option<String>,
    pub template_type: Option<String>,
    pub status: Option<String>,
}

impl TemplateQuery {
    pub fn new(page_size: u32, page_number: u32, filter: &TemplateFilter) -> Self {
        Self {
            page_size,
            page_number,
            name: filter.name.clone(),
            template_type: filter.template_type.clone(),
            status: filter.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordQuery {
    pub kind: RecordKind,
    pub page_size: u32,
    pub page_number: u32,
    pub name_or_subject: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RecordQuery {
    pub fn new(kind: RecordKind, page_size: u32, page_number: u32, filter: &RecordFilter) -> Self {
        Self {
            kind,
            page_size,
            page_number,
            name_or_subject: filter.name_or_subject.clone(),
            status: filter.status.clone(),
            start_date: filter.start_date,
            end_date: filter.end_date,
        }
    }
}

// ===== Listing Pages =====

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TemplatePage {
    pub templates: Vec<PromptTemplate>,
    /// Replaces the template-type filter vocabulary when present.
    pub template_type_options: Option<Vec<SelectOption>>,
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordPage {
    pub records: Vec<DataRecord>,
    pub total_count: u64,
}

// ===== Remote Collaborator =====

/// The remote data service behind the wizard.
///
/// Listing calls are idempotent. `submit_batch` is not: every call creates a new batch.
#[async_trait]
pub trait BatchService: Send + Sync {
    async fn list_templates(&self, query: &TemplateQuery) -> ServiceResult<TemplatePage>;

    async fn list_records(&self, query: &RecordQuery) -> ServiceResult<RecordPage>;

    async fn list_status_options(&self) -> ServiceResult<Vec<SelectOption>>;

    async fn submit_batch(&self, request: &BatchRequest) -> ServiceResult<BatchResult>;
}
