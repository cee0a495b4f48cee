//! Prompt templates resource client
//!
//! Lists the prompt templates a batch can be configured with.

use crate::client::HttpClient;
use crate::error::SdkResult;
use prompt_batch_core::{PromptTemplate, SelectOption, TemplatePage, TemplateQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client for prompt template listings
#[derive(Debug, Clone)]
pub struct TemplatesClient {
    client: Arc<HttpClient>,
}

impl TemplatesClient {
    /// Create a new templates client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// List one page of prompt templates
    pub async fn list(&self, params: &ListTemplatesParams) -> SdkResult<TemplateListResponse> {
        self.client.get_with_query("/templates", params).await
    }
}

/// Query parameters for listing templates
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesParams {
    pub page_size: u32,
    pub page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_status: Option<String>,
}

impl ListTemplatesParams {
    pub fn new(page_size: u32, page_number: u32) -> Self {
        Self {
            page_size,
            page_number,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.template_name = Some(name.into());
        self
    }

    pub fn with_type(mut self, template_type: impl Into<String>) -> Self {
        self.template_type = Some(template_type.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.template_status = Some(status.into());
        self
    }
}

impl From<&TemplateQuery> for ListTemplatesParams {
    fn from(query: &TemplateQuery) -> Self {
        Self {
            page_size: query.page_size,
            page_number: query.page_number,
            template_name: query.name.clone(),
            template_type: query.template_type.clone(),
            template_status: query.status.clone(),
        }
    }
}

/// Pagination block attached to every listing response
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationInfo {
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// A page of templates as served
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListResponse {
    #[serde(default)]
    pub templates: Vec<PromptTemplate>,
    #[serde(default)]
    pub template_type_options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

impl From<TemplateListResponse> for TemplatePage {
    fn from(response: TemplateListResponse) -> Self {
        TemplatePage {
            templates: response.templates,
            template_type_options: response.template_type_options,
            total_count: response.pagination.total_count,
        }
    }
}
