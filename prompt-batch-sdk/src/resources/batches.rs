//! Test batches resource client
//!
//! Creates prompt test batches. Every call creates a new batch on the
//! service, so requests are sent once and never retried.

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use prompt_batch_core::{BatchRequest, BatchResult, TemplateId, TestType};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// Client for test batch operations
#[derive(Debug, Clone)]
pub struct BatchesClient {
    client: Arc<HttpClient>,
}

impl BatchesClient {
    /// Create a new batches client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Create a test batch from an assembled request
    pub async fn create(&self, request: &BatchRequest) -> SdkResult<BatchResult> {
        request
            .validate()
            .map_err(|e| SdkError::ValidationError(e.to_string()))?;

        let body = CreateBatchRequest::from(request);
        tracing::info!(
            test_type = %request.test_type,
            records = body.record_ids.len(),
            "Creating test batch"
        );

        self.client.post_once("/batches", &body).await
    }
}

/// Flat request body accepted by the batch endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    pub test_type: TestType,
    pub record_ids: Vec<String>,
    pub primary_template_id: String,
    pub secondary_template_id: Option<String>,
    pub retriever_id: Option<String>,
    pub enable_quality_assessment: bool,
    pub faithfulness_template_id: Option<String>,
    pub relevancy_template_id: Option<String>,
    pub context_quality_template_id: Option<String>,
    pub primary_uses_knowledge_grounding: bool,
    pub secondary_uses_knowledge_grounding: bool,
}

impl From<&BatchRequest> for CreateBatchRequest {
    fn from(request: &BatchRequest) -> Self {
        let quality = &request.quality_assessment;
        let id = |id: &Option<TemplateId>| id.as_ref().map(|t| t.to_string());

        Self {
            test_type: request.test_type,
            record_ids: request.record_ids.iter().map(|id| id.to_string()).collect(),
            primary_template_id: request.primary_template_id.to_string(),
            secondary_template_id: id(&request.secondary_template_id),
            retriever_id: request.retriever_id.clone(),
            enable_quality_assessment: quality.enabled,
            faithfulness_template_id: id(&quality.faithfulness_template_id),
            relevancy_template_id: id(&quality.relevancy_template_id),
            context_quality_template_id: id(&quality.context_quality_template_id),
            primary_uses_knowledge_grounding: request.knowledge_grounding.primary,
            secondary_uses_knowledge_grounding: request.knowledge_grounding.secondary,
        }
    }
}
