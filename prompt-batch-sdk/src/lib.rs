//! Prompt Batch SDK
//!
//! This crate is the HTTP client for the data service behind the prompt test
//! wizard. It lists prompt templates and source records, and creates test
//! batches.
//!
//! # Features
//!
//! - **Typed listings**: template, session, case and voice call pages mapped
//!   onto the wizard's domain types
//! - **Transcript previews**: session transcripts are segmented as pages arrive
//! - **Automatic retries**: listing calls retry with exponential backoff and
//!   honour `Retry-After`
//! - **Single-shot submission**: batch creation is never retried
//! - **Multiple auth methods**: API key, bearer token, or basic auth
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use prompt_batch_sdk::{AuthConfig, PromptBatchClient, SdkConfig};
//! use prompt_batch_sdk::resources::templates::ListTemplatesParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SdkConfig::new("https://example.my.salesforce.com/services/apexrest/prompt-batch")
//!         .with_auth(AuthConfig::BearerToken("access-token".to_string()));
//!
//!     let client = PromptBatchClient::new(config)?;
//!
//!     let page = client
//!         .templates()
//!         .list(&ListTemplatesParams::new(20, 1).with_status("Active"))
//!         .await?;
//!     println!("Found {} templates", page.pagination.total_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Driving the wizard
//!
//! [`PromptBatchClient`] implements [`prompt_batch_core::BatchService`], so it
//! can be handed straight to the workflow engine:
//!
//! ```rust,ignore
//! let wizard = PromptTestWizard::new(Arc::new(client), WizardSettings::default());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod resources;

pub use client::HttpClient;
pub use config::{AuthConfig, RetryPolicy, SdkConfig, API_KEY_HEADER};
pub use error::{SdkError, SdkResult};
pub use resources::{BatchesClient, RecordsClient, TemplatesClient};

use async_trait::async_trait;
use prompt_batch_core::{
    BatchRequest, BatchResult, BatchService, RecordPage, RecordQuery, SelectOption,
    ServiceResult, TemplatePage, TemplateQuery,
};
use resources::templates::ListTemplatesParams;
use std::sync::Arc;

/// The client for the prompt batch data service.
///
/// Resource clients share one HTTP client, so cloning is cheap.
///
/// # Example
///
/// ```rust,no_run
/// use prompt_batch_sdk::{AuthConfig, PromptBatchClient, SdkConfig};
///
/// let config = SdkConfig::new("https://example.my.salesforce.com/services/apexrest/prompt-batch")
///     .with_auth(AuthConfig::ApiKey("your-key".to_string()));
///
/// let client = PromptBatchClient::new(config)?;
/// let templates = client.templates();
/// let records = client.records();
/// let batches = client.batches();
/// # Ok::<(), prompt_batch_sdk::SdkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PromptBatchClient {
    http_client: Arc<HttpClient>,
    templates: TemplatesClient,
    records: RecordsClient,
    batches: BatchesClient,
}

impl PromptBatchClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            templates: TemplatesClient::new(Arc::clone(&http_client)),
            records: RecordsClient::new(Arc::clone(&http_client)),
            batches: BatchesClient::new(Arc::clone(&http_client)),
            http_client,
        })
    }

    /// Create a new client using a builder pattern.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Prompt template listings.
    pub fn templates(&self) -> &TemplatesClient {
        &self.templates
    }

    /// Session, case and voice call listings.
    pub fn records(&self) -> &RecordsClient {
        &self.records
    }

    /// Test batch creation.
    pub fn batches(&self) -> &BatchesClient {
        &self.batches
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

#[async_trait]
impl BatchService for PromptBatchClient {
    async fn list_templates(&self, query: &TemplateQuery) -> ServiceResult<TemplatePage> {
        let params = ListTemplatesParams::from(query);
        let response = self.templates.list(&params).await?;
        Ok(response.into())
    }

    async fn list_records(&self, query: &RecordQuery) -> ServiceResult<RecordPage> {
        Ok(self.records.list(query).await?)
    }

    async fn list_status_options(&self) -> ServiceResult<Vec<SelectOption>> {
        Ok(self.records.status_options().await?)
    }

    async fn submit_batch(&self, request: &BatchRequest) -> ServiceResult<BatchResult> {
        Ok(self.batches.create(request).await?)
    }
}

/// Builder for creating a [`PromptBatchClient`] with fluent configuration.
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    /// Create a new client builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config = self.config.with_auth(auth);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_connect_timeout(timeout);
        self
    }

    /// Set the maximum number of retries for listing calls.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config = self.config.with_max_retries(max_retries);
        self
    }

    /// Set the retry backoff window.
    pub fn with_retry_backoff(
        mut self,
        initial: std::time::Duration,
        max: std::time::Duration,
    ) -> Self {
        self.config = self.config.with_retry_backoff(initial, max);
        self
    }

    /// Enable or disable request/response logging.
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.config = self.config.with_logging(enable);
        self
    }

    /// Add a custom header to all requests.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Set how many utterances each transcript preview keeps.
    pub fn with_preview_utterances(mut self, utterances: usize) -> Self {
        self.config = self.config.with_preview_utterances(utterances);
        self
    }

    /// Build the client.
    pub fn build(self) -> SdkResult<PromptBatchClient> {
        PromptBatchClient::new(self.config)
    }
}
