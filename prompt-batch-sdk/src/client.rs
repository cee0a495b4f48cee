//! HTTP client implementation
//!
//! This module provides the core HTTP client for the SDK. Listing calls are
//! retried with exponential backoff; batch creation goes out exactly once.

use crate::config::{RetryPolicy, SdkConfig};
use crate::error::{SdkError, SdkResult};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Response header carrying the service's request identifier
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// The HTTP client for making API requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: Arc<SdkConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in &config.custom_headers {
            match (
                header::HeaderName::try_from(name.as_str()),
                header::HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid custom header"),
            }
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SdkError::NetworkError)?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Build the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Make a GET request, retrying transient failures
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let response = self
            .execute::<(), ()>(Method::GET, path, None, None, &self.config.retry)
            .await?;
        self.read_response(response).await
    }

    /// Make a GET request with query parameters, retrying transient failures
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> SdkResult<T> {
        let response = self
            .execute::<(), Q>(Method::GET, path, None, Some(query), &self.config.retry)
            .await?;
        self.read_response(response).await
    }

    /// Make a POST request exactly once.
    ///
    /// Used for calls that are not idempotent, so no failure is ever retried.
    pub async fn post_once<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> SdkResult<T> {
        let response = self
            .execute::<B, ()>(Method::POST, path, Some(body), None, &RetryPolicy::never())
            .await?;
        self.read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(&self, response: Response) -> SdkResult<T> {
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = retry_after_secs(&response);
        let text = response.text().await.map_err(SdkError::NetworkError)?;

        if self.config.enable_logging {
            debug!("Response body: {}", text);
        }

        if status.is_success() {
            serde_json::from_str(&text).map_err(SdkError::SerializationError)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Err(SdkError::RateLimited {
                retry_after: retry_after.unwrap_or(60),
            })
        } else {
            Err(SdkError::from_response(status.as_u16(), &text, request_id))
        }
    }

    /// Send a request, retrying whatever [`SdkError::is_retryable`] accepts
    /// up to the policy's limit.
    ///
    /// The final attempt's error response is returned as a response so the
    /// caller can read the service's message from its body.
    async fn execute<B: Serialize, Q: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
        policy: &RetryPolicy,
    ) -> SdkResult<Response> {
        let url = self.url(path);
        let body_json = body.map(serde_json::to_string).transpose()?;

        let mut attempts = 0;

        loop {
            let mut request = self
                .config
                .auth
                .apply(self.client.request(method.clone(), &url));

            if let Some(q) = query {
                request = request.query(q);
            }

            if let Some(ref body_str) = body_json {
                request = request.body(body_str.clone());
            }

            if self.config.enable_logging {
                debug!(
                    auth_header = ?self.config.auth.header_name(),
                    "Request: {} {}", method, url
                );
                if let Some(ref body_str) = body_json {
                    debug!("Request body: {}", body_str);
                }
            }

            let failure = match request.send().await {
                Ok(response) => match transient_status(&response) {
                    Some(err) => (err, Some(response)),
                    None => return Ok(response),
                },
                Err(e) => {
                    error!("Request failed: {}", e);
                    let err = if e.is_timeout() {
                        SdkError::Timeout(self.config.timeout.as_secs())
                    } else {
                        SdkError::NetworkError(e)
                    };
                    (err, None)
                }
            };

            let (err, response) = failure;
            if !err.is_retryable() || attempts >= policy.max_retries {
                return match response {
                    Some(response) => Ok(response),
                    None => Err(err),
                };
            }

            attempts += 1;
            let backoff = match err {
                SdkError::RateLimited { retry_after } => {
                    warn!("Rate limited, retry after {} seconds", retry_after);
                    policy.retry_after(retry_after)
                }
                other => {
                    warn!(error = %other, "Transient failure, will retry");
                    policy.backoff(attempts)
                }
            };

            info!(
                "Retrying request (attempt {}/{}), waiting {:?}",
                attempts, policy.max_retries, backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

/// Error for a response the retry loop may try again, if any.
fn transient_status(response: &Response) -> Option<SdkError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        Some(SdkError::RateLimited {
            retry_after: retry_after_secs(response).unwrap_or(60),
        })
    } else if status.is_server_error() {
        Some(SdkError::ServerError(format!("Status: {}", status)))
    } else {
        None
    }
}

fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
}
