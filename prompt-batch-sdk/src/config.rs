//! SDK configuration
//!
//! Connection, authentication and retry settings for the data service client.

use crate::error::{SdkError, SdkResult};
use prompt_batch_core::DEFAULT_MAX_UTTERANCES;
use reqwest::RequestBuilder;
use std::time::Duration;

/// Header carrying an API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Configuration for the SDK client
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Base URL of the data service
    pub base_url: String,

    /// Authentication method
    pub auth: AuthConfig,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Retry policy for listing calls
    pub retry: RetryPolicy,

    /// User agent string
    pub user_agent: String,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Custom headers to add to all requests
    pub custom_headers: Vec<(String, String)>,

    /// Utterances kept in each conversation's transcript preview
    pub preview_utterances: usize,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/services/apexrest/prompt-batch".to_string(),
            auth: AuthConfig::None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            user_agent: format!("prompt-batch-sdk/{}", env!("CARGO_PKG_VERSION")),
            enable_logging: false,
            custom_headers: Vec::new(),
            preview_utterances: DEFAULT_MAX_UTTERANCES,
        }
    }
}

impl SdkConfig {
    /// Create a new configuration with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the authentication method
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set how many times a listing call is retried
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Set the retry backoff window
    pub fn with_retry_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry.initial_backoff = initial;
        self.retry.max_backoff = max;
        self
    }

    /// Enable request/response logging
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    /// Add a custom header to all requests
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Set how many utterances a transcript preview keeps
    pub fn with_preview_utterances(mut self, utterances: usize) -> Self {
        self.preview_utterances = utterances;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> SdkResult<()> {
        if self.base_url.is_empty() {
            return Err(SdkError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        url::Url::parse(&self.base_url)?;

        if self.timeout.is_zero() {
            return Err(SdkError::ConfigurationError(
                "Timeout cannot be zero".to_string(),
            ));
        }

        if self.retry.initial_backoff > self.retry.max_backoff {
            return Err(SdkError::ConfigurationError(
                "Initial retry backoff exceeds the maximum backoff".to_string(),
            ));
        }

        if self.preview_utterances == 0 {
            return Err(SdkError::ConfigurationError(
                "Transcript previews need at least one utterance".to_string(),
            ));
        }

        Ok(())
    }
}

// ===== Retry Policy =====

/// Exponential backoff for idempotent calls.
///
/// Batch submission ignores this and always uses [`RetryPolicy::never`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any wait
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn never() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// A server-requested delay, capped by the policy.
    pub fn retry_after(&self, seconds: u64) -> Duration {
        Duration::from_secs(seconds).min(self.max_backoff)
    }
}

// ===== Authentication =====

/// Authentication configuration
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// No authentication
    None,

    /// API key sent in the `X-API-Key` header
    ApiKey(String),

    /// OAuth access token sent as a bearer token
    BearerToken(String),

    /// Username and password for basic auth
    Basic { username: String, password: String },
}

impl AuthConfig {
    /// Attach credentials to an outgoing request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AuthConfig::None => request,
            AuthConfig::ApiKey(key) => request.header(API_KEY_HEADER, key.as_str()),
            AuthConfig::BearerToken(token) => request.bearer_auth(token),
            AuthConfig::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    /// Header name used by this method, for log lines.
    pub fn header_name(&self) -> Option<&'static str> {
        match self {
            AuthConfig::None => None,
            AuthConfig::ApiKey(_) => Some(API_KEY_HEADER),
            AuthConfig::BearerToken(_) | AuthConfig::Basic { .. } => Some("Authorization"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_of(auth: &AuthConfig, name: &str) -> Option<String> {
        let request = auth
            .apply(reqwest::Client::new().get("http://localhost/templates"))
            .build()
            .unwrap();
        request
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.preview_utterances, 6);
        assert!(config.user_agent.starts_with("prompt-batch-sdk/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_setters() {
        let config = SdkConfig::new("https://example.my.salesforce.com/services/apexrest/prompt-batch")
            .with_auth(AuthConfig::BearerToken("00Dxx!token".to_string()))
            .with_timeout(Duration::from_secs(60))
            .with_max_retries(1)
            .with_preview_utterances(4);

        assert!(matches!(config.auth, AuthConfig::BearerToken(_)));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.preview_utterances, 4);
    }

    #[test]
    fn test_api_key_goes_in_its_own_header() {
        let auth = AuthConfig::ApiKey("my-key".to_string());
        assert_eq!(header_of(&auth, API_KEY_HEADER).as_deref(), Some("my-key"));
        assert_eq!(header_of(&auth, "authorization"), None);
        assert_eq!(auth.header_name(), Some(API_KEY_HEADER));
    }

    #[test]
    fn test_authorization_header_schemes() {
        let bearer = AuthConfig::BearerToken("my-token".to_string());
        assert_eq!(
            header_of(&bearer, "authorization").as_deref(),
            Some("Bearer my-token")
        );

        let basic = AuthConfig::Basic {
            username: "user".to_string(),
            password: "pass".to_string(),
        };
        assert_eq!(
            header_of(&basic, "authorization").as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );

        assert_eq!(header_of(&AuthConfig::None, "authorization"), None);
        assert_eq!(AuthConfig::None.header_name(), None);
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.retry_after(60), Duration::from_millis(350));
        assert_eq!(RetryPolicy::never().max_retries, 0);
    }

    #[test]
    fn test_invalid_config() {
        assert!(SdkConfig::new("").validate().is_err());
        assert!(SdkConfig::new("not a url").validate().is_err());
        assert!(SdkConfig::default()
            .with_preview_utterances(0)
            .validate()
            .is_err());
        assert!(SdkConfig::default()
            .with_retry_backoff(Duration::from_secs(5), Duration::from_secs(1))
            .validate()
            .is_err());
    }
}
