//! REST transport for the Clipbook API
//!
//! This module implements the HTTP layer the typed agent builds on:
//! request/response types, error classification, retry helpers, and the
//! core client. The client carries the bearer credential for the current
//! session in a shared slot that is read at call time, so a sign-in or
//! sign-out anywhere in the app is visible to every request issued after
//! it.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::sleep;

// =============================================================================
// Transport Errors
// =============================================================================

/// Failure reported by the HTTP layer
///
/// Covers both transport-level failures, which carry status 0 because no
/// response ever arrived, and rejections the booking service produced.
///
/// # Examples
/// ```
/// use booking_client::rest::RestError;
///
/// let error = RestError::new(401, "ApiError", "Incorrect email/password combination");
/// assert_eq!(error.status(), 401);
/// assert!(!error.is_network_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestError {
    status: u16,
    error: String,
    message: String,
}

impl RestError {
    /// Build an error from its parts
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// HTTP status code; 0 when the request never reached the server
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Short error code such as "ApiError" or "NetworkError"
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this failure is worth retrying
    ///
    /// True for unreachable-server failures and for the transient HTTP
    /// statuses 408, 425, 429, 500, 502, 503, 504, 522 and 524.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self.status,
            0 | 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524
        )
    }

    /// Alias for [`is_network_error`](Self::is_network_error)
    pub fn is_recoverable(&self) -> bool {
        self.is_network_error()
    }
}

impl std::fmt::Display for RestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API error {} ({}): {}", self.status, self.error, self.message)
    }
}

impl std::error::Error for RestError {}

// =============================================================================
// Requests and Responses
// =============================================================================

/// One request to the booking service
///
/// Built with the method constructors plus chained builders for query
/// parameters, headers, and body.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint path relative to the base URL (e.g., "providers")
    pub path: String,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body, already encoded
    pub body: Option<Vec<u8>>,
    /// Content type sent alongside the body
    pub content_type: Option<String>,
}

impl RestRequest {
    fn with_method(method: Method, path: impl Into<String>, content_type: Option<&str>) -> Self {
        Self {
            method,
            path: path.into(),
            params: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            content_type: content_type.map(str::to_string),
        }
    }

    /// A GET request for the given path
    pub fn get(path: impl Into<String>) -> Self {
        Self::with_method(Method::GET, path, None)
    }

    /// A POST request for the given path, presumed to carry JSON
    pub fn post(path: impl Into<String>) -> Self {
        Self::with_method(Method::POST, path, Some("application/json"))
    }

    /// A PUT request for the given path, presumed to carry JSON
    pub fn put(path: impl Into<String>) -> Self {
        Self::with_method(Method::PUT, path, Some("application/json"))
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Serialize `value` as the JSON body
    pub fn json_body<T: Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.content_type = Some("application/json".to_string());
        Ok(self)
    }
}

/// A decoded response from the booking service
#[derive(Debug, Clone)]
pub struct RestResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Decoded body
    pub data: T,
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    /// Base service URL (e.g., "https://api.clipbook.app")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.clipbook.app".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Clipbook/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RestClientConfig {
    /// Default configuration pointed at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Error body the booking service returns on failure
///
/// The service wraps every handled failure as
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestErrorResponse {
    /// Human-readable error message
    pub message: String,
}

// =============================================================================
// Retry Policy
// =============================================================================

/// Exponential backoff settings for retried requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Ceiling applied to every computed delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a retry budget
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Set the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let scaled =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(scaled as u64).min(self.max_delay)
    }
}

/// Run `operation` until it succeeds, the error is not retryable, or the
/// retry budget runs out
///
/// # Examples
/// ```
/// use booking_client::rest::{retry, RetryConfig, RestError};
///
/// async fn fetch() -> Result<String, RestError> {
///     retry(
///         RetryConfig::new(2),
///         |err: &RestError| err.is_network_error(),
///         || async { Ok("pong".to_string()) },
///     )
///     .await
/// }
/// ```
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    should_retry: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if attempt >= config.max_retries || !should_retry(&err) {
            return Err(err);
        }

        sleep(config.delay_for(attempt)).await;
        attempt += 1;
    }
}

/// Retry `operation` on transient network failures only
pub async fn network_retry<F, Fut, T>(max_retries: usize, operation: F) -> Result<T, RestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RestError>>,
{
    retry(
        RetryConfig::new(max_retries),
        |err: &RestError| err.is_network_error(),
        operation,
    )
    .await
}

// =============================================================================
// REST Client
// =============================================================================

/// HTTP client for the booking service
///
/// Wraps reqwest with the service's conventions: a base URL, JSON error
/// body parsing, and a bearer-credential slot consulted on every request.
/// Cloning shares the credential slot.
///
/// # Examples
/// ```no_run
/// use booking_client::rest::{RestClient, RestClientConfig, RestRequest};
/// use booking_client::types::Provider;
///
/// async fn providers() -> Result<Vec<Provider>, Box<dyn std::error::Error>> {
///     let client = RestClient::new(RestClientConfig::default());
///     client.set_bearer_token(Some("abc"));
///
///     let response = client
///         .execute::<Vec<Provider>>(RestRequest::get("providers"))
///         .await?;
///     Ok(response.data)
/// }
/// ```
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    config: RestClientConfig,
    bearer: Arc<RwLock<Option<String>>>,
}

impl RestClient {
    /// Create a new client with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("HTTP client construction failed");

        Self {
            client,
            config,
            bearer: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the bearer credential used for authenticated requests
    ///
    /// `None` clears the credential. The new value applies to every
    /// request issued after this call, on this client and its clones.
    pub fn set_bearer_token(&self, token: Option<&str>) {
        let mut bearer = self.bearer.write().unwrap();
        *bearer = token.map(|t| t.to_string());
    }

    /// Get the current bearer credential, if any
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer.read().unwrap().clone()
    }

    /// Execute a request and deserialize the response body
    pub async fn execute<T>(&self, request: RestRequest) -> Result<RestResponse<T>, RestError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let RestRequest {
            method,
            path,
            params,
            headers,
            body,
            content_type,
        } = request;

        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let inject_bearer = !headers.contains_key("Authorization");
        let mut builder = self.client.request(method, &url).query(&params);

        for (key, value) in &headers {
            builder = builder.header(key, value);
        }
        if inject_bearer {
            if let Some(token) = self.bearer_token() {
                builder = builder.header("Authorization", format!("Bearer {}", token));
            }
        }
        if let Some(body) = body {
            if let Some(content_type) = &content_type {
                builder = builder.header("Content-Type", content_type);
            }
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RestError::new(0, "NetworkError", format!("Request failed: {}", e)))?;

        Self::decode_response(response).await
    }

    /// Execute a request, retrying transient network failures
    pub async fn execute_with_retry<T>(
        &self,
        request: RestRequest,
        max_retries: usize,
    ) -> Result<RestResponse<T>, RestError>
    where
        T: for<'de> Deserialize<'de>,
    {
        network_retry(max_retries, || self.execute(request.clone())).await
    }

    async fn decode_response<T>(response: reqwest::Response) -> Result<RestResponse<T>, RestError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(text) = value.to_str() {
                headers.insert(name.to_string(), text.to_string());
            }
        }

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<RestErrorResponse>(&body) {
                Ok(service) => RestError::new(status, "ApiError", service.message),
                Err(_) => RestError::new(status, "Unknown", format!("HTTP {}: {}", status, body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RestError::new(0, "ParseError", format!("Failed to read response: {}", e)))?;
        let data = serde_json::from_str(&body)
            .map_err(|e| RestError::new(0, "ParseError", format!("Failed to parse JSON: {}", e)))?;

        Ok(RestResponse {
            status,
            headers,
            data,
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Retry Tests
// =============================================================================
