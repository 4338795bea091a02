//! HTTP client implementation
//!
//! This module implements the request/response plumbing used against the
//! RPG Assistant REST API. It provides request/response types, error
//! handling, client configuration and the core HTTP client.
//!
//! There is no retry or offline queueing here: a request runs to completion
//! or failure as decided by the transport, and HTTP errors are surfaced to
//! the caller as [`ApiError`].

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Error Types
// =============================================================================

/// API error with HTTP status and message
///
/// Status `0` is used for failures that never produced an HTTP status:
/// transport errors, unreadable bodies and JSON that does not match the
/// expected shape.
///
/// # Examples
/// ```
/// use api_client::http::ApiError;
///
/// let error = ApiError::new(404, "Not Found", "Campaign not found");
/// assert_eq!(error.status(), 404);
/// assert!(!error.is_transport_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API error {status}: {error} - {message}")]
pub struct ApiError {
    /// HTTP status code
    status: u16,
    /// Error code (e.g., "Not Found", "NetworkError", "ParseError")
    error: String,
    /// Human-readable error message
    message: String,
    /// `detail` string from the server's error body, when present
    detail: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
            detail: None,
        }
    }

    /// Attach the server-provided detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Get the error code
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the server-provided detail message
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Check if the request failed before an HTTP status was received
    pub fn is_transport_error(&self) -> bool {
        self.status == 0
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
}

impl HttpMethod {
    /// Get the method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// API request
///
/// Represents a request to an endpoint with method, path, headers and an
/// optional body. The path is appended verbatim to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path (e.g., "/campaigns/")
    pub path: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (for POST/PUT)
    pub body: Option<Vec<u8>>,
    /// Encoding type (e.g., "application/json")
    pub encoding: Option<String>,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            encoding: None,
        }
    }

    /// Create a new GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a new POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a new PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Create a new DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Authorize the request with a bearer token
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {}", token))
    }

    /// Set the request body from JSON
    pub fn json_body<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.body = Some(body);
        self.encoding = Some("application/json".to_string());
        Ok(self)
    }

    /// Set a form-encoded request body
    ///
    /// Pairs are percent-encoded and joined in the given order.
    pub fn form_body(mut self, fields: &[(&str, &str)]) -> Self {
        let encoded = fields
            .iter()
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        self.body = Some(encoded.into_bytes());
        self.encoding = Some("application/x-www-form-urlencoded".to_string());
        self
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// API response
///
/// Generic response from an endpoint with headers and decoded data.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Create a new response
    pub fn new(status: u16, headers: HashMap<String, String>, data: T) -> Self {
        Self {
            status,
            headers,
            data,
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base service URL (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rpg-assistant/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config with a base URL
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

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Error Response Format
// =============================================================================

/// Error body returned by the backend (`{"detail": ...}`)
///
/// `detail` is a string for handled errors and a list of objects for
/// request validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error detail
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// The detail as a plain message, if it is a string
    pub fn message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

// =============================================================================
// Client Implementation
// =============================================================================

use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};

/// HTTP client for the RPG Assistant API
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Examples
/// ```
/// use api_client::http::{ApiClient, ApiClientConfig, ApiRequest};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ApiClient::new(ApiClientConfig::new("http://localhost:8000"))?;
///
///     let request = ApiRequest::get("/campaigns/").bearer("token");
///     let response = client.send::<serde_json::Value>(request).await?;
///
///     println!("{} campaigns", response.data.as_array().map_or(0, |a| a.len()));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client
    client: ReqwestClient,
    /// Configuration
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ApiError::new(0, "ClientError", format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Send a request and decode the JSON response body
    pub async fn send<T>(&self, request: ApiRequest) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(&request.path);
        tracing::debug!(method = request.method.as_str(), path = %request.path, "sending request");

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            if let Some(encoding) = &request.encoding {
                req = req.header("Content-Type", encoding);
            }
            req = req.body(body);
        }

        let response = req.send().await.map_err(|e| {
            tracing::warn!(path = %request.path, "request failed: {}", e);
            ApiError::new(0, "NetworkError", format!("Request failed: {}", e))
        })?;

        self.parse_response(response).await
    }

    /// Parse reqwest response into ApiResponse
    async fn parse_response<T>(&self, response: ReqwestResponse) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(key.to_string(), value_str.to_string());
            }
        }

        if !status.is_success() {
            let code = status.canonical_reason().unwrap_or("Unknown");
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "request returned error status");

            let detail = serde_json::from_str::<ErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.message().map(str::to_string));

            return Err(match detail {
                Some(detail) => ApiError::new(status.as_u16(), code, detail.clone()).with_detail(detail),
                None => ApiError::new(
                    status.as_u16(),
                    code,
                    format!("HTTP {}: {}", status.as_u16(), error_body),
                ),
            });
        }

        let body = response.text().await.map_err(|e| {
            ApiError::new(0, "ParseError", format!("Failed to read response: {}", e))
        })?;

        let data: T = serde_json::from_str(&body).map_err(|e| {
            ApiError::new(0, "ParseError", format!("Failed to parse JSON: {}", e))
        })?;

        Ok(ApiResponse::new(status.as_u16(), headers, data))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

// =============================================================================
// Tests
// =============================================================================
