//! HTTP client for upstream page requests
//!
//! A thin wrapper over `reqwest` that:
//! - Applies default headers, the user agent and per-request timeouts
//! - Attaches the caller's credential through an [`Authenticator`]
//! - Passes non-2xx statuses through untouched, with their `Retry-After`
//!
//! There is no retry loop here. Retrying is the caller's decision.

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Default request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("solidafy-adapters/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Add several default headers
    pub fn headers(mut self, headers: &HashMap<String, String>) -> Self {
        for (key, value) in headers {
            self.config.default_headers.insert(key.clone(), value.clone());
        }
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn queries(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Upstream response as seen by the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw `Retry-After` header value, if any
    pub retry_after: Option<String>,
    /// Parsed JSON body; `None` for non-2xx and empty bodies
    pub body: Option<Value>,
}

impl HttpResponse {
    /// Check if the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client used by the adapters
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let headers = default_header_map(&config.default_headers)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Issue a GET and parse a JSON body
    ///
    /// Vendor failures (non-2xx) are returned as a response, not an error.
    pub async fn get_json(
        &self,
        url: Url,
        request: &RequestConfig,
        auth: &Authenticator,
        token: &str,
    ) -> Result<HttpResponse> {
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let mut req = self.client.get(url.clone()).timeout(timeout);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        req = auth.apply(req, token);

        debug!("GET {} ({} query params)", url, request.query.len());

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                timeout_error(timeout)
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            debug!("Upstream returned {} for {}", status.as_u16(), url);
            return Ok(HttpResponse {
                status: status.as_u16(),
                retry_after,
                body: None,
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                timeout_error(timeout)
            } else {
                Error::Http(e)
            }
        })?;

        let body = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            None
        } else {
            let value: Value = serde_json::from_str(&text)
                .map_err(|e| Error::decode(format!("response from {url} is not JSON: {e}")))?;
            Some(value)
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            retry_after,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn default_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            Error::invalid_datasource_config(format!("Invalid header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::invalid_datasource_config(format!("Invalid value for header '{key}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

#[allow(clippy::cast_possible_truncation)]
fn timeout_error(timeout: Duration) -> Error {
    Error::Timeout {
        timeout_ms: timeout.as_millis() as u64,
    }
}
