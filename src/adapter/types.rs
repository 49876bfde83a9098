//! Adapter contract types
//!
//! The page request a caller sends and the page it gets back. Cursors cross
//! this boundary as opaque strings.

use crate::error::Result;
use crate::types::JsonObject;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page request from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Entity to fetch
    pub entity_id: String,
    /// Maximum number of records on the returned page
    pub page_size: usize,
    /// Opaque cursor from the previous response, empty for the first page
    pub cursor: String,
    /// Credential for the datasource
    pub auth_token: String,
    /// Datasource base URL
    pub base_url: String,
    /// Filters keyed by entity id
    pub filters: HashMap<String, String>,
    /// Timeout for each upstream call, 0 uses the client default
    pub timeout_seconds: u64,
}

impl Request {
    /// Create a first-page request for `entity_id` at `base_url`
    pub fn new(entity_id: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            cursor: String::new(),
            auth_token: String::new(),
            base_url: base_url.into(),
            filters: HashMap::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the opaque cursor
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = cursor.into();
        self
    }

    /// Set the credential
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Add a filter for one entity
    #[must_use]
    pub fn with_filter(mut self, entity_id: impl Into<String>, filter: impl Into<String>) -> Self {
        self.filters.insert(entity_id.into(), filter.into());
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Filter configured for `entity_id`
    pub fn filter(&self, entity_id: &str) -> Option<&str> {
        self.filters.get(entity_id).map(String::as_str)
    }

    /// Per-call timeout, `None` when the client default applies
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

/// One page returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Vendor HTTP status
    pub status_code: u16,
    /// Vendor `Retry-After` header on throttled responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
    /// Records on this page
    pub objects: Vec<JsonObject>,
    /// Opaque cursor for the next page, empty when the sync is complete
    pub next_cursor: String,
}

impl Response {
    /// Vendor returned a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The full sync has no further pages
    pub fn is_complete(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

/// A datasource that serves entity pages behind opaque cursors
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Datasource name
    fn name(&self) -> &str;

    /// Fetch one page
    ///
    /// Non-2xx vendor statuses come back as a [`Response`], not an error.
    async fn get_page(&self, request: &Request) -> Result<Response>;
}
