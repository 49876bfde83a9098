//! Pagination types and traits
//!
//! Defines the page contract shared by flat fetches and the nested engines,
//! and the per-entity pagination configuration.

use crate::cursor::CursorValue;
use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;

/// HTTP status of a successful page
pub const STATUS_OK: u16 = 200;

/// HTTP status of a page that scanned parents but produced no records
pub const STATUS_NO_CONTENT: u16 = 204;

// ============================================================================
// Page Contract
// ============================================================================

/// One flat page request against a single entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<T> {
    /// Entity to fetch
    pub entity_id: String,
    /// Maximum number of records requested
    pub page_size: usize,
    /// Vendor page position, `None` for the first page
    pub cursor: Option<T>,
    /// Parent record the entity is scoped to
    pub collection_id: Option<String>,
}

impl<T> PageRequest<T> {
    /// Create a first-page request
    pub fn new(entity_id: impl Into<String>, page_size: usize) -> Self {
        Self {
            entity_id: entity_id.into(),
            page_size,
            cursor: None,
            collection_id: None,
        }
    }

    /// Set the vendor page position
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<T>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Scope the request to a parent record
    #[must_use]
    pub fn with_collection_id(mut self, collection_id: impl Into<String>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }
}

/// One page of records plus the position of the following page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Vendor HTTP status, forwarded verbatim
    pub status_code: u16,
    /// Vendor `Retry-After` header, if any
    pub retry_after: Option<String>,
    /// Records on this page
    pub objects: Vec<JsonObject>,
    /// Position of the next page, `None` when the sequence is exhausted
    pub next_cursor: Option<T>,
}

impl<T> Page<T> {
    /// Create a successful page
    pub fn ok(objects: Vec<JsonObject>, next_cursor: Option<T>) -> Self {
        Self {
            status_code: STATUS_OK,
            retry_after: None,
            objects,
            next_cursor,
        }
    }

    /// Create an empty page that still carries a cursor forward
    pub fn no_content(next_cursor: Option<T>) -> Self {
        Self {
            status_code: STATUS_NO_CONTENT,
            retry_after: None,
            objects: Vec::new(),
            next_cursor,
        }
    }

    /// Create a pass-through page for a non-success vendor status
    pub fn status(status_code: u16, retry_after: Option<String>) -> Self {
        Self {
            status_code,
            retry_after,
            objects: Vec::new(),
            next_cursor: None,
        }
    }

    /// Vendor returned a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the page has no records
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keep only the status of this page, dropping records and cursor
    pub fn into_status<U>(self) -> Page<U> {
        Page::status(self.status_code, self.retry_after)
    }

    /// Transform the cursor type
    pub fn map_cursor<U>(self, f: impl FnOnce(T) -> U) -> Page<U> {
        Page {
            status_code: self.status_code,
            retry_after: self.retry_after,
            objects: self.objects,
            next_cursor: self.next_cursor.map(f),
        }
    }
}

/// Flat page source the nested engines compose over
#[async_trait]
pub trait PageFetcher<T: CursorValue>: Send + Sync {
    /// Fetch one flat page of an entity
    async fn fetch(&self, request: PageRequest<T>) -> Result<Page<T>>;
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Cursor value family an entity paginates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorFamily {
    /// Numeric offset (`i64`)
    Offset,
    /// Opaque vendor token (`String`)
    Token,
}

impl std::fmt::Display for CursorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offset => f.write_str("offset"),
            Self::Token => f.write_str("token"),
        }
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationConfig {
    /// Offset-based pagination (e.g., Jira `startAt` / `maxResults`)
    Offset {
        /// Query parameter name for offset
        offset_param: String,
        /// Query parameter name for limit
        limit_param: String,
        /// Stop condition
        stop_condition: StopCondition,
    },

    /// Opaque token pagination (e.g., Slack `cursor`)
    Token {
        /// Query parameter name for the token
        token_param: String,
        /// Query parameter name for limit
        limit_param: String,
        /// Path to the next token in the response body
        next_token_path: String,
    },
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::offset("offset", "limit", StopCondition::ShortPage)
    }
}

impl PaginationConfig {
    /// Create offset pagination config
    pub fn offset(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        stop_condition: StopCondition,
    ) -> Self {
        Self::Offset {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            stop_condition,
        }
    }

    /// Create token pagination config
    pub fn token(
        token_param: impl Into<String>,
        limit_param: impl Into<String>,
        next_token_path: impl Into<String>,
    ) -> Self {
        Self::Token {
            token_param: token_param.into(),
            limit_param: limit_param.into(),
            next_token_path: next_token_path.into(),
        }
    }

    /// Cursor value family this config produces
    pub fn family(&self) -> CursorFamily {
        match self {
            Self::Offset { .. } => CursorFamily::Offset,
            Self::Token { .. } => CursorFamily::Token,
        }
    }
}

/// When an offset sequence ends
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StopCondition {
    /// Stop when fewer records than requested come back
    #[default]
    ShortPage,

    /// Stop when a field has a specific value (e.g., `isLast: true`)
    Field {
        /// Path to the field
        path: String,
        /// Value that ends the sequence
        value: JsonValue,
    },

    /// Stop when the next offset reaches the reported total
    TotalCount {
        /// Path to the total count field
        path: String,
    },
}

impl StopCondition {
    /// Create a field-based stop condition
    pub fn field(path: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Field {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Create a total count stop condition
    pub fn total_count(path: impl Into<String>) -> Self {
        Self::TotalCount { path: path.into() }
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Core trait for pagination strategies
pub trait Paginator<T>: Send + Sync {
    /// Query parameters selecting the page at `cursor`
    fn query_params(&self, cursor: Option<&T>, page_size: usize) -> Vec<(String, String)>;

    /// Position of the page after the one just returned
    fn next_cursor(
        &self,
        body: &JsonValue,
        returned: usize,
        requested: usize,
        current: Option<&T>,
    ) -> Result<Option<T>>;
}

/// Cursor value types that know how to build their paginator
pub trait PageToken: CursorValue + Sized {
    /// Cursor value family of this type
    const FAMILY: CursorFamily;

    /// Build the paginator for a config of this type's family
    fn paginator(config: &PaginationConfig) -> Result<Box<dyn Paginator<Self>>>;

    /// True if a caller-supplied position can be sent upstream
    fn is_valid_position(&self) -> bool;
}
