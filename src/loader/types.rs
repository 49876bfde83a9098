//! Loader types
//!
//! Declarative datasource definition types for YAML parsing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Datasource Definition
// ============================================================================

/// Top-level datasource definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatasourceDefinition {
    /// Datasource name
    pub name: String,
    /// Definition version
    #[serde(default = "default_version")]
    pub version: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// How the request's auth token is attached
    #[serde(default)]
    pub auth: AuthDefinition,
    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpDefinition,
    /// Static values exposed to templates as `vars.*`
    #[serde(default)]
    pub vars: serde_json::Value,
    /// Entity definitions
    pub entities: Vec<EntityDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Authentication definition
///
/// Only describes placement. The credential itself arrives with each page
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDefinition {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `Authorization: Basic <token>`, or `user:password` to be encoded
    Basic,
    /// Token in a custom header or query parameter
    ApiKey {
        /// Header or query parameter name
        name: String,
        /// Where to place the key: `header` or `query`
        #[serde(default = "default_auth_location")]
        location: String,
        /// Prefix before the token (e.g., "Token ")
        #[serde(default)]
        prefix: Option<String>,
    },
    /// No authentication
    None,
}

fn default_auth_location() -> String {
    "header".to_string()
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// User agent
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

// ============================================================================
// Entity Definition
// ============================================================================

/// Entity definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntityDefinition {
    /// Entity external id (e.g., "users")
    pub id: String,
    /// URL path relative to the request's base URL (can contain templates)
    pub path: String,
    /// Path to the record array in the response, whole body if absent
    #[serde(default)]
    pub records_path: Option<String>,
    /// Attribute holding each record's unique id
    pub unique_id: String,
    /// Pagination configuration
    #[serde(default)]
    pub pagination: PaginationDefinition,
    /// Query parameters (can contain templates)
    #[serde(default)]
    pub query: HashMap<String, String>,
    /// Parent collection this entity lives inside
    #[serde(default)]
    pub collection: Option<CollectionDefinition>,
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Pagination configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationDefinition {
    /// Offset-based pagination
    Offset {
        /// Offset parameter name
        #[serde(default = "default_offset_param")]
        offset_param: String,
        /// Limit parameter name
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Stop condition
        #[serde(default)]
        stop: StopConditionDefinition,
    },
    /// Opaque token pagination
    Token {
        /// Token parameter name
        #[serde(default = "default_token_param")]
        token_param: String,
        /// Limit parameter name
        #[serde(default = "default_limit_param")]
        limit_param: String,
        /// Path to the next token in the response
        next_token_path: String,
    },
}

impl Default for PaginationDefinition {
    fn default() -> Self {
        Self::Offset {
            offset_param: default_offset_param(),
            limit_param: default_limit_param(),
            stop: StopConditionDefinition::default(),
        }
    }
}

fn default_offset_param() -> String {
    "offset".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

fn default_token_param() -> String {
    "cursor".to_string()
}

/// Stop condition for offset pagination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopConditionDefinition {
    /// Stop on a page shorter than requested
    #[default]
    ShortPage,
    /// Stop when total count is reached
    TotalCount {
        /// JSON path to total count
        path: String,
    },
    /// Stop when field equals value
    Field {
        /// JSON path to field
        path: String,
        /// Value to match
        value: serde_json::Value,
    },
}

// ============================================================================
// Collection Definition
// ============================================================================

/// How a nested entity relates to its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CollectionDefinition {
    /// Members of one parent at a time (e.g., group members)
    Member {
        /// Parent entity id
        parent: String,
        /// Attribute to write the parent id into on each member
        #[serde(default)]
        member_of_attribute: Option<String>,
        /// Rewrite member ids to `{parent}-{member}`
        #[serde(default)]
        compose_id: bool,
    },
    /// Children of many parents packed per page (e.g., account entitlements)
    BatchEntitlement {
        /// Parent entity id
        parent: String,
        /// Parents fetched per batch
        #[serde(default = "default_parent_batch_size")]
        parent_batch_size: usize,
        /// Parent attribute that is `false` when it has no children
        #[serde(default)]
        has_children_attribute: Option<String>,
        /// Attribute to write the parent id into on each child
        #[serde(default)]
        parent_id_attribute: Option<String>,
    },
}

impl CollectionDefinition {
    /// Parent entity id
    pub fn parent(&self) -> &str {
        match self {
            Self::Member { parent, .. } | Self::BatchEntitlement { parent, .. } => parent,
        }
    }
}

fn default_parent_batch_size() -> usize {
    100
}
