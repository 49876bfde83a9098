//! Error types for Solidafy adapters
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every variant maps onto one of the caller-facing [`ErrorCode`]s.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The main error type for Solidafy adapters
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid datasource config: {message}")]
    InvalidDatasourceConfig { message: String },

    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },

    #[error("Invalid entity config: {message}")]
    InvalidEntityConfig { message: String },

    #[error("Entity '{entity}' is not defined for datasource '{datasource}'")]
    UnknownEntity { datasource: String, entity: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Datasource response for entity '{entity}' is invalid: {message}")]
    DatasourceFailed { entity: String, message: String },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a datasource config error
    pub fn invalid_datasource_config(message: impl Into<String>) -> Self {
        Self::InvalidDatasourceConfig {
            message: message.into(),
        }
    }

    /// Create a page request error (bad cursor, bad page size)
    pub fn invalid_page_request(message: impl Into<String>) -> Self {
        Self::InvalidPageRequest {
            message: message.into(),
        }
    }

    /// Create an entity config error
    pub fn invalid_entity_config(message: impl Into<String>) -> Self {
        Self::InvalidEntityConfig {
            message: message.into(),
        }
    }

    /// Create an unknown entity error
    pub fn unknown_entity(datasource: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            datasource: datasource.into(),
            entity: entity.into(),
        }
    }

    /// Create a datasource response error
    pub fn datasource_failed(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DatasourceFailed {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create a JSONPath error
    pub fn json_path(message: impl Into<String>) -> Self {
        Self::JsonPath {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Caller-facing classification of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidDatasourceConfig { .. } | Error::YamlParse(_) | Error::InvalidUrl(_) => {
                ErrorCode::InvalidDatasourceConfig
            }
            Error::InvalidPageRequest { .. } => ErrorCode::InvalidPageRequestConfig,
            Error::InvalidEntityConfig { .. }
            | Error::UnknownEntity { .. }
            | Error::UndefinedVariable { .. } => ErrorCode::InvalidEntityConfig,
            Error::DatasourceFailed { .. } => ErrorCode::DatasourceFailed,
            Error::JsonParse(_)
            | Error::Http(_)
            | Error::Timeout { .. }
            | Error::JsonPath { .. }
            | Error::Decode { .. }
            | Error::Io(_)
            | Error::Other(_)
            | Error::Anyhow(_) => ErrorCode::Internal,
        }
    }

    /// Check if this error is retryable
    ///
    /// Only transport failures qualify. The library never retries on its own;
    /// this is a hint for the caller's retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Error codes surfaced to the framework layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad static datasource configuration
    InvalidDatasourceConfig,
    /// Bad cursor or page size
    InvalidPageRequestConfig,
    /// Unknown entity or missing required attribute
    InvalidEntityConfig,
    /// Transport, parse, or unexpected-shape failures
    Internal,
    /// Vendor response missing an expected field
    DatasourceFailed,
}

impl ErrorCode {
    /// Wire name of the code
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidDatasourceConfig => "INVALID_DATASOURCE_CONFIG",
            ErrorCode::InvalidPageRequestConfig => "INVALID_PAGE_REQUEST_CONFIG",
            ErrorCode::InvalidEntityConfig => "INVALID_ENTITY_CONFIG",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::DatasourceFailed => "DATASOURCE_FAILED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for Solidafy adapters
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
