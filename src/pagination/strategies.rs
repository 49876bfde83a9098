//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::offset::{next_offset, Offset};
use super::types::{CursorFamily, PageToken, PaginationConfig, Paginator, StopCondition};
use crate::decode::extract_path;
use crate::error::{Error, Result};
use crate::types::JsonValue;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination
///
/// Common patterns:
/// - `?startAt=100&maxResults=50`
/// - `?offset=100&limit=50`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Stop condition
    pub stop_condition: StopCondition,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        stop_condition: StopCondition,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            stop_condition,
        }
    }
}

impl Paginator<i64> for OffsetPaginator {
    fn query_params(&self, cursor: Option<&i64>, page_size: usize) -> Vec<(String, String)> {
        vec![
            (
                self.offset_param.clone(),
                cursor.copied().unwrap_or_default().to_string(),
            ),
            (self.limit_param.clone(), page_size.to_string()),
        ]
    }

    fn next_cursor(
        &self,
        body: &JsonValue,
        returned: usize,
        requested: usize,
        current: Option<&i64>,
    ) -> Result<Option<i64>> {
        let current = current.copied().unwrap_or_default();

        match &self.stop_condition {
            StopCondition::ShortPage => Ok(next_offset(returned, requested, current)),
            _ if returned == 0 => Ok(None),
            StopCondition::Field { path, value } => {
                let reached = extract_path(body, path)?.is_some_and(|v| &v == value);
                Ok((!reached).then(|| current.advance(returned)))
            }
            StopCondition::TotalCount { path } => {
                let next = current.advance(returned);
                match extract_path(body, path)?.and_then(|v| v.as_i64()) {
                    Some(total) => Ok((next < total).then_some(next)),
                    // No total in the body, fall back to the count heuristic
                    None => Ok(next_offset(returned, requested, current)),
                }
            }
        }
    }
}

// ============================================================================
// Token Pagination
// ============================================================================

/// Opaque token pagination (e.g., Slack)
///
/// The vendor's token is passed through unchanged. An absent or empty token
/// ends the sequence.
#[derive(Debug, Clone)]
pub struct TokenPaginator {
    /// Query parameter name for the token
    pub token_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Path to the next token in the response body
    pub next_token_path: String,
}

impl TokenPaginator {
    /// Create a new token paginator
    pub fn new(
        token_param: impl Into<String>,
        limit_param: impl Into<String>,
        next_token_path: impl Into<String>,
    ) -> Self {
        Self {
            token_param: token_param.into(),
            limit_param: limit_param.into(),
            next_token_path: next_token_path.into(),
        }
    }
}

impl Paginator<String> for TokenPaginator {
    fn query_params(&self, cursor: Option<&String>, page_size: usize) -> Vec<(String, String)> {
        let mut params = vec![(self.limit_param.clone(), page_size.to_string())];
        if let Some(token) = cursor.filter(|t| !t.is_empty()) {
            params.push((self.token_param.clone(), token.clone()));
        }
        params
    }

    fn next_cursor(
        &self,
        body: &JsonValue,
        _returned: usize,
        _requested: usize,
        _current: Option<&String>,
    ) -> Result<Option<String>> {
        match extract_path(body, &self.next_token_path)? {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::String(token)) => Ok(Some(token).filter(|t| !t.is_empty())),
            Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(Error::decode(format!(
                "next token at '{}' is not a string: {other}",
                self.next_token_path
            ))),
        }
    }
}

// ============================================================================
// Cursor Value Families
// ============================================================================

impl PageToken for i64 {
    const FAMILY: CursorFamily = CursorFamily::Offset;

    fn paginator(config: &PaginationConfig) -> Result<Box<dyn Paginator<Self>>> {
        match config {
            PaginationConfig::Offset {
                offset_param,
                limit_param,
                stop_condition,
            } => Ok(Box::new(OffsetPaginator::new(
                offset_param,
                limit_param,
                stop_condition.clone(),
            ))),
            PaginationConfig::Token { .. } => Err(family_mismatch(config, Self::FAMILY)),
        }
    }

    fn is_valid_position(&self) -> bool {
        *self >= 0
    }
}

impl PageToken for String {
    const FAMILY: CursorFamily = CursorFamily::Token;

    fn paginator(config: &PaginationConfig) -> Result<Box<dyn Paginator<Self>>> {
        match config {
            PaginationConfig::Token {
                token_param,
                limit_param,
                next_token_path,
            } => Ok(Box::new(TokenPaginator::new(
                token_param,
                limit_param,
                next_token_path,
            ))),
            PaginationConfig::Offset { .. } => Err(family_mismatch(config, Self::FAMILY)),
        }
    }

    fn is_valid_position(&self) -> bool {
        true
    }
}

fn family_mismatch(config: &PaginationConfig, wanted: CursorFamily) -> Error {
    Error::invalid_entity_config(format!(
        "{} pagination cannot drive a {wanted} cursor",
        config.family()
    ))
}
