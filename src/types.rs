//! Common types used throughout Solidafy adapters
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type, the shape of every record an adapter emits
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Utilities
// ============================================================================

/// Render a scalar JSON value as an identifier string
///
/// Vendors use both string and numeric ids; anything else is not an id.
pub fn value_to_id(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_id() {
        assert_eq!(value_to_id(&json!("acc1")), Some("acc1".to_string()));
        assert_eq!(value_to_id(&json!(10042)), Some("10042".to_string()));
        assert_eq!(value_to_id(&json!("")), None);
        assert_eq!(value_to_id(&json!(null)), None);
        assert_eq!(value_to_id(&json!({"id": 1})), None);
    }
}
