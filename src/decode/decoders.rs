//! JSON record decoder

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    /// Entity the records belong to, for error messages
    entity: String,
    /// Path to the record array, the whole body if absent
    records_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as the record array
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            records_path: None,
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Set the record path if one is configured
    #[must_use]
    pub fn with_optional_path(mut self, path: Option<&str>) -> Self {
        self.records_path = path.map(str::to_string);
        self
    }

    /// Decode the records of a response body
    ///
    /// A missing record path yields no records. Anything other than an array
    /// of objects at the path aborts the page.
    pub fn records(&self, body: &Value) -> Result<Vec<JsonObject>> {
        let extracted = match &self.records_path {
            Some(path) => extract_path(body, path)?,
            None => Some(body.clone()),
        };

        match extracted {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::datasource_failed(
                        &self.entity,
                        format!("record {i} is not an object: {other}"),
                    )),
                })
                .collect(),
            // A bare object body with no record path is a single record
            Some(Value::Object(map)) if self.records_path.is_none() => Ok(vec![map]),
            Some(other) => Err(Error::datasource_failed(
                &self.entity,
                format!(
                    "expected an array at '{}', found {}",
                    self.records_path.as_deref().unwrap_or("$"),
                    type_name(&other)
                ),
            )),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Path Lookup
// ============================================================================

/// Look up a value by dotted path or JSONPath
///
/// Plain paths like `response_metadata.next_cursor` (with or without a
/// leading `$.`) are walked directly. Wildcard paths go through JSONPath.
pub fn extract_path(value: &Value, path: &str) -> Result<Option<Value>> {
    if path.contains('*') {
        return extract_with_jsonpath(value, path);
    }
    Ok(extract_simple_path(value, path))
}

fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        // Array indexing like "values[0]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index = part[bracket_pos + 1..].strip_suffix(']')?.parse::<usize>().ok()?;

            if !name.is_empty() {
                current = current.get(name)?;
            }
            current = current.as_array()?.get(index)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Option<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Null => Ok(None),
        Value::Array(arr) if arr.is_empty() => Ok(None),
        other => Ok(Some(other)),
    }
}
