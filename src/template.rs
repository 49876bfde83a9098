//! Template interpolation for entity definitions
//!
//! Handles `{{ variable }}` interpolation in entity paths and query values.
//! Known roots are `collection_id` (the parent record being enumerated),
//! `filter` (the caller's per-entity filter) and `vars.*` (static values).

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Parent record id for nested entities
    pub collection_id: Option<String>,
    /// Caller-supplied filter, renders empty when absent
    pub filter: Value,
    /// Additional context variables
    pub vars: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent record id
    #[must_use]
    pub fn with_collection_id(mut self, collection_id: Option<&str>) -> Self {
        self.collection_id = collection_id.map(str::to_string);
        self
    }

    /// Set the caller's filter
    #[must_use]
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter.map_or(Value::Null, Value::from);
        self
    }

    /// Set additional variables
    #[must_use]
    pub fn with_vars(mut self, vars: Value) -> Self {
        self.vars = vars;
        self
    }

    /// Get a value by path (e.g., "vars.project")
    pub fn get(&self, path: &str) -> Option<Value> {
        let mut parts = path.split('.');
        match parts.next()? {
            "collection_id" if path == "collection_id" => {
                self.collection_id.as_deref().map(Value::from)
            }
            "filter" if path == "filter" => Some(self.filter.clone()),
            "vars" => {
                let mut current = &self.vars;
                for part in parts {
                    current = current.as_object()?.get(part)?;
                }
                Some(current.clone())
            }
            _ => None,
        }
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    if !has_templates(template) {
        return Ok(template.to_string());
    }

    let mut result = template.to_string();
    let mut errors = Vec::new();

    for cap in TEMPLATE_REGEX.captures_iter(template) {
        let full_match = &cap[0];
        let var_path = &cap[1];

        match ctx.get(var_path) {
            Some(value) => {
                result = result.replace(full_match, &value_to_string(&value));
            }
            None => errors.push(var_path.to_string()),
        }
    }

    if errors.is_empty() {
        Ok(result)
    } else {
        Err(Error::undefined_var(errors.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
