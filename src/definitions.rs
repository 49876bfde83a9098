//! Built-in datasource definitions embedded in the binary
//!
//! Lets callers use `--datasource jira` instead of a path to a YAML file.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in datasource YAML definitions
pub static BUILTIN_DEFINITIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // Work management
        m.insert("jira", include_str!("../definitions/jira.yaml"));

        // Collaboration
        m.insert("slack", include_str!("../definitions/slack.yaml"));

        m
    });

/// Get a built-in definition by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_DEFINITIONS.get(name.to_lowercase().as_str()).copied()
}

/// Check if a name refers to a built-in definition
pub fn is_builtin(name: &str) -> bool {
    get_builtin(name).is_some()
}

/// List built-in definition names, sorted
pub fn list_builtin() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_DEFINITIONS.keys().copied().collect();
    names.sort_unstable();
    names
}
