//! YAML parser for datasource definitions
//!
//! Parses and validates datasource YAML files.
//! Supports both built-in definitions (by name) and custom YAML files (by path).

use crate::definitions;
use crate::entity::EntityRegistry;
use crate::error::{Error, Result};
use crate::loader::types::DatasourceDefinition;
use std::fs;
use std::path::Path;

/// Load a datasource definition from a name or file path
///
/// Built-in names (e.g., "jira") are checked first, then the input is read
/// as a file path.
///
/// # Examples
///
/// ```ignore
/// let jira = load_definition("jira")?;
/// let custom = load_definition("./my-datasource.yaml")?;
/// ```
pub fn load_definition(path: impl AsRef<Path>) -> Result<DatasourceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    // Built-in names have no path separators and no .yaml extension
    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = definitions::get_builtin(&path_str) {
            return load_definition_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::invalid_datasource_config(format!(
                "Datasource '{}' not found. Built-in datasources: {}. Or provide a path to a YAML file.",
                path.display(),
                definitions::list_builtin().join(", ")
            ))
        } else {
            Error::invalid_datasource_config(format!(
                "Failed to read datasource file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_definition_from_str(&content)
}

/// Load a datasource definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<DatasourceDefinition> {
    let def: DatasourceDefinition = serde_yaml::from_str(yaml).map_err(|e| {
        Error::invalid_datasource_config(format!("Failed to parse datasource YAML: {e}"))
    })?;

    validate_definition(&def)?;
    Ok(def)
}

/// Validate a datasource definition
fn validate_definition(def: &DatasourceDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::invalid_datasource_config(
            "Datasource name cannot be empty",
        ));
    }

    if def.entities.is_empty() {
        return Err(Error::invalid_datasource_config(
            "Datasource must have at least one entity",
        ));
    }

    if !def.vars.is_null() && !def.vars.is_object() {
        return Err(Error::invalid_datasource_config(
            "Datasource vars must be a mapping",
        ));
    }

    // Entity-level rules live with the registry
    EntityRegistry::from_definition(def).map(|_| ())
}
