//! YAML Loader module
//!
//! Parse datasource definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `DatasourceDefinition` - Declarative datasource description
//! - `EntityDefinition` - Entity path, record shape and pagination
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_definition, load_definition_from_str};
pub use types::{
    AuthDefinition, CollectionDefinition, DatasourceDefinition, EntityDefinition, HttpDefinition,
    PaginationDefinition, StopConditionDefinition,
};

#[cfg(test)]
mod tests;
