//! CLI module
//!
//! Command-line interface for exercising datasource adapters.
//!
//! # Commands
//!
//! - `list` - Built-in datasources
//! - `validate` - Check a datasource definition
//! - `entities` - Entities with their shape and pagination
//! - `page` - Fetch one page
//! - `sync` - Page through an entity to completion
//! - `decode-cursor` / `encode-cursor` - Inspect opaque cursors

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PageArgs};
pub use runner::{parse_filters, Runner};
