//! Datasource adapters
//!
//! `Adapter` is the caller-facing page contract. `RestAdapter` serves it
//! for any REST datasource described by a YAML definition.

mod rest;
mod types;

pub use rest::RestAdapter;
pub use types::{Adapter, Request, Response, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECONDS};
