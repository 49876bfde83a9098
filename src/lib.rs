// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Solidafy Adapters
//!
//! Resumable full-sync pagination for paginated SaaS REST APIs.
//!
//! Every entity of a datasource is exposed behind one opaque cursor, even
//! when its records only exist inside parent records (group members) or are
//! spread across many parents (account entitlements).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use solidafy_adapters::adapter::{Adapter, Request, RestAdapter};
//! use solidafy_adapters::{load_definition, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let adapter = RestAdapter::new(&load_definition("jira")?)?;
//!
//!     let mut request = Request::new("group-members", "https://example.atlassian.net")
//!         .with_auth_token("me@example.com:api-token")
//!         .with_page_size(50);
//!
//!     loop {
//!         let page = adapter.get_page(&request).await?;
//!         // Persist page.next_cursor alongside the records
//!         if page.is_complete() || !page.is_success() {
//!             break;
//!         }
//!         request = request.with_cursor(page.next_cursor);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Adapter::get_page(Request) → Response              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!            cursor decode → validate → strategy → encode
//!                                │
//! ┌───────────────┬──────────────┴─────┬────────────────────────────┐
//! │     Flat      │   Member           │   Batch entitlement        │
//! ├───────────────┼────────────────────┼────────────────────────────┤
//! │ Offset pager  │ Collection advancer│ Batch filler               │
//! │ Token pager   │ one parent / call  │ parent blocks, overflow    │
//! └───────────────┴────────────────────┴────────────────────────────┘
//!                                │
//!                  PageFetcher → HTTP client + auth
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the adapters
pub mod error;

/// Common types and type aliases
pub mod types;

/// Opaque composite cursors
pub mod cursor;

/// Authentication schemes
pub mod auth;

/// HTTP client
pub mod http;

/// Pagination strategies and nested page engines
pub mod pagination;

/// Response decoders
pub mod decode;

/// Entity registry
pub mod entity;

/// YAML loader for datasource definitions
pub mod loader;

/// Built-in datasource definitions
pub mod definitions;

/// Template interpolation
pub mod template;

/// Datasource adapters
pub mod adapter;

/// Full-sync driver
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorCode, Result};
pub use types::*;

// Re-export commonly used types
pub use adapter::{Adapter, Request, Response, RestAdapter};
pub use cursor::CompositeCursor;
pub use loader::{load_definition, load_definition_from_str, DatasourceDefinition};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
