//! Authentication module
//!
//! Supports: Bearer, Basic, API Key (header or query)

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthScheme, Location};

#[cfg(test)]
mod tests;
