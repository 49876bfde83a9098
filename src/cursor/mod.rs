//! Composite cursor module
//!
//! One cursor type threaded through every adapter, plus its opaque wire codec
//! and the shape validator that runs before any network call.
//!
//! # Overview
//!
//! - `CompositeCursor<T>` - Position in the current page sequence, optionally
//!   scoped to a parent collection and that collection's own position
//! - `encode` / `decode` - `base64(JSON)` opaque token, `""` is "no cursor"
//! - `validate` - Rejects cursors whose fields don't fit the entity shape

mod codec;
mod types;
mod validate;

pub use codec::{decode, encode};
pub use types::{CompositeCursor, CursorValue};
pub use validate::validate;

#[cfg(test)]
mod tests;
