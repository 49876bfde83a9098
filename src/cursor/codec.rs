//! Opaque cursor codec
//!
//! Wire format is `base64(JSON)` with absent fields omitted. The empty string
//! means "no cursor" in both directions.

use super::types::{CompositeCursor, CursorValue};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Encode a cursor into its opaque string form
///
/// `None` and a cursor with every field absent both encode to `""`, so an
/// all-absent cursor decodes back as `None` rather than `Some(empty)`. Every
/// other cursor survives `decode(encode(c))` unchanged.
pub fn encode<T: CursorValue>(cursor: Option<&CompositeCursor<T>>) -> Result<String> {
    let Some(cursor) = cursor.filter(|c| !c.is_empty()) else {
        return Ok(String::new());
    };

    let json = serde_json::to_vec(cursor)?;
    Ok(STANDARD.encode(json))
}

/// Decode an opaque cursor string
///
/// Returns `None` for the empty string (first page). Malformed input is a
/// page request error: the caller must not resend the same cursor.
pub fn decode<T: CursorValue>(encoded: &str) -> Result<Option<CompositeCursor<T>>> {
    if encoded.is_empty() {
        return Ok(None);
    }

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| Error::invalid_page_request(format!("Failed to decode base64 cursor: {e}")))?;

    let cursor: CompositeCursor<T> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::invalid_page_request(format!("Failed to unmarshal JSON cursor: {e}")))?;

    Ok(Some(cursor))
}
