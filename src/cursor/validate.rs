//! Cursor shape validation

use super::types::CompositeCursor;
use crate::error::{Error, Result};

/// Check that a decoded cursor only carries fields legal for the entity
///
/// Flat entities must never see collection fields. Collection members may
/// carry a bare collection cursor (advance to the next parent), but a child
/// position without the parent it belongs to cannot be resumed.
pub fn validate<T>(
    cursor: Option<&CompositeCursor<T>>,
    entity_id: &str,
    is_collection_member: bool,
) -> Result<()> {
    let Some(cursor) = cursor else {
        return Ok(());
    };

    if !is_collection_member {
        if cursor.has_collection_fields() {
            return Err(Error::invalid_page_request(format!(
                "Cursor must not contain CollectionID or CollectionCursor fields for entity {entity_id}"
            )));
        }
        return Ok(());
    }

    if cursor.cursor.is_some() && cursor.collection_id.is_none() {
        return Err(Error::invalid_page_request(format!(
            "Cursor does not have CollectionID set for entity {entity_id}"
        )));
    }

    Ok(())
}
