//! Cursor types
//!
//! `CompositeCursor` is generic over the vendor's native page token: an `i64`
//! offset for offset APIs, a `String` for opaque-token APIs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Bound for the vendor page-token type carried inside a cursor
pub trait CursorValue:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> CursorValue for T where
    T: Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Continuation state for one entity's full sync
///
/// Absent fields are omitted from the wire form, never written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeCursor<T> {
    /// Position within the current (possibly nested) page sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<T>,

    /// Parent record currently being enumerated
    #[serde(rename = "collectionID", skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    /// Position within the parent collection's own page sequence
    #[serde(rename = "collectionCursor", skip_serializing_if = "Option::is_none")]
    pub collection_cursor: Option<T>,
}

impl<T> Default for CompositeCursor<T> {
    fn default() -> Self {
        Self {
            cursor: None,
            collection_id: None,
            collection_cursor: None,
        }
    }
}

impl<T> CompositeCursor<T> {
    /// Create an empty cursor (first page)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flat cursor at the given position
    pub fn at(cursor: T) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    /// Wrap an optional flat position, `None` staying `None`
    pub fn from_position(cursor: Option<T>) -> Option<Self> {
        cursor.map(Self::at)
    }

    /// Set the position within the current page sequence
    #[must_use]
    pub fn with_cursor(mut self, cursor: T) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set the parent collection id
    #[must_use]
    pub fn with_collection_id(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    /// Set the parent collection position
    #[must_use]
    pub fn with_collection_cursor(mut self, cursor: T) -> Self {
        self.collection_cursor = Some(cursor);
        self
    }

    /// True if every field is absent
    pub fn is_empty(&self) -> bool {
        self.cursor.is_none() && self.collection_id.is_none() && self.collection_cursor.is_none()
    }

    /// True if either collection field is present
    pub fn has_collection_fields(&self) -> bool {
        self.collection_id.is_some() || self.collection_cursor.is_some()
    }

    /// Collapse an outgoing cursor that carries no position into `None`
    ///
    /// A collection id alone does not resume anything: once both positions
    /// are exhausted the sync is complete.
    pub fn into_next(self) -> Option<Self> {
        if self.cursor.is_none() && self.collection_cursor.is_none() {
            None
        } else {
            Some(self)
        }
    }
}
