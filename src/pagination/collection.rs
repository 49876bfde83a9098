//! Collection advancer
//!
//! Syncs an entity that only exists inside a parent record (members inside a
//! group) behind one flat cursor. Each call either resumes the current
//! parent's children or steps to the next single parent, then fetches one
//! page of that parent's children. A parent with no children yields an empty
//! page that points at the next parent; parents are never skipped in bulk.

use super::types::{Page, PageFetcher, PageRequest};
use crate::cursor::{CompositeCursor, CursorValue};
use crate::error::{Error, Result};
use crate::types::{value_to_id, JsonObject, JsonValue};
use tracing::debug;

/// Where the advancer is within one `advance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceState<T> {
    /// Fetch the next single parent at `collection_cursor`
    AdvanceParent {
        /// Parent collection position, `None` for the first parent
        collection_cursor: Option<T>,
    },
    /// Fetch one page of children for `collection_id`
    FetchChildren {
        /// Current parent
        collection_id: String,
        /// Child position within the parent
        cursor: Option<T>,
        /// Position of the parent after this one
        collection_cursor: Option<T>,
    },
    /// Parent collection exhausted
    Done,
}

impl<T> AdvanceState<T> {
    /// Initial state for an incoming cursor
    pub fn start(cursor: Option<CompositeCursor<T>>) -> Self {
        let cursor = cursor.unwrap_or_default();
        match cursor.collection_id {
            Some(collection_id) => Self::FetchChildren {
                collection_id,
                cursor: cursor.cursor,
                collection_cursor: cursor.collection_cursor,
            },
            None => Self::AdvanceParent {
                collection_cursor: cursor.collection_cursor,
            },
        }
    }
}

/// Drives a member entity through its parent collection
#[derive(Debug, Clone)]
pub struct CollectionAdvancer {
    member: String,
    parent: String,
    parent_id_attribute: String,
    member_of_attribute: Option<String>,
    composed_id_attribute: Option<String>,
}

impl CollectionAdvancer {
    /// Create an advancer for `member` records scoped to `parent` records
    pub fn new(
        member: impl Into<String>,
        parent: impl Into<String>,
        parent_id_attribute: impl Into<String>,
    ) -> Self {
        Self {
            member: member.into(),
            parent: parent.into(),
            parent_id_attribute: parent_id_attribute.into(),
            member_of_attribute: None,
            composed_id_attribute: None,
        }
    }

    /// Write the parent id into each member under `attribute`
    #[must_use]
    pub fn with_member_of_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.member_of_attribute = Some(attribute.into());
        self
    }

    /// Rewrite each member's `attribute` to `{parent}-{member}`
    #[must_use]
    pub fn with_composed_id(mut self, attribute: impl Into<String>) -> Self {
        self.composed_id_attribute = Some(attribute.into());
        self
    }

    /// Produce the next member page for `cursor`
    pub async fn advance<T, F>(
        &self,
        fetcher: &F,
        page_size: usize,
        cursor: Option<CompositeCursor<T>>,
    ) -> Result<Page<CompositeCursor<T>>>
    where
        T: CursorValue,
        F: PageFetcher<T> + ?Sized,
    {
        let mut state = AdvanceState::start(cursor);

        loop {
            state = match state {
                AdvanceState::AdvanceParent { collection_cursor } => {
                    debug!(parent = %self.parent, position = ?collection_cursor, "Advancing to next parent");

                    let request = PageRequest::new(&self.parent, 1).with_cursor(collection_cursor);
                    let page = fetcher.fetch(request).await?;
                    if !page.is_success() {
                        return Ok(page.into_status());
                    }

                    match page.objects.first() {
                        Some(parent) => AdvanceState::FetchChildren {
                            collection_id: self.parent_id(parent)?,
                            cursor: None,
                            collection_cursor: page.next_cursor,
                        },
                        None => AdvanceState::Done,
                    }
                }
                AdvanceState::FetchChildren {
                    collection_id,
                    cursor,
                    collection_cursor,
                } => {
                    debug!(member = %self.member, %collection_id, position = ?cursor, "Fetching members");

                    let request = PageRequest::new(&self.member, page_size)
                        .with_cursor(cursor)
                        .with_collection_id(&collection_id);
                    let page = fetcher.fetch(request).await?;
                    if !page.is_success() {
                        return Ok(page.into_status());
                    }

                    let objects = page
                        .objects
                        .into_iter()
                        .map(|member| self.tag_member(member, &collection_id))
                        .collect();

                    // The parent id only matters while its children are unfinished
                    let next = CompositeCursor {
                        collection_id: page.next_cursor.as_ref().map(|_| collection_id),
                        cursor: page.next_cursor,
                        collection_cursor,
                    };

                    return Ok(Page {
                        status_code: page.status_code,
                        retry_after: page.retry_after,
                        objects,
                        next_cursor: next.into_next(),
                    });
                }
                AdvanceState::Done => {
                    debug!(parent = %self.parent, "Parent collection exhausted");
                    return Ok(Page::ok(Vec::new(), None));
                }
            };
        }
    }

    fn parent_id(&self, parent: &JsonObject) -> Result<String> {
        parent
            .get(&self.parent_id_attribute)
            .and_then(value_to_id)
            .ok_or_else(|| {
                Error::datasource_failed(
                    &self.parent,
                    format!(
                        "parent record is missing id attribute '{}'",
                        self.parent_id_attribute
                    ),
                )
            })
    }

    fn tag_member(&self, mut member: JsonObject, collection_id: &str) -> JsonObject {
        if let Some(attribute) = &self.member_of_attribute {
            member.insert(attribute.clone(), JsonValue::from(collection_id));
        }
        if let Some(attribute) = &self.composed_id_attribute {
            if let Some(id) = member.get(attribute).and_then(value_to_id) {
                member.insert(
                    attribute.clone(),
                    JsonValue::from(format!("{collection_id}-{id}")),
                );
            }
        }
        member
    }
}
