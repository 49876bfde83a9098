//! Batch entitlement filler
//!
//! Fills one output page with child records (entitlements) drawn from a
//! block of parent records (accounts) fetched at their own batch size.
//! Children of several parents are concatenated; a parent whose children
//! overflow the page is revisited on the next call at the exact child
//! offset where this call stopped.
//!
//! Cursor fields for this shape:
//! - `collection_cursor` - absolute offset of the parent to start from
//! - `collection_id` - id of that parent, guards a child resume position
//! - `cursor` - child offset within that parent

use super::offset::Offset;
use super::types::{Page, PageFetcher, PageRequest};
use crate::cursor::CompositeCursor;
use crate::error::{Error, Result};
use crate::types::{value_to_id, JsonObject, JsonValue};
use tracing::{debug, warn};

/// Packs children of consecutive parents into full pages
#[derive(Debug, Clone)]
pub struct BatchFiller {
    child: String,
    parent: String,
    parent_id_attribute: String,
    child_id_attribute: String,
    parent_batch_size: usize,
    has_children_attribute: Option<String>,
    parent_ref_attribute: Option<String>,
}

impl BatchFiller {
    /// Create a filler for `child` records scoped to `parent` records
    pub fn new(
        child: impl Into<String>,
        child_id_attribute: impl Into<String>,
        parent: impl Into<String>,
        parent_id_attribute: impl Into<String>,
        parent_batch_size: usize,
    ) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            parent_id_attribute: parent_id_attribute.into(),
            child_id_attribute: child_id_attribute.into(),
            parent_batch_size,
            has_children_attribute: None,
            parent_ref_attribute: None,
        }
    }

    /// Skip parents whose `attribute` is `false`
    #[must_use]
    pub fn with_has_children_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.has_children_attribute = Some(attribute.into());
        self
    }

    /// Write the parent id into each child under `attribute`
    #[must_use]
    pub fn with_parent_ref_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.parent_ref_attribute = Some(attribute.into());
        self
    }

    /// Fill the next output page for `cursor`
    pub async fn fill<F>(
        &self,
        fetcher: &F,
        page_size: usize,
        cursor: Option<CompositeCursor<i64>>,
    ) -> Result<Page<CompositeCursor<i64>>>
    where
        F: PageFetcher<i64> + ?Sized,
    {
        let cursor = cursor.unwrap_or_default();
        let base = cursor.collection_cursor.unwrap_or_default();

        debug!(parent = %self.parent, offset = base, size = self.parent_batch_size, "Fetching parent batch");
        let request = PageRequest::new(&self.parent, self.parent_batch_size).with_cursor(Some(base));
        let batch = fetcher.fetch(request).await?;
        if !batch.is_success() {
            return Ok(batch.into_status());
        }

        let batch_next = batch
            .next_cursor
            .map(|next| CompositeCursor::new().with_collection_cursor(next));
        if batch.objects.is_empty() {
            return Ok(Page::no_content(batch_next));
        }

        let batch_len = batch.objects.len();
        let mut objects: Vec<JsonObject> = Vec::with_capacity(page_size);

        for (i, parent) in batch.objects.iter().enumerate() {
            let parent_offset = base.advance(i);

            if !self.has_children(parent) {
                debug!(parent = %self.parent, offset = parent_offset, "Skipping parent without children");
                continue;
            }

            let parent_id = self.parent_id(parent)?;
            let mut start = if i == 0 {
                self.resume_offset(&cursor, &parent_id)
            } else {
                0
            };

            loop {
                let request = PageRequest::new(&self.child, page_size)
                    .with_cursor(Some(start))
                    .with_collection_id(&parent_id);
                let children = fetcher.fetch(request).await?;
                if !children.is_success() {
                    return Ok(children.into_status());
                }

                let fetched = children.objects.len();
                objects.extend(
                    children
                        .objects
                        .into_iter()
                        .map(|child| self.tag_child(child, &parent_id)),
                );

                if objects.len() > page_size {
                    let excess = objects.len() - page_size;
                    objects.truncate(page_size);

                    let resume = start.advance(fetched - excess);
                    debug!(%parent_id, resume, "Page overflowed, parent will be revisited");
                    let next = CompositeCursor::at(resume)
                        .with_collection_id(parent_id)
                        .with_collection_cursor(parent_offset);
                    return Ok(Page::ok(objects, Some(next)));
                }

                if objects.len() == page_size {
                    let next = match children.next_cursor {
                        Some(child_next) => CompositeCursor::at(child_next)
                            .with_collection_id(parent_id)
                            .with_collection_cursor(parent_offset),
                        None if i + 1 < batch_len => CompositeCursor::new()
                            .with_collection_id(parent_id)
                            .with_collection_cursor(parent_offset.advance(1)),
                        None => CompositeCursor {
                            cursor: None,
                            collection_id: Some(parent_id),
                            collection_cursor: batch_next.as_ref().and_then(|c| c.collection_cursor),
                        },
                    };
                    return Ok(Page::ok(objects, next.into_next()));
                }

                match children.next_cursor {
                    Some(child_next) => start = child_next,
                    None => break,
                }
            }
        }

        if objects.is_empty() {
            return Ok(Page::no_content(batch_next));
        }
        Ok(Page::ok(objects, batch_next))
    }

    /// Child offset to resume the first parent of the batch at
    fn resume_offset(&self, cursor: &CompositeCursor<i64>, parent_id: &str) -> i64 {
        let Some(offset) = cursor.cursor else {
            return 0;
        };

        if cursor.collection_id.as_deref() == Some(parent_id) {
            offset
        } else {
            warn!(
                expected = ?cursor.collection_id,
                found = %parent_id,
                "Parent at resume position changed, restarting its children"
            );
            0
        }
    }

    fn has_children(&self, parent: &JsonObject) -> bool {
        match &self.has_children_attribute {
            Some(attribute) => !matches!(parent.get(attribute), Some(JsonValue::Bool(false))),
            None => true,
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

    fn tag_child(&self, mut child: JsonObject, parent_id: &str) -> JsonObject {
        if let Some(id) = child.get(&self.child_id_attribute).and_then(value_to_id) {
            child.insert(
                self.child_id_attribute.clone(),
                JsonValue::from(format!("{parent_id}-{id}")),
            );
        }
        if let Some(attribute) = &self.parent_ref_attribute {
            child.insert(attribute.clone(), JsonValue::from(parent_id));
        }
        child
    }
}
