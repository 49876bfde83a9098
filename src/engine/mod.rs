//! Execution engine module
//!
//! Drives an adapter through a full sync by feeding each page's
//! `next_cursor` into the following request.
//!
//! # Overview
//!
//! - [`page_stream`] - pages as a `futures` stream, ending after the
//!   terminal page or the first non-2xx page
//! - [`SyncEngine`] - drives a whole run, handing records to a callback
//!   page by page or collecting them into a [`SyncOutcome`]

mod types;

pub use types::{SyncConfig, SyncOutcome, SyncStats, SyncStatus};

use crate::adapter::{Adapter, Request, Response};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use futures::stream::{self, Stream, TryStreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Stream every page of a full sync starting at `request.cursor`
pub fn page_stream<'a, A>(
    adapter: &'a A,
    request: Request,
) -> impl Stream<Item = Result<Response>> + Send + 'a
where
    A: Adapter + ?Sized,
{
    stream::try_unfold(Some(request), move |state| async move {
        let Some(request) = state else {
            return Ok(None);
        };

        let response = adapter.get_page(&request).await?;
        let next = (response.is_success() && !response.is_complete())
            .then(|| request.clone().with_cursor(response.next_cursor.clone()));

        Ok::<_, Error>(Some((response, next)))
    })
}

/// Sync engine for collecting a full sync
pub struct SyncEngine<A> {
    /// Adapter serving the pages
    adapter: A,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics of the last run
    stats: SyncStats,
}

impl<A: Adapter> SyncEngine<A> {
    /// Create a new sync engine
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run a full sync for one entity, collecting every record
    pub async fn run(&mut self, request: Request) -> Result<SyncOutcome> {
        let mut objects = Vec::new();
        let mut outcome = self
            .run_each(request, |page| objects.extend(page))
            .await?;
        outcome.objects = objects;
        Ok(outcome)
    }

    /// Run a full sync for one entity, handing each page's records to `on_page`
    ///
    /// Records are not retained: the returned outcome's `objects` is empty.
    pub async fn run_each<F>(&mut self, request: Request, mut on_page: F) -> Result<SyncOutcome>
    where
        F: FnMut(Vec<JsonObject>) + Send,
    {
        let start = Instant::now();
        self.stats = SyncStats::default();

        info!(
            datasource = self.adapter.name(),
            entity = %request.entity_id,
            page_size = request.page_size,
            "Starting sync"
        );

        let mut resume_cursor = request.cursor.clone();
        let mut status = SyncStatus::Complete;

        let pages = page_stream(&self.adapter, request);
        futures::pin_mut!(pages);

        while let Some(response) = pages.try_next().await? {
            if !response.is_success() {
                warn!(
                    status = response.status_code,
                    retry_after = ?response.retry_after,
                    "Sync interrupted by upstream status"
                );
                status = SyncStatus::Interrupted {
                    status_code: response.status_code,
                    retry_after: response.retry_after,
                };
                break;
            }

            self.stats.add_page(response.objects.len());
            debug!(
                page = self.stats.pages_fetched,
                records = response.objects.len(),
                "Page synced"
            );

            resume_cursor = response.next_cursor;
            on_page(response.objects);

            if resume_cursor.is_empty() {
                break;
            }
            if self.limit_reached() {
                status = SyncStatus::LimitReached;
                break;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        self.stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            records = self.stats.records_synced,
            pages = self.stats.pages_fetched,
            empty_pages = self.stats.empty_pages,
            "Completed sync"
        );

        Ok(SyncOutcome {
            status,
            objects: Vec::new(),
            resume_cursor,
            stats: self.stats.clone(),
        })
    }

    fn limit_reached(&self) -> bool {
        (self.config.max_pages > 0 && self.stats.pages_fetched >= self.config.max_pages)
            || (self.config.max_records > 0 && self.stats.records_synced >= self.config.max_records)
    }
}

#[cfg(test)]
mod tests;
