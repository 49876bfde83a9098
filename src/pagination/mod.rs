//! Pagination module
//!
//! Supports: Offset (count heuristic, is-last flag, total count), Opaque token,
//! Member collections, Batch entitlements
//!
//! # Overview
//!
//! Flat entities page through a `Paginator`. Nested entities are driven by
//! the `CollectionAdvancer` (one parent per call) or the `BatchFiller`
//! (children of many parents packed into one page). Both nested engines issue
//! their sub-fetches through the `PageFetcher` seam, so they compose over any
//! flat page source.

mod batch;
mod collection;
mod offset;
mod strategies;
mod types;

pub use batch::BatchFiller;
pub use collection::{AdvanceState, CollectionAdvancer};
pub use offset::{next_offset, Offset};
pub use strategies::{OffsetPaginator, TokenPaginator};
pub use types::{
    CursorFamily, Page, PageFetcher, PageRequest, PageToken, PaginationConfig, Paginator,
    StopCondition, STATUS_NO_CONTENT, STATUS_OK,
};
