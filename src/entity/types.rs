//! Entity types
//!
//! Runtime form of an entity definition with its page strategy resolved.

use crate::decode::JsonDecoder;
use crate::pagination::{BatchFiller, CollectionAdvancer, CursorFamily, PaginationConfig};
use crate::types::StringMap;

/// Where an entity's records live relative to other entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityShape {
    /// Top-level collection
    Flat,
    /// Inside one parent record at a time
    Member,
    /// Children of many parents packed per page
    BatchEntitlement,
}

impl EntityShape {
    /// Cursors for this shape may carry collection fields
    pub fn is_collection_member(self) -> bool {
        !matches!(self, Self::Flat)
    }
}

impl std::fmt::Display for EntityShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat => f.write_str("flat"),
            Self::Member => f.write_str("member"),
            Self::BatchEntitlement => f.write_str("batch_entitlement"),
        }
    }
}

/// How pages of an entity are produced
#[derive(Debug, Clone)]
pub enum EntityStrategy {
    /// Single flat fetch
    Flat,
    /// One parent per call
    Member(CollectionAdvancer),
    /// Parent batches packed into full pages
    BatchEntitlement(BatchFiller),
}

impl EntityStrategy {
    /// Shape this strategy serves
    pub fn shape(&self) -> EntityShape {
        match self {
            Self::Flat => EntityShape::Flat,
            Self::Member(_) => EntityShape::Member,
            Self::BatchEntitlement(_) => EntityShape::BatchEntitlement,
        }
    }
}

/// A fully resolved entity
#[derive(Debug, Clone)]
pub struct Entity {
    /// Entity external id
    pub id: String,
    /// URL path template
    pub path: String,
    /// Path to the record array in the response
    pub records_path: Option<String>,
    /// Attribute holding each record's unique id
    pub unique_id: String,
    /// Pagination configuration
    pub pagination: PaginationConfig,
    /// Query parameter templates
    pub query: StringMap,
    /// Parent entity id for nested shapes
    pub parent: Option<String>,
    /// Page strategy
    pub strategy: EntityStrategy,
}

impl Entity {
    /// Shape of this entity
    pub fn shape(&self) -> EntityShape {
        self.strategy.shape()
    }

    /// Cursor value family this entity paginates with
    pub fn family(&self) -> CursorFamily {
        self.pagination.family()
    }

    /// Decoder for this entity's response bodies
    pub fn decoder(&self) -> JsonDecoder {
        JsonDecoder::new(&self.id).with_optional_path(self.records_path.as_deref())
    }
}
