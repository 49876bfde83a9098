//! Entity module
//!
//! Resolves entity definitions into runtime entities and selects each one's
//! page strategy (flat fetch, collection advancer, or batch filler).

mod registry;
mod types;

pub use registry::{pagination_config, EntityRegistry};
pub use types::{Entity, EntityShape, EntityStrategy};
