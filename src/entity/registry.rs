//! Entity registry
//!
//! Immutable lookup table built once from a datasource definition and
//! injected into adapters.

use super::types::{Entity, EntityStrategy};
use crate::error::{Error, Result};
use crate::loader::{
    CollectionDefinition, DatasourceDefinition, EntityDefinition, PaginationDefinition,
    StopConditionDefinition,
};
use crate::pagination::{
    BatchFiller, CollectionAdvancer, CursorFamily, PaginationConfig, StopCondition,
};
use crate::template::extract_variables;
use std::collections::HashMap;

/// Entities of one datasource, keyed by external id
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    datasource: String,
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Build the registry for a datasource definition
    pub fn from_definition(def: &DatasourceDefinition) -> Result<Self> {
        Self::new(&def.name, &def.entities)
    }

    /// Build a registry from entity definitions
    ///
    /// Nested entities must name an existing flat parent with the same cursor
    /// family. Batch entities paginate by offset.
    pub fn new(datasource: impl Into<String>, defs: &[EntityDefinition]) -> Result<Self> {
        let datasource = datasource.into();

        let mut by_id: HashMap<&str, &EntityDefinition> = HashMap::new();
        for def in defs {
            if def.id.is_empty() {
                return Err(Error::invalid_datasource_config("Entity id cannot be empty"));
            }
            if by_id.insert(&def.id, def).is_some() {
                return Err(Error::invalid_datasource_config(format!(
                    "Duplicate entity id '{}'",
                    def.id
                )));
            }
        }

        let mut entities = Vec::with_capacity(defs.len());
        let mut index = HashMap::with_capacity(defs.len());
        for def in defs {
            validate_entity(def)?;
            let parent = def
                .collection
                .as_ref()
                .map(|c| resolve_parent(def, c, &by_id))
                .transpose()?;

            index.insert(def.id.clone(), entities.len());
            entities.push(build_entity(def, parent)?);
        }

        Ok(Self {
            datasource,
            entities,
            index,
        })
    }

    /// Datasource the entities belong to
    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    /// Look up an entity by external id
    pub fn get(&self, id: &str) -> Result<&Entity> {
        self.index
            .get(id)
            .map(|&i| &self.entities[i])
            .ok_or_else(|| Error::unknown_entity(&self.datasource, id))
    }

    /// Entity ids in definition order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().map(|e| e.id.as_str())
    }

    /// Entities in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if no entities are defined
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn validate_entity(def: &EntityDefinition) -> Result<()> {
    if def.path.is_empty() {
        return Err(Error::invalid_datasource_config(format!(
            "Entity '{}' path cannot be empty",
            def.id
        )));
    }
    if def.unique_id.is_empty() {
        return Err(Error::invalid_datasource_config(format!(
            "Entity '{}' unique_id cannot be empty",
            def.id
        )));
    }

    let uses_collection_id = std::iter::once(&def.path)
        .chain(def.query.values())
        .flat_map(|t| extract_variables(t))
        .any(|v| v == "collection_id");

    match (&def.collection, uses_collection_id) {
        (Some(_), false) => Err(Error::invalid_datasource_config(format!(
            "Entity '{}' is nested but its path and query never reference {{{{ collection_id }}}}",
            def.id
        ))),
        (None, true) => Err(Error::invalid_datasource_config(format!(
            "Entity '{}' references {{{{ collection_id }}}} but has no parent collection",
            def.id
        ))),
        _ => Ok(()),
    }
}

fn resolve_parent<'a>(
    def: &EntityDefinition,
    collection: &CollectionDefinition,
    by_id: &HashMap<&str, &'a EntityDefinition>,
) -> Result<&'a EntityDefinition> {
    let parent_id = collection.parent();
    let parent = by_id.get(parent_id).copied().ok_or_else(|| {
        Error::invalid_datasource_config(format!(
            "Entity '{}' references unknown parent '{parent_id}'",
            def.id
        ))
    })?;

    if parent.collection.is_some() {
        return Err(Error::invalid_datasource_config(format!(
            "Entity '{}' parent '{parent_id}' must be a flat entity",
            def.id
        )));
    }

    let family = pagination_config(&def.pagination).family();
    let parent_family = pagination_config(&parent.pagination).family();
    if family != parent_family {
        return Err(Error::invalid_datasource_config(format!(
            "Entity '{}' uses {family} pagination but parent '{parent_id}' uses {parent_family}",
            def.id
        )));
    }

    if let CollectionDefinition::BatchEntitlement {
        parent_batch_size, ..
    } = collection
    {
        if family != CursorFamily::Offset {
            return Err(Error::invalid_datasource_config(format!(
                "Entity '{}' is a batch entitlement and must use offset pagination",
                def.id
            )));
        }
        if *parent_batch_size == 0 {
            return Err(Error::invalid_datasource_config(format!(
                "Entity '{}' parent_batch_size must be at least 1",
                def.id
            )));
        }
    }

    Ok(parent)
}

fn build_entity(def: &EntityDefinition, parent: Option<&EntityDefinition>) -> Result<Entity> {
    let strategy = match (&def.collection, parent) {
        (None, _) => EntityStrategy::Flat,
        (
            Some(CollectionDefinition::Member {
                member_of_attribute,
                compose_id,
                ..
            }),
            Some(parent),
        ) => {
            let mut advancer = CollectionAdvancer::new(&def.id, &parent.id, &parent.unique_id);
            if let Some(attribute) = member_of_attribute {
                advancer = advancer.with_member_of_attribute(attribute);
            }
            if *compose_id {
                advancer = advancer.with_composed_id(&def.unique_id);
            }
            EntityStrategy::Member(advancer)
        }
        (
            Some(CollectionDefinition::BatchEntitlement {
                parent_batch_size,
                has_children_attribute,
                parent_id_attribute,
                ..
            }),
            Some(parent),
        ) => {
            let mut filler = BatchFiller::new(
                &def.id,
                &def.unique_id,
                &parent.id,
                &parent.unique_id,
                *parent_batch_size,
            );
            if let Some(attribute) = has_children_attribute {
                filler = filler.with_has_children_attribute(attribute);
            }
            if let Some(attribute) = parent_id_attribute {
                filler = filler.with_parent_ref_attribute(attribute);
            }
            EntityStrategy::BatchEntitlement(filler)
        }
        (Some(_), None) => {
            return Err(Error::invalid_datasource_config(format!(
                "Entity '{}' parent could not be resolved",
                def.id
            )))
        }
    };

    Ok(Entity {
        id: def.id.clone(),
        path: def.path.clone(),
        records_path: def.records_path.clone(),
        unique_id: def.unique_id.clone(),
        pagination: pagination_config(&def.pagination),
        query: def.query.clone(),
        parent: parent.map(|p| p.id.clone()),
        strategy,
    })
}

/// Convert a pagination definition to its runtime config
pub fn pagination_config(def: &PaginationDefinition) -> PaginationConfig {
    match def {
        PaginationDefinition::Offset {
            offset_param,
            limit_param,
            stop,
        } => PaginationConfig::offset(offset_param, limit_param, stop_condition(stop)),
        PaginationDefinition::Token {
            token_param,
            limit_param,
            next_token_path,
        } => PaginationConfig::token(token_param, limit_param, next_token_path),
    }
}

fn stop_condition(def: &StopConditionDefinition) -> StopCondition {
    match def {
        StopConditionDefinition::ShortPage => StopCondition::ShortPage,
        StopConditionDefinition::TotalCount { path } => StopCondition::total_count(path),
        StopConditionDefinition::Field { path, value } => StopCondition::field(path, value.clone()),
    }
}
