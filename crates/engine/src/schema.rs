//! Schema introspection source.
//!
//! The engine never talks to a database directly. It asks a
//! [`SchemaProvider`] for entity names and per-entity schemas, so the
//! introspection backend can be swapped without touching resolution logic.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use adminmeta_core::schema::EntitySchema;
use adminmeta_core::CoreError;

/// Read-only view of the introspected schema.
///
/// Implementations must be safe to share across tasks. A failed or pending
/// introspection is reported as an error, never as a partial result.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Every entity name known to the schema, in any order.
    async fn entity_names(&self) -> Result<Vec<String>, CoreError>;

    /// Schema of one entity, or `None` if the schema has no such entity.
    async fn entity(&self, name: &str) -> Result<Option<Arc<EntitySchema>>, CoreError>;
}

/// Fixed, in-memory schema loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entities: IndexMap<String, Arc<EntitySchema>>,
}

impl SchemaRegistry {
    /// Build a registry, rejecting malformed schemas and duplicate names.
    pub fn new(schemas: Vec<EntitySchema>) -> Result<Self, CoreError> {
        let mut entities = IndexMap::with_capacity(schemas.len());
        for schema in schemas {
            schema.validate()?;
            if entities.contains_key(&schema.name) {
                return Err(CoreError::Validation(format!(
                    "Entity '{}' is declared more than once",
                    schema.name
                )));
            }
            entities.insert(schema.name.clone(), Arc::new(schema));
        }
        Ok(Self { entities })
    }

    /// Parse a JSON array of entity schemas.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let schemas: Vec<EntitySchema> = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid schema document: {e}")))?;
        Self::new(schemas)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[async_trait]
impl SchemaProvider for SchemaRegistry {
    async fn entity_names(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.entities.keys().cloned().collect())
    }

    async fn entity(&self, name: &str) -> Result<Option<Arc<EntitySchema>>, CoreError> {
        Ok(self.entities.get(name).cloned())
    }
}
