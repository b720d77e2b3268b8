//! Shared fixtures for engine integration tests.
//!
//! The schema has four entities. `entity-1` carries one field of every kind
//! and relations to the other three:
//!
//! - `entity-2` toOne through `entity-1-reference-field`
//! - `entity-3` toMany
//! - `entity-4` toMany

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use adminmeta_core::configuration::ConfigurationKey;
use adminmeta_core::schema::{EntityField, EntityFieldType, EntityRelation, EntitySchema};
use adminmeta_core::CoreError;
use adminmeta_engine::{
    ConfigurationStore, EntityResolver, InMemoryConfigurationStore, InMemoryRolePermissions,
    RolePermissions, SchemaProvider, SchemaRegistry,
};

pub const ENTITY_1_FIELDS: [&str; 7] = [
    "entity-1-id-field",
    "entity-1-reference-field",
    "entity-1-string-field",
    "entity-1-number-field",
    "entity-1-boolean-field",
    "entity-1-date-field",
    "entity-1-enum-field",
];

/// Role holding access to `entity-1`, `entity-2` and `entity-4` only.
pub const VIEWER: &str = "viewer";

/// Role holding access to every fixture entity plus `CAN_CONFIGURE_APP`.
pub const ADMIN: &str = "admin";

/// Role with no capabilities.
pub const GUEST: &str = "guest";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub fn entity_1() -> EntitySchema {
    EntitySchema {
        name: "entity-1".into(),
        fields: vec![
            EntityField::new("entity-1-id-field", EntityFieldType::Id).primary(),
            EntityField {
                is_reference: true,
                ..EntityField::new("entity-1-reference-field", EntityFieldType::Reference)
            },
            EntityField::new("entity-1-string-field", EntityFieldType::String)
                .required()
                .with_length(255),
            EntityField::new("entity-1-number-field", EntityFieldType::Number),
            EntityField::new("entity-1-boolean-field", EntityFieldType::Boolean),
            EntityField::new("entity-1-date-field", EntityFieldType::Date),
            EntityField::new("entity-1-enum-field", EntityFieldType::Enum)
                .with_enumerations(["draft", "published"]),
        ],
        relations: vec![
            EntityRelation::to_one("entity-2", "entity-1-reference-field"),
            EntityRelation::to_many("entity-3"),
            EntityRelation::to_many("entity-4"),
        ],
    }
}

fn simple_entity(name: &str) -> EntitySchema {
    EntitySchema {
        name: name.into(),
        fields: vec![
            EntityField::new("id", EntityFieldType::Id),
            EntityField::new("name", EntityFieldType::String),
        ],
        relations: vec![],
    }
}

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new(vec![
        entity_1(),
        simple_entity("entity-2"),
        simple_entity("entity-3"),
        simple_entity("entity-4"),
    ])
    .expect("fixture schema is valid")
}

/// Schema source whose introspection always fails.
pub struct FailingSchema;

#[async_trait]
impl SchemaProvider for FailingSchema {
    async fn entity_names(&self) -> Result<Vec<String>, CoreError> {
        Err(CoreError::Upstream("schema introspection failed".into()))
    }

    async fn entity(&self, _name: &str) -> Result<Option<Arc<EntitySchema>>, CoreError> {
        Err(CoreError::Upstream("schema introspection failed".into()))
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration source whose every read fails.
pub struct FailingStore;

#[async_trait]
impl ConfigurationStore for FailingStore {
    async fn get(
        &self,
        _key: ConfigurationKey,
        _scope: Option<&str>,
    ) -> Result<Option<Value>, CoreError> {
        Err(CoreError::Upstream("configuration store unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

pub fn permissions() -> InMemoryRolePermissions {
    InMemoryRolePermissions::new()
        .with_role(
            VIEWER,
            [
                "CAN_ACCESS_ENTITY:ENTITY-1",
                "CAN_ACCESS_ENTITY:ENTITY-2",
                "CAN_ACCESS_ENTITY:ENTITY-4",
            ],
        )
        .with_role(
            ADMIN,
            [
                "CAN_CONFIGURE_APP",
                "CAN_ACCESS_ENTITY:ENTITY-1",
                "CAN_ACCESS_ENTITY:ENTITY-2",
                "CAN_ACCESS_ENTITY:ENTITY-3",
                "CAN_ACCESS_ENTITY:ENTITY-4",
            ],
        )
}

/// Permission source whose every check fails.
pub struct FailingPermissions;

#[async_trait]
impl RolePermissions for FailingPermissions {
    async fn can_access(&self, _role: &str, _capability: &str) -> Result<bool, CoreError> {
        Err(CoreError::Upstream("permission service unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Resolver builders
// ---------------------------------------------------------------------------

/// Resolver over the fixture schema and permissions with `store` as the
/// configuration source.
pub fn resolver_with(store: Arc<InMemoryConfigurationStore>) -> EntityResolver {
    EntityResolver::new(Arc::new(registry()), store, Arc::new(permissions()))
}

/// Resolver with no configuration overrides.
pub fn resolver() -> EntityResolver {
    resolver_with(Arc::new(InMemoryConfigurationStore::new()))
}

/// Store seeded with `(key, scope, value)` entries.
pub async fn store_with(entries: Vec<(ConfigurationKey, Option<&str>, Value)>) -> Arc<InMemoryConfigurationStore> {
    let store = InMemoryConfigurationStore::new();
    for (key, scope, value) in entries {
        store
            .set(key, scope, value)
            .await
            .expect("fixture configuration is well scoped");
    }
    Arc::new(store)
}
