//! Integration tests for entity listing, access checks and per-entity
//! settings.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;

use adminmeta_core::configuration::{ConfigurationKey, CrudView};
use adminmeta_core::error::NOT_FOUND_MESSAGE;
use adminmeta_core::roles::ROLE_CREATOR;
use adminmeta_core::schema::{EntityField, EntityFieldType, EntitySchema};
use adminmeta_core::CoreError;
use adminmeta_engine::{
    EntityResolver, InMemoryConfigurationStore, InMemoryRolePermissions, SchemaRegistry,
};
use common::{resolver, resolver_with, store_with, ADMIN, GUEST, VIEWER};

// ---------------------------------------------------------------------------
// Test: active entities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn active_entities_are_sorted_by_name() {
    let entities = resolver().active_entities().await.unwrap();
    let values: Vec<&str> = entities.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["entity-1", "entity-2", "entity-3", "entity-4"]);
    assert_eq!(entities[0].label, "entity-1");
}

#[tokio::test]
async fn entity_names_sort_ignoring_case() {
    let schemas = ["beta", "Alpha", "alpha", "Zeta"]
        .into_iter()
        .map(|name| EntitySchema {
            name: name.into(),
            fields: vec![EntityField::new("id", EntityFieldType::Id)],
            relations: vec![],
        })
        .collect();
    let resolver = EntityResolver::new(
        Arc::new(SchemaRegistry::new(schemas).unwrap()),
        Arc::new(InMemoryConfigurationStore::new()),
        Arc::new(InMemoryRolePermissions::new()),
    );

    let entities = resolver.active_entities().await.unwrap();
    let values: Vec<&str> = entities.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["alpha", "Alpha", "beta", "Zeta"]);
}

#[tokio::test]
async fn disabled_entities_are_excluded_and_order_is_applied() {
    let store = store_with(vec![
        (ConfigurationKey::DisabledEntities, None, json!(["entity-2"])),
        (ConfigurationKey::EntitiesOrder, None, json!(["entity-4", "entity-2"])),
    ])
    .await;

    let entities = resolver_with(store).active_entities().await.unwrap();
    let values: Vec<&str> = entities.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["entity-4", "entity-1", "entity-3"]);
}

// ---------------------------------------------------------------------------
// Test: ensure_entity_access
// ---------------------------------------------------------------------------

#[tokio::test]
async fn role_with_capability_has_access() {
    let resolver = resolver();
    assert!(resolver.ensure_entity_access("entity-1", VIEWER).await.is_ok());
    assert!(resolver.ensure_entity_access("entity-3", ROLE_CREATOR).await.is_ok());
}

#[tokio::test]
async fn every_denial_reports_the_same_not_found() {
    let store = store_with(vec![(
        ConfigurationKey::DisabledEntities,
        None,
        json!(["entity-2"]),
    )])
    .await;
    let resolver = resolver_with(store);

    for (entity, role) in [
        ("missing", ADMIN),
        ("entity-3", VIEWER),
        ("entity-1", GUEST),
        ("entity-2", VIEWER),
    ] {
        let err = resolver.ensure_entity_access(entity, role).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), NOT_FOUND_MESSAGE);
    }
}

#[tokio::test]
async fn disabled_entity_is_reachable_with_configure_capability() {
    let store = store_with(vec![(
        ConfigurationKey::DisabledEntities,
        None,
        json!(["entity-2"]),
    )])
    .await;
    let resolver = resolver_with(store);

    assert!(resolver.is_entity_disabled("entity-2").await.unwrap());
    assert!(!resolver.is_entity_disabled("entity-1").await.unwrap());
    assert!(resolver.ensure_entity_access("entity-2", ADMIN).await.is_ok());
}

// ---------------------------------------------------------------------------
// Test: diction and CRUD settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn diction_falls_back_to_friendly_entity_name() {
    let store = store_with(vec![(
        ConfigurationKey::EntityDiction,
        Some("entity-1"),
        json!({"plural": "Launches"}),
    )])
    .await;

    let diction = resolver_with(store).entity_diction("entity-1").await.unwrap();
    assert_eq!(diction.plural, "Launches");
    assert_eq!(diction.singular, "Entity 1");
}

#[tokio::test]
async fn crud_settings_and_hidden_columns_default_when_unset() {
    let resolver = resolver();
    let settings = resolver.entity_crud_settings("entity-1").await.unwrap();
    assert!(settings.create && settings.update && settings.delete && settings.details);
    assert!(resolver
        .hidden_columns("entity-1", CrudView::Table)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn hidden_columns_are_kept_per_view() {
    let store = store_with(vec![
        (
            ConfigurationKey::HiddenEntityTableColumns,
            Some("entity-1"),
            json!(["entity-1-json-field"]),
        ),
        (
            ConfigurationKey::EntityCrudSettings,
            Some("entity-1"),
            json!({"delete": false}),
        ),
    ])
    .await;
    let resolver = resolver_with(store);

    assert_eq!(
        resolver.hidden_columns("entity-1", CrudView::Table).await.unwrap(),
        vec!["entity-1-json-field"]
    );
    assert!(resolver
        .hidden_columns("entity-1", CrudView::Details)
        .await
        .unwrap()
        .is_empty());
    assert!(!resolver.entity_crud_settings("entity-1").await.unwrap().delete);
}

#[tokio::test]
async fn settings_of_unknown_entity_are_not_found() {
    assert_matches!(
        resolver().entity_crud_settings("missing").await,
        Err(CoreError::NotFound(_))
    );
}
