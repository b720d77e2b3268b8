//! Loading of the schema, configuration and role files into a resolver.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use adminmeta_engine::{
    ConfigurationOverride, EntityResolver, InMemoryConfigurationStore, InMemoryRolePermissions,
    SchemaRegistry,
};

use crate::cli::SourceArgs;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Build a resolver over the files named in `sources`.
///
/// The schema file is required. Without a configuration file every key
/// resolves to its default; without a role file only the creator role has
/// access to anything.
pub fn load_resolver(sources: &SourceArgs) -> Result<EntityResolver> {
    let schema_path = sources
        .schema
        .as_deref()
        .context("No schema file given; pass --schema or set ADMINMETA_SCHEMA")?;
    let schema_text = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read {}", schema_path.display()))?;
    let registry = SchemaRegistry::from_json(&schema_text)
        .with_context(|| format!("Invalid schema in {}", schema_path.display()))?;

    let store = match sources.configuration.as_deref() {
        Some(path) => {
            let overrides: Vec<ConfigurationOverride> = read_json(path)?;
            let count = overrides.len();
            let store = InMemoryConfigurationStore::from_overrides(overrides)
                .with_context(|| format!("Invalid configuration in {}", path.display()))?;
            tracing::debug!(overrides = count, path = %path.display(), "Loaded configuration");
            store
        }
        None => InMemoryConfigurationStore::new(),
    };

    let permissions: InMemoryRolePermissions = match sources.roles.as_deref() {
        Some(path) => read_json(path)?,
        None => InMemoryRolePermissions::new(),
    };

    tracing::info!(
        entities = registry.len(),
        schema = %schema_path.display(),
        "Loaded schema"
    );

    Ok(EntityResolver::new(
        Arc::new(registry),
        Arc::new(store),
        Arc::new(permissions),
    ))
}
