//! Administrator configuration source and typed lookup.
//!
//! A [`ConfigurationStore`] only hands out raw JSON values. [`Configuration`]
//! layers the key table on top: scope checking, declared defaults for keys
//! that were never set, and decoding into the caller's payload type.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;

use adminmeta_core::configuration::ConfigurationKey;
use adminmeta_core::CoreError;

/// Raw key/value source for administrator configuration.
///
/// Values may change at any time; callers must not cache them across
/// resolutions.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Stored value for `key` within `scope`, or `None` if never set.
    async fn get(&self, key: ConfigurationKey, scope: Option<&str>)
        -> Result<Option<Value>, CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// One stored value, as read from a configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationOverride {
    pub key: ConfigurationKey,
    #[serde(default)]
    pub scope: Option<String>,
    pub value: Value,
}

/// Process-local store keyed by [`ConfigurationKey::storage_key`].
#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    values: RwLock<HashMap<String, Value>>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a list of overrides. Later entries replace earlier
    /// ones for the same key and scope.
    pub fn from_overrides(overrides: Vec<ConfigurationOverride>) -> Result<Self, CoreError> {
        let mut values = HashMap::with_capacity(overrides.len());
        for item in overrides {
            let scope = item.scope.as_deref();
            item.key.check_scope(scope)?;
            values.insert(item.key.storage_key(scope), item.value);
        }
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    /// Store `value`, replacing any previous one.
    pub async fn set(
        &self,
        key: ConfigurationKey,
        scope: Option<&str>,
        value: Value,
    ) -> Result<(), CoreError> {
        key.check_scope(scope)?;
        self.values
            .write()
            .await
            .insert(key.storage_key(scope), value);
        Ok(())
    }

    /// Forget a stored value so the key falls back to its default.
    pub async fn remove(&self, key: ConfigurationKey, scope: Option<&str>) -> Result<(), CoreError> {
        key.check_scope(scope)?;
        self.values.write().await.remove(&key.storage_key(scope));
        Ok(())
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn get(
        &self,
        key: ConfigurationKey,
        scope: Option<&str>,
    ) -> Result<Option<Value>, CoreError> {
        Ok(self.values.read().await.get(&key.storage_key(scope)).cloned())
    }
}

// ---------------------------------------------------------------------------
// Typed lookup
// ---------------------------------------------------------------------------

/// Typed view over a [`ConfigurationStore`].
#[derive(Clone)]
pub struct Configuration {
    store: Arc<dyn ConfigurationStore>,
}

impl Configuration {
    pub fn new(store: Arc<dyn ConfigurationStore>) -> Self {
        Self { store }
    }

    /// Current value of `key`, or its declared default when nothing is stored.
    ///
    /// A stored value that does not decode into `T` is reported as an
    /// upstream error rather than silently replaced by the default.
    pub async fn show<T: DeserializeOwned>(
        &self,
        key: ConfigurationKey,
        scope: Option<&str>,
    ) -> Result<T, CoreError> {
        key.check_scope(scope)?;

        let Some(stored) = self.store.get(key, scope).await? else {
            return serde_json::from_value(key.default_value()).map_err(|e| {
                CoreError::Internal(format!("Default for '{key}' does not decode: {e}"))
            });
        };

        serde_json::from_value(stored).map_err(|e| {
            tracing::warn!(key = %key, scope = ?scope, error = %e, "Stored configuration value is malformed");
            CoreError::Upstream(format!("Configuration '{key}' is malformed: {e}"))
        })
    }
}
