//! Role capability checks.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;

use adminmeta_core::roles::{entity_access_capability, ROLE_CREATOR};
use adminmeta_core::CoreError;

/// Answers whether a role holds a capability.
#[async_trait]
pub trait RolePermissions: Send + Sync {
    async fn can_access(&self, role: &str, capability: &str) -> Result<bool, CoreError>;

    /// The subset of `entities` the role may access. All checks run
    /// concurrently; the first failing check fails the whole call.
    async fn permitted_entities(
        &self,
        role: &str,
        entities: &[String],
    ) -> Result<HashSet<String>, CoreError> {
        let checks = entities.iter().map(|entity| async move {
            let capability = entity_access_capability(entity);
            let allowed = self.can_access(role, &capability).await?;
            Ok::<_, CoreError>((entity, allowed))
        });

        Ok(try_join_all(checks)
            .await?
            .into_iter()
            .filter_map(|(entity, allowed)| allowed.then(|| entity.clone()))
            .collect())
    }
}

/// Keep the items whose entity, as returned by `entity_of`, the role may
/// access. Each distinct entity is checked once; order is preserved.
pub async fn filter_permitted<T, F>(
    permissions: &dyn RolePermissions,
    role: &str,
    items: Vec<T>,
    entity_of: F,
) -> Result<Vec<T>, CoreError>
where
    F: Fn(&T) -> &str,
{
    let mut candidates: Vec<String> = items.iter().map(|item| entity_of(item).to_string()).collect();
    candidates.sort();
    candidates.dedup();

    let permitted = permissions.permitted_entities(role, &candidates).await?;
    Ok(items
        .into_iter()
        .filter(|item| permitted.contains(entity_of(item)))
        .collect())
}

// ---------------------------------------------------------------------------
// In-memory permissions
// ---------------------------------------------------------------------------

/// Static role to capability table. The creator role holds every capability.
///
/// Deserializes from a JSON object mapping role names to capability lists,
/// e.g. `{"editor": ["CAN_ACCESS_ENTITY:POSTS"]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InMemoryRolePermissions {
    roles: HashMap<String, HashSet<String>>,
}

impl InMemoryRolePermissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `capabilities` to `role`, adding to what it already holds.
    pub fn with_role<I, S>(mut self, role: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles
            .entry(role.into())
            .or_default()
            .extend(capabilities.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl RolePermissions for InMemoryRolePermissions {
    async fn can_access(&self, role: &str, capability: &str) -> Result<bool, CoreError> {
        if role == ROLE_CREATOR {
            return Ok(true);
        }
        Ok(self
            .roles
            .get(role)
            .is_some_and(|capabilities| capabilities.contains(capability)))
    }
}
