//! Well-known role and capability names.

/// System role; holds every capability.
pub const ROLE_CREATOR: &str = "creator";

/// Capability to configure the application, including access to entities
/// that are disabled for everyone else.
pub const CAN_CONFIGURE_APP: &str = "CAN_CONFIGURE_APP";

/// Prefix of the per-entity access capability.
pub const CAN_ACCESS_ENTITY_PREFIX: &str = "CAN_ACCESS_ENTITY";

/// Capability a role needs to see `entity` (and relations pointing at it).
pub fn entity_access_capability(entity: &str) -> String {
    format!("{CAN_ACCESS_ENTITY_PREFIX}:{}", entity.to_uppercase())
}
