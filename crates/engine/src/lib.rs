//! Async resolution of admin metadata over pluggable sources.
//!
//! The engine combines three collaborators:
//!
//! - [`SchemaProvider`]: introspected entities, fields and relations.
//! - [`ConfigurationStore`]: administrator overrides, read through
//!   [`Configuration`] which applies the declared defaults.
//! - [`RolePermissions`]: capability checks per role.
//!
//! [`EntityResolver`] exposes every resolution entry point on top of them.

pub mod configuration;
pub mod entities;
pub mod permissions;
pub mod schema;
pub mod view;

pub use configuration::{
    Configuration, ConfigurationOverride, ConfigurationStore, InMemoryConfigurationStore,
};
pub use entities::EntityResolver;
pub use permissions::{filter_permitted, InMemoryRolePermissions, RolePermissions};
pub use schema::{SchemaProvider, SchemaRegistry};
pub use view::{EntityOption, ResolvedDiction, ResolvedEntityView, ResolvedField};
