//! Pure domain logic for resolving admin metadata of a relational schema.
//!
//! Everything in this crate is synchronous and free of I/O: the entity data
//! model, the configuration key table, custom ordering, validation rule
//! merging and evaluation, relation inference and display templates. The
//! async orchestration over schema, configuration and permission sources
//! lives in `adminmeta-engine`.

pub mod configuration;
pub mod error;
pub mod field_types;
pub mod ordering;
pub mod relations;
pub mod roles;
pub mod schema;
pub mod selections;
pub mod strings;
pub mod template;
pub mod validation;

pub use error::CoreError;
