//! Resolved metadata handed to callers.
//!
//! These are plain serializable snapshots: every default, override and
//! permission filter has already been applied by the time one is built.

use serde::Serialize;

use adminmeta_core::configuration::EntityCrudSettings;
use adminmeta_core::field_types::FieldType;
use adminmeta_core::relations::ResolvedRelation;
use adminmeta_core::schema::EntityFieldType;
use adminmeta_core::selections::ColorableSelection;
use adminmeta_core::validation::ValidationRule;

/// An entity offered in navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityOption {
    pub value: String,
    pub label: String,
}

/// Display names of an entity with fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDiction {
    pub singular: String,
    pub plural: String,
}

/// Everything a form or table needs to know about one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub schema_type: EntityFieldType,
    pub is_id: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<ColorableSelection>,
    pub validations: Vec<ValidationRule>,
}

/// Full admin view of an entity for one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntityView {
    pub entity: String,
    pub diction: ResolvedDiction,
    pub primary_field: String,
    pub crud_settings: EntityCrudSettings,
    pub fields: Vec<ResolvedField>,
    pub relations: Vec<ResolvedRelation>,
}
