//! Administrator configuration keys and their declared defaults.
//!
//! Every key is either process-global or scoped to one entity. A key that has
//! never been set resolves to its default from [`ConfigurationKey::default_value`];
//! missing configuration is never an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::CoreError;

/// Separator between a scoped key and its entity in storage keys.
pub const SCOPE_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationKey {
    DisabledEntities,
    EntitiesOrder,
    EntityDiction,
    EntityColumnsLabels,
    EntityColumnsTypes,
    EntityFieldsOrders,
    EntityRelationsLabels,
    EntityRelationsOrder,
    HiddenEntityRelations,
    EntityValidations,
    EntitySelections,
    EntityCrudSettings,
    HiddenEntityTableColumns,
    HiddenEntityCreateColumns,
    HiddenEntityUpdateColumns,
    HiddenEntityDetailsColumns,
    EntityRelationTemplate,
}

impl ConfigurationKey {
    pub const ALL: [ConfigurationKey; 17] = [
        ConfigurationKey::DisabledEntities,
        ConfigurationKey::EntitiesOrder,
        ConfigurationKey::EntityDiction,
        ConfigurationKey::EntityColumnsLabels,
        ConfigurationKey::EntityColumnsTypes,
        ConfigurationKey::EntityFieldsOrders,
        ConfigurationKey::EntityRelationsLabels,
        ConfigurationKey::EntityRelationsOrder,
        ConfigurationKey::HiddenEntityRelations,
        ConfigurationKey::EntityValidations,
        ConfigurationKey::EntitySelections,
        ConfigurationKey::EntityCrudSettings,
        ConfigurationKey::HiddenEntityTableColumns,
        ConfigurationKey::HiddenEntityCreateColumns,
        ConfigurationKey::HiddenEntityUpdateColumns,
        ConfigurationKey::HiddenEntityDetailsColumns,
        ConfigurationKey::EntityRelationTemplate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigurationKey::DisabledEntities => "disabled_entities",
            ConfigurationKey::EntitiesOrder => "entities_order",
            ConfigurationKey::EntityDiction => "entity_diction",
            ConfigurationKey::EntityColumnsLabels => "entity_columns_labels",
            ConfigurationKey::EntityColumnsTypes => "entity_columns_types",
            ConfigurationKey::EntityFieldsOrders => "entity_fields_orders",
            ConfigurationKey::EntityRelationsLabels => "entity_relations_labels",
            ConfigurationKey::EntityRelationsOrder => "entity_relations_order",
            ConfigurationKey::HiddenEntityRelations => "hidden_entity_relations",
            ConfigurationKey::EntityValidations => "entity_validations",
            ConfigurationKey::EntitySelections => "entity_selections",
            ConfigurationKey::EntityCrudSettings => "entity_crud_settings",
            ConfigurationKey::HiddenEntityTableColumns => "hidden_entity_table_columns",
            ConfigurationKey::HiddenEntityCreateColumns => "hidden_entity_create_columns",
            ConfigurationKey::HiddenEntityUpdateColumns => "hidden_entity_update_columns",
            ConfigurationKey::HiddenEntityDetailsColumns => "hidden_entity_details_columns",
            ConfigurationKey::EntityRelationTemplate => "entity_relation_template",
        }
    }

    /// Whether values of this key belong to one entity.
    pub fn requires_entity(self) -> bool {
        !matches!(
            self,
            ConfigurationKey::DisabledEntities | ConfigurationKey::EntitiesOrder
        )
    }

    /// Value returned when nothing has been stored for the key.
    pub fn default_value(self) -> Value {
        match self {
            ConfigurationKey::DisabledEntities
            | ConfigurationKey::EntitiesOrder
            | ConfigurationKey::EntityFieldsOrders
            | ConfigurationKey::EntityRelationsOrder
            | ConfigurationKey::HiddenEntityRelations
            | ConfigurationKey::HiddenEntityTableColumns
            | ConfigurationKey::HiddenEntityCreateColumns
            | ConfigurationKey::HiddenEntityUpdateColumns
            | ConfigurationKey::HiddenEntityDetailsColumns => json!([]),
            ConfigurationKey::EntityDiction
            | ConfigurationKey::EntityColumnsLabels
            | ConfigurationKey::EntityColumnsTypes
            | ConfigurationKey::EntityRelationsLabels
            | ConfigurationKey::EntityValidations
            | ConfigurationKey::EntitySelections => json!({}),
            ConfigurationKey::EntityCrudSettings => {
                json!({"create": true, "update": true, "delete": true, "details": true})
            }
            ConfigurationKey::EntityRelationTemplate => json!({"format": ""}),
        }
    }

    /// Reject a scope on a global key and a missing scope on a scoped key.
    pub fn check_scope(self, scope: Option<&str>) -> Result<(), CoreError> {
        match (self.requires_entity(), scope) {
            (true, None) => Err(CoreError::Validation(format!(
                "Configuration key '{self}' requires an entity scope"
            ))),
            (false, Some(entity)) => Err(CoreError::Validation(format!(
                "Configuration key '{self}' is global and cannot be scoped to '{entity}'"
            ))),
            _ => Ok(()),
        }
    }

    /// Key under which a value is stored, e.g. `entity_diction__users`.
    pub fn storage_key(self, scope: Option<&str>) -> String {
        match scope {
            Some(entity) => format!("{}{SCOPE_SEPARATOR}{entity}", self.as_str()),
            None => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigurationKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigurationKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown configuration key '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Typed payloads
// ---------------------------------------------------------------------------

/// Singular and plural display names of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDiction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singular: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
}

/// Which CRUD actions the admin surface offers for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCrudSettings {
    #[serde(default = "enabled")]
    pub create: bool,
    #[serde(default = "enabled")]
    pub update: bool,
    #[serde(default = "enabled")]
    pub delete: bool,
    #[serde(default = "enabled")]
    pub details: bool,
}

fn enabled() -> bool {
    true
}

/// Display format used when an entity is shown as a reference elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTemplate {
    #[serde(default)]
    pub format: String,
}

/// CRUD screens whose columns can be hidden independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudView {
    Table,
    Create,
    Update,
    Details,
}

impl CrudView {
    pub fn hidden_columns_key(self) -> ConfigurationKey {
        match self {
            CrudView::Table => ConfigurationKey::HiddenEntityTableColumns,
            CrudView::Create => ConfigurationKey::HiddenEntityCreateColumns,
            CrudView::Update => ConfigurationKey::HiddenEntityUpdateColumns,
            CrudView::Details => ConfigurationKey::HiddenEntityDetailsColumns,
        }
    }
}
