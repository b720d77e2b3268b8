//! Introspected entity shapes.
//!
//! Entities, fields and relations are plain data keyed by name; nothing here
//! is generated per entity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Primary field name used when no field is marked `isId`.
pub const DEFAULT_PRIMARY_FIELD: &str = "id";

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Semantic kind of an introspected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityFieldType {
    Id,
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Reference,
    Json,
    #[serde(other)]
    Other,
}

/// One column of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: EntityFieldType,
    #[serde(default)]
    pub is_id: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enumerations: Vec<String>,
}

impl EntityField {
    /// A plain optional field of the given kind.
    pub fn new(name: impl Into<String>, field_type: EntityFieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_id: false,
            is_required: false,
            is_reference: false,
            length: None,
            enumerations: Vec::new(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_id = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_enumerations<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumerations = values.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Describes one column participating in a relation join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinColumnOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_column_name: Option<String>,
}

/// A raw link from one entity to another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelation {
    pub table: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub join_column_options: Vec<JoinColumnOption>,
}

impl EntityRelation {
    /// A relation whose foreign key lives on the other table.
    pub fn to_many(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            join_column_options: Vec::new(),
        }
    }

    /// A relation whose foreign key is `join_field` on this entity.
    pub fn to_one(table: impl Into<String>, join_field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            join_column_options: vec![JoinColumnOption {
                name: Some(join_field.into()),
                referenced_column_name: None,
            }],
        }
    }

    /// Name of the local join column, taken from the first join descriptor.
    /// Empty names count as absent.
    pub fn join_field_name(&self) -> Option<&str> {
        self.join_column_options
            .first()
            .and_then(|option| option.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// Introspected shape of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<EntityField>,
    #[serde(default)]
    pub relations: Vec<EntityRelation>,
}

impl EntitySchema {
    /// Name of the field marked `isId`, or `"id"` when none is marked.
    pub fn primary_field(&self) -> &str {
        self.fields
            .iter()
            .find(|field| field.is_id)
            .map(|field| field.name.as_str())
            .unwrap_or(DEFAULT_PRIMARY_FIELD)
    }

    /// First field of the given kind, in introspection order.
    pub fn first_field_of_type(&self, field_type: EntityFieldType) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.field_type == field_type)
            .map(|field| field.name.as_str())
    }

    /// Check the structural invariants: non-empty entity name, unique field
    /// names and at most one primary field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Entity name must not be empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Entity '{}' declares field '{}' more than once",
                    self.name, field.name
                )));
            }
        }

        let primary_count = self.fields.iter().filter(|field| field.is_id).count();
        if primary_count > 1 {
            return Err(CoreError::Validation(format!(
                "Entity '{}' marks {primary_count} fields as primary, at most one is allowed",
                self.name
            )));
        }

        Ok(())
    }
}
