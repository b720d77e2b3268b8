//! Form field types.
//!
//! Every introspected field is presented with a form field type. The type is
//! either set by an administrator (`entity_columns_types`) or inferred from
//! the introspected column.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{EntityField, EntityFieldType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Textarea,
    Richtext,
    Email,
    Url,
    Password,
    Number,
    Boolean,
    DatetimeLocal,
    Selection,
    Reference,
    Color,
    Image,
    File,
    Json,
}

impl FieldType {
    /// Types whose values come from a fixed list of selections.
    pub fn has_selections(self) -> bool {
        matches!(self, FieldType::Selection | FieldType::Boolean)
    }
}

/// Infer the form field type of an introspected field.
///
/// String columns are refined by name: `email`, `password`, `url`/`website`
/// and `color`/`colour` get their dedicated inputs.
pub fn infer_field_type(field: &EntityField) -> FieldType {
    if field.is_reference {
        return FieldType::Reference;
    }

    match field.field_type {
        EntityFieldType::Reference => FieldType::Reference,
        EntityFieldType::Enum => FieldType::Selection,
        EntityFieldType::Boolean => FieldType::Boolean,
        EntityFieldType::Number => FieldType::Number,
        EntityFieldType::Date => FieldType::DatetimeLocal,
        EntityFieldType::Json => FieldType::Json,
        EntityFieldType::String => infer_from_name(&field.name),
        EntityFieldType::Id | EntityFieldType::Other => FieldType::Text,
    }
}

fn infer_from_name(name: &str) -> FieldType {
    let name = name.to_lowercase();
    if name == "email" || name.ends_with("_email") {
        FieldType::Email
    } else if name == "password" || name.ends_with("_password") {
        FieldType::Password
    } else if name == "url" || name == "website" || name.ends_with("_url") {
        FieldType::Url
    } else if name == "color" || name == "colour" {
        FieldType::Color
    } else {
        FieldType::Text
    }
}

/// Resolve the form field type of every field, in field order. Configured
/// overrides win over inference.
pub fn resolve_field_types(
    fields: &[EntityField],
    overrides: &HashMap<String, FieldType>,
) -> IndexMap<String, FieldType> {
    fields
        .iter()
        .map(|field| {
            let field_type = overrides
                .get(&field.name)
                .copied()
                .unwrap_or_else(|| infer_field_type(field));
            (field.name.clone(), field_type)
        })
        .collect()
}
