//! Colored value lists for selection and boolean fields.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_types::FieldType;
use crate::schema::EntityField;
use crate::strings::user_friendly_case;

/// Palette cycled through when coloring derived selections.
pub const SELECTION_COLORS: [&str; 8] = [
    "#2E7D32", "#C62828", "#1565C0", "#EF6C00", "#6A1B9A", "#00838F", "#AD1457", "#4E342E",
];

/// One selectable value with its display label and badge color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorableSelection {
    pub value: Value,
    pub label: String,
    pub color: String,
}

fn palette_color(index: usize) -> String {
    SELECTION_COLORS[index % SELECTION_COLORS.len()].to_string()
}

fn boolean_selections() -> Vec<ColorableSelection> {
    vec![
        ColorableSelection {
            value: Value::Bool(true),
            label: "Yes".to_string(),
            color: palette_color(0),
        },
        ColorableSelection {
            value: Value::Bool(false),
            label: "No".to_string(),
            color: palette_color(1),
        },
    ]
}

fn enumeration_selections(field: &EntityField) -> Vec<ColorableSelection> {
    field
        .enumerations
        .iter()
        .enumerate()
        .map(|(index, value)| ColorableSelection {
            value: Value::String(value.clone()),
            label: user_friendly_case(value),
            color: palette_color(index),
        })
        .collect()
}

/// Resolve the selections of every selection or boolean field, in field
/// order.
///
/// A non-empty configured list wins. Otherwise boolean fields get Yes/No and
/// selection fields get their introspected enumerations. Fields of other
/// types, and fields with nothing to offer, are left out.
pub fn resolve_selections(
    fields: &[EntityField],
    configured: &HashMap<String, Vec<ColorableSelection>>,
    field_types: &IndexMap<String, FieldType>,
) -> IndexMap<String, Vec<ColorableSelection>> {
    fields
        .iter()
        .filter_map(|field| {
            let field_type = field_types.get(&field.name).copied()?;
            if !field_type.has_selections() {
                return None;
            }

            let selections = match configured.get(&field.name) {
                Some(list) if !list.is_empty() => list.clone(),
                _ if field_type == FieldType::Boolean => boolean_selections(),
                _ => enumeration_selections(field),
            };

            (!selections.is_empty()).then(|| (field.name.clone(), selections))
        })
        .collect()
}
