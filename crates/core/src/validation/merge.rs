//! Layered validation rules.
//!
//! A field's effective rules come from three layers, lowest precedence first:
//!
//! 1. rules implied by the resolved form field type,
//! 2. rules guessed from the introspected column,
//! 3. rules configured by an administrator (`entity_validations`).
//!
//! Layers are merged by `validation_type`; a higher layer replaces the rule of
//! a lower layer but the rule keeps the position where its type first
//! appeared.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;
use serde_json::Value;

use super::rules::{validation_types, ValidationRule};
use crate::field_types::{infer_field_type, FieldType};
use crate::schema::{EntityField, EntityFieldType};

/// Merge `layers` (lowest precedence first) into one list unique by `key`.
///
/// The last item for a key wins; output order is the order in which each key
/// was first seen.
pub fn merge_by_key<T, K, L, F>(layers: L, key: F) -> Vec<T>
where
    L: IntoIterator,
    L::Item: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut merged: IndexMap<K, T> = IndexMap::new();
    for layer in layers {
        for item in layer {
            // IndexMap::insert keeps the slot of an existing key.
            merged.insert(key(&item), item);
        }
    }
    merged.into_values().collect()
}

/// Rules mechanically implied by the form field type.
pub fn type_bound_validations(field_type: FieldType, field: &EntityField) -> Vec<ValidationRule> {
    let rule = match field_type {
        FieldType::Email => ValidationRule::new(validation_types::IS_EMAIL),
        FieldType::Url => ValidationRule::new(validation_types::IS_URL),
        FieldType::Number => ValidationRule::new(validation_types::IS_NUMBER),
        FieldType::Boolean => ValidationRule::new(validation_types::IS_BOOLEAN),
        FieldType::DatetimeLocal => ValidationRule::new(validation_types::IS_DATE),
        FieldType::Color => ValidationRule::new(validation_types::IS_COLOR),
        FieldType::Json => ValidationRule::new(validation_types::IS_JSON),
        FieldType::Selection if !field.enumerations.is_empty() => {
            let options: Vec<Value> = field
                .enumerations
                .iter()
                .cloned()
                .map(Value::String)
                .collect();
            ValidationRule::new(validation_types::IS_IN).with_param("options", options)
        }
        _ => return Vec::new(),
    };
    vec![rule]
}

/// Best-effort rules guessed from the introspected column.
pub fn guess_validations(field: &EntityField) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    if field.is_required && !field.is_id {
        rules.push(ValidationRule::new(validation_types::REQUIRED));
    }

    if let (EntityFieldType::String, Some(length)) = (field.field_type, field.length) {
        rules.push(ValidationRule::new(validation_types::MAX_LENGTH).with_param("length", length));
    }

    let name = field.name.to_lowercase();
    if name == "email" || name.ends_with("_email") {
        rules.push(ValidationRule::new(validation_types::IS_EMAIL));
    }

    rules
}

/// Effective rules of one field.
pub fn merge_field_validations(
    field: &EntityField,
    field_type: FieldType,
    configured: &[ValidationRule],
) -> Vec<ValidationRule> {
    merge_by_key(
        [
            type_bound_validations(field_type, field),
            guess_validations(field),
            configured.to_vec(),
        ],
        |rule| rule.validation_type.clone(),
    )
}

/// Effective rules of every field of an entity, in field order.
///
/// Fields missing from `field_types` fall back to the inferred type.
pub fn merge_entity_validations(
    fields: &[EntityField],
    field_types: &IndexMap<String, FieldType>,
    configured: &HashMap<String, Vec<ValidationRule>>,
) -> IndexMap<String, Vec<ValidationRule>> {
    fields
        .iter()
        .map(|field| {
            let field_type = field_types
                .get(&field.name)
                .copied()
                .unwrap_or_else(|| infer_field_type(field));
            let configured = configured
                .get(&field.name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (
                field.name.clone(),
                merge_field_validations(field, field_type, configured),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn types_of(rules: &[ValidationRule]) -> Vec<&str> {
        rules.iter().map(|r| r.validation_type.as_str()).collect()
    }

    // -- merge_by_key -------------------------------------------------------

    #[test]
    fn later_layer_replaces_value_in_first_position() {
        let merged = merge_by_key(
            [vec![("a", 1), ("b", 1)], vec![("c", 2), ("a", 2)]],
            |(key, _)| *key,
        );
        assert_eq!(merged, vec![("a", 2), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn empty_layers_merge_to_empty() {
        let merged = merge_by_key(
            [Vec::<(u8, u8)>::new(), Vec::new()],
            |(k, _)| *k,
        );
        assert!(merged.is_empty());
    }

    // -- layers -------------------------------------------------------------

    #[test]
    fn number_field_implies_is_number() {
        let field = EntityField::new("age", EntityFieldType::Number);
        assert_eq!(
            types_of(&type_bound_validations(FieldType::Number, &field)),
            vec!["isNumber"]
        );
    }

    #[test]
    fn enum_field_implies_one_of() {
        let field = EntityField::new("status", EntityFieldType::Enum).with_enumerations(["a", "b"]);
        let rules = type_bound_validations(FieldType::Selection, &field);
        assert_eq!(types_of(&rules), vec!["isIn"]);
        assert_eq!(rules[0].params["options"], json!(["a", "b"]));
    }

    #[test]
    fn text_field_has_no_type_bound_rules() {
        let field = EntityField::new("title", EntityFieldType::String);
        assert!(type_bound_validations(FieldType::Text, &field).is_empty());
    }

    #[test]
    fn guesses_from_column_shape() {
        let field = EntityField::new("email", EntityFieldType::String)
            .required()
            .with_length(120);
        let rules = guess_validations(&field);
        assert_eq!(types_of(&rules), vec!["required", "maxLength", "isEmail"]);
        assert_eq!(rules[1].params["length"], json!(120));
    }

    #[test]
    fn primary_field_is_never_guessed_required() {
        let field = EntityField::new("id", EntityFieldType::Id).primary().required();
        assert!(guess_validations(&field).is_empty());
    }

    // -- merge_field_validations --------------------------------------------

    #[test]
    fn configured_rule_beats_guessed_rule_of_same_type() {
        let field = EntityField::new("name", EntityFieldType::String).required();
        let configured = vec![ValidationRule::new("required").with_message("Name please")];

        let merged = merge_field_validations(&field, FieldType::Text, &configured);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].error_message.as_deref(), Some("Name please"));
    }

    #[test]
    fn configured_params_beat_type_bound_defaults() {
        let field = EntityField::new("status", EntityFieldType::Enum).with_enumerations(["a", "b"]);
        let configured = vec![
            ValidationRule::new("isIn").with_param("options", json!(["a"])),
            ValidationRule::new("required"),
        ];

        let merged = merge_field_validations(&field, FieldType::Selection, &configured);
        assert_eq!(types_of(&merged), vec!["isIn", "required"]);
        assert_eq!(merged[0].params["options"], json!(["a"]));
    }

    #[test]
    fn duplicate_types_across_layers_collapse() {
        let field = EntityField::new("contact_email", EntityFieldType::String).required();
        let configured = vec![
            ValidationRule::new("isEmail").with_message("bad email"),
            ValidationRule::new("required"),
        ];

        let merged = merge_field_validations(&field, FieldType::Email, &configured);
        let unique: HashSet<_> = merged.iter().map(|r| &r.validation_type).collect();
        assert_eq!(unique.len(), merged.len());
        assert_eq!(types_of(&merged), vec!["isEmail", "required"]);
        assert_eq!(merged[0].error_message.as_deref(), Some("bad email"));
    }

    // -- merge_entity_validations -------------------------------------------

    #[test]
    fn every_field_gets_an_entry_in_field_order() {
        let fields = vec![
            EntityField::new("title", EntityFieldType::String),
            EntityField::new("views", EntityFieldType::Number),
        ];
        let configured = HashMap::from([(
            "title".to_string(),
            vec![ValidationRule::new("minLength").with_param("length", 3)],
        )]);

        let merged = merge_entity_validations(&fields, &IndexMap::new(), &configured);
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["title", "views"]);
        assert_eq!(types_of(&merged["title"]), vec!["minLength"]);
        assert_eq!(types_of(&merged["views"]), vec!["isNumber"]);
    }
}
