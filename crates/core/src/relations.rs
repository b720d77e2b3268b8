//! Relation type inference and labeling.
//!
//! A raw relation only says which table it points to and how it joins. The
//! cardinality is derived here, once, and carried as a tagged variant from
//! then on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schema::EntityRelation;

/// Cardinality of a relation, seen from the owning entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelationType {
    /// The foreign key `field` lives on this entity.
    ToOne { field: String },
    /// The foreign key lives on the related table.
    ToMany,
}

impl RelationType {
    /// `ToOne` iff the first join descriptor names a local column.
    pub fn infer(relation: &EntityRelation) -> Self {
        match relation.join_field_name() {
            Some(field) => RelationType::ToOne {
                field: field.to_string(),
            },
            None => RelationType::ToMany,
        }
    }

    pub fn join_field(&self) -> Option<&str> {
        match self {
            RelationType::ToOne { field } => Some(field),
            RelationType::ToMany => None,
        }
    }
}

/// A relation ready to be shown to a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRelation {
    pub table: String,
    pub label: String,
    #[serde(flatten)]
    pub relation_type: RelationType,
}

impl ResolvedRelation {
    /// Derive the type and attach the configured label, falling back to the
    /// raw table name.
    pub fn resolve(relation: &EntityRelation, labels: &HashMap<String, String>) -> Self {
        let label = labels
            .get(&relation.table)
            .filter(|label| !label.is_empty())
            .cloned()
            .unwrap_or_else(|| relation.table.clone());

        Self {
            table: relation.table.clone(),
            label,
            relation_type: RelationType::infer(relation),
        }
    }
}

/// Drop relations pointing at globally disabled tables or tables hidden for
/// this entity. Order is preserved.
pub fn visible_relations<S: AsRef<str>>(
    relations: Vec<EntityRelation>,
    disabled_entities: &[S],
    hidden_relations: &[S],
) -> Vec<EntityRelation> {
    let blocked = |table: &str| {
        disabled_entities.iter().any(|t| t.as_ref() == table)
            || hidden_relations.iter().any(|t| t.as_ref() == table)
    };
    relations
        .into_iter()
        .filter(|relation| !blocked(&relation.table))
        .collect()
}
