//! Field validation rules.
//!
//! Provides rule types, the three-layer rule merge and a pure-logic evaluator,
//! all without I/O.

pub mod evaluator;
pub mod merge;
pub mod rules;

pub use evaluator::{evaluate_field, evaluate_record};
pub use merge::{
    guess_validations, merge_by_key, merge_entity_validations, merge_field_validations,
    type_bound_validations,
};
pub use rules::{validation_types, FieldViolation, ValidationRule};
