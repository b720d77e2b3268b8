//! Validation rule and result types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the rule types understood by the evaluator.
pub mod validation_types {
    pub const REQUIRED: &str = "required";
    pub const IS_EMAIL: &str = "isEmail";
    pub const IS_URL: &str = "isUrl";
    pub const IS_NUMBER: &str = "isNumber";
    pub const IS_BOOLEAN: &str = "isBoolean";
    pub const IS_DATE: &str = "isDate";
    pub const IS_COLOR: &str = "isColor";
    pub const IS_JSON: &str = "isJson";
    pub const IS_IN: &str = "isIn";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const REGEX: &str = "regex";
}

/// A validation rule attached to one field.
///
/// Within a field's rule set, `validation_type` is the identity of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub validation_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    /// Custom message; `{{ name }}` is replaced with the field label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ValidationRule {
    pub fn new(validation_type: impl Into<String>) -> Self {
        Self {
            validation_type: validation_type.into(),
            params: Map::new(),
            error_message: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub validation_type: String,
    pub message: String,
}
