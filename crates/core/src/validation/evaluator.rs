//! Rule evaluator — pure logic, no I/O.
//!
//! Runs a field's merged rules against submitted form values. Only the first
//! failing rule of each field is reported, matching how the admin form shows
//! one message per input.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use super::rules::{validation_types, FieldViolation, ValidationRule};
use crate::template::render_template;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid regex")
});

/// Evaluate every field's rules against one record, in field order.
///
/// `label_for` turns a field name into the label used in messages.
pub fn evaluate_record<F>(
    validations: &IndexMap<String, Vec<ValidationRule>>,
    data: &Map<String, Value>,
    label_for: F,
) -> Vec<FieldViolation>
where
    F: Fn(&str) -> String,
{
    validations
        .iter()
        .filter_map(|(field, rules)| {
            evaluate_field(field, &label_for(field), rules, data.get(field))
        })
        .collect()
}

/// Evaluate one field's rules and return the first violation, if any.
pub fn evaluate_field(
    field: &str,
    label: &str,
    rules: &[ValidationRule],
    value: Option<&Value>,
) -> Option<FieldViolation> {
    rules
        .iter()
        .find(|rule| !rule_passes(rule, value))
        .map(|rule| FieldViolation {
            field: field.to_string(),
            validation_type: rule.validation_type.clone(),
            message: message_for(rule, label),
        })
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}

fn rule_passes(rule: &ValidationRule, value: Option<&Value>) -> bool {
    if rule.validation_type == validation_types::REQUIRED {
        return !is_blank(value);
    }

    // Everything except `required` only constrains values that are present.
    let value = match value {
        Some(v) if !is_blank(Some(v)) => v,
        _ => return true,
    };

    match rule.validation_type.as_str() {
        validation_types::IS_EMAIL => value.as_str().is_some_and(|s| EMAIL_RE.is_match(s)),
        validation_types::IS_URL => value.as_str().is_some_and(|s| URL_RE.is_match(s)),
        validation_types::IS_COLOR => value.as_str().is_some_and(|s| COLOR_RE.is_match(s)),
        validation_types::IS_NUMBER => as_number(value).is_some(),
        validation_types::IS_BOOLEAN => match value {
            Value::Bool(_) => true,
            Value::String(s) => s == "true" || s == "false",
            _ => false,
        },
        validation_types::IS_DATE => value.as_str().is_some_and(is_date),
        validation_types::IS_JSON => match value {
            Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
            _ => true,
        },
        validation_types::IS_IN => rule
            .params
            .get("options")
            .and_then(Value::as_array)
            .map_or(true, |options| options.contains(value)),
        validation_types::MIN => match (as_number(value), param_number(rule, "value")) {
            (Some(n), Some(min)) => n >= min,
            _ => true,
        },
        validation_types::MAX => match (as_number(value), param_number(rule, "value")) {
            (Some(n), Some(max)) => n <= max,
            _ => true,
        },
        validation_types::MIN_LENGTH => match (length_of(value), param_number(rule, "length")) {
            (Some(len), Some(min)) => len as f64 >= min,
            _ => true,
        },
        validation_types::MAX_LENGTH => match (length_of(value), param_number(rule, "length")) {
            (Some(len), Some(max)) => len as f64 <= max,
            _ => true,
        },
        validation_types::REGEX => {
            let (Some(s), Some(pattern)) = (
                value.as_str(),
                rule.params.get("pattern").and_then(Value::as_str),
            ) else {
                return true;
            };
            match Regex::new(pattern) {
                Ok(re) => re.is_match(s),
                Err(_) => true, // Invalid pattern silently passes
            }
        }
        _ => true, // Unknown rule types silently pass
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn param_number(rule: &ValidationRule, key: &str) -> Option<f64> {
    rule.params.get(key).and_then(as_number)
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn is_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn message_for(rule: &ValidationRule, label: &str) -> String {
    if let Some(custom) = &rule.error_message {
        let mut context = Map::new();
        context.insert("name".to_string(), Value::String(label.to_string()));
        return render_template(custom, &context);
    }

    let param = |key: &str| {
        rule.params
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_default()
    };

    match rule.validation_type.as_str() {
        validation_types::REQUIRED => format!("{label} is required"),
        validation_types::IS_EMAIL => format!("{label} is not a valid email"),
        validation_types::IS_URL => format!("{label} is not a valid url"),
        validation_types::IS_NUMBER => format!("{label} should be a number"),
        validation_types::IS_BOOLEAN => format!("{label} should be a boolean"),
        validation_types::IS_DATE => format!("{label} is not a valid date"),
        validation_types::IS_COLOR => format!("{label} should be a color"),
        validation_types::IS_JSON => format!("{label} is not valid JSON"),
        validation_types::IS_IN => format!("{label} should be one of the allowed values"),
        validation_types::MIN => {
            format!("{label} should be greater than or equal to {}", param("value"))
        }
        validation_types::MAX => format!("{label} should be less than or equal to {}", param("value")),
        validation_types::MIN_LENGTH => {
            format!("{label} should be at least {} characters", param("length"))
        }
        validation_types::MAX_LENGTH => {
            format!("{label} should be at most {} characters", param("length"))
        }
        _ => format!("{label} is invalid"),
    }
}
