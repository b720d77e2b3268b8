//! Display-format templates for entity references.
//!
//! A template is free text with `{{ field-name }}` tokens, e.g.
//! `"{{ first_name }} {{ last_name }} ({{ id }})"`. Tokens are validated
//! against the resolved field names of the entity and substituted with record
//! values when rendering a reference label.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Regex pattern matching one `{{ name }}` token. The name has no braces and
/// at least one non-space character; surrounding whitespace is not captured.
pub const TOKEN_PATTERN: &str = r"\{\{\s*([^{}\s][^{}]*?)\s*\}\}";

/// Runs of three or more opening braces directly in front of a token.
const REPEATED_OPEN_PATTERN: &str = r"\{{3,}(\s*[^{}\s][^{}]*?\s*\}\})";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOKEN_PATTERN).expect("valid regex"));

static REPEATED_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REPEATED_OPEN_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A template referenced names that are not fields of the entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe_invalid_tokens(.invalid_tokens, .valid_fields))]
pub struct TemplateError {
    /// Unknown token names, first-seen order, no duplicates.
    pub invalid_tokens: Vec<String>,
    /// Every valid field name, in the entity's resolved field order.
    pub valid_fields: Vec<String>,
}

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_invalid_tokens(invalid_tokens: &[String], valid_fields: &[String]) -> String {
    let framing = if invalid_tokens.len() == 1 {
        "is not a valid entity field"
    } else {
        "are not valid entity fields"
    };
    let invalid = quote_list(invalid_tokens);
    if valid_fields.is_empty() {
        return format!("{invalid} {framing}. There are no valid fields");
    }
    format!("{invalid} {framing}. Valid fields are {}", quote_list(valid_fields))
}

// ---------------------------------------------------------------------------
// Tokenizing
// ---------------------------------------------------------------------------

/// Extract token names in order of appearance, duplicates preserved.
pub fn template_tokens(template: &str) -> Vec<&str> {
    TOKEN_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Collapse repeated opening markers in front of a token to a single `{{`.
///
/// `"{{{{ id }} - x"` becomes `"{{ id }} - x"`. Nothing else is touched:
/// token whitespace, literal text and closing markers are kept verbatim.
pub fn canonicalize_template(template: &str) -> Cow<'_, str> {
    REPEATED_OPEN_RE.replace_all(template, "{{$1")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate every token against `valid_fields` and return the canonical
/// template on success.
///
/// Templates without tokens (including the empty string) are always valid.
pub fn validate_template<S: AsRef<str>>(
    template: &str,
    valid_fields: &[S],
) -> Result<String, TemplateError> {
    let canonical = canonicalize_template(template);
    let known: HashSet<&str> = valid_fields.iter().map(|f| f.as_ref()).collect();

    let mut seen = HashSet::new();
    let invalid_tokens: Vec<String> = template_tokens(&canonical)
        .into_iter()
        .filter(|token| !known.contains(token))
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect();

    if !invalid_tokens.is_empty() {
        return Err(TemplateError {
            invalid_tokens,
            valid_fields: valid_fields.iter().map(|f| f.as_ref().to_string()).collect(),
        });
    }

    Ok(canonical.into_owned())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Text form of a record value as it appears inside a rendered template.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Substitute each token with the matching record value.
///
/// Missing and null values render as an empty string; strings render without
/// quotes; any other JSON value renders in its compact JSON form.
pub fn render_template(template: &str, record: &Map<String, Value>) -> String {
    let canonical = canonicalize_template(template);
    TOKEN_RE
        .replace_all(&canonical, |caps: &Captures| display_value(record.get(&caps[1])))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENTITY_1_FIELDS: [&str; 7] = [
        "entity-1-id-field",
        "entity-1-reference-field",
        "entity-1-string-field",
        "entity-1-number-field",
        "entity-1-boolean-field",
        "entity-1-date-field",
        "entity-1-enum-field",
    ];

    // -- template_tokens ----------------------------------------------------

    #[test]
    fn tokens_preserve_order_and_duplicates() {
        assert_eq!(
            template_tokens("{{ b }} {{a}} {{  b  }}"),
            vec!["b", "a", "b"]
        );
    }

    #[test]
    fn tokens_keep_inner_spaces() {
        assert_eq!(template_tokens("{{ first name }}"), vec!["first name"]);
    }

    #[test]
    fn empty_braces_are_not_tokens() {
        assert!(template_tokens("{{}} {{   }}").is_empty());
    }

    #[test]
    fn doubled_opening_markers_yield_one_token() {
        assert_eq!(
            template_tokens("{{{{ entity-1-id-field }} - {{{{ entity-1-string-field }} hello"),
            vec!["entity-1-id-field", "entity-1-string-field"]
        );
    }

    // -- canonicalize_template ----------------------------------------------

    #[test]
    fn canonical_form_collapses_repeated_openers() {
        assert_eq!(
            canonicalize_template("{{{{ entity-1-id-field }} - {{{{ entity-1-string-field }} hello"),
            "{{ entity-1-id-field }} - {{ entity-1-string-field }} hello"
        );
    }

    #[test]
    fn canonical_form_leaves_well_formed_template_untouched() {
        let template = "entity-1 - {{ name }}";
        assert!(matches!(canonicalize_template(template), Cow::Borrowed(_)));
    }

    // -- validate_template --------------------------------------------------

    #[test]
    fn unknown_token_is_reported_with_all_valid_fields() {
        let err = validate_template("{{ this-entity-does-not-exist }}", &ENTITY_1_FIELDS)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'this-entity-does-not-exist' is not a valid entity field. Valid fields are \
             'entity-1-id-field', 'entity-1-reference-field', 'entity-1-string-field', \
             'entity-1-number-field', 'entity-1-boolean-field', 'entity-1-date-field', \
             'entity-1-enum-field'"
        );
    }

    #[test]
    fn multiple_unknown_tokens_use_plural_framing() {
        let err = validate_template("{{ x }} {{ id }} {{ y }} {{ x }}", &["id", "name"])
            .unwrap_err();
        assert_eq!(err.invalid_tokens, vec!["x", "y"]);
        assert_eq!(
            err.to_string(),
            "'x', 'y' are not valid entity fields. Valid fields are 'id', 'name'"
        );
    }

    #[test]
    fn entity_without_fields_says_so() {
        let err = validate_template("{{ x }}", &[] as &[&str]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'x' is not a valid entity field. There are no valid fields"
        );
    }

    #[test]
    fn literal_text_without_tokens_is_valid() {
        for template in ["", "Just a label", "{ not a token }", "{{}}"] {
            assert_eq!(
                validate_template(template, &["id"]).as_deref(),
                Ok(template)
            );
        }
    }

    #[test]
    fn doubled_markers_validate_to_canonical_form() {
        let saved = validate_template(
            "{{{{ entity-1-id-field }} - {{{{ entity-1-string-field }} hello",
            &ENTITY_1_FIELDS,
        )
        .unwrap();
        assert_eq!(saved, "{{ entity-1-id-field }} - {{ entity-1-string-field }} hello");
    }

    #[test]
    fn token_whitespace_is_kept_verbatim() {
        let saved = validate_template("{{id}} / {{   name }}", &["id", "name"]).unwrap();
        assert_eq!(saved, "{{id}} / {{   name }}");
    }

    // -- render_template ----------------------------------------------------

    #[test]
    fn render_substitutes_record_values() {
        let record = json!({"id": 7, "name": "Ada", "nickname": null})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            render_template("{{ name }} #{{id}} {{ nickname }}{{ missing }}", &record),
            "Ada #7 "
        );
    }

    #[test]
    fn render_handles_doubled_markers() {
        let record = json!({"id": 1}).as_object().cloned().unwrap();
        assert_eq!(render_template("{{{{ id }} hello", &record), "1 hello");
    }
}
