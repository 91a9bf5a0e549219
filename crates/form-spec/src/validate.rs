use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::well_known::Iso8601;

use crate::answers::{AnswerSet, AnswerValue};
use crate::options::DynamicOptionsCache;
use crate::spec::field::{FieldConstraint, FieldKind, FieldSpec};
use crate::spec::form::FormSchema;
use crate::visibility::{evaluate, is_visible};

/// A problem with one answered field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationIssue {
    pub field_id: String,
    pub message: String,
    pub code: String,
}

/// Outcome of checking an answer set against its schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

impl ValidationReport {
    /// One line per blocking problem, for inline display.
    pub fn messages(&self) -> Vec<String> {
        self.missing_required
            .iter()
            .map(|field_id| format!("{field_id}: this field is required"))
            .chain(
                self.issues
                    .iter()
                    .map(|issue| format!("{}: {}", issue.field_id, issue.message)),
            )
            .collect()
    }
}

/// Validates every visible field; hidden fields are neither required nor checked.
///
/// Unknown answer ids are reported but do not make the report invalid.
pub fn validate(
    schema: &FormSchema,
    answers: &AnswerSet,
    options: &DynamicOptionsCache,
) -> ValidationReport {
    let mask = evaluate(schema, answers);
    let mut missing_required = Vec::new();
    let mut issues = Vec::new();

    for field in schema.leaves() {
        if !is_visible(&mask, &field.id) {
            continue;
        }
        match answers.get(&field.id).filter(|value| !value.is_empty()) {
            None => {
                if field.required {
                    missing_required.push(field.id.clone());
                }
            }
            Some(value) => {
                if let Some(issue) = validate_value(field, value, options.effective(field)) {
                    issues.push(issue);
                }
            }
        }
    }

    let unknown_fields = answers
        .iter()
        .map(|(field_id, _)| field_id)
        .filter(|field_id| schema.leaves().all(|field| field.id != *field_id))
        .map(str::to_string)
        .collect();

    ValidationReport {
        valid: missing_required.is_empty() && issues.is_empty(),
        missing_required,
        issues,
        unknown_fields,
    }
}

fn validate_value(
    field: &FieldSpec,
    value: &AnswerValue,
    options: &[String],
) -> Option<ValidationIssue> {
    match (field.kind, value) {
        (FieldKind::Checkbox, AnswerValue::Choices(choices)) => {
            if !options.is_empty() && choices.iter().any(|choice| !options.contains(choice)) {
                return Some(issue(field, "unknown option selected", "option_mismatch"));
            }
            None
        }
        (FieldKind::Checkbox, AnswerValue::Text(_)) | (_, AnswerValue::Choices(_)) => {
            Some(issue(field, "type mismatch", "type_mismatch"))
        }
        (FieldKind::Select | FieldKind::Radio, AnswerValue::Text(text)) => {
            if !options.is_empty() && !options.iter().any(|option| option == text) {
                return Some(issue(field, "invalid option", "option_mismatch"));
            }
            None
        }
        (FieldKind::Number, AnswerValue::Text(text)) => validate_number(field, text),
        (FieldKind::Date, AnswerValue::Text(text)) => {
            if Date::parse(text.trim(), &Iso8601::DATE).is_err() {
                return Some(issue(field, "expected a date (YYYY-MM-DD)", "date_format"));
            }
            None
        }
        (FieldKind::Text, AnswerValue::Text(text)) => validate_pattern(field, text),
        (FieldKind::Group, AnswerValue::Text(_)) => {
            Some(issue(field, "groups cannot be answered", "type_mismatch"))
        }
    }
}

fn validate_number(field: &FieldSpec, text: &str) -> Option<ValidationIssue> {
    let number = match text.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => return Some(issue(field, "expected a number", "number_format")),
    };
    let constraint = field.validation.as_ref()?;
    if let Some(min) = constraint.min
        && number < min
    {
        return Some(issue(field, &format!("value below minimum {min}"), "min"));
    }
    if let Some(max) = constraint.max
        && number > max
    {
        return Some(issue(field, &format!("value above maximum {max}"), "max"));
    }
    None
}

fn validate_pattern(field: &FieldSpec, text: &str) -> Option<ValidationIssue> {
    let FieldConstraint {
        pattern: Some(pattern),
        ..
    } = field.validation.as_ref()?
    else {
        return None;
    };
    // An unparsable pattern is a schema authoring bug, not a user error.
    let regex = Regex::new(pattern).ok()?;
    if regex.is_match(text) {
        None
    } else {
        Some(issue(field, "value does not match pattern", "pattern_mismatch"))
    }
}

fn issue(field: &FieldSpec, message: &str, code: &str) -> ValidationIssue {
    ValidationIssue {
        field_id: field.id.clone(),
        message: message.into(),
        code: code.into(),
    }
}
