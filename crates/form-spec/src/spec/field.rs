use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerValue;

/// Supported field widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    Group,
}

/// Comparison applied by a visibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Equals,
    #[serde(alias = "not_equals")]
    NotEquals,
}

/// Shows a field only while another field's answer satisfies a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    pub depends_on: String,
    pub condition: Condition,
    pub value: String,
}

impl VisibilityRule {
    /// Checks the rule against the current answer of `depends_on`.
    ///
    /// A missing answer never equals the expected value, and a multi-choice
    /// answer never equals a single string.
    pub fn holds(&self, current: Option<&AnswerValue>) -> bool {
        let matches = current
            .and_then(AnswerValue::as_text)
            .is_some_and(|text| text == self.value);
        match self.condition {
            Condition::Equals => matches,
            Condition::NotEquals => !matches,
        }
    }
}

/// HTTP verb used when fetching remote data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// Remote source for a field whose options depend on another answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DynamicOptions {
    pub depends_on: String,
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
}

/// Value constraints enforced at submit time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A single form field or a group of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_options: Option<DynamicOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,
}

impl FieldSpec {
    pub fn is_group(&self) -> bool {
        self.kind == FieldKind::Group
    }

    /// Nested fields of a group; empty for leaf fields.
    pub fn children(&self) -> &[FieldSpec] {
        self.fields.as_deref().unwrap_or(&[])
    }

    pub fn static_options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Field id whose answer drives this field's remote options, if any.
    pub fn options_source(&self) -> Option<&str> {
        self.dynamic_options
            .as_ref()
            .map(|dynamic| dynamic.depends_on.as_str())
    }
}
