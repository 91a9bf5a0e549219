use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single answer: free text / single choice, or the ticked options of a checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(BTreeSet<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Choices(_) => None,
        }
    }

    /// Blank text and empty choice sets both count as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::Choices(choices) => choices.is_empty(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl<const N: usize> From<[&str; N]> for AnswerValue {
    fn from(values: [&str; N]) -> Self {
        AnswerValue::Choices(values.iter().map(|value| value.to_string()).collect())
    }
}

/// Flat map of field id to answer, shared by every field of a form.
///
/// Empty choice sets are never stored, so ticking and unticking an option
/// leaves the set exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&AnswerValue> {
        self.answers.get(field_id)
    }

    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.get(field_id).and_then(AnswerValue::as_text)
    }

    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<AnswerValue>) {
        let field_id = field_id.into();
        match value.into() {
            AnswerValue::Choices(choices) if choices.is_empty() => {
                self.answers.remove(&field_id);
            }
            value => {
                self.answers.insert(field_id, value);
            }
        }
    }

    pub fn remove(&mut self, field_id: &str) -> Option<AnswerValue> {
        self.answers.remove(field_id)
    }

    /// Ticks `choice` when absent and unticks it when present.
    ///
    /// Returns whether the choice is ticked afterwards. A text answer stored
    /// under a checkbox id is replaced.
    pub fn toggle_choice(&mut self, field_id: &str, choice: &str) -> bool {
        let mut choices = match self.answers.remove(field_id) {
            Some(AnswerValue::Choices(choices)) => choices,
            _ => BTreeSet::new(),
        };
        let ticked = if choices.remove(choice) {
            false
        } else {
            choices.insert(choice.to_string());
            true
        };
        self.insert(field_id, AnswerValue::Choices(choices));
        ticked
    }

    /// Copies every answer of `other` over this set.
    pub fn merge(&mut self, other: AnswerSet) {
        for (field_id, value) in other.answers {
            self.insert(field_id, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.answers
            .iter()
            .map(|(field_id, value)| (field_id.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    /// Request body shape expected by the submit endpoint.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (field_id, value) in iter {
            set.insert(field_id, value);
        }
        set
    }
}
