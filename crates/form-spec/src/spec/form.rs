use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::field::FieldSpec;

/// Structural problems that make a schema unusable by the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("form '{form_id}' declares field id '{field_id}' more than once")]
    DuplicateFieldId { form_id: String, field_id: String },
    #[error("form '{form_id}' nests group '{group_id}' inside another group")]
    NestedGroup { form_id: String, group_id: String },
    #[error("field '{field_id}' in form '{form_id}' depends on unknown field '{depends_on}'")]
    UnknownDependency {
        form_id: String,
        field_id: String,
        depends_on: String,
    },
}

/// Top-level form definition as served by the forms endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Every answerable field in document order, nested or top-level.
    pub fn leaves(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().flat_map(|field| {
            if field.is_group() {
                field.children().iter().collect::<Vec<_>>()
            } else {
                vec![field]
            }
        })
    }

    /// Top-level groups, always rendered.
    pub fn groups(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.is_group())
    }

    /// Looks up any field, group or leaf, by id.
    pub fn field(&self, id: &str) -> Option<&FieldSpec> {
        self.groups()
            .find(|group| group.id == id)
            .or_else(|| self.leaves().find(|field| field.id == id))
    }

    /// Leaf fields whose remote options are driven by `source_id`.
    pub fn dependents_of<'a>(&'a self, source_id: &'a str) -> impl Iterator<Item = &'a FieldSpec> {
        self.leaves()
            .filter(move |field| field.options_source() == Some(source_id))
    }

    /// Checks the invariants the flat answer and visibility maps rely on.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(self.duplicate(&field.id));
            }
            for child in field.children() {
                if child.is_group() {
                    return Err(SchemaError::NestedGroup {
                        form_id: self.form_id.clone(),
                        group_id: child.id.clone(),
                    });
                }
                if !seen.insert(child.id.as_str()) {
                    return Err(self.duplicate(&child.id));
                }
            }
        }

        for field in self.leaves() {
            let sources = field
                .visibility
                .as_ref()
                .map(|rule| rule.depends_on.as_str())
                .into_iter()
                .chain(field.options_source());
            for depends_on in sources {
                if !seen.contains(depends_on) {
                    return Err(SchemaError::UnknownDependency {
                        form_id: self.form_id.clone(),
                        field_id: field.id.clone(),
                        depends_on: depends_on.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn duplicate(&self, field_id: &str) -> SchemaError {
        SchemaError::DuplicateFieldId {
            form_id: self.form_id.clone(),
            field_id: field_id.to_string(),
        }
    }
}

/// Ordered set of forms a user can pick from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct FormCatalog {
    forms: Vec<FormSchema>,
}

impl FormCatalog {
    pub fn new(forms: Vec<FormSchema>) -> Self {
        Self { forms }
    }

    pub fn get(&self, form_id: &str) -> Option<&FormSchema> {
        self.forms.iter().find(|form| form.form_id == form_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormSchema> {
        self.forms.iter()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}
