#![allow(missing_docs)]

pub mod answers;
pub mod options;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use answers::{AnswerSet, AnswerValue};
pub use options::{DynamicOptionsCache, OptionRequest};
pub use spec::{
    Condition, DynamicOptions, FieldConstraint, FieldKind, FieldSpec, FormCatalog, FormSchema,
    HttpMethod, SchemaError, VisibilityRule,
};
pub use validate::{ValidationIssue, ValidationReport, validate};
pub use visibility::{VisibilityMask, evaluate, is_visible};

/// JSON Schema describing the form payload served by the forms endpoint.
pub fn catalog_json_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(FormCatalog)).unwrap_or_default()
}
