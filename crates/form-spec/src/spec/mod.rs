pub mod field;
pub mod form;

pub use field::{
    Condition, DynamicOptions, FieldConstraint, FieldKind, FieldSpec, HttpMethod, VisibilityRule,
};
pub use form::{FormCatalog, FormSchema, SchemaError};
