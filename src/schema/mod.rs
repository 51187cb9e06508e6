//! Outline JSON schema validation

mod validate;

pub use validate::{
    IssueSeverity, Result, SchemaError, SchemaValidator, ValidationIssue, ValidationResult,
};
