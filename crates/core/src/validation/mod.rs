//! Profile validation engine.
//!
//! Provides rule types, a pure-logic evaluator, the profile schema and the
//! cross-field checks that sit outside the declarative schema.

pub mod cross_field;
pub mod evaluator;
pub mod rules;
pub mod schema;

pub use rules::{Condition, FieldRule, FieldViolation, RuleKind, ValidationResult};
pub use schema::ProfileSchema;
