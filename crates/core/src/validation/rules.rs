//! Validation rule and result types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::i18n::Message;

/// Guard deciding whether a rule applies to the current draft.
///
/// When the guard does not hold the rule is skipped and the field is treated
/// as optional.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Always,
    /// Another field holds exactly this value.
    Equals(&'static str, Value),
    /// Another field holds anything but this value (including nothing).
    NotEquals(&'static str, Value),
    /// Another field is a number strictly greater than the bound.
    GreaterThan(&'static str, f64),
}

impl Condition {
    pub fn holds(&self, data: &Map<String, Value>) -> bool {
        match self {
            Self::Always => true,
            Self::Equals(field, expected) => data.get(*field) == Some(expected),
            Self::NotEquals(field, expected) => data.get(*field) != Some(expected),
            Self::GreaterThan(field, bound) => data
                .get(*field)
                .and_then(Value::as_f64)
                .is_some_and(|n| n > *bound),
        }
    }
}

/// What a rule checks.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// Value present: not null, not a blank string.
    Required,
    /// String length in characters, inclusive bounds.
    Length { min: u64, max: u64 },
    /// String matches a regular expression.
    Pattern(&'static str),
    /// Numeric value is one of a fixed set.
    OneOf(Vec<i64>),
    /// Array with at least one entry.
    NonEmptyList,
    /// Present and a valid `YYYY-MM-DD` calendar date.
    ValidDate,
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Length { .. } => "length",
            Self::Pattern(_) => "pattern",
            Self::OneOf(_) => "one_of",
            Self::NonEmptyList => "non_empty_list",
            Self::ValidDate => "valid_date",
        }
    }
}

/// One declarative rule bound to a field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    pub condition: Condition,
    pub kind: RuleKind,
    pub message: Message,
}

impl FieldRule {
    pub fn new(field: &'static str, kind: RuleKind, message: Message) -> Self {
        Self {
            field,
            condition: Condition::Always,
            kind,
            message,
        }
    }

    /// Only apply the rule while `condition` holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Aggregated result of evaluating rules against one draft.
///
/// Holds at most one violation per field, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldViolation>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_violations(errors: Vec<FieldViolation>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Message recorded for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Error messages in order, one per failing field.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|v| v.message.clone()).collect()
    }

    /// Append violations for fields that have not failed yet.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = FieldViolation>) {
        for violation in violations {
            if !self.contains(&violation.field) {
                self.errors.push(violation);
            }
        }
        self.is_valid = self.is_valid && self.errors.is_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn violation(field: &str) -> FieldViolation {
        FieldViolation {
            field: field.to_string(),
            rule_type: "required".to_string(),
            message: format!("{field} is required"),
            value: None,
        }
    }

    #[test]
    fn equals_condition() {
        let cond = Condition::Equals("gender", json!("female"));
        assert!(cond.holds(&data(&[("gender", json!("female"))])));
        assert!(!cond.holds(&data(&[("gender", json!("male"))])));
        assert!(!cond.holds(&data(&[])));
    }

    #[test]
    fn not_equals_condition_holds_for_missing_value() {
        let cond = Condition::NotEquals("gender", json!("female"));
        assert!(cond.holds(&data(&[("gender", Value::Null)])));
        assert!(cond.holds(&data(&[("gender", json!("male"))])));
        assert!(!cond.holds(&data(&[("gender", json!("female"))])));
    }

    #[test]
    fn greater_than_condition() {
        let cond = Condition::GreaterThan("smoking_status", 1.0);
        assert!(cond.holds(&data(&[("smoking_status", json!(2))])));
        assert!(!cond.holds(&data(&[("smoking_status", json!(1))])));
        assert!(!cond.holds(&data(&[("smoking_status", Value::Null)])));
    }

    #[test]
    fn extend_skips_fields_that_already_failed() {
        let mut result = ValidationResult::from_violations(vec![violation("hijab_status")]);
        result.extend(vec![violation("hijab_status"), violation("date_of_birth")]);
        assert_eq!(result.errors.len(), 2);
        assert!(!result.is_valid);
    }

    #[test]
    fn extend_invalidates_a_valid_result() {
        let mut result = ValidationResult::valid();
        result.extend(vec![violation("date_of_birth")]);
        assert!(!result.is_valid);
        assert_eq!(result.get("date_of_birth"), Some("date_of_birth is required"));
    }
}
