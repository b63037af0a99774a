//! Rule evaluator. Pure logic, no I/O.

use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, Mutex, PoisonError};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use validator::ValidateLength;

use super::rules::{FieldRule, FieldViolation, RuleKind, ValidationResult};
use crate::i18n::Translator;

/// Compiled rule patterns keyed by source. Invalid sources map to `None`.
static COMPILED_PATTERNS: LazyLock<Mutex<HashMap<&'static str, Option<Regex>>>> =
    LazyLock::new(Default::default);

/// Evaluate `rules` against a draft's field map.
///
/// Only the first failing rule of each field is reported. Rules whose
/// condition does not hold are skipped.
pub fn evaluate_rules<'a>(
    rules: impl IntoIterator<Item = &'a FieldRule>,
    data: &Map<String, Value>,
    translator: &dyn Translator,
) -> ValidationResult {
    let mut failed: HashSet<&str> = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if failed.contains(rule.field) || !rule.condition.holds(data) {
            continue;
        }
        if let Some(violation) = evaluate_single_rule(rule, data, translator) {
            failed.insert(rule.field);
            errors.push(violation);
        }
    }

    ValidationResult::from_violations(errors)
}

fn evaluate_single_rule(
    rule: &FieldRule,
    data: &Map<String, Value>,
    translator: &dyn Translator,
) -> Option<FieldViolation> {
    let field_value = data.get(rule.field);

    let passed = match &rule.kind {
        RuleKind::Required => is_present(field_value),
        RuleKind::Length { min, max } => check_length(field_value, *min, *max),
        RuleKind::Pattern(pattern) => check_pattern(field_value, *pattern),
        RuleKind::OneOf(allowed) => check_one_of(field_value, allowed),
        RuleKind::NonEmptyList => field_value
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty()),
        RuleKind::ValidDate => field_value
            .and_then(Value::as_str)
            .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
    };

    if passed {
        None
    } else {
        Some(FieldViolation {
            field: rule.field.to_string(),
            rule_type: rule.kind.name().to_string(),
            message: rule.message.resolve(translator),
            value: field_value.filter(|v| !v.is_null()).cloned(),
        })
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        _ => true,
    }
}

// Length, pattern and set checks leave presence to `Required`.

fn check_length(value: Option<&Value>, min: u64, max: u64) -> bool {
    match value.and_then(Value::as_str) {
        Some(s) => s.validate_length(Some(min), Some(max), None),
        None => true,
    }
}

fn compiled_pattern(pattern: &'static str) -> Option<Regex> {
    let mut cache = COMPILED_PATTERNS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(pattern)
        .or_insert_with(|| Regex::new(pattern).ok())
        .clone()
}

fn check_pattern(value: Option<&Value>, pattern: &'static str) -> bool {
    let Some(s) = value.and_then(Value::as_str) else {
        return true;
    };
    match compiled_pattern(pattern) {
        Some(re) => re.is_match(s),
        None => true, // Invalid regex pattern silently passes
    }
}

fn check_one_of(value: Option<&Value>, allowed: &[i64]) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(v) => v.as_i64().is_some_and(|n| allowed.contains(&n)),
    }
}
