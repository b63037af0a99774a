//! Checks that span more than one field and sit outside the declarative
//! schema: minimum age derived from the date of birth, and the hijab
//! requirement for female profiles.

use chrono::{Datelike, NaiveDate};

use super::rules::FieldViolation;
use crate::draft::{fields, FormDraft, Gender};
use crate::i18n::{Message, Translator};
use crate::steps::ProfileStep;

/// Youngest age allowed to complete a profile.
pub const MIN_AGE_YEARS: u32 = 18;

const UNDERAGE: Message = Message::new("validation.age.minimum", "You must be at least 18 years old");
const HIJAB_REQUIRED: Message =
    Message::new("validation.hijab_status.required", "Please select your hijab status");

/// Age in completed years on `today`; `None` for a birth date in the future.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Fails when the date of birth makes the user younger than [`MIN_AGE_YEARS`].
///
/// A missing date is left to the schema's required rule.
pub fn check_adult(
    draft: &FormDraft,
    today: NaiveDate,
    translator: &dyn Translator,
) -> Option<FieldViolation> {
    let dob = draft.date_of_birth?;
    let old_enough = age_in_years(dob, today).is_some_and(|age| age >= MIN_AGE_YEARS);
    if old_enough {
        return None;
    }
    Some(FieldViolation {
        field: fields::DATE_OF_BIRTH.to_string(),
        rule_type: "min_age".to_string(),
        message: UNDERAGE.resolve(translator),
        value: Some(serde_json::Value::String(dob.format("%Y-%m-%d").to_string())),
    })
}

/// Fails when a female profile has no hijab status.
pub fn check_hijab(draft: &FormDraft, translator: &dyn Translator) -> Option<FieldViolation> {
    if draft.gender != Some(Gender::Female) || draft.hijab_status.is_some() {
        return None;
    }
    Some(FieldViolation {
        field: fields::HIJAB_STATUS.to_string(),
        rule_type: "required".to_string(),
        message: HIJAB_REQUIRED.resolve(translator),
        value: None,
    })
}

/// Supplementary checks tied to one step. Only the personal step has any.
pub fn step_checks(
    step: ProfileStep,
    draft: &FormDraft,
    today: NaiveDate,
    translator: &dyn Translator,
) -> Vec<FieldViolation> {
    match step {
        ProfileStep::Personal => all_checks(draft, today, translator),
        _ => Vec::new(),
    }
}

/// Every cross-field check, run before final submission.
pub fn all_checks(
    draft: &FormDraft,
    today: NaiveDate,
    translator: &dyn Translator,
) -> Vec<FieldViolation> {
    [check_adult(draft, today, translator), check_hijab(draft, translator)]
        .into_iter()
        .flatten()
        .collect()
}
