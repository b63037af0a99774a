//! Whole-schema properties of the profile validation rules.
//!
//! Verifies that a fully completed draft passes every step, that clearing any
//! required field is reported against that field, and the conditional rules
//! around employment, gender and smoking.

use chrono::{Months, NaiveDate};
use serde_json::Value;

use kismet_core::draft::{Choice, FormDraft, Gender};
use kismet_core::i18n::EnglishOnly;
use kismet_core::payload::{SubmissionPayload, ZeroIdPolicy};
use kismet_core::steps::{ProfileStep, STEPS};
use kismet_core::validation::{cross_field, ProfileSchema};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// A draft that satisfies every rule for a male user.
fn complete_male() -> FormDraft {
    FormDraft {
        bio_en: "I enjoy hiking and reading.".into(),
        bio_ar: "أحب المشي والقراءة كثيرا".into(),
        gender: Some(Gender::Male),
        date_of_birth: today().checked_sub_months(Months::new(12 * 25)),
        guardian_contact: "0501234567".into(),
        nationality_id: Some(1),
        origin_id: Some(2),
        country_of_residence_id: Some(3),
        city_id: Some(4),
        religion_id: Some(1),
        religiosity_level_id: Some(2),
        marital_status_id: Some(1),
        number_of_children: Some(1),
        height_id: Some(175),
        weight_id: Some(70),
        skin_color_id: Some(2),
        eye_color_id: Some(3),
        sleep_habit_id: Some(1),
        sports_activity_id: Some(2),
        social_media_presence_id: Some(1),
        drinking_status_id: Some(1),
        smoking_status: Some(1),
        zodiac_sign_id: Some(5),
        hobbies: vec![Choice::Id(1), Choice::Id(2)],
        educational_level_id: Some(3),
        specialization_id: Some(8),
        employment_status: Some(false),
        financial_status_id: Some(2),
        housing_status_id: Some(1),
        car_ownership: Some(true),
        marriage_budget_id: Some(2),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Test: complete drafts pass every step
// ---------------------------------------------------------------------------

#[test]
fn complete_draft_passes_every_step_and_full_schema() {
    let schema = ProfileSchema::new();
    let draft = complete_male();

    for descriptor in STEPS.iter() {
        let result = schema.trigger(&draft, descriptor.owned_fields, &EnglishOnly);
        assert!(result.is_valid, "{}: {:?}", descriptor.key, result.errors);
    }
    assert!(schema.validate_all(&draft, &EnglishOnly).is_valid);
    assert!(cross_field::all_checks(&draft, today(), &EnglishOnly).is_empty());
}

// ---------------------------------------------------------------------------
// Test: clearing any required field is reported on that field
// ---------------------------------------------------------------------------

#[test]
fn clearing_a_required_field_reports_that_field() {
    let schema = ProfileSchema::new();
    let required = [
        "bio_en",
        "bio_ar",
        "gender",
        "date_of_birth",
        "guardian_contact",
        "nationality_id",
        "city_id",
        "number_of_children",
        "smoking_status",
        "zodiac_sign_id",
        "educational_level_id",
        "employment_status",
        "housing_status_id",
        "marriage_budget_id",
    ];

    for field in required {
        let mut draft = complete_male();
        draft.set_value(field, Value::Null).unwrap();

        let result = schema.validate_all(&draft, &EnglishOnly);
        let message = result.get(field);
        assert!(
            message.is_some_and(|m| !m.is_empty()),
            "{field} should be reported, got {:?}",
            result.errors
        );
    }
}

// ---------------------------------------------------------------------------
// Test: conditional requirements
// ---------------------------------------------------------------------------

#[test]
fn unemployed_passes_regardless_of_job_fields() {
    let schema = ProfileSchema::new();
    for job_title in [None, Some(3)] {
        let draft = FormDraft {
            employment_status: Some(false),
            job_title_id: job_title,
            position_level_id: None,
            ..complete_male()
        };
        assert!(schema.validate_all(&draft, &EnglishOnly).is_valid);
    }
}

#[test]
fn employed_without_job_title_fails_on_job_title() {
    let draft = FormDraft {
        employment_status: Some(true),
        job_title_id: None,
        position_level_id: Some(2),
        ..complete_male()
    };
    let result = ProfileSchema::new().validate_all(&draft, &EnglishOnly);
    assert!(result.contains("job_title_id"));
    assert!(!result.contains("position_level_id"));
}

#[test]
fn female_requires_hijab_but_not_marriage_budget() {
    let draft = FormDraft {
        gender: Some(Gender::Female),
        hijab_status: None,
        marriage_budget_id: None,
        ..complete_male()
    };
    let schema = ProfileSchema::new();
    let result = schema.trigger(&draft, ProfileStep::Personal.owned_fields(), &EnglishOnly);
    assert_eq!(result.get("hijab_status"), Some("Please select your hijab status"));
    assert!(!schema.validate_all(&draft, &EnglishOnly).contains("marriage_budget_id"));
}

#[test]
fn smoker_needs_tools_and_payload_carries_them() {
    let draft = FormDraft {
        smoking_status: Some(2),
        smoking_tools: vec![],
        ..complete_male()
    };
    let schema = ProfileSchema::new();
    assert!(schema.validate_all(&draft, &EnglishOnly).contains("smoking_tools"));

    let fixed = FormDraft {
        smoking_tools: vec![Choice::Id(3)],
        ..draft
    };
    assert!(schema.validate_all(&fixed, &EnglishOnly).is_valid);

    let payload = SubmissionPayload::from_draft(&fixed, ZeroIdPolicy::default());
    assert_eq!(payload.smoking_status, 1);
    assert_eq!(payload.smoking_tools, Some(vec![3]));
}
