//! Declarative rule list for the profile form.

use serde_json::json;

use super::evaluator::evaluate_rules;
use super::rules::{Condition, FieldRule, RuleKind, ValidationResult};
use crate::draft::{fields, FormDraft};
use crate::i18n::{Message, Translator};

/// Minimum characters for each bio.
pub const BIO_MIN_CHARS: u64 = 10;

/// Maximum characters for each bio.
pub const BIO_MAX_CHARS: u64 = 500;

/// Accepted values for `number_of_children`.
pub const CHILDREN_OPTIONS: [i64; 5] = [1, 2, 3, 4, 5];

/// Accepted values for `hijab_status`.
pub const HIJAB_OPTIONS: [i64; 2] = [0, 1];

/// Guardian phone numbers are exactly ten ASCII digits.
pub const GUARDIAN_CONTACT_PATTERN: &str = r"^[0-9]{10}$";

/// Select-one fields that must hold a numeric id.
const SELECT_FIELDS: &[(&str, Message)] = &[
    (fields::NATIONALITY_ID, Message::new("validation.select.nationality", "Please select your nationality")),
    (fields::ORIGIN_ID, Message::new("validation.select.origin", "Please select your origin")),
    (fields::COUNTRY_OF_RESIDENCE_ID, Message::new("validation.select.country", "Please select your country of residence")),
    (fields::CITY_ID, Message::new("validation.select.city", "Please select your city")),
    (fields::RELIGION_ID, Message::new("validation.select.religion", "Please select your religion")),
    (fields::RELIGIOSITY_LEVEL_ID, Message::new("validation.select.religiosity", "Please select your religiosity level")),
    (fields::MARITAL_STATUS_ID, Message::new("validation.select.marital_status", "Please select your marital status")),
    (fields::HEIGHT_ID, Message::new("validation.select.height", "Please select your height")),
    (fields::WEIGHT_ID, Message::new("validation.select.weight", "Please select your weight")),
    (fields::SKIN_COLOR_ID, Message::new("validation.select.skin_color", "Please select your skin color")),
    (fields::EYE_COLOR_ID, Message::new("validation.select.eye_color", "Please select your eye color")),
    (fields::SLEEP_HABIT_ID, Message::new("validation.select.sleep_habit", "Please select your sleep habit")),
    (fields::SPORTS_ACTIVITY_ID, Message::new("validation.select.sports_activity", "Please select your sports activity")),
    (fields::SOCIAL_MEDIA_PRESENCE_ID, Message::new("validation.select.social_media", "Please select your social media presence")),
    (fields::DRINKING_STATUS_ID, Message::new("validation.select.drinking_status", "Please select your drinking status")),
    (fields::SMOKING_STATUS, Message::new("validation.select.smoking_status", "Please select your smoking status")),
    (fields::ZODIAC_SIGN_ID, Message::new("validation.select.zodiac_sign", "Please select your zodiac sign")),
    (fields::EDUCATIONAL_LEVEL_ID, Message::new("validation.select.education_level", "Please select your education level")),
    (fields::SPECIALIZATION_ID, Message::new("validation.select.specialization", "Please select your specialization")),
    (fields::EMPLOYMENT_STATUS, Message::new("validation.select.employment_status", "Please select your employment status")),
    (fields::FINANCIAL_STATUS_ID, Message::new("validation.select.financial_status", "Please select your financial status")),
    (fields::HOUSING_STATUS_ID, Message::new("validation.select.housing_status", "Please select your housing status")),
];

/// The full profile schema: an ordered list of field rules.
#[derive(Debug, Clone)]
pub struct ProfileSchema {
    rules: Vec<FieldRule>,
}

impl Default for ProfileSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileSchema {
    pub fn new() -> Self {
        let female = || json!("female");
        let mut rules = Vec::new();

        // -- personal --
        for (field, required, length) in [
            (
                fields::BIO_EN,
                Message::new("validation.bio_en.required", "Please write your bio in English"),
                Message::new("validation.bio_en.length", "English bio must be between 10 and 500 characters"),
            ),
            (
                fields::BIO_AR,
                Message::new("validation.bio_ar.required", "Please write your bio in Arabic"),
                Message::new("validation.bio_ar.length", "Arabic bio must be between 10 and 500 characters"),
            ),
        ] {
            rules.push(FieldRule::new(field, RuleKind::Required, required));
            rules.push(FieldRule::new(
                field,
                RuleKind::Length {
                    min: BIO_MIN_CHARS,
                    max: BIO_MAX_CHARS,
                },
                length,
            ));
        }

        rules.push(FieldRule::new(
            fields::GENDER,
            RuleKind::Required,
            Message::new("validation.select.gender", "Please select your gender"),
        ));
        rules.push(FieldRule::new(
            fields::DATE_OF_BIRTH,
            RuleKind::ValidDate,
            Message::new("validation.date_of_birth.required", "Please enter a valid date of birth"),
        ));
        rules.push(FieldRule::new(
            fields::GUARDIAN_CONTACT,
            RuleKind::Required,
            Message::new("validation.guardian_contact.required", "Please enter your guardian's contact number"),
        ));
        rules.push(FieldRule::new(
            fields::GUARDIAN_CONTACT,
            RuleKind::Pattern(GUARDIAN_CONTACT_PATTERN),
            Message::new("validation.guardian_contact.format", "Guardian contact must be exactly 10 digits"),
        ));

        let hijab_required =
            Message::new("validation.hijab_status.required", "Please select your hijab status");
        rules.push(
            FieldRule::new(fields::HIJAB_STATUS, RuleKind::Required, hijab_required)
                .when(Condition::Equals(fields::GENDER, female())),
        );
        rules.push(
            FieldRule::new(
                fields::HIJAB_STATUS,
                RuleKind::OneOf(HIJAB_OPTIONS.to_vec()),
                hijab_required,
            )
            .when(Condition::Equals(fields::GENDER, female())),
        );

        // -- select-one ids --
        for &(field, message) in SELECT_FIELDS {
            rules.push(FieldRule::new(field, RuleKind::Required, message));
        }

        // -- lifestyle --
        rules.push(FieldRule::new(
            fields::NUMBER_OF_CHILDREN,
            RuleKind::Required,
            Message::new("validation.number_of_children.required", "Please select the number of children"),
        ));
        rules.push(FieldRule::new(
            fields::NUMBER_OF_CHILDREN,
            RuleKind::OneOf(CHILDREN_OPTIONS.to_vec()),
            Message::new("validation.number_of_children.invalid", "Invalid option for number of children"),
        ));
        rules.push(
            FieldRule::new(
                fields::SMOKING_TOOLS,
                RuleKind::NonEmptyList,
                Message::new("validation.smoking_tools.required", "Please select at least one smoking tool"),
            )
            .when(Condition::GreaterThan(fields::SMOKING_STATUS, 1.0)),
        );

        // -- education & work --
        for (field, message) in [
            (
                fields::JOB_TITLE_ID,
                Message::new("validation.select.job_title", "Please select your job title"),
            ),
            (
                fields::POSITION_LEVEL_ID,
                Message::new("validation.select.position_level", "Please select your position level"),
            ),
        ] {
            rules.push(
                FieldRule::new(field, RuleKind::Required, message)
                    .when(Condition::Equals(fields::EMPLOYMENT_STATUS, json!(true))),
            );
        }
        rules.push(
            FieldRule::new(
                fields::MARRIAGE_BUDGET_ID,
                RuleKind::Required,
                Message::new("validation.select.marriage_budget", "Please select your marriage budget"),
            )
            .when(Condition::NotEquals(fields::GENDER, female())),
        );

        Self { rules }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Validate only the named fields.
    pub fn trigger(
        &self,
        draft: &FormDraft,
        field_names: &[&str],
        translator: &dyn Translator,
    ) -> ValidationResult {
        let data = draft.to_field_map();
        evaluate_rules(
            self.rules.iter().filter(|r| field_names.contains(&r.field)),
            &data,
            translator,
        )
    }

    /// Validate every field of the draft.
    pub fn validate_all(&self, draft: &FormDraft, translator: &dyn Translator) -> ValidationResult {
        let data = draft.to_field_map();
        evaluate_rules(&self.rules, &data, translator)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::draft::Gender;
    use crate::i18n::EnglishOnly;
    use crate::steps::ProfileStep;

    fn personal_ok() -> FormDraft {
        FormDraft {
            bio_en: "a".repeat(20),
            bio_ar: "a".repeat(20),
            gender: Some(Gender::Male),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1),
            guardian_contact: "1234567890".into(),
            ..Default::default()
        }
    }

    fn step(draft: &FormDraft, step: ProfileStep) -> ValidationResult {
        ProfileSchema::new().trigger(draft, step.owned_fields(), &EnglishOnly)
    }

    #[test]
    fn every_rule_targets_a_draft_field() {
        let names = FormDraft::field_names();
        for rule in ProfileSchema::new().rules() {
            assert!(names.iter().any(|n| n == rule.field), "{}", rule.field);
        }
    }

    #[test]
    fn personal_step_passes_for_complete_male() {
        let result = step(&personal_ok(), ProfileStep::Personal);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn short_bio_fails_length() {
        let draft = FormDraft {
            bio_en: "too short".into(),
            ..personal_ok()
        };
        let result = step(&draft, ProfileStep::Personal);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "bio_en");
        assert_eq!(result.errors[0].rule_type, "length");
    }

    #[test]
    fn guardian_contact_requires_ten_digits() {
        let draft = FormDraft {
            guardian_contact: "12345abcde".into(),
            ..personal_ok()
        };
        let result = step(&draft, ProfileStep::Personal);
        assert_eq!(
            result.get("guardian_contact"),
            Some("Guardian contact must be exactly 10 digits")
        );
    }

    #[test]
    fn guardian_contact_rejects_non_ascii_digits() {
        for contact in ["٠١٢٣٤٥٦٧٨٩", "۰۱۲۳۴۵۶۷۸۹", "０１２３４５６７８９"] {
            let draft = FormDraft {
                guardian_contact: contact.into(),
                ..personal_ok()
            };
            let result =
                ProfileSchema::new().trigger(&draft, &[fields::GUARDIAN_CONTACT], &EnglishOnly);
            assert_eq!(
                result.get("guardian_contact"),
                Some("Guardian contact must be exactly 10 digits"),
                "{contact}"
            );
        }
    }

    #[test]
    fn female_without_hijab_fails() {
        let draft = FormDraft {
            gender: Some(Gender::Female),
            ..personal_ok()
        };
        let result = step(&draft, ProfileStep::Personal);
        assert_eq!(result.get("hijab_status"), Some("Please select your hijab status"));
    }

    #[test]
    fn female_hijab_outside_set_fails() {
        let draft = FormDraft {
            gender: Some(Gender::Female),
            hijab_status: Some(3),
            ..personal_ok()
        };
        assert!(step(&draft, ProfileStep::Personal).contains("hijab_status"));
    }

    #[test]
    fn male_without_hijab_passes() {
        assert!(!step(&personal_ok(), ProfileStep::Personal).contains("hijab_status"));
    }

    #[test]
    fn select_fields_report_please_select() {
        let result = step(&FormDraft::default(), ProfileStep::Lifestyle);
        assert_eq!(result.get("city_id"), Some("Please select your city"));
        assert_eq!(result.get("zodiac_sign_id"), Some("Please select your zodiac sign"));
        assert!(!result.contains("hobbies"));
        assert!(!result.contains("hair_color_id"));
    }

    #[test]
    fn children_required_and_enumerated() {
        let missing = step(&FormDraft::default(), ProfileStep::Lifestyle);
        assert_eq!(
            missing.get("number_of_children"),
            Some("Please select the number of children")
        );

        let out_of_set = FormDraft {
            number_of_children: Some(9),
            ..Default::default()
        };
        assert_eq!(
            step(&out_of_set, ProfileStep::Lifestyle).get("number_of_children"),
            Some("Invalid option for number of children")
        );
    }

    #[test]
    fn smoking_tools_required_only_for_smokers() {
        let smoker = FormDraft {
            smoking_status: Some(2),
            ..Default::default()
        };
        assert!(step(&smoker, ProfileStep::Lifestyle).contains("smoking_tools"));

        let non_smoker = FormDraft {
            smoking_status: Some(1),
            ..Default::default()
        };
        assert!(!step(&non_smoker, ProfileStep::Lifestyle).contains("smoking_tools"));
    }

    #[test]
    fn employment_gates_job_fields() {
        let unemployed = FormDraft {
            employment_status: Some(false),
            ..Default::default()
        };
        let result = step(&unemployed, ProfileStep::EducationWork);
        assert!(!result.contains("job_title_id"));
        assert!(!result.contains("position_level_id"));

        let employed = FormDraft {
            employment_status: Some(true),
            ..Default::default()
        };
        let result = step(&employed, ProfileStep::EducationWork);
        assert!(result.contains("job_title_id"));
        assert!(result.contains("position_level_id"));
    }

    #[test]
    fn marriage_budget_required_unless_female() {
        let male = FormDraft {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        assert!(step(&male, ProfileStep::EducationWork).contains("marriage_budget_id"));

        let female = FormDraft {
            gender: Some(Gender::Female),
            ..Default::default()
        };
        assert!(!step(&female, ProfileStep::EducationWork).contains("marriage_budget_id"));
    }

    #[test]
    fn photos_step_has_no_rules() {
        assert!(step(&FormDraft::default(), ProfileStep::Photos).is_valid);
    }

    #[test]
    fn trigger_ignores_fields_outside_subset() {
        let result = ProfileSchema::new().trigger(&FormDraft::default(), &["bio_en"], &EnglishOnly);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field, "bio_en");
    }
}
