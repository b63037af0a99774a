//! Submission payload normalization.
//!
//! Projects a [`FormDraft`] onto the shape the profile endpoint expects. The
//! projection is pure and deterministic: the same draft always serializes to
//! the same bytes.

use serde::{Deserialize, Serialize};

use crate::draft::{choice_ids, FormDraft, Gender};
use crate::types::OptionId;

/// How an id of `0` is treated when normalizing.
///
/// The profile backend has historically received `null` for a zero id,
/// because the mobile client coerced ids with `Number(value) || null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroIdPolicy {
    #[default]
    CollapseToNull,
    Keep,
}

impl ZeroIdPolicy {
    fn apply(self, id: Option<OptionId>) -> Option<OptionId> {
        match (self, id) {
            (Self::CollapseToNull, Some(0)) => None,
            (_, id) => id,
        }
    }
}

/// Server-shaped projection of a completed draft.
///
/// `None` on the conditional groups means "not sent at all"; every other
/// `Option` is sent as `null` when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub bio_en: String,
    pub bio_ar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub date_of_birth: Option<String>,
    pub guardian_contact: String,

    pub nationality_id: Option<OptionId>,
    pub origin_id: Option<OptionId>,
    pub country_of_residence_id: Option<OptionId>,
    pub city_id: Option<OptionId>,
    pub religion_id: Option<OptionId>,
    pub religiosity_level_id: Option<OptionId>,
    pub marital_status_id: Option<OptionId>,
    pub number_of_children: Option<i64>,
    pub height_id: Option<OptionId>,
    pub weight_id: Option<OptionId>,
    pub skin_color_id: Option<OptionId>,
    pub eye_color_id: Option<OptionId>,
    pub hair_color_id: Option<OptionId>,
    pub sleep_habit_id: Option<OptionId>,
    pub sports_activity_id: Option<OptionId>,
    pub social_media_presence_id: Option<OptionId>,
    pub drinking_status_id: Option<OptionId>,
    pub smoking_status: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking_tools: Option<Vec<OptionId>>,
    pub zodiac_sign_id: Option<OptionId>,
    pub hobbies: Vec<OptionId>,
    pub pets: Vec<OptionId>,

    pub educational_level_id: Option<OptionId>,
    pub specialization_id: Option<OptionId>,
    pub employment_status: bool,
    pub job_title_id: Option<OptionId>,
    pub position_level_id: Option<OptionId>,
    pub financial_status_id: Option<OptionId>,
    pub housing_status_id: Option<OptionId>,
    pub car_ownership: bool,
    pub marriage_budget_id: Option<OptionId>,

    /// Present only for female profiles; inner `None` is sent as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hijab_status: Option<Option<i64>>,
}

/// Smoking status as the API encodes it: `1` (non-smoker in the picker)
/// becomes `0`, every other answer becomes `1`.
pub fn encode_smoking_status(status: Option<i64>) -> i64 {
    if status == Some(1) {
        0
    } else {
        1
    }
}

impl SubmissionPayload {
    pub fn from_draft(draft: &FormDraft, policy: ZeroIdPolicy) -> Self {
        let id = |value: Option<OptionId>| policy.apply(value);
        let employed = draft.employment_status == Some(true);
        let smoker = draft.smoking_status.is_some_and(|s| s > 1);
        let female = draft.gender == Some(Gender::Female);

        Self {
            bio_en: draft.bio_en.clone(),
            bio_ar: draft.bio_ar.clone(),
            gender: draft.gender,
            date_of_birth: draft
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string()),
            guardian_contact: draft.guardian_contact.clone(),

            nationality_id: id(draft.nationality_id),
            origin_id: id(draft.origin_id),
            country_of_residence_id: id(draft.country_of_residence_id),
            city_id: id(draft.city_id),
            religion_id: id(draft.religion_id),
            religiosity_level_id: id(draft.religiosity_level_id),
            marital_status_id: id(draft.marital_status_id),
            number_of_children: id(draft.number_of_children),
            height_id: id(draft.height_id),
            weight_id: id(draft.weight_id),
            skin_color_id: id(draft.skin_color_id),
            eye_color_id: id(draft.eye_color_id),
            hair_color_id: id(draft.hair_color_id),
            sleep_habit_id: id(draft.sleep_habit_id),
            sports_activity_id: id(draft.sports_activity_id),
            social_media_presence_id: id(draft.social_media_presence_id),
            drinking_status_id: id(draft.drinking_status_id),
            smoking_status: encode_smoking_status(draft.smoking_status),
            smoking_tools: smoker.then(|| choice_ids(&draft.smoking_tools)),
            zodiac_sign_id: id(draft.zodiac_sign_id),
            hobbies: choice_ids(&draft.hobbies),
            pets: choice_ids(&draft.pets),

            educational_level_id: id(draft.educational_level_id),
            specialization_id: id(draft.specialization_id),
            employment_status: employed,
            job_title_id: if employed { id(draft.job_title_id) } else { None },
            position_level_id: if employed {
                id(draft.position_level_id)
            } else {
                None
            },
            financial_status_id: id(draft.financial_status_id),
            housing_status_id: id(draft.housing_status_id),
            car_ownership: draft.car_ownership == Some(true),
            marriage_budget_id: id(draft.marriage_budget_id),

            hijab_status: female.then_some(draft.hijab_status),
        }
    }

    /// Serialized request body.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
