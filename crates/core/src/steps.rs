//! Profile wizard step definitions.
//!
//! Four steps in fixed order, each owning a fixed set of draft fields. The
//! engine validates only the owned fields of the current step before letting
//! the user move forward.

use serde::{Deserialize, Serialize};

use crate::draft::fields;
use crate::error::CoreError;
use crate::i18n::Message;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four pages of the profile wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStep {
    Personal,
    Lifestyle,
    EducationWork,
    Photos,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 4;

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 4;

/// Immutable description of one step.
#[derive(Debug, Clone, Copy)]
pub struct StepDescriptor {
    pub key: &'static str,
    pub title: Message,
    pub description: Message,
    pub icon: &'static str,
    pub owned_fields: &'static [&'static str],
}

const PERSONAL_FIELDS: &[&str] = &[
    fields::BIO_EN,
    fields::BIO_AR,
    fields::GENDER,
    fields::DATE_OF_BIRTH,
    fields::GUARDIAN_CONTACT,
    fields::HIJAB_STATUS,
];

const LIFESTYLE_FIELDS: &[&str] = &[
    fields::NATIONALITY_ID,
    fields::ORIGIN_ID,
    fields::COUNTRY_OF_RESIDENCE_ID,
    fields::CITY_ID,
    fields::RELIGION_ID,
    fields::RELIGIOSITY_LEVEL_ID,
    fields::MARITAL_STATUS_ID,
    fields::NUMBER_OF_CHILDREN,
    fields::HEIGHT_ID,
    fields::WEIGHT_ID,
    fields::SKIN_COLOR_ID,
    fields::EYE_COLOR_ID,
    fields::HAIR_COLOR_ID,
    fields::SLEEP_HABIT_ID,
    fields::SPORTS_ACTIVITY_ID,
    fields::SOCIAL_MEDIA_PRESENCE_ID,
    fields::DRINKING_STATUS_ID,
    fields::SMOKING_STATUS,
    fields::SMOKING_TOOLS,
    fields::ZODIAC_SIGN_ID,
    fields::HOBBIES,
    fields::PETS,
];

const EDUCATION_WORK_FIELDS: &[&str] = &[
    fields::EDUCATIONAL_LEVEL_ID,
    fields::SPECIALIZATION_ID,
    fields::EMPLOYMENT_STATUS,
    fields::JOB_TITLE_ID,
    fields::POSITION_LEVEL_ID,
    fields::FINANCIAL_STATUS_ID,
    fields::HOUSING_STATUS_ID,
    fields::CAR_OWNERSHIP,
    fields::MARRIAGE_BUDGET_ID,
];

const PHOTOS_FIELDS: &[&str] = &[fields::PROFILE_IMAGE];

/// Step table in wizard order.
pub static STEPS: [StepDescriptor; TOTAL_STEPS as usize] = [
    StepDescriptor {
        key: "personal",
        title: Message::new("profile.steps.personal.title", "Personal Information"),
        description: Message::new(
            "profile.steps.personal.description",
            "Tell us about yourself",
        ),
        icon: "person",
        owned_fields: PERSONAL_FIELDS,
    },
    StepDescriptor {
        key: "lifestyle",
        title: Message::new("profile.steps.lifestyle.title", "Lifestyle"),
        description: Message::new(
            "profile.steps.lifestyle.description",
            "Your background and daily habits",
        ),
        icon: "heart",
        owned_fields: LIFESTYLE_FIELDS,
    },
    StepDescriptor {
        key: "education_work",
        title: Message::new("profile.steps.education_work.title", "Education & Work"),
        description: Message::new(
            "profile.steps.education_work.description",
            "Your studies, career and finances",
        ),
        icon: "briefcase",
        owned_fields: EDUCATION_WORK_FIELDS,
    },
    StepDescriptor {
        key: "photos",
        title: Message::new("profile.steps.photos.title", "Photos"),
        description: Message::new("profile.steps.photos.description", "Add a profile photo"),
        icon: "camera",
        owned_fields: PHOTOS_FIELDS,
    },
];

impl ProfileStep {
    /// Convert a 1-based step number to a `ProfileStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::Personal),
            2 => Ok(Self::Lifestyle),
            3 => Ok(Self::EducationWork),
            4 => Ok(Self::Photos),
            _ => Err(CoreError::InvalidStep {
                step: n,
                min: MIN_STEP,
                max: MAX_STEP,
            }),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Lifestyle => 2,
            Self::EducationWork => 3,
            Self::Photos => 4,
        }
    }

    pub fn descriptor(self) -> &'static StepDescriptor {
        &STEPS[usize::from(self.to_number() - 1)]
    }

    pub fn owned_fields(self) -> &'static [&'static str] {
        self.descriptor().owned_fields
    }

    pub fn is_last(self) -> bool {
        self.to_number() == MAX_STEP
    }

    /// The following step, saturating at the last one.
    pub fn next(self) -> Self {
        Self::from_number(self.to_number() + 1).unwrap_or(self)
    }

    /// The preceding step, saturating at the first one.
    pub fn previous(self) -> Self {
        Self::from_number(self.to_number().saturating_sub(1)).unwrap_or(self)
    }
}

/// Clamp an arbitrary (e.g. persisted) step number into the valid range.
pub fn clamp_step(step: u8) -> ProfileStep {
    ProfileStep::from_number(step.clamp(MIN_STEP, MAX_STEP)).unwrap_or(ProfileStep::Personal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
