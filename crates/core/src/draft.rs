//! The in-progress profile form ("draft").
//!
//! [`FormDraft`] is the working copy the wizard mutates field by field. Every
//! field starts empty and stays independently nullable until validated. Input
//! is accepted leniently: pickers may hand over ids as numbers or numeric
//! strings, and anything that is not a number deserializes to "no selection".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::OptionId;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Serialized names of every draft field.
pub mod fields {
    pub const BIO_EN: &str = "bio_en";
    pub const BIO_AR: &str = "bio_ar";
    pub const GENDER: &str = "gender";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const GUARDIAN_CONTACT: &str = "guardian_contact";
    pub const HIJAB_STATUS: &str = "hijab_status";

    pub const NATIONALITY_ID: &str = "nationality_id";
    pub const ORIGIN_ID: &str = "origin_id";
    pub const COUNTRY_OF_RESIDENCE_ID: &str = "country_of_residence_id";
    pub const CITY_ID: &str = "city_id";
    pub const RELIGION_ID: &str = "religion_id";
    pub const RELIGIOSITY_LEVEL_ID: &str = "religiosity_level_id";
    pub const MARITAL_STATUS_ID: &str = "marital_status_id";
    pub const NUMBER_OF_CHILDREN: &str = "number_of_children";
    pub const HEIGHT_ID: &str = "height_id";
    pub const WEIGHT_ID: &str = "weight_id";
    pub const SKIN_COLOR_ID: &str = "skin_color_id";
    pub const EYE_COLOR_ID: &str = "eye_color_id";
    pub const HAIR_COLOR_ID: &str = "hair_color_id";
    pub const SLEEP_HABIT_ID: &str = "sleep_habit_id";
    pub const SPORTS_ACTIVITY_ID: &str = "sports_activity_id";
    pub const SOCIAL_MEDIA_PRESENCE_ID: &str = "social_media_presence_id";
    pub const DRINKING_STATUS_ID: &str = "drinking_status_id";
    pub const SMOKING_STATUS: &str = "smoking_status";
    pub const SMOKING_TOOLS: &str = "smoking_tools";
    pub const ZODIAC_SIGN_ID: &str = "zodiac_sign_id";
    pub const HOBBIES: &str = "hobbies";
    pub const PETS: &str = "pets";

    pub const EDUCATIONAL_LEVEL_ID: &str = "educational_level_id";
    pub const SPECIALIZATION_ID: &str = "specialization_id";
    pub const EMPLOYMENT_STATUS: &str = "employment_status";
    pub const JOB_TITLE_ID: &str = "job_title_id";
    pub const POSITION_LEVEL_ID: &str = "position_level_id";
    pub const FINANCIAL_STATUS_ID: &str = "financial_status_id";
    pub const HOUSING_STATUS_ID: &str = "housing_status_id";
    pub const CAR_OWNERSHIP: &str = "car_ownership";
    pub const MARRIAGE_BUDGET_ID: &str = "marriage_budget_id";

    pub const PROFILE_IMAGE: &str = "profile_image";
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Multi-select entry meaning "none of these".
pub const NONE_SENTINEL: &str = "none";

/// One raw entry of a multi-select input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Id(OptionId),
    Text(String),
}

impl Choice {
    /// Integer id of the entry, if it is (or parses as) one.
    pub fn as_id(&self) -> Option<OptionId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_none_sentinel(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().eq_ignore_ascii_case(NONE_SENTINEL))
    }
}

/// Collapse raw multi-select input into integer ids.
///
/// A `"none"` entry anywhere empties the whole selection; entries that are
/// not integers are dropped.
pub fn choice_ids(raw: &[Choice]) -> Vec<OptionId> {
    if raw.iter().any(Choice::is_none_sentinel) {
        return Vec::new();
    }
    raw.iter().filter_map(Choice::as_id).collect()
}

/// Reference to the profile photo, either freshly picked on the device or
/// the avatar URL already stored on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileImage {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ProfileImage {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Whether the image is an avatar already hosted by the server.
    pub fn is_remote(&self) -> bool {
        self.uri.starts_with("http://") || self.uri.starts_with("https://")
    }

    /// Filesystem path of a locally picked image.
    pub fn local_path(&self) -> Option<&str> {
        if self.is_remote() {
            return None;
        }
        Some(self.uri.strip_prefix("file://").unwrap_or(&self.uri))
    }
}

// ---------------------------------------------------------------------------
// FormDraft
// ---------------------------------------------------------------------------

/// Working copy of the profile being completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDraft {
    // -- personal --
    #[serde(deserialize_with = "lenient::text")]
    pub bio_en: String,
    #[serde(deserialize_with = "lenient::text")]
    pub bio_ar: String,
    #[serde(deserialize_with = "lenient::gender")]
    pub gender: Option<Gender>,
    #[serde(deserialize_with = "lenient::date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::text")]
    pub guardian_contact: String,
    #[serde(deserialize_with = "lenient::id")]
    pub hijab_status: Option<i64>,

    // -- lifestyle --
    #[serde(deserialize_with = "lenient::id")]
    pub nationality_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub origin_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub country_of_residence_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub city_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub religion_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub religiosity_level_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub marital_status_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub number_of_children: Option<i64>,
    #[serde(deserialize_with = "lenient::id")]
    pub height_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub weight_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub skin_color_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub eye_color_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub hair_color_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub sleep_habit_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub sports_activity_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub social_media_presence_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub drinking_status_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub smoking_status: Option<i64>,
    #[serde(deserialize_with = "lenient::choices")]
    pub smoking_tools: Vec<Choice>,
    #[serde(deserialize_with = "lenient::id")]
    pub zodiac_sign_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::choices")]
    pub hobbies: Vec<Choice>,
    #[serde(deserialize_with = "lenient::choices")]
    pub pets: Vec<Choice>,

    // -- education & work --
    #[serde(deserialize_with = "lenient::id")]
    pub educational_level_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub specialization_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::flag")]
    pub employment_status: Option<bool>,
    #[serde(deserialize_with = "lenient::id")]
    pub job_title_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub position_level_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub financial_status_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::id")]
    pub housing_status_id: Option<OptionId>,
    #[serde(deserialize_with = "lenient::flag")]
    pub car_ownership: Option<bool>,
    #[serde(deserialize_with = "lenient::id")]
    pub marriage_budget_id: Option<OptionId>,

    // -- photos --
    pub profile_image: Option<ProfileImage>,
}

impl FormDraft {
    /// JSON object view of the draft, keyed by field name.
    ///
    /// This is the shape the validation interpreter evaluates rules against.
    pub fn to_field_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Names of every field, sorted.
    pub fn field_names() -> Vec<String> {
        Self::default().to_field_map().keys().cloned().collect()
    }

    /// Overwrite a single field addressed by its serialized name.
    ///
    /// The value goes through the same lenient parsing as persisted drafts,
    /// so a picker can hand over `"12"` for an id field.
    pub fn set_value(&mut self, field: &str, value: Value) -> Result<(), CoreError> {
        let mut map = self.to_field_map();
        if !map.contains_key(field) {
            return Err(CoreError::UnknownField(field.to_string()));
        }
        map.insert(field.to_string(), value);

        *self = serde_json::from_value(Value::Object(map))
            .map_err(|e| CoreError::Validation(format!("Invalid value for '{field}': {e}")))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

mod lenient {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Choice, Gender};

    fn raw<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.unwrap_or(Value::Null))
    }

    pub(super) fn id_from_value(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(id_from_value(&raw(d)?))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match raw(d)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected a string, got {other}"
            ))),
        }
    }

    pub fn gender<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Gender>, D::Error> {
        Ok(raw(d)?.as_str().and_then(Gender::parse))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match raw(d)? {
            Value::Bool(b) => Some(b),
            Value::String(s) if s == "true" => Some(true),
            Value::String(s) if s == "false" => Some(false),
            _ => None,
        })
    }

    /// Accepts `YYYY-MM-DD` as well as full RFC 3339 timestamps written by
    /// older clients; the calendar date of the timestamp is kept.
    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let value = raw(d)?;
        let Some(s) = value.as_str() else {
            return Ok(None);
        };
        let s = s.trim();
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())))
    }

    pub fn choices<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Choice>, D::Error> {
        let entries = match raw(d)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(Choice::Text(s)),
                other => id_from_value(&other).map(Choice::Id),
            })
            .collect())
    }
}
