/// Selection ids coming from the profile lookup tables.
pub type OptionId = i64;

/// Opaque identifier of the signed-in user.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
