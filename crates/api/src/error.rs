use indexmap::IndexMap;
use serde::Deserialize;

/// Errors from the profile API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server rejected the submitted data (HTTP 422).
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        /// Messages per field, in the order the server listed them.
        field_errors: IndexMap<String, Vec<String>>,
    },

    /// Any other non-2xx response.
    #[error("Profile API error ({status}): {body}")]
    Status {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ApiError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Every field message, one per line, in server order.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            Self::Validation { field_errors, .. } => {
                field_errors.values().flatten().cloned().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Build the error for a 422 response body.
    ///
    /// Expects `{"message": "...", "errors": {"field": ["msg", ...]}}`; a
    /// single string is accepted in place of a message list. A body that is
    /// not JSON is reported as [`ApiError::Status`].
    pub fn from_unprocessable(body: String) -> Self {
        match serde_json::from_str::<ValidationBody>(&body) {
            Ok(parsed) => Self::Validation {
                message: parsed.message.unwrap_or_else(|| "The given data was invalid.".into()),
                field_errors: parsed
                    .errors
                    .into_iter()
                    .map(|(field, messages)| (field, messages.into_vec()))
                    .collect(),
            },
            Err(_) => Self::Status { status: 422, body },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: IndexMap<String, Messages>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Messages {
    One(String),
    Many(Vec<String>),
}

impl Messages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(message) => vec![message],
            Self::Many(messages) => messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_field_errors_in_order() {
        let body = r#"{
            "message": "The given data was invalid.",
            "errors": {
                "guardian_contact": ["The guardian contact has already been taken."],
                "city_id": ["The selected city is invalid.", "City is required."]
            }
        }"#;
        let err = ApiError::from_unprocessable(body.into());
        assert!(err.is_validation());
        assert_eq!(
            err.field_messages(),
            [
                "The guardian contact has already been taken.",
                "The selected city is invalid.",
                "City is required.",
            ]
        );
    }

    #[test]
    fn accepts_single_string_messages() {
        let err = ApiError::from_unprocessable(r#"{"errors":{"bio_en":"Too short"}}"#.into());
        assert_matches!(&err, ApiError::Validation { message, .. } if message == "The given data was invalid.");
        assert_eq!(err.field_messages(), ["Too short"]);
    }

    #[test]
    fn message_only_body_has_no_field_messages() {
        let err = ApiError::from_unprocessable(r#"{"message":"Profile locked"}"#.into());
        assert!(err.is_validation());
        assert!(err.field_messages().is_empty());
    }

    #[test]
    fn non_json_body_is_a_status_error() {
        let err = ApiError::from_unprocessable("<html>".into());
        assert_matches!(err, ApiError::Status { status: 422, .. });
    }
}
