//! Prepared answers applied to a draft before walking the steps.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::EngineError;

/// Read a JSON object mapping draft field names to values.
pub async fn load_answers(path: impl AsRef<Path>) -> Result<Map<String, Value>, EngineError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| EngineError::AnswersRead {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| EngineError::AnswersParse {
        path: path.to_path_buf(),
        source,
    })
}
