use std::path::PathBuf;

use kismet_api::ApiError;
use kismet_core::CoreError;

/// Errors surfaced by the wizard engine and its configuration.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image format (expected JPEG, PNG or WebP)")]
    UnsupportedImage,

    #[error("Image is {size} bytes, limit is {limit}")]
    ImageTooLarge { size: u64, limit: u64 },

    #[error("Failed to read answers {path}: {source}")]
    AnswersRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Answers in {path} are not a JSON object: {source}")]
    AnswersParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Operation not allowed while {0}")]
    WrongPhase(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
