#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid step {step}. Must be between {min} and {max}")]
    InvalidStep { step: u8, min: u8, max: u8 },
}
