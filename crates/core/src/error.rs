#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("hour must be an integer between 0 and 23, got {0}")]
    InvalidHour(i64),

    #[error("Validation failed: {0}")]
    Validation(String),
}
