use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid week id: {0}")]
    InvalidWeekId(String),

    #[error("calendar error: {0}")]
    Calendar(#[from] jiff::Error),
}
