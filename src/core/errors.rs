use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template '{0}' has no strokes")]
    EmptyTemplate(String),

    #[error("Unknown difficulty tier: {0}")]
    UnknownTier(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> Self {
        err.to_string()
    }
}
