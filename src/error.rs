use thiserror::Error;

pub type Result<T> = std::result::Result<T, KardoError>;

#[derive(Debug, Error)]
pub enum KardoError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Security token missing; refresh the page and try again")]
    MissingCsrfToken,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid tag color '{0}' (expected hex, e.g. #RRGGBB)")]
    InvalidTagColor(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for KardoError {
    fn from(err: reqwest::Error) -> Self {
        KardoError::Transport(err.to_string())
    }
}
