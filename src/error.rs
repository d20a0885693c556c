use thiserror::Error;

use crate::types::EventId;

#[derive(Error, Debug)]
pub enum BoardError {
    /// The initial event list could not be fetched or partitioned
    #[error("failed to load events: {0}")]
    LoadFailure(String),

    /// A status update failed after an optimistic move; the move was rolled back
    #[error("failed to move event '{event_id}': {reason}")]
    MoveCommitFailure { event_id: EventId, reason: String },

    #[error("event '{0}' not found")]
    EventNotFound(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
