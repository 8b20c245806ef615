use thiserror::Error;

/// Sensitive word filter error types.
///
/// Structural edits and queries on a filter never fail; errors only come from
/// the vocabulary store, its event feeds and configuration parsing.
#[derive(Error, Debug)]
pub enum SensitiveError {
    #[error("Vocabulary feed is full, event dropped for word: {word}")]
    FeedFull { word: String },

    #[error("Vocabulary feed is closed")]
    FeedClosed,

    #[error("Vocabulary feeds have already been taken")]
    FeedsTaken,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SensitiveError>;
