//! Error types for gitgutter

use thiserror::Error;

/// Result type alias using gitgutter's Error
pub type Result<T> = std::result::Result<T, Error>;

/// gitgutter error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Repository is required")]
    InvalidRepository,

    /// The root listing could not be fetched; the whole view fails.
    #[error("Failed to load file tree for {repository}: {message}")]
    ListingFailed { repository: String, message: String },

    /// A single directory could not be fetched; recovered on its row.
    #[error("Failed to expand {path}: {message}")]
    ExpandFailed { path: String, message: String },

    /// Raw failure reported by a directory lister.
    #[error("{message}")]
    Listing { path: String, message: String },

    #[error("No such node in tree: {path}")]
    UnknownNode { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Not a file: {path}")]
    NotAFile { path: String },

    #[error("Explorer session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Shorthand for a lister failure on `path`
    pub fn listing(path: &str, message: impl Into<String>) -> Self {
        Error::Listing {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Message suitable for showing next to a tree row or in a placeholder
    pub fn user_message(&self) -> String {
        match self {
            Error::ListingFailed { message, .. } | Error::ExpandFailed { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}
