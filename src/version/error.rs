use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("App identifier is required")]
    MissingAppIdentifier,

    #[error("Invalid config file: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connectivity, timeout or an unexpected HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed payload or missing fields
    #[error("Invalid response: {0}")]
    Format(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Format(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
