use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid {kind} value: {value:?}")]
    InvalidValue { kind: &'static str, value: String },
}

/// Convenience type alias for Results with PreferenceError
pub type Result<T> = std::result::Result<T, PreferenceError>;
