use quotespace_cache::StoreError;
use thiserror::Error;

/// All the ways things can go wrong in quotespace
///
/// Note what's missing: failed or garbled *reads* never show up here. A
/// store we can't read is treated as an empty one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to fetch quote: {0}")]
    FetchError(String),

    #[error("Storage write failed: {0}")]
    StorageError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Quote not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
