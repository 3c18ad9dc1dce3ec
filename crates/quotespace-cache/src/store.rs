use thiserror::Error;

/// Errors the underlying storage can raise
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock was poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Opaque string-keyed storage
///
/// Values are plain UTF-8 text; callers decide how to encode them.
/// Each individual `get`/`set` is atomic, but nothing here groups several
/// operations together - a read followed by a write can interleave with
/// another caller's read and write.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a value, replacing whatever was there
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}
