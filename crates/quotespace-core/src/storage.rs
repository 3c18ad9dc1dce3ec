// JSON on top of the string store, shared by the daily cache, favorites and prefs
use quotespace_cache::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::Result;

/// Read and decode `key`
///
/// Anything short of a clean decode - unreadable store, missing key,
/// malformed or foreign JSON - comes back as `None`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            debug!("Store read failed for {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring malformed value at {}: {}", key, e);
            None
        }
    }
}

/// Encode and write `value`; write failures go back to the caller
pub(crate) async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await?;
    Ok(())
}
