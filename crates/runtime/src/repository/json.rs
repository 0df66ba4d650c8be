//! Typed JSON documents on top of a [`Store`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{RepositoryError, Result, Store};

/// Reads and parses the document under `key`.
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| RepositoryError::CorruptedData {
            key: key.to_owned(),
            reason: e.to_string(),
        })
}

/// Loads `key`, falling back to `T::default()` when the document is missing
/// or unreadable.
pub fn load_or_default<T: DeserializeOwned + Default>(store: &dyn Store, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "Discarding stored state, using defaults");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
