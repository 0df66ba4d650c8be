//! Storage contract for persisted player state.

use super::Result;

/// Key-value store holding one JSON document per key.
///
/// Services own the document shape; the store only moves strings. Keys are
/// plain identifiers such as `vocab_quest_economy`.
pub trait Store: Send + Sync {
    /// Returns the stored document, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
