//! Repository layer for persisted player state.
//!
//! Everything that changes while playing (wallet, profile, achievements,
//! review boxes, answer log) is stored as JSON documents in a [`Store`].
//! Static content (questions, shop, reward tables) comes from `quiz-content`.

mod error;
mod file;
mod json;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStore;
pub use json::{load_json, load_or_default, save_json};
pub use memory::InMemoryStore;
pub use traits::Store;
