//! Content loaders for reading quiz data from files.

pub mod balance;
pub mod events;
pub mod factory;
pub mod questions;
pub mod shop;

pub use balance::BalanceLoader;
pub use events::{EventLoader, RawSeasonalEvent};
pub use factory::{ContentBundle, ContentFactory};
pub use questions::{QuestionLoader, RawQuestion};
pub use shop::ShopLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
