//! Reward balance table loader.

use std::path::Path;

use quiz_core::BalanceTable;

use crate::loaders::{LoadResult, read_file};

/// Loader for reward balance tables from TOML files.
pub struct BalanceLoader;

impl BalanceLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BalanceTable> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))
    }
}
