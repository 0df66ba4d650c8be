//! Shop catalog loader.

use std::path::Path;

use quiz_core::{ShopCatalog, ShopItem};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Shop catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopFile {
    pub items: Vec<ShopItem>,
}

/// Loader for the shop catalog from RON files.
pub struct ShopLoader;

impl ShopLoader {
    pub fn load(path: &Path) -> LoadResult<ShopCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ShopCatalog> {
        let file: ShopFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse shop catalog RON: {}", e))?;

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = file.items.iter().find(|item| !seen.insert(item.id.as_str())) {
            anyhow::bail!("Duplicate shop item id: {}", dup.id);
        }

        Ok(ShopCatalog::new(file.items))
    }
}
