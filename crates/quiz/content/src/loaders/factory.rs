//! Content factory for loading quiz content from a data directory.

use std::path::{Path, PathBuf};

use quiz_core::{BalanceTable, EventCalendar, Question, ShopCatalog};

use crate::builtin;
use crate::loaders::{BalanceLoader, EventLoader, LoadResult, QuestionLoader, ShopLoader};

/// Everything the runtime needs to start a game.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub questions: Vec<Question>,
    pub balance: BalanceTable,
    pub shop: ShopCatalog,
    pub events: EventCalendar,
}

impl ContentBundle {
    /// The embedded default content.
    pub fn builtin() -> LoadResult<Self> {
        Ok(Self {
            questions: builtin::questions()?,
            balance: builtin::balance()?,
            shop: builtin::shop()?,
            events: builtin::events()?,
        })
    }
}

/// Content factory that loads quiz content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── questions.json
/// ├── balance.toml
/// ├── shop.ron
/// └── events.toml
/// ```
///
/// Files missing from the directory fall back to the embedded defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the question bank from `questions.json`.
    pub fn load_questions(&self) -> LoadResult<Vec<Question>> {
        let path = self.data_dir.join("questions.json");
        if !path.exists() {
            return builtin::questions();
        }
        QuestionLoader::load(&path)
    }

    /// Load reward tables from `balance.toml`.
    pub fn load_balance(&self) -> LoadResult<BalanceTable> {
        let path = self.data_dir.join("balance.toml");
        if !path.exists() {
            return builtin::balance();
        }
        BalanceLoader::load(&path)
    }

    /// Load the shop catalog from `shop.ron`.
    pub fn load_shop(&self) -> LoadResult<ShopCatalog> {
        let path = self.data_dir.join("shop.ron");
        if !path.exists() {
            return builtin::shop();
        }
        ShopLoader::load(&path)
    }

    /// Load the seasonal event calendar from `events.toml`.
    pub fn load_events(&self) -> LoadResult<EventCalendar> {
        let path = self.data_dir.join("events.toml");
        if !path.exists() {
            return builtin::events();
        }
        EventLoader::load(&path)
    }

    pub fn load_all(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            questions: self.load_questions()?,
            balance: self.load_balance()?,
            shop: self.load_shop()?,
            events: self.load_events()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
