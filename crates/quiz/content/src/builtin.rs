//! Content embedded at compile time.

use quiz_core::{BalanceTable, EventCalendar, Question, ShopCatalog};

use crate::loaders::{BalanceLoader, EventLoader, LoadResult, QuestionLoader, ShopLoader};

pub const QUESTIONS_JSON: &str = include_str!("../data/questions.json");
pub const BALANCE_TOML: &str = include_str!("../data/balance.toml");
pub const SHOP_RON: &str = include_str!("../data/shop.ron");
pub const EVENTS_TOML: &str = include_str!("../data/events.toml");

pub fn questions() -> LoadResult<Vec<Question>> {
    QuestionLoader::parse(QUESTIONS_JSON)
}

pub fn balance() -> LoadResult<BalanceTable> {
    BalanceLoader::parse(BALANCE_TOML)
}

pub fn shop() -> LoadResult<ShopCatalog> {
    ShopLoader::parse(SHOP_RON)
}

pub fn events() -> LoadResult<EventCalendar> {
    EventLoader::parse(EVENTS_TOML)
}
