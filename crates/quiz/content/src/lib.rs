//! Data-driven quiz content and loaders.
//!
//! This crate turns data files into `quiz-core` types:
//! - Question bank (JSON, the format produced by the question authoring scripts)
//! - Reward balance tables (TOML)
//! - Shop catalog (RON)
//! - Seasonal event calendar (TOML)
//!
//! Default copies of every file are embedded at compile time so the game can
//! start without a content directory.

#[cfg(feature = "loaders")]
pub mod builtin;
#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceLoader, ContentBundle, ContentFactory, EventLoader, LoadResult, QuestionLoader,
    RawQuestion, RawSeasonalEvent, ShopLoader,
};
