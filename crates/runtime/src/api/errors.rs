//! Error type surfaced by the runtime API.
//!
//! Only assembling an app can fail: opening the data directory or reading
//! content. Once running, persistence failures are logged and absorbed by the
//! services.
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to load quiz content: {0}")]
    Content(String),

    #[error("question bank is empty")]
    EmptyQuestionBank,
}
