//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use quiz_core::{QuizConfig, ScoringMode};

use crate::events::EventBus;

/// Configuration required to assemble a [`QuizApp`](crate::QuizApp).
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Directory holding the persisted `<key>.json` documents.
    pub data_dir: PathBuf,
    /// Optional directory overriding the embedded content files.
    pub content_dir: Option<PathBuf>,
    pub quiz: QuizConfig,
    pub scoring_mode: ScoringMode,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_dir: None,
            quiz: QuizConfig::default(),
            scoring_mode: ScoringMode::default(),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Like [`from_env`](Self::from_env), after loading a `.env` file from
    /// the working directory when one exists.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env"),
        }
        Self::from_env()
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `QUIZ_DATA_DIR`
    /// - `QUIZ_CONTENT_DIR`
    /// - `QUIZ_SESSION_LENGTH`
    /// - `QUIZ_SCORING_MODE` (`standard` or `time-decay`)
    /// - `QUIZ_EVENT_BUFFER`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("QUIZ_DATA_DIR") {
            config.data_dir = dir;
        }

        config.content_dir = read_env::<PathBuf>("QUIZ_CONTENT_DIR");

        if let Some(length) = read_env::<usize>("QUIZ_SESSION_LENGTH") {
            config.quiz.session_length = length.max(1);
        }

        if let Some(mode) = read_env::<ScoringMode>("QUIZ_SCORING_MODE") {
            config.scoring_mode = mode;
        }

        if let Some(capacity) = read_env::<usize>("QUIZ_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config
    }
}

/// Platform data directory, e.g. `~/.local/share/vocab-quest` on Linux.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "vocab-quest")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

/// Platform cache directory for log files.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "vocab-quest")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/vocab-quest/logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
