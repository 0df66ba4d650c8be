//! Pure rules of the vocabulary quiz.
//!
//! `quiz-core` holds the question model, the session state machine, reward
//! tables, the economy, achievements, spaced repetition, seasonal events and
//! the word minigames. Nothing here performs I/O; `quiz-content` loads data
//! into these types and `quiz-runtime` persists them and wires them together.
pub mod achievements;
pub mod cloze;
pub mod config;
pub mod economy;
pub mod error;
pub mod minigames;
pub mod progress;
pub mod question;
pub mod reward;
pub mod season;
pub mod session;

pub use achievements::{ACHIEVEMENTS, Achievement, AchievementBook, AchievementStats, StatKey};
pub use cloze::ClozeGenerator;
pub use config::QuizConfig;
pub use economy::{
    ArenaStats, EconomyState, ItemKind, Layer, LayerPosition, LevelUp, PurchaseError,
    ShopCatalog, ShopItem,
};
pub use error::{ErrorSeverity, QuizError};
pub use progress::{LeitnerProgress, ProgressEntry};
pub use question::{
    AnswerOptions, DifficultyFilter, Question, QuestionBank, QuestionError, QuestionId,
    QuestionKind, ThemeFilter,
};
pub use reward::{
    ArenaResult, BalanceTable, MinigameKind, Reward, RewardCalculator, consolation_reward,
    difficulty_multiplier, stars_to_xp,
};
pub use season::{EventCalendar, SeasonalEvent};
pub use session::{
    AnswerOutcome, Clock, HistoryEntry, ManualClock, ScoringMode, SessionManager, SessionState,
    SystemClock,
};
