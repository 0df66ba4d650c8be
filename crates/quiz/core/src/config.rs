/// Quiz configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuizConfig {
    /// Number of questions drawn for a new game.
    pub session_length: usize,
    /// Response-time budget for time-decay scoring, in milliseconds.
    pub time_budget_ms: u64,
}

impl QuizConfig {
    // ===== scoring constants =====
    /// Points for a correct answer in standard mode, and the floor in time-decay mode.
    pub const POINTS_PER_CORRECT: u32 = 10;
    /// XP bonus per streak step added on every correct answer.
    pub const STREAK_XP_FACTOR: u32 = 2;

    // ===== progression constants =====
    pub const MIN_LEITNER_BOX: u8 = 1;
    pub const MAX_LEITNER_BOX: u8 = 5;
    /// Box a word jumps to when a revision drill is answered correctly.
    pub const REVISION_PROMOTION_BOX: u8 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SESSION_LENGTH: usize = 10;
    pub const DEFAULT_TIME_BUDGET_MS: u64 = 10_000;

    pub fn new() -> Self {
        Self {
            session_length: Self::DEFAULT_SESSION_LENGTH,
            time_budget_ms: Self::DEFAULT_TIME_BUDGET_MS,
        }
    }

    pub fn with_session_length(session_length: usize) -> Self {
        Self {
            session_length,
            ..Self::new()
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::new()
    }
}
