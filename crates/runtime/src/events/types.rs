//! Event types for different topics.

use quiz_core::{AnswerOutcome, EconomyState, QuestionId, SessionState};
use serde::{Deserialize, Serialize};

/// Quiz session lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new question list was loaded.
    Started { question_count: usize },

    /// An answer was judged and recorded.
    Answered {
        question_id: QuestionId,
        outcome: AnswerOutcome,
        state: SessionState,
    },

    /// The last question was answered.
    Finished { state: SessionState },
}

/// Wallet and inventory changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EconomyEvent {
    /// Published after every persisted mutation with the new state.
    Changed(Box<EconomyState>),

    LeveledUp { level: u32, bonus_coins: u64 },

    Purchased { item_id: String, cost: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AchievementEvent {
    /// Reported once per achievement, the first time it unlocks.
    Unlocked { id: String, title: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileEvent {
    Updated { display_name: String, avatar: String },
}
