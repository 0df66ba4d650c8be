//! Word minigames played with words drawn from the question pool.
//!
//! Each game is a small state machine; rewards for finishing one come from
//! [`RewardCalculator::minigame_reward`](crate::reward::RewardCalculator::minigame_reward).

pub mod deduction;
pub mod ladder;
pub mod matching;
pub mod scramble;
pub mod word_search;

pub use deduction::{GameStatus, GuessResult, LetterDeduction};
pub use ladder::{WordLadder, is_adjacent};
pub use matching::{Definition, DefinitionMatch, MatchResult};
pub use scramble::Scramble;
pub use word_search::{Direction, Placement, WordSearchGrid};
