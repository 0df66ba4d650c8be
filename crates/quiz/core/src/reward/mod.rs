//! Star and XP rewards.
//!
//! Every function here is pure over a [`BalanceTable`]. Unknown activity,
//! minigame or tier names never fail: they log a warning and award nothing
//! (tiers fall back to a default win reward).

use std::collections::BTreeMap;

/// Stars and XP granted together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Reward {
    pub stars: u32,
    pub xp: u32,
}

impl Reward {
    pub const fn new(stars: u32, xp: u32) -> Self {
        Self { stars, xp }
    }
}

/// Per-answer rewards for a quiz activity.
///
/// Only one of the fields is normally set; the first non-zero one in
/// declaration order is used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActivityReward {
    pub base_stars: u32,
    pub stars_per_blank: u32,
    pub stars_per_question: u32,
    pub stars_per_word: u32,
}

impl ActivityReward {
    pub fn stars(&self) -> u32 {
        [
            self.base_stars,
            self.stars_per_blank,
            self.stars_per_question,
            self.stars_per_word,
        ]
        .into_iter()
        .find(|&s| s != 0)
        .unwrap_or(0)
    }
}

/// Completion rewards for a minigame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MinigameReward {
    #[cfg_attr(feature = "serde", serde(alias = "stars"))]
    pub base_stars: u32,
    pub stars_per_correct: u32,
    pub stars_per_word: u32,
    pub max_bonus: u32,
    pub xp: u32,
}

impl MinigameReward {
    pub fn per_correct(&self) -> u32 {
        if self.stars_per_correct != 0 {
            self.stars_per_correct
        } else {
            self.stars_per_word
        }
    }
}

/// Arena rewards by outcome; wins are keyed by opponent tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaRewards {
    pub win_vs: BTreeMap<String, Reward>,
    pub loss: Reward,
    pub draw: Reward,
}

/// Reward tables, normally loaded from content data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTable {
    pub activities: BTreeMap<String, ActivityReward>,
    pub minigames: BTreeMap<String, MinigameReward>,
    pub arena: ArenaRewards,
}

/// Outcome of an arena duel.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArenaResult {
    Win,
    Loss,
    Draw,
}

/// Minigames with reward entries in the shipped balance table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MinigameKind {
    WordSearch,
    WordScramble,
    LetterDeduction,
    WordLadder,
    DefinitionMatch,
}

/// Reward granted for a win against a tier missing from the table.
pub const DEFAULT_WIN_REWARD: Reward = Reward::new(50, 100);

/// `1.0` for absent or sub-1 difficulty, then +0.1 per level above 1.
pub fn difficulty_multiplier(difficulty: Option<u8>) -> f64 {
    match difficulty {
        Some(d) if d >= 1 => 1.0 + f64::from(d - 1) / 10.0,
        _ => 1.0,
    }
}

pub fn stars_to_xp(stars: u32) -> u32 {
    stars * 2
}

/// XP-only reward for a session that earned no stars.
pub fn consolation_reward() -> Reward {
    Reward::new(0, 20)
}

/// Computes rewards from a balance table.
#[derive(Clone, Debug, Default)]
pub struct RewardCalculator {
    table: BalanceTable,
}

impl RewardCalculator {
    pub fn new(table: BalanceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &BalanceTable {
        &self.table
    }

    /// Stars for one answer of `activity`; zero when incorrect.
    pub fn quiz_reward(&self, activity: &str, difficulty: Option<u8>, is_correct: bool) -> u32 {
        if !is_correct {
            return 0;
        }

        let Some(entry) = self.table.activities.get(activity) else {
            tracing::warn!(activity, "Unknown activity type");
            return 0;
        };

        (f64::from(entry.stars()) * difficulty_multiplier(difficulty)).round() as u32
    }

    /// Base stars plus a capped per-correct bonus, and the flat XP of the game.
    pub fn minigame_reward(&self, game: &str, correct: u32, _total: u32) -> Reward {
        let Some(entry) = self.table.minigames.get(game) else {
            tracing::warn!(game, "Unknown minigame");
            return Reward::default();
        };

        let bonus = correct.saturating_mul(entry.per_correct()).min(entry.max_bonus);
        Reward::new(entry.base_stars + bonus, entry.xp)
    }

    pub fn arena_reward(&self, result: ArenaResult, tier: &str) -> Reward {
        match result {
            ArenaResult::Loss => self.table.arena.loss,
            ArenaResult::Draw => self.table.arena.draw,
            ArenaResult::Win => match self.table.arena.win_vs.get(tier) {
                Some(reward) => *reward,
                None => {
                    tracing::warn!(tier, "Unknown arena tier, using default win reward");
                    DEFAULT_WIN_REWARD
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> RewardCalculator {
        let mut table = BalanceTable::default();
        table.activities.insert(
            "vocabMCQ".into(),
            ActivityReward {
                base_stars: 5,
                ..Default::default()
            },
        );
        table.activities.insert(
            "vocabCloze".into(),
            ActivityReward {
                stars_per_blank: 4,
                ..Default::default()
            },
        );
        table.activities.insert("empty".into(), ActivityReward::default());
        table.minigames.insert(
            "wordSearch".into(),
            MinigameReward {
                base_stars: 10,
                stars_per_correct: 2,
                max_bonus: 8,
                xp: 30,
                ..Default::default()
            },
        );
        table.minigames.insert(
            "wordScramble".into(),
            MinigameReward {
                base_stars: 5,
                stars_per_word: 3,
                max_bonus: 20,
                xp: 25,
                ..Default::default()
            },
        );
        table.arena.win_vs.insert("hard".into(), Reward::new(80, 160));
        table.arena.loss = Reward::new(5, 15);
        table.arena.draw = Reward::new(15, 30);
        RewardCalculator::new(table)
    }

    #[test]
    fn multiplier_is_one_below_first_level() {
        assert_eq!(difficulty_multiplier(None), 1.0);
        assert_eq!(difficulty_multiplier(Some(0)), 1.0);
        assert_eq!(difficulty_multiplier(Some(1)), 1.0);
        assert!((difficulty_multiplier(Some(10)) - 1.9).abs() < 1e-9);
    }

    #[test]
    fn multiplier_is_non_decreasing() {
        let values: Vec<f64> = (1..=20).map(|d| difficulty_multiplier(Some(d))).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn quiz_reward_scales_with_difficulty() {
        let calc = calculator();
        assert_eq!(calc.quiz_reward("vocabMCQ", Some(1), true), 5);
        // 5 * 1.5 = 7.5 rounds up
        assert_eq!(calc.quiz_reward("vocabMCQ", Some(6), true), 8);
        assert_eq!(calc.quiz_reward("vocabCloze", Some(10), true), 8);
        assert_eq!(calc.quiz_reward("empty", Some(5), true), 0);
    }

    #[test]
    fn quiz_reward_is_zero_when_incorrect_or_unknown() {
        let calc = calculator();
        for d in [None, Some(1), Some(5), Some(10)] {
            assert_eq!(calc.quiz_reward("vocabMCQ", d, false), 0);
        }
        assert_eq!(calc.quiz_reward("poetry", Some(3), true), 0);
    }

    #[test]
    fn word_search_bonus_is_capped() {
        let calc = calculator();
        assert_eq!(calc.minigame_reward("wordSearch", 5, 5), Reward::new(18, 30));
        assert_eq!(calc.minigame_reward("wordSearch", 2, 5), Reward::new(14, 30));
        assert_eq!(calc.minigame_reward("wordSearch", 0, 5), Reward::new(10, 30));
    }

    #[test]
    fn minigame_per_word_is_used_when_per_correct_absent() {
        let calc = calculator();
        assert_eq!(calc.minigame_reward("wordScramble", 4, 4), Reward::new(17, 25));
        assert_eq!(calc.minigame_reward("chess", 4, 4), Reward::default());
    }

    #[test]
    fn arena_rewards_by_outcome() {
        let calc = calculator();
        assert_eq!(calc.arena_reward(ArenaResult::Win, "hard"), Reward::new(80, 160));
        assert_eq!(calc.arena_reward(ArenaResult::Win, "legend"), DEFAULT_WIN_REWARD);
        assert_eq!(calc.arena_reward(ArenaResult::Loss, "hard"), Reward::new(5, 15));
        assert_eq!(calc.arena_reward(ArenaResult::Draw, "easy"), Reward::new(15, 30));
    }

    #[test]
    fn helpers() {
        assert_eq!(stars_to_xp(12), 24);
        assert_eq!(consolation_reward(), Reward::new(0, 20));
        assert_eq!("win".parse::<ArenaResult>().unwrap(), ArenaResult::Win);
        assert_eq!(MinigameKind::WordSearch.as_ref(), "wordSearch");
        assert_eq!("letterDeduction".parse::<MinigameKind>().unwrap(), MinigameKind::LetterDeduction);
    }
}
