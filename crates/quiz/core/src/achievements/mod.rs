//! Achievement definitions and unlock bookkeeping.
//!
//! Every achievement is a threshold on one cumulative counter. Unlocks are
//! one-way: once an id is in the unlocked set it is never removed and never
//! reported again.

use std::collections::BTreeSet;

/// Cumulative counters tracked for achievements.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum StatKey {
    Wins,
    TotalCoins,
    ItemsBought,
    MaxStreak,
    PerfectScores,
    WordsMastered,
    ArenaWins,
    MasterDefeated,
    FastAnswers,
    FastQuizzes,
    MinigamesPlayed,
    UniqueMinigames,
    WordSearchWins,
    ScrambleWins,
    ThemesCompleted,
    NightStudy,
    EarlyStudy,
    WeekendStudy,
    CorrectAnswers,
    Comebacks,
    NoHintQuizzes,
}

/// Counter values, persisted with camelCase keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct AchievementStats {
    pub wins: u64,
    pub total_coins: u64,
    pub items_bought: u64,
    pub max_streak: u64,
    pub perfect_scores: u64,
    pub words_mastered: u64,
    pub arena_wins: u64,
    pub master_defeated: u64,
    pub fast_answers: u64,
    pub fast_quizzes: u64,
    pub minigames_played: u64,
    pub unique_minigames: u64,
    pub word_search_wins: u64,
    pub scramble_wins: u64,
    pub themes_completed: u64,
    pub night_study: u64,
    pub early_study: u64,
    pub weekend_study: u64,
    pub correct_answers: u64,
    pub comebacks: u64,
    pub no_hint_quizzes: u64,
}

impl AchievementStats {
    pub fn get(&self, key: StatKey) -> u64 {
        *self.slot(key)
    }

    pub fn add(&mut self, key: StatKey, amount: u64) {
        let slot = self.slot_mut(key);
        *slot = slot.saturating_add(amount);
    }

    fn slot(&self, key: StatKey) -> &u64 {
        match key {
            StatKey::Wins => &self.wins,
            StatKey::TotalCoins => &self.total_coins,
            StatKey::ItemsBought => &self.items_bought,
            StatKey::MaxStreak => &self.max_streak,
            StatKey::PerfectScores => &self.perfect_scores,
            StatKey::WordsMastered => &self.words_mastered,
            StatKey::ArenaWins => &self.arena_wins,
            StatKey::MasterDefeated => &self.master_defeated,
            StatKey::FastAnswers => &self.fast_answers,
            StatKey::FastQuizzes => &self.fast_quizzes,
            StatKey::MinigamesPlayed => &self.minigames_played,
            StatKey::UniqueMinigames => &self.unique_minigames,
            StatKey::WordSearchWins => &self.word_search_wins,
            StatKey::ScrambleWins => &self.scramble_wins,
            StatKey::ThemesCompleted => &self.themes_completed,
            StatKey::NightStudy => &self.night_study,
            StatKey::EarlyStudy => &self.early_study,
            StatKey::WeekendStudy => &self.weekend_study,
            StatKey::CorrectAnswers => &self.correct_answers,
            StatKey::Comebacks => &self.comebacks,
            StatKey::NoHintQuizzes => &self.no_hint_quizzes,
        }
    }

    fn slot_mut(&mut self, key: StatKey) -> &mut u64 {
        match key {
            StatKey::Wins => &mut self.wins,
            StatKey::TotalCoins => &mut self.total_coins,
            StatKey::ItemsBought => &mut self.items_bought,
            StatKey::MaxStreak => &mut self.max_streak,
            StatKey::PerfectScores => &mut self.perfect_scores,
            StatKey::WordsMastered => &mut self.words_mastered,
            StatKey::ArenaWins => &mut self.arena_wins,
            StatKey::MasterDefeated => &mut self.master_defeated,
            StatKey::FastAnswers => &mut self.fast_answers,
            StatKey::FastQuizzes => &mut self.fast_quizzes,
            StatKey::MinigamesPlayed => &mut self.minigames_played,
            StatKey::UniqueMinigames => &mut self.unique_minigames,
            StatKey::WordSearchWins => &mut self.word_search_wins,
            StatKey::ScrambleWins => &mut self.scramble_wins,
            StatKey::ThemesCompleted => &mut self.themes_completed,
            StatKey::NightStudy => &mut self.night_study,
            StatKey::EarlyStudy => &mut self.early_study,
            StatKey::WeekendStudy => &mut self.weekend_study,
            StatKey::CorrectAnswers => &mut self.correct_answers,
            StatKey::Comebacks => &mut self.comebacks,
            StatKey::NoHintQuizzes => &mut self.no_hint_quizzes,
        }
    }
}

/// Unlock condition: `stat >= at_least`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub stat: StatKey,
    pub at_least: u64,
}

impl Requirement {
    pub fn is_met(&self, stats: &AchievementStats) -> bool {
        stats.get(self.stat) >= self.at_least
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: Requirement,
}

const fn achievement(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    stat: StatKey,
    at_least: u64,
) -> Achievement {
    Achievement {
        id,
        title,
        description,
        icon,
        requirement: Requirement { stat, at_least },
    }
}

pub static ACHIEVEMENTS: &[Achievement] = &[
    achievement("first_win", "First Victory", "Win your first quiz.", "🏆", StatKey::Wins, 1),
    achievement("quiz_master", "Quiz Master", "Win 10 quizzes.", "🎓", StatKey::Wins, 10),
    achievement("quiz_legend", "Quiz Legend", "Win 50 quizzes.", "👑", StatKey::Wins, 50),
    achievement("quiz_god", "Quiz Deity", "Win 100 quizzes.", "⚡", StatKey::Wins, 100),
    achievement("perfect_score", "Perfectionist", "Get 100% on a quiz.", "⭐", StatKey::PerfectScores, 1),
    achievement("perfect_five", "Flawless Five", "Get 5 perfect scores.", "🌟", StatKey::PerfectScores, 5),
    achievement("perfect_ten", "Perfect Ten", "Get 10 perfect scores.", "💫", StatKey::PerfectScores, 10),
    achievement("perfect_master", "Perfection Master", "Get 25 perfect scores.", "✨", StatKey::PerfectScores, 25),
    achievement("rich", "Star Collector", "Earn 1000 total stars.", "⭐", StatKey::TotalCoins, 1000),
    achievement("wealthy", "Star Master", "Earn 5000 total stars.", "🌟", StatKey::TotalCoins, 5000),
    achievement("millionaire", "Star Legend", "Earn 10000 total stars.", "💫", StatKey::TotalCoins, 10000),
    achievement("first_purchase", "First Purchase", "Buy your first item.", "🛒", StatKey::ItemsBought, 1),
    achievement("shopper", "Big Spender", "Buy 5 items from the shop.", "🛍️", StatKey::ItemsBought, 5),
    achievement("collector", "Collector", "Buy 10 items.", "📦", StatKey::ItemsBought, 10),
    achievement("streak_3", "Consistent", "Login for 3 days in a row.", "🔥", StatKey::MaxStreak, 3),
    achievement("streak_week", "Dedicated", "Login for 7 days in a row.", "🔥", StatKey::MaxStreak, 7),
    achievement("streak_month", "Devoted", "Login for 30 days in a row.", "🌋", StatKey::MaxStreak, 30),
    achievement("words_10", "Word Learner", "Master 10 words.", "📖", StatKey::WordsMastered, 10),
    achievement("words_50", "Vocabulary Builder", "Master 50 words.", "📚", StatKey::WordsMastered, 50),
    achievement("words_100", "Word Wizard", "Master 100 words.", "🧙", StatKey::WordsMastered, 100),
    achievement("words_250", "Lexicon Lord", "Master 250 words.", "👨‍🎓", StatKey::WordsMastered, 250),
    achievement("words_500", "Vocabulary Virtuoso", "Master 500 words.", "🎭", StatKey::WordsMastered, 500),
    achievement("words_1000", "Word Sage", "Master 1000 words.", "🦉", StatKey::WordsMastered, 1000),
    achievement("arena_first", "Arena Debut", "Win your first Arena battle.", "⚔️", StatKey::ArenaWins, 1),
    achievement("arena_5", "Arena Fighter", "Win 5 Arena battles.", "🤺", StatKey::ArenaWins, 5),
    achievement("arena_25", "Arena Champion", "Win 25 Arena battles.", "🏟️", StatKey::ArenaWins, 25),
    achievement("arena_master", "Arena Master", "Defeat a Master difficulty CPU.", "👑", StatKey::MasterDefeated, 1),
    achievement("speed_demon", "Speed Demon", "Answer 5 questions in under 3 seconds each.", "⚡", StatKey::FastAnswers, 5),
    achievement("quick_thinker", "Quick Thinker", "Complete a quiz in under 30 seconds.", "🚀", StatKey::FastQuizzes, 1),
    achievement("mini_first", "Game Explorer", "Play your first minigame.", "🎮", StatKey::MinigamesPlayed, 1),
    achievement("mini_variety", "Jack of All Games", "Play all 5 different minigames.", "🎯", StatKey::UniqueMinigames, 5),
    achievement("word_search_pro", "Word Search Pro", "Complete 10 word searches.", "🔍", StatKey::WordSearchWins, 10),
    achievement("scramble_master", "Unscrambler", "Complete 10 word scrambles.", "🔀", StatKey::ScrambleWins, 10),
    achievement("theme_first", "Theme Explorer", "Complete a theme at 100%.", "🗺️", StatKey::ThemesCompleted, 1),
    achievement("theme_5", "Theme Collector", "Complete 5 themes.", "🏅", StatKey::ThemesCompleted, 5),
    achievement("theme_all", "Theme Master", "Complete all themes.", "🌈", StatKey::ThemesCompleted, 10),
    achievement("night_owl", "Night Owl", "Study after 10 PM.", "🦉", StatKey::NightStudy, 1),
    achievement("early_bird", "Early Bird", "Study before 7 AM.", "🐦", StatKey::EarlyStudy, 1),
    achievement("weekend_warrior", "Weekend Warrior", "Study on both Saturday and Sunday.", "📅", StatKey::WeekendStudy, 2),
    achievement("hundred_club", "Century Club", "Answer 100 questions correctly.", "💯", StatKey::CorrectAnswers, 100),
    achievement("thousand_club", "Thousand Club", "Answer 1000 questions correctly.", "🎊", StatKey::CorrectAnswers, 1000),
    achievement("comeback", "Comeback Kid", "Win after getting 3 wrong in a row.", "💪", StatKey::Comebacks, 1),
    achievement("no_hints", "No Help Needed", "Complete 5 quizzes without using hints.", "🧠", StatKey::NoHintQuizzes, 5),
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Counters plus the set of unlocked achievement ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AchievementBook {
    stats: AchievementStats,
    unlocked: BTreeSet<String>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a book from persisted parts without re-checking unlocks.
    pub fn from_parts(stats: AchievementStats, unlocked: BTreeSet<String>) -> Self {
        Self { stats, unlocked }
    }

    pub fn stats(&self) -> &AchievementStats {
        &self.stats
    }

    pub fn unlocked_ids(&self) -> &BTreeSet<String> {
        &self.unlocked
    }

    /// Adds each amount to its counter, then returns the newly unlocked achievements.
    pub fn update_stats(&mut self, updates: &[(StatKey, u64)]) -> Vec<&'static Achievement> {
        for &(key, amount) in updates {
            self.stats.add(key, amount);
        }
        self.check_unlocks()
    }

    /// Like [`update_stats`](Self::update_stats) with string keys; unknown keys are skipped.
    pub fn update_stats_by_name(&mut self, updates: &[(&str, u64)]) -> Vec<&'static Achievement> {
        let known: Vec<(StatKey, u64)> = updates
            .iter()
            .filter_map(|&(name, amount)| match name.parse::<StatKey>() {
                Ok(key) => Some((key, amount)),
                Err(_) => {
                    tracing::debug!(stat = name, "Ignoring unknown achievement stat");
                    None
                }
            })
            .collect();
        self.update_stats(&known)
    }

    /// Unlocks every locked achievement whose requirement now holds.
    pub fn check_unlocks(&mut self) -> Vec<&'static Achievement> {
        let mut newly = Vec::new();
        for achievement in ACHIEVEMENTS {
            if !self.unlocked.contains(achievement.id) && achievement.requirement.is_met(&self.stats)
            {
                self.unlocked.insert(achievement.id.to_owned());
                newly.push(achievement);
            }
        }
        newly
    }

    /// Unlocks `id` directly. Returns `false` if it was already unlocked.
    pub fn unlock(&mut self, id: &str) -> bool {
        self.unlocked.insert(id.to_owned())
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlocked achievements in table order. Ids with no definition are skipped.
    pub fn unlocked(&self) -> Vec<&'static Achievement> {
        ACHIEVEMENTS
            .iter()
            .filter(|a| self.unlocked.contains(a.id))
            .collect()
    }

    pub fn all(&self) -> &'static [Achievement] {
        ACHIEVEMENTS
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    fn ids(list: &[&Achievement]) -> Vec<&'static str> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn table_has_unique_ids() {
        assert_eq!(ACHIEVEMENTS.len(), 43);
        let unique: HashSet<&str> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(unique.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn every_stat_key_round_trips_by_name() {
        for key in StatKey::iter() {
            assert_eq!(key.to_string().parse::<StatKey>().unwrap(), key);
        }
        assert_eq!(StatKey::NoHintQuizzes.as_ref(), "noHintQuizzes");
    }

    #[test]
    fn first_win_unlocks_once() {
        let mut book = AchievementBook::new();
        let newly = book.update_stats(&[(StatKey::Wins, 1)]);
        assert_eq!(ids(&newly), vec!["first_win"]);

        let again = book.update_stats(&[(StatKey::Wins, 1)]);
        assert!(again.is_empty());
        assert_eq!(book.stats().wins, 2);
        assert!(book.is_unlocked("first_win"));
    }

    #[test]
    fn large_update_unlocks_every_tier_reached() {
        let mut book = AchievementBook::new();
        let newly = book.update_stats(&[(StatKey::WordsMastered, 120), (StatKey::ArenaWins, 5)]);
        assert_eq!(
            ids(&newly),
            vec!["words_10", "words_50", "words_100", "arena_first", "arena_5"]
        );
    }

    #[test]
    fn named_updates_skip_unknown_keys() {
        let mut book = AchievementBook::new();
        let newly = book.update_stats_by_name(&[("correctAnswers", 100), ("bogus", 7)]);
        assert_eq!(ids(&newly), vec!["hundred_club"]);
        assert_eq!(book.stats().correct_answers, 100);
    }

    #[test]
    fn manual_unlock_is_one_way() {
        let mut book = AchievementBook::new();
        assert!(book.unlock("night_owl"));
        assert!(!book.unlock("night_owl"));

        // Already unlocked, so reaching the requirement reports nothing.
        assert!(book.update_stats(&[(StatKey::NightStudy, 1)]).is_empty());
        assert_eq!(ids(&book.unlocked()), vec!["night_owl"]);
    }

    #[test]
    fn restored_book_reports_pending_unlocks() {
        let stats = AchievementStats {
            perfect_scores: 5,
            ..Default::default()
        };
        let mut book = AchievementBook::from_parts(stats, BTreeSet::from(["perfect_score".to_string()]));
        assert_eq!(ids(&book.check_unlocks()), vec!["perfect_five"]);
    }
}
