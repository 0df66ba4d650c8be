//! Application composition root.
//!
//! [`QuizApp`] is built once per run and owns every stateful service; hosts
//! hold on to it instead of reaching for globals.

use std::sync::Arc;

use tokio::sync::broadcast;

use quiz_content::{ContentBundle, ContentFactory};
use quiz_core::{
    Achievement, ArenaResult, Clock, LevelUp, MinigameKind, PurchaseError, QuestionBank,
    RewardCalculator, ShopItem, StatKey,
};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::engine::QuizEngine;
use crate::events::{Event, EventBus, Topic};
use crate::repository::{FileStore, Store};
use crate::services::{Achievements, Economy, UserProfile};

/// Arena tier whose defeat counts toward the master achievements.
const MASTER_TIER: &str = "master";

/// What a finished activity paid out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settlement {
    pub coins: u64,
    pub xp: u64,
    /// Seasonal event tokens; only quizzes on the running event's theme earn them.
    pub event_tokens: u64,
    pub level_up: Option<LevelUp>,
    pub unlocked: Vec<&'static Achievement>,
}

pub struct QuizApp {
    config: RuntimeConfig,
    events: EventBus,
    store: Arc<dyn Store>,
    rewards: RewardCalculator,
    engine: QuizEngine,
    economy: Economy,
    achievements: Achievements,
    profile: UserProfile,
    settled_game: u64,
}

impl QuizApp {
    pub fn builder(config: RuntimeConfig) -> QuizAppBuilder {
        QuizAppBuilder::new(config)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn rewards(&self) -> &RewardCalculator {
        &self.rewards
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut QuizEngine {
        &mut self.engine
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn economy_mut(&mut self) -> &mut Economy {
        &mut self.economy
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut Achievements {
        &mut self.achievements
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    /// Pays out the finished quiz: one coin per point plus the session XP,
    /// event tokens when the quiz theme is featured by the running seasonal
    /// event, and counts the win toward achievements.
    ///
    /// Returns `None` while the quiz is still running, when it had no
    /// questions, or when it was already settled.
    pub fn finish_quiz(&mut self) -> Option<Settlement> {
        let state = self.engine.state();
        let game = self.engine.games_started();
        if !state.is_finished || self.engine.history().is_empty() || self.settled_game == game {
            return None;
        }
        self.settled_game = game;

        let history = self.engine.history();
        let correct = history.iter().filter(|h| h.is_correct).count() as u64;
        let perfect = correct == history.len() as u64;

        let coins = u64::from(state.score);
        let xp = u64::from(state.xp);
        if coins > 0 {
            self.economy.add_coins(coins);
        }
        let level_up = self.economy.add_xp(xp);

        let event_tokens = self.engine.event_tokens(state.score);
        if event_tokens > 0 {
            self.economy.add_event_tokens(event_tokens);
        }

        let unlocked = self.achievements.update_stats(&[
            (StatKey::Wins, 1),
            (StatKey::TotalCoins, coins),
            (StatKey::PerfectScores, u64::from(perfect)),
            (StatKey::CorrectAnswers, correct),
        ]);

        tracing::info!(coins, xp, event_tokens, correct, perfect, "Quiz settled");
        Some(Settlement {
            coins,
            xp,
            event_tokens,
            level_up,
            unlocked,
        })
    }

    /// Pays out a minigame round. A round counts as won when every item was
    /// solved.
    pub fn award_minigame(&mut self, game: MinigameKind, correct: u32, total: u32) -> Settlement {
        let reward = self.rewards.minigame_reward(game.as_ref(), correct, total);
        let won = total > 0 && correct >= total;

        let mut stats = vec![(StatKey::MinigamesPlayed, 1)];
        match game {
            MinigameKind::WordSearch if won => stats.push((StatKey::WordSearchWins, 1)),
            MinigameKind::WordScramble if won => stats.push((StatKey::ScrambleWins, 1)),
            _ => {}
        }

        self.settle(u64::from(reward.stars), u64::from(reward.xp), &stats)
    }

    /// Pays out an arena duel against `tier` and updates the ELO record.
    pub fn award_arena(&mut self, result: ArenaResult, tier: &str) -> Settlement {
        let reward = self.rewards.arena_reward(result, tier);

        let mut stats = Vec::new();
        match result {
            ArenaResult::Win => {
                self.economy.add_arena_win(None);
                stats.push((StatKey::ArenaWins, 1));
                if tier == MASTER_TIER {
                    stats.push((StatKey::MasterDefeated, 1));
                }
            }
            ArenaResult::Loss => self.economy.add_arena_loss(None),
            ArenaResult::Draw => {}
        }

        self.settle(u64::from(reward.stars), u64::from(reward.xp), &stats)
    }

    /// Buys from the shop and counts the purchase toward achievements.
    pub fn buy_item(&mut self, id: &str) -> std::result::Result<ShopItem, PurchaseError> {
        let item = self.economy.buy_item(id)?;
        self.achievements.update_stats(&[(StatKey::ItemsBought, 1)]);
        Ok(item)
    }

    fn settle(&mut self, coins: u64, xp: u64, stats: &[(StatKey, u64)]) -> Settlement {
        if coins > 0 {
            self.economy.add_coins(coins);
        }
        let level_up = self.economy.add_xp(xp);

        let mut stats = stats.to_vec();
        if coins > 0 {
            stats.push((StatKey::TotalCoins, coins));
        }
        let unlocked = self.achievements.update_stats(&stats);

        Settlement {
            coins,
            xp,
            event_tokens: 0,
            level_up,
            unlocked,
        }
    }
}

impl std::fmt::Debug for QuizApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizApp")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("economy", &self.economy)
            .finish_non_exhaustive()
    }
}

/// Builder for [`QuizApp`].
///
/// Without overrides, state is stored under `config.data_dir` and content is
/// read from `config.content_dir` or the embedded defaults.
pub struct QuizAppBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn Store>>,
    content: Option<ContentBundle>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
}

impl QuizAppBuilder {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            store: None,
            content: None,
            clock: None,
            seed: None,
        }
    }

    /// Uses `store` instead of a file store in the data directory.
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses already-loaded content.
    pub fn content(mut self, content: ContentBundle) -> Self {
        self.content = Some(content);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seeds the engine's random source.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<QuizApp> {
        let config = self.config;

        let store: Arc<dyn Store> = match self.store {
            Some(store) => store,
            None => Arc::new(FileStore::new(&config.data_dir)?),
        };

        let content = match self.content {
            Some(content) => content,
            None => {
                let loaded = match &config.content_dir {
                    Some(dir) => ContentFactory::new(dir).load_all(),
                    None => ContentBundle::builtin(),
                };
                loaded.map_err(|e| RuntimeError::Content(format!("{:#}", e)))?
            }
        };

        if content.questions.is_empty() {
            return Err(RuntimeError::EmptyQuestionBank);
        }

        let events = EventBus::with_capacity(config.event_buffer_size);

        let mut engine = QuizEngine::new(
            QuestionBank::new(content.questions),
            config.quiz.clone(),
            store.clone(),
            events.clone(),
        );
        if let Some(clock) = self.clock {
            engine = engine.with_clock(clock);
        }
        if let Some(seed) = self.seed {
            engine = engine.with_seed(seed);
        }
        engine = engine.with_calendar(content.events);
        engine.set_scoring_mode(config.scoring_mode);

        let economy = Economy::load(store.clone(), content.shop, events.clone());
        let achievements = Achievements::load(store.clone(), events.clone());
        let profile = UserProfile::load(store.clone(), events.clone());

        tracing::info!(
            questions = engine.bank().len(),
            data_dir = %config.data_dir.display(),
            "Quiz app ready"
        );

        Ok(QuizApp {
            rewards: RewardCalculator::new(content.balance),
            config,
            events,
            store,
            engine,
            economy,
            achievements,
            profile,
            settled_game: 0,
        })
    }
}
