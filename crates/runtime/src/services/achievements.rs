//! Persisted achievement counters and unlocks.

use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::achievements::find;
use quiz_core::{Achievement, AchievementBook, AchievementStats, StatKey};

use crate::events::{AchievementEvent, EventBus};
use crate::repository::{Store, load_or_default, save_json};

pub const UNLOCKED_KEY: &str = "vocab_achievements";
pub const STATS_KEY: &str = "vocab_achievements_stats";

/// [`AchievementBook`] bound to a store and the event bus.
///
/// Unlocked ids and counters live under separate keys so either can be lost
/// without resetting the other.
pub struct Achievements {
    book: AchievementBook,
    store: Arc<dyn Store>,
    events: EventBus,
}

impl Achievements {
    pub fn load(store: Arc<dyn Store>, events: EventBus) -> Self {
        let unlocked: BTreeSet<String> = load_or_default(store.as_ref(), UNLOCKED_KEY);
        let stats: AchievementStats = load_or_default(store.as_ref(), STATS_KEY);
        tracing::debug!(unlocked = unlocked.len(), "Achievements loaded");

        Self {
            book: AchievementBook::from_parts(stats, unlocked),
            store,
            events,
        }
    }

    pub fn stats(&self) -> &AchievementStats {
        self.book.stats()
    }

    /// Adds to the counters, then unlocks and announces whatever now qualifies.
    pub fn update_stats(&mut self, updates: &[(StatKey, u64)]) -> Vec<&'static Achievement> {
        let newly = self.book.update_stats(updates);
        self.save_stats();
        self.announce(&newly);
        newly
    }

    /// String-keyed variant; unknown stat names are ignored.
    pub fn update_stats_by_name(&mut self, updates: &[(&str, u64)]) -> Vec<&'static Achievement> {
        let newly = self.book.update_stats_by_name(updates);
        self.save_stats();
        self.announce(&newly);
        newly
    }

    pub fn check_unlocks(&mut self) -> Vec<&'static Achievement> {
        let newly = self.book.check_unlocks();
        self.announce(&newly);
        newly
    }

    /// Unlocks `id` directly. Returns `false` when it was already unlocked.
    pub fn unlock(&mut self, id: &str) -> bool {
        if !self.book.unlock(id) {
            return false;
        }
        match find(id) {
            Some(achievement) => self.announce(&[achievement]),
            None => {
                tracing::warn!(id, "Unlocked an achievement with no definition");
                self.save_unlocked();
            }
        }
        true
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.book.is_unlocked(id)
    }

    pub fn unlocked(&self) -> Vec<&'static Achievement> {
        self.book.unlocked()
    }

    pub fn all(&self) -> &'static [Achievement] {
        self.book.all()
    }

    fn announce(&self, newly: &[&'static Achievement]) {
        if newly.is_empty() {
            return;
        }
        self.save_unlocked();
        for achievement in newly {
            tracing::info!(id = achievement.id, "Achievement unlocked");
            self.events.publish(AchievementEvent::Unlocked {
                id: achievement.id.to_owned(),
                title: achievement.title.to_owned(),
            });
        }
    }

    fn save_unlocked(&self) {
        if let Err(err) = save_json(self.store.as_ref(), UNLOCKED_KEY, self.book.unlocked_ids()) {
            tracing::warn!(error = %err, "Failed to save achievements");
        }
    }

    fn save_stats(&self) {
        if let Err(err) = save_json(self.store.as_ref(), STATS_KEY, self.book.stats()) {
            tracing::warn!(error = %err, "Failed to save achievement stats");
        }
    }
}
