//! Persisted wallet, inventory and arena record.

use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::economy::{DEFAULT_ELO_GAIN, DEFAULT_ELO_LOSS};
use quiz_core::{ArenaStats, EconomyState, LevelUp, PurchaseError, ShopCatalog, ShopItem};

use crate::events::{EconomyEvent, EventBus};
use crate::repository::{Store, load_or_default, save_json};

pub const ECONOMY_KEY: &str = "vocab_quest_economy";

/// [`EconomyState`] bound to a store and the event bus.
///
/// State is loaded once on construction and written back after every
/// mutation. A failed write is logged and the in-memory state stays
/// authoritative.
pub struct Economy {
    state: EconomyState,
    catalog: ShopCatalog,
    store: Arc<dyn Store>,
    events: EventBus,
}

impl Economy {
    pub fn load(store: Arc<dyn Store>, catalog: ShopCatalog, events: EventBus) -> Self {
        let state: EconomyState = load_or_default(store.as_ref(), ECONOMY_KEY);
        tracing::debug!(coins = state.coins, level = state.level, "Economy loaded");
        Self {
            state,
            catalog,
            store,
            events,
        }
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn catalog(&self) -> &ShopCatalog {
        &self.catalog
    }

    pub fn coins(&self) -> u64 {
        self.state.coins
    }

    pub fn xp(&self) -> u64 {
        self.state.xp
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn event_tokens(&self) -> u64 {
        self.state.event_tokens
    }

    pub fn inventory(&self) -> &BTreeSet<String> {
        &self.state.inventory
    }

    /// Returns `false` for a zero amount, which changes nothing.
    pub fn add_coins(&mut self, amount: u64) -> bool {
        if !self.state.add_coins(amount) {
            return false;
        }
        self.commit();
        true
    }

    pub fn add_xp(&mut self, amount: u64) -> Option<LevelUp> {
        if amount == 0 {
            return None;
        }
        let level_up = self.state.add_xp(amount);
        self.commit();

        if let Some(level_up) = level_up {
            tracing::info!(level = level_up.level, bonus = level_up.bonus_coins, "Level up");
            self.events.publish(EconomyEvent::LeveledUp {
                level: level_up.level,
                bonus_coins: level_up.bonus_coins,
            });
        }
        level_up
    }

    pub fn add_event_tokens(&mut self, amount: u64) {
        self.state.add_event_tokens(amount);
        self.commit();
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.state.has_item(id)
    }

    /// Buys `id` from the catalog. Nothing is saved or published on error.
    pub fn buy_item(&mut self, id: &str) -> Result<ShopItem, PurchaseError> {
        let item = self.state.buy_item(&self.catalog, id)?.clone();
        tracing::info!(item = %item.id, cost = item.cost, "Item purchased");

        self.commit();
        self.events.publish(EconomyEvent::Purchased {
            item_id: item.id.clone(),
            cost: item.cost,
        });
        Ok(item)
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.state.arena_stats()
    }

    /// Records a win; `None` uses the standard ELO gain.
    pub fn add_arena_win(&mut self, elo_gain: Option<u32>) {
        self.state
            .record_arena_win(elo_gain.unwrap_or(DEFAULT_ELO_GAIN));
        self.commit();
    }

    /// Records a loss; `None` uses the standard ELO loss.
    pub fn add_arena_loss(&mut self, elo_loss: Option<u32>) {
        self.state
            .record_arena_loss(elo_loss.unwrap_or(DEFAULT_ELO_LOSS));
        self.commit();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.commit();
    }

    fn commit(&self) {
        if let Err(err) = save_json(self.store.as_ref(), ECONOMY_KEY, &self.state) {
            tracing::warn!(error = %err, "Failed to save economy");
        }
        self.events
            .publish(EconomyEvent::Changed(Box::new(self.state.clone())));
    }
}

impl std::fmt::Debug for Economy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Economy")
            .field("state", &self.state)
            .field("catalog", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, Topic};
    use crate::repository::InMemoryStore;

    fn economy(store: Arc<dyn Store>) -> Economy {
        Economy::load(store, quiz_content::builtin::shop().unwrap(), EventBus::new())
    }

    #[test]
    fn buying_deducts_and_persists() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let mut eco = economy(store.clone());

        assert!(eco.add_coins(200));
        let item = eco.buy_item("sunglasses").unwrap();
        assert_eq!(item.cost, 100);
        assert_eq!(eco.coins(), 100);

        let err = eco.buy_item("sunglasses").unwrap_err();
        assert_eq!(err.to_string(), "Already owned");
        assert_eq!(eco.coins(), 100);

        let reloaded = economy(store);
        assert_eq!(reloaded.coins(), 100);
        assert!(reloaded.has_item("sunglasses"));
    }

    #[test]
    fn zero_coins_do_not_save() {
        let store = Arc::new(InMemoryStore::new());
        let mut eco = economy(store.clone());
        assert!(!eco.add_coins(0));
        assert!(store.is_empty());
    }

    #[test]
    fn level_up_publishes_bonus() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Economy);
        let mut eco = Economy::load(store, quiz_content::builtin::shop().unwrap(), bus);

        let level_up = eco.add_xp(100).unwrap();
        assert_eq!(level_up.level, 2);
        assert_eq!(eco.coins(), 100);

        assert!(matches!(rx.try_recv().unwrap(), Event::Economy(EconomyEvent::Changed(_))));
        assert_eq!(
            rx.try_recv().unwrap(),
            Event::Economy(EconomyEvent::LeveledUp {
                level: 2,
                bonus_coins: 100
            })
        );
    }

    #[test]
    fn null_field_resets_only_that_field() {
        let store = Arc::new(InMemoryStore::with_entries([(
            ECONOMY_KEY,
            r#"{"coins":null,"xp":450,"level":3,"inventory":["crown","sunglasses"],"arenaWins":4,"arenaELO":"high"}"#,
        )]));
        let eco = economy(store);

        assert_eq!(eco.coins(), 0);
        assert_eq!(eco.xp(), 450);
        assert_eq!(eco.level(), 3);
        assert!(eco.has_item("crown"));
        assert!(eco.has_item("sunglasses"));
        let stats = eco.arena_stats();
        assert_eq!((stats.wins, stats.losses, stats.elo), (4, 0, 1000));
    }

    #[test]
    fn arena_defaults() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let mut eco = economy(store);
        eco.add_arena_win(None);
        eco.add_arena_loss(Some(2_000));
        let stats = eco.arena_stats();
        assert_eq!((stats.wins, stats.losses, stats.elo), (1, 1, 0));
    }
}
