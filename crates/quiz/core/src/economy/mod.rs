//! Coins, XP levels, inventory and arena record.
//!
//! [`EconomyState`] is the persisted value. Its operations are pure; the
//! runtime wraps it to save after every mutation.

mod shop;
#[cfg(feature = "serde")]
mod stored;

pub use shop::{ItemKind, Layer, LayerPosition, ShopCatalog, ShopItem};

use std::collections::BTreeSet;

use crate::error::{ErrorSeverity, QuizError};

/// Message shown after a successful purchase.
pub const PURCHASE_SUCCESS_MESSAGE: &str = "Purchased!";

pub const STARTING_ELO: u32 = 1000;
pub const DEFAULT_ELO_GAIN: u32 = 25;
pub const DEFAULT_ELO_LOSS: u32 = 15;
/// Coins granted per level reached.
pub const LEVEL_UP_COINS_PER_LEVEL: u64 = 50;

/// Reasons a purchase is refused, checked in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PurchaseError {
    #[error("Item not found")]
    ItemNotFound(String),

    #[error("Already owned")]
    AlreadyOwned(String),

    #[error("Not enough coins")]
    NotEnoughCoins { cost: u64, available: u64 },
}

impl QuizError for PurchaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughCoins { .. } => ErrorSeverity::Recoverable,
            Self::ItemNotFound(_) | Self::AlreadyOwned(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "PURCHASE_ITEM_NOT_FOUND",
            Self::AlreadyOwned(_) => "PURCHASE_ALREADY_OWNED",
            Self::NotEnoughCoins { .. } => "PURCHASE_NOT_ENOUGH_COINS",
        }
    }
}

/// Arena record snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaStats {
    pub wins: u32,
    pub losses: u32,
    pub elo: u32,
}

/// Level reached by an XP gain, with the coins it granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub bonus_coins: u64,
}

/// Player wallet and progression.
///
/// Stored JSON uses camelCase field names. Missing, `null` or mistyped
/// fields take their zero-state value without affecting the other fields.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", from = "stored::StoredEconomy")
)]
pub struct EconomyState {
    pub coins: u64,
    pub xp: u64,
    pub level: u32,
    pub event_tokens: u64,
    pub inventory: BTreeSet<String>,
    pub arena_wins: u32,
    pub arena_losses: u32,
    #[cfg_attr(feature = "serde", serde(rename = "arenaELO"))]
    pub arena_elo: u32,
}

impl Default for EconomyState {
    fn default() -> Self {
        Self {
            coins: 0,
            xp: 0,
            level: 1,
            event_tokens: 0,
            inventory: BTreeSet::new(),
            arena_wins: 0,
            arena_losses: 0,
            arena_elo: STARTING_ELO,
        }
    }
}

/// `1 + floor(sqrt(xp / 100))`: 100 XP is level 2, 400 XP level 3.
pub fn level_for_xp(xp: u64) -> u32 {
    1 + (xp / 100).isqrt() as u32
}

impl EconomyState {
    /// Adds coins. Returns `false` and changes nothing for a zero amount.
    pub fn add_coins(&mut self, amount: u64) -> bool {
        if amount == 0 {
            tracing::warn!(amount, "Attempted to add invalid coin amount");
            return false;
        }
        self.coins = self.coins.saturating_add(amount);
        true
    }

    /// Adds XP and recomputes the level, granting coins when it rises.
    pub fn add_xp(&mut self, amount: u64) -> Option<LevelUp> {
        if amount == 0 {
            return None;
        }
        self.xp = self.xp.saturating_add(amount);

        let new_level = level_for_xp(self.xp);
        if new_level <= self.level {
            return None;
        }

        let bonus_coins = u64::from(new_level) * LEVEL_UP_COINS_PER_LEVEL;
        self.level = new_level;
        self.coins = self.coins.saturating_add(bonus_coins);
        Some(LevelUp {
            level: new_level,
            bonus_coins,
        })
    }

    pub fn add_event_tokens(&mut self, amount: u64) {
        self.event_tokens = self.event_tokens.saturating_add(amount);
    }

    pub fn has_item(&self, id: &str) -> bool {
        self.inventory.contains(id)
    }

    /// Buys `id` from `catalog`. State is untouched on error.
    pub fn buy_item<'a>(
        &mut self,
        catalog: &'a ShopCatalog,
        id: &str,
    ) -> Result<&'a ShopItem, PurchaseError> {
        let item = catalog
            .get(id)
            .ok_or_else(|| PurchaseError::ItemNotFound(id.to_owned()))?;

        if self.has_item(id) {
            return Err(PurchaseError::AlreadyOwned(id.to_owned()));
        }

        if self.coins < item.cost {
            return Err(PurchaseError::NotEnoughCoins {
                cost: item.cost,
                available: self.coins,
            });
        }

        self.coins -= item.cost;
        self.inventory.insert(item.id.clone());
        Ok(item)
    }

    pub fn arena_stats(&self) -> ArenaStats {
        ArenaStats {
            wins: self.arena_wins,
            losses: self.arena_losses,
            elo: self.arena_elo,
        }
    }

    pub fn record_arena_win(&mut self, elo_gain: u32) {
        self.arena_wins = self.arena_wins.saturating_add(1);
        self.arena_elo = self.arena_elo.saturating_add(elo_gain);
    }

    /// ELO never drops below zero.
    pub fn record_arena_loss(&mut self, elo_loss: u32) {
        self.arena_losses = self.arena_losses.saturating_add(1);
        self.arena_elo = self.arena_elo.saturating_sub(elo_loss);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ShopCatalog {
        ShopCatalog::new(vec![
            ShopItem {
                id: "sunglasses".into(),
                name: "Cool Shades".into(),
                cost: 100,
                icon: "🕶️".into(),
                kind: ItemKind::Accessory,
                layer: Some(Layer {
                    z_index: 3,
                    position: LayerPosition::Center,
                }),
            },
            ShopItem {
                id: "crown".into(),
                name: "Royal Crown".into(),
                cost: 500,
                icon: "👑".into(),
                kind: ItemKind::Accessory,
                layer: None,
            },
        ])
    }

    #[test]
    fn zero_state() {
        let state = EconomyState::default();
        assert_eq!(state.level, 1);
        assert_eq!(state.arena_stats(), ArenaStats { wins: 0, losses: 0, elo: 1000 });
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn buying_sunglasses_twice() {
        let catalog = catalog();
        let mut state = EconomyState::default();
        assert!(state.add_coins(200));

        let item = state.buy_item(&catalog, "sunglasses").unwrap();
        assert_eq!(item.name, "Cool Shades");
        assert_eq!(state.coins, 100);
        assert!(state.has_item("sunglasses"));

        let err = state.buy_item(&catalog, "sunglasses").unwrap_err();
        assert_eq!(err, PurchaseError::AlreadyOwned("sunglasses".into()));
        assert_eq!(err.to_string(), "Already owned");
        assert_eq!(state.coins, 100);
    }

    #[test]
    fn purchase_checks_run_in_order() {
        let catalog = catalog();
        let mut state = EconomyState::default();

        let err = state.buy_item(&catalog, "jetpack").unwrap_err();
        assert_eq!(err.to_string(), "Item not found");

        let err = state.buy_item(&catalog, "crown").unwrap_err();
        assert_eq!(err, PurchaseError::NotEnoughCoins { cost: 500, available: 0 });
        assert_eq!(err.to_string(), "Not enough coins");
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);

        // Owned takes precedence over price.
        state.inventory.insert("crown".into());
        assert_eq!(
            state.buy_item(&catalog, "crown").unwrap_err(),
            PurchaseError::AlreadyOwned("crown".into())
        );
    }

    #[test]
    fn zero_coins_are_rejected() {
        let mut state = EconomyState::default();
        assert!(!state.add_coins(0));
        assert_eq!(state, EconomyState::default());
    }

    #[test]
    fn level_formula() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
        assert_eq!(level_for_xp(900), 4);
    }

    #[test]
    fn level_up_grants_coins_once() {
        let mut state = EconomyState::default();
        assert_eq!(state.add_xp(50), None);
        assert_eq!(state.add_xp(60), Some(LevelUp { level: 2, bonus_coins: 100 }));
        assert_eq!(state.coins, 100);
        assert_eq!(state.add_xp(10), None);

        // Skipping levels pays for the level reached only.
        assert_eq!(state.add_xp(800), Some(LevelUp { level: 4, bonus_coins: 200 }));
        assert_eq!(state.coins, 300);
    }

    #[test]
    fn balances_saturate_instead_of_overflowing() {
        let mut state = EconomyState::default();
        state.add_coins(10);
        assert!(state.add_coins(u64::MAX));
        assert_eq!(state.coins, u64::MAX);

        state.add_event_tokens(1);
        state.add_event_tokens(u64::MAX);
        assert_eq!(state.event_tokens, u64::MAX);

        let level_up = state.add_xp(u64::MAX).unwrap();
        assert_eq!(state.xp, u64::MAX);
        assert_eq!(state.level, level_up.level);
        assert_eq!(state.coins, u64::MAX);
        assert_eq!(state.add_xp(5), None);
    }

    #[test]
    fn arena_elo_floors_at_zero() {
        let mut state = EconomyState::default();
        state.record_arena_win(DEFAULT_ELO_GAIN);
        assert_eq!(state.arena_elo, 1025);

        state.arena_elo = 10;
        state.record_arena_loss(DEFAULT_ELO_LOSS);
        assert_eq!(state.arena_stats(), ArenaStats { wins: 1, losses: 1, elo: 0 });
    }

    #[test]
    fn reset_restores_zero_state() {
        let mut state = EconomyState::default();
        state.add_coins(40);
        state.add_event_tokens(3);
        state.inventory.insert("crown".into());
        state.reset();
        assert_eq!(state, EconomyState::default());
    }
}
