//! Lenient decoding of saved wallets.
//!
//! Older saves can hold `null` where a number went missing. Each field is
//! decoded on its own so one bad value only resets that field.

use std::collections::BTreeSet;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::EconomyState;

/// Any value that does not decode as `T` reads as `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient<T> {
        Valid(T),
        Invalid(IgnoredAny),
    }

    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => Some(value),
        Lenient::Invalid(_) => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct StoredEconomy {
    #[serde(deserialize_with = "lenient")]
    coins: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    xp: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    level: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    event_tokens: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    inventory: Option<BTreeSet<String>>,
    #[serde(deserialize_with = "lenient")]
    arena_wins: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    arena_losses: Option<u32>,
    #[serde(rename = "arenaELO", deserialize_with = "lenient")]
    arena_elo: Option<u32>,
}

impl From<StoredEconomy> for EconomyState {
    fn from(stored: StoredEconomy) -> Self {
        let zero = Self::default();
        Self {
            coins: stored.coins.unwrap_or(zero.coins),
            xp: stored.xp.unwrap_or(zero.xp),
            level: stored.level.filter(|&level| level >= 1).unwrap_or(zero.level),
            event_tokens: stored.event_tokens.unwrap_or(zero.event_tokens),
            inventory: stored.inventory.unwrap_or(zero.inventory),
            arena_wins: stored.arena_wins.unwrap_or(zero.arena_wins),
            arena_losses: stored.arena_losses.unwrap_or(zero.arena_losses),
            arena_elo: stored.arena_elo.unwrap_or(zero.arena_elo),
        }
    }
}
