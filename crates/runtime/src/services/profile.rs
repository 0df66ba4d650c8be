//! Player identity and avatar.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{EventBus, ProfileEvent};
use crate::repository::{Store, load_or_default, save_json};

pub const PROFILE_KEY: &str = "vocab_user_profile";

pub const MAX_NAME_CHARS: usize = 20;
pub const DEFAULT_DISPLAY_NAME: &str = "Adventurer";
pub const DEFAULT_AVATAR_EMOJI: &str = "🦊";

const DEFAULT_EYES: &str = "default";
const EYE_ITEMS: &[&str] = &["sunglasses", "glasses", "star_eyes", "default"];
const HAT_ITEMS: &[&str] = &[
    "cap",
    "crown",
    "headphones",
    "graduation",
    "tophat",
    "cowboy",
    "party_hat",
    "wizard_hat",
    "halo",
];

/// Equipment slots. `Accessory` items are either eyewear or a hat, never both.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Slot {
    Hat,
    Accessory,
    Skin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedItems {
    pub hat: Option<String>,
    pub accessory: Option<String>,
    pub skin: Option<String>,
}

impl EquippedItems {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Hat => &mut self.hat,
            Slot::Accessory => &mut self.accessory,
            Slot::Skin => &mut self.skin,
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Hat => self.hat.as_deref(),
            Slot::Accessory => self.accessory.as_deref(),
            Slot::Skin => self.skin.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Face {
    pub eyes: String,
    pub mouth: String,
}

impl Default for Face {
    fn default() -> Self {
        Self {
            eyes: DEFAULT_EYES.to_owned(),
            mouth: "smile".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvatarAccessories {
    pub hat: Option<String>,
    pub face_item: Option<String>,
}

/// Layered avatar description rendered by the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvatarData {
    pub base: String,
    pub skin: String,
    pub face: Face,
    pub hair: String,
    pub hair_color: String,
    pub accessories: AvatarAccessories,
    pub background: String,
}

impl Default for AvatarData {
    fn default() -> Self {
        Self {
            base: "human".to_owned(),
            skin: "yellow".to_owned(),
            face: Face::default(),
            hair: "short".to_owned(),
            hair_color: "brown".to_owned(),
            accessories: AvatarAccessories::default(),
            background: "none".to_owned(),
        }
    }
}

impl AvatarData {
    /// Emoji shown where only a single glyph fits.
    pub fn emoji(&self) -> &'static str {
        match self.base.as_str() {
            "human" => "🧑",
            "cat" => "🐱",
            "dog" => "🐶",
            "bear" => "🐻",
            "fox" => "🦊",
            "panda" => "🐼",
            _ => DEFAULT_AVATAR_EMOJI,
        }
    }

    /// Best-effort avatar for profiles saved before avatar data existed.
    pub fn from_emoji(emoji: &str) -> Self {
        let mut data = Self::default();
        match emoji {
            "🎓" => data.accessories.hat = Some("graduation".to_owned()),
            "🦊" => data.base = "fox".to_owned(),
            "🐱" => data.base = "cat".to_owned(),
            "🐶" => data.base = "dog".to_owned(),
            "🦁" => {
                data.base = "bear".to_owned();
                data.hair_color = "blonde".to_owned();
            }
            "🐼" => data.base = "panda".to_owned(),
            "🐨" => data.base = "bear".to_owned(),
            "🐸" => data.skin = "green".to_owned(),
            _ => {}
        }
        data
    }
}

/// Stored profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_data: Option<AvatarData>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "totalPlayTime")]
    pub total_play_time_secs: u64,
    pub equipped_items: EquippedItems,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            name: String::new(),
            avatar: DEFAULT_AVATAR_EMOJI.to_owned(),
            avatar_data: Some(AvatarData::default()),
            created_at: Utc::now(),
            total_play_time_secs: 0,
            equipped_items: EquippedItems::default(),
        }
    }
}

pub struct UserProfile {
    data: ProfileData,
    store: Arc<dyn Store>,
    events: EventBus,
}

impl UserProfile {
    pub fn load(store: Arc<dyn Store>, events: EventBus) -> Self {
        let mut data: ProfileData = load_or_default(store.as_ref(), PROFILE_KEY);
        if data.avatar_data.is_none() {
            data.avatar_data = Some(AvatarData::from_emoji(&data.avatar));
        }
        Self {
            data,
            store,
            events,
        }
    }

    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Keeps at most the first 20 characters.
    pub fn set_name(&mut self, name: &str) {
        self.data.name = name.chars().take(MAX_NAME_CHARS).collect();
        self.commit();
    }

    pub fn avatar(&self) -> &str {
        &self.data.avatar
    }

    pub fn set_avatar(&mut self, avatar: &str) {
        self.data.avatar = avatar.to_owned();
        self.commit();
    }

    pub fn avatar_data(&self) -> AvatarData {
        self.data.avatar_data.clone().unwrap_or_default()
    }

    /// Replaces the avatar and refreshes the single-emoji avatar to match.
    pub fn set_avatar_data(&mut self, avatar_data: AvatarData) {
        self.data.avatar = avatar_data.emoji().to_owned();
        self.data.avatar_data = Some(avatar_data);
        self.commit();
    }

    pub fn equipped_items(&self) -> &EquippedItems {
        &self.data.equipped_items
    }

    /// Puts `item_id` in `slot` and mirrors eyewear or hats onto the avatar.
    ///
    /// Equipping an accessory first clears any eyewear and hat it could
    /// conflict with.
    pub fn equip_item(&mut self, item_id: &str, slot: Slot) {
        *self.data.equipped_items.slot_mut(slot) = Some(item_id.to_owned());

        let mut avatar = self.avatar_data();
        if slot == Slot::Accessory {
            if EYE_ITEMS.contains(&avatar.face.eyes.as_str()) {
                avatar.face.eyes = DEFAULT_EYES.to_owned();
            }
            avatar.accessories.hat = None;
        }

        if EYE_ITEMS.contains(&item_id) {
            avatar.face.eyes = item_id.to_owned();
        } else if HAT_ITEMS.contains(&item_id) {
            avatar.accessories.hat = Some(item_id.to_owned());
        }

        self.set_avatar_data(avatar);
    }

    pub fn unequip_item(&mut self, slot: Slot) {
        *self.data.equipped_items.slot_mut(slot) = None;
        self.commit();
    }

    pub fn display_name(&self) -> &str {
        if self.data.name.is_empty() {
            DEFAULT_DISPLAY_NAME
        } else {
            &self.data.name
        }
    }

    pub fn is_new_user(&self) -> bool {
        self.data.name.is_empty()
    }

    pub fn add_play_time(&mut self, secs: u64) {
        self.data.total_play_time_secs += secs;
        self.commit();
    }

    pub fn reset(&mut self) {
        self.data = ProfileData::default();
        self.commit();
    }

    fn commit(&self) {
        if let Err(err) = save_json(self.store.as_ref(), PROFILE_KEY, &self.data) {
            tracing::warn!(error = %err, "Failed to save profile");
        }
        self.events.publish(ProfileEvent::Updated {
            display_name: self.display_name().to_owned(),
            avatar: self.data.avatar.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn profile() -> (UserProfile, Arc<dyn Store>) {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        (UserProfile::load(store.clone(), EventBus::new()), store)
    }

    #[test]
    fn fresh_profile_defaults() {
        let (profile, _) = profile();
        assert!(profile.is_new_user());
        assert_eq!(profile.display_name(), "Adventurer");
        assert_eq!(profile.avatar(), "🦊");
        assert_eq!(profile.avatar_data(), AvatarData::default());
    }

    #[test]
    fn name_is_truncated_by_characters() {
        let (mut profile, store) = profile();
        profile.set_name("Ååååååååååååååååååååååå");
        assert_eq!(profile.name().chars().count(), 20);
        assert!(!profile.is_new_user());

        let reloaded = UserProfile::load(store, EventBus::new());
        assert_eq!(reloaded.name(), profile.name());
    }

    #[test]
    fn avatar_data_updates_legacy_emoji() {
        let (mut profile, _) = profile();
        let mut data = AvatarData::default();
        data.base = "panda".to_string();
        profile.set_avatar_data(data);
        assert_eq!(profile.avatar(), "🐼");

        let mut data = AvatarData::default();
        data.base = "robot".to_string();
        profile.set_avatar_data(data);
        assert_eq!(profile.avatar(), "🦊");
    }

    #[test]
    fn accessories_replace_each_other() {
        let (mut profile, _) = profile();
        profile.equip_item("sunglasses", Slot::Accessory);
        assert_eq!(profile.avatar_data().face.eyes, "sunglasses");

        profile.equip_item("crown", Slot::Accessory);
        let avatar = profile.avatar_data();
        assert_eq!(avatar.face.eyes, "default");
        assert_eq!(avatar.accessories.hat.as_deref(), Some("crown"));
        assert_eq!(profile.equipped_items().get(Slot::Accessory), Some("crown"));

        profile.unequip_item(Slot::Accessory);
        assert_eq!(profile.equipped_items().get(Slot::Accessory), None);
    }

    #[test]
    fn legacy_profiles_gain_avatar_data() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::with_entries([(
            PROFILE_KEY,
            r#"{"name":"Kim","avatar":"🐱","createdAt":"2024-01-01T00:00:00Z"}"#,
        )]));
        let profile = UserProfile::load(store, EventBus::new());
        assert_eq!(profile.name(), "Kim");
        assert_eq!(profile.avatar_data().base, "cat");
    }

    #[test]
    fn slots_parse_from_item_kinds() {
        assert_eq!("accessory".parse::<Slot>().unwrap(), Slot::Accessory);
        assert_eq!(Slot::Hat.to_string(), "hat");
    }
}
