/// Category of a shop item.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ItemKind {
    Accessory,
    Skin,
    Avatar,
    Theme,
}

/// Anchor of a layered item on the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LayerPosition {
    Top,
    Center,
}

/// Render layer of an item drawn over the avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub z_index: u8,
    pub position: LayerPosition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: u64,
    pub icon: String,
    pub kind: ItemKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub layer: Option<Layer>,
}

/// Items available for purchase, in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ShopCatalog {
    items: Vec<ShopItem>,
}

impl ShopCatalog {
    pub fn new(items: Vec<ShopItem>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[ShopItem] {
        &self.items
    }

    pub fn by_kind(&self, kind: ItemKind) -> impl Iterator<Item = &ShopItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
