use serde::{Deserialize, Serialize};

/// Stacking identity of an item within one account's inventory.
///
/// Two grants stack into the same entry only when name, fusion flag and
/// fused type all match (a missing fused type matches only another
/// missing fused type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub name: String,
    pub fused: bool,
    /// Only meaningful when `fused` is set.
    pub fused_type: Option<String>,
}

impl ItemKey {
    /// Plain, unfused item.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fused: false,
            fused_type: None,
        }
    }

    /// Fusion variant of an item.
    pub fn fused(name: impl Into<String>, fused_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fused: true,
            fused_type: Some(fused_type.into()),
        }
    }
}

/// A stack of items held by an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: i64,
    pub account_id: String,
    pub name: String,
    pub item_type: String,
    pub rarity: String,
    /// Always >= 1; empty stacks are deleted.
    pub quantity: i64,
    pub fused: bool,
    pub fused_type: Option<String>,
}

impl InventoryEntry {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            name: self.name.clone(),
            fused: self.fused,
            fused_type: self.fused_type.clone(),
        }
    }
}
