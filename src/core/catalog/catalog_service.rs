// Read-only catalog of chests and shop items.
//
// The store lists everything; rank filtering is layered on top with the
// permission resolver's tier ordering.

use crate::core::permissions::PermissionResolver;
use crate::core::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A purchasable loot container gated by rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub name: String,
    pub price: i64,
    pub rank_required: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub name: String,
    pub price: i64,
    pub item_type: String,
    pub rarity: String,
    pub rank_required: String,
    pub description: Option<String>,
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_chests(&self) -> Result<Vec<Chest>, StoreError>;

    async fn get_chest(&self, name: &str) -> Result<Option<Chest>, StoreError>;

    async fn list_shop_items(&self) -> Result<Vec<ShopItem>, StoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct CatalogService<C: CatalogStore> {
    store: C,
}

impl<C: CatalogStore> CatalogService<C> {
    pub fn new(store: C) -> Self {
        Self { store }
    }

    pub async fn chests(&self) -> Result<Vec<Chest>, StoreError> {
        self.store.list_chests().await
    }

    pub async fn chest(&self, name: &str) -> Result<Option<Chest>, StoreError> {
        self.store.get_chest(name).await
    }

    /// Chests a user of `rank` may buy and open.
    pub async fn chests_for(&self, rank: &str) -> Result<Vec<Chest>, StoreError> {
        let chests = self.store.list_chests().await?;
        Ok(chests
            .into_iter()
            .filter(|chest| PermissionResolver::can_access_chest(rank, &chest.rank_required))
            .collect())
    }

    pub async fn shop_items(&self) -> Result<Vec<ShopItem>, StoreError> {
        self.store.list_shop_items().await
    }

    /// Shop items available to `rank`, using the same tier ordering as chests.
    pub async fn shop_items_for(&self, rank: &str) -> Result<Vec<ShopItem>, StoreError> {
        let items = self.store.list_shop_items().await?;
        Ok(items
            .into_iter()
            .filter(|item| PermissionResolver::can_access_chest(rank, &item.rank_required))
            .collect())
    }
}
