use super::{InventoryEntry, ItemKey};
use crate::core::StoreError;
use async_trait::async_trait;

/// Trait for persisting inventories.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Add `quantity` items. Stacks onto an entry with the same `key`,
    /// otherwise inserts a new entry with the given type and rarity.
    /// A non-positive `quantity` writes nothing.
    ///
    /// The account must be registered: the SQLite store enforces foreign
    /// keys, so an unknown `account_id` is a `StoreError`.
    async fn add_item(
        &self,
        account_id: &str,
        key: &ItemKey,
        item_type: &str,
        rarity: &str,
        quantity: i64,
    ) -> Result<(), StoreError>;

    /// Remove `quantity` items matching `key`.
    ///
    /// The fused-type match is loose: an entry with the exact fused type or
    /// with no fused type at all qualifies (exact matches are preferred).
    /// A stack holding more than `quantity` is decremented; otherwise the
    /// whole entry is deleted. Returns false when nothing matched or when
    /// `quantity` is not positive.
    async fn remove_item(
        &self,
        account_id: &str,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<bool, StoreError>;

    /// Entry with exactly this stacking identity.
    async fn get_entry(
        &self,
        account_id: &str,
        key: &ItemKey,
    ) -> Result<Option<InventoryEntry>, StoreError>;

    /// All entries, ordered by rarity tag descending (plain text ordering)
    /// then by name ascending.
    async fn list(&self, account_id: &str) -> Result<Vec<InventoryEntry>, StoreError>;
}
