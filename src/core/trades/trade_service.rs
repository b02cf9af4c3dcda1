// Trade service - proposal, offers and settlement.
//
// The TradeStore only records state transitions. Settlement (moving coins
// and items) happens here, before the record is marked completed.
//
// Nothing here locks: the caller must process one command at a time per
// account, otherwise a balance can change between verification and transfer.

use super::{Trade, TradeItem, TradeStatus, TradeStore};
use crate::core::accounts::AccountStore;
use crate::core::inventory::{InventoryStore, ItemKey};
use crate::core::StoreError;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum TradeError {
    #[error("{0} has no pending trade")]
    NoActiveTrade(String),

    #[error("Cannot trade with yourself")]
    SelfTrade,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Offer amounts must not be negative")]
    NegativeOffer,

    #[error("{account_id} offered {required} coins but only has {available}")]
    InsufficientFunds {
        account_id: String,
        required: i64,
        available: i64,
    },

    #[error("{account_id} offered {required}x {item} but only has {available}")]
    MissingItem {
        account_id: String,
        item: String,
        required: i64,
        available: i64,
    },

    #[error("Trade {0} is no longer pending")]
    NotPending(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct TradeService<T: TradeStore, A: AccountStore, I: InventoryStore> {
    trades: T,
    accounts: A,
    inventory: I,
}

impl<T: TradeStore, A: AccountStore, I: InventoryStore> TradeService<T, A, I> {
    pub fn new(trades: T, accounts: A, inventory: I) -> Self {
        Self {
            trades,
            accounts,
            inventory,
        }
    }

    /// Open a trade between two registered accounts, replacing any pending
    /// trade the initiator already had.
    pub async fn propose(&self, initiator_id: &str, counterparty_id: &str) -> Result<i64, TradeError> {
        if initiator_id == counterparty_id {
            return Err(TradeError::SelfTrade);
        }
        for id in [initiator_id, counterparty_id] {
            if self.accounts.get(id).await?.is_none() {
                return Err(TradeError::AccountNotFound(id.to_string()));
            }
        }

        let trade_id = self.trades.propose(initiator_id, counterparty_id).await?;
        info!(trade_id, initiator_id, counterparty_id, "Opened trade");
        Ok(trade_id)
    }

    /// Replace one party's side of their pending trade, keeping the other side.
    pub async fn set_offer(
        &self,
        account_id: &str,
        money: i64,
        items: Vec<TradeItem>,
    ) -> Result<Trade, TradeError> {
        if money < 0 || items.iter().any(|item| item.quantity <= 0) {
            return Err(TradeError::NegativeOffer);
        }

        let mut trade = self.active_trade(account_id).await?;
        if trade.initiator_id == account_id {
            trade.offer.initiator_money = money;
            trade.offer.initiator_items = items;
        } else {
            trade.offer.counterparty_money = money;
            trade.offer.counterparty_items = items;
        }

        if !self.trades.update_offer(trade.id, &trade.offer).await? {
            return Err(TradeError::NotPending(trade.id));
        }
        debug!(trade_id = trade.id, account_id, money, "Updated trade offer");
        Ok(trade)
    }

    pub async fn cancel(&self, account_id: &str) -> Result<bool, TradeError> {
        let cancelled = self.trades.cancel(account_id).await?;
        if cancelled {
            info!(account_id, "Cancelled pending trade");
        }
        Ok(cancelled)
    }

    /// Verify both sides still hold what they offered, exchange coins and
    /// items, then mark the trade completed.
    pub async fn settle(&self, account_id: &str) -> Result<Trade, TradeError> {
        let mut trade = self.active_trade(account_id).await?;
        let initiator = trade.initiator_id.clone();
        let counterparty = trade.counterparty_id.clone();
        let offer = trade.offer.clone();

        self.verify_funds(&initiator, offer.initiator_money).await?;
        self.verify_funds(&counterparty, offer.counterparty_money).await?;
        let initiator_items = self.verify_items(&initiator, &offer.initiator_items).await?;
        let counterparty_items = self
            .verify_items(&counterparty, &offer.counterparty_items)
            .await?;

        self.move_items(&initiator, &counterparty, initiator_items).await?;
        self.move_items(&counterparty, &initiator, counterparty_items).await?;

        let net = offer.counterparty_money - offer.initiator_money;
        if net != 0 {
            self.accounts.adjust_currency(&initiator, net).await?;
            self.accounts.adjust_currency(&counterparty, -net).await?;
        }

        if !self.trades.complete(trade.id).await? {
            return Err(TradeError::NotPending(trade.id));
        }
        trade.status = TradeStatus::Completed;

        info!(
            trade_id = trade.id,
            initiator = %initiator,
            counterparty = %counterparty,
            "Settled trade"
        );
        Ok(trade)
    }

    async fn active_trade(&self, account_id: &str) -> Result<Trade, TradeError> {
        self.trades
            .get_active(account_id)
            .await?
            .ok_or_else(|| TradeError::NoActiveTrade(account_id.to_string()))
    }

    async fn verify_funds(&self, account_id: &str, required: i64) -> Result<(), TradeError> {
        let account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| TradeError::AccountNotFound(account_id.to_string()))?;

        if account.currency < required {
            return Err(TradeError::InsufficientFunds {
                account_id: account_id.to_string(),
                required,
                available: account.currency,
            });
        }
        Ok(())
    }

    /// Checks holdings for every offered stack. Repeated lines for the same
    /// item are summed first. Returns the stacks to move with their type and
    /// rarity so the receiver gets an identical entry.
    async fn verify_items(
        &self,
        account_id: &str,
        items: &[TradeItem],
    ) -> Result<Vec<(ItemKey, String, String, i64)>, TradeError> {
        let mut wanted: Vec<(ItemKey, i64)> = Vec::new();
        let mut index: HashMap<ItemKey, usize> = HashMap::new();
        for item in items {
            let key = item.key();
            match index.get(&key).copied() {
                Some(i) => wanted[i].1 += item.quantity,
                None => {
                    index.insert(key.clone(), wanted.len());
                    wanted.push((key, item.quantity));
                }
            }
        }

        let mut stacks = Vec::with_capacity(wanted.len());
        for (key, required) in wanted {
            let entry = self.inventory.get_entry(account_id, &key).await?;
            let available = entry.as_ref().map(|e| e.quantity).unwrap_or(0);
            match entry {
                Some(entry) if available >= required => {
                    stacks.push((key, entry.item_type, entry.rarity, required));
                }
                _ => {
                    return Err(TradeError::MissingItem {
                        account_id: account_id.to_string(),
                        item: key.name,
                        required,
                        available,
                    })
                }
            }
        }
        Ok(stacks)
    }

    async fn move_items(
        &self,
        from: &str,
        to: &str,
        stacks: Vec<(ItemKey, String, String, i64)>,
    ) -> Result<(), TradeError> {
        for (key, item_type, rarity, quantity) in stacks {
            // The receiver only gets what actually left the sender
            if !self.inventory.remove_item(from, &key, quantity).await? {
                return Err(TradeError::MissingItem {
                    account_id: from.to_string(),
                    item: key.name,
                    required: quantity,
                    available: 0,
                });
            }
            self.inventory
                .add_item(to, &key, &item_type, &rarity, quantity)
                .await?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::accounts::SqliteAccountStore;
    use crate::infra::database::Database;
    use crate::infra::inventory::SqliteInventoryStore;
    use crate::core::inventory::InventoryEntry;
    use crate::infra::trades::SqliteTradeStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    type Service = TradeService<SqliteTradeStore, SqliteAccountStore, SqliteInventoryStore>;

    async fn setup() -> (TempDir, Service) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("trades.db")).await.unwrap();
        db.initialize().await.unwrap();

        let accounts = SqliteAccountStore::new(db.pool());
        for (id, coins) in [("alice", 100), ("bob", 50)] {
            accounts.register(id).await.unwrap();
            accounts.set_currency(id, coins).await.unwrap();
        }

        let inventory = SqliteInventoryStore::new(db.pool());
        inventory
            .add_item("alice", &ItemKey::plain("Sword"), "weapon", "rare", 2)
            .await
            .unwrap();
        inventory
            .add_item("bob", &ItemKey::fused("Shield", "ice"), "armor", "epic", 1)
            .await
            .unwrap();

        let service = TradeService::new(SqliteTradeStore::new(db.pool()), accounts, inventory);
        (dir, service)
    }

    #[tokio::test]
    async fn test_settle_exchanges_coins_and_items() {
        let (_dir, service) = setup().await;
        let id = service.propose("alice", "bob").await.unwrap();

        service
            .set_offer("alice", 30, vec![TradeItem::new(ItemKey::plain("Sword"), 1)])
            .await
            .unwrap();
        service
            .set_offer(
                "bob",
                10,
                vec![TradeItem::new(ItemKey::fused("Shield", "ice"), 1)],
            )
            .await
            .unwrap();

        let trade = service.settle("bob").await.unwrap();
        assert_eq!(trade.id, id);
        assert_eq!(trade.status, TradeStatus::Completed);

        let alice = service.accounts.get("alice").await.unwrap().unwrap();
        let bob = service.accounts.get("bob").await.unwrap().unwrap();
        assert_eq!(alice.currency, 80);
        assert_eq!(bob.currency, 70);

        let sword = service
            .inventory
            .get_entry("alice", &ItemKey::plain("Sword"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sword.quantity, 1);

        let shield = service
            .inventory
            .get_entry("alice", &ItemKey::fused("Shield", "ice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shield.item_type, "armor");
        assert_eq!(shield.rarity, "epic");
        assert!(service
            .inventory
            .get_entry("bob", &ItemKey::fused("Shield", "ice"))
            .await
            .unwrap()
            .is_none());

        // Completed trades are no longer active
        assert!(service.trades.get_active("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_settle_rejects_missing_holdings() {
        let (_dir, service) = setup().await;
        service.propose("alice", "bob").await.unwrap();

        service.set_offer("alice", 500, vec![]).await.unwrap();
        let err = service.settle("alice").await.unwrap_err();
        assert!(matches!(
            err,
            TradeError::InsufficientFunds { required: 500, available: 100, .. }
        ));

        service
            .set_offer(
                "alice",
                0,
                vec![
                    TradeItem::new(ItemKey::plain("Sword"), 2),
                    TradeItem::new(ItemKey::plain("Sword"), 1),
                ],
            )
            .await
            .unwrap();
        let err = service.settle("alice").await.unwrap_err();
        assert!(matches!(
            err,
            TradeError::MissingItem { required: 3, available: 2, .. }
        ));

        // Nothing moved, trade still pending
        let alice = service.accounts.get("alice").await.unwrap().unwrap();
        assert_eq!(alice.currency, 100);
        assert!(service.trades.get_active("bob").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_propose_validation() {
        let (_dir, service) = setup().await;
        assert!(matches!(
            service.propose("alice", "alice").await,
            Err(TradeError::SelfTrade)
        ));
        assert!(matches!(
            service.propose("alice", "ghost").await,
            Err(TradeError::AccountNotFound(_))
        ));
        assert!(matches!(
            service.settle("alice").await,
            Err(TradeError::NoActiveTrade(_))
        ));
        assert!(matches!(
            service.set_offer("alice", -1, vec![]).await,
            Err(TradeError::NegativeOffer)
        ));
    }

    #[tokio::test]
    async fn test_cancel_from_counterparty() {
        let (_dir, service) = setup().await;
        service.propose("alice", "bob").await.unwrap();

        assert!(service.cancel("bob").await.unwrap());
        assert!(!service.cancel("alice").await.unwrap());
    }

    // Reports holdings but never lets a stack leave its owner
    struct StuckInventory(SqliteInventoryStore);

    #[async_trait]
    impl InventoryStore for StuckInventory {
        async fn add_item(
            &self,
            account_id: &str,
            key: &ItemKey,
            item_type: &str,
            rarity: &str,
            quantity: i64,
        ) -> Result<(), StoreError> {
            self.0
                .add_item(account_id, key, item_type, rarity, quantity)
                .await
        }

        async fn remove_item(&self, _: &str, _: &ItemKey, _: i64) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn get_entry(
            &self,
            account_id: &str,
            key: &ItemKey,
        ) -> Result<Option<InventoryEntry>, StoreError> {
            self.0.get_entry(account_id, key).await
        }

        async fn list(&self, account_id: &str) -> Result<Vec<InventoryEntry>, StoreError> {
            self.0.list(account_id).await
        }
    }

    #[tokio::test]
    async fn test_settle_stops_when_items_do_not_leave_sender() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("stuck.db")).await.unwrap();
        db.initialize().await.unwrap();

        let accounts = SqliteAccountStore::new(db.pool());
        for id in ["alice", "bob"] {
            accounts.register(id).await.unwrap();
        }
        accounts.set_currency("bob", 40).await.unwrap();
        let inventory = SqliteInventoryStore::new(db.pool());
        inventory
            .add_item("alice", &ItemKey::plain("Sword"), "weapon", "rare", 1)
            .await
            .unwrap();

        let service = TradeService::new(
            SqliteTradeStore::new(db.pool()),
            accounts,
            StuckInventory(inventory),
        );
        service.propose("alice", "bob").await.unwrap();
        service
            .set_offer("alice", 0, vec![TradeItem::new(ItemKey::plain("Sword"), 1)])
            .await
            .unwrap();
        service.set_offer("bob", 40, vec![]).await.unwrap();

        let err = service.settle("bob").await.unwrap_err();
        assert!(matches!(
            err,
            TradeError::MissingItem { required: 1, available: 0, .. }
        ));

        // Nothing was duplicated and no coins changed hands
        assert!(service
            .inventory
            .get_entry("bob", &ItemKey::plain("Sword"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(service.accounts.get("bob").await.unwrap().unwrap().currency, 40);
        assert!(service.trades.get_active("alice").await.unwrap().is_some());
    }
}
