// SQLite implementation of TradeStore
//
// Item offers are stored as JSON arrays in the initiator_items and
// counterparty_items columns.

use crate::core::trades::{Trade, TradeItem, TradeOffer, TradeStatus, TradeStore};
use crate::core::StoreError;
use crate::infra::database::parse_timestamp;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

pub struct SqliteTradeStore {
    pool: SqlitePool,
}

impl SqliteTradeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_items(raw: Option<String>) -> Result<Vec<TradeItem>, StoreError> {
    match raw.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

fn row_to_trade(row: &SqliteRow) -> Result<Trade, StoreError> {
    let status: String = row.get("status");
    let status = TradeStatus::parse(&status)
        .ok_or_else(|| StoreError::CorruptRow(format!("unknown trade status {status:?}")))?;
    let created_at: String = row.get("created_at");

    Ok(Trade {
        id: row.get("id"),
        initiator_id: row.get("initiator_id"),
        counterparty_id: row.get("counterparty_id"),
        offer: TradeOffer {
            initiator_money: row.get::<i64, _>("initiator_money"),
            counterparty_money: row.get::<i64, _>("counterparty_money"),
            initiator_items: parse_items(row.get("initiator_items"))?,
            counterparty_items: parse_items(row.get("counterparty_items"))?,
        },
        status,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[async_trait]
impl TradeStore for SqliteTradeStore {
    async fn propose(&self, initiator_id: &str, counterparty_id: &str) -> Result<i64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // Pending trades that merely involve the counterparty are left alone
        sqlx::query(
            r#"
            DELETE FROM trades
            WHERE (initiator_id = ? OR counterparty_id = ?) AND status = ?
            "#,
        )
        .bind(initiator_id)
        .bind(initiator_id)
        .bind(TradeStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO trades (initiator_id, counterparty_id, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(initiator_id)
        .bind(counterparty_id)
        .bind(TradeStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }

    async fn get_active(&self, account_id: &str) -> Result<Option<Trade>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM trades
            WHERE (initiator_id = ? OR counterparty_id = ?) AND status = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .bind(account_id)
        .bind(TradeStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.as_ref().map(row_to_trade).transpose()
    }

    async fn get(&self, trade_id: i64) -> Result<Option<Trade>, StoreError> {
        let row = sqlx::query("SELECT * FROM trades WHERE id = ?")
            .bind(trade_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.as_ref().map(row_to_trade).transpose()
    }

    async fn update_offer(&self, trade_id: i64, offer: &TradeOffer) -> Result<bool, StoreError> {
        let initiator_items = serde_json::to_string(&offer.initiator_items)?;
        let counterparty_items = serde_json::to_string(&offer.counterparty_items)?;

        let result = sqlx::query(
            r#"
            UPDATE trades
            SET initiator_money = ?, counterparty_money = ?,
                initiator_items = ?, counterparty_items = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(offer.initiator_money)
        .bind(offer.counterparty_money)
        .bind(initiator_items)
        .bind(counterparty_items)
        .bind(trade_id)
        .bind(TradeStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn complete(&self, trade_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE trades SET status = ? WHERE id = ? AND status = ?")
            .bind(TradeStatus::Completed.as_str())
            .bind(trade_id)
            .bind(TradeStatus::Pending.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn cancel(&self, account_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM trades
            WHERE (initiator_id = ? OR counterparty_id = ?) AND status = ?
            "#,
        )
        .bind(account_id)
        .bind(account_id)
        .bind(TradeStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accounts::AccountStore;
    use crate::core::inventory::ItemKey;
    use crate::infra::accounts::SqliteAccountStore;
    use crate::infra::database::{test_database, Database};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Database, SqliteTradeStore) {
        let (dir, db) = test_database().await;
        let accounts = SqliteAccountStore::new(db.pool());
        for id in ["alice", "bob", "carol", "dave"] {
            accounts.register(id).await.unwrap();
        }
        let store = SqliteTradeStore::new(db.pool());
        (dir, db, store)
    }

    #[tokio::test]
    async fn test_propose_creates_empty_pending_trade() {
        let (_dir, _db, store) = setup().await;
        let id = store.propose("alice", "bob").await.unwrap();

        let trade = store.get_active("bob").await.unwrap().unwrap();
        assert_eq!(trade.id, id);
        assert_eq!(trade.initiator_id, "alice");
        assert_eq!(trade.counterparty_id, "bob");
        assert_eq!(trade.status, TradeStatus::Pending);
        assert_eq!(trade.offer, TradeOffer::default());
        assert!(trade.involves("alice"));
        assert!(!trade.involves("carol"));
    }

    #[tokio::test]
    async fn test_new_proposal_replaces_initiators_pending_trade() {
        let (_dir, _db, store) = setup().await;
        let old = store.propose("alice", "bob").await.unwrap();
        let new = store.propose("alice", "carol").await.unwrap();
        assert_ne!(old, new);

        let active = store.get_active("alice").await.unwrap().unwrap();
        assert_eq!(active.id, new);
        assert!(store.get(old).await.unwrap().is_none());
        assert!(store.get_active("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_proposal_clears_trade_where_initiator_was_counterparty() {
        let (_dir, _db, store) = setup().await;
        let old = store.propose("bob", "alice").await.unwrap();
        store.propose("alice", "carol").await.unwrap();

        assert!(store.get(old).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_counterparty_pending_trade_is_not_cleared() {
        let (_dir, _db, store) = setup().await;
        let first = store.propose("bob", "carol").await.unwrap();
        let second = store.propose("alice", "bob").await.unwrap();

        // bob now sits in two pending trades; the newest is reported
        assert!(store.get(first).await.unwrap().is_some());
        assert_eq!(store.get_active("bob").await.unwrap().unwrap().id, second);
        assert_eq!(store.get_active("carol").await.unwrap().unwrap().id, first);
    }

    #[tokio::test]
    async fn test_update_offer_replaces_whole_offer() {
        let (_dir, _db, store) = setup().await;
        let id = store.propose("alice", "bob").await.unwrap();

        let offer = TradeOffer {
            initiator_money: 100,
            counterparty_money: 0,
            initiator_items: vec![TradeItem::new(ItemKey::fused("Sword", "fire"), 1)],
            counterparty_items: vec![TradeItem::new(ItemKey::plain("Potion"), 3)],
        };
        assert!(store.update_offer(id, &offer).await.unwrap());
        assert_eq!(store.get(id).await.unwrap().unwrap().offer, offer);

        let replacement = TradeOffer {
            counterparty_money: 20,
            ..TradeOffer::default()
        };
        assert!(store.update_offer(id, &replacement).await.unwrap());
        assert_eq!(store.get(id).await.unwrap().unwrap().offer, replacement);

        assert!(!store.update_offer(9999, &offer).await.unwrap());
    }

    #[tokio::test]
    async fn test_complete_transitions_status() {
        let (_dir, _db, store) = setup().await;
        let id = store.propose("alice", "bob").await.unwrap();

        assert!(store.complete(id).await.unwrap());
        assert!(!store.complete(id).await.unwrap());

        let trade = store.get(id).await.unwrap().unwrap();
        assert_eq!(trade.status, TradeStatus::Completed);
        assert!(store.get_active("alice").await.unwrap().is_none());

        // Completed trades are history: cancel and offers leave them alone
        assert!(!store.cancel("alice").await.unwrap());
        assert!(!store.update_offer(id, &TradeOffer::default()).await.unwrap());
        assert!(store.get(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cancel_from_either_side() {
        let (_dir, _db, store) = setup().await;
        let id = store.propose("alice", "bob").await.unwrap();

        assert!(store.cancel("bob").await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.cancel("alice").await.unwrap());
        assert!(!store.cancel("dave").await.unwrap());
    }

    #[tokio::test]
    async fn test_propose_with_unregistered_account_is_a_storage_error() {
        let (_dir, _db, store) = setup().await;
        let result = store.propose("alice", "ghost").await;
        assert!(matches!(result, Err(StoreError::Database(_))));
        assert!(store.get_active("alice").await.unwrap().is_none());
    }
}
