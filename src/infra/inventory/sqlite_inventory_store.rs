// SQLite implementation of InventoryStore
//
// Stack-or-insert and decrement-or-delete are two statements each; callers
// serialize commands per account.

use crate::core::inventory::{InventoryEntry, InventoryStore, ItemKey};
use crate::core::StoreError;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Create a new inventory store using an existing SQLite pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &SqliteRow) -> InventoryEntry {
    InventoryEntry {
        id: row.get("id"),
        account_id: row.get("account_id"),
        name: row.get("item_name"),
        item_type: row.get("item_type"),
        rarity: row.get("rarity"),
        quantity: row.get::<i64, _>("quantity"),
        fused: row.get::<i64, _>("is_fused") != 0,
        fused_type: row.get("fused_type"),
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    async fn add_item(
        &self,
        account_id: &str,
        key: &ItemKey,
        item_type: &str,
        rarity: &str,
        quantity: i64,
    ) -> Result<(), StoreError> {
        if quantity <= 0 {
            return Ok(());
        }

        // `IS` rather than `=` so a missing fused type stacks with itself
        let existing = sqlx::query(
            r#"
            SELECT id FROM inventory
            WHERE account_id = ? AND item_name = ? AND is_fused = ? AND fused_type IS ?
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .bind(&key.name)
        .bind(key.fused)
        .bind(key.fused_type.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        if let Some(row) = existing {
            let id: i64 = row.get("id");
            sqlx::query("UPDATE inventory SET quantity = quantity + ? WHERE id = ?")
                .bind(quantity)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO inventory
                    (account_id, item_name, item_type, rarity, quantity, is_fused, fused_type)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(account_id)
            .bind(&key.name)
            .bind(item_type)
            .bind(rarity)
            .bind(quantity)
            .bind(key.fused)
            .bind(key.fused_type.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        Ok(())
    }

    async fn remove_item(
        &self,
        account_id: &str,
        key: &ItemKey,
        quantity: i64,
    ) -> Result<bool, StoreError> {
        if quantity <= 0 {
            return Ok(false);
        }

        // Loose match: exact fused type, or an entry without one.
        // Exact matches sort first.
        let row = sqlx::query(
            r#"
            SELECT id, quantity FROM inventory
            WHERE account_id = ? AND item_name = ? AND is_fused = ?
              AND (fused_type = ? OR fused_type IS NULL)
            ORDER BY fused_type IS NULL, id
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .bind(&key.name)
        .bind(key.fused)
        .bind(key.fused_type.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(false);
        };
        let id: i64 = row.get("id");
        let held: i64 = row.get("quantity");

        if held > quantity {
            sqlx::query("UPDATE inventory SET quantity = quantity - ? WHERE id = ?")
                .bind(quantity)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        } else {
            // Empty stacks never persist
            sqlx::query("DELETE FROM inventory WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        Ok(true)
    }

    async fn get_entry(
        &self,
        account_id: &str,
        key: &ItemKey,
    ) -> Result<Option<InventoryEntry>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM inventory
            WHERE account_id = ? AND item_name = ? AND is_fused = ? AND fused_type IS ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(account_id)
        .bind(&key.name)
        .bind(key.fused)
        .bind(key.fused_type.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.as_ref().map(row_to_entry))
    }

    async fn list(&self, account_id: &str) -> Result<Vec<InventoryEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM inventory
            WHERE account_id = ?
            ORDER BY rarity DESC, item_name ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.iter().map(row_to_entry).collect())
    }
}
