// SQLite implementation of CatalogStore. Read-only: chests are seeded at
// bootstrap, shop items are populated outside this crate.

use crate::core::catalog::{CatalogStore, Chest, ShopItem};
use crate::core::StoreError;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_chest(row: &SqliteRow) -> Chest {
    Chest {
        name: row.get("name"),
        price: row.get::<i64, _>("price"),
        rank_required: row.get("rank_required"),
        description: row.get("description"),
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn list_chests(&self) -> Result<Vec<Chest>, StoreError> {
        let rows = sqlx::query("SELECT * FROM chests ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.iter().map(row_to_chest).collect())
    }

    async fn get_chest(&self, name: &str) -> Result<Option<Chest>, StoreError> {
        let row = sqlx::query("SELECT * FROM chests WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(row.as_ref().map(row_to_chest))
    }

    async fn list_shop_items(&self) -> Result<Vec<ShopItem>, StoreError> {
        let rows = sqlx::query("SELECT * FROM shop_items ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| ShopItem {
                name: row.get("name"),
                price: row.get::<i64, _>("price"),
                item_type: row.get("type"),
                rarity: row.get("rarity"),
                rank_required: row.get("rank_required"),
                description: row.get("description"),
            })
            .collect())
    }
}
