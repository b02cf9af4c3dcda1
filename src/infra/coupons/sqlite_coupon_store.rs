// SQLite implementation of CouponStore

use crate::core::coupons::{Coupon, CouponStore};
use crate::core::StoreError;
use crate::infra::database::{parse_optional_timestamp, parse_timestamp};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

pub struct SqliteCouponStore {
    pool: SqlitePool,
}

impl SqliteCouponStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponStore for SqliteCouponStore {
    async fn create(&self, code: &str, amount: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("INSERT OR IGNORE INTO coupons (code, amount) VALUES (?, ?)")
            .bind(code)
            .bind(amount)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        let row = sqlx::query("SELECT * FROM coupons WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let created_at: String = row.get("created_at");

        Ok(Some(Coupon {
            code: row.get("code"),
            amount: row.get::<i64, _>("amount"),
            used_by: row.get("used_by"),
            created_at: parse_timestamp(&created_at)?,
            used_at: parse_optional_timestamp(row.get("used_at"))?,
        }))
    }

    async fn redeem(&self, code: &str, account_id: &str) -> Result<bool, StoreError> {
        // Check-and-set in one statement: only one concurrent redeemer can win
        let result = sqlx::query(
            r#"
            UPDATE coupons
            SET used_by = ?, used_at = CURRENT_TIMESTAMP
            WHERE code = ? AND used_by IS NULL
            "#,
        )
        .bind(account_id)
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
