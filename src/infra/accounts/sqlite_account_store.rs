// SQLite implementation of the AccountStore trait

use crate::core::accounts::{Account, AccountStore};
use crate::core::StoreError;
use crate::infra::database::{parse_optional_timestamp, parse_timestamp};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;

pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a single-row UPDATE keyed by account id and report whether it applied.
    async fn update<'q>(
        &self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> Result<bool, StoreError> {
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_account(row: &SqliteRow) -> Result<Account, StoreError> {
    let created_at: String = row.get("created_at");

    Ok(Account {
        id: row.get("id"),
        currency: row.get::<i64, _>("currency"),
        level: row.get::<i64, _>("level"),
        experience: row.get::<i64, _>("experience"),
        rank: row.get("rank"),
        created_at: parse_timestamp(&created_at)?,
        last_work: parse_optional_timestamp(row.get("last_work"))?,
        last_crime: parse_optional_timestamp(row.get("last_crime"))?,
    })
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn register(&self, id: &str) -> Result<bool, StoreError> {
        self.update(sqlx::query("INSERT OR IGNORE INTO accounts (id) VALUES (?)").bind(id))
            .await
    }

    async fn get(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn adjust_currency(&self, id: &str, delta: i64) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET currency = currency + ? WHERE id = ?")
                .bind(delta)
                .bind(id),
        )
        .await
    }

    async fn set_currency(&self, id: &str, amount: i64) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET currency = ? WHERE id = ?")
                .bind(amount)
                .bind(id),
        )
        .await
    }

    async fn add_experience(&self, id: &str, amount: i64) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET experience = experience + ? WHERE id = ?")
                .bind(amount)
                .bind(id),
        )
        .await
    }

    async fn set_level(&self, id: &str, level: i64) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET level = ?, experience = 0 WHERE id = ?")
                .bind(level)
                .bind(id),
        )
        .await
    }

    async fn mark_work_cooldown(&self, id: &str) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET last_work = CURRENT_TIMESTAMP WHERE id = ?").bind(id),
        )
        .await
    }

    async fn mark_crime_cooldown(&self, id: &str) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET last_crime = CURRENT_TIMESTAMP WHERE id = ?").bind(id),
        )
        .await
    }

    async fn set_rank(&self, id: &str, rank: &str) -> Result<bool, StoreError> {
        self.update(
            sqlx::query("UPDATE accounts SET rank = ? WHERE id = ?")
                .bind(rank)
                .bind(id),
        )
        .await
    }

    async fn top_accounts(&self, limit: usize) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query("SELECT * FROM accounts ORDER BY currency DESC, id ASC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.iter().map(row_to_account).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::test_database;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());

        assert!(store.register("5551234").await.unwrap());
        store.set_currency("5551234", 300).await.unwrap();

        // Second registration is a no-op, not an error
        assert!(!store.register("5551234").await.unwrap());

        let account = store.get("5551234").await.unwrap().unwrap();
        assert_eq!(account.currency, 300);
        assert_eq!(account.level, 1);
        assert_eq!(account.experience, 0);
        assert_eq!(account.rank, "normal");
        assert!(account.last_work.is_none());
    }

    #[tokio::test]
    async fn test_missing_account() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());

        assert!(store.get("nobody").await.unwrap().is_none());
        assert!(!store.adjust_currency("nobody", 10).await.unwrap());
        assert!(!store.set_level("nobody", 2).await.unwrap());
        assert!(!store.mark_work_cooldown("nobody").await.unwrap());
        assert!(!store.set_rank("nobody", "vip").await.unwrap());
    }

    #[tokio::test]
    async fn test_currency_is_not_clamped() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());
        store.register("a").await.unwrap();

        assert!(store.adjust_currency("a", 50).await.unwrap());
        assert!(store.adjust_currency("a", -80).await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap().currency, -30);

        assert!(store.set_currency("a", 7).await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap().currency, 7);
    }

    #[tokio::test]
    async fn test_set_level_resets_experience() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());
        store.register("a").await.unwrap();

        store.add_experience("a", 40).await.unwrap();
        store.add_experience("a", 25).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().unwrap().experience, 65);

        assert!(store.set_level("a", 2).await.unwrap());
        let account = store.get("a").await.unwrap().unwrap();
        assert_eq!(account.level, 2);
        assert_eq!(account.experience, 0);
    }

    #[tokio::test]
    async fn test_cooldown_stamps() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());
        store.register("a").await.unwrap();

        assert!(store.mark_work_cooldown("a").await.unwrap());
        let account = store.get("a").await.unwrap().unwrap();
        let stamped = account.last_work.unwrap();
        assert!(account.last_crime.is_none());
        // Engine clock and ours should agree to within a minute
        assert!((Utc::now() - stamped).num_seconds().abs() < 60);
        assert!(account
            .work_cooldown_remaining(Duration::hours(1), Utc::now())
            .is_some());

        assert!(store.mark_crime_cooldown("a").await.unwrap());
        assert!(store.get("a").await.unwrap().unwrap().last_crime.is_some());
    }

    #[tokio::test]
    async fn test_set_rank() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());
        store.register("a").await.unwrap();

        assert!(store.set_rank("a", "vip").await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap().rank, "vip");
    }

    #[tokio::test]
    async fn test_top_accounts_ordering() {
        let (_dir, db) = test_database().await;
        let store = SqliteAccountStore::new(db.pool());

        for i in 0..12 {
            let id = format!("user{:02}", i);
            store.register(&id).await.unwrap();
            store.set_currency(&id, (i % 4) * 100).await.unwrap();
        }

        let top = store.top_accounts(10).await.unwrap();
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].currency >= w[1].currency));
        // Ties are broken by id
        assert_eq!(top[0].id, "user03");
        assert_eq!(top[1].id, "user07");
        assert_eq!(top[2].id, "user11");
    }
}
