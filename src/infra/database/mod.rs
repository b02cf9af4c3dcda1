// Database handle and schema bootstrap.
//
// One pool per process, opened explicitly at startup and closed at
// shutdown. Every SQLite store receives a clone of the pool.

use crate::core::StoreError;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Starter chest catalog: (name, price, rank required, description).
const SEED_CHESTS: [(&str, i64, &str, &str); 3] = [
    ("Normal", 2500, "normal", "Basic chest with common items"),
    ("Member", 5000, "member", "Improved chest with rare items"),
    ("Ultra VIP", 15000, "vip", "Premium chest with special coupons"),
];

const SCHEMA: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        currency INTEGER NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        experience INTEGER NOT NULL DEFAULT 0,
        rank TEXT NOT NULL DEFAULT 'normal',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        last_work TEXT,
        last_crime TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id TEXT NOT NULL,
        item_name TEXT NOT NULL,
        item_type TEXT NOT NULL,
        rarity TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        is_fused INTEGER NOT NULL DEFAULT 0,
        fused_type TEXT,
        FOREIGN KEY (account_id) REFERENCES accounts(id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_inventory_account_item
    ON inventory(account_id, item_name)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        price INTEGER NOT NULL,
        rank_required TEXT NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shop_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        price INTEGER NOT NULL,
        type TEXT NOT NULL,
        rarity TEXT NOT NULL,
        rank_required TEXT NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS coupons (
        code TEXT PRIMARY KEY,
        amount INTEGER NOT NULL,
        used_by TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        used_at TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trades (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        initiator_id TEXT NOT NULL,
        counterparty_id TEXT NOT NULL,
        initiator_money INTEGER NOT NULL DEFAULT 0,
        counterparty_money INTEGER NOT NULL DEFAULT 0,
        initiator_items TEXT NOT NULL DEFAULT '[]',
        counterparty_items TEXT NOT NULL DEFAULT '[]',
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (initiator_id) REFERENCES accounts(id),
        FOREIGN KEY (counterparty_id) REFERENCES accounts(id)
    )
    "#,
];

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }

        let connection_string = format!("sqlite://{}?mode=rwc", path.display());
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        debug!(path = %path.display(), "Opened economy database");
        Ok(Self { pool })
    }

    /// Private in-memory database. A single connection that never expires,
    /// since every new connection would see an empty database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Database(e.to_string()))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Handle for constructing stores.
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Create all tables if absent and seed the starter chests.
    /// Safe to run on every start: seed rows are never duplicated or overwritten.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        let mut seeded = 0;
        for (name, price, rank, description) in SEED_CHESTS {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO chests (name, price, rank_required, description)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(name)
            .bind(price)
            .bind(rank)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
            seeded += result.rows_affected();
        }

        info!(seeded_chests = seeded, "Economy database initialized");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Parse a timestamp written by SQLite's `CURRENT_TIMESTAMP` (UTC,
/// `YYYY-MM-DD HH:MM:SS`). RFC 3339 strings are accepted too.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| StoreError::CorruptRow(format!("invalid timestamp {raw:?}")))
}

pub(crate) fn parse_optional_timestamp(
    raw: Option<String>,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    raw.as_deref().map(parse_timestamp).transpose()
}

/// Fresh, initialized database in a temporary directory.
#[cfg(test)]
pub(crate) async fn test_database() -> (tempfile::TempDir, Database) {
    let dir = tempfile::TempDir::new().unwrap();
    let db = Database::open(dir.path().join("economy.db")).await.unwrap();
    db.initialize().await.unwrap();
    (dir, db)
}
