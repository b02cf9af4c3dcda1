use super::Account;
use crate::core::StoreError;
use async_trait::async_trait;

/// Trait for persisting accounts.
///
/// Every mutation reports whether a row was affected. A missing account is
/// `Ok(false)` (or `Ok(None)` for lookups), never an error; only storage
/// failures come back as `Err`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create the account with defaults if absent.
    /// Returns false if it already existed; the existing row is untouched.
    async fn register(&self, id: &str) -> Result<bool, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Add `delta` (may be negative) to the balance. No clamping.
    async fn adjust_currency(&self, id: &str, delta: i64) -> Result<bool, StoreError>;

    async fn set_currency(&self, id: &str, amount: i64) -> Result<bool, StoreError>;

    async fn add_experience(&self, id: &str, amount: i64) -> Result<bool, StoreError>;

    /// Set the level and reset experience to zero in the same write.
    async fn set_level(&self, id: &str, level: i64) -> Result<bool, StoreError>;

    /// Stamp `last_work` with the current time.
    async fn mark_work_cooldown(&self, id: &str) -> Result<bool, StoreError>;

    /// Stamp `last_crime` with the current time.
    async fn mark_crime_cooldown(&self, id: &str) -> Result<bool, StoreError>;

    async fn set_rank(&self, id: &str, rank: &str) -> Result<bool, StoreError>;

    /// Richest accounts first, ties broken by account id.
    async fn top_accounts(&self, limit: usize) -> Result<Vec<Account>, StoreError>;
}
