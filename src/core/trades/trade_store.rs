use super::{Trade, TradeOffer};
use crate::core::StoreError;
use async_trait::async_trait;

/// Trait for persisting trades.
///
/// At most one pending trade per account is the intent. `propose` only
/// clears trades involving the initiator, so a counterparty already in a
/// pending trade may end up in two; `get_active` then returns the newest.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Delete any pending trade involving the initiator, then open a new
    /// pending trade with an empty offer. Returns the new trade id.
    /// Both parties must be registered accounts; the SQLite store rejects
    /// unknown ids with a `StoreError`.
    async fn propose(&self, initiator_id: &str, counterparty_id: &str) -> Result<i64, StoreError>;

    /// Pending trade where the account is either party.
    async fn get_active(&self, account_id: &str) -> Result<Option<Trade>, StoreError>;

    async fn get(&self, trade_id: i64) -> Result<Option<Trade>, StoreError>;

    /// Replace the whole offer of a pending trade.
    async fn update_offer(&self, trade_id: i64, offer: &TradeOffer) -> Result<bool, StoreError>;

    /// Mark a pending trade completed. Moves nothing between accounts.
    async fn complete(&self, trade_id: i64) -> Result<bool, StoreError>;

    /// Delete every pending trade involving the account, on either side.
    /// Returns false when there was none.
    async fn cancel(&self, account_id: &str) -> Result<bool, StoreError>;
}
