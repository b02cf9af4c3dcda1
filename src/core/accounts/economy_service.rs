// Economy service - currency rules layered over an AccountStore.
//
// The store performs no validation (negative balances are possible through
// it). This service is where balance checks live for the common flows.

use super::{Account, AccountStore};
use crate::core::StoreError;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds: need {required} coins, but only have {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Cannot transfer coins to the same account")]
    SelfTransfer,

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct EconomyConfig {
    /// How many accounts the leaderboard shows.
    pub leaderboard_size: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: 10,
        }
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Generic over S: AccountStore so we can swap implementations.
pub struct EconomyService<S: AccountStore> {
    store: S,
    config: EconomyConfig,
}

impl<S: AccountStore> EconomyService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: EconomyConfig::default(),
        }
    }

    pub fn new_with_config(store: S, config: EconomyConfig) -> Self {
        Self { store, config }
    }

    /// Direct access to the underlying store for operations that need no rules.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register an account on first interaction. Safe to call on every command.
    pub async fn register(&self, id: &str) -> Result<bool, EconomyError> {
        let created = self.store.register(id).await?;
        if created {
            info!(account_id = id, "Registered new account");
        }
        Ok(created)
    }

    pub async fn account(&self, id: &str) -> Result<Account, EconomyError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EconomyError::AccountNotFound(id.to_string()))
    }

    /// Credit coins and return the new balance.
    pub async fn award(&self, id: &str, amount: i64) -> Result<i64, EconomyError> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }
        if !self.store.adjust_currency(id, amount).await? {
            return Err(EconomyError::AccountNotFound(id.to_string()));
        }
        debug!(account_id = id, amount, "Awarded coins");
        Ok(self.account(id).await?.currency)
    }

    /// Debit coins after checking the balance covers them. Returns the new balance.
    pub async fn spend(&self, id: &str, amount: i64) -> Result<i64, EconomyError> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }
        let account = self.account(id).await?;
        if account.currency < amount {
            return Err(EconomyError::InsufficientFunds {
                required: amount,
                available: account.currency,
            });
        }
        self.store.adjust_currency(id, -amount).await?;
        debug!(account_id = id, amount, "Spent coins");
        Ok(account.currency - amount)
    }

    /// Move coins between two accounts. Returns both new balances (from, to).
    pub async fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: i64,
    ) -> Result<(i64, i64), EconomyError> {
        if from == to {
            return Err(EconomyError::SelfTransfer);
        }
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount(amount));
        }

        let sender = self.account(from).await?;
        let receiver = self.account(to).await?;
        if sender.currency < amount {
            return Err(EconomyError::InsufficientFunds {
                required: amount,
                available: sender.currency,
            });
        }

        self.store.adjust_currency(from, -amount).await?;
        self.store.adjust_currency(to, amount).await?;
        info!(from, to, amount, "Transferred coins");

        Ok((sender.currency - amount, receiver.currency + amount))
    }

    /// Richest accounts, sized by configuration.
    pub async fn leaderboard(&self) -> Result<Vec<Account>, EconomyError> {
        Ok(self.store.top_accounts(self.config.leaderboard_size).await?)
    }
}

// ============================================================================
// TESTS
// ============================================================================
