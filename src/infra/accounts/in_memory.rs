// In-memory implementation of AccountStore.
//
// Nothing survives a restart. Useful for tests and throwaway sessions;
// it follows the same contract as the SQLite store (no clamping, false
// for missing accounts, level changes reset experience).

use crate::core::accounts::{Account, AccountStore};
use crate::core::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// **DashMap:**
/// A concurrent HashMap that's safe to use across multiple async tasks
/// without wrapping it in a Mutex.
pub struct InMemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Apply `f` to the account if it exists.
    fn modify(&self, id: &str, f: impl FnOnce(&mut Account)) -> bool {
        match self.accounts.get_mut(id) {
            Some(mut account) => {
                f(account.value_mut());
                true
            }
            None => false,
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn register(&self, id: &str) -> Result<bool, StoreError> {
        match self.accounts.entry(id.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Account::new(id, Utc::now()));
                Ok(true)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(id).map(|account| account.clone()))
    }

    async fn adjust_currency(&self, id: &str, delta: i64) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.currency += delta))
    }

    async fn set_currency(&self, id: &str, amount: i64) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.currency = amount))
    }

    async fn add_experience(&self, id: &str, amount: i64) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.experience += amount))
    }

    async fn set_level(&self, id: &str, level: i64) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| {
            a.level = level;
            a.experience = 0;
        }))
    }

    async fn mark_work_cooldown(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.last_work = Some(Utc::now())))
    }

    async fn mark_crime_cooldown(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.last_crime = Some(Utc::now())))
    }

    async fn set_rank(&self, id: &str, rank: &str) -> Result<bool, StoreError> {
        Ok(self.modify(id, |a| a.rank = rank.to_string()))
    }

    async fn top_accounts(&self, limit: usize) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by(|a, b| b.currency.cmp(&a.currency).then_with(|| a.id.cmp(&b.id)));
        accounts.truncate(limit);
        Ok(accounts)
    }
}
