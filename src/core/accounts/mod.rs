// Accounts module - per-user economy state (currency, level, experience, rank)

mod account_models;
mod account_store;
mod economy_service;

pub use account_models::{Account, DEFAULT_RANK};
pub use account_store::AccountStore;
pub use economy_service::{EconomyConfig, EconomyError, EconomyService};
