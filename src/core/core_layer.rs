// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "store_error.rs"]
mod store_error;

#[path = "accounts/mod.rs"]
pub mod accounts;

#[path = "inventory/mod.rs"]
pub mod inventory;

#[path = "coupons/mod.rs"]
pub mod coupons;

#[path = "trades/mod.rs"]
pub mod trades;

#[path = "catalog/mod.rs"]
pub mod catalog;

#[path = "permissions/mod.rs"]
pub mod permissions;

pub use store_error::StoreError;
