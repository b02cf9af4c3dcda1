// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "database/mod.rs"]
pub mod database;

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
