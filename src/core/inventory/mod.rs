// Inventory module - stackable items held by accounts

mod inventory_models;
mod inventory_store;

pub use inventory_models::{InventoryEntry, ItemKey};
pub use inventory_store::InventoryStore;
