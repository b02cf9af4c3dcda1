mod sqlite_inventory_store;

pub use sqlite_inventory_store::SqliteInventoryStore;
