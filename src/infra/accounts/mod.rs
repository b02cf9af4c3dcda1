// Account store implementations.

mod in_memory;
mod sqlite_account_store;

pub use in_memory::InMemoryAccountStore;
pub use sqlite_account_store::SqliteAccountStore;
