mod sqlite_trade_store;

pub use sqlite_trade_store::SqliteTradeStore;
