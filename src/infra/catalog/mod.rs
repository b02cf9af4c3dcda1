mod sqlite_catalog_store;

pub use sqlite_catalog_store::SqliteCatalogStore;
