// Catalog module - purchasable containers (chests) and shop items

mod catalog_service;

pub use catalog_service::{CatalogService, CatalogStore, Chest, ShopItem};
