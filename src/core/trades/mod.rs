// Trade module - two-party currency/item exchanges

mod trade_models;
mod trade_service;
mod trade_store;

pub use trade_models::{Trade, TradeItem, TradeOffer, TradeStatus};
pub use trade_service::{TradeError, TradeService};
pub use trade_store::TradeStore;
