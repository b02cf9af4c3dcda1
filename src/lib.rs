// Persistence and authorization core for a chat-bot economy game.
//
// **Architecture Overview:**
// - `core/` = Domain models, store traits and services (storage-agnostic)
// - `infra/` = Implementations of core traits (SQLite, in-memory)
// - `config/` = Process configuration loaded from the environment
//
// Command handlers live outside this crate: they register/look up the
// account, ask the permission resolver, then call the relevant store.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "config/app_config.rs"]
pub mod config;
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;

pub use crate::config::{AppConfig, ConfigError};
pub use crate::core::StoreError;
pub use crate::infra::database::Database;
