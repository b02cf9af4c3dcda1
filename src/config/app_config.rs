// Process configuration.
//
// Values come from the environment (a `.env` file is loaded by the binary
// first). Rank permissions come from an optional JSON file; without one the
// built-in rank table is used.

use crate::core::accounts::EconomyConfig;
use crate::core::permissions::{RankConfigError, RanksConfig};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "data/economy.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Ranks(#[from] RankConfigError),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub ranks: RanksConfig,
    pub economy: EconomyConfig,
}

impl AppConfig {
    /// Read configuration from process environment variables:
    /// `ECONOMY_DB_PATH`, `RANKS_CONFIG_PATH`, `LEADERBOARD_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup("ECONOMY_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let ranks = match lookup("RANKS_CONFIG_PATH") {
            Some(path) => RanksConfig::from_file(path)?,
            None => RanksConfig::default(),
        };

        let mut economy = EconomyConfig::default();
        if let Some(raw) = lookup("LEADERBOARD_SIZE") {
            economy.leaderboard_size = raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "LEADERBOARD_SIZE",
                    value: raw,
                })?;
        }

        Ok(Self {
            database_path,
            ranks,
            economy,
        })
    }
}
