// Rank configuration - which permissions each rank carries.
//
// Supplied as external data keyed by rank identifier. A "default" entry is
// mandatory: unknown ranks resolve to it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Rank every unconfigured rank falls back to.
pub const DEFAULT_RANK_KEY: &str = "default";

#[derive(Debug, Error)]
pub enum RankConfigError {
    #[error("Rank configuration has no \"default\" rank")]
    MissingDefault,

    #[error("Failed to read rank configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid rank configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankDefinition {
    /// Human readable rank name.
    pub name: String,
    pub permissions: Vec<String>,
}

impl RankDefinition {
    fn new(name: &str, permissions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
struct RanksFile {
    ranks: HashMap<String, RankDefinition>,
}

/// Validated rank table. Always contains the default rank.
#[derive(Debug, Clone)]
pub struct RanksConfig {
    ranks: HashMap<String, RankDefinition>,
    default: RankDefinition,
}

impl RanksConfig {
    pub fn new(ranks: HashMap<String, RankDefinition>) -> Result<Self, RankConfigError> {
        let default = ranks
            .get(DEFAULT_RANK_KEY)
            .cloned()
            .ok_or(RankConfigError::MissingDefault)?;
        Ok(Self { ranks, default })
    }

    /// Parse `{"ranks": {"<id>": {"name": ..., "permissions": [...]}}}`.
    pub fn from_json(json: &str) -> Result<Self, RankConfigError> {
        let file: RanksFile = serde_json::from_str(json)?;
        Self::new(file.ranks)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RankConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Definition for `rank`, or the default rank when it isn't configured.
    pub fn resolve(&self, rank: &str) -> &RankDefinition {
        self.ranks.get(rank).unwrap_or(&self.default)
    }

    pub fn is_configured(&self, rank: &str) -> bool {
        self.ranks.contains_key(rank)
    }
}

impl Default for RanksConfig {
    fn default() -> Self {
        let player = [
            "balance",
            "profile",
            "work",
            "crime",
            "inventory",
            "chest",
            "trade",
            "coupon",
            "leaderboard",
        ];
        let member: Vec<&str> = player.iter().copied().chain(["fuse"]).collect();
        let vip: Vec<&str> = member.iter().copied().chain(["vip_chest"]).collect();

        let default = RankDefinition::new("Guest", &["balance", "profile", "work"]);
        let ranks = HashMap::from([
            (DEFAULT_RANK_KEY.to_string(), default.clone()),
            ("normal".to_string(), RankDefinition::new("Normal", &player)),
            ("member".to_string(), RankDefinition::new("Member", &member)),
            ("vip".to_string(), RankDefinition::new("VIP", &vip)),
            ("admin".to_string(), RankDefinition::new("Admin", &["all"])),
        ]);

        Self { ranks, default }
    }
}
