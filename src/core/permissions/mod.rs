// Permissions module - rank capabilities and chest-tier ordering

mod permission_resolver;
mod rank_config;

pub use permission_resolver::{PermissionResolver, Rank, WILDCARD_PERMISSION};
pub use rank_config::{RankConfigError, RankDefinition, RanksConfig, DEFAULT_RANK_KEY};
