// Permission resolver - pure functions, no storage access.
//
// Two independent data sources:
// - the configured rank table (rank -> permission set)
// - the fixed tier ordering used for chest access

use super::{RankDefinition, RanksConfig};
use serde::{Deserialize, Serialize};

/// A permission set containing this grants everything.
pub const WILDCARD_PERMISSION: &str = "all";

/// Rank tiers in ascending order. The derived `Ord` is the tier ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Default,
    Normal,
    Member,
    Vip,
    Admin,
}

impl Rank {
    pub const HIERARCHY: [Rank; 5] = [
        Rank::Default,
        Rank::Normal,
        Rank::Member,
        Rank::Vip,
        Rank::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Default => "default",
            Rank::Normal => "normal",
            Rank::Member => "member",
            Rank::Vip => "vip",
            Rank::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::HIERARCHY.into_iter().find(|rank| rank.as_str() == s)
    }

    /// Position in the tier ordering; -1 for unrecognized identifiers.
    pub fn position(s: &str) -> i32 {
        Self::parse(s).map(|rank| rank as i32).unwrap_or(-1)
    }
}

pub struct PermissionResolver {
    ranks: RanksConfig,
}

impl PermissionResolver {
    pub fn new(ranks: RanksConfig) -> Self {
        Self { ranks }
    }

    /// Whether `rank` grants `permission`. Unconfigured ranks use the
    /// default rank's set.
    pub fn has_permission(&self, rank: &str, permission: &str) -> bool {
        let permissions = &self.ranks.resolve(rank).permissions;
        permissions
            .iter()
            .any(|p| p == WILDCARD_PERMISSION || p == permission)
    }

    pub fn rank_display_name(&self, rank: &str) -> &str {
        &self.ranks.resolve(rank).name
    }

    pub fn rank_permission_set(&self, rank: &str) -> &[String] {
        &self.ranks.resolve(rank).permissions
    }

    pub fn rank_definition(&self, rank: &str) -> &RankDefinition {
        self.ranks.resolve(rank)
    }

    /// Whether `user_rank` is at or above `chest_rank` in the tier ordering.
    /// Unrecognized ranks sit below every known tier.
    pub fn can_access_chest(user_rank: &str, chest_rank: &str) -> bool {
        Rank::position(user_rank) >= Rank::position(chest_rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PermissionResolver {
        PermissionResolver::new(RanksConfig::default())
    }

    #[test]
    fn test_has_permission_literal_membership() {
        let resolver = resolver();
        assert!(resolver.has_permission("normal", "crime"));
        assert!(!resolver.has_permission("normal", "fuse"));
        assert!(resolver.has_permission("member", "fuse"));
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let resolver = resolver();
        assert!(resolver.has_permission("admin", "anything_at_all"));
    }

    #[test]
    fn test_unknown_rank_falls_back_to_default() {
        let resolver = resolver();
        assert!(resolver.has_permission("unknown_rank", "work"));
        assert!(!resolver.has_permission("unknown_rank", "trade"));
        assert_eq!(resolver.rank_display_name("unknown_rank"), "Guest");
        assert_eq!(
            resolver.rank_permission_set("unknown_rank"),
            resolver.rank_permission_set("default")
        );
    }

    #[test]
    fn test_display_name() {
        let resolver = resolver();
        assert_eq!(resolver.rank_display_name("vip"), "VIP");
        assert_eq!(resolver.rank_definition("member").name, "Member");
    }

    #[test]
    fn test_chest_access_ordering() {
        assert!(!PermissionResolver::can_access_chest("member", "vip"));
        assert!(PermissionResolver::can_access_chest("vip", "member"));
        assert!(PermissionResolver::can_access_chest("vip", "vip"));
        assert!(PermissionResolver::can_access_chest("admin", "default"));
        assert!(!PermissionResolver::can_access_chest("bogus", "normal"));
        assert!(!PermissionResolver::can_access_chest("bogus", "default"));
    }

    #[test]
    fn test_rank_positions() {
        assert_eq!(Rank::position("default"), 0);
        assert_eq!(Rank::position("admin"), 4);
        assert_eq!(Rank::position("VIP"), -1);
        assert!(Rank::Member < Rank::Vip);
        assert_eq!(Rank::parse("vip"), Some(Rank::Vip));
    }
}
