use crate::core::inventory::ItemKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a trade record. Cancelled trades are deleted, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Completed,
}

impl TradeStatus {
    /// Convert status to string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Completed => "completed",
        }
    }

    /// Parse status from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TradeStatus::Pending),
            "completed" => Some(TradeStatus::Completed),
            _ => None,
        }
    }
}

/// One line of an item offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeItem {
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub fused: bool,
    #[serde(default)]
    pub fused_type: Option<String>,
}

impl TradeItem {
    pub fn new(key: ItemKey, quantity: i64) -> Self {
        Self {
            name: key.name,
            quantity,
            fused: key.fused,
            fused_type: key.fused_type,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey {
            name: self.name.clone(),
            fused: self.fused,
            fused_type: self.fused_type.clone(),
        }
    }
}

/// Full offer state of a trade. Updates replace it as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    pub initiator_money: i64,
    pub counterparty_money: i64,
    pub initiator_items: Vec<TradeItem>,
    pub counterparty_items: Vec<TradeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub initiator_id: String,
    pub counterparty_id: String,
    pub offer: TradeOffer,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
}

impl Trade {
    pub fn involves(&self, account_id: &str) -> bool {
        self.initiator_id == account_id || self.counterparty_id == account_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(TradeStatus::Pending.as_str(), "pending");
        assert_eq!(TradeStatus::parse("completed"), Some(TradeStatus::Completed));
        assert_eq!(TradeStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_trade_item_json_defaults_fusion() {
        let items: Vec<TradeItem> =
            serde_json::from_str(r#"[{"name":"Potion","quantity":2}]"#).unwrap();
        assert_eq!(items[0].key(), ItemKey::plain("Potion"));
        assert_eq!(items[0].quantity, 2);
    }
}
