//! Point redemption catalog.
//!
//! Orders are recorded locally as `Pending`; fulfillment belongs to a remote
//! backend, if one exists.

use crate::error::{GameError, GameResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShopItem {
    OoredooRecharge,
    MobilisRecharge,
    UsdtExchange,
}

impl ShopItem {
    pub const ALL: [ShopItem; 3] =
        [ShopItem::OoredooRecharge, ShopItem::MobilisRecharge, ShopItem::UsdtExchange];

    pub fn points_cost(self) -> f64 {
        match self {
            ShopItem::OoredooRecharge | ShopItem::MobilisRecharge => 500.0,
            ShopItem::UsdtExchange => 1000.0,
        }
    }

    /// Minimum recipient length: phone numbers for recharges, a Binance id
    /// for the USDT exchange.
    pub fn min_recipient_len(self) -> usize {
        match self {
            ShopItem::OoredooRecharge | ShopItem::MobilisRecharge => 8,
            ShopItem::UsdtExchange => 5,
        }
    }

    pub fn recipient_label(self) -> &'static str {
        match self {
            ShopItem::OoredooRecharge | ShopItem::MobilisRecharge => "phone number",
            ShopItem::UsdtExchange => "Binance ID",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShopItem::OoredooRecharge => "Ooredoo Recharge",
            ShopItem::MobilisRecharge => "Mobilis Recharge",
            ShopItem::UsdtExchange => "USDT Exchange",
        }
    }

    /// Trimmed recipient, or [`GameError::InvalidRedemption`].
    pub fn validate_recipient(self, recipient: &str) -> GameResult<String> {
        let recipient = recipient.trim();
        if recipient.chars().count() < self.min_recipient_len() {
            return Err(GameError::InvalidRedemption(format!(
                "{} needs a {} of at least {} characters",
                self.display_name(),
                self.recipient_label(),
                self.min_recipient_len()
            )));
        }
        Ok(recipient.to_string())
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ShopItem {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ooredoo" | "ooredoo_recharge" => Ok(ShopItem::OoredooRecharge),
            "mobilis" | "mobilis_recharge" => Ok(ShopItem::MobilisRecharge),
            "usdt" | "usdt_exchange" => Ok(ShopItem::UsdtExchange),
            other => Err(GameError::InvalidRedemption(format!("unknown shop item '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOrder {
    pub id: Uuid,
    pub item: ShopItem,
    pub recipient: String,
    pub points_cost: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl ShopOrder {
    pub fn new(item: ShopItem, recipient: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            recipient,
            points_cost: item.points_cost(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices() {
        assert_eq!(ShopItem::OoredooRecharge.points_cost(), 500.0);
        assert_eq!(ShopItem::MobilisRecharge.points_cost(), 500.0);
        assert_eq!(ShopItem::UsdtExchange.points_cost(), 1000.0);
    }

    #[test]
    fn test_recipient_validation() {
        assert_eq!(
            ShopItem::OoredooRecharge.validate_recipient(" 0555123456 ").unwrap(),
            "0555123456"
        );
        assert!(ShopItem::MobilisRecharge.validate_recipient("0555").is_err());
        assert!(ShopItem::UsdtExchange.validate_recipient("12345").is_ok());
        assert!(ShopItem::UsdtExchange.validate_recipient("1234").is_err());
    }

    #[test]
    fn test_parse_item_names() {
        assert_eq!("usdt".parse::<ShopItem>().unwrap(), ShopItem::UsdtExchange);
        assert_eq!("Ooredoo".parse::<ShopItem>().unwrap(), ShopItem::OoredooRecharge);
        assert!("gift".parse::<ShopItem>().is_err());
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = ShopOrder::new(ShopItem::UsdtExchange, "binance-1".into());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.points_cost, 1000.0);

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"item\":\"usdt_exchange\""));
        assert!(json.contains("\"pointsCost\""));
    }
}
