use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::entity::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChannel {
    Web,
    Retail,
    Phone,
}

impl OrderChannel {
    pub const ALL: [OrderChannel; 3] = [OrderChannel::Web, OrderChannel::Retail, OrderChannel::Phone];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Fulfilled,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Placed,
        OrderStatus::Fulfilled,
        OrderStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub account_id: i64,
    pub order_number: String,
    pub channel: OrderChannel,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    /// Sum of `quantity * unit_price_cents` over the order's items.
    pub total_cents: i64,
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;
    const COLUMNS: &'static [&'static str] = &[
        "order_id",
        "account_id",
        "order_number",
        "channel",
        "status",
        "placed_at",
        "total_cents",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.order_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_item_id: i64,
    pub order_id: i64,
    pub sku: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.quantity * self.unit_price_cents
    }
}

impl Entity for OrderItem {
    const KIND: EntityKind = EntityKind::OrderItem;
    const COLUMNS: &'static [&'static str] = &[
        "order_item_id",
        "order_id",
        "sku",
        "description",
        "quantity",
        "unit_price_cents",
    ];
    type Key = i64;

    fn key(&self) -> i64 {
        self.order_item_id
    }
}
