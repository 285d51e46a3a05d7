//! Domain events
use crate::domain::aggregates::OrderStatus;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Order(OrderEvent),
    Menu(MenuEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderEvent {
    StatusChanged { order_id: String, from: OrderStatus, to: OrderStatus },
    PaymentSettled { order_id: String },
    Cancelled { order_id: String, reason: String, at: DateTime<Utc> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum MenuEvent {
    Added { item_id: u64, name: String },
    Updated { item_id: u64 },
    Deleted { item_id: u64 },
}
