//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use crate::domain::value_objects::{CancelReason, Price, Quantity};
use crate::domain::events::{DomainEvent, OrderEvent};

/// A single customer order tracked from placement to completion or cancellation.
///
/// Fields are private: status, payment status and cancellation metadata only change
/// through [`Order::transition_to`] and [`Order::cancel`], and `total_amount` is always
/// the sum of the line totals.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    id: String,
    customer: Customer,
    items: Vec<LineItem>,
    total_amount: Decimal,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,
    status: OrderStatus,
    order_time: DateTime<Utc>,
    cancellation: Option<Cancellation>,
    events: Vec<DomainEvent>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem { pub name: String, pub quantity: Quantity, pub unit_price: Price }

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: Quantity, unit_price: Price) -> Self {
        Self { name: name.into(), quantity, unit_price }
    }
    pub fn line_total(&self) -> Decimal { self.unit_price.times(self.quantity) }
}

/// Who placed the order and where it goes. Display data only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub student_id: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cancellation { pub reason: CancelReason, pub at: DateTime<Utc> }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus { #[default] Pending, Preparing, Ready, Completed, Cancelled }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaymentStatus { #[default] Pending, Paid }

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaymentMethod { #[default] CashOnDelivery, Online }

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [Self::Pending, Self::Preparing, Self::Ready, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool { matches!(self, Self::Completed | Self::Cancelled) }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = LifecycleError;

    /// Case-insensitive. `delivered` is the fixture-era name for `completed`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "completed" | "delivered" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Pending => "Pending", Self::Paid => "Paid" }
    }
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self { Self::CashOnDelivery => "Cash on Delivery", Self::Online => "Online Payment" }
    }
}

impl Order {
    /// A freshly placed order: `pending`, payment outstanding.
    pub fn new(
        id: impl Into<String>,
        customer: Customer,
        items: Vec<LineItem>,
        payment_method: PaymentMethod,
        order_time: DateTime<Utc>,
    ) -> Self {
        let total_amount = sum_lines(&items);
        Self {
            id: id.into(), customer, items, total_amount, payment_method,
            payment_status: PaymentStatus::Pending, status: OrderStatus::Pending,
            order_time, cancellation: None, events: vec![],
        }
    }

    /// Rebuilds an order read back from a store.
    ///
    /// A completed order is always marked paid.
    pub fn restore(mut base: Order, status: OrderStatus, payment_status: PaymentStatus, cancellation: Option<Cancellation>) -> Result<Self, RestoreError> {
        match (status, &cancellation) {
            (OrderStatus::Cancelled, None) => return Err(RestoreError::MissingCancellation(base.id)),
            (s, Some(_)) if s != OrderStatus::Cancelled => return Err(RestoreError::UnexpectedCancellation { order_id: base.id, status: s }),
            _ => {}
        }
        base.status = status;
        base.payment_status = if status == OrderStatus::Completed { PaymentStatus::Paid } else { payment_status };
        base.cancellation = cancellation;
        Ok(base)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn customer(&self) -> &Customer { &self.customer }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn total_amount(&self) -> Decimal { self.total_amount }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn payment_status(&self) -> PaymentStatus { self.payment_status }
    pub fn status(&self) -> OrderStatus { self.status }
    pub fn order_time(&self) -> DateTime<Utc> { self.order_time }
    pub fn cancellation(&self) -> Option<&Cancellation> { self.cancellation.as_ref() }
    pub fn cancel_reason(&self) -> Option<&str> { self.cancellation.as_ref().map(|c| c.reason.as_str()) }
    pub fn cancel_time(&self) -> Option<DateTime<Utc>> { self.cancellation.as_ref().map(|c| c.at) }

    /// Moves the order to `to`. Any non-terminal status may move to any other
    /// non-cancelled status; cancelling goes through [`Order::cancel`].
    pub fn transition_to(&mut self, to: OrderStatus) -> Result<(), LifecycleError> {
        let from = self.status;
        if from.is_terminal() || from == to { return Err(LifecycleError::InvalidTransition { from, to }); }
        if to == OrderStatus::Cancelled { return Err(LifecycleError::EmptyReason); }

        self.status = to;
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.id.clone(), from, to }));
        if to == OrderStatus::Completed && self.payment_status != PaymentStatus::Paid {
            self.payment_status = PaymentStatus::Paid;
            self.raise_event(DomainEvent::Order(OrderEvent::PaymentSettled { order_id: self.id.clone() }));
        }
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str, at: DateTime<Utc>) -> Result<(), LifecycleError> {
        let from = self.status;
        if from.is_terminal() { return Err(LifecycleError::AlreadyTerminal(from)); }
        let reason = CancelReason::new(reason).map_err(|_| LifecycleError::EmptyReason)?;

        self.status = OrderStatus::Cancelled;
        self.raise_event(DomainEvent::Order(OrderEvent::StatusChanged { order_id: self.id.clone(), from, to: OrderStatus::Cancelled }));
        self.raise_event(DomainEvent::Order(OrderEvent::Cancelled { order_id: self.id.clone(), reason: reason.to_string(), at }));
        self.cancellation = Some(Cancellation { reason, at });
        Ok(())
    }

    /// Case-insensitive substring match on order id, customer name and student id.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [self.id.as_str(), self.customer.name.as_str(), self.customer.student_id.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

fn sum_lines(items: &[LineItem]) -> Decimal { items.iter().map(LineItem::line_total).sum() }

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("unknown order status: {0:?}")]
    UnknownStatus(String),
    #[error("a cancellation reason is required")]
    EmptyReason,
    #[error("order is already {0}")]
    AlreadyTerminal(OrderStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("order {0} is cancelled but has no cancellation reason")]
    MissingCancellation(String),
    #[error("order {order_id} carries cancellation data while {status}")]
    UnexpectedCancellation { order_id: String, status: OrderStatus },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn burger_order() -> Order {
        let items = vec![
            LineItem::new("Chicken Burger", Quantity::new(2).unwrap(), Price::new(Decimal::new(250, 0)).unwrap()),
            LineItem::new("French Fries", Quantity::new(1).unwrap(), Price::new(Decimal::new(150, 0)).unwrap()),
        ];
        let customer = Customer { name: "Ali Hassan".into(), student_id: "STU001".into(), ..Default::default() };
        Order::new("ORD-1", customer, items, PaymentMethod::CashOnDelivery, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let order = burger_order();
        assert_eq!(order.total_amount(), Decimal::new(650, 0));
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_workflow() {
        let mut order = burger_order();
        order.transition_to(OrderStatus::Preparing).unwrap();
        order.transition_to(OrderStatus::Ready).unwrap();
        order.transition_to(OrderStatus::Completed).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
        let events = order.take_events();
        assert_eq!(events.len(), 4);
        assert!(matches!(events.last(), Some(DomainEvent::Order(OrderEvent::PaymentSettled { .. }))));
        assert!(order.take_events().is_empty());
    }

    #[test]
    fn test_same_status_rejected() {
        let mut order = burger_order();
        let err = order.transition_to(OrderStatus::Pending).unwrap_err();
        assert_eq!(err, LifecycleError::InvalidTransition { from: OrderStatus::Pending, to: OrderStatus::Pending });
    }

    #[test]
    fn test_cancel_via_transition_requires_reason() {
        let mut order = burger_order();
        assert_eq!(order.transition_to(OrderStatus::Cancelled).unwrap_err(), LifecycleError::EmptyReason);
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Completed);
        assert_eq!(" ready ".parse::<OrderStatus>().unwrap(), OrderStatus::Ready);
        assert!(matches!("shipped".parse::<OrderStatus>(), Err(LifecycleError::UnknownStatus(s)) if s == "shipped"));
    }

    #[test]
    fn test_restore_checks_cancellation() {
        let err = Order::restore(burger_order(), OrderStatus::Cancelled, PaymentStatus::Pending, None).unwrap_err();
        assert_eq!(err, RestoreError::MissingCancellation("ORD-1".into()));
        let restored = Order::restore(burger_order(), OrderStatus::Completed, PaymentStatus::Pending, None).unwrap();
        assert_eq!(restored.payment_status(), PaymentStatus::Paid);
    }
}
