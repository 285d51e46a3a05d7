//! JSON record layout shared by the file-backed stores.
//!
//! Field names follow the browser-storage documents (`studentName`, `totalAmount`,
//! `orderTime`, ...). The static fixtures name a few fields differently
//! (`orderId`, `total`, `timestamp`); those are accepted as aliases on read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::domain::aggregates::{
    Cancellation, Customer, LineItem, MenuItem, MenuItemDraft, Order, OrderStatus, PaymentMethod, PaymentStatus,
};
use crate::domain::value_objects::{CancelReason, Price, Quantity};
use crate::store::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(alias = "orderId", deserialize_with = "text_or_number")]
    pub id: String,
    pub student_name: String,
    #[serde(default)]
    pub student_id: String,
    pub items: Vec<LineItemRecord>,
    #[serde(alias = "total", default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    pub status: String,
    #[serde(alias = "timestamp")]
    pub order_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub popular: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(u64),
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    })
}

fn corrupt(order_id: &str, detail: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt(format!("order {order_id}: {detail}"))
}

fn parse_payment_method(raw: Option<&str>) -> Option<PaymentMethod> {
    let Some(raw) = raw else { return Some(PaymentMethod::CashOnDelivery) };
    let raw = raw.to_ascii_lowercase();
    if raw.contains("online") || raw.contains("card") {
        Some(PaymentMethod::Online)
    } else if raw.contains("cash") || raw == "cod" {
        Some(PaymentMethod::CashOnDelivery)
    } else {
        None
    }
}

fn parse_payment_status(raw: Option<&str>) -> Option<PaymentStatus> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("pending") | Some("cod") => Some(PaymentStatus::Pending),
        Some("paid") => Some(PaymentStatus::Paid),
        Some(_) => None,
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = StoreError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let items = record
            .items
            .into_iter()
            .map(|line| {
                let quantity = Quantity::new(line.quantity).map_err(|e| corrupt(&id, e))?;
                let price = Price::new(line.price).map_err(|e| corrupt(&id, e))?;
                Ok::<_, StoreError>(LineItem::new(line.name, quantity, price))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let status: OrderStatus = record.status.parse().map_err(|e| corrupt(&id, e))?;
        let payment_method = parse_payment_method(record.payment_method.as_deref())
            .ok_or_else(|| corrupt(&id, format!("unknown payment method {:?}", record.payment_method)))?;
        let payment_status = parse_payment_status(record.payment_status.as_deref())
            .ok_or_else(|| corrupt(&id, format!("unknown payment status {:?}", record.payment_status)))?;
        let cancellation = match (record.cancel_reason, record.cancel_time) {
            (None, None) => None,
            (Some(reason), Some(at)) => Some(Cancellation { reason: CancelReason::new(reason).map_err(|e| corrupt(&id, e))?, at }),
            _ => return Err(corrupt(&id, "incomplete cancellation data")),
        };

        let customer = Customer {
            name: record.student_name,
            student_id: record.student_id,
            phone: record.phone,
            address: record.delivery_address,
            notes: record.notes.filter(|n| !n.trim().is_empty()),
        };
        let base = Order::new(id.clone(), customer, items, payment_method, record.order_time);
        if let Some(stored) = record.total_amount {
            if stored != base.total_amount() {
                warn!(order_id = %id, %stored, computed = %base.total_amount(), "stored total did not match line items, using computed total");
            }
        }
        if status == OrderStatus::Completed && payment_status != PaymentStatus::Paid {
            warn!(order_id = %id, "completed order was not marked paid, repairing");
        }
        Order::restore(base, status, payment_status, cancellation).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        let customer = order.customer();
        Self {
            id: order.id().to_string(),
            student_name: customer.name.clone(),
            student_id: customer.student_id.clone(),
            items: order
                .items()
                .iter()
                .map(|line| LineItemRecord { name: line.name.clone(), quantity: line.quantity.value(), price: line.unit_price.amount() })
                .collect(),
            total_amount: Some(order.total_amount()),
            payment_method: Some(order.payment_method().as_str().to_string()),
            payment_status: Some(order.payment_status().as_str().to_string()),
            status: order.status().as_str().to_string(),
            order_time: order.order_time(),
            delivery_address: customer.address.clone(),
            phone: customer.phone.clone(),
            notes: customer.notes.clone(),
            cancel_reason: order.cancel_reason().map(str::to_string),
            cancel_time: order.cancel_time(),
        }
    }
}

impl TryFrom<MenuItemRecord> for MenuItem {
    type Error = StoreError;

    fn try_from(record: MenuItemRecord) -> Result<Self, Self::Error> {
        let draft = MenuItemDraft {
            name: record.name,
            category: record.category,
            price: record.price,
            stock: record.stock,
            description: record.description,
            image: record.image,
            available: record.available,
            popular: record.popular,
        };
        MenuItem::create(record.id, &draft).map_err(|e| StoreError::Corrupt(format!("menu item {}: {e}", record.id)))
    }
}

impl From<&MenuItem> for MenuItemRecord {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id(),
            name: item.name().to_string(),
            category: item.category().to_string(),
            price: item.price().amount(),
            stock: item.stock(),
            description: item.description().to_string(),
            image: item.image().to_string(),
            available: item.is_available(),
            popular: item.is_popular(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER_ORDER: &str = r#"{
        "id": "ORD-1717000000000-001",
        "studentName": "Ali Hassan",
        "studentId": "STU001",
        "items": [
            { "name": "Chicken Burger", "quantity": 2, "price": 250 },
            { "name": "French Fries", "quantity": 1, "price": 150 }
        ],
        "totalAmount": 700,
        "paymentMethod": "Cash on Delivery",
        "paymentStatus": "Pending",
        "status": "pending",
        "orderTime": "2024-05-29T10:15:00.000Z",
        "deliveryAddress": "Room 205, Boys Hostel",
        "phone": "+92 300 1234567",
        "notes": "Extra ketchup please"
    }"#;

    const FIXTURE_ORDER: &str = r#"{
        "orderId": 1042,
        "studentName": "Sara Ahmed",
        "studentId": "STU020",
        "items": [{ "name": "Coffee", "quantity": 2, "price": 2.5 }],
        "total": 5.0,
        "status": "delivered",
        "timestamp": "2024-05-29T08:00:00Z"
    }"#;

    #[test]
    fn test_browser_record_total_is_recomputed() {
        let record: OrderRecord = serde_json::from_str(BROWSER_ORDER).unwrap();
        let order = Order::try_from(record).unwrap();
        assert_eq!(order.total_amount(), Decimal::new(650, 0));
        assert_eq!(order.customer().address.as_deref(), Some("Room 205, Boys Hostel"));
        assert_eq!(order.payment_method(), PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_fixture_aliases() {
        let record: OrderRecord = serde_json::from_str(FIXTURE_ORDER).unwrap();
        let order = Order::try_from(record).unwrap();
        assert_eq!(order.id(), "1042");
        assert_eq!(order.status(), OrderStatus::Completed);
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
        assert_eq!(order.total_amount(), Decimal::new(50, 1));
    }

    #[test]
    fn test_zero_quantity_is_corrupt() {
        let json = BROWSER_ORDER.replace(r#""quantity": 1"#, r#""quantity": 0"#);
        let record: OrderRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(Order::try_from(record), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_cancelled_without_reason_is_corrupt() {
        let json = BROWSER_ORDER.replace(r#""status": "pending""#, r#""status": "cancelled""#);
        let record: OrderRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(Order::try_from(record), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_cancelled_order_survives_write_and_read() {
        let record: OrderRecord = serde_json::from_str(BROWSER_ORDER).unwrap();
        let mut order = Order::try_from(record).unwrap();
        let at = "2024-05-29T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        order.cancel("Out of stock", at).unwrap();

        let json = serde_json::to_string(&OrderRecord::from(&order)).unwrap();
        let back = Order::try_from(serde_json::from_str::<OrderRecord>(&json).unwrap()).unwrap();
        assert_eq!(back.status(), OrderStatus::Cancelled);
        assert_eq!(back.cancel_reason(), Some("Out of stock"));
        assert_eq!(back.cancel_time(), Some(at));
    }
}
