//! Sample data written on first use of an empty local store.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::aggregates::{Customer, LineItem, MenuItem, MenuItemDraft, Order, OrderStatus, PaymentMethod, PaymentStatus};
use crate::domain::value_objects::{Price, Quantity};

fn line(name: &str, quantity: u32, price: i64) -> Option<LineItem> {
    Some(LineItem::new(name, Quantity::new(quantity).ok()?, Price::new(Decimal::new(price, 0)).ok()?))
}

fn customer(name: &str, student_id: &str, phone: &str, address: &str, notes: &str) -> Customer {
    Customer {
        name: name.into(),
        student_id: student_id.into(),
        phone: Some(phone.into()),
        address: Some(address.into()),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
    }
}

/// Three recent orders: one pending, one preparing, one ready.
pub fn sample_orders(now: DateTime<Utc>) -> Vec<Order> {
    let millis = now.timestamp_millis();
    let specs = [
        (
            format!("ORD-{millis}-001"),
            customer("Ali Hassan", "STU001", "+92 300 1234567", "Room 205, Boys Hostel", "Extra ketchup please"),
            vec![line("Chicken Burger", 2, 250), line("French Fries", 1, 150)],
            PaymentMethod::CashOnDelivery,
            PaymentStatus::Pending,
            OrderStatus::Pending,
            5,
        ),
        (
            format!("ORD-{}-002", millis - 600_000),
            customer("Fatima Khan", "STU002", "+92 301 9876543", "Library Study Room 3", ""),
            vec![line("Cheese Pizza", 1, 450)],
            PaymentMethod::Online,
            PaymentStatus::Paid,
            OrderStatus::Preparing,
            15,
        ),
        (
            format!("ORD-{}-003", millis - 1_200_000),
            customer("Ahmed Malik", "STU003", "+92 302 5551234", "Computer Lab A", "Please call before delivery"),
            vec![line("Coffee", 2, 120), line("Pancakes", 1, 180)],
            PaymentMethod::CashOnDelivery,
            PaymentStatus::Pending,
            OrderStatus::Ready,
            25,
        ),
    ];

    specs
        .into_iter()
        .filter_map(|(id, customer, lines, method, paid, status, minutes_ago)| {
            let items = lines.into_iter().collect::<Option<Vec<_>>>()?;
            let base = Order::new(id, customer, items, method, now - Duration::minutes(minutes_ago));
            Order::restore(base, status, paid, None).ok()
        })
        .collect()
}

pub fn sample_menu() -> Vec<MenuItem> {
    let specs: [(u64, &str, &str, i64, u32, &str, &str, bool, bool); 5] = [
        (1, "Chicken Burger", "Lunch", 250, 50, "Juicy chicken patty with fresh vegetables", "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?w=400", true, true),
        (2, "Cheese Pizza", "Lunch", 450, 30, "Classic cheese pizza with mozzarella", "https://images.unsplash.com/photo-1513104890138-7c749659a591?w=400", true, true),
        (3, "Coffee", "Beverages", 120, 100, "Fresh brewed coffee", "https://images.unsplash.com/photo-1509042239860-f550ce710b93?w=400", true, false),
        (4, "Pancakes", "Breakfast", 180, 0, "Fluffy pancakes with maple syrup", "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?w=400", false, false),
        (5, "French Fries", "Snacks", 150, 80, "Crispy golden french fries", "https://images.unsplash.com/photo-1573080496219-bb080dd4f877?w=400", true, true),
    ];

    specs
        .into_iter()
        .filter_map(|(id, name, category, price, stock, description, image, available, popular)| {
            let draft = MenuItemDraft {
                name: name.into(),
                category: category.into(),
                price: Decimal::new(price, 0),
                stock,
                description: description.into(),
                image: image.into(),
                available,
                popular,
            };
            MenuItem::create(id, &draft).ok()
        })
        .collect()
}
