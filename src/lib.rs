//! Campus Canteen Admin
//!
//! Order lifecycle and menu catalogue rules for a campus food-ordering service.
//!
//! ## Features
//! - Order status lifecycle with payment and cancellation bookkeeping
//! - Dashboard statistics, search, status filtering and newest-first ordering
//! - Menu catalogue management
//! - Interchangeable stores: local JSON documents, static fixtures, memory

use thiserror::Error;

pub mod config;
pub mod display;
pub mod domain;
pub mod lifecycle;
pub mod menu;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreBackend};
pub use domain::aggregates::{
    Customer, LifecycleError, LineItem, MenuError, MenuItem, MenuItemDraft, Order, OrderStatus, PaymentMethod,
    PaymentStatus,
};
pub use lifecycle::{
    cancel_order, compute_statistics, filter_by_status, search_orders, sort_by_recency, transition_status,
    OrderStatistics, StatusFilter,
};
pub use menu::{CategoryFilter, MenuStatistics};
pub use store::{CanteenStore, MenuStore, OrderStore, StoreError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum CanteenError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type Result<T> = std::result::Result<T, CanteenError>;

/// Finds the order with `id` in a loaded collection.
pub fn find_order_mut<'a>(orders: &'a mut [Order], id: &str) -> Result<&'a mut Order> {
    orders.iter_mut().find(|o| o.id() == id).ok_or_else(|| CanteenError::OrderNotFound(id.to_string()))
}
