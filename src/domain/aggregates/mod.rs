//! Aggregates module
pub mod order;
pub mod menu_item;

pub use order::{Cancellation, Customer, LifecycleError, LineItem, Order, OrderStatus, PaymentMethod, PaymentStatus, RestoreError};
pub use menu_item::{MenuError, MenuItem, MenuItemDraft, PLACEHOLDER_IMAGE};
