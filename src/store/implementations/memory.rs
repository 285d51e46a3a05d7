//! In-memory store, for tests and throwaway sessions.

use chrono::Utc;
use std::sync::RwLock;

use crate::domain::aggregates::{MenuItem, Order};
use crate::store::{seed, CanteenStore, MenuStore, OrderStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    orders: RwLock<Vec<Order>>,
    menu: RwLock<Vec<MenuItem>>,
}

impl MemoryStore {
    pub fn new(orders: Vec<Order>, menu: Vec<MenuItem>) -> Self {
        Self { orders: RwLock::new(orders), menu: RwLock::new(menu) }
    }

    /// Starts with the sample orders and menu.
    pub fn seeded() -> Self {
        Self::new(seed::sample_orders(Utc::now()), seed::sample_menu())
    }
}

impl OrderStore for MemoryStore {
    fn load_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.orders.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        *self.orders.write().map_err(|_| StoreError::Poisoned)? = orders.to_vec();
        Ok(())
    }
}

impl MenuStore for MemoryStore {
    fn load_menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self.menu.read().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn save_menu(&self, items: &[MenuItem]) -> Result<(), StoreError> {
        *self.menu.write().map_err(|_| StoreError::Poisoned)? = items.to_vec();
        Ok(())
    }
}

impl CanteenStore for MemoryStore {
    fn is_persistent(&self) -> bool { false }
}
