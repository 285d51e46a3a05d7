//! Static-document store.
//!
//! Reads orders and menu items from read-only JSON fixtures. Saved changes are held
//! in memory for the life of the store; the fixture files are never rewritten.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use crate::domain::aggregates::{MenuItem, Order};
use crate::store::record::{MenuItemRecord, OrderRecord};
use crate::store::{CanteenStore, MenuStore, OrderStore, StoreError};

pub struct FixtureStore {
    orders_path: PathBuf,
    menu_path: PathBuf,
    orders: RwLock<Option<Vec<Order>>>,
    menu: RwLock<Option<Vec<MenuItem>>>,
}

impl FixtureStore {
    pub fn new(orders_path: impl Into<PathBuf>, menu_path: impl Into<PathBuf>) -> Self {
        Self {
            orders_path: orders_path.into(),
            menu_path: menu_path.into(),
            orders: RwLock::new(None),
            menu: RwLock::new(None),
        }
    }
}

fn fetch<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, StoreError> {
    if !path.exists() {
        return Err(StoreError::MissingDocument(path.display().to_string()));
    }
    debug!(path = %path.display(), "fetching fixture");
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

impl OrderStore for FixtureStore {
    fn load_orders(&self) -> Result<Vec<Order>, StoreError> {
        if let Some(orders) = self.orders.read().map_err(|_| StoreError::Poisoned)?.as_ref() {
            return Ok(orders.clone());
        }
        fetch::<OrderRecord>(&self.orders_path)?.into_iter().map(Order::try_from).collect()
    }

    fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        *self.orders.write().map_err(|_| StoreError::Poisoned)? = Some(orders.to_vec());
        Ok(())
    }
}

impl MenuStore for FixtureStore {
    fn load_menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        if let Some(items) = self.menu.read().map_err(|_| StoreError::Poisoned)?.as_ref() {
            return Ok(items.clone());
        }
        fetch::<MenuItemRecord>(&self.menu_path)?.into_iter().map(MenuItem::try_from).collect()
    }

    fn save_menu(&self, items: &[MenuItem]) -> Result<(), StoreError> {
        *self.menu.write().map_err(|_| StoreError::Poisoned)? = Some(items.to_vec());
        Ok(())
    }
}

impl CanteenStore for FixtureStore {
    fn is_persistent(&self) -> bool { false }
}
