//! Local key-value store.
//!
//! Each collection lives in its own JSON document under the data directory
//! (`orders.json`, `menuItems.json`), the same keys the admin screens used in browser
//! storage. A missing key is seeded with sample data on first read when seeding is on.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::aggregates::{MenuItem, Order};
use crate::store::record::{MenuItemRecord, OrderRecord};
use crate::store::{seed, CanteenStore, MenuStore, OrderStore, StoreError};

const ORDERS_KEY: &str = "orders";
const MENU_KEY: &str = "menuItems";

pub struct LocalStore {
    dir: PathBuf,
    seed: bool,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, seed: bool) -> Self {
        Self { dir: dir.into(), seed }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn read<R: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<R>>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "reading local store key");
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write<R: Serialize>(&self, key: &str, records: &[R]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(records)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), count = records.len(), "wrote local store key");
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OrderStore for LocalStore {
    fn load_orders(&self) -> Result<Vec<Order>, StoreError> {
        match self.read::<OrderRecord>(ORDERS_KEY)? {
            Some(records) => records.into_iter().map(Order::try_from).collect(),
            None if self.seed => {
                let orders = seed::sample_orders(Utc::now());
                self.save_orders(&orders)?;
                info!(count = orders.len(), "seeded sample orders");
                Ok(orders)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        let records: Vec<OrderRecord> = orders.iter().map(OrderRecord::from).collect();
        self.write(ORDERS_KEY, &records)
    }
}

impl MenuStore for LocalStore {
    fn load_menu(&self) -> Result<Vec<MenuItem>, StoreError> {
        match self.read::<MenuItemRecord>(MENU_KEY)? {
            Some(records) => records.into_iter().map(MenuItem::try_from).collect(),
            None if self.seed => {
                let items = seed::sample_menu();
                self.save_menu(&items)?;
                info!(count = items.len(), "seeded sample menu");
                Ok(items)
            }
            None => Ok(Vec::new()),
        }
    }

    fn save_menu(&self, items: &[MenuItem]) -> Result<(), StoreError> {
        let records: Vec<MenuItemRecord> = items.iter().map(MenuItemRecord::from).collect();
        self.write(MENU_KEY, &records)
    }
}

impl CanteenStore for LocalStore {}
