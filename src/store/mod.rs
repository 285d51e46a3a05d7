//! Persistence for orders and menu items.
//!
//! The lifecycle and menu operations only ever see plain values; a store loads them,
//! and receives them back to persist. Which medium sits behind the traits is chosen
//! by configuration (see [`open`]).

use thiserror::Error;

use crate::config::{AppConfig, StoreBackend};
use crate::domain::aggregates::{MenuItem, Order};

pub mod record;
pub mod seed;

/// Store implementations
pub mod implementations {
    pub mod fixture;
    pub mod local;
    pub mod memory;
}

pub use implementations::fixture::FixtureStore;
pub use implementations::local::LocalStore;
pub use implementations::memory::MemoryStore;

/// Errors that can occur while loading or saving records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON for the expected layout.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The document parsed but a record breaks an order or menu rule.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    /// A static document that must exist is missing.
    #[error("Document not found: {0}")]
    MissingDocument(String),
    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,
}

pub trait OrderStore: Send + Sync {
    fn load_orders(&self) -> Result<Vec<Order>, StoreError>;
    fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError>;
}

pub trait MenuStore: Send + Sync {
    fn load_menu(&self) -> Result<Vec<MenuItem>, StoreError>;
    fn save_menu(&self, items: &[MenuItem]) -> Result<(), StoreError>;
}

/// A backend holding both collections.
pub trait CanteenStore: OrderStore + MenuStore {
    /// Whether saved changes outlive the process.
    fn is_persistent(&self) -> bool { true }
}

/// Opens the backend named in `config`.
pub fn open(config: &AppConfig) -> Box<dyn CanteenStore> {
    match config.store {
        StoreBackend::Local => Box::new(LocalStore::new(&config.data_dir, config.seed)),
        StoreBackend::Fixture => Box::new(FixtureStore::new(config.orders_fixture(), config.menu_fixture())),
        StoreBackend::Memory => Box::new(MemoryStore::seeded()),
    }
}
