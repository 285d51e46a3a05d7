//! Runtime configuration, read from the environment (and `.env` when present).
//!
//! | variable                 | default                     |
//! |--------------------------|-----------------------------|
//! | `CANTEEN_STORE`          | `local`                     |
//! | `CANTEEN_DATA_DIR`       | `./data`                    |
//! | `CANTEEN_ORDERS_FIXTURE` | `<data dir>/orders.json`    |
//! | `CANTEEN_MENU_FIXTURE`   | `<data dir>/menu-items.json`|
//! | `CANTEEN_SEED`           | `true`                      |
//! | `CANTEEN_REFRESH_SECS`   | `30`                        |
//! | `CANTEEN_CURRENCY`       | `PKR`                       |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    /// JSON documents in the data directory, written back on every change.
    #[default]
    Local,
    /// Read-only JSON fixtures; changes last only for the session.
    Fixture,
    /// Sample data held in memory.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "localstorage" | "file" => Ok(Self::Local),
            "fixture" | "json" | "static" => Ok(Self::Fixture),
            "memory" => Ok(Self::Memory),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub data_dir: PathBuf,
    pub orders_fixture: Option<PathBuf>,
    pub menu_fixture: Option<PathBuf>,
    pub seed: bool,
    pub refresh_interval: Duration,
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::Local,
            data_dir: PathBuf::from("./data"),
            orders_fixture: None,
            menu_fixture: None,
            seed: true,
            refresh_interval: Duration::from_secs(30),
            currency: "PKR".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup("CANTEEN_STORE") {
            config.store = value.parse().map_err(|_| ConfigError::Invalid { key: "CANTEEN_STORE", value })?;
        }
        if let Some(value) = lookup("CANTEEN_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }
        config.orders_fixture = lookup("CANTEEN_ORDERS_FIXTURE").map(PathBuf::from);
        config.menu_fixture = lookup("CANTEEN_MENU_FIXTURE").map(PathBuf::from);
        if let Some(value) = lookup("CANTEEN_SEED") {
            config.seed = parse_flag(&value).ok_or(ConfigError::Invalid { key: "CANTEEN_SEED", value })?;
        }
        if let Some(value) = lookup("CANTEEN_REFRESH_SECS") {
            let secs = value.trim().parse::<u64>().ok().filter(|s| *s > 0);
            config.refresh_interval = Duration::from_secs(secs.ok_or(ConfigError::Invalid { key: "CANTEEN_REFRESH_SECS", value })?);
        }
        if let Some(value) = lookup("CANTEEN_CURRENCY") {
            config.currency = value;
        }
        Ok(config)
    }

    pub fn orders_fixture(&self) -> PathBuf {
        self.orders_fixture.clone().unwrap_or_else(|| self.data_dir.join("orders.json"))
    }

    pub fn menu_fixture(&self) -> PathBuf {
        self.menu_fixture.clone().unwrap_or_else(|| self.data_dir.join("menu-items.json"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
