use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{OrderRepository, UserRepository};
use crate::domain::user::User;

pub const ORDERS_FILE: &str = "orders.json";
pub const USERS_FILE: &str = "users.json";

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Keeps each collection as one pretty-printed JSON array on disk.
///
/// Every save rewrites the whole file. A file that does not exist yet
/// reads as an empty collection. Records that cannot be parsed are logged
/// and skipped, so they are gone after the next save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    orders_path: PathBuf,
    users_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            orders_path: dir.join(ORDERS_FILE),
            users_path: dir.join(USERS_FILE),
        }
    }
}

fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DomainError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let records: Vec<serde_json::Value> = serde_json::from_str(&text)?;
    let items: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping record {} in {}: {}", i, path.display(), e);
                None
            }
        })
        .collect();
    log::debug!("Read {} records from {}", items.len(), path.display());
    Ok(items)
}

fn write_all<T: Serialize>(path: &Path, items: &[T]) -> Result<(), DomainError> {
    let text = serde_json::to_string_pretty(items)?;
    fs::write(path, text)?;
    log::debug!("Wrote {} records to {}", items.len(), path.display());
    Ok(())
}

impl OrderRepository for JsonFileStore {
    fn load_orders(&self) -> Result<Vec<Order>, DomainError> {
        read_all(&self.orders_path)
    }

    fn save_orders(&self, orders: &[Order]) -> Result<(), DomainError> {
        write_all(&self.orders_path, orders)
    }
}

impl UserRepository for JsonFileStore {
    fn load_users(&self) -> Result<Vec<User>, DomainError> {
        read_all(&self.users_path)
    }

    fn save_users(&self, users: &[User]) -> Result<(), DomainError> {
        write_all(&self.users_path, users)
    }
}
