//! Account persistence for the paper-broker service.
//!
//! Two interchangeable backends sit behind the [`AccountStore`] trait:
//! a flat JSON document ([`JsonStore`]) and a SQLite table
//! ([`SqliteStore`]). A deployment picks exactly one via [`StoreConfig`];
//! everything above this crate only sees `Arc<dyn AccountStore>`.

mod config;
mod error;
mod json;
mod sqlite;

pub use config::{StoreBackend, StoreConfig};
pub use error::StoreError;
pub use json::JsonStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;
use types::Account;

/// Persistent account storage.
///
/// Implementations serialize their own access internally; callers may share
/// one store across threads and tasks. Cross-account atomicity is not
/// promised here — the trade engine serializes per-account mutation.
pub trait AccountStore: Send + Sync {
    /// Load an account by username. `Ok(None)` when no such account exists.
    fn load(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. Fails with [`StoreError::Duplicate`] when the
    /// username is already taken.
    fn create(&self, account: &Account) -> Result<(), StoreError>;

    /// Persist the current state of an existing account.
    fn save(&self, account: &Account) -> Result<(), StoreError>;
}

/// Open the backend named by the config.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn AccountStore>, StoreError> {
    let store: Arc<dyn AccountStore> = match config.backend {
        StoreBackend::Json => Arc::new(JsonStore::open(&config.path)?),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.path)?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Cash;

    #[test]
    fn test_open_store_dispatches_on_backend() {
        let store = open_store(&StoreConfig::default()).unwrap();
        store
            .create(&Account::new("alice", Cash::from_float(10_000.0)))
            .unwrap();
        assert!(store.load("alice").unwrap().is_some());

        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::default()
            .with_backend(StoreBackend::Json)
            .with_path(dir.path().join("accounts.json").to_string_lossy());
        let store = open_store(&config).unwrap();
        assert!(store.load("alice").unwrap().is_none());
    }
}
