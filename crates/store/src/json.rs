//! Flat-file JSON backend.
//!
//! One document holds every account. Each operation is a whole-file
//! read-modify-write under a mutex; fine for a handful of users, which is
//! exactly the deployment this backend is for.

use crate::AccountStore;
use crate::error::StoreError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use types::Account;

/// On-disk document. Accounts keep their scaled-integer money fields; this
/// file is an internal format, not a wire format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    users: HashMap<String, Account>,
}

/// Account store backed by a single JSON file.
pub struct JsonStore {
    path: PathBuf,
    /// Serializes the read-modify-write cycle; the file is the only truth.
    lock: Mutex<()>,
}

impl JsonStore {
    /// Open a JSON store. The file need not exist yet; a missing file reads
    /// as an empty document and is created on first write. A present but
    /// unparseable file is an error here rather than on first request.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };
        store.read_document()?;
        Ok(store)
    }

    fn read_document(&self) -> Result<Document, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl AccountStore for JsonStore {
    fn load(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_document()?.users.get(username).cloned())
    }

    fn create(&self, account: &Account) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut doc = self.read_document()?;
        if doc.users.contains_key(&account.username) {
            return Err(StoreError::Duplicate(account.username.clone()));
        }
        doc.users.insert(account.username.clone(), account.clone());
        self.write_document(&doc)
    }

    fn save(&self, account: &Account) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut doc = self.read_document()?;
        doc.users.insert(account.username.clone(), account.clone());
        self.write_document(&doc)
    }
}
