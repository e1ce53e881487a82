//! SQLite backend.

use crate::AccountStore;
use crate::error::StoreError;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde_json::json;
use types::{Account, Cash, Holdings};

/// Initialize the accounts table.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            salt TEXT NOT NULL,
            balance INTEGER NOT NULL,
            holdings_json TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

/// Account store backed by a SQLite table.
///
/// Uses interior mutability (Mutex) because `Connection` is Send but not
/// Sync; contention is negligible at this scale.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`; `:memory:` for in-memory.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };

        init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl AccountStore for SqliteStore {
    fn load(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT username, password_hash, salt, balance, holdings_json
             FROM accounts WHERE username = ?1",
        )?;

        let row = stmt
            .query_row(rusqlite::params![username], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        match row {
            None => Ok(None),
            Some((username, password_hash, salt, balance, holdings_json)) => {
                let holdings: Holdings = serde_json::from_str(&holdings_json)?;
                Ok(Some(Account {
                    username,
                    password_hash,
                    salt,
                    balance: Cash(balance),
                    holdings,
                }))
            }
        }
    }

    fn create(&self, account: &Account) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO accounts (username, password_hash, salt, balance, holdings_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                account.username.as_str(),
                account.password_hash.as_str(),
                account.salt.as_str(),
                account.balance.raw(),
                json!(&account.holdings).to_string(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            // The UNIQUE constraint on username reports duplicates for us.
            Err(e) if is_constraint_violation(&e) => {
                Err(StoreError::Duplicate(account.username.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, account: &Account) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "UPDATE accounts
             SET password_hash = ?2, salt = ?3, balance = ?4, holdings_json = ?5
             WHERE username = ?1",
        )?;

        stmt.execute(rusqlite::params![
            account.username.as_str(),
            account.password_hash.as_str(),
            account.salt.as_str(),
            account.balance.raw(),
            json!(&account.holdings).to_string(),
        ])?;

        Ok(())
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
