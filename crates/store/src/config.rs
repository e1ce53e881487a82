//! Store configuration: backend choice and location.

use std::fmt;
use std::str::FromStr;

/// Which persistence backend to use. Exactly one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Single flat JSON document on disk.
    Json,
    /// SQLite database (`:memory:` supported).
    #[default]
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StoreBackend::Json),
            "sqlite" => Ok(StoreBackend::Sqlite),
            other => Err(format!(
                "unknown store backend {other:?} (expected \"json\" or \"sqlite\")"
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Json => write!(f, "json"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend to open.
    pub backend: StoreBackend,
    /// File path; `:memory:` for an in-memory SQLite database.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: ":memory:".to_string(),
        }
    }
}

impl StoreConfig {
    /// Set the backend.
    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the file path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}
