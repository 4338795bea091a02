//! Key-value store for durable client state
//!
//! This module provides the [`DurableStorage`] abstraction, a string-keyed,
//! string-valued store in the spirit of browser local storage, and
//! [`KvStore`], its sled-backed implementation.

use sled::Db;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes are not valid UTF-8
    #[error("Invalid UTF-8 value for key: {0}")]
    Encoding(String),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Durable string storage
///
/// Values written here must be readable after the process restarts.
/// Implementations are shared between stores, hence `Send + Sync`.
pub trait DurableStorage: Send + Sync {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; returns whether it was present
    fn remove_item(&self, key: &str) -> Result<bool>;
}

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Background flush interval in milliseconds (None disables it)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "rpg_assistant_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            // Writes through `DurableStorage` flush synchronously
            flush_every_ms: None,
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Sled-backed key-value store
///
/// Writes through [`DurableStorage`] are flushed before returning.
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Db>,
}

impl KvStore {
    /// Open (or create) a key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression)
            .flush_every_ms(config.flush_every_ms)
            .open()?;
        tracing::debug!(path = %config.path, "opened key-value store");

        Ok(Self { db: Arc::new(db) })
    }

    /// Create an in-memory key-value store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(())
    }
}

impl DurableStorage for KvStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;

        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| KvError::Encoding(key.to_string())),
            None => Ok(None),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.flush()
    }

    fn remove_item(&self, key: &str) -> Result<bool> {
        Self::validate_key(key)?;

        let removed = self.db.remove(key.as_bytes())?.is_some();
        self.flush()?;
        Ok(removed)
    }
}
