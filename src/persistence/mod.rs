//! Key-value persistence for values that outlive a session
//!
//! The core only ever stores small integers (the high score), addressed by a
//! fixed key. Access is best-effort: callers log failures and carry on.

mod file;

use std::collections::HashMap;

pub use file::JsonFileStore;

use crate::error::StoreError;

/// Integer storage addressed by key
pub trait KeyValueStore: Send {
    /// Read a value (`None` if never written)
    fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError>;

    /// Write a value
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and when no save directory is available
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
