//! String key-value persistence.
//!
//! The builder only needs `get`/`set` on string keys, which is exactly what
//! the browser's local storage offers. `MemoryStore` backs tests and
//! headless hosts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// A failed store write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No storage backend is reachable (e.g. storage disabled in the browser).
    #[error("storage is unavailable")]
    Unavailable,
    /// The backend refused the write (quota, privacy mode, injected failure).
    #[error("writing `{key}` failed: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// Value stored under `key`, if any. Read failures read as missing.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while the builder owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seed for a single key.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Make every following `set` fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
