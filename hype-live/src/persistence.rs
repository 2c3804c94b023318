//! Settings persistence — opaque JSON blobs keyed by string.
//!
//! The engine only needs to save and restore its configured action book;
//! the encoding beyond "it is JSON" is nobody's business here. Hosts with
//! their own settings pipeline implement [`SettingsStore`] over it; the
//! two implementations below cover tests ([`MemoryStore`]) and simple
//! standalone setups ([`JsonFileStore`]).

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use hype_core::error::{HypeError, Result};

/// The store key under which the action book snapshot is saved.
pub const ACTIONS_KEY: &str = "hype:actions";

/// String-keyed store of opaque JSON blobs.
pub trait SettingsStore {
    /// Read a blob, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Value>>;
    /// Write a blob, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory store. Clones share the same underlying map, so a test can
/// hand one clone to the session's auto-save task and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.inner.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Single-file JSON store: one top-level object, one property per key.
/// Reads and rewrites the whole file per operation — settings are written
/// rarely (manual saves, auto-save ticks) and stay small.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, Value>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| HypeError::Serialization(e.to_string()))
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&map)
            .map_err(|e| HypeError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
