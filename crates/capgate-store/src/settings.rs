//! In-memory implementation of `SettingsStore`.
//!
//! Values live in a `BTreeMap` behind `Arc<Mutex<_>>`. Each call takes the
//! lock once, so single-key reads and replaces are atomic, which is all the
//! grant settings layer relies on.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::debug;

use capgate_contracts::error::{CapgateError, CapgateResult};
use capgate_core::traits::SettingsStore;

/// A key-value option store held in process memory.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySettingsStore {
    state: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously persisted values.
    pub fn from_map(values: BTreeMap<String, Value>) -> Self {
        Self {
            state: Arc::new(Mutex::new(values)),
        }
    }

    /// Copy of every stored key and value.
    pub fn snapshot(&self) -> CapgateResult<BTreeMap<String, Value>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> CapgateResult<MutexGuard<'_, BTreeMap<String, Value>>> {
        self.state.lock().map_err(|e| CapgateError::StoreError {
            reason: format!("settings lock poisoned: {}", e),
        })
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> CapgateResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> CapgateResult<()> {
        debug!(key, "setting stored");
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> CapgateResult<bool> {
        let removed = self.lock()?.remove(key).is_some();
        debug!(key, removed, "setting deleted");
        Ok(removed)
    }
}
