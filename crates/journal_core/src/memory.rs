//! crates/journal_core/src/memory.rs
//!
//! An in-memory `GateStore`. The API service uses it for per-session gate
//! state; tests use it as the storage substitute.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ports::{GateStore, PortError, PortResult};

/// A mutex-guarded string map. Cloning shares the underlying storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GateStore for MemoryStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PortError::Unexpected("gate storage poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PortError::Unexpected("gate storage poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A view over another `GateStore` that prefixes every key, giving each
/// client (auth session) its own namespace inside one shared map.
#[derive(Clone)]
pub struct ScopedStore<S> {
    inner: S,
    prefix: String,
}

impl<S: GateStore> ScopedStore<S> {
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}:{key}", self.prefix)
    }
}

impl<S: GateStore> GateStore for ScopedStore<S> {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(&self.scoped(key))
    }

    fn put(&self, key: &str, value: &str) -> PortResult<()> {
        self.inner.put(&self.scoped(key), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_reads_back() {
        let store = MemoryStore::new();
        assert_eq!(store.get("last_day").unwrap(), None);
        store.put("last_day", "3").unwrap();
        assert_eq!(store.get("last_day").unwrap(), Some("3".to_string()));
    }

    #[test]
    fn scoped_stores_do_not_collide() {
        let shared = MemoryStore::new();
        let a = ScopedStore::new(shared.clone(), "session-a");
        let b = ScopedStore::new(shared, "session-b");

        a.put("last_day", "1").unwrap();
        assert_eq!(b.get("last_day").unwrap(), None);
        assert_eq!(a.get("last_day").unwrap(), Some("1".to_string()));
    }
}
