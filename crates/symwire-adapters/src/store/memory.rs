//! In-memory stores for tests and ephemeral sessions.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use symwire_core::{
    application::{
        ApplicationError,
        ports::{ConnectionStore, SymbolStore},
    },
    domain::{Connection, ConnectionId, Symbol, SymbolId},
    error::SymwireResult,
};

use crate::builtin_types;

/// Thread-safe in-memory symbol store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySymbolStore {
    inner: Arc<RwLock<HashMap<SymbolId, Symbol>>>,
}

impl InMemorySymbolStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the built-in primitive catalogue.
    pub fn with_builtin_types() -> SymwireResult<Self> {
        let store = Self::new();
        for symbol in builtin_types::catalogue()? {
            store.insert(symbol)?;
        }
        Ok(store)
    }

    /// Get the number of symbols.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolStore for InMemorySymbolStore {
    fn get(&self, id: &SymbolId) -> SymwireResult<Option<Symbol>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(id).cloned())
    }

    fn list(&self) -> SymwireResult<Vec<Symbol>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.values().cloned().collect())
    }

    fn insert(&self, symbol: Symbol) -> SymwireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(symbol.id().clone(), symbol);
        Ok(())
    }

    fn remove(&self, id: &SymbolId) -> SymwireResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.remove(id).is_some())
    }
}

/// Thread-safe in-memory connection store. Keeps insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnectionStore {
    inner: Arc<RwLock<Vec<Connection>>>,
}

impl InMemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConnectionStore for InMemoryConnectionStore {
    fn get(&self, id: &ConnectionId) -> SymwireResult<Option<Connection>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.iter().find(|c| &c.id == id).cloned())
    }

    fn list(&self) -> SymwireResult<Vec<Connection>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.clone())
    }

    fn insert(&self, connection: Connection) -> SymwireResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        match inner.iter_mut().find(|c| c.id == connection.id) {
            Some(existing) => *existing = connection,
            None => inner.push(connection),
        }
        Ok(())
    }

    fn remove(&self, id: &ConnectionId) -> SymwireResult<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let before = inner.len();
        inner.retain(|c| &c.id != id);
        Ok(inner.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symwire_core::domain::{Level, SemVer};

    #[test]
    fn insert_is_an_upsert() {
        let store = InMemorySymbolStore::new();
        let mut symbol = Symbol::builder("app", "Cart", SemVer::new(1, 0, 0))
            .build()
            .unwrap();
        store.insert(symbol.clone()).unwrap();
        symbol.description = Some("changed".into());
        store.insert(symbol.clone()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(symbol.id()).unwrap(), Some(symbol));
    }

    #[test]
    fn builtin_catalogue_is_all_primitives() {
        let store = InMemorySymbolStore::with_builtin_types().unwrap();
        assert!(!store.is_empty());
        assert!(store.list().unwrap().iter().all(|s| s.level == Level::Primitive));
    }

    #[test]
    fn remove_reports_presence() {
        let store = InMemoryConnectionStore::new();
        let id = ConnectionId::from_string("conn-1");
        assert!(!store.remove(&id).unwrap());
        assert!(store.is_empty());
    }
}
