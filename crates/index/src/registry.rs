//! Index registry and transaction fan-out
//!
//! The registry owns every open index and is what the transaction
//! manager talks to at transaction boundaries: `barrier_all` validates a
//! transaction against each index (first failure aborts the fan-out),
//! `commit_all` publishes everywhere, `rollback_all` is the recovery
//! path. It also resolves declarative requirements to a factory when an
//! index is opened.

use crate::factory::{CowHashIndexFactory, CowMultiHashIndexFactory, IndexFactory};
use crate::index::Index;
use dashmap::DashMap;
use polydex_core::{EntityId, IndexDef, IndexError, IndexId, IndexMethod, Result, Xid};
use std::sync::Arc;

/// Owns all open indexes and fans transaction boundaries out to them.
pub struct IndexRegistry {
    indexes: DashMap<IndexId, Arc<dyn Index>>,
    factories: Vec<Box<dyn IndexFactory>>,
}

impl IndexRegistry {
    /// A registry with the built-in copy-on-write hash factories.
    pub fn new() -> Self {
        Self::with_factories(vec![
            Box::new(CowHashIndexFactory),
            Box::new(CowMultiHashIndexFactory),
        ])
    }

    /// A registry with a custom factory chain. Factories are consulted
    /// in order; the first that `can_provide` wins.
    pub fn with_factories(factories: Vec<Box<dyn IndexFactory>>) -> Self {
        IndexRegistry {
            indexes: DashMap::new(),
            factories,
        }
    }

    /// First registered factory that can satisfy the requirements.
    pub fn resolve_factory(
        &self,
        method: Option<IndexMethod>,
        unique: Option<bool>,
        persistent: Option<bool>,
    ) -> Result<&dyn IndexFactory> {
        self.factories
            .iter()
            .map(AsRef::as_ref)
            .find(|f| f.can_provide(method, unique, persistent))
            .ok_or_else(|| {
                IndexError::Unsupported(format!(
                    "no registered factory provides method {method:?}, \
                     unique {unique:?}, persistent {persistent:?}"
                ))
            })
    }

    /// Build, initialize, and register the index described by `def`.
    pub fn open(&self, def: IndexDef) -> Result<Arc<dyn Index>> {
        if self.indexes.contains_key(&def.id) {
            return Err(IndexError::Conflict(format!(
                "index id {} is already registered",
                def.id
            )));
        }
        if self.by_name(&def.name).is_some() {
            return Err(IndexError::Conflict(format!(
                "index name '{}' is already registered",
                def.name
            )));
        }

        let factory = self.resolve_factory(def.method, def.unique, def.persistent)?;
        let index: Arc<dyn Index> = Arc::from(factory.create(def)?);
        index.initialize();

        let meta = index.meta();
        tracing::info!(
            id = %meta.id,
            name = %meta.name,
            method = %meta.method,
            unique = meta.unique,
            "opened index"
        );
        self.indexes.insert(meta.id, index.clone());
        Ok(index)
    }

    /// Index by catalog id.
    pub fn get(&self, id: IndexId) -> Option<Arc<dyn Index>> {
        self.indexes.get(&id).map(|entry| entry.value().clone())
    }

    /// Index by name.
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Index>> {
        self.indexes
            .iter()
            .find(|entry| entry.value().meta().name == name)
            .map(|entry| entry.value().clone())
    }

    /// Index covering exactly `columns` (in order) on `entity`.
    pub fn for_entity(&self, entity: EntityId, columns: &[String]) -> Option<Arc<dyn Index>> {
        self.indexes
            .iter()
            .find(|entry| {
                let meta = entry.value().meta();
                meta.entity == entity && meta.columns == columns
            })
            .map(|entry| entry.value().clone())
    }

    /// Remove an index from the registry. Returns whether it existed.
    pub fn close(&self, id: IndexId) -> bool {
        let removed = self.indexes.remove(&id);
        if let Some((_, index)) = &removed {
            tracing::debug!(id = %id, name = %index.meta().name, "closed index");
        }
        removed.is_some()
    }

    /// Number of open indexes.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether no indexes are open.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Validate and stage `xid` on every open index. Stops at the first
    /// failure and returns it; the caller is expected to `rollback_all`.
    pub fn barrier_all(&self, xid: Xid) -> Result<()> {
        for entry in self.indexes.iter() {
            entry.value().barrier(xid)?;
        }
        Ok(())
    }

    /// Publish `xid`'s staged batches on every open index.
    pub fn commit_all(&self, xid: Xid) -> Result<()> {
        for entry in self.indexes.iter() {
            entry.value().commit(xid)?;
        }
        Ok(())
    }

    /// Discard `xid`'s workspaces everywhere. Never fails.
    pub fn rollback_all(&self, xid: Xid) {
        for entry in self.indexes.iter() {
            entry.value().rollback(xid);
        }
    }
}

impl Default for IndexRegistry {
    fn default() -> Self {
        Self::new()
    }
}
