//! Copy-on-write hash index
//!
//! [`CowIndex`] wires the pieces together: an [`IndexCore`] holding the
//! committed snapshot, a [`WorkspaceTable`] of per-xid pending batches,
//! and a commit coordinator serializing the publish step. The variant —
//! unique or multi-valued — is a type parameter fixed at construction,
//! so the uniqueness decision is made once, not re-decided per call.

use crate::barrier::validate;
use crate::commit::CommitCoordinator;
use crate::index::Index;
use crate::state::{IndexCore, MultiState, RawEntries, UniqueState, VariantState};
use crate::workspace::{BarrierOutcome, WorkspaceTable};
use polydex_core::{IndexError, IndexMeta, Result, Tuple, Xid};
use std::sync::Arc;

/// Exact-key unique hash index: each key maps to at most one value.
pub type CowHashIndex = CowIndex<UniqueState>;

/// Exact-key multi-valued hash index: a key maps to any number of
/// values, multiplicities preserved.
pub type CowMultiHashIndex = CowIndex<MultiState>;

/// Copy-on-write transactional hash index over a variant state `S`.
pub struct CowIndex<S: VariantState> {
    meta: IndexMeta,
    core: IndexCore<S>,
    workspaces: WorkspaceTable,
    coordinator: CommitCoordinator,
}

impl<S: VariantState> CowIndex<S> {
    /// Build an index bound to `meta`. Starts uninitialized; call
    /// [`Index::initialize`] before use.
    pub fn new(meta: IndexMeta) -> Self {
        CowIndex {
            meta,
            core: IndexCore::new(),
            workspaces: WorkspaceTable::new(),
            coordinator: CommitCoordinator::new(),
        }
    }

    fn snapshot(&self) -> Result<Arc<S>> {
        self.core
            .snapshot()
            .ok_or_else(|| IndexError::Uninitialized(self.meta.name.clone()))
    }

    fn contains_in(&self, snapshot: &S, xid: Xid, key: &Tuple) -> bool {
        let in_committed = snapshot.contains_key(key);
        self.workspaces
            .read(xid, |ws| ws.overlay_contains(key, in_committed))
            .unwrap_or(in_committed)
    }
}

impl<S: VariantState> Index for CowIndex<S> {
    fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    fn initialize(&self) {
        self.core.initialize();
    }

    fn clear(&self) {
        self.core.clear();
        self.workspaces.clear();
        tracing::debug!(index = %self.meta.name, "cleared index");
    }

    fn is_initialized(&self) -> bool {
        self.core.is_initialized()
    }

    fn size(&self) -> Result<usize> {
        Ok(self.snapshot()?.len())
    }

    fn insert(&self, xid: Xid, key: Tuple, value: Tuple) -> Result<()> {
        self.snapshot()?;
        self.workspaces.record_insert(xid, key, value);
        Ok(())
    }

    fn insert_all(&self, xid: Xid, pairs: Vec<(Tuple, Tuple)>) -> Result<()> {
        self.snapshot()?;
        self.workspaces.record_insert_all(xid, pairs);
        Ok(())
    }

    fn delete(&self, xid: Xid, key: Tuple) -> Result<()> {
        self.snapshot()?;
        self.workspaces.record_delete(xid, key);
        Ok(())
    }

    fn contains(&self, xid: Xid, key: &Tuple) -> Result<bool> {
        let snapshot = self.snapshot()?;
        Ok(self.contains_in(&snapshot, xid, key))
    }

    fn contains_any(&self, xid: Xid, keys: &[Tuple]) -> Result<bool> {
        let snapshot = self.snapshot()?;
        Ok(keys.iter().any(|key| self.contains_in(&snapshot, xid, key)))
    }

    fn contains_all(&self, xid: Xid, keys: &[Tuple]) -> Result<bool> {
        let snapshot = self.snapshot()?;
        Ok(keys.iter().all(|key| self.contains_in(&snapshot, xid, key)))
    }

    fn lookup(&self, xid: Xid, key: &Tuple) -> Result<Vec<Tuple>> {
        let snapshot = self.snapshot()?;
        let committed = snapshot.values(key).unwrap_or(&[]);
        let overlaid = self.workspaces.read(xid, |ws| {
            if !ws.staged() {
                return committed.to_vec();
            }
            let mut values = if ws.is_deleted(key) {
                Vec::new()
            } else {
                committed.to_vec()
            };
            values.extend(ws.pending_values(key).cloned());
            values
        });
        Ok(overlaid.unwrap_or_else(|| committed.to_vec()))
    }

    fn barrier(&self, xid: Xid) -> Result<()> {
        let snapshot = self.snapshot()?;
        // A transaction that buffered nothing still gets an outcome, so
        // a no-op commit stays legal.
        let conflicts = self.workspaces.with_entry(xid, |ws| {
            match validate::<S>(&snapshot, ws) {
                Ok(()) => {
                    ws.set_outcome(BarrierOutcome::Passed);
                    None
                }
                Err(keys) => {
                    ws.set_outcome(BarrierOutcome::Failed);
                    Some(keys)
                }
            }
        });
        match conflicts {
            None => Ok(()),
            Some(keys) => {
                tracing::debug!(
                    index = %self.meta.name,
                    %xid,
                    conflicts = keys.len(),
                    "barrier failed uniqueness validation"
                );
                Err(IndexError::ConstraintViolation {
                    index: self.meta.name.clone(),
                    keys,
                })
            }
        }
    }

    fn commit(&self, xid: Xid) -> Result<()> {
        self.coordinator
            .commit(&self.meta.name, &self.core, &self.workspaces, xid)
    }

    fn rollback(&self, xid: Xid) {
        self.coordinator
            .rollback(&self.meta.name, &self.workspaces, xid);
    }

    fn outcome(&self, xid: Xid) -> BarrierOutcome {
        self.workspaces.outcome(xid)
    }

    fn raw(&self) -> Result<RawEntries> {
        Ok(self.snapshot()?.raw())
    }
}
