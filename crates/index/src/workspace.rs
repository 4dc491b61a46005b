//! Per-transaction workspaces
//!
//! Each xid owns exactly one workspace per index: an ordered list of
//! pending inserts, a set of pending deletes, and the barrier outcome.
//! Workspaces of different xids never interact, so the table shards by
//! xid and needs no cross-transaction coordination.
//!
//! A workspace has no visibility effect until its barrier has passed —
//! not even for its own transaction. Only after `Passed` does the owner
//! read through the overlay (committed state minus own deletes, plus own
//! inserts); every other transaction keeps reading the bare snapshot.

use dashmap::DashMap;
use polydex_core::{Tuple, Xid};
use rustc_hash::FxHashSet;

/// Result of the validate-and-stage step for one xid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierOutcome {
    /// `barrier` has not run (or the workspace was discarded).
    #[default]
    NotRun,
    /// Validation succeeded; the batch is staged and privately visible.
    Passed,
    /// Validation failed; the workspace is intact, awaiting `rollback`.
    Failed,
}

/// One transaction's pending batch against one index.
#[derive(Debug, Default)]
pub struct Workspace {
    inserts: Vec<(Tuple, Tuple)>,
    deletes: FxHashSet<Tuple>,
    outcome: BarrierOutcome,
}

impl Workspace {
    /// Append a pending insert. Duplicate keys are retained verbatim;
    /// validation is deferred to the barrier.
    pub fn record_insert(&mut self, key: Tuple, value: Tuple) {
        self.inserts.push((key, value));
    }

    /// Record a pending delete. Idempotent.
    pub fn record_delete(&mut self, key: Tuple) {
        self.deletes.insert(key);
    }

    /// Pending inserts in call order.
    pub fn inserts(&self) -> &[(Tuple, Tuple)] {
        &self.inserts
    }

    /// Whether `key` has a pending delete, staged or not.
    pub fn is_deleted(&self, key: &Tuple) -> bool {
        self.deletes.contains(key)
    }

    /// Whether the batch holds no pending operations.
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }

    /// Current barrier outcome.
    pub fn outcome(&self) -> BarrierOutcome {
        self.outcome
    }

    /// Record the barrier outcome. Leaves the batch untouched either way.
    pub fn set_outcome(&mut self, outcome: BarrierOutcome) {
        self.outcome = outcome;
    }

    /// Whether the batch is staged (barrier passed, overlay active).
    pub fn staged(&self) -> bool {
        self.outcome == BarrierOutcome::Passed
    }

    /// The owner's read of `key`, given whether the committed snapshot
    /// holds it. Before a passed barrier the overlay is inert and the
    /// committed observation passes through unchanged.
    pub fn overlay_contains(&self, key: &Tuple, in_committed: bool) -> bool {
        if !self.staged() {
            return in_committed;
        }
        self.has_pending_insert(key) || (in_committed && !self.deletes.contains(key))
    }

    /// Whether any pending insert carries `key`.
    pub fn has_pending_insert(&self, key: &Tuple) -> bool {
        self.inserts.iter().any(|(k, _)| k == key)
    }

    /// Pending values for `key`, in call order.
    pub fn pending_values<'a>(&'a self, key: &'a Tuple) -> impl Iterator<Item = &'a Tuple> {
        self.inserts
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Consume the workspace into its batch, for the commit apply step.
    pub fn into_parts(self) -> (Vec<(Tuple, Tuple)>, FxHashSet<Tuple>) {
        (self.inserts, self.deletes)
    }
}

/// All outstanding workspaces of one index, sharded by xid.
#[derive(Debug, Default)]
pub struct WorkspaceTable {
    table: DashMap<Xid, Workspace>,
}

impl WorkspaceTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer one insert under `xid`, creating the workspace on first use.
    pub fn record_insert(&self, xid: Xid, key: Tuple, value: Tuple) {
        self.table.entry(xid).or_default().record_insert(key, value);
    }

    /// Buffer a batch of inserts under `xid`, preserving order.
    pub fn record_insert_all<I>(&self, xid: Xid, pairs: I)
    where
        I: IntoIterator<Item = (Tuple, Tuple)>,
    {
        let mut workspace = self.table.entry(xid).or_default();
        for (key, value) in pairs {
            workspace.record_insert(key, value);
        }
    }

    /// Buffer one delete under `xid`, creating the workspace on first use.
    pub fn record_delete(&self, xid: Xid, key: Tuple) {
        self.table.entry(xid).or_default().record_delete(key);
    }

    /// Barrier outcome for `xid`; `NotRun` when no workspace exists.
    pub fn outcome(&self, xid: Xid) -> BarrierOutcome {
        self.table
            .get(&xid)
            .map_or(BarrierOutcome::NotRun, |ws| ws.outcome())
    }

    /// Run `f` against the workspace of `xid`, if one exists.
    pub fn read<R>(&self, xid: Xid, f: impl FnOnce(&Workspace) -> R) -> Option<R> {
        self.table.get(&xid).map(|ws| f(&ws))
    }

    /// Run `f` against the workspace of `xid`, creating it if absent.
    pub fn with_entry<R>(&self, xid: Xid, f: impl FnOnce(&mut Workspace) -> R) -> R {
        f(&mut self.table.entry(xid).or_default())
    }

    /// Remove and return the workspace of `xid`.
    pub fn take(&self, xid: Xid) -> Option<Workspace> {
        self.table.remove(&xid).map(|(_, ws)| ws)
    }

    /// Drop the workspace of `xid` entirely. Returns whether one existed.
    pub fn discard(&self, xid: Xid) -> bool {
        self.table.remove(&xid).is_some()
    }

    /// Drop every outstanding workspace (index `clear`).
    pub fn clear(&self) {
        self.table.clear();
    }

    /// Number of outstanding workspaces, for diagnostics.
    pub fn outstanding(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(v: i64) -> Tuple {
        Tuple::from([v])
    }

    #[test]
    fn delete_is_idempotent() {
        let mut ws = Workspace::default();
        ws.record_delete(key(1));
        ws.record_delete(key(1));
        let (_, deletes) = ws.into_parts();
        assert_eq!(deletes.len(), 1);
    }

    #[test]
    fn duplicate_inserts_are_retained() {
        let mut ws = Workspace::default();
        ws.record_insert(key(1), key(10));
        ws.record_insert(key(1), key(20));
        assert_eq!(ws.inserts().len(), 2);
        let values: Vec<_> = ws.pending_values(&key(1)).cloned().collect();
        assert_eq!(values, vec![key(10), key(20)]);
    }

    #[test]
    fn overlay_is_inert_until_staged() {
        let mut ws = Workspace::default();
        ws.record_insert(key(1), key(10));
        ws.record_delete(key(2));

        // Not staged: committed observation passes through untouched.
        assert!(!ws.overlay_contains(&key(1), false));
        assert!(ws.overlay_contains(&key(2), true));

        ws.set_outcome(BarrierOutcome::Passed);
        assert!(ws.overlay_contains(&key(1), false));
        assert!(!ws.overlay_contains(&key(2), true));
    }

    #[test]
    fn staged_delete_then_reinsert_stays_visible() {
        let mut ws = Workspace::default();
        ws.record_delete(key(1));
        ws.record_insert(key(1), key(99));
        ws.set_outcome(BarrierOutcome::Passed);
        // Own inserts apply after own deletes.
        assert!(ws.overlay_contains(&key(1), true));
    }

    #[test]
    fn table_tracks_outcome_per_xid() {
        let table = WorkspaceTable::new();
        let (a, b) = (Xid::new(), Xid::new());

        table.record_insert(a, key(1), key(10));
        assert_eq!(table.outcome(a), BarrierOutcome::NotRun);
        assert_eq!(table.outcome(b), BarrierOutcome::NotRun);

        table.with_entry(a, |ws| ws.set_outcome(BarrierOutcome::Passed));
        assert_eq!(table.outcome(a), BarrierOutcome::Passed);
        assert_eq!(table.outcome(b), BarrierOutcome::NotRun);

        assert!(table.discard(a));
        assert!(!table.discard(a));
        assert_eq!(table.outcome(a), BarrierOutcome::NotRun);
    }
}
