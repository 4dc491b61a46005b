//! Commit coordination
//!
//! Commit is the only mutator of committed state. It clones the current
//! snapshot, removes the transaction's pending deletes, applies its
//! pending inserts in call order, and publishes the result — the same
//! own-deletes-then-own-inserts rule the staged overlay uses, so what a
//! transaction saw after its barrier is exactly what everyone sees after
//! its commit.
//!
//! Concurrent commits from different xids serialize only around this
//! clone-edit-publish step; buffering and validation stay lock-free.

use crate::state::{IndexCore, VariantState};
use crate::workspace::{BarrierOutcome, WorkspaceTable};
use polydex_core::{IndexError, Result, Xid};
use std::sync::Arc;

/// Serializes the publish step of one index.
#[derive(Debug, Default)]
pub(crate) struct CommitCoordinator {
    publish_lock: parking_lot::Mutex<()>,
}

impl CommitCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Merge the staged workspace of `xid` into the committed state and
    /// discard it. Requires a passed barrier.
    pub(crate) fn commit<S: VariantState>(
        &self,
        index: &str,
        core: &IndexCore<S>,
        workspaces: &WorkspaceTable,
        xid: Xid,
    ) -> Result<()> {
        match workspaces.outcome(xid) {
            BarrierOutcome::Passed => {}
            outcome => {
                return Err(IndexError::Protocol(format!(
                    "commit of {xid} on index '{index}': no passed barrier to commit \
                     (outcome {outcome:?})"
                )));
            }
        }

        let _guard = self.publish_lock.lock();

        let Some(snapshot) = core.snapshot() else {
            return Err(IndexError::Uninitialized(index.to_string()));
        };
        // A passed outcome implies the workspace exists, and the owning
        // transaction is the only caller that can touch it.
        let Some(workspace) = workspaces.take(xid) else {
            return Err(IndexError::Protocol(format!(
                "commit of {xid} on index '{index}': workspace already discarded"
            )));
        };

        let (inserts, deletes) = workspace.into_parts();
        if inserts.is_empty() && deletes.is_empty() {
            tracing::debug!(index, %xid, "commit of empty batch, nothing to publish");
            return Ok(());
        }

        let mut next = (*snapshot).clone();
        for key in &deletes {
            next.remove_key(key);
        }
        let inserted = inserts.len();
        for (key, value) in inserts {
            next.apply_insert(key, value);
        }
        core.publish(Arc::new(next));

        tracing::debug!(
            index,
            %xid,
            inserted,
            deleted = deletes.len(),
            "published new committed state"
        );
        Ok(())
    }

    /// Discard the workspace of `xid` without touching committed state.
    /// Legal from any state; the universal recovery path.
    pub(crate) fn rollback(&self, index: &str, workspaces: &WorkspaceTable, xid: Xid) {
        if workspaces.discard(xid) {
            tracing::debug!(index, %xid, "rolled back workspace");
        }
    }
}
