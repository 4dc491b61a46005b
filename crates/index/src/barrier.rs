//! Barrier validation
//!
//! The barrier is the single validation point of a batch. For a unique
//! index it checks the candidate key multiset — committed keys minus the
//! transaction's pending deletes, unioned with its pending insert keys —
//! and fails if any key occurs more than once. The committed state is
//! never touched here: a barrier only computes.

use crate::state::VariantState;
use crate::workspace::Workspace;
use polydex_core::Tuple;
use rustc_hash::FxHashSet;

/// Validate one workspace against a committed snapshot.
///
/// Returns the conflicting keys (deduplicated, first-seen order) on
/// failure. Multi-valued variants skip the check structurally.
pub(crate) fn validate<S: VariantState>(
    committed: &S,
    workspace: &Workspace,
) -> Result<(), Vec<Tuple>> {
    if !S::UNIQUE {
        return Ok(());
    }

    let mut seen: FxHashSet<&Tuple> = FxHashSet::default();
    let mut conflicts: Vec<Tuple> = Vec::new();

    for (key, _) in workspace.inserts() {
        let duplicate_in_batch = !seen.insert(key);
        let collides_with_committed =
            committed.contains_key(key) && !workspace.is_deleted(key);
        if (duplicate_in_batch || collides_with_committed) && !conflicts.contains(key) {
            conflicts.push(key.clone());
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(conflicts)
    }
}
