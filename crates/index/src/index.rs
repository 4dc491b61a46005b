//! Public index contract
//!
//! The operations the surrounding execution and transaction layers see.
//! Call ordering per transaction is `insert`/`insert_all`/`delete`*,
//! then `barrier`, then `commit` or `rollback`; the transaction manager
//! enforces it as one participant of a larger two-phase commit.

use crate::state::RawEntries;
use crate::workspace::BarrierOutcome;
use polydex_core::{IndexMeta, Result, Tuple, Xid};

/// A transactional secondary index.
///
/// Implementations are safe for concurrent use by many transaction
/// threads: reads and buffering never block, and only the commit publish
/// step serializes.
pub trait Index: Send + Sync {
    /// Identity and shape fixed at construction.
    fn meta(&self) -> &IndexMeta;

    /// Allocate the empty committed state. Idempotent.
    fn initialize(&self);

    /// Revert to uninitialized: drop the committed state and every
    /// outstanding workspace.
    fn clear(&self);

    /// Whether `initialize()` has run (and `clear()` has not since).
    fn is_initialized(&self) -> bool;

    /// Number of distinct keys in the committed state.
    fn size(&self) -> Result<usize>;

    /// Buffer one insert under `xid`. Invisible to every read, including
    /// `xid`'s own, until that transaction's barrier passes.
    fn insert(&self, xid: Xid, key: Tuple, value: Tuple) -> Result<()>;

    /// Buffer a batch of inserts under `xid`, preserving order.
    /// Duplicate keys within the batch are retained; validation is
    /// deferred to the barrier.
    fn insert_all(&self, xid: Xid, pairs: Vec<(Tuple, Tuple)>) -> Result<()>;

    /// Buffer a delete of `key` under `xid`. Idempotent; deleting a key
    /// absent everywhere records an intent and ends up a no-op.
    fn delete(&self, xid: Xid, key: Tuple) -> Result<()>;

    /// Whether `key` is visible to `xid`: the committed snapshot, plus
    /// `xid`'s own staged overlay once its barrier has passed.
    fn contains(&self, xid: Xid, key: &Tuple) -> Result<bool>;

    /// Whether any of `keys` is visible to `xid`.
    fn contains_any(&self, xid: Xid, keys: &[Tuple]) -> Result<bool>;

    /// Whether all of `keys` are visible to `xid`.
    fn contains_all(&self, xid: Xid, keys: &[Tuple]) -> Result<bool>;

    /// Payload values visible to `xid` for an exact key, through the
    /// same overlay as `contains`. Empty when the key is absent.
    fn lookup(&self, xid: Xid, key: &Tuple) -> Result<Vec<Tuple>>;

    /// Validate and stage `xid`'s batch. On a unique index a duplicate
    /// key in the merged candidate set fails with
    /// [`polydex_core::IndexError::ConstraintViolation`], leaving the
    /// workspace intact for inspection; the only legal next step is
    /// `rollback`. On success the batch becomes visible to `xid` alone.
    fn barrier(&self, xid: Xid) -> Result<()>;

    /// Publish `xid`'s staged batch into the committed state and discard
    /// the workspace. Fails with
    /// [`polydex_core::IndexError::Protocol`] unless this xid's barrier
    /// has passed.
    fn commit(&self, xid: Xid) -> Result<()>;

    /// Discard `xid`'s workspace without touching committed state.
    /// Always legal, never fails.
    fn rollback(&self, xid: Xid);

    /// Barrier outcome recorded for `xid`, for diagnostics and call-site
    /// assertions. `NotRun` when no workspace exists.
    fn outcome(&self, xid: Xid) -> BarrierOutcome;

    /// The underlying committed mapping, bypassing isolation. For
    /// administrative and statistics use only.
    fn raw(&self) -> Result<RawEntries>;
}

impl std::fmt::Debug for dyn Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index").field("meta", self.meta()).finish()
    }
}
