//! Error taxonomy for the index engine
//!
//! Two error classes matter to callers:
//! - [`IndexError::ConstraintViolation`] — raised only by `barrier`, only
//!   on unique indexes. Recoverable: the workspace is left intact and the
//!   only legal next step is `rollback`.
//! - [`IndexError::Protocol`] — a caller sequencing defect (e.g. `commit`
//!   without a passed barrier). Not retried.
//!
//! Everything else is construction- or lifecycle-level and never occurs
//! on the insert/barrier/commit hot path of a well-behaved caller.

use crate::datum::Tuple;
use thiserror::Error;

fn fmt_keys(keys: &[Tuple]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// All errors produced by the index engine.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A unique index saw the same key more than once in the merged
    /// candidate set at barrier time: either two pending inserts share a
    /// key, or a pending insert collides with a committed key the
    /// transaction did not delete.
    #[error("unique constraint violated on index '{index}': conflicting key(s) {}", fmt_keys(.keys))]
    ConstraintViolation {
        /// Name of the violated index.
        index: String,
        /// The offending key(s), deduplicated, in first-seen order.
        keys: Vec<Tuple>,
    },

    /// Caller broke the buffer → barrier → commit/rollback protocol.
    #[error("transaction protocol violation: {0}")]
    Protocol(String),

    /// Operation on an index whose committed state has not been
    /// allocated (`initialize()` not called, or `clear()` since).
    #[error("index '{0}' is not initialized")]
    Uninitialized(String),

    /// No index variant supports the requested combination of storage
    /// method, uniqueness, and persistence.
    #[error("unsupported index requirements: {0}")]
    Unsupported(String),

    /// Registry-level identity clash (duplicate index id or name).
    #[error("index conflict: {0}")]
    Conflict(String),
}

impl IndexError {
    /// Whether this is a barrier-time uniqueness failure. These are the
    /// only errors a caller recovers from (by rolling back).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, IndexError::ConstraintViolation { .. })
    }

    /// Whether this signals a caller sequencing bug.
    pub fn is_protocol(&self) -> bool {
        matches!(self, IndexError::Protocol(_))
    }
}

/// Result alias used across the index engine.
pub type Result<T> = std::result::Result<T, IndexError>;
