//! # Polydex
//!
//! Copy-on-write transactional secondary indexes for polystore engines.
//!
//! A polydex index lets many in-flight transactions speculatively
//! insert and delete entries, validate constraints against a private
//! view, and then atomically publish — or discard — their changes,
//! without ever exposing partial state to other transactions.
//!
//! ## Quick start
//!
//! ```
//! use polydex::prelude::*;
//!
//! # fn main() -> polydex::Result<()> {
//! let registry = IndexRegistry::new();
//! let index = registry.open(
//!     IndexDef::new(IndexId::new(1), "idx_orders", NamespaceId::new(1), EntityId::new(7))
//!         .unique(true)
//!         .columns(["region", "order_no"])
//!         .target_columns(["id"]),
//! )?;
//!
//! let xid = Xid::new();
//! index.insert(xid, Tuple::from(["eu", "42"]), Tuple::from([1001]))?;
//! index.barrier(xid)?;   // validate and stage
//! index.commit(xid)?;    // publish atomically
//!
//! let reader = Xid::new();
//! assert!(index.contains(reader, &Tuple::from(["eu", "42"]))?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Transaction discipline
//!
//! Every transaction follows `insert`/`delete`* → `barrier` →
//! `commit` | `rollback`. Two rules are deliberate and load-bearing:
//!
//! 1. A pending batch is invisible to **every** read before its barrier
//!    passes — including reads issued by the writing transaction.
//! 2. `rollback` never fails and is legal from any state; it is the
//!    universal recovery path after a failed barrier.

#![warn(missing_docs)]

pub use polydex_core::{
    Datum, EntityId, IndexDef, IndexError, IndexId, IndexMeta, IndexMethod, NamespaceId, Result,
    Tuple, Xid,
};
pub use polydex_index::{
    BarrierOutcome, CowHashIndex, CowHashIndexFactory, CowIndex, CowMultiHashIndex,
    CowMultiHashIndexFactory, Index, IndexFactory, IndexRegistry, RawEntries,
};

pub mod prelude;
