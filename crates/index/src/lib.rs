//! Copy-on-write transactional secondary indexes
//!
//! This crate implements the index engine: many in-flight transactions
//! speculatively buffer inserts and deletes, validate constraints
//! against a private view, and only then publish — or discard — their
//! changes, without ever exposing partial state to other transactions.
//!
//! ## Transaction discipline
//!
//! ```text
//! insert/insert_all/delete*   buffer into the xid's private workspace
//! barrier                     validate once; stage (or fail, intact)
//! commit | rollback           publish atomically, or discard
//! ```
//!
//! Two deliberate rules shape the semantics:
//! - A pending batch is invisible to *every* read before its barrier
//!   passes — including reads by the writing transaction itself.
//! - The committed mapping is an immutable value swapped by reference,
//!   so reads never block and never tear.
//!
//! ## Entry points
//!
//! - [`Index`]: the public operation surface
//! - [`CowHashIndex`] / [`CowMultiHashIndex`]: the unique and
//!   multi-valued variants
//! - [`IndexFactory`] and [`IndexRegistry`]: declarative construction
//!   and transaction fan-out

#![warn(missing_docs)]
#![warn(clippy::all)]

mod barrier;
mod commit;
mod workspace;

pub mod cow;
pub mod factory;
pub mod index;
pub mod registry;
pub mod state;

pub use cow::{CowHashIndex, CowIndex, CowMultiHashIndex};
pub use factory::{CowHashIndexFactory, CowMultiHashIndexFactory, IndexFactory};
pub use index::Index;
pub use registry::IndexRegistry;
pub use state::{IndexCore, MultiState, RawEntries, UniqueState, VariantState};
pub use workspace::BarrierOutcome;
