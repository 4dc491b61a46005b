//! Core types for the polydex index engine
//!
//! This crate defines the vocabulary the index engine is written in:
//! - [`Datum`] / [`Tuple`]: opaque comparable key and payload tuples
//! - [`Xid`]: the transaction identifier scoping one workspace
//! - [`IndexMeta`] / [`IndexDef`]: what an index is, and how one is asked for
//! - [`IndexError`]: the engine-wide error taxonomy
//!
//! Nothing in here knows how an index stores or validates data; that
//! lives in `polydex-index`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod datum;
pub mod error;
pub mod meta;
pub mod types;

pub use datum::{Datum, Tuple};
pub use error::{IndexError, Result};
pub use meta::{IndexDef, IndexMeta, IndexMethod};
pub use types::{EntityId, IndexId, NamespaceId, Xid};
