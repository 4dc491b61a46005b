//! Identifier types shared across the index engine
//!
//! This module defines the opaque identifiers used throughout the system:
//! - [`Xid`]: transaction identifier scoping one workspace
//! - [`IndexId`], [`NamespaceId`], [`EntityId`]: catalog identities an
//!   index is bound to at construction time

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque transaction identifier.
///
/// An `Xid` scopes exactly one workspace per index. It is allocated by the
/// surrounding transaction manager and carried through every buffering,
/// read, and finalize call. The index engine never interprets it beyond
/// equality and hashing.
///
/// # Examples
///
/// ```
/// use polydex_core::types::Xid;
///
/// let a = Xid::new();
/// let b = Xid::new();
/// assert_ne!(a, b); // each transaction gets a distinct xid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Xid(Uuid);

impl Xid {
    /// Allocate a fresh transaction identifier (UUID v4).
    pub fn new() -> Self {
        Xid(Uuid::new_v4())
    }

    /// Build an `Xid` from raw bytes, for callers that carry their own
    /// transaction identity (e.g. a distributed two-phase-commit id).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Xid(Uuid::from_bytes(bytes))
    }

    /// Raw byte representation.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for Xid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! catalog_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw catalog identifier.
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Raw numeric value.
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

catalog_id! {
    /// Catalog identity of an index.
    IndexId
}

catalog_id! {
    /// Catalog identity of the namespace (schema) an index belongs to.
    NamespaceId
}

catalog_id! {
    /// Catalog identity of the entity (table, collection) an index covers.
    EntityId
}
