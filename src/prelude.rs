//! Convenience re-exports for typical callers.
//!
//! ```
//! use polydex::prelude::*;
//! ```

pub use crate::{
    Datum, EntityId, Index, IndexDef, IndexError, IndexId, IndexMethod, IndexRegistry,
    NamespaceId, Result, Tuple, Xid,
};
