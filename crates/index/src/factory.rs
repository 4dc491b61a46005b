//! Declarative index construction
//!
//! A factory advertises which requirement combinations it can satisfy
//! via `can_provide` and builds the matching concrete index. Unspecified
//! requirements (`None`) mean "no preference" and resolve to the
//! factory's defaults.

use crate::cow::{CowHashIndex, CowMultiHashIndex};
use crate::index::Index;
use polydex_core::{IndexDef, IndexError, IndexMethod, Result};

/// Builds concrete indexes from declarative requirements.
pub trait IndexFactory: Send + Sync {
    /// Whether this factory can satisfy the given requirements. `None`
    /// parameters are unconstrained.
    fn can_provide(
        &self,
        method: Option<IndexMethod>,
        unique: Option<bool>,
        persistent: Option<bool>,
    ) -> bool;

    /// Build the index described by `def`. The result starts
    /// uninitialized. Fails with [`IndexError::Unsupported`] when the
    /// requirements are outside what `can_provide` accepts.
    fn create(&self, def: IndexDef) -> Result<Box<dyn Index>>;
}

fn unsupported(factory: &str, def: &IndexDef) -> IndexError {
    IndexError::Unsupported(format!(
        "{factory} cannot provide index '{}' (method {:?}, unique {:?}, persistent {:?})",
        def.name, def.method, def.unique, def.persistent
    ))
}

/// Factory for the unique copy-on-write hash index.
///
/// Accepts method `hash` or unspecified, uniqueness `true` or
/// unspecified, persistence `false` or unspecified.
#[derive(Debug, Default)]
pub struct CowHashIndexFactory;

impl IndexFactory for CowHashIndexFactory {
    fn can_provide(
        &self,
        method: Option<IndexMethod>,
        unique: Option<bool>,
        persistent: Option<bool>,
    ) -> bool {
        method.map_or(true, |m| m == IndexMethod::Hash)
            && unique.unwrap_or(true)
            && !persistent.unwrap_or(false)
    }

    fn create(&self, def: IndexDef) -> Result<Box<dyn Index>> {
        if !self.can_provide(def.method, def.unique, def.persistent) {
            return Err(unsupported("CowHashIndexFactory", &def));
        }
        let meta = def.into_meta(IndexMethod::Hash, true, false);
        Ok(Box::new(CowHashIndex::new(meta)))
    }
}

/// Factory for the multi-valued copy-on-write hash index.
///
/// Accepts method `hash` or unspecified, uniqueness `false` or
/// unspecified, persistence `false` or unspecified.
#[derive(Debug, Default)]
pub struct CowMultiHashIndexFactory;

impl IndexFactory for CowMultiHashIndexFactory {
    fn can_provide(
        &self,
        method: Option<IndexMethod>,
        unique: Option<bool>,
        persistent: Option<bool>,
    ) -> bool {
        method.map_or(true, |m| m == IndexMethod::Hash)
            && !unique.unwrap_or(false)
            && !persistent.unwrap_or(false)
    }

    fn create(&self, def: IndexDef) -> Result<Box<dyn Index>> {
        if !self.can_provide(def.method, def.unique, def.persistent) {
            return Err(unsupported("CowMultiHashIndexFactory", &def));
        }
        let meta = def.into_meta(IndexMethod::Hash, false, false);
        Ok(Box::new(CowMultiHashIndex::new(meta)))
    }
}
