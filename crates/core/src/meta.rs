//! Index metadata and declarative construction requests
//!
//! [`IndexDef`] is what a caller asks for: requirements may be left
//! unspecified and are resolved by whichever factory accepts them.
//! [`IndexMeta`] is what a constructed index actually is: every field
//! concrete, fixed for the index's lifetime.

use crate::error::IndexError;
use crate::types::{EntityId, IndexId, NamespaceId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical organization of an index.
///
/// Only hash organization exists today; the enum keeps the factory
/// contract stable when ordered methods are added by other providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexMethod {
    /// Exact-key hash index. No ordering, no range scans.
    Hash,
}

impl IndexMethod {
    /// Canonical lower-case name, as it appears in DDL.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexMethod::Hash => "hash",
        }
    }
}

impl std::fmt::Display for IndexMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexMethod {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hash" => Ok(IndexMethod::Hash),
            other => Err(IndexError::Unsupported(format!(
                "unknown index method '{other}'"
            ))),
        }
    }
}

/// Resolved identity and shape of a constructed index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Catalog identity.
    pub id: IndexId,
    /// Human-readable name, unique within a registry.
    pub name: String,
    /// Physical organization.
    pub method: IndexMethod,
    /// Whether each key maps to at most one value.
    pub unique: bool,
    /// Whether callers should persist and rebuild this index across
    /// restarts. Interpreted by the surrounding engine, not here.
    pub persistent: bool,
    /// Namespace the indexed entity lives in.
    pub namespace: NamespaceId,
    /// Entity (table, collection) the index covers.
    pub entity: EntityId,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Columns the payload tuples resolve to (typically the primary key).
    pub target_columns: Vec<String>,
}

/// Declarative request for an index.
///
/// `method`, `unique`, and `persistent` are requirements: `None` means
/// "no preference" and lets the factory pick its default. Columns may be
/// supplied from any iterable of string-likes, so a `Vec`, an array, or
/// a slice all behave identically:
///
/// ```
/// use polydex_core::meta::IndexDef;
/// use polydex_core::types::{EntityId, IndexId, NamespaceId};
///
/// let from_array = IndexDef::new(IndexId::new(1), "idx", NamespaceId::new(1), EntityId::new(1))
///     .columns(["a", "b"]);
/// let from_vec = IndexDef::new(IndexId::new(1), "idx", NamespaceId::new(1), EntityId::new(1))
///     .columns(vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(from_array.columns, from_vec.columns);
/// ```
#[derive(Debug, Clone)]
pub struct IndexDef {
    /// Catalog identity for the new index.
    pub id: IndexId,
    /// Name for the new index.
    pub name: String,
    /// Requested physical organization, if any.
    pub method: Option<IndexMethod>,
    /// Requested uniqueness, if any.
    pub unique: Option<bool>,
    /// Requested persistence, if any.
    pub persistent: Option<bool>,
    /// Namespace of the indexed entity.
    pub namespace: NamespaceId,
    /// Indexed entity.
    pub entity: EntityId,
    /// Indexed columns, in key order.
    pub columns: Vec<String>,
    /// Payload target columns.
    pub target_columns: Vec<String>,
}

impl IndexDef {
    /// Start a definition with identity only; requirements default to
    /// unspecified and column lists to empty.
    pub fn new(
        id: IndexId,
        name: impl Into<String>,
        namespace: NamespaceId,
        entity: EntityId,
    ) -> Self {
        IndexDef {
            id,
            name: name.into(),
            method: None,
            unique: None,
            persistent: None,
            namespace,
            entity,
            columns: Vec::new(),
            target_columns: Vec::new(),
        }
    }

    /// Require a physical organization.
    pub fn method(mut self, method: IndexMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Require (or forbid) uniqueness.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Require (or forbid) persistence.
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    /// Set the indexed columns, in key order.
    pub fn columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the payload target columns.
    pub fn target_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.target_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve this request into concrete metadata. The factory that
    /// accepted the request supplies the defaults it chose.
    pub fn into_meta(self, method: IndexMethod, unique: bool, persistent: bool) -> IndexMeta {
        IndexMeta {
            id: self.id,
            name: self.name,
            method,
            unique,
            persistent,
            namespace: self.namespace,
            entity: self.entity,
            columns: self.columns,
            target_columns: self.target_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_its_canonical_name() {
        assert_eq!("hash".parse::<IndexMethod>().unwrap(), IndexMethod::Hash);
        assert!("btree".parse::<IndexMethod>().is_err());
    }

    #[test]
    fn unspecified_requirements_resolve_to_factory_defaults() {
        let def = IndexDef::new(
            IndexId::new(3),
            "idx_users_email",
            NamespaceId::new(1),
            EntityId::new(9),
        )
        .columns(["email"])
        .target_columns(["id"]);
        assert_eq!(def.method, None);

        let meta = def.into_meta(IndexMethod::Hash, true, false);
        assert_eq!(meta.method, IndexMethod::Hash);
        assert!(meta.unique);
        assert!(!meta.persistent);
        assert_eq!(meta.columns, vec!["email".to_string()]);
    }
}
