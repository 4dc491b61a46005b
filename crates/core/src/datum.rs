//! Index keys and payloads
//!
//! An index key is an ordered, fixed-length tuple of opaque comparable
//! scalars — the indexed columns of a row. Payload values use the same
//! tuple shape (typically the primary-key columns the index targets).
//!
//! Equality is element-wise; tuples hash so they can serve directly as
//! keys of the committed mapping.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// One opaque comparable scalar inside a key or payload tuple.
///
/// The engine never computes on datums; it only compares and hashes them.
/// Floating-point columns are not representable on purpose — they have no
/// total equality and cannot participate in a hash index key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Datum {
    /// SQL NULL. Two NULLs compare equal here; key-level NULL semantics
    /// are the caller's concern.
    Null,
    /// Boolean column value.
    Bool(bool),
    /// Integer column value (all integer widths normalize to i64).
    Int(i64),
    /// Character column value.
    Text(String),
    /// Binary column value.
    Bytes(Vec<u8>),
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "NULL"),
            Datum::Bool(b) => write!(f, "{b}"),
            Datum::Int(i) => write!(f, "{i}"),
            Datum::Text(s) => write!(f, "'{s}'"),
            Datum::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int(v.into())
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Text(v)
    }
}

impl From<Vec<u8>> for Datum {
    fn from(v: Vec<u8>) -> Self {
        Datum::Bytes(v)
    }
}

/// An ordered, fixed-length sequence of [`Datum`]s.
///
/// Used both for index keys (the indexed columns of a row) and for
/// payload values (the target columns the index resolves to). Most keys
/// cover a handful of columns, so up to four datums are stored inline.
///
/// # Examples
///
/// ```
/// use polydex_core::datum::Tuple;
///
/// let key = Tuple::from([1, 2, 3]);
/// assert_eq!(key.len(), 3);
/// assert_eq!(key, Tuple::from([1, 2, 3]));
/// assert_ne!(key, Tuple::from([3, 2, 1])); // order matters
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Tuple(SmallVec<[Datum; 4]>);

impl Tuple {
    /// Number of datums in the tuple.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tuple has no datums.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Datum at `pos`, if in range.
    pub fn get(&self, pos: usize) -> Option<&Datum> {
        self.0.get(pos)
    }

    /// Iterate the datums in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Datum> {
        self.0.iter()
    }
}

impl<T: Into<Datum>, const N: usize> From<[T; N]> for Tuple {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl From<Vec<Datum>> for Tuple {
    fn from(values: Vec<Datum>) -> Self {
        Tuple(values.into())
    }
}

impl<T: Into<Datum>> FromIterator<T> for Tuple {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Tuple(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (pos, datum) in self.0.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{datum}")?;
        }
        write!(f, ")")
    }
}

// Debug output matches Display so error messages and assertion diffs
// both read as value tuples.
impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
