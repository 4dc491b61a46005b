//! Committed state and the copy-on-write core
//!
//! The committed mapping is an immutable value behind an atomically
//! swappable reference. Readers clone an `Arc` and observe one complete,
//! consistent snapshot for as long as they hold it; `publish` replaces
//! the reference wholesale and never mutates a published map in place.
//!
//! The unique/multi distinction is a strategy chosen once at
//! construction: [`UniqueState`] maps each key to one value,
//! [`MultiState`] to a list of values with multiplicities preserved.

use parking_lot::RwLock;
use polydex_core::Tuple;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Uniform diagnostics export of a committed mapping: key → values.
///
/// The unique variant reports single-element value lists so that
/// administrative consumers handle both variants with one shape.
pub type RawEntries = FxHashMap<Tuple, Vec<Tuple>>;

/// Variant-specific committed mapping, chosen once at construction.
///
/// Implementations are plain values: `clone` must produce an independent
/// map (the commit path clones the current snapshot, edits the clone,
/// and publishes it).
pub trait VariantState: Clone + Default + Send + Sync + 'static {
    /// Whether barrier validation enforces one value per key.
    const UNIQUE: bool;

    /// Whether `key` is present.
    fn contains_key(&self, key: &Tuple) -> bool;

    /// Committed values for `key`, if present.
    fn values(&self, key: &Tuple) -> Option<&[Tuple]>;

    /// Number of distinct keys.
    fn len(&self) -> usize;

    /// Whether the mapping holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply one pending insert. Only called on a private clone, after
    /// a passed barrier has ruled out constraint violations.
    fn apply_insert(&mut self, key: Tuple, value: Tuple);

    /// Remove a key and all its values. Absent keys are a no-op.
    fn remove_key(&mut self, key: &Tuple);

    /// Export the mapping in the uniform diagnostics shape.
    fn raw(&self) -> RawEntries;
}

/// Committed mapping of a unique index: each key holds exactly one value.
#[derive(Debug, Clone, Default)]
pub struct UniqueState {
    entries: FxHashMap<Tuple, Tuple>,
}

impl VariantState for UniqueState {
    const UNIQUE: bool = true;

    fn contains_key(&self, key: &Tuple) -> bool {
        self.entries.contains_key(key)
    }

    fn values(&self, key: &Tuple) -> Option<&[Tuple]> {
        self.entries.get(key).map(std::slice::from_ref)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn apply_insert(&mut self, key: Tuple, value: Tuple) {
        self.entries.insert(key, value);
    }

    fn remove_key(&mut self, key: &Tuple) {
        self.entries.remove(key);
    }

    fn raw(&self) -> RawEntries {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), vec![value.clone()]))
            .collect()
    }
}

/// Committed mapping of a multi-valued index: a key holds any number of
/// values, in insertion order, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct MultiState {
    entries: FxHashMap<Tuple, Vec<Tuple>>,
}

impl VariantState for MultiState {
    const UNIQUE: bool = false;

    fn contains_key(&self, key: &Tuple) -> bool {
        self.entries.contains_key(key)
    }

    fn values(&self, key: &Tuple) -> Option<&[Tuple]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn apply_insert(&mut self, key: Tuple, value: Tuple) {
        self.entries.entry(key).or_default().push(value);
    }

    fn remove_key(&mut self, key: &Tuple) {
        self.entries.remove(key);
    }

    fn raw(&self) -> RawEntries {
        self.entries.clone()
    }
}

/// The single globally-visible committed mapping of one index.
///
/// Holds `None` until `initialize()` allocates the empty state; `clear()`
/// reverts to `None`. Reads clone the `Arc` under a brief read lock and
/// never block behind a publish for longer than the pointer swap.
#[derive(Debug)]
pub struct IndexCore<S> {
    slot: RwLock<Option<Arc<S>>>,
}

impl<S: VariantState> IndexCore<S> {
    /// A new, uninitialized core.
    pub fn new() -> Self {
        IndexCore {
            slot: RwLock::new(None),
        }
    }

    /// Allocate the empty committed state. No-op if already initialized,
    /// so re-initializing never wipes published data.
    pub fn initialize(&self) {
        let mut slot = self.slot.write();
        if slot.is_none() {
            *slot = Some(Arc::new(S::default()));
        }
    }

    /// Drop the committed state, reverting to uninitialized.
    pub fn clear(&self) {
        *self.slot.write() = None;
    }

    /// Whether the committed state has been allocated.
    pub fn is_initialized(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Current snapshot, or `None` before initialization. O(1); callers
    /// holding the returned `Arc` keep observing it across publishes.
    pub fn snapshot(&self) -> Option<Arc<S>> {
        self.slot.read().clone()
    }

    /// Atomically replace the committed state.
    pub fn publish(&self, next: Arc<S>) {
        *self.slot.write() = Some(next);
    }
}

impl<S: VariantState> Default for IndexCore<S> {
    fn default() -> Self {
        Self::new()
    }
}
