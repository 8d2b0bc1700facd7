//! Inline `i64 -> i32` map for small sizes that spills into a [`PrimitiveLongIntMap`].

use core::fmt::{self, Debug};
use core::mem;
use core::ops::ControlFlow;

use heapless::Vec as HeaplessVec;

use crate::long_int_map::{Iter, PrimitiveLongIntMap};
use crate::visitor::{LongIntVisitor, LongVisitor};

/// A long-to-int map that keeps up to `N` entries inline, then moves to the heap.
///
/// # Overview
/// * **Inline State:** Zero allocations. Entries sit in a `heapless::Vec` and lookups are a
///   linear scan, which beats hashing for a handful of keys.
/// * **Spilled State:** A regular [`PrimitiveLongIntMap`].
/// * **Spill:** Inserting a *new* key into a full inline map moves every entry into a heap
///   table sized for `2 * N`. Overwrites never spill.
///
/// [`clear`](Self::clear) always returns the map to its inline state.
///
/// ```rust
/// use primitive_collections::SmallLongIntMap;
///
/// let mut map: SmallLongIntMap<4> = SmallLongIntMap::new();
/// for k in 0..4 {
///     map.put(k, 1);
/// }
/// assert!(map.is_inline());
///
/// map.put(4, 1);
/// assert!(!map.is_inline());
/// assert_eq!(map.len(), 5);
/// ```
#[derive(Clone)]
pub struct SmallLongIntMap<const N: usize> {
    storage: Storage<N>,
}

#[derive(Clone)]
enum Storage<const N: usize> {
    Inline(HeaplessVec<(i64, i32), N>),
    Spilled(PrimitiveLongIntMap),
}

// --- 1. Core Implementation ---

impl<const N: usize> SmallLongIntMap<N> {
    /// The maximum allowed inline size in bytes (16 KB).
    pub const MAX_STACK_SIZE: usize = 16 * 1024;

    /// Creates an empty inline map.
    ///
    /// # Compile-Time Safety Check
    /// The build fails if `N` is zero or if the inline storage would exceed
    /// [`MAX_STACK_SIZE`](Self::MAX_STACK_SIZE).
    pub fn new() -> Self {
        const {
            assert!(N > 0, "SmallLongIntMap needs room for at least one inline entry");
            assert!(
                core::mem::size_of::<Self>() <= SmallLongIntMap::<N>::MAX_STACK_SIZE,
                "SmallLongIntMap is too large! Reduce N."
            );
        }

        Self {
            storage: Storage::Inline(HeaplessVec::new()),
        }
    }

    /// Returns `true` while the entries are stored inline.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Inline(entries) => entries.len(),
            Storage::Spilled(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and returns to inline storage, releasing any heap table.
    pub fn clear(&mut self) {
        self.storage = Storage::Inline(HeaplessVec::new());
    }

    /// Inserts or overwrites, returning the previous value for `key`.
    pub fn put(&mut self, key: i64, value: i32) -> Option<i32> {
        match &mut self.storage {
            Storage::Inline(entries) => {
                if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                    return Some(mem::replace(&mut entry.1, value));
                }
                match entries.push((key, value)) {
                    Ok(()) => None,
                    Err(pending) => {
                        self.spill_to_heap(pending);
                        None
                    }
                }
            }
            Storage::Spilled(map) => map.put(key, value),
        }
    }

    pub fn get(&self, key: i64) -> Option<i32> {
        match &self.storage {
            Storage::Inline(entries) => entries.iter().find(|(k, _)| *k == key).map(|&(_, v)| v),
            Storage::Spilled(map) => map.get(key),
        }
    }

    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value. A spilled map stays on the heap.
    pub fn remove(&mut self, key: i64) -> Option<i32> {
        match &mut self.storage {
            Storage::Inline(entries) => {
                let pos = entries.iter().position(|(k, _)| *k == key)?;
                Some(entries.swap_remove(pos).1)
            }
            Storage::Spilled(map) => map.remove(key),
        }
    }

    /// Moves the inline entries plus `pending` into a heap table.
    #[inline(never)]
    fn spill_to_heap(&mut self, pending: (i64, i32)) {
        let mut map = PrimitiveLongIntMap::with_capacity(N.saturating_mul(2));
        if let Storage::Inline(entries) = &self.storage {
            map.extend(entries.iter().copied());
        }
        map.put(pending.0, pending.1);
        self.storage = Storage::Spilled(map);
    }
}

// --- 2. Traversal ---

impl<const N: usize> SmallLongIntMap<N> {
    /// Same contract as [`PrimitiveLongIntMap::visit_keys`]; inline entries are visited
    /// in storage order.
    pub fn visit_keys<V>(&self, visitor: &mut V) -> ControlFlow<V::Break>
    where
        V: LongVisitor + ?Sized,
    {
        match &self.storage {
            Storage::Inline(entries) => {
                for &(k, _) in entries.iter() {
                    visitor.visited(k)?;
                }
                ControlFlow::Continue(())
            }
            Storage::Spilled(map) => map.visit_keys(visitor),
        }
    }

    /// Same contract as [`PrimitiveLongIntMap::visit_entries`].
    pub fn visit_entries<V>(&self, visitor: &mut V) -> ControlFlow<V::Break>
    where
        V: LongIntVisitor + ?Sized,
    {
        match &self.storage {
            Storage::Inline(entries) => {
                for &(k, v) in entries.iter() {
                    visitor.visited(k, v)?;
                }
                ControlFlow::Continue(())
            }
            Storage::Spilled(map) => map.visit_entries(visitor),
        }
    }

    pub fn iter(&self) -> SmallLongIntMapIter<'_> {
        match &self.storage {
            Storage::Inline(entries) => SmallLongIntMapIter::Inline(entries.iter()),
            Storage::Spilled(map) => SmallLongIntMapIter::Spilled(map.iter()),
        }
    }
}

/// Wrapper for iterators to hide the underlying storage difference.
pub enum SmallLongIntMapIter<'a> {
    Inline(core::slice::Iter<'a, (i64, i32)>),
    Spilled(Iter<'a>),
}

impl Iterator for SmallLongIntMapIter<'_> {
    type Item = (i64, i32);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SmallLongIntMapIter::Inline(i) => i.next().copied(),
            SmallLongIntMapIter::Spilled(i) => i.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SmallLongIntMapIter::Inline(i) => i.size_hint(),
            SmallLongIntMapIter::Spilled(i) => i.size_hint(),
        }
    }
}

impl ExactSizeIterator for SmallLongIntMapIter<'_> {}

// --- 3. Trait Implementations ---

impl<const N: usize> Default for SmallLongIntMap<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Debug for SmallLongIntMap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<const N: usize> FromIterator<(i64, i32)> for SmallLongIntMap<N> {
    fn from_iter<T: IntoIterator<Item = (i64, i32)>>(iter: T) -> Self {
        let mut map = SmallLongIntMap::new();
        for (k, v) in iter {
            map.put(k, v);
        }
        map
    }
}

impl<'a, const N: usize> IntoIterator for &'a SmallLongIntMap<N> {
    type Item = (i64, i32);
    type IntoIter = SmallLongIntMapIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- 4. Test Suite ---
