//! Collection types used throughout the triangulation.
//!
//! Arenas are `slotmap` storage maps addressed by the typed keys defined
//! here. Internal sets and maps use the fast non-cryptographic `FxHasher`;
//! they are never keyed by untrusted input.

use rustc_hash::FxHashSet;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Key type for accessing vertices in the vertex arena.
    ///
    /// Keys are stable for the lifetime of the triangulation; vertices are
    /// never removed.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing triangles in the triangle arena.
    ///
    /// A key is invalidated when its triangle is removed by a split. Flips
    /// rewrite triangles in place and keep their keys.
    pub struct TriangleKey;
}

/// Arena storage backend.
///
/// Not exposed in public signatures; public methods return iterators
/// instead.
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Optimized `HashSet` for internal lookups.
///
/// # Examples
///
/// ```rust
/// use planar_delaunay::core::collections::FastHashSet;
///
/// let mut set: FastHashSet<u64> = FastHashSet::default();
/// assert!(set.insert(123));
/// assert!(!set.insert(123));
/// ```
pub type FastHashSet<T> = FxHashSet<T>;

/// Stack-allocated buffer that spills to the heap beyond `N` items.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Set of visited triangles, used by point location.
pub type TriangleKeySet = FastHashSet<TriangleKey>;

/// Triangles created by a single split (at most four).
pub type NewTriangleBuffer = SmallBuffer<TriangleKey, 4>;

/// Pending `(triangle, edge)` pairs awaiting legalization.
pub type LegalizeStack = SmallBuffer<(TriangleKey, u8), 16>;

/// Creates a [`FastHashSet`] with room for `capacity` items.
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_distinct_across_insertions() {
        let mut arena: StorageMap<TriangleKey, u32> = StorageMap::with_key();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_ne!(a, b);
        arena.remove(a);
        assert!(!arena.contains_key(a));
        assert_eq!(arena.get(b), Some(&2));
    }

    #[test]
    fn small_buffer_spills() {
        let mut stack = LegalizeStack::new();
        for i in 0..20u8 {
            stack.push((TriangleKey::default(), i % 3));
        }
        assert!(stack.spilled());
        assert_eq!(stack.len(), 20);
    }

    #[test]
    fn capacity_helper() {
        let set: FastHashSet<u32> = fast_hash_set_with_capacity(16);
        assert!(set.capacity() >= 16);
    }
}
