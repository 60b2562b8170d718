//! Borrowed, type-erased map views.

use super::keyset::Keyset;

/// A borrowed map whose keyset type is erased.
///
/// Functions that accept a `MapSpan` work with maps over any keyset kind without becoming generic
/// over it. Spans are cheap to copy.
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// use pextmap::{Map, MapSpan, OrderedKeyset, PextKeyset};
///
/// fn total(span: MapSpan<'_, u8, u32>) -> u32 {
///     span.values().iter().sum()
/// }
///
/// let small = Map::from_entries(OrderedKeyset::from_keys([1u8, 2]), [(1, 10), (2, 20)]);
/// let large = Map::from_entries(PextKeyset::from_keys([3u8, 4]), [(3, 30), (4, 40)]);
/// assert_eq!(total(small.as_span()) + total(large.as_span()), 100);
/// ```
pub struct MapSpan<'a, K, V> {
    /// Key to slot resolution.
    keyset: &'a dyn Keyset<Key = K>,

    /// Values, indexed by slot.
    values: &'a [V],
}

impl<K, V> Clone for MapSpan<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapSpan<'_, K, V> {}

impl<K: Copy + Eq + core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for MapSpan<'_, K, V> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: Copy + Eq, V> MapSpan<'a, K, V> {
    /// Pair a keyset with its values.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not hold exactly one value per key.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(keyset: &'a dyn Keyset<Key = K>, values: &'a [V]) -> Self {
        assert_eq!(keyset.len(), values.len(), "one value per key is required");
        Self { keyset, values }
    }

    /// Resolve a key to its slot, or to [`len`](Self::len) if absent.
    #[inline]
    #[must_use]
    pub fn find(&self, key: K) -> usize {
        self.keyset.find(key)
    }

    /// Get the value for a key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: K) -> Option<&'a V> {
        self.values.get(self.find(key))
    }

    /// Get the stored key and its value.
    #[inline]
    #[must_use]
    pub fn get_key_value(&self, key: K) -> Option<(K, &'a V)> {
        self.get(key).map(|value| (key, value))
    }

    /// Get the value for a key that must be present.
    ///
    /// # Panics
    ///
    /// Panics if the key is absent.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn at(&self, key: K) -> &'a V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found"),
        }
    }

    /// Get the value for a key without checking that it is present.
    ///
    /// # Safety
    ///
    /// The key must be present in the keyset.
    #[inline]
    #[must_use]
    pub unsafe fn get_unchecked(&self, key: K) -> &'a V {
        let slot = self.find(key);
        debug_assert!(slot < self.len(), "key not found");
        // SAFETY: The caller guarantees the key is present, so `slot < len == values.len()`.
        unsafe { self.values.get_unchecked(slot) }
    }

    /// Check if the span contains a key.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: K) -> bool {
        self.keyset.contains(key)
    }

    /// Get number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the span is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate through entries in slot order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (K, &'a V)> + 'a {
        self.keyset.keys().iter().copied().zip(self.values)
    }

    /// Iterate through keys in slot order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = K> + 'a {
        self.keyset.keys().iter().copied()
    }

    /// Values in slot order.
    #[inline]
    #[must_use]
    pub const fn values(&self) -> &'a [V] {
        self.values
    }

    /// The keyset.
    #[inline]
    #[must_use]
    pub fn keyset(&self) -> &'a dyn Keyset<Key = K> {
        self.keyset
    }
}

impl<K: Copy + Eq, V> core::ops::Index<K> for MapSpan<'_, K, V> {
    type Output = V;

    #[inline]
    #[track_caller]
    fn index(&self, key: K) -> &V {
        self.at(key)
    }
}

#[cfg(all(test, feature = "build"))]
mod tests {
    use super::*;
    use crate::{Map, OrderedKeyset, PextKeyset};
    use alloc::vec::Vec;

    fn describe(span: MapSpan<'_, char, u32>) -> Vec<(char, u32)> {
        let mut entries: Vec<(char, u32)> = span.iter().map(|(key, &value)| (key, value)).collect();
        entries.sort_unstable();
        entries
    }

    #[test]
    fn same_view_over_both_kinds() {
        let entries = [('x', 1), ('y', 2), ('z', 3)];
        let ordered = Map::from_entries(OrderedKeyset::from_keys(['z', 'x', 'y']), entries);
        let pext = Map::from_entries(PextKeyset::from_keys(['y', 'z', 'x']), entries);
        assert_eq!(describe(ordered.as_span()), entries);
        assert_eq!(describe(pext.as_span()), entries);
    }

    #[test]
    fn read_api() {
        let map = Map::from_entries(PextKeyset::from_keys([10u16, 20]), [(10, "ten"), (20, "twenty")]);
        let span = map.as_span();
        let copy = span;
        assert_eq!(span.len(), 2);
        assert!(!copy.is_empty());
        assert_eq!(span.get(10), Some(&"ten"));
        assert_eq!(span.get(15), None);
        assert_eq!(span.find(15), 2);
        assert_eq!(span.get_key_value(20), Some((20, &"twenty")));
        assert_eq!(span[20], "twenty");
        assert_eq!(*span.at(10), "ten");
        // SAFETY: 20 is present.
        assert_eq!(unsafe { *span.get_unchecked(20) }, "twenty");
        assert!(span.contains_key(10));
        assert!(!span.contains_key(11));
        assert_eq!(span.keys().count(), 2);
        assert_eq!(span.keyset().len(), 2);
        assert_eq!(span.values().len(), 2);
    }

    #[test]
    #[should_panic(expected = "one value per key is required")]
    fn mismatched_lengths() {
        let keyset = OrderedKeyset::from_keys([1u8, 2]);
        let _ = MapSpan::new(&keyset, &[0u8]);
    }
}
