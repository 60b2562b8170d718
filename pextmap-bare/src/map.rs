//! Keyset/value array composition.

use super::{
    const_vec::ConstVec,
    keyset::{AnyKeyset, Keyset},
    span::MapSpan,
};

/// A map built from a keyset and one value per slot.
///
/// `KS` is any [`Keyset`]. Owning the keyset gives a self-contained map; using `&KS` instead
/// shares one keyset between several maps with different value types, see [`Valueset`].
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// use pextmap::{Keyset, Map, PextKeyset};
///
/// let keyset = PextKeyset::from_keys([200u16, 404, 500]);
/// let reasons = Map::from_entries(&keyset, [(404, "Not Found"), (200, "OK"), (500, "Internal Server Error")]);
/// let retry = Map::from_entries(&keyset, [(200, false), (404, false), (500, true)]);
///
/// assert_eq!(reasons.get(404), Some(&"Not Found"));
/// assert!(retry[500]);
/// assert_eq!(reasons.find(302), 3);
/// ```
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    all(feature = "alloc", feature = "serde"),
    serde(
        bound(deserialize = "KS: serde::Deserialize<'de> + Keyset, V: serde::Deserialize<'de>"),
        try_from = "MapInner<KS, V>"
    )
)]
pub struct Map<KS, V> {
    /// The actual map.
    inner: MapInner<KS, V>,
}

/// A map that borrows its keyset.
pub type Valueset<'keyset, KS, V> = Map<&'keyset KS, V>;

/// A map whose keyset kind is picked by key count, as built by
/// [`Builder::build_map`](crate::Builder::build_map) and the `map!` macro.
pub type AutoMap<K, V> = Map<AnyKeyset<K>, V>;

/// The actual map.
///
/// This is a separate type so that deserialization can validate it with [`TryFrom`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
struct MapInner<KS, V> {
    /// Key to slot resolution.
    keyset: KS,

    /// Values, indexed by slot.
    values: ConstVec<V>,
}

impl<KS: Clone, V: Clone> Clone for Map<KS, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: MapInner {
                keyset: self.inner.keyset.clone(),
                values: self.inner.values.clone(),
            },
        }
    }
}

impl<KS: Keyset, V: core::fmt::Debug> core::fmt::Debug for Map<KS, V>
where
    KS::Key: core::fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(feature = "build")]
impl<KS: Keyset, V> Map<KS, V> {
    /// Place each value at the slot of its key.
    ///
    /// Every key of the keyset must receive exactly one value.
    ///
    /// # Errors
    ///
    /// Fails if an entry's key is not in the keyset, two entries share a key, or a key has no
    /// entry.
    #[inline]
    pub fn try_from_entries(
        keyset: KS,
        entries: impl IntoIterator<Item = (KS::Key, V)>,
    ) -> Result<Self, crate::BuildError> {
        use super::algorithms::{scatter, ScatterError};
        use alloc::vec::Vec;

        let len = keyset.len();
        let mut slots: Vec<Option<(KS::Key, V)>> = (0..len).map(|_| None).collect();
        scatter(
            entries,
            |&(key, _)| {
                let slot = keyset.find(key);
                (slot < len).then_some(slot)
            },
            &mut slots,
        )
        .map_err(|error| match error {
            ScatterError::Unmapped(index) => crate::BuildError::UnknownKey { index },
            ScatterError::Occupied(index) => crate::BuildError::DuplicateValue { index },
        })?;

        let values = slots
            .into_iter()
            .enumerate()
            .map(|(slot, entry)| {
                entry
                    .map(|(_, value)| value)
                    .ok_or(crate::BuildError::MissingValue { slot })
            })
            .collect::<Result<Vec<V>, _>>()?;
        Ok(Self::__from_raw_parts(keyset, values.into()))
    }

    /// Place each value at the slot of its key.
    ///
    /// # Panics
    ///
    /// Panics if an entry's key is not in the keyset, two entries share a key, or a key has no
    /// entry.
    #[inline]
    #[must_use]
    pub fn from_entries(keyset: KS, entries: impl IntoIterator<Item = (KS::Key, V)>) -> Self {
        match Self::try_from_entries(keyset, entries) {
            Ok(map) => map,
            Err(error) => panic!("failed to build map: {error}"),
        }
    }

    /// Use values that are already in slot order.
    ///
    /// # Errors
    ///
    /// Fails if the number of values differs from the number of keys.
    #[inline]
    pub fn try_from_slots(
        keyset: KS,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self, crate::BuildError> {
        let values: alloc::vec::Vec<V> = values.into_iter().collect();
        if values.len() != keyset.len() {
            return Err(crate::BuildError::LengthMismatch {
                expected: keyset.len(),
                actual: values.len(),
            });
        }
        Ok(Self::__from_raw_parts(keyset, values.into()))
    }

    /// Give every key the default value.
    #[inline]
    #[must_use]
    pub fn with_default_values(keyset: KS) -> Self
    where
        V: Default,
    {
        let values = (0..keyset.len()).map(|_| V::default()).collect::<alloc::vec::Vec<V>>();
        Self::__from_raw_parts(keyset, values.into())
    }
}

impl<KS, V> Map<KS, V> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(keyset: KS, values: ConstVec<V>) -> Self {
        Self {
            inner: MapInner { keyset, values },
        }
    }

    /// The keyset.
    #[inline]
    #[must_use]
    pub const fn keyset(&self) -> &KS {
        &self.inner.keyset
    }

    /// Values in slot order.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.inner.values
    }
}

impl<KS: Keyset, V> Map<KS, V> {
    /// Resolve a key to its slot, or to [`len`](Self::len) if absent.
    #[inline]
    #[must_use]
    pub fn find(&self, key: KS::Key) -> usize {
        self.inner.keyset.find(key)
    }

    /// Get the value for a key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: KS::Key) -> Option<&V> {
        self.inner.values.get(self.find(key))
    }

    /// Get the stored key and its value.
    #[inline]
    #[must_use]
    pub fn get_key_value(&self, key: KS::Key) -> Option<(KS::Key, &V)> {
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
    pub fn at(&self, key: KS::Key) -> &V {
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
    pub unsafe fn get_unchecked(&self, key: KS::Key) -> &V {
        let slot = self.find(key);
        debug_assert!(slot < self.len(), "key not found");
        // SAFETY: The caller guarantees the key is present, so `slot < len == values.len()`.
        unsafe { self.inner.values.get_unchecked(slot) }
    }

    /// Check if the map contains a key.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: KS::Key) -> bool {
        self.inner.keyset.contains(key)
    }

    /// Get number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values.len()
    }

    /// Check if the map is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate through entries in slot order.
    ///
    /// For a perfect-hash keyset this is bucket order; for an ordered keyset, sorted order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (KS::Key, &V)> + '_ {
        self.inner
            .keyset
            .keys()
            .iter()
            .copied()
            .zip(self.inner.values.iter())
    }

    /// Iterate through keys in slot order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = KS::Key> + '_ {
        self.inner.keyset.keys().iter().copied()
    }

    /// Borrow the map as a span, erasing the keyset type.
    #[inline]
    #[must_use]
    pub fn as_span(&self) -> MapSpan<'_, KS::Key, V> {
        MapSpan::new(&self.inner.keyset, &self.inner.values)
    }
}

impl<KS: Keyset, V> core::ops::Index<KS::Key> for Map<KS, V> {
    type Output = V;

    #[inline]
    #[track_caller]
    fn index(&self, key: KS::Key) -> &V {
        self.at(key)
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::Map;
    use serde::{Serialize, Serializer};

    impl<KS: Serialize, V: Serialize> Serialize for Map<KS, V> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }

    #[cfg(feature = "alloc")]
    mod validation {
        use super::super::{Keyset, Map, MapInner};
        use displaydoc::Display;
        use thiserror::Error;

        /// Deserialization validation failures.
        #[derive(Debug, Display, Error)]
        #[non_exhaustive]
        pub enum Error {
            /// {values} values for {keys} keys
            WrongValueCount {
                /// Number of keys.
                keys: usize,
                /// Number of values.
                values: usize,
            },
        }

        impl<KS: Keyset, V> TryFrom<MapInner<KS, V>> for Map<KS, V> {
            type Error = Error;

            #[inline]
            fn try_from(inner: MapInner<KS, V>) -> Result<Self, Error> {
                if inner.keyset.len() != inner.values.len() {
                    return Err(Error::WrongValueCount {
                        keys: inner.keyset.len(),
                        values: inner.values.len(),
                    });
                }
                Ok(Self { inner })
            }
        }
    }
}

#[cfg(feature = "codegen")]
impl<KS: super::codegen::Codegen, V: super::codegen::Codegen> super::codegen::Codegen
    for Map<KS, V>
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let map = gen.path("pextmap::Map");
        let keyset = gen.piece(&self.inner.keyset);
        let values = gen.piece(&self.inner.values);
        quote::quote!(#map::__from_raw_parts(#keyset, #values))
    }
}
