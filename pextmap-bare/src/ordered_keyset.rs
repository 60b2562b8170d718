//! Sorted keyset with branchless binary search.

use super::{algorithms::branchless_lower_bound, const_vec::ConstVec, keyset::Keyset};

/// A strict weak ordering, expressed as "less than".
pub trait Compare<K> {
    /// Check if `a` is ordered before `b`.
    fn less(&self, a: &K, b: &K) -> bool;
}

/// The [`Ord`] ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Natural;

impl<K: Ord> Compare<K> for Natural {
    #[inline(always)]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }
}

/// An ordering given by a "less than" closure.
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// use pextmap::{ByFn, Keyset, OrderedKeyset};
///
/// let descending = OrderedKeyset::from_keys_by([1u8, 5, 3], ByFn::new(|a: &u8, b: &u8| a > b));
/// assert_eq!(descending.keys(), [5, 3, 1]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ByFn<F>(F);

impl<F> ByFn<F> {
    /// Wrap a closure returning whether the first argument is ordered before the second.
    #[inline]
    pub const fn new(less: F) -> Self {
        Self(less)
    }
}

impl<K, F: Fn(&K, &K) -> bool> Compare<K> for ByFn<F> {
    #[inline(always)]
    fn less(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}

/// A set of keys stored in sorted order.
///
/// Lookup is a binary search without data-dependent branches. For a handful of keys, this is
/// faster to build and about as fast to query as [`PextKeyset`](crate::PextKeyset). Slots are
/// positions in sorted order.
///
/// The ordering `C` is stored alongside the keys; zero-sized orderings such as [`Natural`] take no
/// space.
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    all(feature = "alloc", feature = "serde"),
    serde(
        bound(
            deserialize = "K: serde::Deserialize<'de> + Copy + Eq, C: serde::Deserialize<'de> + Compare<K>"
        ),
        try_from = "OrderedKeysetInner<K, C>"
    )
)]
pub struct OrderedKeyset<K, C = Natural> {
    /// The actual keyset.
    inner: OrderedKeysetInner<K, C>,
}

/// The actual keyset.
///
/// This is a separate type so that deserialization can validate it with [`TryFrom`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
struct OrderedKeysetInner<K, C> {
    /// Keys, strictly increasing under `compare`.
    keys: ConstVec<K>,

    /// The ordering.
    compare: C,
}

impl<K: Clone, C: Clone> Clone for OrderedKeyset<K, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: OrderedKeysetInner {
                keys: self.inner.keys.clone(),
                compare: self.inner.compare.clone(),
            },
        }
    }
}

impl<K: core::fmt::Debug, C> core::fmt::Debug for OrderedKeyset<K, C> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderedKeyset")
            .field("keys", &&*self.inner.keys)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "build")]
impl<K: Copy + Ord> OrderedKeyset<K> {
    /// Sort keys by [`Ord`].
    ///
    /// # Errors
    ///
    /// Fails if keys repeat.
    #[inline]
    pub fn try_from_keys(keys: impl IntoIterator<Item = K>) -> Result<Self, crate::BuildError> {
        Self::try_from_keys_by(keys, Natural)
    }

    /// Sort keys by [`Ord`].
    ///
    /// # Panics
    ///
    /// Panics if keys repeat.
    #[inline]
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        Self::from_keys_by(keys, Natural)
    }
}

#[cfg(feature = "build")]
impl<K: Copy + Eq, C: Compare<K>> OrderedKeyset<K, C> {
    /// Sort keys by a custom ordering.
    ///
    /// # Errors
    ///
    /// Fails if two keys are equivalent under `compare`.
    #[inline]
    pub fn try_from_keys_by(
        keys: impl IntoIterator<Item = K>,
        compare: C,
    ) -> Result<Self, crate::BuildError> {
        use alloc::vec::Vec;
        use core::cmp::Ordering;

        let keys: Vec<K> = keys.into_iter().collect();
        let mut order: Vec<usize> = (0..keys.len()).collect();
        // Stable, so equivalent keys end up adjacent in input order.
        order.sort_by(|&a, &b| {
            if compare.less(&keys[a], &keys[b]) {
                Ordering::Less
            } else if compare.less(&keys[b], &keys[a]) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
        if let Some(pair) = order
            .windows(2)
            .find(|pair| !compare.less(&keys[pair[0]], &keys[pair[1]]))
        {
            return Err(crate::BuildError::DuplicateKey {
                first: pair[0],
                second: pair[1],
            });
        }

        let sorted: Vec<K> = order.into_iter().map(|index| keys[index]).collect();
        Ok(Self {
            inner: OrderedKeysetInner {
                keys: sorted.into(),
                compare,
            },
        })
    }

    /// Sort keys by a custom ordering.
    ///
    /// # Panics
    ///
    /// Panics if two keys are equivalent under `compare`.
    #[inline]
    #[must_use]
    pub fn from_keys_by(keys: impl IntoIterator<Item = K>, compare: C) -> Self {
        match Self::try_from_keys_by(keys, compare) {
            Ok(keyset) => keyset,
            Err(error) => panic!("failed to build keyset: {error}"),
        }
    }
}

impl<K, C> OrderedKeyset<K, C> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(keys: ConstVec<K>, compare: C) -> Self {
        Self {
            inner: OrderedKeysetInner { keys, compare },
        }
    }

    /// The ordering of the keys.
    #[inline]
    #[must_use]
    pub const fn ordering(&self) -> &C {
        &self.inner.compare
    }
}

impl<K: Copy + Eq, C: Compare<K>> Keyset for OrderedKeyset<K, C> {
    type Key = K;

    /// Resolve a key to its slot, which is its rank in sorted order.
    #[inline]
    fn find(&self, key: K) -> usize {
        let keys = &*self.inner.keys;
        let position = branchless_lower_bound(keys, &key, |a, b| self.inner.compare.less(a, b));
        if keys.get(position) == Some(&key) {
            position
        } else {
            keys.len()
        }
    }

    #[inline]
    fn keys(&self) -> &[K] {
        &self.inner.keys
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Natural {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        gen.path("pextmap::Natural")
    }
}

#[cfg(feature = "codegen")]
impl<K: super::codegen::Codegen, C: super::codegen::Codegen> super::codegen::Codegen
    for OrderedKeyset<K, C>
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let ordered_keyset = gen.path("pextmap::OrderedKeyset");
        let keys = gen.piece(&self.inner.keys);
        let compare = gen.piece(&self.inner.compare);
        quote::quote!(#ordered_keyset::__from_raw_parts(#keys, #compare))
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::OrderedKeyset;
    use serde::{Serialize, Serializer};

    impl<K: Serialize, C: Serialize> Serialize for OrderedKeyset<K, C> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }

    #[cfg(feature = "alloc")]
    mod validation {
        use super::super::{Compare, OrderedKeyset, OrderedKeysetInner};
        use displaydoc::Display;
        use thiserror::Error;

        /// Deserialization validation failures.
        #[derive(Debug, Display, Error)]
        #[non_exhaustive]
        pub enum Error {
            /// key {0} is not ordered after its predecessor
            Unsorted(usize),
        }

        impl<K, C: Compare<K>> TryFrom<OrderedKeysetInner<K, C>> for OrderedKeyset<K, C> {
            type Error = Error;

            #[inline]
            fn try_from(inner: OrderedKeysetInner<K, C>) -> Result<Self, Error> {
                if let Some(index) = inner
                    .keys
                    .windows(2)
                    .position(|pair| !inner.compare.less(&pair[0], &pair[1]))
                {
                    return Err(Error::Unsorted(index + 1));
                }
                Ok(Self { inner })
            }
        }
    }
}

#[cfg(all(test, feature = "build"))]
mod tests {
    use super::*;
    use crate::BuildError;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    #[test]
    fn sorted_slots() {
        let keyset = OrderedKeyset::from_keys([50u32, 10, 123, 53_498, 1230]);
        assert_eq!(keyset.keys(), [10, 50, 123, 1230, 53_498]);
        assert_eq!(keyset.find(10), 0);
        assert_eq!(keyset.find(1230), 3);
        assert_eq!(keyset.find(99), 5);
        assert_eq!(keyset.find(0), 5);
        assert_eq!(keyset.find(u32::MAX), 5);
        assert!(keyset.contains(123));
        assert!(!keyset.contains(124));
    }

    #[test]
    fn empty() {
        let keyset = OrderedKeyset::<i8>::from_keys([]);
        assert!(keyset.is_empty());
        assert_eq!(keyset.find(0), 0);
    }

    #[test]
    fn duplicates() {
        assert_eq!(
            OrderedKeyset::try_from_keys([3i64, -1, 7, -1]).unwrap_err(),
            BuildError::DuplicateKey {
                first: 1,
                second: 3
            },
        );
    }

    #[test]
    fn equivalent_under_ordering() {
        let by_tens = ByFn::new(|a: &u32, b: &u32| a / 10 < b / 10);
        assert_eq!(
            OrderedKeyset::try_from_keys_by([15, 31, 12], by_tens).unwrap_err(),
            BuildError::DuplicateKey {
                first: 0,
                second: 2
            },
        );
    }

    #[test]
    fn custom_ordering() {
        let keyset = OrderedKeyset::from_keys_by([-5i32, 2, -9, 7], ByFn::new(|a: &i32, b: &i32| a.abs() < b.abs()));
        assert_eq!(keyset.keys(), [2, -5, 7, -9]);
        assert_eq!(keyset.find(-9), 3);
        assert_eq!(keyset.find(9), 4);
        assert_eq!(keyset.find(5), 4);
    }

    #[test]
    fn natural_is_zero_sized() {
        assert_eq!(
            core::mem::size_of::<OrderedKeyset<u16>>(),
            core::mem::size_of::<ConstVec<u16>>(),
        );
    }

    proptest! {
        #[test]
        fn matches_naive_search(
            keys in proptest::collection::btree_set(any::<u16>(), 0..40),
            probes in proptest::collection::vec(any::<u16>(), 0..40),
        ) {
            let keyset = OrderedKeyset::from_keys(keys.iter().copied());
            let sorted: Vec<u16> = keys.iter().copied().collect();
            for key in sorted.iter().copied().chain(probes) {
                let expected = sorted.binary_search(&key).unwrap_or(sorted.len());
                prop_assert_eq!(keyset.find(key), expected);
            }
        }
    }
}
