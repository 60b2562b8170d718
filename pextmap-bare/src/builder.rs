//! Build configuration and keyset selection.

#![cfg(feature = "build")]

use super::{
    algorithms::find_duplicate,
    error::BuildError,
    key::{Key, RawInt},
    keyset::AnyKeyset,
    lookup_table::OffsetWidth,
    map::{AutoMap, Map},
    mask_search::search_mask,
    ordered_keyset::{Compare, Natural, OrderedKeyset},
    pext::Pext,
    pext_keyset::PextKeyset,
};
use alloc::vec::Vec;

/// Build settings.
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// use pextmap::{AnyKeyset, Builder, Keyset};
///
/// let builder = Builder::new().max_depth(3).ordered_threshold(4);
/// let keyset = builder.build_keyset((0..100u32).map(|i| i * 37)).unwrap();
/// assert!(matches!(keyset, AnyKeyset::Pext(_)));
/// assert_eq!(keyset.find(37 * 5), keyset.keys().iter().position(|&key| key == 185).unwrap());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Builder {
    /// Maximum bucket length, i.e. key comparisons per perfect-hash lookup.
    max_depth: usize,

    /// Largest key count that gets an ordered keyset.
    ordered_threshold: usize,

    /// Mask weight at which narrowing stops.
    min_mask_weight: u32,

    /// Largest permitted mask weight, bounding the lookup table to `2^max_mask_weight` entries.
    max_mask_weight: u32,

    /// Forced lookup table element type.
    offset_width: Option<OffsetWidth>,
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Default settings: depth 2, ordered keysets up to 16 keys, mask weight between 4 and 24,
    /// narrowest offsets.
    ///
    /// The weight limit is fixed, not scaled with the key count, and the mask search is greedy.
    /// Whether a key set fits depends on how its bits happen to collide, not on its size alone:
    /// some sets of tens of thousands of random 64-bit keys need more than 24 bits while a larger
    /// set may fit. Raise [`max_mask_weight`](Self::max_mask_weight) or
    /// [`max_depth`](Self::max_depth) when building large key sets.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: 2,
            ordered_threshold: 16,
            min_mask_weight: 4,
            max_mask_weight: 24,
            offset_width: None,
        }
    }

    /// Set the maximum number of key comparisons per perfect-hash lookup.
    ///
    /// Larger depths allow narrower masks and thus smaller lookup tables. Must be positive.
    #[inline]
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the largest key count for which [`build_keyset`](Self::build_keyset) picks an ordered
    /// keyset.
    #[inline]
    #[must_use]
    pub const fn ordered_threshold(mut self, ordered_threshold: usize) -> Self {
        self.ordered_threshold = ordered_threshold;
        self
    }

    /// Stop narrowing the mask once it has this many bits.
    #[inline]
    #[must_use]
    pub const fn min_mask_weight(mut self, min_mask_weight: u32) -> Self {
        self.min_mask_weight = min_mask_weight;
        self
    }

    /// Fail instead of building a lookup table with more than `2^max_mask_weight` entries.
    ///
    /// The failure is [`BuildError::TableTooLarge`], which reports the weight the search ended
    /// with. Retrying with at least that limit builds the same keyset. The limit is not monotone
    /// in the key count, see [`new`](Self::new).
    #[inline]
    #[must_use]
    pub const fn max_mask_weight(mut self, max_mask_weight: u32) -> Self {
        self.max_mask_weight = max_mask_weight;
        self
    }

    /// Force the lookup table element type instead of using the narrowest one that fits.
    #[inline]
    #[must_use]
    pub const fn offset_width(mut self, offset_width: OffsetWidth) -> Self {
        self.offset_width = Some(offset_width);
        self
    }

    /// Build a perfect-hash keyset.
    ///
    /// # Errors
    ///
    /// Fails if the depth is zero, keys repeat, the key count doesn't fit the forced offset width,
    /// or the narrowest mask found is wider than the weight limit.
    #[inline]
    pub fn build_pext_keyset<K: Key>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<PextKeyset<K>, BuildError> {
        if self.max_depth == 0 {
            return Err(BuildError::ZeroDepth);
        }
        let keys: Vec<K> = keys.into_iter().collect();
        let raw_keys: Vec<K::Raw> = keys.iter().map(|key| key.to_raw()).collect();
        if let Some((first, second)) = find_duplicate(&raw_keys, |&raw| raw) {
            return Err(BuildError::DuplicateKey { first, second });
        }

        let width = match self.offset_width {
            Some(width) if width.fits(keys.len()) => width,
            Some(width) => {
                return Err(BuildError::OffsetOverflow {
                    len: keys.len(),
                    width: width.bits(),
                })
            }
            None => OffsetWidth::for_len(keys.len()).ok_or(BuildError::OffsetOverflow {
                len: keys.len(),
                width: u32::BITS,
            })?,
        };

        let search = search_mask(&raw_keys, self.max_depth, self.min_mask_weight);
        let weight = search.mask.count_ones();
        if weight > self.max_mask_weight {
            return Err(BuildError::TableTooLarge {
                weight,
                limit: self.max_mask_weight,
            });
        }
        PextKeyset::assemble(keys, Pext::new(search.mask), search.longest, width)
    }

    /// Build an ordered keyset sorted by [`Ord`].
    ///
    /// # Errors
    ///
    /// Fails if keys repeat.
    #[inline]
    pub fn build_ordered_keyset<K: Copy + Ord>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<OrderedKeyset<K>, BuildError> {
        OrderedKeyset::try_from_keys(keys)
    }

    /// Build an ordered keyset for small key sets and a perfect-hash keyset otherwise.
    ///
    /// # Errors
    ///
    /// See [`build_ordered_keyset`](Self::build_ordered_keyset) and
    /// [`build_pext_keyset`](Self::build_pext_keyset).
    #[inline]
    pub fn build_keyset<K: Key + Ord>(
        &self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<AnyKeyset<K>, BuildError> {
        self.build_keyset_by(keys, Natural)
    }

    /// Like [`build_keyset`](Self::build_keyset), but orders small key sets by `compare`.
    ///
    /// # Errors
    ///
    /// See [`build_keyset`](Self::build_keyset).
    #[inline]
    pub fn build_keyset_by<K: Key, C: Compare<K>>(
        &self,
        keys: impl IntoIterator<Item = K>,
        compare: C,
    ) -> Result<AnyKeyset<K, C>, BuildError> {
        let keys: Vec<K> = keys.into_iter().collect();
        if keys.len() <= self.ordered_threshold {
            log::debug!(
                "{} keys, at most {}: using an ordered keyset",
                keys.len(),
                self.ordered_threshold,
            );
            OrderedKeyset::try_from_keys_by(keys, compare).map(AnyKeyset::Ordered)
        } else {
            log::debug!(
                "{} keys, more than {}: using a perfect-hash keyset",
                keys.len(),
                self.ordered_threshold,
            );
            self.build_pext_keyset(keys).map(AnyKeyset::Pext)
        }
    }

    /// Build a map, picking the keyset kind with [`build_keyset`](Self::build_keyset).
    ///
    /// ```rust
    /// # extern crate pextmap_bare as pextmap;
    /// use pextmap::Builder;
    ///
    /// let map = Builder::new()
    ///     .build_map([(50u32, 20), (10, 15), (123, 0), (53_498, 28)])
    ///     .unwrap();
    /// assert_eq!(map.get(50), Some(&20));
    /// assert_eq!(map.get(99), None);
    /// ```
    ///
    /// # Errors
    ///
    /// Fails if keys repeat, or for the reasons listed at [`build_keyset`](Self::build_keyset).
    #[inline]
    pub fn build_map<K: Key + Ord, V>(
        &self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Result<AutoMap<K, V>, BuildError> {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        let keyset = self.build_keyset(entries.iter().map(|(key, _)| *key))?;
        Map::try_from_entries(keyset, entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keyset;
    use rapidhash::RapidRng;

    #[test]
    fn selector_boundary() {
        let builder = Builder::new();
        let sixteen = builder.build_keyset(0..16u32).unwrap();
        assert!(matches!(sixteen, AnyKeyset::Ordered(_)));
        let seventeen = builder.build_keyset(0..17u32).unwrap();
        assert!(matches!(seventeen, AnyKeyset::Pext(_)));

        let never = Builder::new().ordered_threshold(0);
        assert!(matches!(never.build_keyset([1u8]).unwrap(), AnyKeyset::Pext(_)));
        assert!(matches!(never.build_keyset::<u8>([]).unwrap(), AnyKeyset::Ordered(_)));
    }

    #[test]
    fn zero_depth() {
        assert_eq!(
            Builder::new().max_depth(0).build_pext_keyset([1u8]).unwrap_err(),
            BuildError::ZeroDepth,
        );
    }

    #[test]
    fn duplicate_entries() {
        assert_eq!(
            Builder::new().build_map([(1u8, 'a'), (2, 'b'), (1, 'c')]).unwrap_err(),
            BuildError::DuplicateKey {
                first: 0,
                second: 2
            },
        );
        let many: Vec<(u16, ())> = (0..20).chain([7]).map(|key| (key, ())).collect();
        assert_eq!(
            Builder::new().build_map(many).unwrap_err(),
            BuildError::DuplicateKey {
                first: 7,
                second: 20
            },
        );
    }

    #[test]
    fn forced_offset_width() {
        let keyset = Builder::new()
            .offset_width(OffsetWidth::U32)
            .build_pext_keyset(0..10u8)
            .unwrap();
        assert_eq!(keyset.offset_width(), OffsetWidth::U32);

        assert_eq!(
            Builder::new()
                .offset_width(OffsetWidth::U8)
                .build_pext_keyset(0..300u16)
                .unwrap_err(),
            BuildError::OffsetOverflow { len: 300, width: 8 },
        );
        let keyset = Builder::new().build_pext_keyset(0..300u16).unwrap();
        assert_eq!(keyset.offset_width(), OffsetWidth::U16);
    }

    #[test]
    fn weight_limit() {
        // Every bit is needed to tell these keys apart at depth 1.
        let keys: Vec<u16> = (0..16).map(|bit| 1 << bit).chain([0]).collect();
        assert_eq!(
            Builder::new()
                .max_depth(1)
                .max_mask_weight(8)
                .build_pext_keyset(keys.iter().copied())
                .unwrap_err(),
            BuildError::TableTooLarge {
                weight: 16,
                limit: 8
            },
        );
        let keyset = Builder::new()
            .max_depth(1)
            .max_mask_weight(16)
            .build_pext_keyset(keys.iter().copied())
            .unwrap();
        assert_eq!(keyset.mask().count_ones(), 16);
    }

    #[test]
    fn retry_with_reported_weight() {
        let mut rng = RapidRng::new(0x0917_2c3d_4e5f_6071);
        let keys: Vec<u64> = (0..2000).map(|_| rng.next()).collect();
        let builder = Builder::new().max_depth(1).max_mask_weight(4);
        let BuildError::TableTooLarge { weight, limit } =
            builder.build_pext_keyset(keys.iter().copied()).unwrap_err()
        else {
            panic!("expected an oversized table");
        };
        assert_eq!(limit, 4);
        assert!(weight > 4);
        let keyset = builder
            .max_mask_weight(weight)
            .build_pext_keyset(keys.iter().copied())
            .unwrap();
        assert_eq!(keyset.mask().count_ones(), weight);
        for key in &keys {
            assert_eq!(keyset.keys()[keyset.find(*key)], *key);
        }
    }

    #[test]
    fn map_scenario() {
        let entries = [
            (50u32, 20),
            (10, 40),
            (123, 435),
            (53_498, 423),
            (1230, 1234),
            (34_598, 12_390),
            (123_984, 92_438),
            (243_098, 12_309),
        ];
        for threshold in [0, 16] {
            let map = Builder::new()
                .ordered_threshold(threshold)
                .build_map(entries)
                .unwrap();
            assert_eq!(map.len(), 8);
            assert_eq!(map.find(50), map.keyset().find(50));
            assert_eq!(map.get(50), Some(&20));
            assert_eq!(map.get(1230), Some(&1234));
            assert_eq!(map.find(99), 8);
            assert_eq!(map.get(99), None);
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = RapidRng::new(0x1319_8a2e_0370_7344);
        let keys: Vec<u64> = (0..500).map(|_| rng.next()).collect();
        let a = Builder::new().build_pext_keyset(keys.iter().copied()).unwrap();
        let b = Builder::new().build_pext_keyset(keys.iter().copied()).unwrap();
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a.keys(), b.keys());
    }
}
