//! Perfect-hash keyset.

use super::{const_vec::ConstVec, key::Key, keyset::Keyset, lookup_table::LookupTable, pext::Pext};

/// A set of keys resolved to slots with a pseudo-`PEXT` perfect hash.
///
/// Lookup extracts the masked bits of a key, reads the start of its bucket from the lookup table,
/// and compares at most [`depth`](Self::depth) stored keys. Slots are positions in the internal
/// key array, which is ordered by bucket, not by key.
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// use pextmap::{Keyset, PextKeyset};
///
/// let keyset = PextKeyset::from_keys([10u32, 20, 30, 40]);
/// assert_eq!(keyset.len(), 4);
/// assert!(keyset.find(20) < 4);
/// assert_eq!(keyset.find(25), 4); // absent
/// ```
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    all(feature = "alloc", feature = "serde"),
    serde(
        bound(deserialize = "K: serde::Deserialize<'de>, K::Raw: serde::Deserialize<'de>"),
        try_from = "PextKeysetInner<K>"
    )
)]
pub struct PextKeyset<K: Key> {
    /// The actual keyset.
    inner: PextKeysetInner<K>,
}

/// The actual keyset.
///
/// This is a separate type so that deserialization can validate it with [`TryFrom`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize, K::Raw: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de>, K::Raw: serde::Deserialize<'de>"
    ))
)]
struct PextKeysetInner<K: Key> {
    /// Keys grouped by bucket, with the first longest bucket moved to the end.
    keys: ConstVec<K>,

    /// Start of each bucket in `keys`, indexed by packed index.
    lookup: LookupTable,

    /// Extraction function producing packed indices.
    pext: Pext<K::Raw>,

    /// Length of the longest bucket, i.e. the maximum number of comparisons per lookup.
    depth: usize,
}

impl<K: Key> Clone for PextKeyset<K> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: PextKeysetInner {
                keys: self.inner.keys.clone(),
                lookup: self.inner.lookup.clone(),
                pext: self.inner.pext,
                depth: self.inner.depth,
            },
        }
    }
}

impl<K: Key + core::fmt::Debug> core::fmt::Debug for PextKeyset<K> {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PextKeyset")
            .field("keys", &&*self.inner.keys)
            .field("mask", &self.inner.pext.mask())
            .field("depth", &self.inner.depth)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "build")]
impl<K: Key> PextKeyset<K> {
    /// Build a keyset with default [`Builder`](crate::Builder) settings.
    ///
    /// # Errors
    ///
    /// Fails if keys repeat or no mask within the table size limit exists.
    #[inline]
    pub fn try_from_keys(keys: impl IntoIterator<Item = K>) -> Result<Self, crate::BuildError> {
        crate::Builder::new().build_pext_keyset(keys)
    }

    /// Build a keyset with default [`Builder`](crate::Builder) settings.
    ///
    /// # Panics
    ///
    /// Panics if keys repeat or no mask within the table size limit exists.
    #[inline]
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = K>) -> Self {
        match Self::try_from_keys(keys) {
            Ok(keyset) => keyset,
            Err(error) => panic!("failed to build keyset: {error}"),
        }
    }

    /// Build a keyset with a known mask, skipping mask search.
    ///
    /// Useful to reproduce a previous build exactly. `depth` is the maximum bucket length the
    /// mask may produce.
    ///
    /// # Errors
    ///
    /// Fails if `depth` is zero, keys repeat, the mask produces a bucket longer than `depth`, or
    /// the lookup table would not fit in memory.
    #[inline]
    pub fn try_with_mask(
        keys: impl IntoIterator<Item = K>,
        mask: K::Raw,
        depth: usize,
    ) -> Result<Self, crate::BuildError> {
        use alloc::vec::Vec;

        if depth == 0 {
            return Err(crate::BuildError::ZeroDepth);
        }
        let keys: Vec<K> = keys.into_iter().collect();
        if let Some((first, second)) = super::algorithms::find_duplicate(&keys, |key| key.to_raw()) {
            return Err(crate::BuildError::DuplicateKey { first, second });
        }

        let pext = Pext::new(mask);
        let mut packed: Vec<K::Raw> = keys.iter().map(|key| pext.apply(key.to_raw())).collect();
        packed.sort_unstable();
        let longest = super::algorithms::longest_run(&packed);
        if longest > depth {
            return Err(crate::BuildError::DepthExceeded { longest, depth });
        }

        let width = super::lookup_table::OffsetWidth::for_len(keys.len()).ok_or(
            crate::BuildError::OffsetOverflow {
                len: keys.len(),
                width: u32::BITS,
            },
        )?;
        Self::assemble(keys, pext, longest, width)
    }

    /// Lay out keys for a chosen mask and build the lookup table.
    ///
    /// Keys must be distinct, `longest` must be the longest bucket under `pext`, and `width` must
    /// fit the key count.
    pub(crate) fn assemble(
        mut keys: alloc::vec::Vec<K>,
        pext: Pext<K::Raw>,
        longest: usize,
        width: super::lookup_table::OffsetWidth,
    ) -> Result<Self, crate::BuildError> {
        let table_len = pext.output_len().ok_or(crate::BuildError::TableTooLarge {
            weight: pext.weight(),
            limit: usize::BITS - 1,
        })?;
        super::placement::place(&mut keys, &pext, longest);
        let starts = super::placement::bucket_starts(&keys, &pext, table_len);
        Ok(Self {
            inner: PextKeysetInner {
                keys: keys.into(),
                lookup: LookupTable::narrow(&starts, width)?,
                pext,
                depth: longest,
            },
        })
    }
}

impl<K: Key> PextKeyset<K> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(
        keys: ConstVec<K>,
        lookup: LookupTable,
        pext: Pext<K::Raw>,
        depth: usize,
    ) -> Self {
        Self {
            inner: PextKeysetInner {
                keys,
                lookup,
                pext,
                depth,
            },
        }
    }

    /// The mask selecting the key bits used for hashing.
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> K::Raw {
        self.inner.pext.mask()
    }

    /// Maximum number of key comparisons per lookup.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Number of lookup table entries, `2^popcount(mask)`.
    #[inline]
    #[must_use]
    pub fn lookup_len(&self) -> usize {
        self.inner.lookup.len()
    }

    /// Element type of the lookup table.
    #[inline]
    #[must_use]
    pub const fn offset_width(&self) -> super::lookup_table::OffsetWidth {
        self.inner.lookup.width()
    }
}

impl<K: Key> Keyset for PextKeyset<K> {
    type Key = K;

    /// Resolve a key to its slot.
    ///
    /// Compares at most [`depth`](PextKeyset::depth) keys.
    #[inline]
    fn find(&self, key: K) -> usize {
        let raw = key.to_raw();
        let keys = &*self.inner.keys;
        let start = self.inner.lookup.get(self.inner.pext.index(raw));
        keys.get(start..)
            .unwrap_or_default()
            .iter()
            .take(self.inner.depth)
            .position(|candidate| candidate.to_raw() == raw)
            .map_or(keys.len(), |offset| start + offset)
    }

    #[inline]
    fn keys(&self) -> &[K] {
        &self.inner.keys
    }
}

#[cfg(feature = "codegen")]
impl<K: Key + super::codegen::Codegen> super::codegen::Codegen for PextKeyset<K>
where
    K::Raw: super::codegen::Codegen,
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let pext_keyset = gen.path("pextmap::PextKeyset");
        let keys = gen.piece(&self.inner.keys);
        let lookup = gen.piece(&self.inner.lookup);
        let pext = gen.piece(&self.inner.pext);
        let depth = gen.piece(&self.inner.depth);
        quote::quote!(#pext_keyset::__from_raw_parts(#keys, #lookup, #pext, #depth))
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::{Key, PextKeyset};
    use serde::{Serialize, Serializer};

    impl<K: Key + Serialize> Serialize for PextKeyset<K>
    where
        K::Raw: Serialize,
    {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.inner.serialize(serializer)
        }
    }

    #[cfg(feature = "alloc")]
    mod validation {
        use super::super::{Key, Keyset, PextKeyset, PextKeysetInner};
        use displaydoc::Display;
        use thiserror::Error;

        /// Deserialization validation failures.
        #[derive(Debug, Display, Error)]
        #[non_exhaustive]
        pub enum Error {
            /// lookup table length is not 2^popcount(mask)
            WrongLookupLength,

            /// lookup table points past the end of the keys
            OffsetOutOfRange,

            /// zero depth for a non-empty keyset
            ZeroDepth,

            /// key {0} cannot be found at its own slot
            MisplacedKey(usize),
        }

        impl<K: Key> TryFrom<PextKeysetInner<K>> for PextKeyset<K> {
            type Error = Error;

            #[inline]
            fn try_from(inner: PextKeysetInner<K>) -> Result<Self, Error> {
                if inner.pext.output_len() != Some(inner.lookup.len()) {
                    return Err(Error::WrongLookupLength);
                }

                let len = inner.keys.len();
                if inner.lookup.iter().any(|offset| offset >= len.max(1)) {
                    return Err(Error::OffsetOutOfRange);
                }

                if len > 0 && inner.depth == 0 {
                    return Err(Error::ZeroDepth);
                }

                let keyset = Self { inner };
                for (slot, key) in keyset.keys().iter().enumerate() {
                    if keyset.find(*key) != slot {
                        return Err(Error::MisplacedKey(slot));
                    }
                }
                Ok(keyset)
            }
        }
    }
}
