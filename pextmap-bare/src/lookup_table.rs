//! Packed index to bucket offset table.

use super::const_vec::ConstVec;

/// Element type of a [`LookupTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum OffsetWidth {
    /// `u8` offsets, up to 255 keys.
    U8,
    /// `u16` offsets, up to 65535 keys.
    U16,
    /// `u32` offsets.
    U32,
}

impl OffsetWidth {
    /// The narrowest width that can represent `len`, if any.
    #[inline]
    #[must_use]
    pub const fn for_len(len: usize) -> Option<Self> {
        if len <= u8::MAX as usize {
            Some(Self::U8)
        } else if len <= u16::MAX as usize {
            Some(Self::U16)
        } else if len <= u32::MAX as usize {
            Some(Self::U32)
        } else {
            None
        }
    }

    /// Check whether `len` is representable with this width.
    #[inline]
    #[must_use]
    pub fn fits(self, len: usize) -> bool {
        OffsetWidth::for_len(len).is_some_and(|needed| needed <= self)
    }

    /// Width in bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => u8::BITS,
            Self::U16 => u16::BITS,
            Self::U32 => u32::BITS,
        }
    }
}

/// Start offsets of buckets, indexed by packed index.
///
/// The element type is picked per table, so small keysets don't pay for `usize` offsets. This is a
/// closed set of variants rather than a type parameter so that the keyset type doesn't depend on
/// the number of keys.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[non_exhaustive]
pub enum LookupTable {
    /// `u8` offsets.
    U8(ConstVec<u8>),
    /// `u16` offsets.
    U16(ConstVec<u16>),
    /// `u32` offsets.
    U32(ConstVec<u32>),
}

impl LookupTable {
    /// Read the offset stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, index: usize) -> usize {
        match self {
            Self::U8(table) => table[index].into(),
            Self::U16(table) => table[index].into(),
            #[expect(clippy::cast_possible_truncation, reason = "offsets are below a slice length")]
            Self::U32(table) => table[index] as usize,
        }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(table) => table.len(),
            Self::U16(table) => table.len(),
            Self::U32(table) => table.len(),
        }
    }

    /// Check whether the table has no entries. Never true for a built keyset.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the table.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> OffsetWidth {
        match self {
            Self::U8(_) => OffsetWidth::U8,
            Self::U16(_) => OffsetWidth::U16,
            Self::U32(_) => OffsetWidth::U32,
        }
    }

    /// Iterate over all offsets.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(|index| self.get(index))
    }

    /// Narrow `offsets` to `width`.
    ///
    /// # Errors
    ///
    /// Fails with [`OffsetOverflow`](crate::BuildError::OffsetOverflow) if some offset doesn't fit.
    #[cfg(feature = "build")]
    pub(crate) fn narrow(offsets: &[usize], width: OffsetWidth) -> Result<Self, crate::BuildError> {
        /// Convert to the narrow type, returning the first offset that doesn't fit on failure.
        fn convert<T: TryFrom<usize>>(offsets: &[usize]) -> Result<ConstVec<T>, usize> {
            offsets
                .iter()
                .map(|&offset| T::try_from(offset).map_err(|_| offset))
                .collect::<Result<alloc::vec::Vec<T>, usize>>()
                .map(ConstVec::from_vec)
        }

        let table = match width {
            OffsetWidth::U8 => convert(offsets).map(Self::U8),
            OffsetWidth::U16 => convert(offsets).map(Self::U16),
            OffsetWidth::U32 => convert(offsets).map(Self::U32),
        };
        table.map_err(|offset| crate::BuildError::OffsetOverflow {
            len: offset.saturating_add(1),
            width: width.bits(),
        })
    }
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for LookupTable {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let (variant, table) = match self {
            Self::U8(table) => (gen.path("pextmap::low_level::LookupTable::U8"), gen.piece(table)),
            Self::U16(table) => (gen.path("pextmap::low_level::LookupTable::U16"), gen.piece(table)),
            Self::U32(table) => (gen.path("pextmap::low_level::LookupTable::U32"), gen.piece(table)),
        };
        quote::quote!(#variant(#table))
    }
}
