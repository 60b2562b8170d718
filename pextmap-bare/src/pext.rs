//! Portable emulation of the `PEXT` instruction.
//!
//! `PEXT` gathers the bits of a value selected by a mask into the low bits of the result. We don't
//! want to depend on BMI2 (it's slow on pre-Zen 3 AMD and absent elsewhere), so instead we compute
//! `((key & mask) * coefficient) >> gap_bits`: the multiplication shifts each run of consecutive
//! mask bits by a run-specific amount so that all runs become adjacent, and the shift drops the
//! bits below them.
//!
//! This is not an exact `PEXT`. Carries from one run can spill into another when runs are packed
//! close to each other, so the resulting map is not necessarily injective on masked values. Mask
//! search only ever judges masks by the outputs of [`Pext::apply`], so this doesn't matter for
//! correctness, but it does mean the "packed index" of a key is whatever this function returns,
//! not the true bit compaction.

#![expect(clippy::arithmetic_side_effects, reason = "shift amounts are bounded by BITS")]

use super::key::RawInt;

/// Bit-extraction function for a fixed mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pext<R> {
    /// Bits of the key that participate in the result.
    mask: R,

    /// Multiplier that moves all mask runs next to each other.
    coefficient: R,

    /// `2^popcount(mask) - 1`, applied after shifting.
    final_mask: R,

    /// Distance from bit 0 to the lowest packed bit after multiplication.
    gap_bits: u32,
}

impl<R: RawInt> Pext<R> {
    /// Prepare the extraction function for `mask`.
    #[inline]
    #[must_use]
    pub fn new(mask: R) -> Self {
        let weight = mask.count_ones();
        // For `mask == 0` this is `BITS - 0 - BITS == 0`.
        let gap_bits = R::BITS - weight - mask.leading_zeros();
        Self {
            mask,
            coefficient: pack_coefficient(mask, gap_bits),
            final_mask: R::low_bits(weight),
            gap_bits,
        }
    }

    /// Compute the packed index of a raw key.
    ///
    /// The result is always below `2^popcount(mask)`.
    #[inline(always)]
    #[must_use]
    pub fn apply(&self, raw: R) -> R {
        ((raw & self.mask).wrapping_mul(self.coefficient) >> self.gap_bits) & self.final_mask
    }

    /// Same as [`apply`](Self::apply), converted to an index.
    #[inline(always)]
    pub(crate) fn index(&self, raw: R) -> usize {
        self.apply(raw).to_index()
    }

    /// The mask this function extracts.
    #[inline]
    pub const fn mask(&self) -> R {
        self.mask
    }

    /// Number of bits in the output, i.e. `popcount(mask)`.
    #[inline]
    pub fn weight(&self) -> u32 {
        self.mask.count_ones()
    }

    /// Number of distinct outputs, `2^popcount(mask)`, or `None` if that overflows `usize`.
    #[inline]
    #[must_use]
    pub fn output_len(&self) -> Option<usize> {
        1usize.checked_shl(self.weight())
    }

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn __from_raw_parts(mask: R, coefficient: R, final_mask: R, gap_bits: u32) -> Self {
        Self {
            mask,
            coefficient,
            final_mask,
            gap_bits,
        }
    }
}

/// Compute the multiplier for `mask`.
///
/// The run of mask bits starting at `src` must land at `dst`, where `dst` counts mask bits below
/// `src` plus `gap_bits`. Multiplying by `2^(dst - src)` does exactly that, and summing over the
/// starts of all runs moves every run at once. `dst - src` never underflows: it's `gap_bits` minus
/// the number of zeros below `src`, and `gap_bits` is the number of zeros below the top mask bit.
fn pack_coefficient<R: RawInt>(mask: R, gap_bits: u32) -> R {
    let mut coefficient = R::ZERO;
    let mut dst = gap_bits;
    let mut in_run = false;
    for src in 0..R::BITS {
        let set = mask.bit(src);
        if set && !in_run {
            coefficient = coefficient | (R::ONE << (dst - src));
        }
        if set {
            dst += 1;
        }
        in_run = set;
    }
    coefficient
}

#[cfg(feature = "codegen")]
impl<R: super::codegen::Codegen> super::codegen::Codegen for Pext<R> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let pext = gen.path("pextmap::Pext");
        let mask = gen.piece(&self.mask);
        let coefficient = gen.piece(&self.coefficient);
        let final_mask = gen.piece(&self.final_mask);
        let gap_bits = gen.piece(&self.gap_bits);
        quote::quote!(#pext::__from_raw_parts(#mask, #coefficient, #final_mask, #gap_bits))
    }
}

/// Scope for `serde`-related code.
///
/// Only the mask is stored; the rest is derived from it on load, so a serialized [`Pext`] can't be
/// internally inconsistent.
#[cfg(feature = "serde")]
mod serde_support {
    use super::{Pext, RawInt};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl<R: RawInt + Serialize> Serialize for Pext<R> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.mask.serialize(serializer)
        }
    }

    impl<'de, R: RawInt + Deserialize<'de>> Deserialize<'de> for Pext<R> {
        #[inline]
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            R::deserialize(deserializer).map(Pext::new)
        }
    }
}
