//! Conversion of key types to their raw unsigned form.
//!
//! All table-building and lookup code is generic over [`RawInt`] only, so a `u32` keyset and a
//! keyset over a `#[repr(u32)]` enum share one instantiation of the search algorithms.

use core::fmt::{Debug, LowerHex};
use core::hash::Hash;
use core::ops::{BitAnd, BitOr, Not, Shl, Shr};

/// An unsigned integer that holds the raw form of a key.
///
/// Implemented for `u8`, `u16`, `u32`, and `u64`.
pub trait RawInt:
    Copy
    + Eq
    + Ord
    + Hash
    + Debug
    + LowerHex
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Width in bits.
    const BITS: u32;

    /// `0`.
    const ZERO: Self;

    /// `1`.
    const ONE: Self;

    /// All ones.
    const MAX: Self;

    /// Population count.
    fn count_ones(self) -> u32;

    /// Count of zero bits above the most significant set bit.
    fn leading_zeros(self) -> u32;

    /// Multiplication modulo `2^BITS`.
    #[must_use]
    fn wrapping_mul(self, rhs: Self) -> Self;

    /// Zero-extend to `u64`.
    fn to_u64(self) -> u64;

    /// Check whether bit `index` is set.
    #[inline]
    fn bit(self, index: u32) -> bool {
        self & (Self::ONE << index) != Self::ZERO
    }

    /// A value with the low `count` bits set.
    #[inline]
    #[must_use]
    fn low_bits(count: u32) -> Self {
        if count >= Self::BITS {
            Self::MAX
        } else {
            !(Self::MAX << count)
        }
    }

    /// Use the value as an array index.
    ///
    /// Only called on packed indices, which are bounded by the lookup table length.
    #[inline]
    #[expect(clippy::cast_possible_truncation, reason = "bounded by a table length")]
    fn to_index(self) -> usize {
        self.to_u64() as usize
    }
}

/// Implement [`RawInt`] for primitive unsigned integers.
macro_rules! raw_int {
    ($($ty:ty)*) => {
        $(
            impl RawInt for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$ty>::MAX;

                #[inline(always)]
                fn count_ones(self) -> u32 {
                    <$ty>::count_ones(self)
                }

                #[inline(always)]
                fn leading_zeros(self) -> u32 {
                    <$ty>::leading_zeros(self)
                }

                #[inline(always)]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$ty>::wrapping_mul(self, rhs)
                }

                #[inline(always)]
                fn to_u64(self) -> u64 {
                    self.into()
                }
            }
        )*
    };
}

raw_int!(u8 u16 u32 u64);

/// A key usable with the keysets of this crate.
///
/// The conversion to [`Key::Raw`] must be injective: two keys compare equal if and only if their
/// raw forms do.
///
/// Field-less enums can implement this trait with [`impl_key!`](crate::impl_key).
pub trait Key: Copy + Eq {
    /// The raw unsigned form of the same width.
    type Raw: RawInt;

    /// Convert to the raw form.
    fn to_raw(self) -> Self::Raw;
}

/// Implement [`Key`] for integers by reinterpreting them as an unsigned integer type.
macro_rules! integer_key {
    ($($ty:ty => $raw:ty,)*) => {
        $(
            impl Key for $ty {
                type Raw = $raw;

                #[inline(always)]
                #[allow(
                    clippy::cast_sign_loss,
                    clippy::cast_lossless,
                    trivial_numeric_casts,
                    reason = "bit reinterpretation"
                )]
                fn to_raw(self) -> $raw {
                    self as $raw
                }
            }
        )*
    };
}

integer_key! {
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    usize => u64,
    i8 => u8,
    i16 => u16,
    i32 => u32,
    i64 => u64,
    isize => u64,
}

impl Key for bool {
    type Raw = u8;

    #[inline(always)]
    fn to_raw(self) -> u8 {
        self.into()
    }
}

impl Key for char {
    type Raw = u32;

    #[inline(always)]
    fn to_raw(self) -> u32 {
        self.into()
    }
}

/// Implement [`Key`] for field-less enums.
///
/// The raw type must be an unsigned integer at least as wide as the enum's discriminants. A
/// narrower raw type would merge distinct keys, so it is rejected at compile time:
///
/// ```compile_fail
/// # extern crate pextmap_bare as pextmap;
/// #[derive(Clone, Copy, PartialEq, Eq)]
/// #[repr(u16)]
/// enum Port {
///     Http = 80,
///     Alt = 0x1050,
/// }
///
/// pextmap::impl_key!(Port as u8);
///
/// use pextmap::Key;
/// let _ = Port::Alt.to_raw();
/// ```
///
/// ```rust
/// # extern crate pextmap_bare as pextmap;
/// #[derive(Clone, Copy, PartialEq, Eq)]
/// #[repr(u8)]
/// enum Opcode {
///     Nop = 0x90,
///     Ret = 0xc3,
/// }
///
/// pextmap::impl_key!(Opcode as u8);
///
/// use pextmap::Key;
/// assert_eq!(Opcode::Ret.to_raw(), 0xc3);
/// ```
#[macro_export]
macro_rules! impl_key {
    ($($ty:ty as $raw:ty),* $(,)?) => {
        $(
            impl $crate::Key for $ty {
                type Raw = $raw;

                #[inline(always)]
                fn to_raw(self) -> $raw {
                    const {
                        assert!(
                            ::core::mem::size_of::<$ty>() <= ::core::mem::size_of::<$raw>(),
                            "the raw type is narrower than the enum",
                        );
                    }
                    self as $raw
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_bits() {
        assert_eq!(u8::low_bits(0), 0);
        assert_eq!(u8::low_bits(3), 0b111);
        assert_eq!(u8::low_bits(8), 0xff);
        assert_eq!(u64::low_bits(63), u64::MAX >> 1);
        assert_eq!(u64::low_bits(64), u64::MAX);
    }

    #[test]
    fn bit() {
        assert!(0b100u16.bit(2));
        assert!(!0b100u16.bit(1));
        assert!(u64::MAX.bit(63));
    }

    #[test]
    fn signed_keys_keep_width() {
        assert_eq!((-1i8).to_raw(), 0xff);
        assert_eq!((-2i32).to_raw(), 0xffff_fffe);
        assert_eq!(i64::MIN.to_raw(), 1 << 63);
    }

    #[test]
    fn other_keys() {
        assert_eq!(true.to_raw(), 1);
        assert_eq!('a'.to_raw(), 97);
        assert_eq!(usize::MAX.to_raw(), usize::MAX as u64);
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(u16)]
    enum Port {
        Http = 80,
        Https = 443,
    }

    crate::impl_key!(Port as u16);

    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    enum Flag {
        Off,
        On = 0xff,
    }

    crate::impl_key!(Flag as u32);

    #[test]
    fn enum_keys() {
        assert_eq!(Port::Http.to_raw(), 80);
        assert_eq!(Port::Https.to_raw(), 443);
    }

    #[test]
    fn wider_raw_type() {
        assert_eq!(Flag::Off.to_raw(), 0);
        assert_eq!(Flag::On.to_raw(), 0xff);
    }
}
