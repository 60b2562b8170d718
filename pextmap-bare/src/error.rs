//! Build failures.

#![cfg(feature = "build")]

use displaydoc::Display;
use thiserror::Error;

/// Why a keyset or map could not be built.
///
/// Building either produces a fully valid structure or one of these errors; there is no partial
/// result and retrying with the same input fails the same way.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// probe depth must be at least 1
    ZeroDepth,

    /// keys at positions {first} and {second} are equal
    DuplicateKey {
        /// Position of the earlier key in the input.
        first: usize,
        /// Position of the later key in the input.
        second: usize,
    },

    /// the mask leaves a bucket of {longest} keys, but the probe depth is {depth}
    DepthExceeded {
        /// Length of the longest bucket.
        longest: usize,
        /// Configured probe depth.
        depth: usize,
    },

    /// the lookup table needs {weight} index bits, more than the limit of {limit}
    TableTooLarge {
        /// Population count of the smallest mask found.
        weight: u32,
        /// Configured limit.
        limit: u32,
    },

    /// {len} keys do not fit in {width}-bit lookup offsets
    OffsetOverflow {
        /// Number of keys.
        len: usize,
        /// Width of the requested offset type.
        width: u32,
    },

    /// entry {index} has a key outside of the keyset
    UnknownKey {
        /// Position of the entry in the input.
        index: usize,
    },

    /// entry {index} assigns a value to a key that already has one
    DuplicateValue {
        /// Position of the entry in the input.
        index: usize,
    },

    /// slot {slot} of the keyset has no value
    MissingValue {
        /// Slot without a value.
        slot: usize,
    },

    /// expected {expected} values, got {actual}
    LengthMismatch {
        /// Keyset length.
        expected: usize,
        /// Number of provided values.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(
            BuildError::DuplicateKey { first: 1, second: 4 }.to_string(),
            "keys at positions 1 and 4 are equal",
        );
        assert_eq!(
            BuildError::OffsetOverflow {
                len: 300,
                width: 8
            }
            .to_string(),
            "300 keys do not fit in 8-bit lookup offsets",
        );
        assert_eq!(BuildError::ZeroDepth.to_string(), "probe depth must be at least 1");
    }
}
