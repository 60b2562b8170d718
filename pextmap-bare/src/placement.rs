//! Key layout and bucket start offsets.
//!
//! Keys are grouped by packed index so that every bucket is a contiguous range, and the first
//! bucket of maximal length is rotated to the end of the array. A lookup scans `depth` keys from
//! its bucket start; with the longest bucket last, the scan only reaches the end of the array from
//! a bucket that ends exactly there.

#![cfg(feature = "build")]

use super::{
    key::{Key, RawInt},
    pext::Pext,
};
use alloc::{vec, vec::Vec};

/// Reorder `keys` into buckets and move the first bucket of length `depth` to the end.
///
/// The order within a bucket, and the order of buckets other than the rotated one, follow the
/// input order and packed index respectively, so the layout is a deterministic function of the
/// input sequence.
pub(crate) fn place<K: Key>(keys: &mut [K], pext: &Pext<K::Raw>, depth: usize) {
    radsort::sort_by_key(keys, |key| pext.apply(key.to_raw()).to_u64());
    let end = end_of_full_bucket(keys.iter().map(|key| pext.apply(key.to_raw())), depth);
    keys.rotate_left(end);
}

/// Find the end of the first run of at least `depth` equal elements, or the length of the
/// sequence if there's no such run before the last one.
fn end_of_full_bucket<T: Eq>(packed: impl IntoIterator<Item = T>, depth: usize) -> usize {
    let mut packed = packed.into_iter();
    let Some(mut previous) = packed.next() else {
        return 0;
    };
    let mut run = 1;
    let mut position = 1;
    for current in packed {
        if current == previous {
            run += 1;
        } else if run >= depth {
            return position;
        } else {
            run = 1;
        }
        previous = current;
        position += 1;
    }
    position
}

/// Compute the start offset of each bucket, indexed by packed index.
///
/// Entries for packed indices without keys stay 0. Filling from the back leaves each entry at the
/// first key of its bucket.
pub(crate) fn bucket_starts<K: Key>(keys: &[K], pext: &Pext<K::Raw>, table_len: usize) -> Vec<usize> {
    let mut starts = vec![0; table_len];
    for (index, key) in keys.iter().enumerate().rev() {
        starts[pext.index(key.to_raw())] = index;
    }
    starts
}
