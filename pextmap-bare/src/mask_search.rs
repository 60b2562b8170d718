//! Greedy search for a narrow mask.
//!
//! The lookup table has `2^popcount(mask)` entries, so the fewer bits a mask keeps, the smaller the
//! keyset. The search runs in two phases:
//!
//! 1. Starting from all ones, clear bits from the top down, keeping each clear that leaves all
//!    packed indices distinct. The result is a mask under which every bucket holds one key.
//! 2. While more than `min_weight` bits remain, find the bit whose removal merges the fewest keys
//!    and remove it, as long as no bucket grows beyond the probe depth.
//!
//! Neither phase backtracks, so the result is a local minimum, not the narrowest possible mask.

#![cfg(feature = "build")]

use super::{
    algorithms::{count_duplicates, longest_run},
    key::RawInt,
    pext::Pext,
};
use alloc::vec::Vec;

/// Outcome of a mask search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MaskSearch<R> {
    /// The mask.
    pub mask: R,
    /// Number of keys in the largest bucket under `mask`. Zero only for an empty key set.
    pub longest: usize,
}

/// Pack all keys with `mask` and sort the results into `scratch`.
fn pack_sorted<'a, R: RawInt>(raw_keys: &[R], mask: R, scratch: &'a mut Vec<R>) -> &'a [R] {
    let pext = Pext::new(mask);
    scratch.clear();
    scratch.extend(raw_keys.iter().map(|&raw| pext.apply(raw)));
    scratch.sort_unstable();
    scratch
}

/// Find a mask for pairwise distinct `raw_keys` with buckets no longer than `max_depth`.
///
/// `max_depth` must be positive. The returned mask always satisfies the depth; it may still be too
/// wide for the caller's table size limit.
pub(crate) fn search_mask<R: RawInt>(
    raw_keys: &[R],
    max_depth: usize,
    min_weight: u32,
) -> MaskSearch<R> {
    let mut scratch = Vec::with_capacity(raw_keys.len());

    let mut mask = R::MAX;
    for bit in (0..R::BITS).rev() {
        let candidate = mask & !(R::ONE << bit);
        if count_duplicates(pack_sorted(raw_keys, candidate, &mut scratch)) == 0 {
            mask = candidate;
        }
    }
    let mut longest = usize::from(!raw_keys.is_empty());
    log::debug!(
        "collision-free mask {mask:#x} for {} keys, weight {}",
        raw_keys.len(),
        mask.count_ones(),
    );

    while max_depth > 1 && mask.count_ones() > min_weight {
        let candidate = cheapest_removal(raw_keys, mask, &mut scratch);
        let candidate_longest = longest_run(pack_sorted(raw_keys, candidate, &mut scratch));
        if candidate_longest > max_depth {
            log::trace!(
                "keeping mask {mask:#x}: {candidate:#x} has a bucket of {candidate_longest} keys"
            );
            break;
        }
        log::trace!("narrowed mask to {candidate:#x}, longest bucket {candidate_longest}");
        mask = candidate;
        longest = candidate_longest;
    }
    log::debug!(
        "final mask {mask:#x}, weight {}, longest bucket {longest}",
        mask.count_ones(),
    );

    MaskSearch { mask, longest }
}

/// Remove the set bit of `mask` that introduces the fewest colliding keys.
///
/// Ties go to the lowest bit. `mask` must be non-zero.
fn cheapest_removal<R: RawInt>(raw_keys: &[R], mask: R, scratch: &mut Vec<R>) -> R {
    let mut best = mask;
    let mut best_duplicates = usize::MAX;
    for bit in (0..R::BITS).filter(|&bit| mask.bit(bit)) {
        let candidate = mask & !(R::ONE << bit);
        let duplicates = count_duplicates(pack_sorted(raw_keys, candidate, scratch));
        if duplicates < best_duplicates {
            best = candidate;
            best_duplicates = duplicates;
        }
    }
    best
}
