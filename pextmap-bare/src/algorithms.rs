//! Utilities.

#![expect(clippy::arithmetic_side_effects, reason = "indices are bounded by slice lengths")]

/// Find the first position in sorted `keys` whose element is not less than `key`.
///
/// The loop has a fixed trip count for a given length and the only data-dependent operation is a
/// select, which compiles to `cmov`/`csel`. Returns `keys.len()` if all elements are less.
#[inline]
pub fn branchless_lower_bound<K>(keys: &[K], key: &K, mut less: impl FnMut(&K, &K) -> bool) -> usize {
    let mut base = 0;
    let mut len = keys.len();
    while len > 0 {
        let half = len / 2;
        // `base + half < base + len <= keys.len()`
        let step = if less(&keys[base + half], key) {
            len - half
        } else {
            0
        };
        base += step;
        len = half;
    }
    base
}

/// Count adjacent equal pairs in a sorted slice.
///
/// For a sorted multiset, this is the number of elements minus the number of distinct elements.
#[inline]
pub fn count_duplicates<T: Eq>(sorted: &[T]) -> usize {
    sorted.windows(2).filter(|pair| pair[0] == pair[1]).count()
}

/// Length of the longest run of equal elements in a sorted slice.
#[inline]
pub fn longest_run<T: Eq>(sorted: &[T]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for (i, element) in sorted.iter().enumerate() {
        if i > 0 && sorted[i - 1] == *element {
            current += 1;
        } else {
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

/// Move elements from `x = source[i]` to `destination[permutation(x)]`.
///
/// Stops at the first element for which `permutation` fails or whose target slot is already
/// occupied, returning its position in `source`.
#[cfg(feature = "build")]
pub fn scatter<T>(
    source: impl IntoIterator<Item = T>,
    mut permutation: impl FnMut(&T) -> Option<usize>,
    destination: &mut [Option<T>],
) -> Result<(), ScatterError> {
    for (index, element) in source.into_iter().enumerate() {
        let slot = permutation(&element).ok_or(ScatterError::Unmapped(index))?;
        let target = &mut destination[slot];
        if target.is_some() {
            return Err(ScatterError::Occupied(index));
        }
        *target = Some(element);
    }
    Ok(())
}

/// Find two positions of `items` whose keys are equal.
///
/// The first position of the returned pair is smaller than the second.
#[cfg(feature = "build")]
pub fn find_duplicate<T, R: Ord>(items: &[T], mut key: impl FnMut(&T) -> R) -> Option<(usize, usize)> {
    let mut order: alloc::vec::Vec<usize> = (0..items.len()).collect();
    // Stable, so equal keys keep ascending positions.
    order.sort_by_key(|&index| key(&items[index]));
    order
        .windows(2)
        .find(|pair| key(&items[pair[0]]) == key(&items[pair[1]]))
        .map(|pair| (pair[0], pair[1]))
}

/// Failure of [`scatter`].
#[cfg(feature = "build")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScatterError {
    /// The element at this position has no target slot.
    Unmapped(usize),
    /// The element at this position targets a slot that was already filled.
    Occupied(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lower_bound_edges() {
        let less = |a: &u32, b: &u32| a < b;
        assert_eq!(branchless_lower_bound(&[], &5, less), 0);
        assert_eq!(branchless_lower_bound(&[5], &5, less), 0);
        assert_eq!(branchless_lower_bound(&[5], &4, less), 0);
        assert_eq!(branchless_lower_bound(&[5], &6, less), 1);
        assert_eq!(branchless_lower_bound(&[1, 3, 5, 7], &4, less), 2);
        assert_eq!(branchless_lower_bound(&[1, 3, 5, 7], &7, less), 3);
        assert_eq!(branchless_lower_bound(&[1, 3, 5, 7], &8, less), 4);
    }

    #[test]
    fn lower_bound_reversed_order() {
        let keys = [9, 6, 3, 0];
        let greater = |a: &i32, b: &i32| a > b;
        assert_eq!(branchless_lower_bound(&keys, &6, greater), 1);
        assert_eq!(branchless_lower_bound(&keys, &5, greater), 2);
        assert_eq!(branchless_lower_bound(&keys, &-1, greater), 4);
    }

    #[test]
    fn duplicates_and_runs() {
        assert_eq!(count_duplicates::<u8>(&[]), 0);
        assert_eq!(count_duplicates(&[1, 2, 3]), 0);
        assert_eq!(count_duplicates(&[1, 1, 2, 3, 3, 3]), 3);
        assert_eq!(longest_run::<u8>(&[]), 0);
        assert_eq!(longest_run(&[4]), 1);
        assert_eq!(longest_run(&[1, 1, 2, 3, 3, 3]), 3);
        assert_eq!(longest_run(&[1, 1, 1, 2]), 3);
    }

    #[cfg(feature = "build")]
    #[test]
    fn scatter_into_slots() {
        let mut slots = [None, None, None];
        assert_eq!(
            scatter([(2, 'a'), (0, 'b'), (1, 'c')], |&(slot, _)| Some(slot), &mut slots),
            Ok(()),
        );
        assert_eq!(slots, [Some((0, 'b')), Some((1, 'c')), Some((2, 'a'))]);

        let mut slots = [None, None];
        assert_eq!(
            scatter([0, 1, 1], |&slot| Some(slot), &mut slots),
            Err(ScatterError::Occupied(2)),
        );
        assert_eq!(
            scatter([5], |_| None, &mut [None]),
            Err(ScatterError::Unmapped(0)),
        );
    }

    #[cfg(feature = "build")]
    #[test]
    fn duplicates_by_key() {
        assert_eq!(find_duplicate::<u8, u8>(&[], |&x| x), None);
        assert_eq!(find_duplicate(&[3, 1, 2], |&x| x), None);
        assert_eq!(find_duplicate(&[3, 1, 2, 1], |&x| x), Some((1, 3)));
        assert_eq!(find_duplicate(&[10, 21, 30], |&x| x % 10), Some((0, 2)));
    }

    proptest! {
        #[test]
        fn lower_bound_matches_partition_point(
            keys in proptest::collection::vec(any::<u16>(), 0..64),
            key in any::<u16>(),
        ) {
            let mut keys = keys;
            keys.sort_unstable();
            let expected = keys.partition_point(|element| *element < key);
            prop_assert_eq!(branchless_lower_bound(&keys, &key, |a, b| a < b), expected);
        }
    }
}
