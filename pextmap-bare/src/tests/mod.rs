use super::{impl_key, AnyKeyset, Builder, Keyset, Map, OrderedKeyset, PextKeyset};
use alloc::{vec, vec::Vec};
use proptest::prelude::*;
use rapidhash::RapidRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Grade {
    A = 1,
    B,
}

impl_key!(Grade as u8);

#[test]
fn enum_keys_take_ordered_path() {
    let map = Builder::new().build_map([(Grade::B, 2), (Grade::A, 1)]).unwrap();
    assert!(matches!(map.keyset(), AnyKeyset::Ordered(_)));
    assert_eq!(map.get(Grade::A), Some(&1));
    assert_eq!(map.get(Grade::B), Some(&2));
    assert_eq!(map.find(Grade::A), 0);
}

#[test]
fn single_key_deep_table() {
    let keyset = Builder::new()
        .max_depth(4)
        .ordered_threshold(0)
        .build_keyset([1u32])
        .unwrap();
    let map = Map::from_entries(keyset, [(1, 1)]);
    assert_eq!(map.find(1), 0);
    assert_eq!(map.find(2), 1);
    assert_eq!(map.find(929), 1);
}

#[test]
fn repeated_builds_agree() {
    let build = || {
        Builder::new()
            .ordered_threshold(0)
            .build_map([(1u64, 1), (2, 1)])
            .unwrap()
    };
    let (first, second) = (build(), build());
    assert_ne!(first.find(1), first.find(2));
    assert_eq!(first.find(1), second.find(1));
    assert_eq!(first.find(2), second.find(2));
}

#[test]
fn every_key_type() {
    fn check<K: crate::Key + Ord + core::fmt::Debug>(keys: Vec<K>) {
        for threshold in [0, usize::MAX] {
            let keyset = Builder::new()
                .ordered_threshold(threshold)
                .build_keyset(keys.iter().copied())
                .unwrap();
            for &key in &keys {
                assert_eq!(keyset.keys()[keyset.find(key)], key, "{key:?}");
            }
        }
    }

    check(vec![true, false]);
    check(vec![i8::MIN, -1, 0, 1, i8::MAX]);
    check((0..1000u16).map(|x| x.wrapping_mul(40_503)).collect());
    check((-500i32..500).map(|x| x * 7919).collect());
    check(vec![usize::MAX, 0, 1 << 40]);
    check(vec![isize::MIN, -1, 0, 1, isize::MAX]);
    check(('a'..='z').chain('α'..='ω').collect());
}

#[test]
fn sparse_random_keys() {
    let mut rng = RapidRng::new(0xa409_3822_299f_31d0);
    for len in [17, 100, 1000, 10_000] {
        let mut keys: Vec<u64> = (0..len).map(|_| rng.next()).collect();
        keys.sort_unstable();
        keys.dedup();
        let map = Builder::new()
            .build_map(keys.iter().map(|&key| (key, key.rotate_left(7))))
            .unwrap();
        assert!(matches!(map.keyset(), AnyKeyset::Pext(_)));
        for &key in &keys {
            assert_eq!(map.get(key), Some(&key.rotate_left(7)));
        }
        for _ in 0..1000 {
            let key = rng.next();
            assert_eq!(map.get(key).is_some(), keys.binary_search(&key).is_ok());
        }
    }
}

#[test]
fn dense_keys_stay_small() {
    // Consecutive keys differ in their low bits only, so the mask shouldn't reach the high bits.
    let keyset = PextKeyset::from_keys(0x1234_0000u32..0x1234_0400);
    assert!(keyset.mask() <= 0x3ff, "{:#x}", keyset.mask());
    assert!(keyset.lookup_len() <= 1024);
    for key in 0x1234_0000u32..0x1234_0400 {
        assert!(keyset.contains(key));
    }
    assert!(!keyset.contains(0x1234_0400));
    assert!(!keyset.contains(0x1235_0000));
}

#[test]
fn shared_keyset_across_value_types() {
    let keyset = PextKeyset::from_keys((0..64u16).map(|x| x * 3));
    let halves = Map::from_entries(&keyset, keyset.keys().iter().map(|&key| (key, key / 2)));
    let parity = Map::from_entries(&keyset, keyset.keys().iter().map(|&key| (key, key % 2 == 0)));
    assert_eq!(halves.get(9), Some(&4));
    assert_eq!(parity.get(9), Some(&false));
    assert_eq!(halves.get(10), None);
    assert_eq!(halves.as_span().len(), parity.as_span().len());
}

#[test]
#[ignore = "takes a while in debug builds"]
fn build_1m_integers() {
    // No collisions among the first million outputs, so no need to deduplicate.
    let mut rng = RapidRng::new(0x439f_2674_4da7_67e5);
    let entries: Vec<(u64, usize)> = (0..1_000_000).map(|i| (rng.next(), i)).collect();
    let map = Builder::new().max_depth(4).build_map(entries.iter().copied()).unwrap();
    for (key, value) in &entries {
        assert_eq!(map.get(*key), Some(value));
    }
}

proptest! {
    #[test]
    fn keysets_resolve_members_only(
        keys in proptest::collection::hash_set(any::<u32>(), 0..300),
        probes in proptest::collection::vec(any::<u32>(), 0..100),
        depth in 1usize..5,
    ) {
        let keys: Vec<u32> = keys.into_iter().collect();
        let pext = Builder::new().max_depth(depth).build_pext_keyset(keys.iter().copied()).unwrap();
        let ordered = OrderedKeyset::from_keys(keys.iter().copied());
        prop_assert!(pext.depth() <= depth);
        for keyset in [&pext as &dyn Keyset<Key = u32>, &ordered] {
            prop_assert_eq!(keyset.len(), keys.len());
            for &key in &keys {
                let slot = keyset.find(key);
                prop_assert!(slot < keys.len());
                prop_assert_eq!(keyset.keys()[slot], key);
            }
            for &key in &probes {
                prop_assert_eq!(keyset.contains(key), keys.contains(&key));
            }
        }
    }
}

#[cfg(feature = "serde")]
mod serialization {
    use super::*;
    use crate::{
        low_level::{ConstVec, LookupTable},
        Natural, Pext,
    };
    use alloc::string::{String, ToString};

    #[test]
    fn round_trip() {
        let map = Builder::new()
            .build_map((0..40u32).map(|key| (key * 1009, key.to_string())))
            .unwrap();
        let bytes = bincode::serialize(&map).unwrap();
        let decoded: Map<AnyKeyset<u32>, String> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.keyset().keys(), map.keyset().keys());
        for key in 0..40_000 {
            assert_eq!(decoded.get(key), map.get(key));
        }
    }

    #[test]
    fn unsorted_keys_rejected() {
        let keyset = OrderedKeyset::__from_raw_parts(ConstVec::from_vec(vec![3u16, 1]), Natural);
        let bytes = bincode::serialize(&keyset).unwrap();
        let error = bincode::deserialize::<OrderedKeyset<u16>>(&bytes).unwrap_err();
        assert!(error.to_string().contains("not ordered"), "{error}");
    }

    #[test]
    fn misplaced_keys_rejected() {
        let keyset = PextKeyset::__from_raw_parts(
            ConstVec::from_vec(vec![1u32, 2, 3]),
            LookupTable::U8(ConstVec::from_vec(vec![0, 0, 0, 0])),
            Pext::new(0b11),
            1,
        );
        let bytes = bincode::serialize(&keyset).unwrap();
        let error = bincode::deserialize::<PextKeyset<u32>>(&bytes).unwrap_err();
        assert!(error.to_string().contains("key 1"), "{error}");

        let keyset = PextKeyset::__from_raw_parts(
            ConstVec::from_vec(vec![1u32]),
            LookupTable::U8(ConstVec::from_vec(vec![0, 0, 0])),
            Pext::new(0b11),
            1,
        );
        let bytes = bincode::serialize(&keyset).unwrap();
        let error = bincode::deserialize::<PextKeyset<u32>>(&bytes).unwrap_err();
        assert!(error.to_string().contains("lookup table length"), "{error}");
    }

    #[test]
    fn value_count_checked() {
        let keyset = OrderedKeyset::from_keys([1u8, 2]);
        let map = Map::__from_raw_parts(keyset, ConstVec::from_vec(vec!['a']));
        let bytes = bincode::serialize(&map).unwrap();
        let error = bincode::deserialize::<Map<OrderedKeyset<u8>, char>>(&bytes).unwrap_err();
        assert!(error.to_string().contains("1 values for 2 keys"), "{error}");
    }
}
