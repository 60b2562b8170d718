#![cfg(feature = "macros")]

use pextmap::{AnyKeyset, AutoMap, Keyset};

const SMALL: AutoMap<u32, &str> = pextmap::map! {
    50u32 => "fifty",
    10 => "ten",
    123 => "many",
};

static LARGE: AutoMap<u32, u32> = pextmap::map! {
    ordered = 0;
    50u32 => 20,
    10 => 40,
    123 => 435,
    53_498 => 423,
    1230 => 1234,
    34_598 => 12_390,
    123_984 => 92_438,
    243_098 => 12_309,
};

static OPCODES: AutoMap<u8, &str> = pextmap::map! {
    0x90u8 => "nop",
    0xc3 => "ret",
    0xcc => "int3",
};

#[test]
fn suffix_sets_key_type() {
    assert_eq!(OPCODES.get(0xc3), Some(&"ret"));
    assert_eq!(OPCODES.get(0x90), Some(&"nop"));
    assert_eq!(OPCODES.get(0x00), None);
}

#[test]
fn small_maps_are_ordered() {
    assert!(matches!(SMALL.keyset(), AnyKeyset::Ordered(_)));
    assert_eq!(SMALL.get(10), Some(&"ten"));
    assert_eq!(SMALL.get(50), Some(&"fifty"));
    assert_eq!(SMALL.get(123), Some(&"many"));
    assert_eq!(SMALL.get(11), None);
    assert_eq!(SMALL.len(), 3);
}

#[test]
fn forced_perfect_hash() {
    assert!(matches!(LARGE.keyset(), AnyKeyset::Pext(_)));
    assert_eq!(LARGE.get(53_498), Some(&423));
    assert_eq!(LARGE.get(243_098), Some(&12_309));
    assert_eq!(LARGE.at(10), &40);
    for key in [0, 1, 51, 124, 53_499, 1 << 31, u32::MAX] {
        assert_eq!(LARGE.get(key), None, "{key}");
    }
    assert_eq!(LARGE.iter().count(), 8);
}

#[test]
fn depth_option() {
    let keyset = pextmap::keyset!(
        for u64;
        depth = 1;
        ordered = 0;
        1, 2, 4, 8, 16, 32, 64, 128, 1_099_511_627_776,
    );
    let AnyKeyset::Pext(pext) = &keyset else {
        panic!("expected a perfect-hash keyset");
    };
    assert_eq!(pext.depth(), 1);
    for key in keyset.keys() {
        assert!(keyset.contains(*key));
    }
    assert!(!keyset.contains(3));
}

#[test]
fn key_types() {
    let signed = pextmap::map! {
        for i32;
        -1 => 'a',
        i32::MIN => 'b',
        i32::MAX => 'c',
        0 => 'd',
    };
    assert_eq!(signed.get(-1), Some(&'a'));
    assert_eq!(signed.get(i32::MIN), Some(&'b'));
    assert_eq!(signed.get(i32::MAX), Some(&'c'));
    assert_eq!(signed.get(1), None);

    let chars = pextmap::map! {
        'x' => 1,
        'y' => 2,
        'ж' => 3,
    };
    assert_eq!(chars.get('ж'), Some(&3));
    assert_eq!(chars.get('z'), None);

    let bools = pextmap::map! { true => "yes", false => "no" };
    assert_eq!(bools.get(false), Some(&"no"));

    let bytes = pextmap::map! { u8::MAX => 1, b'a' => 2, (7) => 3 };
    assert_eq!(bytes.get(255), Some(&1));
    assert_eq!(bytes.get(97), Some(&2));
    assert_eq!(bytes.get(7), Some(&3));
}

#[test]
fn empty() {
    const EMPTY: AutoMap<u8, ()> = pextmap::map!(for u8;);
    assert!(EMPTY.is_empty());
    assert_eq!(EMPTY.get(0), None);
}

fn services() -> AutoMap<u16, String> {
    pextmap::map! {
        mut;
        for u16;
        80 => String::from("http"),
        443 => String::from("https"),
    }
}

#[test]
fn owned_values() {
    let names = services();
    assert_eq!(names.get(443).map(String::as_str), Some("https"));
    assert_eq!(names.get(80).map(String::as_str), Some("http"));
    assert_eq!(names.get(8080), None);
}

#[test]
fn span_over_macro_map() {
    let span = LARGE.as_span();
    assert_eq!(span.len(), 8);
    assert_eq!(span.get(1230), Some(&1234));
    assert_eq!(span.get(1231), None);
}
