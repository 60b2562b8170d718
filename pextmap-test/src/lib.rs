//! Maps generated by the build script.

use pextmap::{AutoMap, Map, PextKeyset};

/// Reason phrases of HTTP status codes.
pub static STATUS: Map<PextKeyset<u16>, &str> = include!(concat!(env!("OUT_DIR"), "/status.rs"));

/// Values of hexadecimal digits, in either case.
pub static HEX_DIGITS: AutoMap<char, u8> = include!(concat!(env!("OUT_DIR"), "/hex_digits.rs"));

/// Parse a hexadecimal number that fits in a `u32`.
#[must_use]
pub fn parse_hex(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 8 {
        return None;
    }
    s.chars().try_fold(0u32, |acc, c| {
        HEX_DIGITS.get(c).map(|&digit| (acc << 4) | u32::from(digit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pextmap::{AnyKeyset, Keyset};

    #[test]
    fn status_phrases() {
        assert_eq!(STATUS.get(200), Some(&"OK"));
        assert_eq!(STATUS.get(418), Some(&"I'm a teapot"));
        assert_eq!(STATUS.get(505), Some(&"HTTP Version Not Supported"));
        assert_eq!(STATUS.len(), 38);
        let found = (0..1000).filter(|&code| STATUS.contains_key(code)).count();
        assert_eq!(found, 38);
        assert_eq!(STATUS.get(299), None);
        assert!(STATUS.keyset().depth() <= 2);
    }

    #[test]
    fn status_round_trip() {
        let mut seen = 0;
        for (code, phrase) in STATUS.iter() {
            assert_eq!(STATUS.at(code), phrase);
            assert_eq!(STATUS.keyset().keys()[STATUS.find(code)], code);
            seen += 1;
        }
        assert_eq!(seen, STATUS.len());
    }

    #[test]
    fn hex() {
        assert!(matches!(HEX_DIGITS.keyset(), AnyKeyset::Pext(_)));
        assert_eq!(HEX_DIGITS.get('b'), Some(&11));
        assert_eq!(HEX_DIGITS.get('B'), Some(&11));
        assert_eq!(HEX_DIGITS.get('g'), None);
        assert_eq!(parse_hex("dEadBeef"), Some(0xdead_beef));
        assert_eq!(parse_hex("0"), Some(0));
        assert_eq!(parse_hex("12g"), None);
        assert_eq!(parse_hex(""), None);
        assert_eq!(parse_hex("123456789"), None);
    }
}
