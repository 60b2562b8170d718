//! The keyset abstraction shared by maps and spans.

use super::{
    key::Key,
    ordered_keyset::{Compare, Natural, OrderedKeyset},
    pext_keyset::PextKeyset,
};

/// Resolution of keys to dense slots.
///
/// A keyset with `len()` keys maps each of them to a distinct slot in `0..len()`, and any other key
/// to `len()`. Slots index [`keys`](Self::keys) and the value arrays of maps built on the keyset.
///
/// The trait is object-safe, so `&dyn Keyset<Key = K>` erases the concrete keyset type; this is how
/// [`MapSpan`](crate::MapSpan) works.
pub trait Keyset {
    /// Key type.
    type Key: Copy + Eq;

    /// Resolve a key to its slot, or to [`len`](Self::len) if absent.
    fn find(&self, key: Self::Key) -> usize;

    /// Keys in slot order.
    fn keys(&self) -> &[Self::Key];

    /// Number of keys.
    #[inline]
    fn len(&self) -> usize {
        self.keys().len()
    }

    /// Check if there are no keys.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the key is present.
    #[inline]
    fn contains(&self, key: Self::Key) -> bool {
        self.find(key) != self.len()
    }
}

impl<T: Keyset + ?Sized> Keyset for &T {
    type Key = T::Key;

    #[inline]
    fn find(&self, key: T::Key) -> usize {
        (**self).find(key)
    }

    #[inline]
    fn keys(&self) -> &[T::Key] {
        (**self).keys()
    }

    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Either kind of keyset, as picked by [`Builder`](crate::Builder).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(all(feature = "alloc", feature = "serde"), derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "K: serde::Serialize, K::Raw: serde::Serialize, C: serde::Serialize",
        deserialize = "K: serde::Deserialize<'de>, K::Raw: serde::Deserialize<'de>, C: serde::Deserialize<'de> + Compare<K>"
    ))
)]
#[non_exhaustive]
pub enum AnyKeyset<K: Key, C = Natural> {
    /// Sorted keys, for small sets.
    Ordered(OrderedKeyset<K, C>),
    /// Perfect-hash keyset.
    Pext(PextKeyset<K>),
}

impl<K: Key, C: Compare<K>> Keyset for AnyKeyset<K, C> {
    type Key = K;

    #[inline]
    fn find(&self, key: K) -> usize {
        match self {
            Self::Ordered(keyset) => keyset.find(key),
            Self::Pext(keyset) => keyset.find(key),
        }
    }

    #[inline]
    fn keys(&self) -> &[K] {
        match self {
            Self::Ordered(keyset) => keyset.keys(),
            Self::Pext(keyset) => keyset.keys(),
        }
    }
}

impl<K: Key, C> From<OrderedKeyset<K, C>> for AnyKeyset<K, C> {
    #[inline]
    fn from(keyset: OrderedKeyset<K, C>) -> Self {
        Self::Ordered(keyset)
    }
}

impl<K: Key, C> From<PextKeyset<K>> for AnyKeyset<K, C> {
    #[inline]
    fn from(keyset: PextKeyset<K>) -> Self {
        Self::Pext(keyset)
    }
}

#[cfg(feature = "codegen")]
impl<K: Key + super::codegen::Codegen, C: super::codegen::Codegen> super::codegen::Codegen
    for AnyKeyset<K, C>
where
    K::Raw: super::codegen::Codegen,
{
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let (variant, keyset) = match self {
            Self::Ordered(keyset) => (gen.path("pextmap::AnyKeyset::Ordered"), gen.piece(keyset)),
            Self::Pext(keyset) => (gen.path("pextmap::AnyKeyset::Pext"), gen.piece(keyset)),
        };
        quote::quote!(#variant(#keyset))
    }
}

#[cfg(all(test, feature = "build"))]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    #[test]
    fn dynamic_dispatch() {
        let keysets: Vec<Box<dyn Keyset<Key = u32>>> = alloc::vec![
            Box::new(OrderedKeyset::from_keys([4, 8, 15, 16, 23, 42])),
            Box::new(PextKeyset::from_keys([4, 8, 15, 16, 23, 42])),
        ];
        for keyset in &keysets {
            assert_eq!(keyset.len(), 6);
            for key in [4, 8, 15, 16, 23, 42] {
                assert_eq!(keyset.keys()[keyset.find(key)], key);
            }
            assert!(!keyset.contains(5));
        }
    }

    #[test]
    fn by_reference() {
        let keyset = OrderedKeyset::from_keys([1u8, 2, 3]);
        let borrowed = &keyset;
        assert_eq!(Keyset::find(&borrowed, 2), 1);
        assert_eq!(Keyset::len(&borrowed), 3);
    }

    #[test]
    fn either_variant() {
        let ordered: AnyKeyset<u16> = OrderedKeyset::from_keys([7, 9]).into();
        let pext: AnyKeyset<u16> = PextKeyset::from_keys([7, 9]).into();
        for keyset in [&ordered, &pext] {
            assert!(keyset.contains(7));
            assert!(keyset.contains(9));
            assert!(!keyset.contains(8));
        }
    }
}
