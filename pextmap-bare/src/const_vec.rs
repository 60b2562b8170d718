//! Read-only storage that is either a `static` slice or a heap allocation.

use core::ops::Deref;

/// Immutable slice storage backing every table in this crate.
///
/// Tables built at run time own a [`Vec`](alloc::vec::Vec); tables emitted by code generation point
/// into `static` data, so they can be constructed in a `const` context without allocating. Either
/// way, the contents are never modified after construction, which is why only [`Deref`] is
/// provided.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ConstVec<T> {
    /// Semantically `&'static [T]`. Written as a pointer because a `&'static [T]` field would
    /// force `T: 'static` on the whole type, and values of a map may borrow.
    Static(*const [T]),

    /// Heap-allocated data.
    #[cfg(feature = "alloc")]
    Owned(alloc::vec::Vec<T>),
}

// Necessary due to use of `*const [T]`.
// SAFETY: `Owned` is `Send` whenever `T: Send`. `Static` is only created from `&'static [T]` with
// `T: Sync`, and such a reference is `Send`.
unsafe impl<T: Send> Send for ConstVec<T> {}
// SAFETY: `Owned` is `Sync` whenever `T: Sync`. `Static` requires `T: Sync`, which makes
// `&'static [T]` `Sync`.
unsafe impl<T: Sync> Sync for ConstVec<T> {}

impl<T> ConstVec<T> {
    /// Reference static data.
    ///
    /// `T: Sync` is required because the same slice may be referenced by several `ConstVec`s, and
    /// `ConstVec<T>` is `Send` for `T: Send`. Sending one of two aliasing handles to another thread
    /// would otherwise share a `!Sync` value across threads.
    #[inline]
    pub const fn from_static_ref(slice: &'static [T]) -> Self
    where
        T: Sync,
    {
        Self::Static(slice)
    }

    /// Take ownership of runtime data.
    #[cfg(feature = "alloc")]
    #[inline]
    pub const fn from_vec(vec: alloc::vec::Vec<T>) -> Self {
        Self::Owned(vec)
    }

    /// Take ownership of runtime data.
    #[cfg(not(feature = "alloc"))]
    #[inline]
    pub const fn from_vec(_vec: impl Deref<Target = [T]>) -> Self {
        const {
            panic!("`pextmap` feature `alloc` is not enabled");
        }
    }

    /// Borrow the contents.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> Deref for ConstVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        match self {
            // SAFETY: `ptr` was created from a `&'static [T]`.
            Self::Static(ptr) => unsafe { &**ptr },
            #[cfg(feature = "alloc")]
            Self::Owned(vec) => vec,
        }
    }
}

#[cfg(feature = "alloc")]
impl<T> From<alloc::vec::Vec<T>> for ConstVec<T> {
    #[inline]
    fn from(vec: alloc::vec::Vec<T>) -> Self {
        Self::Owned(vec)
    }
}

#[cfg(feature = "codegen")]
impl<T: super::codegen::Codegen> super::codegen::Codegen for ConstVec<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let const_vec = gen.path("pextmap::low_level::ConstVec");
        if gen.mutability() {
            let vec = gen.path("alloc::vec");
            let data = gen.array(self.iter());
            quote::quote!(#const_vec::from_vec(#vec!#data))
        } else {
            // Byte slices come out as `b"..."`, which is already a reference.
            let data = gen.piece(&self.as_slice());
            quote::quote!(#const_vec::from_static_ref(#data))
        }
    }
}

/// Scope for `serde`-related code.
#[cfg(feature = "serde")]
mod serde_support {
    use super::ConstVec;
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    impl<T: Serialize> Serialize for ConstVec<T> {
        #[inline]
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for element in self.iter() {
                seq.serialize_element(element)?;
            }
            seq.end()
        }
    }

    #[cfg(feature = "alloc")]
    impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for ConstVec<T> {
        #[inline]
        fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            alloc::vec::Vec::<T>::deserialize(deserializer).map(ConstVec::from_vec)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_data() {
        let offsets = const { ConstVec::from_static_ref(&[7u16, 0, 3]) };
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets.first(), Some(&7));
        assert_eq!(offsets.get(2), Some(&3));
        assert_eq!(offsets.get(3), None);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn owned_data() {
        let values: ConstVec<&str> = alloc::vec!["Continue", "OK"].into();
        assert_eq!(values.as_slice(), ["Continue", "OK"]);
        let copy = values.clone();
        assert_eq!(&*copy, &*values);
    }
}
