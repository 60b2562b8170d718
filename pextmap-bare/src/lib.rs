//! This crate provides types for [`pextmap`](https://docs.rs/pextmap). Use that crate instead.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod algorithms;
mod builder;
pub mod codegen;
mod const_vec;
mod error;
mod key;
mod keyset;
mod lookup_table;
mod map;
pub(crate) mod mask_search;
mod ordered_keyset;
mod pext;
mod pext_keyset;
pub(crate) mod placement;
mod span;

#[cfg(feature = "build")]
pub use builder::Builder;
#[cfg(feature = "build")]
pub use error::BuildError;
pub use key::{Key, RawInt};
pub use keyset::{AnyKeyset, Keyset};
pub use lookup_table::OffsetWidth;
pub use map::{AutoMap, Map, Valueset};
pub use ordered_keyset::{ByFn, Compare, Natural, OrderedKeyset};
pub use pext::Pext;
pub use pext_keyset::PextKeyset;
pub use span::MapSpan;

/// Public (but hidden) reexports for codegen to access.
#[doc(hidden)]
pub mod low_level {
    pub use super::const_vec::ConstVec;
    pub use super::lookup_table::LookupTable;
}

#[cfg(all(test, feature = "build"))]
mod tests;
