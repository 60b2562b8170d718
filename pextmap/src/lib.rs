//! Static maps over integer-like keys, with lookups that don't hash.
//!
//! A perfect-hash keyset selects a few bits of each key with a mask, compresses them into a dense
//! index with a single multiply-and-shift, and resolves the index through a small lookup table to
//! a short run of candidate slots. Small key sets use a sorted array with a branchless binary
//! search instead. Either way, a lookup is a handful of arithmetic instructions and at most a few
//! comparisons.
//!
//!
//! # Usage
//!
//! `pextmap` implements keysets ([`PextKeyset`], [`OrderedKeyset`], and the auto-selected
//! [`AnyKeyset`]) that map keys to slots, and [`Map`]s that attach one value per slot.
//!
//! These types can be initialized in several ways:
//!
//! 1. They can be built in runtime with [`Builder`]. Building searches for a mask, which is far
//!    slower than a lookup, so build once and query many times.
//! 2. They can be built in compile time with macros, such as [`map!`]. Zero-cost in runtime.
//! 3. They can be built in `build.rs` with [`Builder`], translated to code with [`codegen`] and
//!    then `include!`d. Zero-cost in runtime and supports programmatic generation.
//! 4. They can be serialized with [`serde`](https://docs.rs/serde) and loaded back. Loading
//!    validates the tables, so a corrupted file is an error rather than a wrong answer.
//!
//! A keyset can back several maps with different value types: wrap a reference to it in a
//! [`Valueset`]. [`MapSpan`] erases the keyset kind and the ownership of the values, for code that
//! doesn't care how a map was built.
//!
//!
//! # Keys
//!
//! Keys implement [`Key`], a lossless conversion to an unsigned integer of the same width. It is
//! implemented for primitive integers, `bool`, and `char`; field-less enums can use [`impl_key!`].

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use pextmap_bare::{
    impl_key, AnyKeyset, AutoMap, ByFn, Compare, Key, Keyset, Map, MapSpan, Natural, OffsetWidth,
    OrderedKeyset, Pext, PextKeyset, RawInt, Valueset,
};

#[cfg(feature = "build")]
pub use pextmap_bare::{BuildError, Builder};

#[cfg(feature = "codegen")]
pub use pextmap_bare::codegen;

#[doc(hidden)]
pub use pextmap_bare::low_level;

#[cfg(feature = "macros")]
pub mod macros;
