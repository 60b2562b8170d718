//! Macros for compile time generation.
//!
//! Unlike [`Builder`], these macros are zero-cost in runtime. Use them whenever the keys are fixed
//! and can be embedded in the source code.
//!
//!
//! # Keys
//!
//! Keys must be literals of a primitive integer type, `bool`, or `char`, optionally negated or
//! parenthesized. `T::MIN` and `T::MAX` are accepted for primitive `T`. Keys of other types, such as
//! enums, can't be evaluated by a macro; build such maps in `build.rs` with [`codegen`] instead.
//!
//! This limitation applies only to keys. Values of a [`map!`] are passed through as-is and can be
//! arbitrary expressions.
//!
//!
//! # Type inference
//!
//! The macros infer the key type from literal suffixes, but this is not always possible:
//!
//! ```compile_fail
//! const MAP: pextmap::AutoMap<u64, ()> = pextmap::map! {
//!     1 => (),
//!     2 => (),
//! };
//! ```
//!
//! ...as macros cannot "look outside" or participate in type inference. In this case, the type
//! has to be specified explicitly:
//!
//! ```rust
//! const MAP: pextmap::AutoMap<u64, ()> = pextmap::map! {
//!     for u64;  // type annotation
//!     1 => (),
//!     2 => (),
//! };
//! ```
//!
//! Alternatively, suffix one of the keys: `1u64 => ()`.
//!
//!
//! # Options
//!
//! Options precede the entries and are terminated with `;`:
//!
//! - `for T;` sets the key type.
//! - `depth = N;` sets the probe depth, see [`Builder::max_depth`].
//! - `ordered = N;` sets the largest key count that gets an ordered keyset, see
//!   [`Builder::ordered_threshold`]. `ordered = 0;` always builds a perfect-hash keyset.
//! - `mut;` makes the output own its storage, see [`map!`].
//!
//! [`codegen`]: https://docs.rs/pextmap/latest/pextmap/codegen/index.html

#[cfg(doc)]
use super::*;

#[doc(hidden)]
pub use pextmap_macros;

// Two reasons for `macro_rules!` instead of a direct reexport:
// 1. Document the accepted syntax.
// 2. Pass `$crate` to the macro.

/// Create an [`AutoMap`] in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// Most maps should be put in a `const` or a `static`:
///
/// ```rust
/// use pextmap::AutoMap;
///
/// static OPCODES: AutoMap<u8, &str> = pextmap::map! {
///     0x90u8 => "nop",
///     0xc3 => "ret",
///     0xcc => "int3",
/// };
///
/// assert_eq!(OPCODES.get(0xc3), Some(&"ret"));
/// assert_eq!(OPCODES.get(0x00), None);
/// ```
///
///
/// # Mutability
///
/// Values that need to be created in runtime, such as `String`s, can't be put in `static` data. In
/// this case, add `mut;` to the beginning of the macro arguments. The map then owns a heap copy of
/// the values and can't be used in a `const` context:
///
/// ```rust
/// let map = pextmap::map! {
///     mut;
///     for char;
///     'a' => String::from("alpha"),
///     'b' => String::from("beta"),
/// };
///
/// assert_eq!(map.get('b').map(String::as_str), Some("beta"));
/// ```
///
/// If you accidentally omit `mut;`, you might see errors like:
///
/// > temporary value dropped while borrowed
#[cfg(doc)]
#[macro_export]
macro_rules! map {
    // Not actually valid/usable macro rules, but close enough for docs.
    (
        $(for $key_type:ty;)?
        $(depth = $depth:literal;)?
        $(ordered = $ordered:literal;)?
        $(mut;)?
        $($key:expr => $value:expr),* $(,)?
    ) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

/// Create an [`AnyKeyset`] in compile time.
///
/// See [module-level documentation](self) for more information.
///
///
/// # Example
///
/// ```rust
/// use pextmap::{AnyKeyset, Keyset};
///
/// const PORTS: AnyKeyset<u16> = pextmap::keyset!(for u16; 22, 80, 443, 8080);
///
/// assert!(PORTS.contains(443));
/// assert!(!PORTS.contains(21));
/// assert_eq!(PORTS.keys()[PORTS.find(80)], 80);
/// ```
#[cfg(doc)]
#[macro_export]
macro_rules! keyset {
    // Not actually valid/usable macro rules, but close enough for docs.
    (
        $(for $key_type:ty;)?
        $(depth = $depth:literal;)?
        $(ordered = $ordered:literal;)?
        $($key:expr),* $(,)?
    ) => {
        // Doesn't need to typecheck, but needs to parse.
        ()
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! map {
    ($($tt:tt)*) => {
        $crate::macros::pextmap_macros::map!(crate $crate; $($tt)*)
    };
}

#[cfg(not(doc))]
#[macro_export]
macro_rules! keyset {
    ($($tt:tt)*) => {
        $crate::macros::pextmap_macros::keyset!(crate $crate; $($tt)*)
    };
}

pub use keyset;
pub use map;
