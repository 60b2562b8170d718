#![cfg(feature = "codegen")]

//! Code generation.
//!
//! Keysets and maps are built at build time, so the resulting tables can be emitted as Rust code
//! from `build.rs` or a proc macro and evaluated in a `const` context at zero runtime cost. The
//! mask search never runs in the final binary.
//!
//! Keys, offsets, and integers are generated as unsuffixed literals, so the generated expression
//! must be placed where its type is known, e.g. in a `const` item with an explicit type.
//!
//!
//! # Mutability and `const`
//!
//! By default, arrays are emitted as references to static data, which keeps the expression usable
//! in `const` items. After `set_mutability(true)`, arrays are emitted as `vec![..]` instead, which
//! allocates but yields an owned value.
//!
//!
//! # Example
//!
//! ```rust
//! # extern crate pextmap_bare as pextmap;
//! use pextmap::{codegen::CodeGenerator, Map, PextKeyset};
//!
//! let keyset = PextKeyset::from_keys([200u16, 404, 500]);
//! let map = Map::from_entries(keyset, [(200, "OK"), (404, "Not Found"), (500, "Oops")]);
//! let code = CodeGenerator::new().generate(&map);
//! assert!(code.to_string().contains("__from_raw_parts"));
//! ```
//!
//! ```ignore
//! const STATUS: pextmap::Map<pextmap::PextKeyset<u16>, &str> = include!("path/to/generated.rs");
//! ```

use alloc::{borrow::ToOwned, format, string::String, vec::Vec};
use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};
use std::collections::{HashMap, HashSet};

/// Code generator.
pub struct CodeGenerator {
    /// Crate name to path mapping, as provided with [`set_crate`](Self::set_crate).
    crate_paths: HashMap<String, TokenStream>,

    /// Full paths, as passed to [`path`](Self::path), to the aliases they're imported as.
    path_to_alias: HashMap<String, Ident>,

    /// Aliases already taken.
    aliases: HashSet<String>,

    /// Whether a path inside `alloc` was requested, requiring `extern crate alloc`.
    alloc_wanted: bool,

    /// Emit owned arrays instead of static references.
    mutability: bool,
}

impl CodeGenerator {
    /// *This method is a hack to add private documentation to public items.*
    ///
    /// The output has the following shape:
    ///
    /// ```ignore
    /// {
    ///     extern crate alloc as _Alloc; // only if some path lives in `alloc`
    ///     use ::pextmap::Map as __Map;
    ///     use ::pextmap::PextKeyset as __PextKeyset;
    ///     // other imports...
    ///     {piece}
    /// }
    /// ```
    ///
    /// Every path is imported once under a mangled alias, so repeated paths don't bloat the output
    /// and user items in scope can't shadow them.
    #[allow(dead_code, clippy::missing_const_for_fn, reason = "docs hack")]
    fn __private_docs() {}

    /// Create a code generator with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            crate_paths: HashMap::new(),
            path_to_alias: HashMap::new(),
            aliases: HashSet::new(),
            alloc_wanted: false,
            mutability: false,
        }
    }

    /// Generate owned, mutable objects instead of `const`-friendly ones.
    #[inline]
    pub fn set_mutability(&mut self, mutability: bool) {
        self.mutability = mutability;
    }

    /// Configure name-to-path mapping for crates.
    ///
    /// By default, `pextmap` resolves to `::pextmap`. Proc macros remap it to `$crate` so that
    /// generated code works wherever the facade crate is reachable.
    #[inline]
    pub fn set_crate(&mut self, name: &str, path: TokenStream) {
        self.crate_paths.insert(name.into(), path);
    }

    /// Check if generating code for a mutable context.
    #[inline]
    #[must_use]
    pub const fn mutability(&self) -> bool {
        self.mutability
    }

    /// Turn a value into code.
    #[inline]
    pub fn generate<T: Codegen>(mut self, value: &T) -> TokenStream {
        let value = self.piece(value);

        let mut crate_paths = core::mem::take(&mut self.crate_paths);
        let extern_crate_alloc = (self.alloc_wanted
            && crate_paths
                .insert("alloc".to_owned(), quote!(_Alloc))
                .is_none())
        .then_some(quote!(
            extern crate alloc as _Alloc;
        ));

        let mut imports: Vec<(String, Ident)> = core::mem::take(&mut self.path_to_alias).into_iter().collect();
        // Deterministic output, so that build scripts don't trigger spurious rebuilds.
        imports.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let uses = imports.into_iter().map(|(path, alias)| {
            let (crate_name, rest) = path.split_once("::").unwrap_or((path.as_str(), ""));
            let crate_path = crate_paths.get(crate_name).cloned().unwrap_or_else(|| {
                let ident = format_ident!("{crate_name}");
                quote!(:: #ident)
            });
            let components = rest
                .split("::")
                .filter(|component| !component.is_empty())
                .map(|component| format_ident!("{component}"));
            quote!(use #crate_path #(:: #components)* as #alias;)
        });

        quote!(
            {
                #extern_crate_alloc
                #(#uses)*
                #value
            }
        )
    }

    /// Turn a value into a recursively useable piece of code.
    #[inline]
    pub fn piece<T: Codegen>(&mut self, piece: &T) -> TokenStream {
        piece.generate_piece(self)
    }

    /// Produce code for an array from an iterator.
    #[inline]
    pub fn array<'a, T: 'a + Codegen>(
        &mut self,
        elements: impl IntoIterator<Item = &'a T>,
    ) -> TokenStream {
        let elements = elements.into_iter().map(|element| self.piece(element));
        quote!([#(#elements),*])
    }

    /// Resolve a path like `crate::path::inside::it` to a short alias.
    ///
    /// The crate component is resolved according to [`set_crate`](Self::set_crate).
    #[inline]
    pub fn path(&mut self, path: &str) -> TokenStream {
        if let Some(alias) = self.path_to_alias.get(path) {
            return quote!(#alias);
        }

        if path.split_once("::").map_or(path, |(krate, _)| krate) == "alloc" {
            self.alloc_wanted = true;
        }

        let base = format!("__{}", path.rsplit_once("::").map_or(path, |(_, name)| name));
        let mut alias = base.clone();
        let mut suffix = 2usize;
        while self.aliases.contains(&alias) {
            alias = format!("{base}{suffix}");
            suffix += 1;
        }
        self.aliases.insert(alias.clone());

        let alias = format_ident!("{alias}");
        self.path_to_alias.insert(path.to_owned(), alias.clone());
        quote!(#alias)
    }
}

impl Default for CodeGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Values that can be turned into code.
///
/// Types whose state is not reachable through public constructors expose a `#[doc(hidden)]`
/// `const fn __from_raw_parts` for generated code to call.
pub trait Codegen: Sized {
    /// Emit a piece of code corresponding to this value.
    ///
    /// Call [`CodeGenerator::generate`] to produce the complete code for a value; this method is
    /// for recursive use from other implementations.
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream;
}

/// Implement [`Codegen`] for types by calling methods on [`Literal`].
macro_rules! literal {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl Codegen for $ty {
                #[inline]
                fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
                    TokenTree::Literal(Literal::$method(*self)).into()
                }
            }
        )*
    };
}

literal! {
    u8 => u8_unsuffixed,
    u16 => u16_unsuffixed,
    u32 => u32_unsuffixed,
    u64 => u64_unsuffixed,
    u128 => u128_unsuffixed,
    usize => usize_unsuffixed,
    i8 => i8_unsuffixed,
    i16 => i16_unsuffixed,
    i32 => i32_unsuffixed,
    i64 => i64_unsuffixed,
    i128 => i128_unsuffixed,
    isize => isize_unsuffixed,
    char => character,
    &'_ str => string,
}

impl Codegen for bool {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        TokenTree::Ident(format_ident!("{self}")).into()
    }
}

impl Codegen for String {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let string = gen.path("alloc::string::String");
        let text = gen.piece(&self.as_str());
        quote!(#string::from(#text))
    }
}

impl Codegen for () {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        quote!(())
    }
}

impl<T: Codegen> Codegen for Option<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        match self {
            None => gen.path("core::option::Option::None"),
            Some(value) => {
                let some = gen.path("core::option::Option::Some");
                let value = gen.piece(value);
                quote!(#some(#value))
            }
        }
    }
}

impl<T: Codegen> Codegen for Vec<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        if let Some(bytes) = as_byte_slice(self.as_slice()) {
            let vec = gen.path("alloc::vec::Vec");
            let bytes = Literal::byte_string(bytes);
            quote!(#vec::from(#bytes))
        } else {
            let vec = gen.path("alloc::vec");
            let array = gen.array(self);
            quote!(#vec! #array)
        }
    }
}

impl<T: Codegen, const N: usize> Codegen for [T; N] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        gen.array(self)
    }
}

impl<T: Codegen> Codegen for &T {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let target = gen.piece(*self);
        quote!(&#target)
    }
}

impl<T: Codegen> Codegen for &[T] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        if let Some(bytes) = as_byte_slice(*self) {
            TokenTree::Literal(Literal::byte_string(bytes)).into()
        } else {
            let array = gen.array(*self);
            quote!(&#array)
        }
    }
}

/// If `[T]` is `[u8]`, returns `Some(value)`. Otherwise, returns `None`.
///
/// Byte tables are emitted as `b".."` literals, which are much shorter than arrays.
fn as_byte_slice<T>(value: &[T]) -> Option<&[u8]> {
    if typeid::of::<T>() == typeid::of::<u8>() {
        // SAFETY: `T` and `u8` have the same type ID and `u8` has no lifetimes, so `T` is `u8`.
        Some(unsafe { core::slice::from_raw_parts(value.as_ptr().cast::<u8>(), value.len()) })
    } else {
        None
    }
}

/// Implement [`Codegen`] for tuples.
macro_rules! tuple {
    ($(($name:tt $index:tt))*) => {
        impl<$($name: Codegen),*> Codegen for ($($name,)*) {
            #[inline]
            #[allow(non_snake_case, reason = "codegen")]
            fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
                $(let $name = gen.piece(&self.$index);)*
                quote!(($(#$name,)*))
            }
        }
    }
}

tuple!((A 0));
tuple!((A 0) (B 1));
tuple!((A 0) (B 1) (C 2));
tuple!((A 0) (B 1) (C 2) (D 3));
