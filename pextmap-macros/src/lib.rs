//! Procedural macros for [`pextmap`](https://docs.rs/pextmap). Use that crate instead.

#![allow(clippy::std_instead_of_alloc, reason = "we're not in #[no_std]")]
#![allow(clippy::wildcard_enum_match_arm, reason = "too many false positives")]

mod keys;
mod parse;
mod values;

use self::{
    keys::{with_typed_keys, Callback},
    parse::{Context, MapArm, WithContext},
    values::{evaluate, KeyType, TypedValue},
};
use pextmap::{
    codegen::{CodeGenerator, Codegen},
    BuildError, Key,
};
use proc_macro2::TokenStream;
use proc_macro_error2::{emit_call_site_error, emit_error, set_dummy};
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Expr};

/// Evaluate the keys and settle on their type.
///
/// Diagnostics are emitted for every problem found, not just the first one.
fn parse_keys<'a>(
    context: &Context,
    keys: impl Iterator<Item = &'a Expr>,
) -> Option<(KeyType, Vec<TypedValue>)> {
    let mut failed = false;
    let mut values = Vec::new();
    for key in keys {
        match evaluate(key) {
            Some(value) => values.push(value),
            None => failed = true,
        }
    }

    let key_type = if let Some(ty) = &context.key_type {
        let Some(key_type) = KeyType::from_syn_type(ty) else {
            emit_error!(
                ty,
                "unsupported key type `{}`\nkeys must be primitive integers, `bool`, or `char`\nnote: `u128` and `i128` are not supported",
                ty.to_token_stream(),
            );
            return None;
        };
        key_type
    } else if let Some(key_type) = values.iter().find_map(|value| value.ty) {
        key_type
    } else if failed {
        // Diagnostics have already been emitted
        return None;
    } else {
        emit_call_site_error!("type annotations needed\nspecify the key type by prepending `for T;` to the macro input\nnote: integer sizes need to be specified exactly");
        return None;
    };

    for value in &values {
        failed |= !value.fits(key_type);
    }
    if failed {
        return None;
    }
    Some((key_type, values))
}

/// Report a build failure at the offending keys where possible.
fn emit_build_error(error: &BuildError, keys: &[&Expr]) {
    if let BuildError::DuplicateKey { first, second } = *error {
        emit_error!(keys[first], "this key is equal to...");
        emit_error!(keys[second], "...this key");
    } else {
        emit_call_site_error!("{}", error);
    }
}

fn code_generator(context: &Context) -> CodeGenerator {
    let mut gen = CodeGenerator::new();
    if let Some(path) = &context.pextmap_crate {
        gen.set_crate("pextmap", path.to_token_stream());
    }
    gen.set_mutability(context.mutable);
    gen
}

fn crate_path(context: &Context) -> TokenStream {
    context
        .pextmap_crate
        .as_ref()
        .map_or_else(|| quote!(::pextmap), ToTokens::to_token_stream)
}

struct PassThrough(TokenStream);

impl Codegen for PassThrough {
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        self.0.clone()
    }
}

// This option does not enable the `proc_macro_hack` crate. It only tweaks the error output to be
// valid in expression position.
#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn map(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    set_dummy(quote!(::core::unreachable!()));

    let input = parse_macro_input!(item as WithContext<MapArm>);
    let keys: Vec<&Expr> = input.elements.iter().map(|arm| &arm.key).collect();
    let Some((key_type, values)) = parse_keys(&input.context, keys.iter().copied()) else {
        return quote! {}.into();
    };

    struct Cb<'a> {
        input: &'a WithContext<MapArm>,
        keys: &'a [&'a Expr],
        key_type: KeyType,
    }

    impl Callback for Cb<'_> {
        fn call_once<K: Key + Ord + Codegen>(self, keys: Vec<K>) -> TokenStream
        where
            K::Raw: Codegen,
        {
            let Self {
                input,
                keys: key_exprs,
                key_type,
            } = self;

            let entries = keys.into_iter().zip(
                input
                    .elements
                    .iter()
                    .map(|arm| PassThrough(arm.value.to_token_stream())),
            );
            let map = match input.context.builder().build_map(entries) {
                Ok(map) => map,
                Err(error) => {
                    emit_build_error(&error, key_exprs);
                    return quote! {};
                }
            };

            let pextmap = crate_path(&input.context);
            let map = code_generator(&input.context).generate(&map);
            quote! {{
                let map: #pextmap::AutoMap<#key_type, _> = #map;
                map
            }}
        }
    }

    with_typed_keys(
        &values,
        key_type,
        Cb {
            input: &input,
            keys: &keys,
            key_type,
        },
    )
    .unwrap_or_default()
    .into()
}

#[proc_macro_error2::proc_macro_error(proc_macro_hack)]
#[proc_macro]
pub fn keyset(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    set_dummy(quote!(::core::unreachable!()));

    let input = parse_macro_input!(item as WithContext<Expr>);
    let keys: Vec<&Expr> = input.elements.iter().collect();
    let Some((key_type, values)) = parse_keys(&input.context, keys.iter().copied()) else {
        return quote! {}.into();
    };

    struct Cb<'a> {
        context: &'a Context,
        keys: &'a [&'a Expr],
        key_type: KeyType,
    }

    impl Callback for Cb<'_> {
        fn call_once<K: Key + Ord + Codegen>(self, keys: Vec<K>) -> TokenStream
        where
            K::Raw: Codegen,
        {
            let Self {
                context,
                keys: key_exprs,
                key_type,
            } = self;

            let keyset = match context.builder().build_keyset(keys) {
                Ok(keyset) => keyset,
                Err(error) => {
                    emit_build_error(&error, key_exprs);
                    return quote! {};
                }
            };

            let pextmap = crate_path(context);
            let keyset = code_generator(context).generate(&keyset);
            quote! {{
                let keyset: #pextmap::AnyKeyset<#key_type> = #keyset;
                keyset
            }}
        }
    }

    with_typed_keys(
        &values,
        key_type,
        Cb {
            context: &input.context,
            keys: &keys,
            key_type,
        },
    )
    .unwrap_or_default()
    .into()
}
