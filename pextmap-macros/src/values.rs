use core::fmt;
use proc_macro2::{Span, TokenStream};
use proc_macro_error2::emit_error;
use quote::{format_ident, ToTokens};
use syn::spanned::Spanned;

/// Primitive key types the macros can evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    U8,
    U16,
    U32,
    U64,
    Usize,
    I8,
    I16,
    I32,
    I64,
    Isize,
    Bool,
    Char,
}

impl KeyType {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "usize" => Self::Usize,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "isize" => Self::Isize,
            "bool" => Self::Bool,
            "char" => Self::Char,
            _ => return None,
        })
    }

    pub fn from_syn_type(ty: &syn::Type) -> Option<Self> {
        match ty {
            syn::Type::Path(path) if path.qself.is_none() => {
                Self::from_name(&path.path.get_ident()?.to_string())
            }
            syn::Type::Group(group) => Self::from_syn_type(&group.elem),
            syn::Type::Paren(paren) => Self::from_syn_type(&paren.elem),
            _ => None,
        }
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    /// Inclusive range of an integer type. `usize` and `isize` keys are 64-bit.
    const fn integer_range(self) -> (i128, i128) {
        match self {
            Self::U8 => (0, u8::MAX as i128),
            Self::U16 => (0, u16::MAX as i128),
            Self::U32 => (0, u32::MAX as i128),
            Self::U64 | Self::Usize => (0, u64::MAX as i128),
            Self::I8 => (i8::MIN as i128, i8::MAX as i128),
            Self::I16 => (i16::MIN as i128, i16::MAX as i128),
            Self::I32 => (i32::MIN as i128, i32::MAX as i128),
            Self::I64 | Self::Isize => (i64::MIN as i128, i64::MAX as i128),
            Self::Bool | Self::Char => (0, 0),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::Bool => "bool",
            Self::Char => "char",
        };
        f.write_str(name)
    }
}

impl ToTokens for KeyType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        format_ident!("{self}").to_tokens(tokens);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i128),
    Bool(bool),
    Char(char),
}

/// An evaluated key.
#[derive(Clone, Copy, Debug)]
pub struct TypedValue {
    pub value: Value,
    /// `None` for unsuffixed integer literals.
    pub ty: Option<KeyType>,
    pub span: Span,
}

impl TypedValue {
    /// Check that the value is representable in `ty`, emitting an error otherwise.
    pub fn fits(&self, ty: KeyType) -> bool {
        if let Some(own) = self.ty {
            if own != ty {
                emit_error!(self.span, "mismatched types\nexpected `{}`, found `{}`", ty, own);
                return false;
            }
        }
        match self.value {
            Value::Integer(value) if ty.is_integer() => {
                let (min, max) = ty.integer_range();
                if (min..=max).contains(&value) {
                    true
                } else {
                    emit_error!(self.span, "literal out of range for `{}`", ty);
                    false
                }
            }
            Value::Bool(_) if ty == KeyType::Bool => true,
            Value::Char(_) if ty == KeyType::Char => true,
            _ => {
                emit_error!(self.span, "mismatched types\nexpected `{}`", ty);
                false
            }
        }
    }
}

/// Look up `T::MIN`/`T::MAX` for primitive `T`.
fn get_constant(path: &str, span: Span) -> Option<TypedValue> {
    let (type_name, constant) = path.split_once("::")?;
    let ty = KeyType::from_name(type_name)?;
    let value = match (ty, constant) {
        (KeyType::Char, "MIN") => Value::Char('\0'),
        (KeyType::Char, "MAX") => Value::Char(char::MAX),
        (KeyType::Bool, _) => return None,
        (_, "MIN") => Value::Integer(ty.integer_range().0),
        (_, "MAX") => Value::Integer(ty.integer_range().1),
        _ => return None,
    };
    Some(TypedValue {
        value,
        ty: Some(ty),
        span,
    })
}

/// Evaluate a key expression, emitting diagnostics on failure.
pub fn evaluate(expr: &syn::Expr) -> Option<TypedValue> {
    let span = expr.span();
    match expr {
        syn::Expr::Lit(expr) => evaluate_literal(&expr.lit, span),

        syn::Expr::Group(syn::ExprGroup { expr, .. })
        | syn::Expr::Paren(syn::ExprParen { expr, .. }) => evaluate(expr),

        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => {
            let argument = evaluate(expr)?;
            let Value::Integer(value) = argument.value else {
                emit_error!(span, "cannot apply unary operator `-` to this key");
                return None;
            };
            if argument.ty.is_some_and(|ty| !ty.is_integer()) {
                emit_error!(span, "cannot apply unary operator `-` to this key");
                return None;
            }
            Some(TypedValue {
                value: Value::Integer(-value),
                ty: argument.ty,
                span,
            })
        }

        syn::Expr::Path(expr) => {
            let path = &expr.path;
            if expr.qself.is_some() || path.segments.iter().any(|segment| !segment.arguments.is_empty()) {
                emit_error!(span, "unsupported path\nonly `MIN` and `MAX` of primitive types are supported");
                return None;
            }
            let path_str = path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join("::");
            get_constant(&path_str, span).or_else(|| {
                emit_error!(
                    span,
                    "unsupported path `{}`\nonly `MIN` and `MAX` of primitive types are supported",
                    path_str,
                );
                None
            })
        }

        syn::Expr::Macro(_) => {
            emit_error!(span, "macros are not allowed in key position");
            None
        }

        _ => {
            emit_error!(
                span,
                "unsupported expression\nkeys must be integer, `bool` or `char` literals",
            );
            None
        }
    }
}

fn evaluate_literal(lit: &syn::Lit, span: Span) -> Option<TypedValue> {
    let (value, ty) = match lit {
        syn::Lit::Int(lit) => {
            let ty = if lit.suffix().is_empty() {
                None
            } else if let Some(ty) = KeyType::from_name(lit.suffix()) {
                Some(ty)
            } else {
                emit_error!(lit, "unsupported integer type `{}`", lit.suffix());
                return None;
            };
            let Ok(value) = lit.base10_parse::<i128>() else {
                emit_error!(lit, "too large integer");
                return None;
            };
            (Value::Integer(value), ty)
        }
        syn::Lit::Byte(lit) => (Value::Integer(lit.value().into()), Some(KeyType::U8)),
        syn::Lit::Bool(lit) => (Value::Bool(lit.value), Some(KeyType::Bool)),
        syn::Lit::Char(lit) => (Value::Char(lit.value()), Some(KeyType::Char)),
        syn::Lit::Float(_) => {
            emit_error!(span, "floating-point numbers cannot be keys");
            return None;
        }
        _ => {
            emit_error!(
                span,
                "unsupported literal\nkeys must be integer, `bool` or `char` literals",
            );
            return None;
        }
    };
    Some(TypedValue { value, ty, span })
}
