use super::values::{KeyType, TypedValue, Value};
use pextmap::{codegen::Codegen, Key};
use proc_macro2::TokenStream;

/// Conversion of an evaluated key into a concrete key type.
trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! from_integer_value {
    ($($ty:ty)*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Integer(value) => value.try_into().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_integer_value!(u8 u16 u32 u64 usize i8 i16 i32 i64 isize);

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(value) => Some(value),
            _ => None,
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Char(value) => Some(value),
            _ => None,
        }
    }
}

pub trait Callback {
    fn call_once<K: Key + Ord + Codegen>(self, keys: Vec<K>) -> TokenStream
    where
        K::Raw: Codegen;
}

fn with_keys_of<K, Cb>(keys: &[TypedValue], cb: Cb) -> Option<TokenStream>
where
    K: Key + Ord + Codegen + FromValue,
    K::Raw: Codegen,
    Cb: Callback,
{
    // Values were range-checked against the key type beforehand.
    let keys: Option<Vec<K>> = keys.iter().map(|key| K::from_value(key.value)).collect();
    Some(cb.call_once(keys?))
}

/// Convert keys to the Rust type matching `key_type` and pass them to `cb`.
///
/// Returns `None` if some key does not fit, in which case no diagnostics are emitted.
pub fn with_typed_keys<Cb: Callback>(
    keys: &[TypedValue],
    key_type: KeyType,
    cb: Cb,
) -> Option<TokenStream> {
    match key_type {
        KeyType::U8 => with_keys_of::<u8, Cb>(keys, cb),
        KeyType::U16 => with_keys_of::<u16, Cb>(keys, cb),
        KeyType::U32 => with_keys_of::<u32, Cb>(keys, cb),
        KeyType::U64 => with_keys_of::<u64, Cb>(keys, cb),
        KeyType::Usize => with_keys_of::<usize, Cb>(keys, cb),
        KeyType::I8 => with_keys_of::<i8, Cb>(keys, cb),
        KeyType::I16 => with_keys_of::<i16, Cb>(keys, cb),
        KeyType::I32 => with_keys_of::<i32, Cb>(keys, cb),
        KeyType::I64 => with_keys_of::<i64, Cb>(keys, cb),
        KeyType::Isize => with_keys_of::<isize, Cb>(keys, cb),
        KeyType::Bool => with_keys_of::<bool, Cb>(keys, cb),
        KeyType::Char => with_keys_of::<char, Cb>(keys, cb),
    }
}
