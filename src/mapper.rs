//! Mapping between native Rust values and [`Value`].
//!
//! [`ToValue`] and [`FromValue`] are implemented here for scalars, strings, byte buffers,
//! sequences, and associative containers; `#[derive(ToValue, FromValue)]` generates them for
//! records and kind-tagged unions. The mapper never sees encoded bytes.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::context::Context;
use crate::value::Value;
use crate::{CborError, ErrorCode};

/// Default map key carrying a union variant's kind tag.
pub const DEFAULT_KIND_KEY: &str = "$type";

/// Convert a native value into a [`Value`] allocated by `ctx`.
pub trait ToValue {
    /// Build the value representation of `self`.
    fn to_value(&self, ctx: &Context) -> Value;
}

/// Reconstruct a native value from a [`Value`].
pub trait FromValue: Sized {
    /// Map `value` into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Map`](crate::ErrorKind::Map) error if `value` has the wrong shape,
    /// a required field is missing, or no union variant matches.
    fn from_value(value: &Value) -> Result<Self, CborError>;
}

/// Marker trait for values that map to array elements.
///
/// `u8` is deliberately absent so that `Vec<u8>` and `[u8]` map to byte strings.
pub trait ArrayElem {}

/// Discriminator metadata for a record that can appear as a union variant.
///
/// Record variants of one union must carry distinct tags. Either derive rejects a clash:
///
/// ```compile_fail
/// use cbor_kit::{FromValue, ToValue};
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same")]
/// struct A { a: u8 }
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same")]
/// struct B { b: u8 }
///
/// #[derive(FromValue)]
/// enum DecodeOnly { A(A), B(B) }
/// ```
///
/// ```compile_fail
/// use cbor_kit::{FromValue, ToValue};
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same")]
/// struct A { a: u8 }
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same")]
/// struct B { b: u8 }
///
/// #[derive(ToValue)]
/// enum EncodeOnly { A(A), B(B) }
/// ```
///
/// The same tag under different keys is no clash, and neither are scalar variants, which are
/// told apart by category. At most one variant may map to each category:
///
/// ```
/// use cbor_kit::{FromValue, ToValue};
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same")]
/// struct A { a: u8 }
///
/// #[derive(Default, ToValue, FromValue)]
/// #[cbor(kind = "same", kind_key = "tag")]
/// struct B { b: u8 }
///
/// #[derive(ToValue, FromValue)]
/// enum Fine { A(A), B(B), N(i64), L(Vec<String>) }
/// ```
///
/// ```compile_fail
/// use cbor_kit::{FromValue, ToValue};
///
/// #[derive(ToValue, FromValue)]
/// enum TwoIntegers { Small(u8), Wide(i64) }
/// ```
///
/// ```compile_fail
/// use cbor_kit::{FromValue, ToValue};
///
/// #[derive(ToValue, FromValue)]
/// enum TwoArrays { Names(Vec<String>), Counts(Vec<u32>) }
/// ```
pub trait Kind {
    /// Map key holding the tag, normally [`DEFAULT_KIND_KEY`].
    const KIND_KEY: &'static str;
    /// Tag value identifying this record.
    const KIND: &'static str;
}

/// Which converter a field uses in place of its default mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    /// [`StringConverter`].
    String,
    /// [`BinaryConverter`].
    Binary,
    /// [`ValueConverter`].
    Value,
}

/// Mapping metadata of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field identifier in the Rust type.
    pub name: &'static str,
    /// Map key used on the wire (the rename, if any).
    pub key: &'static str,
    /// Never written, never read.
    pub skip: bool,
    /// Omitted when its skip predicate holds for the current value.
    pub skip_if: bool,
    /// Decoding fails if the key is absent.
    pub required: bool,
    /// Converter overriding the default mapping.
    pub converter: Option<ConverterKind>,
}

/// A record with a derived field-descriptor table, in declaration order.
pub trait Record {
    /// Descriptors of every named field, including skipped ones.
    const FIELDS: &'static [FieldInfo];
}

/// Field converter through text.
pub trait StringConverter<T> {
    /// Render `value` as text.
    fn to_string(value: &T) -> String;
    /// Parse text back into `T`.
    ///
    /// # Errors
    ///
    /// Typically [`ErrorCode::ConversionFailed`].
    fn from_string(s: &str) -> Result<T, CborError>;
}

/// Field converter through a byte string.
pub trait BinaryConverter<T> {
    /// Render `value` as bytes.
    fn to_binary(value: &T) -> Vec<u8>;
    /// Parse bytes back into `T`.
    ///
    /// # Errors
    ///
    /// Typically [`ErrorCode::ConversionFailed`].
    fn from_binary(bytes: &[u8]) -> Result<T, CborError>;
}

/// Field converter producing an arbitrary [`Value`].
pub trait ValueConverter<T> {
    /// Build the value representation of `value`.
    fn to_value(value: &T, ctx: &Context) -> Value;
    /// Map a value back into `T`.
    ///
    /// # Errors
    ///
    /// Any mapping error.
    fn from_value(value: &Value) -> Result<T, CborError>;
}

/// A map represented as ordered key/value entries.
///
/// Unlike `BTreeMap`/`HashMap`, this keeps the source order and tolerates duplicate keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapEntries<K, V>(pub Vec<(K, V)>);

impl<K, V> MapEntries<K, V> {
    /// Wrap an existing vector of entries.
    #[must_use]
    pub const fn new(entries: Vec<(K, V)>) -> Self {
        Self(entries)
    }
}

/// Serialize `value` into a [`Value`] allocated by `ctx`.
pub fn serialize<T: ToValue + ?Sized>(ctx: &Context, value: &T) -> Value {
    value.to_value(ctx)
}

/// Deserialize a `T` from `value`.
///
/// # Errors
///
/// See [`FromValue::from_value`].
pub fn deserialize<T: FromValue>(value: &Value) -> Result<T, CborError> {
    T::from_value(value)
}

/// Serialize `value` and encode it in one step.
pub fn to_vec<T: ToValue + ?Sized>(value: &T) -> Vec<u8> {
    let ctx = Context::new();
    crate::encode::build(&value.to_value(&ctx))
}

/// Parse exactly one item from `bytes` and deserialize a `T` from it.
///
/// # Errors
///
/// Returns a decode error if the bytes are malformed or followed by trailing bytes, or a mapping
/// error from [`FromValue::from_value`].
pub fn from_slice<T: FromValue>(bytes: &[u8]) -> Result<T, CborError> {
    let ctx = Context::new();
    let (value, used) = ctx.try_parse(bytes)?;
    if used != bytes.len() {
        return Err(CborError::decode(ErrorCode::TrailingBytes, used));
    }
    T::from_value(&value)
}

fn int_value(v: i64) -> Value {
    if v >= 0 {
        Value::Positive(v.unsigned_abs())
    } else {
        Value::Negative(v.unsigned_abs() - 1)
    }
}

fn signed_of(value: &Value) -> Result<i64, CborError> {
    match value {
        Value::Positive(n) => {
            i64::try_from(*n).map_err(|_| CborError::mapping(ErrorCode::IntegerOutOfRange))
        }
        Value::Negative(n) => i64::try_from(*n)
            .map(|n| -1 - n)
            .map_err(|_| CborError::mapping(ErrorCode::IntegerOutOfRange)),
        _ => Err(CborError::mapping(ErrorCode::ExpectedInteger)),
    }
}

impl ToValue for () {
    fn to_value(&self, _ctx: &Context) -> Value {
        Value::Null
    }
}

impl FromValue for () {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        match value {
            Value::Null | Value::Undefined => Ok(()),
            _ => Err(CborError::mapping(ErrorCode::ExpectedNull)),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self, _ctx: &Context) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        value
            .as_bool()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedBool))
    }
}

macro_rules! map_signed {
    ($($t:ty),* $(,)?) => {$(
        impl ToValue for $t {
            #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
            fn to_value(&self, _ctx: &Context) -> Value {
                int_value(*self as i64)
            }
        }

        impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self, CborError> {
                let v = signed_of(value)?;
                <$t>::try_from(v).map_err(|_| CborError::mapping(ErrorCode::IntegerOutOfRange))
            }
        }

        impl ArrayElem for $t {}
    )*};
}

map_signed!(i8, i16, i32, i64, isize);

macro_rules! map_unsigned {
    ($($t:ty),* $(,)?) => {$(
        impl ToValue for $t {
            #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
            fn to_value(&self, _ctx: &Context) -> Value {
                Value::Positive(*self as u64)
            }
        }

        impl FromValue for $t {
            fn from_value(value: &Value) -> Result<Self, CborError> {
                match value {
                    Value::Positive(n) => <$t>::try_from(*n)
                        .map_err(|_| CborError::mapping(ErrorCode::IntegerOutOfRange)),
                    Value::Negative(_) => Err(CborError::mapping(ErrorCode::IntegerOutOfRange)),
                    _ => Err(CborError::mapping(ErrorCode::ExpectedInteger)),
                }
            }
        }
    )*};
}

map_unsigned!(u8, u16, u32, u64, usize);

impl ArrayElem for u16 {}
impl ArrayElem for u32 {}
impl ArrayElem for u64 {}
impl ArrayElem for usize {}

impl ToValue for f32 {
    fn to_value(&self, _ctx: &Context) -> Value {
        Value::Single(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self, _ctx: &Context) -> Value {
        Value::Double(*self)
    }
}

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Result<Self, CborError> {
        match value {
            Value::Positive(n) => Ok(*n as Self),
            Value::Negative(n) => Ok(-1.0 - *n as Self),
            other => other
                .as_f64()
                .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedFloat)),
        }
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Result<Self, CborError> {
        match value {
            Value::Single(f) => Ok(*f),
            Value::Half(h) => Ok(crate::half::half_to_f32(*h)),
            other => f64::from_value(other).map(|d| d as Self),
        }
    }
}

impl ArrayElem for f32 {}
impl ArrayElem for f64 {}
impl ArrayElem for bool {}

impl ToValue for str {
    fn to_value(&self, ctx: &Context) -> Value {
        ctx.text(self)
    }
}

impl ToValue for String {
    fn to_value(&self, ctx: &Context) -> Value {
        ctx.text(self)
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedText))
    }
}

impl ArrayElem for str {}
impl ArrayElem for String {}

impl ToValue for [u8] {
    fn to_value(&self, ctx: &Context) -> Value {
        ctx.bytes(self)
    }
}

impl ToValue for Vec<u8> {
    fn to_value(&self, ctx: &Context) -> Value {
        ctx.bytes(self)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedBytes))
    }
}

impl ArrayElem for Vec<u8> {}

impl<T: ToValue + ArrayElem> ToValue for [T] {
    fn to_value(&self, ctx: &Context) -> Value {
        let mut out = ctx.array_with_capacity(self.len());
        for item in self {
            out.push(item.to_value(ctx));
        }
        Value::Array(out)
    }
}

impl<T: ToValue + ArrayElem> ToValue for Vec<T> {
    fn to_value(&self, ctx: &Context) -> Value {
        self.as_slice().to_value(ctx)
    }
}

impl<T: FromValue + ArrayElem> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        let array = value
            .as_array()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedArray))?;
        array.iter().map(T::from_value).collect()
    }
}

impl<T: ArrayElem> ArrayElem for Vec<T> {}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self, ctx: &Context) -> Value {
        match self {
            Some(v) => v.to_value(ctx),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        match value {
            Value::Null | Value::Undefined => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: ArrayElem> ArrayElem for Option<T> {}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self, ctx: &Context) -> Value {
        (**self).to_value(ctx)
    }
}

impl<T: ArrayElem + ?Sized> ArrayElem for &T {}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self, ctx: &Context) -> Value {
        (**self).to_value(ctx)
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: ArrayElem + ?Sized> ArrayElem for Box<T> {}

impl<K: ToValue, V: ToValue> ToValue for MapEntries<K, V> {
    fn to_value(&self, ctx: &Context) -> Value {
        let mut out = ctx.map_with_capacity(self.0.len());
        for (k, v) in &self.0 {
            out.push(k.to_value(ctx), v.to_value(ctx));
        }
        Value::Map(out)
    }
}

impl<K: FromValue, V: FromValue> FromValue for MapEntries<K, V> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        let map = value
            .as_map()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedMap))?;
        map.iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<K, V> ArrayElem for MapEntries<K, V> {}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self, ctx: &Context) -> Value {
        let mut out = ctx.map_with_capacity(self.len());
        for (k, v) in self {
            out.push(k.to_value(ctx), v.to_value(ctx));
        }
        Value::Map(out)
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        let map = value
            .as_map()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedMap))?;
        map.iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

impl<K, V> ArrayElem for BTreeMap<K, V> {}

#[cfg(feature = "std")]
impl<K: ToValue, V: ToValue, S> ToValue for std::collections::HashMap<K, V, S> {
    fn to_value(&self, ctx: &Context) -> Value {
        let mut out = ctx.map_with_capacity(self.len());
        for (k, v) in self {
            out.push(k.to_value(ctx), v.to_value(ctx));
        }
        Value::Map(out)
    }
}

#[cfg(feature = "std")]
impl<K, V, S> FromValue for std::collections::HashMap<K, V, S>
where
    K: FromValue + Eq + core::hash::Hash,
    V: FromValue,
    S: core::hash::BuildHasher + Default,
{
    fn from_value(value: &Value) -> Result<Self, CborError> {
        let map = value
            .as_map()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedMap))?;
        map.iter()
            .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
            .collect()
    }
}

#[cfg(feature = "std")]
impl<K, V, S> ArrayElem for std::collections::HashMap<K, V, S> {}

impl ToValue for Value {
    fn to_value(&self, ctx: &Context) -> Value {
        ctx.deep_copy(self)
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CborError> {
        Ok(value.clone())
    }
}

impl ArrayElem for Value {}

/// Support code for `#[derive(ToValue, FromValue)]`. Not public API.
#[doc(hidden)]
pub mod __private {
    use super::{CborError, ErrorCode};
    use crate::context::Context;
    use crate::value::{Array, Map, Value};

    pub const fn str_eq(a: &str, b: &str) -> bool {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        if a.len() != b.len() {
            return false;
        }
        let mut i = 0;
        while i < a.len() {
            if a[i] != b[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    pub const fn same_kind(key_a: &str, kind_a: &str, key_b: &str, kind_b: &str) -> bool {
        str_eq(key_a, key_b) && str_eq(kind_a, kind_b)
    }

    /// Put `key => kind` in front of a record's entries.
    pub fn prefix_kind(ctx: &Context, value: &mut Value, key: &str, kind: &str) {
        if let Value::Map(map) = value {
            map.insert(0, ctx.text(key), ctx.text(kind));
        }
    }

    pub fn has_kind(map: &Map, key: &str, kind: &str) -> bool {
        map.iter()
            .any(|(k, v)| k.as_str() == Some(key) && v.as_str() == Some(kind))
    }

    pub fn expect_map(value: &Value) -> Result<&Map, CborError> {
        value
            .as_map()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedMap))
    }

    pub fn expect_array(value: &Value, len: usize) -> Result<&Array, CborError> {
        let array = value
            .as_array()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedArray))?;
        if array.len() != len {
            return Err(CborError::mapping(ErrorCode::LengthMismatch));
        }
        Ok(array)
    }

    pub fn expect_text(value: &Value) -> Result<&str, CborError> {
        value
            .as_str()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedText))
    }

    pub fn expect_bytes(value: &Value) -> Result<&[u8], CborError> {
        value
            .as_bytes()
            .ok_or_else(|| CborError::mapping(ErrorCode::ExpectedBytes))
    }

    pub fn missing_field(ty: &'static str, key: &'static str) -> CborError {
        log::debug!("`{ty}` is missing required field `{key}`");
        CborError::mapping(ErrorCode::MissingRequiredField).with_key(key)
    }

    pub fn unresolvable_union(ty: &'static str) -> CborError {
        log::debug!("no variant of `{ty}` matches the value");
        CborError::mapping(ErrorCode::UnresolvableUnionVariant)
    }

    pub fn unknown_variant(ty: &'static str, name: &str) -> CborError {
        log::debug!("`{name}` is not a variant of `{ty}`");
        CborError::mapping(ErrorCode::UnknownVariant)
    }
}
