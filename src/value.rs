use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

use crate::context::{Context, ContextId};
use crate::mapper::ToValue;

/// Text storage shared between values created by the same [`Context`].
///
/// Cloning is cheap and keeps identity; [`Context::deep_copy`] duplicates the storage only when
/// the text originates from another context.
#[derive(Clone)]
pub struct Text {
    origin: ContextId,
    data: Rc<str>,
}

impl Text {
    pub(crate) fn new(origin: ContextId, s: &str) -> Self {
        Self {
            origin,
            data: Rc::from(s),
        }
    }

    /// The context this text was allocated by.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ContextId {
        self.origin
    }

    /// Borrow the text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Returns `true` iff both handles point at the same storage.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str {
        &self.data
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        *self.data == *other.data
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.data, f)
    }
}

/// Byte-string storage shared between values created by the same [`Context`].
#[derive(Clone)]
pub struct Bytes {
    origin: ContextId,
    data: Rc<[u8]>,
}

impl Bytes {
    pub(crate) fn new(origin: ContextId, b: &[u8]) -> Self {
        Self {
            origin,
            data: Rc::from(b),
        }
    }

    /// The context these bytes were allocated by.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ContextId {
        self.origin
    }

    /// Borrow the bytes.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` iff both handles point at the same storage.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        *self.data == *other.data
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h'")?;
        for b in self.data.iter() {
            write!(f, "{b:02x}")?;
        }
        write!(f, "'")
    }
}

/// An ordered sequence of values.
#[derive(Debug, Clone)]
pub struct Array {
    origin: ContextId,
    items: Vec<Value>,
}

impl Array {
    pub(crate) const fn from_vec(origin: ContextId, items: Vec<Value>) -> Self {
        Self { origin, items }
    }

    /// The context this array was allocated by.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ContextId {
        self.origin
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the array has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an element.
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Mutable element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Iterate mutably over the elements in order.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Borrow the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = core::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// An ordered list of key/value pairs.
///
/// This is not a hash index: insertion order is preserved, duplicate keys are representable, and
/// lookups are linear scans returning the first equal key.
#[derive(Debug, Clone)]
pub struct Map {
    origin: ContextId,
    entries: Vec<(Value, Value)>,
}

impl Map {
    pub(crate) const fn from_vec(origin: ContextId, entries: Vec<(Value, Value)>) -> Self {
        Self { origin, entries }
    }

    /// The context this map was allocated by.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> ContextId {
        self.origin
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry without checking for an existing equal key.
    pub fn push(&mut self, key: Value, value: Value) {
        self.entries.push((key, value));
    }

    /// Insert an entry at `index`, shifting later entries.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, key: Value, value: Value) {
        self.entries.insert(index, (key, value));
    }

    /// Value of the first entry whose key equals `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value of the first entry whose key is the text `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Mutable slot for `key`, appending an `Undefined` entry if absent.
    pub fn require<K: ToValue + ?Sized>(&mut self, ctx: &Context, key: &K) -> &mut Value {
        let key = key.to_value(ctx);
        let idx = if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            idx
        } else {
            self.entries.push((key, Value::Undefined));
            self.entries.len() - 1
        };
        &mut self.entries[idx].1
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate over the entries, with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Value, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Borrow the entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(Value, Value)] {
        &self.entries
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// The scalar/container category of a value, as used to discriminate untagged union variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// `Undefined` or `Null`.
    Nothing,
    /// `Bool`.
    Boolean,
    /// `Positive` or `Negative`.
    Integral,
    /// `Half`, `Single`, or `Double`.
    Floating,
    /// `Text`.
    Text,
    /// `Bytes`.
    Binary,
    /// `Array`.
    Array,
    /// `Map`.
    Map,
}

/// Every item the codec can decode.
///
/// `Positive(n)` is the integer `n`; `Negative(n)` is `-1 - n`. Together they cover
/// `[-2^64, 2^64 - 1]`, which exceeds `i64`; see [`Value::is_overflowed_integer`].
#[derive(Debug, Clone)]
pub enum Value {
    /// The CBOR `undefined` simple value.
    Undefined,
    /// The CBOR `null` simple value.
    Null,
    /// `false` or `true`.
    Bool(bool),
    /// Unsigned integer (major type 0).
    Positive(u64),
    /// Negative integer `-1 - n` (major type 1).
    Negative(u64),
    /// Half-precision float bit pattern.
    Half(u16),
    /// Single-precision float.
    Single(f32),
    /// Double-precision float.
    Double(f64),
    /// UTF-8 text string.
    Text(Text),
    /// Byte string.
    Bytes(Bytes),
    /// Array of values.
    Array(Array),
    /// Ordered map of key/value pairs.
    Map(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Undefined
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Positive(a), Self::Positive(b)) | (Self::Negative(a), Self::Negative(b)) => {
                a == b
            }
            (Self::Half(a), Self::Half(b)) => a == b,
            (Self::Single(a), Self::Single(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// The category of this value.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Undefined | Self::Null => Category::Nothing,
            Self::Bool(_) => Category::Boolean,
            Self::Positive(_) | Self::Negative(_) => Category::Integral,
            Self::Half(_) | Self::Single(_) | Self::Double(_) => Category::Floating,
            Self::Text(_) => Category::Text,
            Self::Bytes(_) => Category::Binary,
            Self::Array(_) => Category::Array,
            Self::Map(_) => Category::Map,
        }
    }

    /// The context that allocated this value's storage, if it has any.
    ///
    /// Scalars carry no storage and return `None`.
    #[must_use]
    pub const fn origin(&self) -> Option<ContextId> {
        match self {
            Self::Text(t) => Some(t.origin()),
            Self::Bytes(b) => Some(b.origin()),
            Self::Array(a) => Some(a.origin()),
            Self::Map(m) => Some(m.origin()),
            _ => None,
        }
    }

    /// Returns `true` for `Undefined`.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Positive` and `Negative`.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Positive(_) | Self::Negative(_))
    }

    /// Returns `true` for any float width.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Half(_) | Self::Single(_) | Self::Double(_))
    }

    /// Returns `true` when the integer magnitude does not fit `i64`.
    ///
    /// For `Positive(n)` that is `n > i64::MAX`; for `Negative(n)` the value `-1 - n` is below
    /// `i64::MIN` exactly when `n > i64::MAX`. Non-integers are never overflowed.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn is_overflowed_integer(&self) -> bool {
        match self {
            Self::Positive(n) | Self::Negative(n) => *n > i64::MAX as u64,
            _ => false,
        }
    }

    /// The boolean, if this is `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer as `i64`, if it is one and fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Positive(n) => i64::try_from(*n).ok(),
            Self::Negative(n) => i64::try_from(*n).ok().map(|n| -1 - n),
            _ => None,
        }
    }

    /// The integer as `u64`, if it is non-negative.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Positive(n) => Some(*n),
            _ => None,
        }
    }

    /// The float widened to `f64`, if this is any float width.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Half(h) => Some(crate::half::half_to_f64(*h)),
            Self::Single(f) => Some(f64::from(*f)),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The text, if this is `Text`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// The bytes, if this is `Bytes`.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// The array, if this is `Array`.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The mutable array, if this is `Array`.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The map, if this is `Map`.
    #[must_use]
    pub const fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The mutable map, if this is `Map`.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable slot for `key` in this map, appending an `Undefined` entry if absent.
    ///
    /// **Destructive:** if `self` is not a map it is replaced by a new empty map allocated by
    /// `ctx`, discarding the previous value.
    pub fn require<K: ToValue + ?Sized>(&mut self, ctx: &Context, key: &K) -> &mut Self {
        if !matches!(self, Self::Map(_)) {
            *self = ctx.empty_map();
        }
        match self {
            Self::Map(map) => map.require(ctx, key),
            _ => unreachable!("non-map receiver was replaced above"),
        }
    }

    /// Encode this value; shorthand for [`build`](crate::build).
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::encode::build(self)
    }

    /// SHA-256 digest of this value's encoding.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    #[must_use]
    pub fn sha256(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(self.to_bytes());
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowed_integers() {
        assert!(!Value::Positive(i64::MAX as u64).is_overflowed_integer());
        assert!(Value::Positive(i64::MAX as u64 + 1).is_overflowed_integer());
        assert!(!Value::Negative(i64::MAX as u64).is_overflowed_integer());
        assert!(Value::Negative(u64::MAX).is_overflowed_integer());
        assert!(!Value::Double(1e300).is_overflowed_integer());
    }

    #[test]
    fn negative_as_i64() {
        assert_eq!(Value::Negative(0).as_i64(), Some(-1));
        assert_eq!(Value::Negative(99).as_i64(), Some(-100));
        assert_eq!(Value::Negative(i64::MAX as u64).as_i64(), Some(i64::MIN));
        assert_eq!(Value::Negative(u64::MAX).as_i64(), None);
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Single(1.0), Value::Double(1.0));
    }

    #[test]
    fn require_replaces_non_map() {
        let ctx = Context::new();
        let mut v = Value::Positive(5);
        *v.require(&ctx, "a") = Value::Bool(true);
        let map = v.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_str("a"), Some(&Value::Bool(true)));
        assert_eq!(map.origin(), ctx.id());
    }

    #[test]
    fn require_reuses_existing_slot() {
        let ctx = Context::new();
        let mut v = ctx.empty_map();
        *v.require(&ctx, "a") = Value::Positive(1);
        *v.require(&ctx, "b") = Value::Positive(2);
        *v.require(&ctx, "a") = Value::Positive(3);
        let map = v.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_str("a"), Some(&Value::Positive(3)));
        assert!(v.require(&ctx, "c").is_undefined());
    }
}
