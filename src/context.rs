use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::limits::ParseLimits;
use crate::mapper::ToValue;
use crate::value::{Array, Bytes, Map, Text, Value};
use crate::CborError;

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Process-unique identity of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

/// Allocation and identity scope for values.
///
/// Every string, byte string, array and map is created through a context and records its id.
/// Values from different contexts are foreign to each other; [`Context::deep_copy`] is the only
/// way to bring a value into this context. A context is meant to live for one encode, decode, or
/// mapping session and is not shared between threads.
#[derive(Debug)]
pub struct Context {
    id: ContextId,
    // Values hold `Rc` storage; keep contexts on the thread that owns those values.
    _not_send: core::marker::PhantomData<*const ()>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
            _not_send: core::marker::PhantomData,
        }
    }

    /// This context's identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }

    /// Convert a native value (scalar, slice, container, or mapped record) into a [`Value`].
    pub fn make<T: ToValue + ?Sized>(&self, value: &T) -> Value {
        value.to_value(self)
    }

    /// Allocate a text value.
    #[must_use]
    pub fn text(&self, s: &str) -> Value {
        Value::Text(Text::new(self.id, s))
    }

    /// Allocate a byte-string value.
    #[must_use]
    pub fn bytes(&self, b: &[u8]) -> Value {
        Value::Bytes(Bytes::new(self.id, b))
    }

    /// A new empty array value.
    #[must_use]
    pub fn empty_array(&self) -> Value {
        Value::Array(self.array_with_capacity(0))
    }

    /// A new empty map value.
    #[must_use]
    pub fn empty_map(&self) -> Value {
        Value::Map(self.map_with_capacity(0))
    }

    /// A new empty array with room for `capacity` elements.
    #[must_use]
    pub fn array_with_capacity(&self, capacity: usize) -> Array {
        Array::from_vec(self.id, Vec::with_capacity(capacity))
    }

    /// A new empty map with room for `capacity` entries.
    #[must_use]
    pub fn map_with_capacity(&self, capacity: usize) -> Map {
        Map::from_vec(self.id, Vec::with_capacity(capacity))
    }

    /// The `null` value.
    #[must_use]
    pub const fn null_value(&self) -> Value {
        Value::Null
    }

    /// The `undefined` value.
    #[must_use]
    pub const fn undefined_value(&self) -> Value {
        Value::Undefined
    }

    /// Parse the first item in `bytes`, returning it and the number of bytes it occupied.
    ///
    /// A consumed count of `0` is the failure sentinel and comes with `Value::Undefined`. It is
    /// returned both for malformed, truncated, or unsupported input **and** for empty input;
    /// callers iterating over a buffer must tell "finished" from "malformed" by the remaining
    /// length themselves, or use [`Context::try_parse`].
    pub fn parse(&self, bytes: &[u8]) -> (Value, usize) {
        self.parse_with_limits(bytes, ParseLimits::default())
    }

    /// [`Context::parse`] with explicit resource limits.
    pub fn parse_with_limits(&self, bytes: &[u8], limits: ParseLimits) -> (Value, usize) {
        match crate::parse::parse_item(self, bytes, limits) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::trace!("cbor parse stopped: {err}");
                (Value::Undefined, 0)
            }
        }
    }

    /// Parse the first item in `bytes` with default limits, reporting why parsing failed.
    ///
    /// # Errors
    ///
    /// Returns a decode error with the offset of the offending head byte.
    pub fn try_parse(&self, bytes: &[u8]) -> Result<(Value, usize), CborError> {
        crate::parse::parse_item(self, bytes, ParseLimits::default())
    }

    /// Returns `true` if every piece of storage inside `value` was allocated by this context.
    #[must_use]
    pub fn owns(&self, value: &Value) -> bool {
        match value {
            Value::Text(t) => t.origin() == self.id,
            Value::Bytes(b) => b.origin() == self.id,
            Value::Array(a) => a.origin() == self.id && a.iter().all(|v| self.owns(v)),
            Value::Map(m) => {
                m.origin() == self.id && m.iter().all(|(k, v)| self.owns(k) && self.owns(v))
            }
            _ => true,
        }
    }

    /// Copy `value` into this context.
    ///
    /// Text and byte storage already owned by this context is shared, so identity is preserved;
    /// foreign storage is duplicated. Arrays and maps are always rebuilt, which makes every copy
    /// independently mutable.
    #[must_use]
    pub fn deep_copy(&self, value: &Value) -> Value {
        match value {
            Value::Text(t) if t.origin() == self.id => Value::Text(t.clone()),
            Value::Text(t) => self.text(t.as_str()),
            Value::Bytes(b) if b.origin() == self.id => Value::Bytes(b.clone()),
            Value::Bytes(b) => self.bytes(b.as_slice()),
            Value::Array(a) => {
                let mut out = self.array_with_capacity(a.len());
                for item in a {
                    out.push(self.deep_copy(item));
                }
                Value::Array(out)
            }
            Value::Map(m) => {
                let mut out = self.map_with_capacity(m.len());
                for (k, v) in m.iter() {
                    out.push(self.deep_copy(k), self.deep_copy(v));
                }
                Value::Map(out)
            }
            scalar => scalar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_have_distinct_ids() {
        let a = Context::new();
        let b = Context::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn deep_copy_same_context_shares_storage() {
        let ctx = Context::new();
        let v = ctx.text("shared");
        let copy = ctx.deep_copy(&v);
        match (&v, &copy) {
            (Value::Text(a), Value::Text(b)) => assert!(a.ptr_eq(b)),
            _ => panic!("expected text"),
        }
    }

    #[test]
    fn deep_copy_foreign_duplicates_storage() {
        let src = Context::new();
        let dst = Context::new();
        let v = src.bytes(&[1, 2, 3]);
        let copy = dst.deep_copy(&v);
        assert_eq!(v, copy);
        assert!(dst.owns(&copy));
        assert!(!dst.owns(&v));
        match (&v, &copy) {
            (Value::Bytes(a), Value::Bytes(b)) => assert!(!a.ptr_eq(b)),
            _ => panic!("expected bytes"),
        }
    }

    #[test]
    fn deep_copy_rehomes_nested_containers() {
        let src = Context::new();
        let dst = Context::new();
        let mut v = src.empty_map();
        *v.require(&src, "list") = src.make(&["a", "b"][..]);
        let copy = dst.deep_copy(&v);
        assert_eq!(copy, v);
        assert!(dst.owns(&copy));
    }

    #[test]
    fn parse_failure_is_zero_sentinel() {
        let ctx = Context::new();
        assert_eq!(ctx.parse(&[]), (Value::Undefined, 0));
        assert_eq!(ctx.parse(&[0x1c]), (Value::Undefined, 0));
    }
}
