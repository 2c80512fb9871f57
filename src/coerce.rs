//! Best-effort conversion from a [`Value`] to native types.
//!
//! Unlike [`FromValue`](crate::FromValue), coercion never fails: [`Value::get_or`] returns the
//! caller's default for any unsupported pairing. Conversions are deliberately lossy (integers and
//! floats cast with `as`, text parsed, bit patterns reinterpreted).

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::half::half_to_f64;
use crate::value::Value;

/// A native type reachable from any [`Value`] through the coercion matrix.
pub trait Coerce: Sized {
    /// Convert `value`, or `None` where the matrix has no rule for this pairing.
    fn coerce(value: &Value) -> Option<Self>;
}

impl Value {
    /// Coerce into `T`, falling back to `default` when no rule applies.
    pub fn get_or<T: Coerce>(&self, default: T) -> T {
        T::coerce(self).unwrap_or(default)
    }

    /// Coerce into `T`, or `None` where [`Value::get_or`] would return its default.
    #[must_use]
    pub fn try_get<T: Coerce>(&self) -> Option<T> {
        T::coerce(self)
    }
}

fn float_of(value: &Value) -> Option<f64> {
    match value {
        Value::Half(h) => Some(half_to_f64(*h)),
        Value::Single(f) => Some(f64::from(*f)),
        Value::Double(d) => Some(*d),
        _ => None,
    }
}

macro_rules! coerce_int {
    ($($t:ty),* $(,)?) => {$(
        impl Coerce for $t {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_possible_wrap,
                clippy::cast_sign_loss,
                clippy::cast_lossless
            )]
            fn coerce(value: &Value) -> Option<Self> {
                match value {
                    Value::Positive(n) => Some(*n as $t),
                    // -1 - n in two's complement is !n.
                    Value::Negative(n) => Some((!*n) as i64 as $t),
                    Value::Bool(b) => Some(<$t>::from(*b)),
                    Value::Text(t) => t.trim().parse().ok(),
                    other => float_of(other).map(|f| f as $t),
                }
            }
        }
    )*};
}

coerce_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! coerce_float {
    ($($t:ty),* $(,)?) => {$(
        impl Coerce for $t {
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            fn coerce(value: &Value) -> Option<Self> {
                match value {
                    Value::Positive(n) => Some(*n as $t),
                    Value::Negative(n) => Some((-1.0 - *n as f64) as $t),
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    Value::Text(t) => t.trim().parse().ok(),
                    other => float_of(other).map(|f| f as $t),
                }
            }
        }
    )*};
}

coerce_float!(f32, f64);

impl Coerce for bool {
    fn coerce(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Positive(n) => *n != 0,
            Value::Negative(_) => true,
            Value::Half(h) => h & 0x7fff != 0,
            Value::Single(f) => *f != 0.0,
            Value::Double(d) => *d != 0.0,
            Value::Text(t) => !t.is_empty(),
            Value::Bytes(b) => !b.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Map(m) => !m.is_empty(),
        })
    }
}

impl Coerce for String {
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Text(t) => Some(t.as_str().to_string()),
            Value::Positive(n) => Some(n.to_string()),
            Value::Negative(n) => Some((-1_i128 - i128::from(*n)).to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => Some("null".to_string()),
            Value::Single(f) => Some(f.to_string()),
            other => float_of(other).map(|f| f.to_string()),
        }
    }
}

impl Coerce for Vec<u8> {
    #[allow(clippy::cast_possible_wrap)]
    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.to_vec()),
            Value::Text(t) => Some(t.as_bytes().to_vec()),
            Value::Positive(n) => Some(n.to_ne_bytes().to_vec()),
            Value::Negative(n) => Some(((!*n) as i64).to_ne_bytes().to_vec()),
            Value::Half(h) => Some(h.to_ne_bytes().to_vec()),
            Value::Single(f) => Some(f.to_ne_bytes().to_vec()),
            Value::Double(d) => Some(d.to_ne_bytes().to_vec()),
            _ => None,
        }
    }
}

impl Coerce for Value {
    fn coerce(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;

    #[test]
    fn integers_from_everything_numeric() {
        let ctx = Context::new();
        assert_eq!(Value::Positive(300).get_or(0_i64), 300);
        assert_eq!(Value::Negative(99).get_or(0_i32), -100);
        assert_eq!(Value::Double(3.9).get_or(0_u8), 3);
        assert_eq!(Value::Half(0x4000).get_or(0_i16), 2);
        assert_eq!(Value::Bool(true).get_or(0_u32), 1);
        assert_eq!(ctx.text(" 42 ").get_or(0_i64), 42);
        assert_eq!(ctx.text("nope").get_or(7_i64), 7);
        assert_eq!(Value::Null.get_or(-5_i64), -5);
        assert_eq!(ctx.empty_array().get_or(9_u8), 9);
    }

    #[test]
    fn integer_casts_are_lossy() {
        assert_eq!(Value::Positive(256).get_or(0_u8), 0);
        assert_eq!(Value::Negative(0).get_or(0_u64), u64::MAX);
        assert_eq!(Value::Double(-1e300).get_or(0_i32), i32::MIN);
    }

    #[test]
    fn floats() {
        let ctx = Context::new();
        assert_eq!(Value::Negative(0).get_or(0.0_f64), -1.0);
        assert_eq!(Value::Single(0.5).get_or(0.0_f64), 0.5);
        assert_eq!(ctx.text("2.5").get_or(0.0_f32), 2.5);
        assert_eq!(ctx.bytes(&[1]).get_or(1.25_f64), 1.25);
    }

    #[test]
    fn truthiness() {
        let ctx = Context::new();
        assert!(!Value::Undefined.get_or(true));
        assert!(!Value::Positive(0).get_or(true));
        assert!(Value::Negative(0).get_or(false));
        assert!(!Value::Half(0x8000).get_or(true));
        assert!(!ctx.text("").get_or(true));
        assert!(ctx.bytes(&[0]).get_or(false));
        assert!(!ctx.empty_map().get_or(true));
    }

    #[test]
    fn strings() {
        let ctx = Context::new();
        assert_eq!(Value::Negative(u64::MAX).get_or(String::new()), "-18446744073709551616");
        assert_eq!(Value::Bool(false).get_or(String::new()), "false");
        assert_eq!(Value::Null.get_or(String::new()), "null");
        assert_eq!(Value::Double(1.5).get_or(String::new()), "1.5");
        assert_eq!(ctx.bytes(b"x").get_or(String::from("d")), "d");
        assert_eq!(Value::Undefined.try_get::<String>(), None);
    }

    #[test]
    fn binary_reinterprets_bit_patterns() {
        let ctx = Context::new();
        assert_eq!(
            Value::Positive(1).get_or(Vec::new()),
            1_u64.to_ne_bytes().to_vec()
        );
        assert_eq!(
            Value::Negative(0).get_or(Vec::new()),
            (-1_i64).to_ne_bytes().to_vec()
        );
        assert_eq!(
            Value::Double(1.0).get_or(Vec::new()),
            1.0_f64.to_ne_bytes().to_vec()
        );
        assert_eq!(ctx.text("ab").get_or(Vec::new()), b"ab".to_vec());
        assert_eq!(Value::Null.get_or(vec![9_u8]), vec![9]);
    }
}
