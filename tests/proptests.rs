// Property-based tests for parse/build roundtrips.
//
// Sizes and depths stay small to keep CI fast.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;

use cbor_kit::{build, from_slice, to_vec, Context, Value};

fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..24).prop_map(|chars| chars.into_iter().collect())
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<u64>().prop_map(Value::Positive),
        any::<u64>().prop_map(Value::Negative),
        any::<u16>().prop_map(Value::Half),
        any::<f32>().prop_map(Value::Single),
        any::<f64>().prop_map(Value::Double),
        arb_text().prop_map(|s| Context::new().text(&s)),
        proptest::collection::vec(any::<u8>(), 0..64).prop_map(|b| Context::new().bytes(&b)),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 256, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(|items| {
                let ctx = Context::new();
                let mut a = ctx.array_with_capacity(items.len());
                for item in items {
                    a.push(item);
                }
                Value::Array(a)
            }),
            // Keys are arbitrary values, duplicates included.
            proptest::collection::vec((inner.clone(), inner), 0..8).prop_map(|pairs| {
                let ctx = Context::new();
                let mut m = ctx.map_with_capacity(pairs.len());
                for (k, v) in pairs {
                    m.push(k, v);
                }
                Value::Map(m)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn parse_inverts_build(v in arb_value()) {
        let bytes = build(&v);
        let ctx = Context::new();
        let (back, used) = ctx.parse(&bytes);
        prop_assert_eq!(used, bytes.len());
        prop_assert_eq!(&back, &v);
        prop_assert_eq!(build(&back), bytes);
    }

    #[test]
    fn deep_copy_is_equal_and_owned(v in arb_value()) {
        let ctx = Context::new();
        let copy = ctx.deep_copy(&v);
        prop_assert_eq!(&copy, &v);
        prop_assert!(ctx.owns(&copy));
    }

    #[test]
    fn signed_integers_recover_exactly(n in any::<i64>()) {
        let ctx = Context::new();
        let v = ctx.make(&n);
        prop_assert_eq!(v.as_i64(), Some(n));
        prop_assert!(!v.is_overflowed_integer());
        prop_assert_eq!(from_slice::<i64>(&to_vec(&n)).unwrap(), n);
    }

    #[test]
    fn heads_are_minimal(n in any::<u64>()) {
        let expected = match n {
            0..=23 => 1,
            24..=0xff => 2,
            0x100..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        };
        prop_assert_eq!(build(&Value::Positive(n)).len(), expected);
    }

    #[test]
    fn parse_never_overreads(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let ctx = Context::new();
        let (v, used) = ctx.parse(&data);
        prop_assert!(used <= data.len());
        if used == 0 {
            prop_assert!(v.is_undefined());
        } else {
            prop_assert_eq!(build(&v).len() <= used, true);
        }
    }
}
