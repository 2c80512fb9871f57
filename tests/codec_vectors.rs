#![allow(clippy::unwrap_used)]

use cbor_kit::{build, half_to_f64, Context, ErrorCode, ParseLimits, Value};

fn roundtrip(bytes: &[u8]) -> Value {
    let ctx = Context::new();
    let (v, used) = ctx.parse(bytes);
    assert_eq!(used, bytes.len(), "parse consumed {used} of {}", bytes.len());
    assert_eq!(build(&v), bytes);
    v
}

#[test]
fn text_foo() {
    let v = roundtrip(&[0x63, b'f', b'o', b'o']);
    assert_eq!(v.as_str(), Some("foo"));
    assert_eq!(build(&Context::new().text("foo")), [0x63, b'f', b'o', b'o']);
}

#[test]
fn ordered_map() {
    let bytes = [0xa2, 0x61, b'a', 0x01, 0x61, b'b', 0x02];
    let v = roundtrip(&bytes);
    let map = v.as_map().unwrap();
    let entries: Vec<_> = map
        .iter()
        .map(|(k, v)| (k.as_str().unwrap(), v.as_u64().unwrap()))
        .collect();
    assert_eq!(entries, [("a", 1), ("b", 2)]);
}

#[test]
fn map_order_is_not_canonicalized() {
    let ctx = Context::new();
    let mut v = ctx.empty_map();
    *v.require(&ctx, "b") = Value::Positive(2);
    *v.require(&ctx, "a") = Value::Positive(1);
    assert_eq!(build(&v), [0xa2, 0x61, b'b', 0x02, 0x61, b'a', 0x01]);
}

#[test]
fn integer_width_boundaries() {
    let cases: &[(u64, &[u8])] = &[
        (0, &[0x00]),
        (23, &[0x17]),
        (24, &[0x18, 0x18]),
        (255, &[0x18, 0xff]),
        (256, &[0x19, 0x01, 0x00]),
        (65_535, &[0x19, 0xff, 0xff]),
        (65_536, &[0x1a, 0x00, 0x01, 0x00, 0x00]),
        (4_294_967_295, &[0x1a, 0xff, 0xff, 0xff, 0xff]),
        (
            4_294_967_296,
            &[0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
        ),
        (
            u64::MAX,
            &[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        ),
    ];
    for (n, bytes) in cases {
        assert_eq!(build(&Value::Positive(*n)), *bytes, "encoding {n}");
        assert_eq!(roundtrip(bytes), Value::Positive(*n));
    }
}

#[test]
fn lengths_use_minimal_width() {
    let ctx = Context::new();
    let long = "x".repeat(24);
    let out = build(&ctx.text(&long));
    assert_eq!(&out[..2], &[0x78, 24]);
    assert_eq!(out.len(), 26);

    let bytes = build(&ctx.bytes(&[0u8; 300]));
    assert_eq!(&bytes[..3], &[0x59, 0x01, 0x2c]);
}

#[test]
fn negative_integers() {
    let ctx = Context::new();
    assert_eq!(build(&ctx.make(&-1_i64)), [0x20]);
    assert_eq!(build(&ctx.make(&-100_i64)), [0x38, 0x63]);
    assert_eq!(
        build(&ctx.make(&i64::MIN)),
        [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );

    let v = roundtrip(&[0x38, 0x63]);
    assert_eq!(v, Value::Negative(99));
    assert_eq!(v.as_i64(), Some(-100));

    let min = roundtrip(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    assert!(min.is_overflowed_integer());
    assert_eq!(min.as_i64(), None);
}

#[test]
fn half_floats_are_kept_verbatim() {
    let v = roundtrip(&[0xf9, 0x3c, 0x00]);
    assert_eq!(v, Value::Half(0x3c00));
    assert_eq!(v.as_f64(), Some(1.0));

    assert_eq!(half_to_f64(0x7c00), f64::INFINITY);
    assert!(half_to_f64(0x7e00).is_nan());
    let neg_zero = half_to_f64(0x8000);
    assert_eq!(neg_zero, 0.0);
    assert!(neg_zero.is_sign_negative());
    assert_eq!(half_to_f64(0x8001), -(2.0_f64.powi(-24)));

    // NaN payloads survive because halves are never widened on output.
    roundtrip(&[0xf9, 0x7e, 0x01]);
}

#[test]
fn single_and_double() {
    assert_eq!(
        roundtrip(&[0xfa, 0x47, 0xc3, 0x50, 0x00]),
        Value::Single(100_000.0)
    );
    assert_eq!(
        roundtrip(&[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]),
        Value::Double(1.1)
    );
}

#[test]
fn simple_values() {
    assert_eq!(roundtrip(&[0xf4]), Value::Bool(false));
    assert_eq!(roundtrip(&[0xf5]), Value::Bool(true));
    assert_eq!(roundtrip(&[0xf6]), Value::Null);
    assert_eq!(roundtrip(&[0xf7]), Value::Undefined);

    // Unassigned simple values surface as their argument.
    let ctx = Context::new();
    assert_eq!(ctx.parse(&[0xf0]), (Value::Positive(16), 1));
    assert_eq!(ctx.parse(&[0xf8, 0xff]), (Value::Positive(255), 2));
}

#[test]
fn nested_containers() {
    // [1, [2, 3], {"k": h'00ff'}]
    let bytes = [
        0x83, 0x01, 0x82, 0x02, 0x03, 0xa1, 0x61, b'k', 0x42, 0x00, 0xff,
    ];
    let v = roundtrip(&bytes);
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr.get(1).and_then(Value::as_array).map(|a| a.len()), Some(2));
    let inner = arr.get(2).and_then(Value::as_map).unwrap();
    assert_eq!(
        inner.get_str("k").and_then(Value::as_bytes),
        Some(&[0x00, 0xff][..])
    );
}

#[test]
fn only_the_first_item_is_consumed() {
    let ctx = Context::new();
    let data = [0x01, 0x63, b'a', b'b', b'c'];
    let (first, used) = ctx.parse(&data);
    assert_eq!((first, used), (Value::Positive(1), 1));
    let (second, used2) = ctx.parse(&data[used..]);
    assert_eq!(second.as_str(), Some("abc"));
    assert_eq!(used + used2, data.len());
}

#[test]
fn break_stop_is_one_byte_undefined() {
    let ctx = Context::new();
    assert_eq!(ctx.parse(&[0xff]), (Value::Undefined, 1));
}

#[test]
fn failures_return_zero() {
    let ctx = Context::new();
    let cases: &[&[u8]] = &[
        &[],
        &[0x18],
        &[0x63, b'a'],
        &[0x82, 0x01],
        &[0xc0, 0x00],
        &[0x5f, 0xff],
        &[0x9f, 0xff],
        &[0x1c],
        &[0xfc],
        &[0x62, 0xff, 0xfe],
    ];
    for data in cases {
        assert_eq!(ctx.parse(data), (Value::Undefined, 0), "input {data:02x?}");
    }
}

#[test]
fn try_parse_reports_code_and_offset() {
    let ctx = Context::new();
    let err = ctx.try_parse(&[0x82, 0x01, 0xc2, 0x00]).unwrap_err();
    assert_eq!(err.code, ErrorCode::TagUnsupported);
    assert_eq!(err.offset, 2);

    let err = ctx.try_parse(&[]).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedEof);
    assert_eq!(err.offset, 0);

    let err = ctx.try_parse(&[0x7f]).unwrap_err();
    assert_eq!(err.code, ErrorCode::IndefiniteLengthUnsupported);
}

#[test]
fn depth_limit_applies() {
    let ctx = Context::new();
    let mut deep = vec![0x81; 300];
    deep.push(0x00);
    assert_eq!(ctx.parse(&deep), (Value::Undefined, 0));

    let limits = ParseLimits::default().with_max_depth(300);
    let (v, used) = ctx.parse_with_limits(&deep, limits);
    assert_eq!(used, deep.len());
    assert!(v.as_array().is_some());
}

#[test]
fn huge_declared_lengths_fail_cleanly() {
    let ctx = Context::new();
    assert_eq!(
        ctx.parse(&[0xbb, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]),
        (Value::Undefined, 0)
    );
    assert_eq!(
        ctx.parse(&[0x5a, 0xff, 0xff, 0xff, 0xff, 0x00]),
        (Value::Undefined, 0)
    );
}

#[test]
fn parsed_storage_belongs_to_the_parsing_context() {
    let ctx = Context::new();
    let (v, _) = ctx.parse(&[0x81, 0x61, b'z']);
    assert!(ctx.owns(&v));
    assert!(!Context::new().owns(&v));
}
