#![cfg(feature = "serde")]
#![allow(clippy::unwrap_used)]

use cbor_kit::{Context, Value};
use serde_json::json;

#[test]
fn value_serializes_into_json() {
    let ctx = Context::new();
    let (v, _) = ctx.parse(&[
        0xa3, 0x61, b'a', 0x01, 0x61, b'b', 0x82, 0xf5, 0xf6, 0x61, b'c', 0x38, 0x63,
    ]);
    let j = serde_json::to_value(&v).unwrap();
    assert_eq!(j, json!({"a": 1, "b": [true, null], "c": -100}));
}

#[test]
fn floats_and_undefined() {
    assert_eq!(
        serde_json::to_value(Value::Half(0x3e00)).unwrap(),
        json!(1.5)
    );
    assert_eq!(serde_json::to_value(Value::Undefined).unwrap(), json!(null));
}
