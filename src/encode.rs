use alloc::vec::Vec;

use crate::value::Value;
use crate::wire::write_head;

/// Encode `value` into a new buffer.
///
/// Every integer argument and length uses the shortest head form for its magnitude. Floats keep
/// their width (`Half` is re-emitted verbatim), and map entries keep their order.
#[must_use]
pub fn build(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    build_into(value, &mut out);
    out
}

/// Append the encoding of `value` to `out`.
pub fn build_into(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Positive(n) => write_head(out, 0, *n),
        Value::Negative(n) => write_head(out, 1, *n),
        Value::Bytes(b) => {
            write_head(out, 2, b.len() as u64);
            out.extend_from_slice(b);
        }
        Value::Text(t) => {
            // `str` guarantees valid UTF-8.
            write_head(out, 3, t.len() as u64);
            out.extend_from_slice(t.as_bytes());
        }
        Value::Array(a) => {
            write_head(out, 4, a.len() as u64);
            for item in a {
                build_into(item, out);
            }
        }
        Value::Map(m) => {
            write_head(out, 5, m.len() as u64);
            for (k, v) in m.iter() {
                build_into(k, out);
                build_into(v, out);
            }
        }
        Value::Bool(false) => out.push(0xf4),
        Value::Bool(true) => out.push(0xf5),
        Value::Null => out.push(0xf6),
        Value::Undefined => out.push(0xf7),
        Value::Half(bits) => {
            out.push(0xf9);
            out.extend_from_slice(&bits.to_be_bytes());
        }
        Value::Single(f) => {
            out.push(0xfa);
            out.extend_from_slice(&f.to_bits().to_be_bytes());
        }
        Value::Double(d) => {
            out.push(0xfb);
            out.extend_from_slice(&d.to_bits().to_be_bytes());
        }
    }
}
