#![no_main]

use libfuzzer_sys::fuzz_target;

use cbor_kit::{build, Context, ParseLimits};

fuzz_target!(|data: &[u8]| {
    // Cap lengths by the input so hostile heads cannot force large allocations.
    let limits = ParseLimits::for_bytes(data.len()).with_max_depth(64);
    let ctx = Context::new();
    let (v, used) = ctx.parse_with_limits(data, limits);
    assert!(used <= data.len());
    if used == 0 {
        assert!(v.is_undefined());
        return;
    }

    // Rebuilt bytes are minimal, so they parse back to the same value and are a fixed point.
    let out = build(&v);
    let (back, used_back) = Context::new().parse(&out);
    assert_eq!(used_back, out.len());
    assert_eq!(back, v);
    assert_eq!(build(&back), out);
    assert_eq!(ctx.deep_copy(&v), v);
});
