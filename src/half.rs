//! Half-precision (binary16) to single/double conversion.
//!
//! The codec decodes half floats but never produces them from wider floats, so only the widening
//! direction exists here.

const HALF_EXP_MASK: u16 = 0x7c00;
const HALF_MANT_MASK: u16 = 0x03ff;
const HALF_HIDDEN_BIT: u16 = 0x0400;
const HALF_BIAS: i32 = 15;

/// Split a non-special half into `(biased exponent, mantissa)`, normalizing subnormals.
///
/// Returns `None` for signed zero. For subnormals the exponent is rebased so that the returned
/// mantissa carries an implicit leading one, like a normal number.
#[inline]
fn unpack(bits: u16) -> Option<(i32, u16)> {
    let exp = i32::from((bits & HALF_EXP_MASK) >> 10);
    let mut mant = bits & HALF_MANT_MASK;

    if exp != 0 {
        return Some((exp, mant));
    }
    if mant == 0 {
        return None;
    }

    let mut exp = 1;
    while mant & HALF_HIDDEN_BIT == 0 {
        mant <<= 1;
        exp -= 1;
    }
    Some((exp, mant & HALF_MANT_MASK))
}

/// Convert a binary16 bit pattern to `f32`.
///
/// Infinity and NaN are carried through; NaN payload bits are kept in the high mantissa bits.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn half_to_f32(bits: u16) -> f32 {
    let sign = u32::from(bits & 0x8000) << 16;
    if bits & HALF_EXP_MASK == HALF_EXP_MASK {
        let mant = u32::from(bits & HALF_MANT_MASK) << 13;
        return f32::from_bits(sign | 0x7f80_0000 | mant);
    }
    let Some((exp, mant)) = unpack(bits) else {
        return f32::from_bits(sign);
    };
    // Rebiased exponent is always within 103..=142, so the cast is lossless.
    let exp = (exp + (127 - HALF_BIAS)) as u32;
    f32::from_bits(sign | (exp << 23) | (u32::from(mant) << 13))
}

/// Convert a binary16 bit pattern to `f64`.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn half_to_f64(bits: u16) -> f64 {
    let sign = u64::from(bits & 0x8000) << 48;
    if bits & HALF_EXP_MASK == HALF_EXP_MASK {
        let mant = u64::from(bits & HALF_MANT_MASK) << 42;
        return f64::from_bits(sign | 0x7ff0_0000_0000_0000 | mant);
    }
    let Some((exp, mant)) = unpack(bits) else {
        return f64::from_bits(sign);
    };
    let exp = (exp + (1023 - HALF_BIAS)) as u64;
    f64::from_bits(sign | (exp << 52) | (u64::from(mant) << 42))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_and_two() {
        assert_eq!(half_to_f64(0x3c00), 1.0);
        assert_eq!(half_to_f64(0xbc00), -1.0);
        assert_eq!(half_to_f32(0x4000), 2.0);
        assert_eq!(half_to_f32(0x3555), 0.333_251_953_125);
    }

    #[test]
    fn largest_normal() {
        assert_eq!(half_to_f64(0x7bff), 65504.0);
        assert_eq!(half_to_f32(0x0400), 6.103_515_625e-5);
    }

    #[test]
    fn infinities_and_nan() {
        assert_eq!(half_to_f64(0x7c00), f64::INFINITY);
        assert_eq!(half_to_f32(0xfc00), f32::NEG_INFINITY);
        assert!(half_to_f64(0x7e00).is_nan());
        assert!(half_to_f32(0x7c01).is_nan());
    }

    #[test]
    fn signed_zero() {
        let z = half_to_f64(0x8000);
        assert_eq!(z, 0.0);
        assert!(z.is_sign_negative());
        assert_eq!(half_to_f32(0x0000).to_bits(), 0);
    }

    #[test]
    fn subnormals() {
        let min = half_to_f64(0x8001);
        assert_eq!(min, -(2.0_f64).powi(-24));
        assert_eq!(half_to_f32(0x0001), (2.0_f32).powi(-24));
        assert_eq!(half_to_f64(0x03ff), 6.097_555_160_522_461e-5);
    }
}
