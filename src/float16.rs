//! Conversions between `f32` and IEEE-754 binary16 ("half") bit patterns.

const F16_SIGN: u16 = 0x8000;
const F16_INFINITY: u16 = 0x7c00;
const F16_QUIET_NAN: u16 = 0x7e00;

/// Converts an `f32` to the bit pattern of the nearest half-precision value.
///
/// Rounding is round-to-nearest, ties-to-even. Values too large for a half (including those that
/// round up past 65504) become signed infinity. Values too small become half subnormals or signed
/// zero. NaN inputs produce a quiet NaN that keeps the sign and the upper payload bits.
pub fn f32_to_f16_bits(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = (x >> 16) as u16 & F16_SIGN;
    let exp = ((x >> 23) & 0xff) as i32;
    let man = x & 0x007f_ffff;

    if exp == 0xff {
        if man == 0 {
            return sign | F16_INFINITY;
        }
        return sign | F16_QUIET_NAN | (man >> 13) as u16;
    }

    // Exponent rebiased from 127 to 15.
    let half_exp = exp - 127 + 15;

    if half_exp >= 0x1f {
        return sign | F16_INFINITY;
    }

    if half_exp <= 0 {
        // Below 2^-25 everything rounds to zero, including f32 subnormals.
        if half_exp < -10 {
            return sign;
        }
        let full = man | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let rounded = round_even(full >> shift, full & ((1 << shift) - 1), 1 << (shift - 1));
        return sign | rounded as u16;
    }

    // A carry out of the mantissa bumps the exponent, which also turns 0x7bff into infinity.
    let truncated = ((half_exp as u32) << 10) | (man >> 13);
    sign | round_even(truncated, man & 0x1fff, 0x1000) as u16
}

/// Rounds `truncated` up by one ulp if the discarded bits `rem` exceed `halfway`, or equal it and
/// `truncated` is odd.
#[inline(always)]
fn round_even(truncated: u32, rem: u32, halfway: u32) -> u32 {
    if rem > halfway || (rem == halfway && (truncated & 1) == 1) {
        truncated + 1
    } else {
        truncated
    }
}

/// Converts a half-precision bit pattern to `f32`. Every half value is exactly representable.
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    let sign = ((bits & F16_SIGN) as u32) << 16;
    let exp = ((bits >> 10) & 0x1f) as u32;
    let man = (bits & 0x3ff) as u32;

    match exp {
        0 => {
            // Zero or subnormal: man * 2^-24.
            let magnitude = man as f32 * f32::from_bits(0x3380_0000);
            f32::from_bits(sign | magnitude.to_bits())
        }
        0x1f => f32::from_bits(sign | 0x7f80_0000 | (man << 13)),
        _ => f32::from_bits(sign | ((exp + 112) << 23) | (man << 13)),
    }
}
