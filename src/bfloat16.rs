//! Conversion between floats and the 16-bit brain floating point format: one
//! sign bit, eight exponent bits and seven mantissa bits. The exponent range
//! is the range of FP32.

use super::float::{Float, RoundingMode, Semantics, Ternary};
use super::status::Flags;

const SIGN_BIT: u16 = 0x8000;
const INF_BITS: u16 = 0x7f80;
const NAN_BITS: u16 = 0x7fc0;

impl Float {
    /// Encode this number as a bfloat16 bit pattern, rounding with `rm`.
    /// Numbers of magnitude 2^128 and above become infinity, or the largest
    /// finite number if `rm` rounds toward zero. NaN raises the invalid flag.
    ///
    /// # Examples
    ///
    /// ```
    ///    use radixfloat::{Flags, Float, RoundingMode, FP64};
    ///
    ///    let mut flags = Flags::empty();
    ///    let x = Float::from_f64(FP64, 1.5);
    ///    let bits = x.as_bf16_bits(RoundingMode::NearestTiesToEven, &mut flags);
    ///    assert_eq!(bits, 0x3fc0);
    /// ```
    pub fn as_bf16_bits(&self, rm: RoundingMode, flags: &mut Flags) -> u16 {
        let sign = if self.get_sign() { SIGN_BIT } else { 0 };
        if self.is_nan() {
            flags.raise(Flags::INVALID);
            return NAN_BITS;
        }
        if self.is_inf() {
            return sign | INF_BITS;
        }
        if self.is_zero() {
            return sign;
        }

        // 2^(e-1) <= |x| < 2^e
        let e = self.binary_exponent();
        if e > 128 {
            let bits = sign | INF_BITS;
            if rm.is_like_zero(self.get_sign()) {
                return bits - 1;
            }
            return bits;
        }

        if e <= -126 {
            // Denormals are multiples of 2^-133. The magnitude 0x80 lands on
            // the encoding of the smallest normal.
            let m = self.to_i64_scaled(133, rm);
            debug_assert!((-0x80..=0x80).contains(&m));
            return if self.get_sign() {
                SIGN_BIT + (-m) as u16
            } else {
                m as u16
            };
        }

        // Round to 8 bits: 2^7 <= |m| <= 2^8. The parts are added, so a
        // mantissa of 2^8 carries into the exponent field, up to infinity.
        let m = self.to_i64_scaled(8 - e, rm);
        debug_assert!((0x80..=0x100).contains(&m.abs()));
        let mantissa = if m < 0 { 0x7f80 - m } else { m - 0x80 };
        (((126 + e) << 7) + mantissa) as u16
    }

    /// Decode the bfloat16 bit pattern `bits` into a float with the semantics
    /// `sem`, rounded with the rounding mode of `sem`. Every bfloat16 value is
    /// exact in semantics with at least 8 bits of precision and the exponent
    /// range of FP32. NaN patterns raise the invalid flag and decode to a
    /// positive NaN.
    pub fn from_bf16_bits(
        sem: Semantics,
        bits: u16,
        flags: &mut Flags,
    ) -> (Float, Ternary) {
        let sign = bits & SIGN_BIT != 0;
        let mut e = ((bits >> 7) & 0xff) as i64;
        let mut m = (bits & 0x7f) as i64;

        if e == 0xff {
            if m != 0 {
                flags.raise(Flags::INVALID);
                return (Float::nan(sem, false), Ternary::Exact);
            }
            return (Float::inf(sem, sign), Ternary::Exact);
        }

        if e == 0 {
            if m == 0 {
                let zero = if sign { -0.0 } else { 0.0 };
                return (Float::from_f64(sem, zero), Ternary::Exact);
            }
            // Denormal.
            e += 1;
        } else {
            // The implicit bit.
            m += 0x80;
        }
        if sign {
            m = -m;
        }

        // The value is m * 2^(e - 134), where 134 is the bias (127) plus the
        // precision minus one (7).
        Float::from_i64_exp(sem, m, e - 134, flags)
    }
}

#[cfg(test)]
use super::float::{BF16, FP64};

#[cfg(test)]
fn is_nan_pattern(bits: u16) -> bool {
    bits & INF_BITS == INF_BITS && bits & 0x7f != 0
}

#[test]
fn test_bf16_special_values() {
    let mut flags = Flags::empty();
    let (x, t) = Float::from_bf16_bits(BF16, 0x7f80, &mut flags);
    assert!(x.is_inf() && !x.is_negative());
    assert!(t.is_exact());
    let (x, _) = Float::from_bf16_bits(BF16, 0xff80, &mut flags);
    assert!(x.is_inf() && x.is_negative());
    let (x, _) = Float::from_bf16_bits(BF16, 0x0000, &mut flags);
    assert!(x.is_zero() && !x.is_negative());
    let (x, _) = Float::from_bf16_bits(BF16, 0x8000, &mut flags);
    assert!(x.is_zero() && x.is_negative());
    assert!(flags.is_empty());

    let (x, _) = Float::from_bf16_bits(BF16, 0xffc1, &mut flags);
    assert!(x.is_nan() && !x.is_negative());
    assert_eq!(flags, Flags::INVALID);

    for rm in RoundingMode::ALL {
        let mut flags = Flags::empty();
        assert_eq!(Float::inf(FP64, false).as_bf16_bits(rm, &mut flags), 0x7f80);
        assert_eq!(Float::inf(FP64, true).as_bf16_bits(rm, &mut flags), 0xff80);
        assert_eq!(Float::zero(FP64, false).as_bf16_bits(rm, &mut flags), 0);
        assert_eq!(Float::zero(FP64, true).as_bf16_bits(rm, &mut flags), 0x8000);
        assert!(flags.is_empty());
        let nan = Float::nan(FP64, true).as_bf16_bits(rm, &mut flags);
        assert!(is_nan_pattern(nan));
        assert_eq!(flags, Flags::INVALID);
    }
}

#[test]
fn test_bf16_overflow() {
    use RoundingMode::*;
    let mut flags = Flags::empty();
    let two_128 = f64::from_bits((1023 + 128) << 52);
    let big = Float::from_f64(FP64, two_128);
    let neg = big.neg();
    assert_eq!(big.as_bf16_bits(NearestTiesToEven, &mut flags), 0x7f80);
    assert_eq!(big.as_bf16_bits(Zero, &mut flags), 0x7f7f);
    assert_eq!(big.as_bf16_bits(Negative, &mut flags), 0x7f7f);
    assert_eq!(big.as_bf16_bits(Positive, &mut flags), 0x7f80);
    assert_eq!(neg.as_bf16_bits(Positive, &mut flags), 0xff7f);
    assert_eq!(neg.as_bf16_bits(Away, &mut flags), 0xff80);

    // Halfway between the largest number and 2^128 carries into infinity.
    let half = Float::from_f64(FP64, 511.0 * f64::from_bits((1023 + 119) << 52));
    assert_eq!(half.as_bf16_bits(NearestTiesToEven, &mut flags), 0x7f80);
    assert_eq!(half.as_bf16_bits(NearestTiesToAway, &mut flags), 0x7f80);
    assert_eq!(half.as_bf16_bits(Zero, &mut flags), 0x7f7f);
    assert_eq!(half.neg().as_bf16_bits(NearestTiesToEven, &mut flags), 0xff80);
    assert_eq!(half.neg().as_bf16_bits(Positive, &mut flags), 0xff7f);
}

#[test]
fn test_bf16_denormal_rounding() {
    use RoundingMode::*;
    let mut flags = Flags::empty();
    let min = f64::from_bits((1023 - 133) << 52);

    // Half of the smallest denormal.
    let x = Float::from_f64(FP64, min / 2.);
    assert_eq!(x.as_bf16_bits(NearestTiesToEven, &mut flags), 0);
    assert_eq!(x.as_bf16_bits(NearestTiesToAway, &mut flags), 1);
    assert_eq!(x.as_bf16_bits(Positive, &mut flags), 1);
    assert_eq!(x.neg().as_bf16_bits(Positive, &mut flags), 0x8000);
    assert_eq!(x.neg().as_bf16_bits(Negative, &mut flags), 0x8001);

    // The largest denormal rounds up to the smallest normal.
    let x = Float::from_f64(FP64, min * 127.75);
    assert_eq!(x.as_bf16_bits(NearestTiesToEven, &mut flags), 0x80);
    assert_eq!(x.as_bf16_bits(Zero, &mut flags), 0x7f);
    assert_eq!(x.neg().as_bf16_bits(Away, &mut flags), 0x8080);
    assert!(flags.is_empty());
}

#[test]
fn test_bf16_decode_values() {
    // Walk the positive finite patterns in order. Each one is m * 2^e.
    let mut flags = Flags::empty();
    let mut m: i64 = 1;
    let mut e: i64 = -133;
    for bits in 1..0x7f80u16 {
        let expected = m as f64 * f64::from_bits(((e + 1023) as u64) << 52);
        let (x, t) = Float::from_bf16_bits(BF16, bits, &mut flags);
        assert_eq!(x.as_f64(), expected, "pattern {:x}", bits);
        assert!(t.is_exact());
        let (x, _) = Float::from_bf16_bits(BF16, bits | SIGN_BIT, &mut flags);
        assert_eq!(x.as_f64(), -expected);

        m += 1;
        if m == 0x100 {
            e += 1;
            m >>= 1;
        }
    }
    assert!(flags.is_empty());
}

#[test]
fn test_bf16_all_patterns_all_modes() {
    for rm in RoundingMode::ALL {
        let sem = Semantics::new(16, 8, rm);
        for bits in 0..=u16::MAX {
            let mut flags = Flags::empty();
            let (x, t) = Float::from_bf16_bits(sem, bits, &mut flags);
            assert!(t.is_exact());
            let nan = is_nan_pattern(bits);
            assert_eq!(x.is_nan(), nan);
            assert_eq!(flags.contains(Flags::INVALID), nan);

            let back = x.as_bf16_bits(rm, &mut flags);
            if nan {
                assert!(is_nan_pattern(back));
            } else {
                assert_eq!(back, bits, "pattern {:x} mode {:?}", bits, rm);
            }
        }
    }
}

#[test]
fn test_bf16_encode_matches_cast() {
    use super::utils::Lfsr;
    let mut lfsr = Lfsr::new();

    for _ in 0..5000 {
        // Doubles around the exponent range of bfloat16.
        let r = lfsr.get64();
        let exp = 1023 - 140 + (r >> 52) % 275;
        let mantissa = lfsr.get64() & ((1 << 52) - 1);
        let bits = (r & (1 << 63)) | (exp << 52) | mantissa;
        let x = Float::from_f64(FP64, f64::from_bits(bits));

        for rm in RoundingMode::ALL {
            let mut flags = Flags::empty();
            let encoded = x.as_bf16_bits(rm, &mut flags);
            let packed = x.cast_with_rm(BF16, rm).to_bits() as u16;
            assert_eq!(encoded, packed, "{:x} mode {:?}", bits, rm);
        }
    }
}
