use super::bigint::BigInt;
use super::bigint::LossFraction;
use super::float::{self, Category, Ternary};
use super::float::{Float, RoundingMode, Semantics, FP32, FP64};
use super::status::Flags;
use super::utils::mask;

impl Float {
    /// Load the integer `val` into the float. Notice that the number may
    /// overflow, or rounded with the rounding mode of `sem`.
    pub fn from_u64(sem: Semantics, val: u64) -> Self {
        let mut flags = Flags::empty();
        Self::from_i128_exp(sem, false, val as u128, 0, &mut flags).0
    }

    /// Load the integer `val` into the float. Notice that the number may
    /// overflow, or rounded with the rounding mode of `sem`.
    pub fn from_i64(sem: Semantics, val: i64) -> Self {
        let mut flags = Flags::empty();
        Self::from_i64_exp(sem, val, 0, &mut flags).0
    }

    /// Returns the number `m * 2^e`, rounded with the rounding mode of `sem`.
    /// Zero is returned as a positive zero.
    pub fn from_i64_exp(
        sem: Semantics,
        m: i64,
        e: i64,
        flags: &mut Flags,
    ) -> (Self, Ternary) {
        Self::from_i128_exp(sem, m < 0, m.unsigned_abs() as u128, e, flags)
    }

    fn from_i128_exp(
        sem: Semantics,
        sign: bool,
        m: u128,
        e: i64,
        flags: &mut Flags,
    ) -> (Self, Ternary) {
        if m == 0 {
            return (Self::zero(sem, false), Ternary::Exact);
        }
        let parts = [m as u64, (m >> 64) as u64];
        let mantissa = BigInt::from_parts(&parts);
        let exp = e.saturating_add(sem.get_mantissa_len() as i64);
        let mut a = Self::raw(sem, sign, exp, mantissa, Category::Normal);
        let t = a.normalize(sem.get_rounding_mode(), LossFraction::ExactlyZero, flags);
        (a, t)
    }

    /// Converts and returns the rounded integral part. Values that don't fit
    /// in the integer saturate.
    pub fn to_i64(&self, rm: RoundingMode) -> i64 {
        self.to_i64_scaled(0, rm)
    }

    /// Returns the value of `self * 2^scale`, rounded to an integer with the
    /// rounding mode `rm`. Values that don't fit in the integer saturate.
    pub fn to_i64_scaled(&self, scale: i64, rm: RoundingMode) -> i64 {
        if self.is_nan() || self.is_zero() {
            return 0;
        }

        if self.is_inf() {
            if self.get_sign() {
                return i64::MIN;
            } else {
                return i64::MAX;
            }
        }

        let val = match self.convert_normal_to_integer(scale, rm) {
            Some(val) => val,
            None => {
                return if self.get_sign() { i64::MIN } else { i64::MAX };
            }
        };
        if self.get_sign() {
            (val as i64).wrapping_neg()
        } else {
            val as i64
        }
    }

    /// Returns the magnitude of `self * 2^scale` rounded to an integer, or
    /// None if the result does not fit in 63 bits. The value 2^63 is allowed
    /// for negative numbers.
    fn convert_normal_to_integer(
        &self,
        scale: i64,
        rm: RoundingMode,
    ) -> Option<u64> {
        // We are converting to integer, so set the center point of the exponent
        // to the lsb instead of the msb.
        let i_exp = self.get_exp() - self.get_mantissa_len() as i64 + scale;
        let m = if i_exp < 0 {
            let shift = (-i_exp).min(1 << 32) as usize;
            let (mut m, loss) =
                float::shift_right_with_loss(&self.get_mantissa(), shift);

            let odd = m.is_odd();
            if float::need_round_away_from_zero(rm, self.get_sign(), loss, odd)
            {
                m.inplace_add(&BigInt::one());
            }
            m
        } else {
            if i_exp > 64 {
                return None;
            }
            let mut m = self.get_mantissa();
            m.shift_left(i_exp as usize);
            m
        };

        let limit = if self.get_sign() { 64 } else { 63 };
        let bits = m.msb_index();
        if bits > limit || (bits == 64 && m.get_part(0) != 1 << 63) {
            return None;
        }
        Some(m.get_part(0))
    }

    /// Decode the IEEE-754 bit layout of the format `sem` (sign, biased
    /// exponent, mantissa without the implicit bit).
    pub fn from_bits(sem: Semantics, float: u64) -> Self {
        let mantissa_len = sem.get_mantissa_len();
        let exponent_len = sem.get_exponent_len();
        debug_assert!(mantissa_len + exponent_len < 64);

        // Extract the biased exponent (wipe the sign and mantissa).
        let biased_exp = ((float >> mantissa_len) & mask(exponent_len) as u64) as i64;
        // Wipe the original exponent and mantissa.
        let sign = (float >> (exponent_len + mantissa_len)) & 1;
        // Wipe the sign and exponent.
        let mut mantissa = float & mask(mantissa_len) as u64;

        let sign = sign == 1;

        // Check for NaN/Inf
        if biased_exp == mask(exponent_len) as i64 {
            if mantissa == 0 {
                return Self::inf(sem, sign);
            }
            return Self::nan(sem, sign);
        }

        let mut exp = biased_exp - sem.get_bias();

        // Add the implicit bit for normal numbers.
        if biased_exp != 0 {
            mantissa += 1u64 << mantissa_len;
        } else {
            // Handle denormals, adjust the exponent to the legal range.
            exp += 1;
        }

        let mantissa = BigInt::from_u64(mantissa);
        Self::new(sem, sign, exp, mantissa)
    }

    /// Encode this number in the IEEE-754 bit layout of its semantics. NaN is
    /// encoded as a quiet NaN.
    pub fn to_bits(&self) -> u64 {
        // https://en.wikipedia.org/wiki/IEEE_754
        let mantissa_len = self.get_mantissa_len();
        let exponent_len = self.get_exponent_len();
        debug_assert!(mantissa_len + exponent_len < 64);

        let mantissa: u64;
        let mut exp: u64;
        match self.get_category() {
            Category::Infinity => {
                mantissa = 0;
                exp = mask(exponent_len) as u64;
            }
            Category::NaN => {
                mantissa = 1 << (mantissa_len - 1);
                exp = mask(exponent_len) as u64;
            }
            Category::Zero => {
                mantissa = 0;
                exp = 0;
            }
            Category::Normal => {
                exp = (self.get_exp() + self.get_bias()) as u64;
                debug_assert!(exp > 0);
                let m = self.get_mantissa().get_part(0);
                // Encode denormals. If the exponent is the minimum value and we
                // don't have a leading integer bit (in the form 1.mmmm) then
                // this is a denormal value and we need to encode it as such.
                if (exp == 1) && ((m >> mantissa_len) == 0) {
                    exp = 0;
                }
                mantissa = m & mask(mantissa_len) as u64;
            }
        }

        let mut bits: u64 = self.get_sign() as u64;
        bits <<= exponent_len;
        bits |= exp;
        bits <<= mantissa_len;
        debug_assert!(mantissa <= 1 << mantissa_len);
        bits |= mantissa;
        bits
    }

    /// Cast to another float using the rounding mode `rm`, and report the
    /// direction of the rounding.
    pub fn cast_with_flags(
        &self,
        to: Semantics,
        rm: RoundingMode,
        flags: &mut Flags,
    ) -> (Float, Ternary) {
        let exp_delta =
            self.get_semantics().get_precision() as i64 - to.get_precision() as i64;
        let mut x = Float::raw(
            to,
            self.get_sign(),
            self.get_exp() - exp_delta,
            self.get_mantissa(),
            self.get_category(),
        );
        let t = x.normalize(rm, LossFraction::ExactlyZero, flags);
        (x, t)
    }

    /// Cast to another float using the rounding mode `rm`.
    pub fn cast_with_rm(&self, to: Semantics, rm: RoundingMode) -> Float {
        let mut flags = Flags::empty();
        self.cast_with_flags(to, rm, &mut flags).0
    }

    /// Convert from one float format to another, using the rounding mode of
    /// the target format.
    pub fn cast(&self, to: Semantics) -> Float {
        self.cast_with_rm(to, to.get_rounding_mode())
    }

    // Convert this float to fp32. Notice that the number may overflow or
    // rounded to the nearest even (see cast and cast_with_rm).
    pub fn as_f32(&self) -> f32 {
        let b = self.cast(FP32);
        f32::from_bits(b.to_bits() as u32)
    }
    // Convert this float to fp64. Notice that the number may overflow or
    // rounded to the nearest even (see cast and cast_with_rm).
    pub fn as_f64(&self) -> f64 {
        let b = self.cast(FP64);
        f64::from_bits(b.to_bits())
    }

    // Loads and converts a native fp32 value. Notice that the number may overflow or
    // rounded with the rounding mode of `sem`.
    pub fn from_f32(sem: Semantics, float: f32) -> Self {
        Float::from_bits(FP32, float.to_bits() as u64).cast(sem)
    }

    // Loads and converts a native fp64 value. Notice that the number may overflow or
    // rounded with the rounding mode of `sem`.
    pub fn from_f64(sem: Semantics, float: f64) -> Self {
        Float::from_bits(FP64, float.to_bits()).cast(sem)
    }
}

#[test]
fn test_rounding_to_integer() {
    // Test the low integers with round-to-zero.
    for i in 0..100 {
        let r = Float::from_f64(FP64, i as f64 + 0.1).to_i64(RoundingMode::Zero);
        assert_eq!(i, r);
    }

    // Test the high integers with round_to_zero.
    for i in 0..100 {
        let val = (i as i64) << 54;
        let r = Float::from_i64(FP64, val).to_i64(RoundingMode::Zero);
        assert_eq!(val, r);
    }

    let fp = |v: f64| Float::from_f64(FP64, v);

    use RoundingMode::NearestTiesToAway;
    assert_eq!(1, fp(0.5).to_i64(NearestTiesToAway));
    assert_eq!(0, fp(0.49).to_i64(NearestTiesToAway));
    assert_eq!(199999, fp(199999.49).to_i64(NearestTiesToAway));
    assert_eq!(0, fp(-0.49).to_i64(NearestTiesToAway));
    assert_eq!(-1, fp(-0.5).to_i64(NearestTiesToAway));

    use RoundingMode::Zero;
    assert_eq!(0, fp(0.9).to_i64(Zero));
    assert_eq!(1, fp(1.1).to_i64(Zero));
    assert_eq!(99, fp(99.999).to_i64(Zero));
    assert_eq!(0, fp(-0.99).to_i64(Zero));
    assert_eq!(0, fp(-0.5).to_i64(Zero));

    use RoundingMode::Positive;
    assert_eq!(1, fp(0.9).to_i64(Positive));
    assert_eq!(2, fp(1.1).to_i64(Positive));
    assert_eq!(100, fp(99.999).to_i64(Positive));
    assert_eq!(0, fp(-0.99).to_i64(Positive));
    assert_eq!(0, fp(-0.5).to_i64(Positive));

    use RoundingMode::{Away, Negative};
    assert_eq!(-1, fp(-0.01).to_i64(Negative));
    assert_eq!(-2, fp(-1.5).to_i64(Negative));
    assert_eq!(1, fp(0.01).to_i64(Away));
    assert_eq!(-1, fp(-0.01).to_i64(Away));

    // Ties to even.
    use RoundingMode::NearestTiesToEven;
    assert_eq!(2, fp(2.5).to_i64(NearestTiesToEven));
    assert_eq!(4, fp(3.5).to_i64(NearestTiesToEven));
    assert_eq!(-2, fp(-2.5).to_i64(NearestTiesToEven));

    // Special values
    let n_inf = f64::NEG_INFINITY;
    let inf = f64::INFINITY;
    assert_eq!(0, fp(f64::NAN).to_i64(NearestTiesToEven));
    assert_eq!(i64::MIN, fp(n_inf).to_i64(NearestTiesToEven));
    assert_eq!(i64::MAX, fp(inf).to_i64(NearestTiesToEven));

    // Saturation.
    assert_eq!(i64::MAX, fp(1e30).to_i64(NearestTiesToEven));
    assert_eq!(i64::MIN, fp(-1e30).to_i64(NearestTiesToEven));
    assert_eq!(i64::MIN, fp(-9223372036854775808.0).to_i64(Zero));
}

#[test]
fn test_scaled_rounding() {
    use RoundingMode::*;
    let fp = |v: f64| Float::from_f64(FP64, v);
    // 0.75 * 4 = 3.
    assert_eq!(fp(0.75).to_i64_scaled(2, Zero), 3);
    // 0.75 * 2 = 1.5.
    assert_eq!(fp(0.75).to_i64_scaled(1, NearestTiesToEven), 2);
    assert_eq!(fp(0.75).to_i64_scaled(1, Zero), 1);
    assert_eq!(fp(-0.75).to_i64_scaled(1, Positive), -1);
    assert_eq!(fp(-0.75).to_i64_scaled(1, Negative), -2);
    // 10 / 4 = 2.5.
    assert_eq!(fp(10.).to_i64_scaled(-2, NearestTiesToEven), 2);
    assert_eq!(fp(10.).to_i64_scaled(-2, NearestTiesToAway), 3);
    // Tiny values scaled far down.
    assert_eq!(fp(1.0).to_i64_scaled(-10000, Away), 1);
    assert_eq!(fp(1.0).to_i64_scaled(-10000, NearestTiesToEven), 0);
}

#[test]
fn test_from_int_exp() {
    let sem = Semantics::new(8, 8, RoundingMode::NearestTiesToEven);
    let mut flags = Flags::empty();

    let (x, t) = Float::from_i64_exp(sem, 3, -1, &mut flags);
    assert_eq!(t, Ternary::Exact);
    assert_eq!(x.as_f64(), 1.5);

    let (x, t) = Float::from_i64_exp(sem, -255, 4, &mut flags);
    assert_eq!(t, Ternary::Exact);
    assert_eq!(x.as_f64(), -255. * 16.);

    let (x, t) = Float::from_i64_exp(sem, 0, 4, &mut flags);
    assert_eq!(t, Ternary::Exact);
    assert!(x.is_zero() && !x.is_negative());
    assert!(flags.is_empty());

    // 257 needs 9 bits and rounds to 256 (ties to even).
    let (x, t) = Float::from_i64_exp(sem, 257, 0, &mut flags);
    assert_eq!(t, Ternary::Below);
    assert_eq!(x.as_f64(), 256.);
    assert_eq!(flags, Flags::INEXACT);

    let up = sem.with_rm(RoundingMode::Positive);
    let (x, t) = Float::from_i64_exp(up, 257, 0, &mut flags);
    assert_eq!(t, Ternary::Above);
    assert_eq!(x.as_f64(), 258.);

    let (x, _) = Float::from_i64_exp(sem, i64::MIN, 0, &mut flags);
    assert_eq!(x.as_f64(), i64::MIN as f64);
}

#[test]
fn test_round_trip_native_float_cast() {
    let f = f32::from_bits(0x41700000);
    let a = Float::from_f32(FP32, f);
    assert_eq!(f, a.as_f32());

    let pi = 355. / 113.;
    let a = Float::from_f64(FP64, pi);
    assert_eq!(pi, a.as_f64());

    assert!(Float::from_f64(FP64, f64::NAN).is_nan());
    assert!(!Float::from_f64(FP64, f64::NAN).is_inf());
    assert!(Float::from_f64(FP64, f64::INFINITY).is_inf());
    assert!(!Float::from_f64(FP64, f64::INFINITY).is_nan());
    assert!(Float::from_f64(FP64, f64::NEG_INFINITY).is_inf());

    let a_float = f32::from_bits(0x3f8fffff);
    let a = Float::from_f32(FP64, a_float);
    let b = a.cast(FP32);
    assert_eq!(a.as_f32(), a_float);
    assert_eq!(b.as_f32(), a_float);

    let f = f32::from_bits(0x000000);
    let a = Float::from_f32(FP32, f);
    assert!(!a.is_normal());
    assert_eq!(f, a.as_f32());
}

#[test]
fn test_cast_from_integers() {
    use super::float::FP16;

    let pi = 355. / 133.;
    let e = 193. / 71.;

    assert_eq!(Float::from_i64(FP32, 1 << 32).as_f32(), (1u64 << 32) as f32);
    assert_eq!(Float::from_i64(FP32, 1 << 34).as_f32(), (1u64 << 34) as f32);
    assert_eq!(Float::from_f64(FP32, pi).as_f32(), (pi) as f32);
    assert_eq!(Float::from_f64(FP32, e).as_f32(), (e) as f32);
    assert_eq!(Float::from_u64(FP32, 8388610).as_f32(), 8388610 as f32);

    for i in 0..(1 << 16) {
        assert_eq!(Float::from_u64(FP32, i << 12).as_f32(), (i << 12) as f32);
    }

    assert_eq!(Float::from_i64(FP64, 0).as_f64(), 0.);
    assert_eq!(Float::from_i64(FP16, 65500).as_f64(), 65504.0);
    assert_eq!(Float::from_i64(FP16, 65504).as_f64(), 65504.0);
    assert_eq!(Float::from_i64(FP16, 65519).as_f64(), 65504.0);
    assert_eq!(Float::from_i64(FP16, 65520).as_f64(), f64::INFINITY);
    assert_eq!(Float::from_i64(FP16, 65536).as_f64(), f64::INFINITY);

    for i in -100..100 {
        let a = Float::from_i64(FP32, i);
        let b = Float::from_f64(FP32, i as f64);
        assert_eq!(a.as_f32(), b.as_f32());
    }
}

#[test]
fn test_cast_zero_nan_inf() {
    assert!(Float::nan(FP64, true).as_f64().is_nan());
    assert_eq!(Float::zero(FP64, false).as_f64(), 0.0);
    assert_eq!(Float::zero(FP64, true).as_f64().to_bits(), (-0.0f64).to_bits());

    {
        let a = Float::from_f32(FP32, f32::from_bits(0xf48fffff));
        assert!(!a.is_inf());
        assert!(!a.is_nan());
        assert!(a.is_negative());
    }
    {
        let a = Float::from_f32(FP32, f32::from_bits(0xffc00000)); // -Nan.
        assert!(!a.is_inf());
        assert!(a.is_nan());
        assert!(a.is_negative());
    }
    {
        // Check that casting propagates inf/nan.
        let a = Float::from_f32(FP32, f32::from_bits(0xff800000)); // -Inf
        let b = a.cast(FP64);
        assert!(b.is_inf());
        assert!(!b.is_nan());
        assert!(b.is_negative());
    }
}

#[test]
fn test_cast_down_rounding_modes() {
    // 1 + 2^-30 is between two fp32 numbers.
    let x = Float::from_f64(FP64, 1.0 + 2f64.powi(-30));
    let next = f32::from_bits(0x3f800001);
    assert_eq!(x.cast_with_rm(FP32, RoundingMode::NearestTiesToEven).as_f32(), 1.0);
    assert_eq!(x.cast_with_rm(FP32, RoundingMode::Positive).as_f32(), next);
    assert_eq!(x.cast_with_rm(FP32, RoundingMode::Away).as_f32(), next);
    assert_eq!(x.cast_with_rm(FP32, RoundingMode::Zero).as_f32(), 1.0);

    let mut flags = Flags::empty();
    let (_, t) = x.cast_with_flags(FP32, RoundingMode::Negative, &mut flags);
    assert_eq!(t, Ternary::Below);
    assert_eq!(flags, Flags::INEXACT);
}

#[cfg(feature = "std")]
#[test]
fn test_cast_down_complex() {
    use super::utils;
    // Try casting a bunch of difficult values such as inf, nan, denormals, etc.
    for v in utils::get_special_test_values() {
        let res = Float::from_f64(FP64, v).as_f32();
        assert_eq!(Float::from_f64(FP64, v).as_f64().to_bits(), v.to_bits());
        assert_eq!(v.is_nan(), res.is_nan());
        assert!(v.is_nan() || res == v as f32);
    }
}

#[test]
fn test_load_store_all_f32() {
    // Try to load and store normals and denormals.
    for i in 0..(1u64 << 16) {
        let in_f = f32::from_bits((i << 10) as u32);
        let fp_f = Float::from_f32(FP32, in_f);
        let out_f = fp_f.as_f32();
        assert_eq!(in_f.is_nan(), out_f.is_nan());
        assert_eq!(in_f.is_infinite(), out_f.is_infinite());
        assert!(in_f.is_nan() || (in_f.to_bits() == out_f.to_bits()));
    }
}
