//! Conversion of a digit sequence in some base into a correctly rounded
//! float. The digits are converted with increasing working precision until the
//! rounding of the approximation is known to be the rounding of the exact
//! value (Ziv's strategy).

extern crate alloc;
use super::bigint::{BigInt, LossFraction};
use super::float::{Category, Float, RoundingMode, Semantics, Ternary};
use super::lexer::{lex, ParsedNumber, Token};
use super::status::Flags;
use super::utils::{self, sadd, RangeExcursion, EXP_MAX, EXP_MIN};
use tracing::{debug, trace};

/// The result of parsing a numeric literal.
#[derive(Debug, Clone)]
pub struct Parsed {
    /// The rounded value.
    pub value: Float,
    /// The direction of the rounding.
    pub ternary: Ternary,
    /// The byte offset of the first character that was not consumed. This is
    /// zero if the text is not a number.
    pub end: usize,
}

/// An approximation of a power of the base: `z * 2^exp`, where `z` has
/// exactly `width` bits.
struct Power {
    z: BigInt,
    exp: i64,
    // The number of uncertain low bits, or None if the power is exact.
    err: Option<usize>,
}

/// Compute base^e truncated to `width` bits, using left-to-right binary
/// exponentiation. Returns an overflow if the binary exponent of the power
/// can't be represented.
fn pow_with_error(
    base: u32,
    e: u64,
    width: usize,
) -> Result<Power, RangeExcursion> {
    debug_assert!(e > 0);
    let bits = (u64::BITS - e.leading_zeros()) as usize;
    let mut z = BigInt::from_u64(base as u64);
    let mut exp: i64 = 0;
    let mut exact = true;

    for i in (0..bits - 1).rev() {
        z.inplace_mul(&z.clone());
        exp = exp
            .checked_mul(2)
            .filter(|x| (EXP_MIN..=EXP_MAX).contains(x))
            .ok_or(RangeExcursion::Overflow)?;
        if (e >> i) & 1 == 1 {
            z.inplace_mul_word(base as u64);
        }

        // Truncate to the working width.
        let msb = z.msb_index();
        if msb > width {
            let shift = msb - width;
            exact &= z.get_loss_kind_for_bit(shift).is_exactly_zero();
            z.shift_right(shift);
            exp = sadd(exp, shift as i64, EXP_MIN, EXP_MAX)?;
        }
    }

    let msb = z.msb_index();
    if msb < width {
        z.shift_left(width - msb);
        exp -= (width - msb) as i64;
    }
    let err = if exact { None } else { Some(bits + 3) };
    Ok(Power { z, exp, err })
}

/// The exponent computations of the division path report a large positive
/// exponent of the divisor, which is an underflow of the quotient.
fn flip(r: RangeExcursion) -> RangeExcursion {
    match r {
        RangeExcursion::Overflow => RangeExcursion::Underflow,
        RangeExcursion::Underflow => RangeExcursion::Overflow,
    }
}

/// An approximation `y * 2^exp` of the parsed number, rounded toward zero.
/// The integer `y` has exactly `width` bits and the error is below 2^err
/// units of its last bit.
struct Approximation {
    y: BigInt,
    exp: i64,
    width: usize,
    err: usize,
    exact: bool,
}

/// Compute the approximation of `num` with `width` bits of working
/// precision.
fn approximate(
    num: &ParsedNumber,
    width: usize,
) -> Result<Approximation, RangeExcursion> {
    let digits = num.mantissa();
    let base = num.base;

    // Read enough digits to fill the working width, and remember whether
    // digits were left out. The trailing zeros are gone, so anything that is
    // left out is not zero.
    let pstr_size = utils::digits_for_bits(width, base).min(digits.len());
    let mut exact = pstr_size == digits.len();
    let mut y = BigInt::from_digits(&digits[..pstr_size], base);

    // Normalize y to exactly `width` bits.
    let msb = y.msb_index();
    debug_assert!(msb > 0, "the leading digit is not zero");
    let mut exp: i64 = if msb <= width {
        let s = width - msb;
        y.shift_left(s);
        -(s as i64)
    } else {
        let s = msb - width;
        exact &= y.get_loss_kind_for_bit(s).is_exactly_zero();
        y.shift_right(s);
        s as i64
    };

    // Scale y by base^(exp_base - pstr_size).
    let d = pstr_size as i64;
    let err;
    if let Some(log) = utils::power_of_two_base(base) {
        let log = log as i64;
        let mut tmp = sadd(num.exp_base, -d, EXP_MIN, EXP_MAX)?;
        if tmp > 0 && EXP_MAX / log <= tmp {
            return Err(RangeExcursion::Overflow);
        } else if tmp < 0 && EXP_MIN / log >= tmp {
            return Err(RangeExcursion::Underflow);
        }
        tmp *= log;
        tmp = sadd(tmp, num.exp_bin, EXP_MIN, EXP_MAX)?;
        exp = sadd(exp, tmp, EXP_MIN + 2, EXP_MAX - 2)?;
        err = 0;
    } else if num.exp_base > d {
        let pow = pow_with_error(base, (num.exp_base - d) as u64, width)?;
        exact &= pow.err.is_none();

        let mut prod = y * &pow.z;
        let ez = sadd(pow.exp, width as i64, EXP_MIN, EXP_MAX)?;
        exp = sadd(exp, ez, EXP_MIN + 2, EXP_MAX - 2)?;
        if prod.msb_index() < 2 * width {
            prod.shift_left(1);
            exp -= 1;
        }
        // Keep the high half of the product.
        exact &= prod.get_loss_kind_for_bit(width).is_exactly_zero();
        prod.shift_right(width);
        y = prod;
        err = pow.err.unwrap_or(0) + 1;
    } else if num.exp_base < d {
        let neg = if num.exp_base == EXP_MIN {
            EXP_MAX
        } else {
            -num.exp_base
        };
        let e = sadd(d, neg, EXP_MIN, EXP_MAX).map_err(flip)?;
        let pow = pow_with_error(base, e as u64, width)
            .map_err(|_| RangeExcursion::Underflow)?;
        let pow_err = match pow.err {
            Some(pe) => {
                exact = false;
                pe
            }
            None => 0,
        };
        let ez = sadd(pow.exp, width as i64, EXP_MIN, EXP_MAX).map_err(flip)?;
        exp = sadd(exp, -ez, EXP_MIN + 2, EXP_MAX - 2)?;

        // Divide (y * 2^width) by z. The quotient has width or width+1 bits.
        let mut quot = y;
        quot.shift_left(width);
        let rem = quot.inplace_div(&pow.z);
        exact &= rem.is_zero();
        if quot.msb_index() > width {
            exact &= !quot.is_odd();
            quot.shift_right(1);
            exp += 1;
        }
        y = quot;
        err = pow_err + 1;
    } else {
        err = 0;
    }

    trace!(
        base,
        width,
        digits = pstr_size,
        exact,
        err,
        "approximated the digit sequence"
    );
    Ok(Approximation {
        y,
        exp,
        width,
        err,
        exact,
    })
}

/// Returns true if rounding the approximation to the format `sem` with the
/// mode `rm` gives the same result as rounding the exact value. The bits from
/// the rounding position (plus one bit for the nearest modes, to know the
/// direction) to the first uncertain bit must not be all zeros or all ones.
/// Numbers that land in the denormal range have fewer bits of precision.
fn can_round(approx: &Approximation, sem: Semantics, rm: RoundingMode) -> bool {
    let width = approx.width as i64;
    let err0 = width - approx.err as i64 - 1;

    // Bit positions are counted from the msb of y, which is position zero.
    let (exp_min, _) = sem.get_exp_bounds();
    let msb_exp = approx.exp.saturating_add(width - 1);
    let lost = exp_min.saturating_sub(msb_exp).max(0);
    let q = (sem.get_precision() as i64).saturating_sub(lost);
    let lo = q.saturating_add(rm.is_nearest() as i64);

    if err0 <= lo {
        return false;
    }
    // The positions above the msb are zeros, and the msb is one.
    if lo < 0 {
        return err0 > 0;
    }
    let lo_bit = (width - err0) as usize;
    let hi_bit = (width - lo) as usize;
    !approx.y.is_uniform_range(lo_bit, hi_bit)
}

/// Convert the digit sequence into a float with the semantics `sem`.
fn convert(num: &ParsedNumber, sem: Semantics, flags: &mut Flags) -> (Float, Ternary) {
    let rm = sem.get_rounding_mode();
    let precision = sem.get_precision();
    let mut prec = precision + utils::ceil_log2(precision);

    loop {
        let width = prec.div_ceil(64) * 64;
        let approx = match approximate(num, width) {
            Ok(approx) => approx,
            Err(excursion) => {
                debug!(?excursion, width, "exponent out of range");
                let mut value = Float::zero(sem, num.negative);
                let t = match excursion {
                    RangeExcursion::Overflow => value.overflow(rm, flags),
                    RangeExcursion::Underflow => value.underflow(rm, flags),
                };
                return (value, t);
            }
        };

        if approx.exact || can_round(&approx, sem, rm) {
            // The value is y * 2^exp, which is the float with the exponent
            // exp + (precision - 1).
            let exp = approx.exp.saturating_add(precision as i64 - 1);
            let mut value =
                Float::raw(sem, num.negative, exp, approx.y, Category::Normal);
            let t = value.normalize(rm, LossFraction::ExactlyZero, flags);
            return (value, t);
        }

        debug!(width, "can't round, increasing the working precision");
        prec = 2 * width;
    }
}

impl Float {
    /// Parse the number at the beginning of `s` in the base `base` and round it
    /// to the semantics `sem` with its rounding mode. The base is 0 (detect
    /// the base from the prefix: 0x, 0b, or decimal) or in the range 2..=62.
    /// Exceptions are raised in `flags`.
    ///
    /// Text that does not start with a number is parsed as an exact zero,
    /// with the end offset 0.
    ///
    /// # Examples
    ///
    /// ```
    ///    use radixfloat::{Flags, Float, Ternary, FP64};
    ///
    ///    let mut flags = Flags::empty();
    ///    let res = Float::parse_radix("0.1 apples", 10, FP64, &mut flags);
    ///    assert_eq!(res.value.as_f64(), 0.1);
    ///    assert_eq!(res.ternary, Ternary::Above);
    ///    assert_eq!(res.end, 3);
    ///    assert!(flags.contains(Flags::INEXACT));
    /// ```
    pub fn parse_radix(
        s: &str,
        base: u32,
        sem: Semantics,
        flags: &mut Flags,
    ) -> Parsed {
        assert!(base == 0 || (2..=62).contains(&base), "invalid base {}", base);
        let rm = sem.get_rounding_mode();
        let lexed = lex(s, base);
        let (value, ternary) = match lexed.token {
            Token::Invalid => (Float::zero(sem, false), Ternary::Exact),
            Token::NaN => {
                flags.raise(Flags::INVALID);
                (Float::nan(sem, false), Ternary::Exact)
            }
            Token::Inf { negative } => (Float::inf(sem, negative), Ternary::Exact),
            Token::Zero { negative } => {
                (Float::zero(sem, negative), Ternary::Exact)
            }
            Token::ExponentOverflow { negative } => {
                let mut value = Float::zero(sem, negative);
                let t = value.overflow(rm, flags);
                (value, t)
            }
            Token::Number(num) => convert(&num, sem, flags),
        };
        Parsed {
            value,
            ternary,
            end: lexed.end,
        }
    }

    /// Parse the number at the beginning of `s`, detecting the base from the
    /// prefix.
    pub fn parse(s: &str, sem: Semantics) -> Parsed {
        let mut flags = Flags::empty();
        Self::parse_radix(s, 0, sem, &mut flags)
    }
}

#[cfg(test)]
use super::float::{FP128, FP32, FP64};

/// Round the exact rational value digits * base^exp to `sem`. This is the
/// slow reference for the tests.
#[cfg(test)]
fn reference_round(
    negative: bool,
    digits: &[u8],
    base: u32,
    exp: i64,
    sem: Semantics,
) -> (Float, Ternary) {
    let n = BigInt::from_digits(digits, base);
    if n.is_zero() {
        return (Float::zero(sem, negative), Ternary::Exact);
    }
    let pow = BigInt::from_u64(base as u64).powi(exp.unsigned_abs());
    let (mut num, mut den) = if exp >= 0 {
        (n * &pow, BigInt::one())
    } else {
        (n, pow)
    };

    // Scale the quotient to 'precision + 3' bits or more.
    let p = sem.get_precision() as i64;
    let s = p + 3 - (num.msb_index() as i64 - den.msb_index() as i64);
    if s > 0 {
        num.shift_left(s as usize);
    } else {
        den.shift_left(-s as usize);
    }
    let rem = num.inplace_div(&den);
    let sticky = if rem.is_zero() {
        LossFraction::ExactlyZero
    } else {
        LossFraction::LessThanHalf
    };
    let mut flags = Flags::empty();
    let mut x = Float::raw(sem, negative, p - 1 - s, num, Category::Normal);
    let t = x.normalize(sem.get_rounding_mode(), sticky, &mut flags);
    (x, t)
}

#[test]
fn test_pow_with_error() {
    // 10^19 fits in 64 bits.
    let p = pow_with_error(10, 19, 64).unwrap();
    assert!(p.err.is_none());
    let mut expected = BigInt::from_u64(10_000_000_000_000_000_000);
    expected.shift_left(64 - expected.msb_index());
    assert_eq!(p.z, expected);
    assert_eq!(p.exp, 0);

    // 3^100 needs 159 bits.
    let p = pow_with_error(3, 100, 64).unwrap();
    assert_eq!(p.err, Some(10));
    assert_eq!(p.z.msb_index(), 64);
    assert_eq!(p.exp, 159 - 64);
    let mut truncated = BigInt::from_u64(3).powi(100);
    truncated.shift_right(95);
    assert!(p.z <= truncated);
    let mut diff = truncated.clone();
    let _ = diff.inplace_sub(&p.z);
    assert!(diff < BigInt::from_u64(1 << 10));

    // 2^70: the power is exact even after the truncation.
    let p = pow_with_error(2, 70, 64).unwrap();
    assert!(p.err.is_none());
    assert_eq!(p.exp, 70 - 63);

    // The binary exponent of 10^(2^62) does not fit.
    assert!(pow_with_error(10, 1 << 62, 64).is_err());
}

#[test]
fn test_parse_simple_values() {
    let res = Float::parse("123", FP64);
    assert_eq!(res.value.as_f64(), 123.0);
    assert_eq!(res.ternary, Ternary::Exact);
    assert_eq!(res.end, 3);

    let res = Float::parse("0x1.8p0", FP64);
    assert_eq!(res.value.as_f64(), 1.5);
    assert_eq!(res.ternary, Ternary::Exact);
    assert_eq!(res.end, 7);

    let res = Float::parse("-0b101.01", FP32);
    assert_eq!(res.value.as_f64(), -5.25);
    assert!(res.ternary.is_exact());

    let res = Float::parse("1.5e3", FP64);
    assert_eq!(res.value.as_f64(), 1500.0);
    assert!(res.ternary.is_exact());

    let res = Float::parse("25e-2", FP64);
    assert_eq!(res.value.as_f64(), 0.25);
    assert!(res.ternary.is_exact());

    let mut flags = Flags::empty();
    let res = Float::parse_radix("zz@1", 36, FP64, &mut flags);
    assert_eq!(res.value.as_f64(), 35. * 36. * 36. + 35. * 36.);
    assert!(flags.is_empty());

    let res = Float::parse_radix("7.4", 8, FP64, &mut flags);
    assert_eq!(res.value.as_f64(), 7.5);
}

#[test]
fn test_parse_invalid_and_special() {
    let mut flags = Flags::empty();
    let res = Float::parse_radix("abc", 10, FP64, &mut flags);
    assert!(res.value.is_zero() && !res.value.is_negative());
    assert_eq!(res.ternary, Ternary::Exact);
    assert_eq!(res.end, 0);
    assert!(flags.is_empty());

    let res = Float::parse_radix("-nan(x)", 10, FP64, &mut flags);
    assert!(res.value.is_nan());
    assert!(!res.value.is_negative());
    assert_eq!(res.end, 7);
    assert_eq!(flags, Flags::INVALID);

    let res = Float::parse_radix("-@inf@", 62, FP64, &mut flags);
    assert!(res.value.is_inf() && res.value.is_negative());
    assert!(res.ternary.is_exact());

    let res = Float::parse("-0.0e10", FP64);
    assert!(res.value.is_zero() && res.value.is_negative());

    let res = Float::parse("0x", FP64);
    assert!(res.value.is_zero());
    assert_eq!(res.end, 1);
}

#[test]
fn test_parse_overflow_underflow() {
    use RoundingMode::*;
    for (text, sign) in [("1e400", false), ("-1e400", true)] {
        let mut flags = Flags::empty();
        let res = Float::parse_radix(text, 10, FP64, &mut flags);
        assert!(res.value.is_inf());
        assert_eq!(res.value.is_negative(), sign);
        assert!(!res.ternary.is_exact());
        assert!(flags.contains(Flags::OVERFLOW | Flags::INEXACT));

        let res = Float::parse_radix(text, 10, FP64.with_rm(Zero), &mut flags);
        assert_eq!(res.value.as_f64().abs(), f64::MAX);
        assert_eq!(res.ternary, Ternary::from_rounding(sign, false));
    }

    // Tiny numbers.
    let mut flags = Flags::empty();
    let res = Float::parse_radix("1e-400", 10, FP64, &mut flags);
    assert!(res.value.is_zero());
    assert_eq!(res.ternary, Ternary::Below);
    assert!(flags.contains(Flags::UNDERFLOW | Flags::INEXACT));

    let res = Float::parse_radix("1e-400", 10, FP64.with_rm(Positive), &mut flags);
    assert_eq!(res.value.as_f64(), f64::from_bits(1));
    assert_eq!(res.ternary, Ternary::Above);

    // Exponents that exceed the exponent arithmetic.
    let huge = "1e999999999999999999999999";
    let res = Float::parse_radix(huge, 10, FP64.with_rm(Negative), &mut flags);
    assert_eq!(res.value.as_f64(), f64::MAX);
    assert_eq!(res.ternary, Ternary::Below);
    let res = Float::parse_radix("-1@-4611686018427387000", 10, FP64, &mut flags);
    assert!(res.value.is_zero() && res.value.is_negative());
    assert_eq!(res.ternary, Ternary::Above);
    let res = Float::parse_radix("1p-4611686018427387000", 2, FP64.with_rm(Away), &mut flags);
    assert_eq!(res.value.as_f64(), f64::from_bits(1));
    let res = Float::parse_radix("0x1p4611686018427387000", 0, FP64, &mut flags);
    assert!(res.value.is_inf());
}

#[cfg(feature = "std")]
#[test]
fn test_parse_hard_decimal_cases() {
    // 1 + 2^-53 is exactly between two doubles.
    let half = "1.00000000000000011102230246251565404236316680908203125";
    let res = Float::parse(half, FP64);
    assert_eq!(res.value.as_f64(), 1.0);
    assert_eq!(res.ternary, Ternary::Below);

    let above = "1.000000000000000111022302462515654042363166809082031250001";
    let res = Float::parse(above, FP64);
    assert_eq!(res.value.as_f64(), 1.0000000000000002);
    assert_eq!(res.ternary, Ternary::Above);

    let below = "1.000000000000000111022302462515654042363166809082031249999";
    let res = Float::parse(below, FP64);
    assert_eq!(res.value.as_f64(), 1.0);
    assert_eq!(res.ternary, Ternary::Below);

    // Denormals around the smallest double.
    for text in [
        "4.9406564584124654e-324",
        "2.4703282292062328e-324",
        "2.4703282292062327e-324",
        "2.2250738585072011e-308",
        "2.2250738585072012e-308",
        "1.7976931348623157e308",
        "1.7976931348623158e308",
        "0.1",
        "9007199254740993",
        "123456789012345678901234567890e-30",
    ] {
        let expected: f64 = text.parse().unwrap();
        let res = Float::parse(text, FP64);
        assert_eq!(res.value.as_f64().to_bits(), expected.to_bits(), "{}", text);
    }
}

#[cfg(feature = "std")]
#[test]
fn test_parse_matches_std() {
    use super::utils::Lfsr;
    let mut lfsr = Lfsr::new_with_seed(42);

    for _ in 0..2000 {
        let len = lfsr.get_range(1, 40) as usize;
        let mut text = std::string::String::new();
        for i in 0..len {
            let d = lfsr.get_range(0, 10) as u8;
            text.push((b'0' + d) as char);
            if i == 0 && len > 1 {
                text.push('.');
            }
        }
        let e = lfsr.get_range(0, 700) as i64 - 350;
        let text = std::format!("{}e{}", text, e);

        let expected: f64 = text.parse().unwrap();
        let res = Float::parse(&text, FP64);
        assert_eq!(res.value.as_f64().to_bits(), expected.to_bits(), "{}", text);
        assert_eq!(res.end, text.len());

        let f32_expected: f32 = text.parse().unwrap();
        let res = Float::parse(&text, FP32);
        assert_eq!(res.value.as_f32().to_bits(), f32_expected.to_bits(), "{}", text);
    }
}

#[test]
fn test_parse_against_reference() {
    use super::string::digit_char;
    use super::utils::Lfsr;
    use alloc::string::String;
    use alloc::vec::Vec;

    let mut lfsr = Lfsr::new();
    let formats = [
        Semantics::new(8, 8, RoundingMode::NearestTiesToEven),
        FP32,
        FP64,
        FP128,
        Semantics::new(15, 200, RoundingMode::NearestTiesToEven),
    ];

    for iter in 0..300 {
        let base = lfsr.get_range(2, 63) as u32;
        let len = lfsr.get_range(1, 60) as usize;
        let mut digits: Vec<u8> = (0..len)
            .map(|_| lfsr.get_range(0, base as u64) as u8)
            .collect();
        // Runs of the same digit land close to the rounding boundary.
        if iter % 3 == 0 {
            let d = lfsr.get_range(0, base as u64) as u8;
            for x in digits.iter_mut().skip(2) {
                *x = d;
            }
        }
        digits[0] = 1 + lfsr.get_range(0, base as u64 - 1) as u8;
        let exp = lfsr.get_range(0, 80) as i64 - 40;
        let negative = lfsr.get64() % 2 == 0;

        // Write the number as "-d.ddd@exp".
        let mut text = String::new();
        if negative {
            text.push('-');
        }
        for (i, d) in digits.iter().enumerate() {
            text.push(digit_char(*d, base));
            if i == 0 {
                text.push('.');
            }
        }
        text.push('@');
        text.push_str(&alloc::format!("{}", exp));

        for sem in formats {
            for rm in RoundingMode::ALL {
                let sem = sem.with_rm(rm);
                let mut flags = Flags::empty();
                let res = Float::parse_radix(&text, base, sem, &mut flags);
                let scale = exp + 1 - len as i64;
                let (expected, et) =
                    reference_round(negative, &digits, base, scale, sem);
                assert_eq!(res.end, text.len());
                assert_eq!(res.value, expected, "{} in base {}", text, base);
                assert_eq!(res.ternary, et, "{} in base {}", text, base);
                assert_eq!(res.ternary.is_exact(), !flags.contains(Flags::INEXACT));
            }
        }
    }
}
