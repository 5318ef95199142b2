//! This module contains the implementation of string conversion.

extern crate alloc;

use super::bigint::BigInt;
use super::float::{Category, Float, Semantics, FP64};
use super::status::Flags;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::Display;

/// Returns the character of the digit `d` in the base `base`. Bases up to 36
/// use lower case letters. Above 36 the upper case letters come first.
pub(crate) fn digit_char(d: u8, base: u32) -> char {
    debug_assert!((d as u32) < base);
    let c = match d {
        0..=9 => b'0' + d,
        10..=35 if base <= 36 => b'a' + d - 10,
        10..=35 => b'A' + d - 10,
        _ => b'a' + d - 36,
    };
    c as char
}

impl Float {
    /// Convert the number into a large integer, and a base-10 exponent.
    fn convert_to_integer(&self) -> (BigInt, i64) {
        // The natural representation of numbers is 1.mmmmmmm, where the
        // mantissa is aligned to the MSB. In this method we convert the numbers
        // into integers, that start at bit zero, so we use exponent that refers
        //  to bit zero.
        // See Ryu: Fast Float-to-String Conversion -- Ulf Adams.
        // https://youtu.be/kw-U6smcLzk?t=681
        let mut exp = self.get_exp() - self.get_mantissa_len() as i64;
        let mut mantissa: BigInt = self.get_mantissa();

        match exp.cmp(&0) {
            Ordering::Less => {
                // The number is not yet an integer, we need to convert it using
                // the method:
                // mmmmm * 5^(e) * 10 ^(-e) == mmmmm * 10 ^ (-e);
                // where (5^e) * (10^-e) == (2^-e)
                let five = BigInt::from_u64(5);
                let e5 = five.powi((-exp) as u64);
                mantissa.inplace_mul(&e5);
                exp = -exp;
            }
            Ordering::Equal | Ordering::Greater => {
                // The number is already an integer, just align it.
                mantissa.shift_left(exp as usize);
                exp = 0;
            }
        }

        (mantissa, exp)
    }

    /// Reduce a number in the representation mmmmm * e^10, to fewer bits in
    /// 'm', based on the max possible digits in the mantissa.
    fn reduce_printed_integer_length(
        &self,
        integer: &mut BigInt,
        exp: &mut i64,
    ) {
        let bits = integer.msb_index();
        if bits <= self.get_mantissa_len() {
            return;
        };
        let needed_bits = bits - self.get_mantissa_len();
        // We convert from bits to base-10 digits: log(2)/log(10) ==> 59/196.
        // A continuous fraction of 5 iteration gives the ratio.
        let mut digits_to_remove = ((needed_bits * 59) / 196) as i64;

        // Only remove digits after the decimal points.
        if digits_to_remove > *exp {
            digits_to_remove = *exp;
        }
        *exp -= digits_to_remove;
        let ten = BigInt::from_u64(10);
        let divisor = ten.powi(digits_to_remove as u64);
        integer.inplace_div(&divisor);
    }

    fn convert_normal_to_string(&self) -> String {
        // Convert the integer to base-10 integer, and e, the exponent in
        // base 10 (scientific notation).
        let (mut integer, mut e) = self.convert_to_integer();

        // Try to shorten the number.
        self.reduce_printed_integer_length(&mut integer, &mut e);

        let mut buff: Vec<char> = integer
            .to_digits(10)
            .into_iter()
            .map(|d| digit_char(d, 10))
            .collect();

        debug_assert!(e >= 0);
        // Add the leading zeros, and make room to place the point.
        while buff.len() < e as usize {
            buff.insert(0, '0');
        }

        buff.insert(buff.len() - e as usize, '.');
        while !buff.is_empty() && buff[buff.len() - 1] == '0' {
            buff.pop();
        }
        String::from_iter(buff)
    }

    /// Convert the number to a decimal string. This is a simple
    /// implementation that prints the digits that the precision of the
    /// number can carry, without looking for the shortest representation
    /// that parses back to the same value. Use `to_string_radix` for an
    /// exact round trip.
    fn convert_to_string(&self) -> String {
        // In order to print decimal digits we need a minimum number of mantissa
        // bits for the conversion. Small floats (such as BF16) don't have
        // enough bits, so we cast to a larger number.
        if self.get_semantics().get_mantissa_len() < 16 {
            use crate::FP32;
            return self.cast(FP32).to_string();
        }

        let result = if self.get_sign() { "-" } else { "" };
        let mut result: String = result.to_string();

        let body: String = match self.get_category() {
            Category::Infinity => "Inf".to_string(),
            Category::NaN => "NaN".to_string(),
            Category::Normal => self.convert_normal_to_string(),
            Category::Zero => "0.0".to_string(),
        };

        result.push_str(&body);
        result
    }

    /// Returns the exact expansion of the number in the base `base`, in the
    /// form `[-]digits[@exp]`, where the value is the integer `digits` times
    /// base^exp, and the exponent is written in decimal. Parsing the text in
    /// the same base gives back the number. Returns None if the expansion
    /// does not terminate, which happens for fractions in odd bases.
    ///
    /// # Examples
    ///
    /// ```
    ///    use radixfloat::{Float, FP64};
    ///
    ///    let x = Float::from_f64(FP64, -1.5);
    ///    assert_eq!(x.to_string_radix(10).unwrap(), "-15@-1");
    ///    assert_eq!(x.to_string_radix(16).unwrap(), "-18@-1");
    ///    assert_eq!(x.to_string_radix(3), None);
    /// ```
    pub fn to_string_radix(&self, base: u32) -> Option<String> {
        assert!((2..=62).contains(&base), "invalid base {}", base);
        let sign = if self.get_sign() { "-" } else { "" };
        match self.get_category() {
            Category::NaN => return Some("@nan@".to_string()),
            Category::Infinity => return Some(alloc::format!("{}@inf@", sign)),
            Category::Zero => return Some(alloc::format!("{}0", sign)),
            Category::Normal => {}
        }

        // The value is integer * 2^exp, with an odd integer.
        let mut integer = self.get_mantissa();
        let mut exp = self.get_exp() - self.get_mantissa_len() as i64;
        while !integer.is_odd() {
            integer.shift_right(1);
            exp += 1;
        }

        // Find integer * base^radix_exp, with an integer that is not a
        // multiple of the base.
        let mut radix_exp: i64 = 0;
        if exp >= 0 {
            integer.shift_left(exp as usize);
        } else {
            // base = 2^twos * odd. Write 2^exp as odd^j * 2^(twos*j + exp)
            // * base^-j, which needs j >= -exp/twos.
            let twos = base.trailing_zeros() as i64;
            if twos == 0 {
                return None;
            }
            let odd = BigInt::from_u64((base >> twos) as u64);
            let j = (-exp + twos - 1) / twos;
            integer.inplace_mul(&odd.powi(j as u64));
            integer.shift_left((twos * j + exp) as usize);
            radix_exp = -j;
        }

        let mut digits = integer.to_digits(base);
        while digits.len() > 1 && digits[digits.len() - 1] == 0 {
            digits.pop();
            radix_exp += 1;
        }

        let mut result: String = sign.to_string();
        result.extend(digits.iter().map(|d| digit_char(*d, base)));
        if radix_exp != 0 {
            result.push_str(&alloc::format!("@{}", radix_exp));
        }
        Some(result)
    }
}

impl Display for Float {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.convert_to_string())
    }
}

/// The errors of the strict string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("the input provided was empty")]
    InputEmpty,
    #[error("the input does not start with a number")]
    NoDigits,
    #[error("unexpected characters at offset {0}")]
    TrailingCharacters(usize),
}

impl Float {
    /// Try to construct a Float instance with semantics 'sem' from the
    /// string 'value'. The base is detected from the prefix (0x, 0b or
    /// decimal), and the number is correctly rounded with the rounding mode
    /// of `sem`. The whole string must be a number.
    pub fn try_from_str(value: &str, sem: Semantics) -> Result<Self, ParseError> {
        if value.is_empty() {
            return Err(ParseError::InputEmpty);
        }
        let mut flags = Flags::empty();
        let parsed = Float::parse_radix(value, 0, sem, &mut flags);
        if parsed.end == 0 {
            return Err(ParseError::NoDigits);
        }
        if parsed.end != value.len() {
            return Err(ParseError::TrailingCharacters(parsed.end));
        }
        Ok(parsed.value)
    }
}

impl TryFrom<&str> for Float {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from_str(value, FP64)
    }
}

#[cfg(feature = "std")]
#[test]
fn test_convert_to_string() {
    use crate::FP16;
    use core::f64;
    use std::format;

    fn to_str_w_fp16(val: f64) -> String {
        format!("{}", Float::from_f64(FP64, val).cast(FP16))
    }

    fn to_str_w_bf16(val: f64) -> String {
        use crate::BF16;
        format!("{}", Float::from_f64(FP64, val).cast(BF16))
    }

    fn to_str_w_fp64(val: f64) -> String {
        format!("{}", Float::from_f64(FP64, val))
    }

    assert_eq!("-0.0", to_str_w_fp16(-0.));
    assert_eq!(".30004882", to_str_w_fp16(0.3));
    assert_eq!("4.5", to_str_w_fp16(4.5));
    assert_eq!("256.", to_str_w_fp16(256.));
    assert_eq!("Inf", to_str_w_fp16(65534.));
    assert_eq!("-Inf", to_str_w_fp16(-65534.));
    assert_eq!(".09997558", to_str_w_fp16(0.1));
    assert_eq!(".1", to_str_w_fp64(0.1));
    assert_eq!(".29999999999999998", to_str_w_fp64(0.3));
    assert_eq!("2251799813685248.", to_str_w_fp64((1u64 << 51) as f64));
    assert_eq!("1995.1994999999999", to_str_w_fp64(1995.1995));
    assert_eq!("3.140625", to_str_w_bf16(f64::consts::PI));
}

#[test]
fn test_from_string() {
    assert_eq!("-3.", Float::try_from("-3.0").unwrap().to_string());
    assert_eq!("-3.", Float::try_from("-3.00").unwrap().to_string());
    assert_eq!("30.", Float::try_from("30").unwrap().to_string());
    assert_eq!("Inf", Float::try_from("inf").unwrap().to_string());
    assert_eq!("NaN", Float::try_from("nan").unwrap().to_string());
    assert_eq!("32.", Float::try_from("3.2e1").unwrap().to_string());
    assert_eq!("1.5", Float::try_from("0x1.8").unwrap().to_string());
    assert_eq!("-5.", Float::try_from("-0b101").unwrap().to_string());
    assert_eq!("-0.0", Float::try_from("-0").unwrap().to_string());

    assert_eq!(Float::try_from(""), Err(ParseError::InputEmpty));
    assert_eq!(Float::try_from("abc.de"), Err(ParseError::NoDigits));
    assert_eq!(Float::try_from("e.-21"), Err(ParseError::NoDigits));
    assert_eq!(Float::try_from("-rlp."), Err(ParseError::NoDigits));
    assert_eq!(Float::try_from("1.5 "), Err(ParseError::TrailingCharacters(3)));
    assert_eq!(Float::try_from("12e"), Err(ParseError::TrailingCharacters(2)));
    assert_eq!(Float::try_from("1.2.3"), Err(ParseError::TrailingCharacters(3)));
}

#[test]
fn test_parse_error_messages() {
    use alloc::format;
    assert_eq!(format!("{}", ParseError::InputEmpty), "the input provided was empty");
    assert_eq!(
        format!("{}", ParseError::TrailingCharacters(7)),
        "unexpected characters at offset 7"
    );
}

#[test]
fn test_fuzz_printing() {
    use crate::utils;

    let mut lfsr = utils::Lfsr::new();

    for _ in 0..500 {
        let v0 = lfsr.get64();
        let f0 = f64::from_bits(v0);
        let fp0 = Float::from_f64(FP64, f0);
        fp0.to_string();
    }
}

#[test]
fn test_radix_strings() {
    let s = |v: f64, base: u32| Float::from_f64(FP64, v).to_string_radix(base);
    assert_eq!(s(1.5, 10).unwrap(), "15@-1");
    assert_eq!(s(255., 16).unwrap(), "ff");
    assert_eq!(s(256., 16).unwrap(), "1@2");
    assert_eq!(s(-0.5, 2).unwrap(), "-1@-1");
    assert_eq!(s(0.75, 8).unwrap(), "6@-1");
    assert_eq!(s(9., 3).unwrap(), "1@2");
    assert_eq!(s(10., 3).unwrap(), "101");
    assert_eq!(s(0.5, 3), None);
    assert_eq!(s(35., 36).unwrap(), "z");
    assert_eq!(s(10., 40).unwrap(), "A");
    assert_eq!(s(36., 62).unwrap(), "a");
    assert_eq!(s(61., 62).unwrap(), "z");
    assert_eq!(s(62., 62).unwrap(), "1@1");
    assert_eq!(s(1e22, 10).unwrap(), "1@22");

    assert_eq!(s(f64::NAN, 10).unwrap(), "@nan@");
    assert_eq!(s(f64::INFINITY, 62).unwrap(), "@inf@");
    assert_eq!(s(f64::NEG_INFINITY, 2).unwrap(), "-@inf@");
    assert_eq!(s(0., 7).unwrap(), "0");
    assert_eq!(s(-0., 7).unwrap(), "-0");

    // The smallest denormal.
    let tiny = s(f64::from_bits(1), 2).unwrap();
    assert_eq!(tiny, "1@-1074");
}

#[test]
fn test_radix_round_trip() {
    use crate::utils::Lfsr;
    use crate::{RoundingMode, FP16, FP32};

    let mut lfsr = Lfsr::new_with_seed(99);
    let formats = [FP16, FP32, FP64];

    for _ in 0..60 {
        let bits = lfsr.get64();
        for sem in formats {
            let width = sem.get_exponent_len() + sem.get_mantissa_len() + 1;
            let x = Float::from_bits(sem, bits & (u64::MAX >> (64 - width)));
            for base in [2, 8, 10, 16, 36, 62] {
                let text = x.to_string_radix(base).unwrap();
                for rm in [RoundingMode::NearestTiesToEven, RoundingMode::Zero] {
                    let mut flags = Flags::empty();
                    let res = Float::parse_radix(&text, base, sem.with_rm(rm), &mut flags);
                    assert_eq!(res.end, text.len(), "{}", text);
                    if x.is_nan() {
                        assert!(res.value.is_nan());
                        continue;
                    }
                    assert!(res.ternary.is_exact(), "{} in base {}", text, base);
                    assert_eq!(res.value, x, "{} in base {}", text, base);
                    assert_eq!(res.value.get_sign(), x.get_sign());
                    assert!(!flags.contains(Flags::INEXACT));
                }
            }
        }
    }
}
