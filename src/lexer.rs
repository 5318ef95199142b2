//! Tokenizer for numeric literals. This module validates the text and turns
//! it into a digit sequence with a base exponent and a binary exponent, or
//! into one of the terminal outcomes (invalid text, zero, NaN, Inf, exponent
//! overflow).

extern crate alloc;
use crate::utils::{sadd, EXP_MAX, EXP_MIN};
use alloc::vec::Vec;

/// A sequence of digits and the exponents that scale it. The value of the
/// number is 0.d1d2d3... * base^exp_base * 2^exp_bin.
#[derive(Debug, Clone)]
pub(crate) struct ParsedNumber {
    pub negative: bool,
    pub base: u32,
    // Digits in the range 0..base. The digits before `start` are the
    // stripped leading zeros.
    digits: Vec<u8>,
    start: usize,
    pub exp_base: i64,
    pub exp_bin: i64,
}

impl ParsedNumber {
    /// Returns the digits of the mantissa, without leading or trailing zeros.
    pub fn mantissa(&self) -> &[u8] {
        &self.digits[self.start..]
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Token {
    /// No digits were found.
    Invalid,
    NaN,
    Inf { negative: bool },
    Zero { negative: bool },
    Number(ParsedNumber),
    /// The exponent field pushed the number beyond the representable range.
    ExponentOverflow { negative: bool },
}

/// The token and the offset of the first byte that was not consumed.
#[derive(Debug, Clone)]
pub(crate) struct Lexed {
    pub token: Token,
    pub end: usize,
}

/// Returns true for the whitespace characters of the "C" locale.
fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Returns the value of the digit `c` in the base `base`, or None if the
/// character is not a digit. Letters are case insensitive for bases up to
/// 36. Above 36 the upper case letters are 10..35 and the lower case letters
/// are 36..61.
pub(crate) fn digit_value(c: u8, base: u32) -> Option<u8> {
    let digit = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'z' if base >= 37 => c - b'a' + 36,
        b'a'..=b'z' => c - b'a' + 10,
        b'A'..=b'Z' => c - b'A' + 10,
        _ => return None,
    };
    if (digit as u32) < base {
        Some(digit)
    } else {
        None
    }
}

/// Returns true if `s` starts with the lower case `prefix`, ignoring the case
/// of `s`.
fn starts_with_ignore_case(s: &[u8], prefix: &[u8]) -> bool {
    s.len() >= prefix.len()
        && s.iter()
            .zip(prefix)
            .all(|(a, b)| a.to_ascii_lowercase() == *b)
}

/// Read a signed decimal integer at the beginning of `s`, saturating to the
/// exponent range. Returns the value and the number of consumed bytes, which
/// is zero if there are no digits.
fn read_exponent(s: &[u8]) -> (i64, usize) {
    let mut pos = 0;
    let negative = s.first() == Some(&b'-');
    if matches!(s.first(), Some(b'-') | Some(b'+')) {
        pos += 1;
    }
    let digits = s[pos..].iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return (0, 0);
    }
    let mut val: i64 = 0;
    for c in &s[pos..pos + digits] {
        val = val.saturating_mul(10).saturating_add((c - b'0') as i64);
    }
    let val = if negative { -val } else { val };
    (val.clamp(EXP_MIN, EXP_MAX), pos + digits)
}

/// Tokenize the beginning of `input`. The base is 0 (auto detect) or in the
/// range 2..=62.
pub(crate) fn lex(input: &str, base: u32) -> Lexed {
    let s = input.as_bytes();
    let at = |i: usize| -> u8 { s.get(i).copied().unwrap_or(0) };

    let mut pos = 0;
    while is_space(at(pos)) {
        pos += 1;
    }

    // An optional sign.
    let negative = at(pos) == b'-';
    if matches!(at(pos), b'-' | b'+') {
        pos += 1;
    }

    // Handle NaN with an optional "(tag)", which is ignored.
    let rest = &s[pos..];
    let nan_len = if starts_with_ignore_case(rest, b"@nan@") {
        Some(5)
    } else if base <= 16 && starts_with_ignore_case(rest, b"nan") {
        Some(3)
    } else {
        None
    };
    if let Some(len) = nan_len {
        let mut end = pos + len;
        if at(end) == b'(' {
            let mut tag = end + 1;
            while at(tag).is_ascii_alphanumeric() || at(tag) == b'_' {
                tag += 1;
            }
            if at(tag) == b')' {
                end = tag + 1;
            }
        }
        return Lexed {
            token: Token::NaN,
            end,
        };
    }

    // Handle infinity.
    let inf_len = if starts_with_ignore_case(rest, b"@inf@") {
        Some(5)
    } else if base <= 16 && starts_with_ignore_case(rest, b"infinity") {
        Some(8)
    } else if base <= 16 && starts_with_ignore_case(rest, b"inf") {
        Some(3)
    } else {
        None
    };
    if let Some(len) = inf_len {
        return Lexed {
            token: Token::Inf { negative },
            end: pos + len,
        };
    }

    // Detect the 0x and 0b prefixes.
    let mut base = base;
    let mut prefix = None;
    if (base == 0 || base == 16)
        && at(pos) == b'0'
        && matches!(at(pos + 1), b'x' | b'X')
    {
        prefix = Some(pos);
        base = 16;
        pos += 2;
    }
    if (base == 0 || base == 2)
        && at(pos) == b'0'
        && matches!(at(pos + 1), b'b' | b'B')
    {
        prefix = Some(pos);
        base = 2;
        pos += 2;
    }
    if base == 0 {
        base = 10;
    }

    // Read the mantissa digits, with at most one point.
    let mut digits: Vec<u8> = Vec::with_capacity(s.len() - pos);
    let mut exp_base: i64;
    loop {
        digits.clear();
        exp_base = 0;
        let mut point = false;
        while pos < s.len() {
            let c = s[pos];
            if c == b'.' {
                if point {
                    break;
                }
                point = true;
                pos += 1;
                continue;
            }
            match digit_value(c, base) {
                Some(d) => {
                    digits.push(d);
                    if !point {
                        exp_base += 1;
                    }
                }
                None => break,
            }
            pos += 1;
        }

        if !digits.is_empty() {
            break;
        }
        // Read the prefix again as digits. "0x" is the number zero followed
        // by the letter x.
        match prefix.take() {
            Some(start) => pos = start,
            None => {
                return Lexed {
                    token: Token::Invalid,
                    end: 0,
                }
            }
        }
    }

    // An optional exponent.
    let mut exp_bin = 0;
    let mut overflow = false;
    let marker = at(pos);
    let next = at(pos + 1);
    if (marker == b'@' || (base <= 10 && (marker == b'e' || marker == b'E')))
        && !is_space(next)
    {
        let (read, len) = read_exponent(&s[pos + 1..]);
        if len > 0 {
            pos += 1 + len;
        }
        match sadd(read, exp_base, EXP_MIN, EXP_MAX) {
            Ok(sum) => exp_base = sum,
            Err(_) => {
                overflow = true;
                exp_base = EXP_MAX;
            }
        }
    } else if (base == 2 || base == 16)
        && (marker == b'p' || marker == b'P')
        && !is_space(next)
    {
        let (read, len) = read_exponent(&s[pos + 1..]);
        if len > 0 {
            pos += 1 + len;
        }
        exp_bin = read;
    }

    // Strip the leading and trailing zeros.
    let mut start = 0;
    while start < digits.len() && digits[start] == 0 {
        start += 1;
        if exp_base != EXP_MIN {
            exp_base -= 1;
        }
    }
    while digits.len() > start && digits[digits.len() - 1] == 0 {
        digits.pop();
    }

    let token = if start == digits.len() {
        Token::Zero { negative }
    } else if overflow {
        Token::ExponentOverflow { negative }
    } else {
        Token::Number(ParsedNumber {
            negative,
            base,
            digits,
            start,
            exp_base,
            exp_bin,
        })
    };
    Lexed { token, end: pos }
}

#[cfg(test)]
fn lex_number(input: &str, base: u32) -> (ParsedNumber, usize) {
    let lexed = lex(input, base);
    match lexed.token {
        Token::Number(num) => (num, lexed.end),
        other => panic!("expected a number, got {:?}", other),
    }
}

#[test]
fn test_digit_values() {
    assert_eq!(digit_value(b'7', 8), Some(7));
    assert_eq!(digit_value(b'8', 8), None);
    assert_eq!(digit_value(b'f', 16), Some(15));
    assert_eq!(digit_value(b'F', 16), Some(15));
    assert_eq!(digit_value(b'z', 36), Some(35));
    assert_eq!(digit_value(b'Z', 36), Some(35));
    assert_eq!(digit_value(b'a', 37), Some(36));
    assert_eq!(digit_value(b'A', 37), Some(10));
    assert_eq!(digit_value(b'z', 62), Some(61));
    assert_eq!(digit_value(b'z', 61), None);
    assert_eq!(digit_value(b'.', 62), None);
}

#[test]
fn test_lex_numbers() {
    let (num, end) = lex_number("  -00123.4500e2xyz", 10);
    assert!(num.negative);
    assert_eq!(num.base, 10);
    assert_eq!(num.mantissa(), &[1, 2, 3, 4, 5]);
    assert_eq!(num.exp_base, 5);
    assert_eq!(num.exp_bin, 0);
    assert_eq!(end, 15);

    let (num, end) = lex_number("0x1.8p-3", 0);
    assert_eq!(num.base, 16);
    assert_eq!(num.mantissa(), &[1, 8]);
    assert_eq!(num.exp_base, 1);
    assert_eq!(num.exp_bin, -3);
    assert_eq!(end, 8);

    let (num, _) = lex_number("0B101", 0);
    assert_eq!(num.base, 2);
    assert_eq!(num.mantissa(), &[1, 0, 1]);

    let (num, end) = lex_number(".0025@-1", 10);
    assert_eq!(num.mantissa(), &[2, 5]);
    assert_eq!(num.exp_base, -3);
    assert_eq!(end, 8);

    // A second point stops the scan.
    let (num, end) = lex_number("1.5.5", 10);
    assert_eq!(num.mantissa(), &[1, 5]);
    assert_eq!(end, 3);

    // 'e' is a digit in base 16, and 'p' is not an exponent in base 10.
    let (num, end) = lex_number("1e5", 16);
    assert_eq!(num.mantissa(), &[1, 14, 5]);
    assert_eq!(end, 3);
    let (num, end) = lex_number("1p5", 10);
    assert_eq!(num.mantissa(), &[1]);
    assert_eq!(end, 1);

    // All of the C locale whitespace is skipped before the sign.
    let (num, end) = lex_number("\x0b\x0c-1.5", 10);
    assert!(num.negative);
    assert_eq!(num.mantissa(), &[1, 5]);
    assert_eq!(end, 6);
    let (num, end) = lex_number("\t\n\r +7", 8);
    assert!(!num.negative);
    assert_eq!(num.mantissa(), &[7]);
    assert_eq!(end, 6);

    // Base 62 is case sensitive.
    let (num, _) = lex_number("zZ", 62);
    assert_eq!(num.mantissa(), &[61, 35]);
}

#[test]
fn test_lex_exponent_markers() {
    // A space after the marker, or a marker without digits, is not consumed.
    let (num, end) = lex_number("12e 5", 10);
    assert_eq!(num.exp_base, 2);
    assert_eq!(end, 2);
    let (num, end) = lex_number("12e+", 10);
    assert_eq!(num.exp_base, 2);
    assert_eq!(end, 2);
    let (_, end) = lex_number("12@", 10);
    assert_eq!(end, 2);
    for text in ["12e\t5", "12e\n5", "12@\x0b5", "12@\x0c5", "12e\r5"] {
        let (num, end) = lex_number(text, 10);
        assert_eq!(num.exp_base, 2, "{:?}", text);
        assert_eq!(end, 2, "{:?}", text);
    }
    let (num, end) = lex_number("1p\t3", 2);
    assert_eq!(num.exp_bin, 0);
    assert_eq!(end, 1);

    // Exponents saturate.
    let (num, _) = lex_number("1p99999999999999999999999", 2);
    assert_eq!(num.exp_bin, EXP_MAX);
    let (num, _) = lex_number("1e-99999999999999999999999", 10);
    assert_eq!(num.exp_base, EXP_MIN + 1);

    let lexed = lex("-1e99999999999999999999999", 10);
    assert!(matches!(lexed.token, Token::ExponentOverflow { negative: true }));
    assert_eq!(lexed.end, 26);

    // Zero wins over the exponent overflow.
    let lexed = lex("0e99999999999999999999999", 10);
    assert!(matches!(lexed.token, Token::Zero { negative: false }));
}

#[test]
fn test_lex_special_values() {
    let lexed = lex("nan(abc_12)rest", 10);
    assert!(matches!(lexed.token, Token::NaN));
    assert_eq!(lexed.end, 11);

    // The tag is not consumed if it is not closed.
    let lexed = lex("-NaN(abc", 10);
    assert!(matches!(lexed.token, Token::NaN));
    assert_eq!(lexed.end, 4);

    let lexed = lex("@NaN@", 62);
    assert!(matches!(lexed.token, Token::NaN));
    assert_eq!(lexed.end, 5);

    let lexed = lex("-Infinity", 10);
    assert!(matches!(lexed.token, Token::Inf { negative: true }));
    assert_eq!(lexed.end, 9);

    let lexed = lex("+infx", 16);
    assert!(matches!(lexed.token, Token::Inf { negative: false }));
    assert_eq!(lexed.end, 4);

    // In base 36 these are digits.
    let (num, _) = lex_number("inf", 36);
    assert_eq!(num.mantissa(), &[18, 23, 15]);
    let (num, _) = lex_number("nan", 36);
    assert_eq!(num.mantissa(), &[23, 10, 23]);
}

#[test]
fn test_lex_zero_and_invalid() {
    let lexed = lex("0x", 0);
    assert!(matches!(lexed.token, Token::Zero { negative: false }));
    assert_eq!(lexed.end, 1);

    let lexed = lex("-0b2", 0);
    assert!(matches!(lexed.token, Token::Zero { negative: true }));
    assert_eq!(lexed.end, 2);

    let lexed = lex("-000.000", 10);
    assert!(matches!(lexed.token, Token::Zero { negative: true }));
    assert_eq!(lexed.end, 8);

    for text in ["abc", "", "   ", "-", "+.", ".e5", "@"] {
        let lexed = lex(text, 10);
        assert!(matches!(lexed.token, Token::Invalid), "{}", text);
        assert_eq!(lexed.end, 0);
    }
}
