//! This module contains the limb engine that backs the significand of the
//! float and all of the integer work that the string conversion needs: the
//! digit-string to limbs conversion, shifts, multiplication and division with
//! remainder.

extern crate alloc;

use core::cmp::Ordering;
use core::ops::{Add, Mul};

use alloc::vec::Vec;

/// Reports the kind of values that are lost when we shift right bits. In some
/// context this used as the two guard bits.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LossFraction {
    ExactlyZero,  //0000000
    LessThanHalf, //0xxxxxx
    ExactlyHalf,  //1000000
    MoreThanHalf, //1xxxxxx
}

impl LossFraction {
    pub fn is_exactly_zero(&self) -> bool {
        matches!(self, Self::ExactlyZero)
    }
    #[cfg(test)]
    pub fn is_lt_half(&self) -> bool {
        matches!(self, Self::LessThanHalf) || self.is_exactly_zero()
    }
    pub fn is_exactly_half(&self) -> bool {
        matches!(self, Self::ExactlyHalf)
    }
    pub fn is_mt_half(&self) -> bool {
        matches!(self, Self::MoreThanHalf)
    }
    pub fn is_gte_half(&self) -> bool {
        self.is_mt_half() || self.is_exactly_half()
    }
}

/// This is an arbitrary-size unsigned big number implementation. It is used to
/// store the mantissa of the floating point number, and as the scratch integer
/// of the string conversion loop. The BigInt data structure is backed by
/// `Vec<u64>` limbs (least significant first), and the data is
/// heap-allocated.
///
/// # Examples
///
/// ```
///    use radixfloat::BigInt;
///
///    let x = BigInt::from_digits(&[1, 9, 9, 5], 10);
///    let y = BigInt::from_u64(90210);
///
///    let z = x * y;
///    assert_eq!(z.as_u64(), 1995 * 90210);
/// ```
///
#[derive(Debug, Clone)]
pub struct BigInt {
    parts: Vec<u64>,
}

impl BigInt {
    /// Create a new zero big int number.
    pub fn zero() -> Self {
        BigInt::from_u64(0)
    }

    /// Create a new number with the value 1.
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    /// Create a new number with a single '1' set at bit `bit`.
    pub fn one_hot(bit: usize) -> Self {
        let mut x = Self::zero();
        x.flip_bit(bit);
        x
    }

    /// Create a new number, where the first `bits` bits are set to 1.
    pub fn all1s(bits: usize) -> Self {
        if bits == 0 {
            return Self::zero();
        }
        let mut x = Self::one();
        x.shift_left(bits);
        let _ = x.inplace_sub(&Self::one());
        debug_assert_eq!(x.msb_index(), bits);
        x
    }

    /// Create a number and set the lowest 64 bits to `val`.
    pub fn from_u64(val: u64) -> Self {
        let vec = Vec::from([val]);
        BigInt { parts: vec }
    }

    // Construct a bigint from the words in 'parts'.
    pub fn from_parts(parts: &[u64]) -> Self {
        if parts.is_empty() {
            return Self::zero();
        }
        BigInt {
            parts: parts.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the lowest 64 bits.
    pub fn as_u64(&self) -> u64 {
        for i in 1..self.len() {
            debug_assert_eq!(self.parts[i], 0);
        }
        self.parts[0]
    }

    /// Return true if the number is equal to zero.
    pub fn is_zero(&self) -> bool {
        self.parts.iter().all(|elem| *elem == 0)
    }

    /// Returns true if this number is odd.
    pub fn is_odd(&self) -> bool {
        (self.parts[0] & 0x1) == 1
    }

    /// Flip the `bit_num` bit.
    pub fn flip_bit(&mut self, bit_num: usize) {
        let which_word = bit_num / u64::BITS as usize;
        let bit_in_word = bit_num % u64::BITS as usize;
        self.grow(which_word + 1);
        self.parts[which_word] ^= 1 << bit_in_word;
    }

    /// Zero out all of the bits above `bits`.
    pub fn mask(&mut self, bits: usize) {
        let mut bits = bits;
        for i in 0..self.len() {
            if bits >= 64 {
                bits -= 64;
                continue;
            }

            if bits == 0 {
                self.parts[i] = 0;
                continue;
            }

            let mask = (1u64 << bits) - 1;
            self.parts[i] &= mask;
            bits = 0;
        }
    }

    /// Returns the fractional part that's lost during truncation at `bit`.
    pub(crate) fn get_loss_kind_for_bit(&self, bit: usize) -> LossFraction {
        if self.is_zero() || bit == 0 {
            return LossFraction::ExactlyZero;
        }
        if bit > self.len() * 64 {
            return LossFraction::LessThanHalf;
        }
        let mut a = self.clone();
        a.mask(bit);
        if a.is_zero() {
            return LossFraction::ExactlyZero;
        }
        let half = Self::one_hot(bit - 1);
        match a.cmp(&half) {
            Ordering::Less => LossFraction::LessThanHalf,
            Ordering::Equal => LossFraction::ExactlyHalf,
            Ordering::Greater => LossFraction::MoreThanHalf,
        }
    }

    /// Returns true if the bits in the range [lo, hi) are all zeros or all
    /// ones. An empty range is reported as uniform.
    pub(crate) fn is_uniform_range(&self, lo: usize, hi: usize) -> bool {
        if hi <= lo {
            return true;
        }
        let mut window = self.clone();
        window.shift_right(lo);
        window.mask(hi - lo);
        window.is_zero() || window == Self::all1s(hi - lo)
    }

    /// Returns the index of the most significant bit (the highest '1'),
    /// using 1-based counting (the first bit is 1, and zero means no bits are
    /// set).
    pub fn msb_index(&self) -> usize {
        for i in (0..self.len()).rev() {
            let part = self.parts[i];
            if part != 0 {
                let idx = 64 - part.leading_zeros() as usize;
                return i * 64 + idx;
            }
        }
        0
    }

    /// Ensure that there are at least 'size' words in the bigint.
    pub fn grow(&mut self, size: usize) {
        if self.len() < size {
            self.parts.resize(size, 0);
        }
    }

    /// Remove the leading zero words from the bigint.
    fn shrink(&mut self) {
        while self.len() > 2 && self.parts[self.len() - 1] == 0 {
            self.parts.pop();
        }
    }

    /// Add `rhs` to this number.
    pub fn inplace_add(&mut self, rhs: &Self) {
        self.inplace_add_slice(&rhs.parts[..]);
    }

    /// Implements addition of the 'rhs' sequence of words to this number.
    #[allow(clippy::needless_range_loop)]
    pub(crate) fn inplace_add_slice(&mut self, rhs: &[u64]) {
        self.grow(rhs.len());
        let mut carry: bool = false;
        for i in 0..rhs.len() {
            let first = self.parts[i].overflowing_add(rhs[i]);
            let second = first.0.overflowing_add(carry as u64);
            carry = first.1 || second.1;
            self.parts[i] = second.0;
        }
        // Continue to propagate the carry flag.
        for i in rhs.len()..self.len() {
            let second = self.parts[i].overflowing_add(carry as u64);
            carry = second.1;
            self.parts[i] = second.0;
        }
        if carry {
            self.parts.push(1);
        }
        self.shrink()
    }

    /// Subtract `rhs` from self, and return true if the operation overflowed
    /// (borrow).
    #[must_use]
    pub fn inplace_sub(&mut self, rhs: &Self) -> bool {
        self.inplace_sub_slice(&rhs.parts[..], 0)
    }

    /// Implements subtraction of the 'rhs' sequence of words to this number.
    /// The parameter `bottom_zeros` specifies how many lower *words* in `rhs`
    /// are zeros and can be ignored. This is used by the division algorithm
    /// that shifts the divisor.
    #[allow(clippy::needless_range_loop)]
    fn inplace_sub_slice(&mut self, rhs: &[u64], bottom_zeros: usize) -> bool {
        self.grow(rhs.len());
        let mut borrow: bool = false;

        for i in bottom_zeros..rhs.len() {
            let first = self.parts[i].overflowing_sub(rhs[i]);
            let second = first.0.overflowing_sub(borrow as u64);
            borrow = first.1 || second.1;
            self.parts[i] = second.0;
        }
        // Propagate the borrow bit.
        for i in rhs.len()..self.len() {
            let second = self.parts[i].overflowing_sub(borrow as u64);
            self.parts[i] = second.0;
            borrow = second.1;
        }
        self.shrink();
        borrow
    }

    /// Multiply self by the single word `rhs`.
    pub(crate) fn inplace_mul_word(&mut self, rhs: u64) {
        let mut carry: u64 = 0;
        for part in self.parts.iter_mut() {
            let wide = (*part as u128) * (rhs as u128) + carry as u128;
            *part = wide as u64;
            carry = (wide >> 64) as u64;
        }
        if carry != 0 {
            self.parts.push(carry);
        }
        self.shrink();
    }

    /// Multiply `rhs` to self.
    pub fn inplace_mul(&mut self, rhs: &Self) {
        if self.len() > KARATSUBA_SIZE_THRESHOLD
            || rhs.len() > KARATSUBA_SIZE_THRESHOLD
        {
            *self = Self::mul_karatsuba(&self.parts, &rhs.parts);
            self.shrink();
            return;
        }
        self.inplace_mul_slice(&rhs.parts);
    }

    /// Implements multiplication of the 'rhs' sequence of words to this number.
    fn inplace_mul_slice(&mut self, rhs: &[u64]) {
        let size = self.len() + rhs.len() + 1;
        let mut parts: Vec<u64> = alloc::vec![0; size];
        let mut carries: Vec<u64> = alloc::vec![0; size];

        for i in 0..self.len() {
            for j in 0..rhs.len() {
                let pi = self.parts[i] as u128;
                let pij = pi * rhs[j] as u128;

                let add0 = parts[i + j].overflowing_add(pij as u64);
                parts[i + j] = add0.0;
                carries[i + j] += add0.1 as u64;
                let add1 = parts[i + j + 1].overflowing_add((pij >> 64) as u64);
                parts[i + j + 1] = add1.0;
                carries[i + j + 1] += add1.1 as u64;
            }
        }
        self.grow(size);
        let mut carry: u64 = 0;
        for i in 0..size {
            let add0 = parts[i].overflowing_add(carry);
            self.parts[i] = add0.0;
            carry = add0.1 as u64 + carries[i];
        }
        self.shrink();
        debug_assert!(carry == 0);
    }

    /// Divide self by `divisor`, and return the remainder.
    pub fn inplace_div(&mut self, divisor: &Self) -> Self {
        let mut dividend = self.clone();
        let mut divisor = divisor.clone();
        let mut quotient = Self::zero();

        // Single word division.
        if self.len() == 1 && divisor.len() == 1 {
            let a = dividend.parts[0];
            let b = divisor.parts[0];
            self.parts[0] = a / b;
            return Self::from_u64(a % b);
        }

        let dividend_msb = dividend.msb_index();
        let divisor_msb = divisor.msb_index();
        assert_ne!(divisor_msb, 0, "division by zero");

        if divisor_msb > dividend_msb {
            let ret = self.clone();
            *self = Self::zero();
            return ret;
        }

        // Align the first bit of the divisor with the first bit of the
        // dividend.
        let bits = dividend_msb - divisor_msb;
        divisor.shift_left(bits);

        // Perform the long division.
        for i in (0..bits + 1).rev() {
            // Find out how many of the lower words of the divisor are zeros.
            let low_zeros = i / 64;

            if dividend >= divisor {
                let overflow = dividend.inplace_sub_slice(&divisor.parts, low_zeros);
                debug_assert!(!overflow);
                quotient.flip_bit(i);
            }
            divisor.shift_right(1);
        }

        *self = quotient;
        self.shrink();
        dividend.shrink();
        dividend
    }

    /// Shift the bits in the numbers `bits` to the left.
    pub fn shift_left(&mut self, bits: usize) {
        let words_to_shift = bits / u64::BITS as usize;
        let bits_in_word = bits % u64::BITS as usize;

        self.parts.resize(self.len() + words_to_shift + 1, 0);

        // If we only need to move blocks.
        if bits_in_word == 0 {
            for i in (0..self.len()).rev() {
                self.parts[i] = if i >= words_to_shift {
                    self.parts[i - words_to_shift]
                } else {
                    0
                };
            }
            self.shrink();
            return;
        }

        for i in (0..self.len()).rev() {
            let left_val = if i >= words_to_shift {
                self.parts[i - words_to_shift]
            } else {
                0
            };
            let right_val = if i > words_to_shift {
                self.parts[i - words_to_shift - 1]
            } else {
                0
            };
            let right = right_val >> (u64::BITS as usize - bits_in_word);
            let left = left_val << bits_in_word;
            self.parts[i] = left | right;
        }
        self.shrink();
    }

    /// Shift the bits in the numbers `bits` to the right.
    pub fn shift_right(&mut self, bits: usize) {
        let words_to_shift = bits / u64::BITS as usize;
        let bits_in_word = bits % u64::BITS as usize;

        if words_to_shift >= self.len() {
            self.parts.iter_mut().for_each(|p| *p = 0);
            self.shrink();
            return;
        }

        // If we only need to move blocks.
        if bits_in_word == 0 {
            for i in 0..self.len() {
                self.parts[i] = if i + words_to_shift < self.len() {
                    self.parts[i + words_to_shift]
                } else {
                    0
                };
            }
            self.shrink();
            return;
        }

        for i in 0..self.len() {
            let left_val = if i + words_to_shift < self.len() {
                self.parts[i + words_to_shift]
            } else {
                0
            };
            let right_val = if i + 1 + words_to_shift < self.len() {
                self.parts[i + 1 + words_to_shift]
            } else {
                0
            };
            let right = right_val << (u64::BITS as usize - bits_in_word);
            let left = left_val >> bits_in_word;
            self.parts[i] = left | right;
        }
        self.shrink();
    }

    /// Raise this number to the power of `exp` and return the value.
    pub fn powi(&self, mut exp: u64) -> Self {
        let mut v = Self::one();
        let mut base = self.clone();
        loop {
            if exp & 0x1 == 1 {
                v.inplace_mul(&base);
            }
            exp >>= 1;
            if exp == 0 {
                break;
            }
            base.inplace_mul(&base.clone());
        }
        v
    }

    /// Returns the word at idx `idx`.
    pub fn get_part(&self, idx: usize) -> u64 {
        self.parts[idx]
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

/// Returns the largest `k` such that `base^k` fits in a word, together with
/// `base^k`.
fn digits_per_word(base: u64) -> (usize, u64) {
    let mut k = 0;
    let mut power: u64 = 1;
    while let Some(next) = power.checked_mul(base) {
        power = next;
        k += 1;
    }
    (k, power)
}

impl BigInt {
    /// Build a number from a big-endian sequence of digits, each in the
    /// range 0..base. Digits are consumed one machine word at a time.
    pub fn from_digits(digits: &[u8], base: u32) -> Self {
        debug_assert!((2..=62).contains(&base));
        let base = base as u64;
        let (k, _) = digits_per_word(base);
        let mut num = Self::zero();
        for chunk in digits.chunks(k) {
            let mut acc: u64 = 0;
            let mut scale: u64 = 1;
            for d in chunk {
                debug_assert!((*d as u64) < base, "digit out of range");
                acc = acc * base + *d as u64;
                scale *= base;
            }
            num.inplace_mul_word(scale);
            num.inplace_add_slice(&[acc]);
        }
        num
    }

    /// Converts this number into a sequence of digits in the range 0..base.
    /// Use a recursive algorithm to split the number in half, if the number is
    /// too big.
    /// Return the number of digits that were converted.
    fn to_digits_impl(
        num: &mut BigInt,
        base: u64,
        num_digits: usize,
        output: &mut Vec<u8>,
    ) -> usize {
        const SPLIT_WORD_THRESHOLD: usize = 5;

        // Figure out how many digits fit in a single word.
        let (digits_per_word, word_divisor) = digits_per_word(base);

        // If the word is too big, split it in half.
        let len = num.len();
        if len > SPLIT_WORD_THRESHOLD && num_digits > digits_per_word {
            let half = len / 2 - 1;
            // Figure out how many digits to extract:
            let k = (digits_per_word * half).min(num_digits);
            // Create a mega digit (a*a*a*a....).
            let mega_digit = BigInt::from_u64(base).powi(k as u64);
            // Extract the lowest k digits.
            let mut rem = num.inplace_div(&mega_digit);

            // Convert the two parts to digits:
            let tail = Self::to_digits_impl(&mut rem, base, k, output);
            let hd = Self::to_digits_impl(num, base, num_digits - k, output);
            debug_assert_eq!(tail, k);
            debug_assert_eq!(hd, num_digits - k);
            return num_digits;
        }

        let mut extracted = 0;

        let divisor = BigInt::from_u64(word_divisor);
        // For each word:
        for _ in 0..(num_digits / digits_per_word) {
            // Pull a single word of [a*a*a*a ....].
            let mut rem = num.inplace_div(&divisor);
            // This is fast because we operate on a single word.
            extracted += digits_per_word;
            Self::extract_digits(base, digits_per_word, &mut rem, output);
        }

        // Handle the rest of the digits.
        let iters = num_digits % digits_per_word;
        Self::extract_digits(base, iters, num, output);
        extracted += iters;

        extracted
    }

    // Extract 'iter' digits from 'num', one by one, and push them to 'vec'.
    fn extract_digits(
        base: u64,
        iter: usize,
        num: &mut BigInt,
        vec: &mut Vec<u8>,
    ) {
        let digit = BigInt::from_u64(base);
        for _ in 0..iter {
            let d = num.inplace_div(&digit).as_u64();
            vec.push(d as u8);
        }
    }

    /// Converts this number into a big-endian sequence of digits in the range
    /// 0..base. Zero is converted to the single digit 0.
    pub fn to_digits(&self, base: u32) -> Vec<u8> {
        debug_assert!((2..=62).contains(&base));
        let mut num = self.clone();
        num.shrink();

        let mut output: Vec<u8> = Vec::new();

        while !num.is_zero() {
            // Figure out how many digits fit in the number, using the upper
            // bound of 1/log2(base).
            let digits = crate::utils::digits_for_bits(num.len() * 64, base);
            Self::to_digits_impl(&mut num, base as u64, digits, &mut output);
        }

        // Eliminate leading zeros.
        while output.len() > 1 && output[output.len() - 1] == 0 {
            output.pop();
        }
        if output.is_empty() {
            output.push(0);
        }
        output.reverse();
        output
    }
}

/// Bigint numbers above this size use the karatsuba algorithm for
/// multiplication. The number represents the number of words in the bigint.
/// Numbers below this threshold use the traditional O(n^2) multiplication.
const KARATSUBA_SIZE_THRESHOLD: usize = 64;

impl BigInt {
    fn mul_karatsuba(lhs: &[u64], rhs: &[u64]) -> BigInt {
        // Algorithm description:
        // https://en.wikipedia.org/wiki/Karatsuba_algorithm

        // Handle small numbers using the traditional O(n^2) algorithm.
        if lhs.len().min(rhs.len()) < KARATSUBA_SIZE_THRESHOLD {
            // Handle zero-sized inputs.
            if lhs.is_empty() || rhs.is_empty() {
                return BigInt::zero();
            }
            let mut lhs = BigInt::from_parts(lhs);
            lhs.inplace_mul_slice(rhs);
            return lhs;
        }

        // Split the big-int into two parts. One of the parts might be
        // zero-sized.
        let mid = lhs.len().max(rhs.len()) / 2;
        let a = &lhs[0..mid.min(lhs.len())];
        let b = &lhs[mid.min(lhs.len())..];
        let c = &rhs[0..mid.min(rhs.len())];
        let d = &rhs[mid.min(rhs.len())..];

        // Compute 'a*c' and 'b*d'.
        let ac = Self::mul_karatsuba(a, c);
        let mut bd = Self::mul_karatsuba(b, d);

        // Compute (a+b) * (c+d).
        let mut a_b = BigInt::from_parts(a);
        a_b.inplace_add_slice(b);
        let mut c_d = BigInt::from_parts(c);
        c_d.inplace_add_slice(d);

        let mut ad_plus_bc = Self::mul_karatsuba(&a_b.parts, &c_d.parts);

        // Compute (a+b) * (c+d) - ac - bd
        let _ = ad_plus_bc.inplace_sub_slice(&ac.parts, 0);
        let _ = ad_plus_bc.inplace_sub_slice(&bd.parts, 0);

        // Add the parts of the word together.
        bd.shift_left(64 * mid * 2);
        ad_plus_bc.shift_left(64 * mid);
        bd.inplace_add(&ad_plus_bc);
        bd.inplace_add(&ac);
        bd
    }
}

impl Eq for BigInt {}

impl PartialEq for BigInt {
    fn eq(&self, other: &BigInt) -> bool {
        self.cmp(other).is_eq()
    }
}
impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        // This part word is longer.
        if self.len() > other.len()
            && self.parts[other.len()..].iter().any(|&x| x != 0)
        {
            return Ordering::Greater;
        }

        // The other word is longer.
        if other.len() > self.len()
            && other.parts[self.len()..].iter().any(|&x| x != 0)
        {
            return Ordering::Less;
        }
        let same_len = other.len().min(self.len());

        // Compare all of the digits, from MSB to LSB.
        for i in (0..same_len).rev() {
            match self.parts[i].cmp(&other.parts[i]) {
                Ordering::Less => return Ordering::Less,
                Ordering::Equal => {}
                Ordering::Greater => return Ordering::Greater,
            }
        }
        Ordering::Equal
    }
}

macro_rules! declare_operator {
    ($trait_name:ident,
     $func_name:ident,
     $func_impl_name:ident) => {
        // Self + Self
        impl $trait_name for BigInt {
            type Output = Self;

            fn $func_name(self, rhs: Self) -> Self::Output {
                self.$func_name(&rhs)
            }
        }

        // Self + &Self -> Self
        impl $trait_name<&Self> for BigInt {
            type Output = Self;
            fn $func_name(self, rhs: &Self) -> Self::Output {
                let mut n = self;
                let _ = n.$func_impl_name(rhs);
                n
            }
        }

        // &Self + &Self -> Self
        impl $trait_name<Self> for &BigInt {
            type Output = BigInt;
            fn $func_name(self, rhs: Self) -> Self::Output {
                let mut n = self.clone();
                let _ = n.$func_impl_name(rhs);
                n
            }
        }

        // Self + u64 -> Self
        impl $trait_name<u64> for BigInt {
            type Output = Self;
            fn $func_name(self, rhs: u64) -> Self::Output {
                let mut n = self;
                let _ = n.$func_impl_name(&Self::from_u64(rhs));
                n
            }
        }
    };
}

declare_operator!(Add, add, inplace_add);
declare_operator!(Mul, mul, inplace_mul);

#[test]
fn test_shl() {
    let mut x = BigInt::from_u64(0xff00ff);
    assert_eq!(x.get_part(0), 0xff00ff);
    x.shift_left(17);
    assert_eq!(x.get_part(0), 0x1fe01fe0000);
    x.shift_left(17);
    assert_eq!(x.get_part(0), 0x3fc03fc00000000);
    x.shift_left(64);
    assert_eq!(x.get_part(1), 0x3fc03fc00000000);
}

#[test]
fn test_shr() {
    let mut x = BigInt::from_u64(0xff00ff);
    x.shift_left(128);
    assert_eq!(x.get_part(2), 0xff00ff);
    x.shift_right(17);
    assert_eq!(x.get_part(1), 0x807f800000000000);
    x.shift_right(17);
    assert_eq!(x.get_part(1), 0x03fc03fc0000000);
    x.shift_right(64);
    assert_eq!(x.get_part(0), 0x03fc03fc0000000);

    // Shifting everything out leaves a zero.
    x.shift_right(1 << 40);
    assert!(x.is_zero());
}

#[test]
fn test_mul_word() {
    let mut x = BigInt::from_u64(0xffff_ffff_ffff_ffff);
    x.inplace_mul_word(0xffff_ffff_ffff_ffff);
    assert_eq!(x.get_part(0), 1);
    assert_eq!(x.get_part(1), 0xffff_ffff_ffff_fffe);

    let mut y = BigInt::from_u64(12345);
    y.inplace_mul_word(0);
    assert!(y.is_zero());
}

#[test]
fn test_div_basic() {
    let mut x1 = BigInt::from_u64(49);
    let mut x2 = BigInt::from_u64(703);
    let y = BigInt::from_u64(7);

    let rem = x1.inplace_div(&y);
    assert_eq!(x1.as_u64(), 7);
    assert_eq!(rem.as_u64(), 0);

    let rem = x2.inplace_div(&y);
    assert_eq!(x2.as_u64(), 100);
    assert_eq!(rem.as_u64(), 3);
}

#[test]
fn test_div_multiword() {
    // (2^130 + 17) / 10^20.
    let mut x = BigInt::one();
    x.shift_left(130);
    x.inplace_add(&BigInt::from_u64(17));
    let ten20 = BigInt::from_u64(10).powi(20);
    let mut q = x.clone();
    let rem = q.inplace_div(&ten20);

    // Check q * d + r == x.
    let mut back = q.clone() * &ten20;
    back.inplace_add(&rem);
    assert_eq!(back, x);
    assert!(rem < ten20);
}

#[test]
fn test_loss_kind() {
    let x = BigInt::from_u64(0b10000000);
    assert!(x.get_loss_kind_for_bit(3).is_exactly_zero());
    let x = BigInt::from_u64(0b10000111);
    assert!(x.get_loss_kind_for_bit(3).is_mt_half());
    let x = BigInt::from_u64(0b10000100);
    assert!(x.get_loss_kind_for_bit(3).is_exactly_half());
    let x = BigInt::from_u64(0b10000001);
    assert!(x.get_loss_kind_for_bit(3).is_lt_half());
    // Everything is below the cut.
    assert!(x.get_loss_kind_for_bit(1000).is_lt_half());
}

#[test]
fn test_uniform_range() {
    let x = BigInt::from_u64(0b1111_0000_1010);
    assert!(x.is_uniform_range(4, 8));
    assert!(x.is_uniform_range(8, 12));
    assert!(!x.is_uniform_range(0, 4));
    assert!(!x.is_uniform_range(6, 10));
    assert!(x.is_uniform_range(12, 200));
    assert!(x.is_uniform_range(5, 5));
}

#[test]
fn test_msb() {
    let x = BigInt::from_u64(0xffffffff00000000);
    assert_eq!(x.msb_index(), 64);

    let x = BigInt::from_u64(0x0);
    assert_eq!(x.msb_index(), 0);

    for i in 0..256 {
        let mut x = BigInt::from_u64(0x1);
        x.shift_left(i);
        assert_eq!(x.msb_index(), i + 1);
    }
}

#[test]
fn test_all1s_ctor() {
    assert_eq!(BigInt::all1s(0).get_part(0), 0b0);
    assert_eq!(BigInt::all1s(1).get_part(0), 0b1);
    assert_eq!(BigInt::all1s(5).get_part(0), 0b11111);
    assert_eq!(BigInt::all1s(32).get_part(0), 0xffffffff);
    assert_eq!(BigInt::all1s(130).msb_index(), 130);
}

#[test]
fn test_from_digits() {
    assert_eq!(BigInt::from_digits(&[9, 0, 2, 1, 0], 10).as_u64(), 90210);
    assert_eq!(BigInt::from_digits(&[1, 0, 1, 1], 2).as_u64(), 0b1011);
    assert_eq!(BigInt::from_digits(&[15, 15], 16).as_u64(), 0xff);
    assert_eq!(BigInt::from_digits(&[1, 0], 62).as_u64(), 62);
    assert!(BigInt::from_digits(&[0, 0, 0], 7).is_zero());

    // A number longer than a word: 10^40.
    let mut digits = [0u8; 41];
    digits[0] = 1;
    let big = BigInt::from_digits(&digits, 10);
    assert_eq!(big, BigInt::from_u64(10).powi(40));
}

#[test]
fn test_digits_round_trip() {
    use crate::utils::Lfsr;
    let mut lfsr = Lfsr::new();

    for base in 2..=62 {
        let parts: Vec<u64> = (0..7).map(|_| lfsr.get64()).collect();
        let num = BigInt::from_parts(&parts);
        let digits = num.to_digits(base);
        assert_ne!(digits[0], 0);
        assert!(digits.iter().all(|d| (*d as u32) < base));
        assert_eq!(BigInt::from_digits(&digits, base), num);
    }
    assert_eq!(BigInt::zero().to_digits(10), [0]);
}

#[test]
fn test_mul_karatsuba() {
    use crate::utils::Lfsr;
    let mut ll = Lfsr::new();

    // Compare the multiplication of karatsuba to the direct multiplication on
    // two random numbers of lengths 'r' and 'l'.
    fn test_sizes(l: usize, r: usize, ll: &mut Lfsr) {
        let a: Vec<u64> = (0..l).map(|_| ll.get64()).collect();
        let b: Vec<u64> = (0..r).map(|_| ll.get64()).collect();
        let res = BigInt::mul_karatsuba(&a, &b);
        let mut direct = BigInt::from_parts(&a);
        direct.inplace_mul_slice(&b);
        assert_eq!(res, direct);
    }

    test_sizes(1, 1, &mut ll);
    test_sizes(100, 1, &mut ll);
    test_sizes(100, 100, &mut ll);
    test_sizes(130, 129, &mut ll);
    for i in 64..70 {
        for j in 60..70 {
            test_sizes(i, j, &mut ll);
        }
    }
}
