//! This file contains simple helper functions and test helpers.

/// Returns a mask full of 1s, of `b` bits.
pub fn mask(b: usize) -> usize {
    (1 << (b)) - 1
}

#[test]
fn test_masking() {
    assert_eq!(mask(0), 0x0);
    assert_eq!(mask(1), 0x1);
    assert_eq!(mask(8), 255);
}

/// Returns the smallest `k` such that `2^k >= n`. Returns 0 for n <= 1.
pub fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

#[test]
fn test_ceil_log2() {
    assert_eq!(ceil_log2(0), 0);
    assert_eq!(ceil_log2(1), 0);
    assert_eq!(ceil_log2(2), 1);
    assert_eq!(ceil_log2(3), 2);
    assert_eq!(ceil_log2(8), 3);
    assert_eq!(ceil_log2(53), 6);
    assert_eq!(ceil_log2(64), 6);
    assert_eq!(ceil_log2(65), 7);
}

/// For each base b in 2..=62, a fraction `num/den` that is a tight upper bound
/// of 1/log2(b). Entry 0 is base 2.
const RED_INV_LOG2: [(u64, u64); 61] = [
    (1, 1),
    (53, 84),
    (1, 2),
    (4004, 9297),
    (53, 137),
    (2393, 6718),
    (1, 3),
    (665, 2108),
    (4004, 13301),
    (949, 3283),
    (53, 190),
    (5231, 19357),
    (2393, 9111),
    (247, 965),
    (1, 4),
    (4036, 16497),
    (665, 2773),
    (5187, 22034),
    (4004, 17305),
    (51, 224),
    (949, 4232),
    (3077, 13919),
    (53, 243),
    (73, 339),
    (5231, 24588),
    (665, 3162),
    (2393, 11504),
    (4943, 24013),
    (247, 1212),
    (3515, 17414),
    (1, 5),
    (4415, 22271),
    (4036, 20533),
    (263, 1349),
    (665, 3438),
    (1079, 5621),
    (5187, 27221),
    (2288, 12093),
    (4004, 21309),
    (179, 959),
    (51, 275),
    (495, 2686),
    (949, 5181),
    (3621, 19886),
    (3077, 16996),
    (229, 1272),
    (53, 296),
    (109, 612),
    (73, 412),
    (1505, 8537),
    (5231, 29819),
    (283, 1621),
    (665, 3827),
    (32, 185),
    (2393, 13897),
    (1879, 10960),
    (4943, 28956),
    (409, 2406),
    (247, 1459),
    (231, 1370),
    (3515, 20929),
];

/// Returns the number of digits in base `base` that are needed to carry at
/// least `bits` bits, plus one. The product bits*num/den is computed in
/// pieces so that it can't overflow.
pub(crate) fn digits_for_bits(bits: usize, base: u32) -> usize {
    debug_assert!((2..=62).contains(&base));
    let (num, den) = RED_INV_LOG2[base as usize - 2];
    let bits = bits as u64;
    let digits = (bits / den) * num + ((bits % den) * num + den - 1) / den + 1;
    digits as usize
}

#[test]
fn test_digits_for_bits() {
    // Every entry must be an upper bound of 1/log2(b).
    for base in 2..=62u32 {
        let (num, den) = RED_INV_LOG2[base as usize - 2];
        let inv = 1.0 / (base as f64).log2();
        assert!(num as f64 / den as f64 >= inv * (1.0 - 1e-12), "base {}", base);
        assert!(num as f64 / den as f64 <= inv * 1.001, "base {}", base);
    }

    assert_eq!(digits_for_bits(64, 2), 65);
    assert_eq!(digits_for_bits(64, 16), 17);
    // log10(2^64) = 19.27, so 20 digits and one more.
    assert_eq!(digits_for_bits(64, 10), 21);
    // Large widths must not overflow the intermediate product.
    let huge = digits_for_bits(1 << 40, 62);
    assert!(huge > (1 << 40) / 6 && huge < (1 << 40) / 5);
}

/// Returns true if `base` is a power of two, and the log2 of the base.
pub(crate) fn power_of_two_base(base: u32) -> Option<u32> {
    if base.is_power_of_two() {
        Some(base.trailing_zeros())
    } else {
        None
    }
}

/// The largest exponent that exponent arithmetic may produce.
pub const EXP_MAX: i64 = (1 << 62) - 1;
/// The smallest exponent that exponent arithmetic may produce.
pub const EXP_MIN: i64 = -EXP_MAX;

/// Reports that an exponent computation left the legal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RangeExcursion {
    Overflow,
    Underflow,
}

/// Returns `a + b`, checking that the result is in the range [lo, hi]. Only
/// operands of the same sign are checked. Operands of different signs can't
/// overflow the machine integer and are added directly, even if the sum is
/// outside of the range.
pub(crate) fn sadd(
    a: i64,
    b: i64,
    lo: i64,
    hi: i64,
) -> Result<i64, RangeExcursion> {
    if a >= 0 && b >= 0 {
        match a.checked_add(b) {
            Some(c) if c <= hi => Ok(c),
            _ => Err(RangeExcursion::Overflow),
        }
    } else if a < 0 && b < 0 {
        match a.checked_add(b) {
            Some(c) if c >= lo => Ok(c),
            _ => Err(RangeExcursion::Underflow),
        }
    } else {
        Ok(a + b)
    }
}

#[test]
fn test_sadd() {
    assert_eq!(sadd(1, 2, EXP_MIN, EXP_MAX), Ok(3));
    assert_eq!(sadd(EXP_MAX, 0, EXP_MIN, EXP_MAX), Ok(EXP_MAX));
    assert_eq!(sadd(EXP_MAX, 1, EXP_MIN, EXP_MAX), Err(RangeExcursion::Overflow));
    assert_eq!(sadd(EXP_MIN, -1, EXP_MIN, EXP_MAX), Err(RangeExcursion::Underflow));
    assert_eq!(sadd(i64::MAX, i64::MAX, EXP_MIN, EXP_MAX), Err(RangeExcursion::Overflow));
    assert_eq!(sadd(-5, -5, -9, 9), Err(RangeExcursion::Underflow));
    // Mixed signs are not checked.
    assert_eq!(sadd(20, -5, -9, 9), Ok(15));
}

#[cfg(all(test, feature = "std"))]
/// Returns list of interesting values that various tests use to catch edge cases.
pub fn get_special_test_values() -> [f64; 20] {
    [
        -f64::NAN,
        f64::NAN,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::EPSILON,
        -f64::EPSILON,
        0.000000000000000000000000000000000000001,
        f64::MIN,
        f64::MAX,
        std::f64::consts::PI,
        std::f64::consts::LN_2,
        std::f64::consts::SQRT_2,
        std::f64::consts::E,
        0.0,
        -0.0,
        10.,
        -10.,
        -0.00001,
        0.1,
        355. / 113.,
    ]
}

// Linear-feedback shift register. We use this as a random number generator for
// tests.
pub struct Lfsr {
    state: u32,
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new()
    }
}

impl Lfsr {
    /// Generate a new LFSR number generator.
    pub fn new() -> Lfsr {
        Lfsr { state: 0x13371337 }
    }

    /// Generate a new LFSR number generator that starts with a specific state.
    pub fn new_with_seed(seed: u32) -> Lfsr {
        Lfsr {
            state: 0x13371337 ^ seed,
        }
    }

    pub fn next(&mut self) {
        let a = (self.state >> 24) & 1;
        let b = (self.state >> 23) & 1;
        let c = (self.state >> 22) & 1;
        let d = (self.state >> 17) & 1;
        let n = a ^ b ^ c ^ d ^ 1;
        self.state <<= 1;
        self.state |= n;
    }

    fn get(&mut self) -> u32 {
        let mut res: u32 = 0;
        for _ in 0..32 {
            self.next();
            res <<= 1;
            res ^= self.state & 0x1;
        }
        res
    }

    pub fn get64(&mut self) -> u64 {
        ((self.get() as u64) << 32) | self.get() as u64
    }

    /// Returns a number in the range [lo, hi).
    pub fn get_range(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo < hi);
        lo + self.get64() % (hi - lo)
    }
}

// Implement `Iterator` for `Lfsr`.
impl Iterator for Lfsr {
    type Item = u64;
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.get64())
    }
}

#[test]
fn test_lfsr_balance() {
    let mut lfsr = Lfsr::new();

    // Count the number of items, and the number of 1s.
    let mut items = 0;
    let mut ones = 0;

    for _ in 0..10000 {
        let mut u = lfsr.get();
        for _ in 0..32 {
            items += 1;
            ones += u & 1;
            u >>= 1;
        }
    }
    // Make sure that we have around 50% 1s and 50% zeros.
    assert!((ones as f64) < (0.55 * items as f64));
    assert!((ones as f64) > (0.45 * items as f64));
}

#[test]
fn test_lfsr_range() {
    let mut lfsr = Lfsr::new_with_seed(7);
    for _ in 0..1000 {
        let v = lfsr.get_range(2, 63);
        assert!((2..63).contains(&v));
    }
}
