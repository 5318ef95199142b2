extern crate alloc;
use super::bigint::BigInt;
use super::bigint::LossFraction;
use super::status::Flags;
use core::cmp::Ordering;

/// Defines the supported rounding modes.
/// See IEEE754-2019 Section 4.3 Rounding-direction attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    NearestTiesToEven,
    NearestTiesToAway,
    Zero,
    Positive,
    Negative,
    /// Round away from zero. Not an IEEE mode.
    Away,
}

impl RoundingMode {
    /// All of the rounding modes, used by tests and benchmarks.
    pub const ALL: [RoundingMode; 6] = [
        RoundingMode::NearestTiesToEven,
        RoundingMode::NearestTiesToAway,
        RoundingMode::Zero,
        RoundingMode::Positive,
        RoundingMode::Negative,
        RoundingMode::Away,
    ];

    /// Returns true for the round-to-nearest modes.
    pub fn is_nearest(&self) -> bool {
        matches!(self, Self::NearestTiesToEven | Self::NearestTiesToAway)
    }

    /// Returns true if this mode truncates a number with the sign `sign`
    /// toward zero.
    pub fn is_like_zero(&self, sign: bool) -> bool {
        match self {
            Self::Zero => true,
            Self::Positive => sign,
            Self::Negative => !sign,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent.
    pub exponent: usize,
    /// The number of bits in the significand (mantissa + 1).
    pub precision: usize,
    /// The rounding mode used when operating on numbers of this type.
    pub mode: RoundingMode,
}

impl Semantics {
    pub const fn new(
        exponent: usize,
        precision: usize,
        mode: RoundingMode,
    ) -> Self {
        Semantics {
            exponent,
            precision,
            mode,
        }
    }
    /// Returns the precision in bits.
    pub fn get_precision(&self) -> usize {
        self.precision
    }
    /// Returns the length of the mantissa in bits (precision - 1).
    pub fn get_mantissa_len(&self) -> usize {
        self.precision - 1
    }
    /// Returns the length of the exponent in bits, which defines the valid
    /// range.
    pub fn get_exponent_len(&self) -> usize {
        self.exponent
    }
    /// Returns the rounding mode of the type.
    pub fn get_rounding_mode(&self) -> RoundingMode {
        self.mode
    }

    /// Create a new float semantics with a different rounding mode.
    pub fn with_rm(&self, rm: RoundingMode) -> Semantics {
        Semantics::new(self.exponent, self.precision, rm)
    }

    /// Returns the exponent bias for the number, as a positive number.
    /// https://en.wikipedia.org/wiki/IEEE_754#Basic_and_interchange_formats
    pub(crate) fn get_bias(&self) -> i64 {
        let e = self.get_exponent_len();
        ((1u64 << (e - 1)) - 1) as i64
    }

    /// Returns the upper and lower bounds of the exponent.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        let exp_min: i64 = -self.get_bias() + 1;
        // The highest value is 0xFFFE, because 0xFFFF is used for signaling.
        let exp_max: i64 = (1 << self.get_exponent_len()) - self.get_bias() - 2;
        (exp_min, exp_max)
    }
}

/// Declare the different categories of the floating point number. These
/// categories are internal to the float, and can be access by the acessors:
/// is_inf, is_zero, is_nan, is_normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// The direction of the rounding error: the rounded result compared with the
/// exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ternary {
    Below,
    Exact,
    Above,
}

impl Ternary {
    /// Returns the ternary of a number with the sign `sign` whose magnitude
    /// was rounded away from zero (`away`) or truncated.
    pub fn from_rounding(sign: bool, away: bool) -> Self {
        if away != sign {
            Ternary::Above
        } else {
            Ternary::Below
        }
    }

    /// Returns -1, 0 or 1.
    pub fn as_i32(&self) -> i32 {
        match self {
            Ternary::Below => -1,
            Ternary::Exact => 0,
            Ternary::Above => 1,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Ternary::Exact)
    }
}

/// This is the main data structure of this library. It represents an
/// arbitrary-precision floating-point number. The precision, the exponent
/// range and the rounding mode are defined by the semantics of the number.
#[derive(Debug, Clone)]
pub struct Float {
    // The semantics of the float (precision, exponent range).
    sem: Semantics,
    // The Sign bit.
    sign: bool,
    // The Exponent.
    exp: i64,
    // The significand, including the implicit bit, aligned to the right.
    // Format [00000001xxxxxxx].
    mantissa: BigInt,
    // The kind of number this float represents.
    category: Category,
}

impl Float {
    pub fn get_mantissa_len(&self) -> usize {
        self.sem.get_mantissa_len()
    }
    pub fn get_exponent_len(&self) -> usize {
        self.sem.get_exponent_len()
    }
    pub fn get_rounding_mode(&self) -> RoundingMode {
        self.sem.get_rounding_mode()
    }

    /// Create a new normal floating point number.
    pub fn new(sem: Semantics, sign: bool, exp: i64, mantissa: BigInt) -> Self {
        if mantissa.is_zero() {
            return Float::zero(sem, sign);
        }
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category: Category::Normal,
        }
    }

    /// Create a new floating point number without checking the fields. The
    /// number needs to be normalized.
    pub fn raw(
        sem: Semantics,
        sign: bool,
        exp: i64,
        mantissa: BigInt,
        category: Category,
    ) -> Self {
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category,
        }
    }

    /// Returns a new zero float.
    pub fn zero(sem: Semantics, sign: bool) -> Self {
        Float {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::Zero,
        }
    }

    /// Returns a new float with the value one.
    pub fn one(sem: Semantics, sign: bool) -> Self {
        let mut one = BigInt::one();
        one.shift_left(sem.get_mantissa_len());
        Float {
            sem,
            sign,
            exp: 0,
            mantissa: one,
            category: Category::Normal,
        }
    }

    /// Returns a new infinity float.
    pub fn inf(sem: Semantics, sign: bool) -> Self {
        Float {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::Infinity,
        }
    }

    /// Returns a new NaN float.
    pub fn nan(sem: Semantics, sign: bool) -> Self {
        Float {
            sem,
            sign,
            exp: 0,
            mantissa: BigInt::zero(),
            category: Category::NaN,
        }
    }

    /// Returns the largest finite number.
    pub fn largest(sem: Semantics, sign: bool) -> Self {
        let (_, exp_max) = sem.get_exp_bounds();
        Self::new(sem, sign, exp_max, BigInt::all1s(sem.get_precision()))
    }

    /// Returns the smallest positive (denormal) number.
    pub fn smallest(sem: Semantics, sign: bool) -> Self {
        let (exp_min, _) = sem.get_exp_bounds();
        Self::new(sem, sign, exp_min, BigInt::one())
    }

    /// Returns true if the Float is negative
    pub fn is_negative(&self) -> bool {
        self.sign
    }

    /// Returns true if the Float is +-inf.
    pub fn is_inf(&self) -> bool {
        if let Category::Infinity = self.category {
            return true;
        }
        false
    }

    /// Returns true if the Float is a +- NaN.
    pub fn is_nan(&self) -> bool {
        if let Category::NaN = self.category {
            return true;
        }
        false
    }

    /// Returns true if the Float is a +- zero.
    pub fn is_zero(&self) -> bool {
        if let Category::Zero = self.category {
            return true;
        }
        false
    }

    /// Returns true if this number is normal (not Zero, Nan, Inf).
    pub fn is_normal(&self) -> bool {
        if let Category::Normal = self.category {
            return true;
        }
        false
    }

    /// Return the semantics of the number
    pub fn get_semantics(&self) -> Semantics {
        self.sem
    }

    /// Returns the sign of the float. True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    /// Returns the mantissa of the float.
    pub fn get_mantissa(&self) -> BigInt {
        self.mantissa.clone()
    }

    /// Returns the exponent of the float.
    pub fn get_exp(&self) -> i64 {
        self.exp
    }

    /// Returns the category of the float.
    pub fn get_category(&self) -> Category {
        self.category
    }

    /// Returns a new float which has a flipped sign (negated value).
    pub fn neg(&self) -> Self {
        Self::raw(
            self.sem,
            !self.sign,
            self.exp,
            self.mantissa.clone(),
            self.category,
        )
    }

    /// Returns the binary exponent `e` of a normal number, such that
    /// 2^(e-1) <= |x| < 2^e. The number 1.0 has the binary exponent 1.
    pub fn binary_exponent(&self) -> i64 {
        debug_assert!(self.is_normal());
        let msb = self.mantissa.msb_index() as i64;
        self.exp - self.sem.get_precision() as i64 + 1 + msb
    }

    /// Returns the exponent bias for the number, as a positive number.
    /// https://en.wikipedia.org/wiki/IEEE_754#Basic_and_interchange_formats
    pub(crate) fn get_bias(&self) -> i64 {
        self.sem.get_bias()
    }

    /// Returns the upper and lower bounds of the exponent.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        self.sem.get_exp_bounds()
    }
}

// IEEE 754-2019
// Table 3.5 — Binary interchange format parameters.
use RoundingMode::NearestTiesToEven as nte;

/// Predefined FP16 float with 5 exponent bits, and 10 mantissa bits.
pub const FP16: Semantics = Semantics::new(5, 11, nte);
/// Predefined BF16 float with 8 exponent bits, and 7 mantissa bits.
pub const BF16: Semantics = Semantics::new(8, 8, nte);
/// Predefined FP32 float with 8 exponent bits, and 23 mantissa bits.
pub const FP32: Semantics = Semantics::new(8, 24, nte);
/// Predefined FP64 float with 11 exponent bits, and 52 mantissa bits.
pub const FP64: Semantics = Semantics::new(11, 53, nte);
/// Predefined FP128 float with 15 exponent bits, and 112 mantissa bits.
pub const FP128: Semantics = Semantics::new(15, 113, nte);
/// Predefined FP256 float with 19 exponent bits, and 236 mantissa bits.
pub const FP256: Semantics = Semantics::new(19, 237, nte);

//// Shift `val` by `bits`, and report the loss.
pub(crate) fn shift_right_with_loss(
    val: &BigInt,
    bits: usize,
) -> (BigInt, LossFraction) {
    let mut val = val.clone();
    let loss = val.get_loss_kind_for_bit(bits);
    val.shift_right(bits);
    (val, loss)
}

/// Combine the loss of accuracy with `msb` more significant and `lsb`
/// less significant.
pub(crate) fn combine_loss_fraction(
    msb: LossFraction,
    lsb: LossFraction,
) -> LossFraction {
    if !lsb.is_exactly_zero() {
        if msb.is_exactly_zero() {
            return LossFraction::LessThanHalf;
        } else if msb.is_exactly_half() {
            return LossFraction::MoreThanHalf;
        }
    }
    msb
}

/// Returns true if we need to round away from zero (increment the
/// magnitude) a number with the sign `sign`, that lost `loss` below its last
/// bit. `odd` is the parity of the last bit that is kept.
pub(crate) fn need_round_away_from_zero(
    rm: RoundingMode,
    sign: bool,
    loss: LossFraction,
    odd: bool,
) -> bool {
    if loss.is_exactly_zero() {
        return false;
    }
    match rm {
        RoundingMode::Positive => !sign,
        RoundingMode::Negative => sign,
        RoundingMode::Zero => false,
        RoundingMode::Away => true,
        RoundingMode::NearestTiesToAway => loss.is_gte_half(),
        RoundingMode::NearestTiesToEven => {
            if loss.is_mt_half() {
                return true;
            }

            loss.is_exactly_half() && odd
        }
    }
}

#[test]
fn shift_right_fraction() {
    let x: BigInt = BigInt::from_u64(0b10000000);
    let res = shift_right_with_loss(&x, 3);
    assert!(res.1.is_exactly_zero());

    let x: BigInt = BigInt::from_u64(0b10000111);
    let res = shift_right_with_loss(&x, 3);
    assert!(res.1.is_mt_half());

    let x: BigInt = BigInt::from_u64(0b10000100);
    let res = shift_right_with_loss(&x, 3);
    assert!(res.1.is_exactly_half());

    let x: BigInt = BigInt::from_u64(0b10000001);
    let res = shift_right_with_loss(&x, 3);
    assert!(res.1.is_lt_half());
}

#[test]
fn test_round_away_decisions() {
    use LossFraction::*;
    use RoundingMode::*;
    assert!(!need_round_away_from_zero(Away, false, ExactlyZero, true));
    assert!(need_round_away_from_zero(Away, true, LessThanHalf, false));
    assert!(need_round_away_from_zero(Positive, false, LessThanHalf, false));
    assert!(!need_round_away_from_zero(Positive, true, MoreThanHalf, false));
    assert!(need_round_away_from_zero(Negative, true, LessThanHalf, false));
    assert!(!need_round_away_from_zero(Zero, true, MoreThanHalf, true));
    assert!(need_round_away_from_zero(NearestTiesToAway, false, ExactlyHalf, false));
    assert!(!need_round_away_from_zero(NearestTiesToEven, false, ExactlyHalf, false));
    assert!(need_round_away_from_zero(NearestTiesToEven, false, ExactlyHalf, true));
    assert!(!need_round_away_from_zero(NearestTiesToEven, true, LessThanHalf, true));
}

impl Float {
    /// The number overflowed, set the right value based on the rounding mode
    /// and sign.
    pub(crate) fn overflow(
        &mut self,
        rm: RoundingMode,
        flags: &mut Flags,
    ) -> Ternary {
        flags.raise(Flags::OVERFLOW | Flags::INEXACT);
        if rm.is_like_zero(self.sign) {
            *self = Self::largest(self.sem, self.sign);
            Ternary::from_rounding(self.sign, false)
        } else {
            *self = Self::inf(self.sem, self.sign);
            Ternary::from_rounding(self.sign, true)
        }
    }

    /// The number is too small to be computed; set the right value based on
    /// the rounding mode and sign. The nearest modes round to zero.
    pub(crate) fn underflow(
        &mut self,
        rm: RoundingMode,
        flags: &mut Flags,
    ) -> Ternary {
        flags.raise(Flags::UNDERFLOW | Flags::INEXACT);
        if rm.is_nearest() || rm.is_like_zero(self.sign) {
            *self = Self::zero(self.sem, self.sign);
            Ternary::from_rounding(self.sign, false)
        } else {
            *self = Self::smallest(self.sem, self.sign);
            Ternary::from_rounding(self.sign, true)
        }
    }

    /// Verify that the exponent is legal.
    pub(crate) fn check_bounds(&self) {
        let bounds = self.get_exp_bounds();
        debug_assert!(self.exp >= bounds.0);
        debug_assert!(self.exp <= bounds.1);
        let max_mantissa = BigInt::one_hot(self.sem.get_precision());
        debug_assert!(self.mantissa.lt(&max_mantissa));
    }

    pub(crate) fn shift_significand_left(&mut self, amt: u64) {
        self.exp -= amt as i64;
        self.mantissa.shift_left(amt as usize);
    }

    pub(crate) fn shift_significand_right(&mut self, amt: u64) -> LossFraction {
        self.exp += amt as i64;
        let res = shift_right_with_loss(&self.mantissa, amt as usize);
        self.mantissa = res.0;
        res.1
    }

    /// Normalize the number by adjusting the exponent to the legal range, shift
    /// the mantissa to the msb, and round the number if bits are lost. The
    /// `loss` argument describes bits that were already discarded below the
    /// mantissa. Returns the direction of the rounding, and raises the
    /// overflow, underflow and inexact flags. This is based on Neil Booth'
    /// implementation in APFloat.
    pub(crate) fn normalize(
        &mut self,
        rm: RoundingMode,
        loss: LossFraction,
        flags: &mut Flags,
    ) -> Ternary {
        if !self.is_normal() {
            return Ternary::Exact;
        }
        let mut loss = loss;
        let mut tiny = false;
        let bounds = self.get_exp_bounds();

        let nmsb = self.mantissa.msb_index() as i64;

        // Step I - adjust the exponent.
        if nmsb > 0 {
            // Align the number so that the MSB bit will be MANTISSA + 1.
            let mut exp_change = nmsb - self.sem.get_precision() as i64;

            // Handle overflowing exponents.
            if self.exp + exp_change > bounds.1 {
                let t = self.overflow(rm, flags);
                self.check_bounds();
                return t;
            }

            // Handle underflowing low exponents. Don't allow to go below the
            // legal exponent range.
            if self.exp + exp_change < bounds.0 {
                exp_change = bounds.0 - self.exp;
                tiny = true;
            }

            if exp_change < 0 {
                // Handle reducing the exponent.
                debug_assert!(loss.is_exactly_zero(), "losing information");
                self.shift_significand_left(-exp_change as u64);
                return Ternary::Exact;
            }

            if exp_change > 0 {
                // Handle increasing the exponent.
                let loss2 = self.shift_significand_right(exp_change as u64);
                loss = combine_loss_fraction(loss2, loss);
            }
        } else {
            tiny = true;
        }

        //Step II - round the number.

        // If nothing moved or the shift didn't mess things up then we're done.
        if loss.is_exactly_zero() {
            // Canonicalize to zero.
            if self.mantissa.is_zero() {
                *self = Self::zero(self.sem, self.sign);
            }
            return Ternary::Exact;
        }

        flags.raise(Flags::INEXACT);
        if tiny {
            flags.raise(Flags::UNDERFLOW);
        }

        // Check if we need to round away from zero.
        let odd = !self.mantissa.is_zero() && self.mantissa.is_odd();
        let away = need_round_away_from_zero(rm, self.sign, loss, odd);
        if away {
            if self.mantissa.is_zero() {
                self.exp = bounds.0
            }

            let one = BigInt::one();
            self.mantissa = self.mantissa.clone() + one;
            // Did the mantissa overflow?
            let mut m = self.mantissa.clone();
            m.shift_right(self.sem.get_precision());
            if !m.is_zero() {
                // Can we fix the exponent?
                if self.exp < bounds.1 {
                    self.shift_significand_right(1);
                } else {
                    flags.raise(Flags::OVERFLOW);
                    *self = Self::inf(self.sem, self.sign);
                    return Ternary::from_rounding(self.sign, true);
                }
            }
        }

        // Canonicalize.
        if self.mantissa.is_zero() {
            *self = Self::zero(self.sem, self.sign);
        }
        Ternary::from_rounding(self.sign, away)
    } // round.
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        let bitwise = self.sign == other.sign
            && self.exp == other.exp
            && self.mantissa == other.mantissa
            && self.category == other.category;

        match self.category {
            Category::Infinity => {
                other.is_inf() && self.sign == other.sign
            }
            Category::Normal => bitwise,
            Category::Zero => other.is_zero(),
            Category::NaN => false,
        }
    }
}

/// Page 66. Chapter 3. Floating-Point Formats and Environment
/// Table 3.8: Comparison predicates and the four relations.
///   and
/// IEEE 754-2019 section 5.10 - totalOrder.
impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let bool_to_ord = |ord: bool| -> Option<Ordering> {
            if ord {
                Some(Ordering::Less)
            } else {
                Some(Ordering::Greater)
            }
        };

        match (self.category, other.category) {
            (Category::NaN, _) | (_, Category::NaN) => None,
            (Category::Zero, Category::Zero) => Some(Ordering::Equal),
            (Category::Infinity, Category::Infinity) => {
                if self.sign == other.sign {
                    Some(Ordering::Equal)
                } else {
                    bool_to_ord(self.sign)
                }
            }
            (Category::Infinity, Category::Normal)
            | (Category::Infinity, Category::Zero)
            | (Category::Normal, Category::Zero) => bool_to_ord(self.sign),

            (Category::Normal, Category::Infinity)
            | (Category::Zero, Category::Infinity)
            | (Category::Zero, Category::Normal) => bool_to_ord(!other.sign),

            (Category::Normal, Category::Normal) => {
                debug_assert_eq!(
                    self.sem.get_precision(),
                    other.sem.get_precision()
                );
                if self.sign != other.sign {
                    bool_to_ord(self.sign)
                } else {
                    // Compare the magnitudes and flip the order for negative
                    // numbers.
                    let mag = self
                        .exp
                        .cmp(&other.exp)
                        .then_with(|| self.mantissa.cmp(&other.mantissa));
                    if self.sign {
                        Some(mag.reverse())
                    } else {
                        Some(mag)
                    }
                }
            }
        }
    }
}

#[cfg(feature = "std")]
#[test]
fn test_comparisons() {
    use super::utils;

    // Compare a bunch of special values, using the <,>,== operators and check
    // that they match the comparison on doubles.
    for first in utils::get_special_test_values() {
        for second in utils::get_special_test_values() {
            let is_less = first < second;
            let is_eq = first == second;
            let is_gt = first > second;
            let first = Float::from_f64(FP64, first);
            let second = Float::from_f64(FP64, second);
            assert_eq!(is_less, first < second, "<");
            assert_eq!(is_eq, first == second, "==");
            assert_eq!(is_gt, first > second, ">");
        }
    }
}

#[test]
fn test_one_imm() {
    let sem = Semantics::new(10, 12, nte);
    let x = Float::one(sem, false);
    assert_eq!(x.as_f64(), 1.0);
    assert_eq!(x.binary_exponent(), 1);
}

#[test]
fn test_ternary_direction() {
    assert_eq!(Ternary::from_rounding(false, true), Ternary::Above);
    assert_eq!(Ternary::from_rounding(false, false), Ternary::Below);
    assert_eq!(Ternary::from_rounding(true, true), Ternary::Below);
    assert_eq!(Ternary::from_rounding(true, false), Ternary::Above);
    assert_eq!(Ternary::Below.as_i32(), -1);
    assert_eq!(Ternary::Exact.as_i32(), 0);
}

#[test]
fn test_normalize_rounding() {
    use RoundingMode::*;
    let sem = Semantics::new(8, 4, nte);

    // 0b10011 with 4 bits of precision is between 0b1001 and 0b1010.
    let cases = [
        (NearestTiesToEven, false, 0b1010, Ternary::Above),
        (NearestTiesToAway, false, 0b1010, Ternary::Above),
        (Zero, false, 0b1001, Ternary::Below),
        (Positive, false, 0b1010, Ternary::Above),
        (Negative, false, 0b1001, Ternary::Below),
        (Away, true, 0b1010, Ternary::Below),
        (Zero, true, 0b1001, Ternary::Above),
    ];
    for (rm, sign, mantissa, ternary) in cases {
        let mut flags = Flags::empty();
        let mut x = Float::new(sem, sign, 4, BigInt::from_u64(0b10011));
        let t = x.normalize(rm, LossFraction::ExactlyZero, &mut flags);
        assert_eq!(t, ternary);
        assert_eq!(x.get_mantissa().as_u64(), mantissa);
        assert_eq!(x.get_exp(), 5);
        assert_eq!(flags, Flags::INEXACT);
    }

    // Exact values don't raise flags.
    let mut flags = Flags::empty();
    let mut x = Float::new(sem, false, 4, BigInt::from_u64(0b10010));
    let t = x.normalize(NearestTiesToEven, LossFraction::ExactlyZero, &mut flags);
    assert_eq!(t, Ternary::Exact);
    assert!(flags.is_empty());
}

#[test]
fn test_overflow_and_underflow_values() {
    use RoundingMode::*;
    let sem = Semantics::new(4, 4, nte);
    let (exp_min, exp_max) = sem.get_exp_bounds();
    assert_eq!((exp_min, exp_max), (-6, 7));

    for rm in RoundingMode::ALL {
        for sign in [false, true] {
            let mut flags = Flags::empty();
            let mut x = Float::new(sem, sign, exp_max + 1, BigInt::from_u64(8));
            let t = x.normalize(rm, LossFraction::ExactlyZero, &mut flags);
            assert!(flags.contains(Flags::OVERFLOW | Flags::INEXACT));
            if rm.is_like_zero(sign) {
                assert_eq!(x, Float::largest(sem, sign));
                assert_eq!(x.get_mantissa().as_u64(), 0b1111);
            } else {
                assert!(x.is_inf());
            }
            assert_eq!(x.get_sign(), sign);
            assert_ne!(t, Ternary::Exact);

            let mut flags = Flags::empty();
            let mut y = Float::one(sem, sign);
            let t = y.underflow(rm, &mut flags);
            assert!(flags.contains(Flags::UNDERFLOW));
            if rm.is_nearest() || rm == Zero || rm.is_like_zero(sign) {
                assert!(y.is_zero());
            } else {
                assert_eq!(y, Float::smallest(sem, sign));
            }
            assert!(!t.is_exact());
        }
    }
}

#[test]
fn test_normalize_denormals() {
    let sem = Semantics::new(4, 4, nte);
    // The value 2^-9 is a denormal: 0.001 x 2^-6.
    let mut flags = Flags::empty();
    let mut x = Float::new(sem, false, -9, BigInt::from_u64(0b1000));
    let t = x.normalize(RoundingMode::Zero, LossFraction::ExactlyZero, &mut flags);
    assert_eq!(t, Ternary::Exact);
    assert_eq!(x.get_exp(), -6);
    assert_eq!(x.get_mantissa().as_u64(), 1);
    assert_eq!(x.binary_exponent(), -8);
    assert!(flags.is_empty());

    // The value 2^-10 rounds to the smallest denormal or to zero.
    let mk = || Float::new(sem, false, -10, BigInt::from_u64(0b1000));
    let mut flags = Flags::empty();
    let mut x = mk();
    let t = x.normalize(RoundingMode::Positive, LossFraction::ExactlyZero, &mut flags);
    assert_eq!(t, Ternary::Above);
    assert_eq!(x, Float::smallest(sem, false));
    assert!(flags.contains(Flags::UNDERFLOW | Flags::INEXACT));

    let mut x = mk();
    let t = x.normalize(RoundingMode::NearestTiesToEven, LossFraction::ExactlyZero, &mut flags);
    assert_eq!(t, Ternary::Below);
    assert!(x.is_zero());
}
