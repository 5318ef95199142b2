//! Correctly rounded conversion of numeric text in any base between 2 and 62
//! into arbitrary precision floating point numbers, and a bfloat16 codec.
//!
//! Numbers are parsed with increasing working precision until the rounding
//! of the approximation is guaranteed to be the rounding of the exact value.
//! The exceptions that conversions raise are accumulated in a [`Flags`]
//! object that belongs to the caller.
//!
//! # Example
//! ```
//!    use radixfloat::{Flags, Float, RoundingMode, Semantics, Ternary};
//!
//!    // A format with 8 exponent bits and 11 bits of precision that rounds
//!    // toward zero.
//!    let sem = Semantics::new(8, 11, RoundingMode::Zero);
//!
//!    let mut flags = Flags::empty();
//!    let res = Float::parse_radix("-1.2z@-3", 36, sem, &mut flags);
//!    assert_eq!(res.ternary, Ternary::Above);
//!    assert!(flags.contains(Flags::INEXACT));
//!
//!    // Store the number as bfloat16 and load it back.
//!    let bits = res.value.as_bf16_bits(RoundingMode::Zero, &mut flags);
//!    let (val, _) = Float::from_bf16_bits(sem, bits, &mut flags);
//!    assert!(val >= res.value);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod bfloat16;
mod bigint;
mod cast;
mod convert;
mod float;
mod lexer;
mod status;
mod string;
mod utils;

pub use self::bigint::BigInt;
pub use self::convert::Parsed;
pub use self::float::{Category, Float, RoundingMode, Semantics, Ternary};
pub use self::float::{BF16, FP128, FP16, FP256, FP32, FP64};
pub use self::status::Flags;
pub use self::string::ParseError;
pub use self::utils::{Lfsr, EXP_MAX, EXP_MIN};
