use proptest::prelude::*;
use radixfloat::{Flags, Float, RoundingMode, Semantics, Ternary, FP32, FP64};

const BASES: [u32; 6] = [2, 8, 10, 16, 36, 62];

fn digit_char(d: u32, base: u32) -> char {
    let c = match d {
        0..=9 => b'0' + d as u8,
        10..=35 if base <= 36 => b'a' + (d - 10) as u8,
        10..=35 => b'A' + (d - 10) as u8,
        _ => b'a' + (d - 36) as u8,
    };
    c as char
}

/// A base and a number in that base: "digits.digits@exp".
fn radix_literal() -> impl Strategy<Value = (u32, String)> {
    (2u32..=62).prop_flat_map(|base| {
        (
            Just(base),
            prop::collection::vec(0..base, 1..40),
            prop::collection::vec(0..base, 0..40),
            -60i64..60,
            any::<bool>(),
        )
            .prop_map(|(base, int, frac, exp, neg)| {
                let mut text = String::new();
                if neg {
                    text.push('-');
                }
                text.extend(int.iter().map(|d| digit_char(*d, base)));
                text.push('.');
                text.extend(frac.iter().map(|d| digit_char(*d, base)));
                text.push_str(&format!("@{}", exp));
                (base, text)
            })
    })
}

fn parse_with(text: &str, base: u32, sem: Semantics, rm: RoundingMode) -> (Float, Ternary) {
    let mut flags = Flags::empty();
    let res = Float::parse_radix(text, base, sem.with_rm(rm), &mut flags);
    assert_eq!(res.end, text.len());
    assert_eq!(res.ternary.is_exact(), !flags.contains(Flags::INEXACT));
    (res.value, res.ternary)
}

proptest! {
    #[test]
    fn decimal_matches_std(
        int in "[0-9]{1,25}",
        frac in "[0-9]{1,25}",
        exp in -400i32..400,
    ) {
        let text = format!("{}.{}e{}", int, frac, exp);
        let expected: f64 = text.parse().unwrap();
        let res = Float::parse(&text, FP64);
        prop_assert_eq!(res.value.as_f64().to_bits(), expected.to_bits(), "{}", text);

        let expected: f32 = text.parse().unwrap();
        let res = Float::parse(&text, FP32);
        prop_assert_eq!(res.value.as_f32().to_bits(), expected.to_bits(), "{}", text);
    }

    #[test]
    fn directed_modes_bracket_the_value((base, text) in radix_literal()) {
        use RoundingMode::*;
        let sem = Semantics::new(11, 24, NearestTiesToEven);
        let (down, td) = parse_with(&text, base, sem, Negative);
        let (up, tu) = parse_with(&text, base, sem, Positive);
        let (near, tn) = parse_with(&text, base, sem, NearestTiesToEven);
        let (zero, tz) = parse_with(&text, base, sem, Zero);
        let (away, ta) = parse_with(&text, base, sem, Away);

        prop_assert!(down <= up);
        prop_assert!(td != Ternary::Above);
        prop_assert!(tu != Ternary::Below);
        if td.is_exact() || tu.is_exact() {
            prop_assert!(td.is_exact() && tu.is_exact() && tn.is_exact());
            prop_assert!(down == up && up == near);
        } else {
            // The value does not round exactly, so the two directed results
            // are neighbors, and the nearest result is one of them.
            prop_assert!(near == down || near == up);
            prop_assert_eq!(tn, if near == up { Ternary::Above } else { Ternary::Below });
        }

        let negative = text.starts_with('-');
        let (toward, from) = if negative { (&up, &down) } else { (&down, &up) };
        prop_assert!(zero == *toward || (zero.is_zero() && toward.is_zero()));
        prop_assert!(away == *from || (away.is_zero() && from.is_zero()));
        prop_assert_eq!(tz.is_exact(), ta.is_exact());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn radix_text_round_trips(
        v in any::<f64>().prop_filter("finite", |v| v.is_finite()),
        base in prop::sample::select(BASES.to_vec()),
    ) {
        let x = Float::from_f64(FP64, v);
        let text = x.to_string_radix(base).unwrap();
        for rm in RoundingMode::ALL {
            let (y, t) = parse_with(&text, base, FP64, rm);
            prop_assert!(t.is_exact());
            prop_assert_eq!(y.as_f64().to_bits(), v.to_bits(), "{} in base {}", text, base);
        }
    }

    #[test]
    fn f32_text_round_trips(
        v in any::<f32>().prop_filter("finite", |v| v.is_finite()),
        base in prop::sample::select(BASES.to_vec()),
    ) {
        let x = Float::from_f32(FP32, v);
        let text = x.to_string_radix(base).unwrap();
        let (y, t) = parse_with(&text, base, FP32, RoundingMode::NearestTiesToEven);
        prop_assert!(t.is_exact());
        prop_assert_eq!(y.as_f32().to_bits(), v.to_bits());

        // Every f32 is exact in a wider format too.
        let (wide, t) = parse_with(&text, base, FP64, RoundingMode::Zero);
        prop_assert!(t.is_exact());
        prop_assert_eq!(wide.as_f64(), v as f64);
    }
}

#[test]
fn overflow_and_underflow_flags() {
    let mut flags = Flags::empty();
    let res = Float::parse_radix("1e400", 10, FP64, &mut flags);
    assert!(res.value.is_inf());
    assert!(flags.contains(Flags::OVERFLOW | Flags::INEXACT));
    assert!(!flags.contains(Flags::UNDERFLOW));

    flags.clear();
    let res = Float::parse_radix("-1@-1000", 62, FP64, &mut flags);
    assert!(res.value.is_zero() && res.value.is_negative());
    assert_eq!(res.ternary, Ternary::Above);
    assert!(flags.contains(Flags::UNDERFLOW | Flags::INEXACT));

    flags.clear();
    let res = Float::parse_radix("@nan@", 62, FP64, &mut flags);
    assert!(res.value.is_nan());
    assert_eq!(flags, Flags::INVALID);
}
