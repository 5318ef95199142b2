use proptest::prelude::*;
use radixfloat::{Flags, Float, RoundingMode, Semantics, Ternary, BF16, FP32};

fn is_nan_pattern(bits: u16) -> bool {
    bits & 0x7f80 == 0x7f80 && bits & 0x7f != 0
}

fn any_mode() -> impl Strategy<Value = RoundingMode> {
    prop::sample::select(RoundingMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn decode_encode_is_identity(bits in any::<u16>(), rm in any_mode()) {
        let mut flags = Flags::empty();
        let sem = Semantics::new(8, 24, rm);
        let (x, t) = Float::from_bf16_bits(sem, bits, &mut flags);
        prop_assert_eq!(t, Ternary::Exact);
        let back = x.as_bf16_bits(rm, &mut flags);
        if is_nan_pattern(bits) {
            prop_assert!(x.is_nan());
            prop_assert!(is_nan_pattern(back));
            prop_assert!(flags.contains(Flags::INVALID));
        } else {
            prop_assert_eq!(back, bits);
            prop_assert!(flags.is_empty());
        }
    }

    #[test]
    fn encode_matches_generic_packing(v in any::<f32>(), rm in any_mode()) {
        prop_assume!(!v.is_nan());
        let mut flags = Flags::empty();
        let x = Float::from_f32(FP32, v);
        let bits = x.as_bf16_bits(rm, &mut flags);
        let packed = x.cast_with_rm(BF16, rm).to_bits() as u16;
        prop_assert_eq!(bits, packed);
    }

    #[test]
    fn encode_rounds_in_the_right_direction(v in any::<f32>()) {
        prop_assume!(v.is_finite());
        let mut flags = Flags::empty();
        let x = Float::from_f32(FP32, v);
        let load = |bits: u16, flags: &mut Flags| Float::from_bf16_bits(FP32, bits, flags).0;

        let down = load(x.as_bf16_bits(RoundingMode::Negative, &mut flags), &mut flags);
        let up = load(x.as_bf16_bits(RoundingMode::Positive, &mut flags), &mut flags);
        let near = load(x.as_bf16_bits(RoundingMode::NearestTiesToEven, &mut flags), &mut flags);
        prop_assert!(down <= x);
        prop_assert!(x <= up);
        prop_assert!(near == down || near == up);

        // Values that fit in the format are not changed.
        if (v.to_bits() & 0xffff) == 0 {
            prop_assert!(down == x && up == x && near == x);
        }
    }
}
