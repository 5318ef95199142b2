use radixfloat::{BigInt, Flags, Float, Lfsr, RoundingMode, Semantics};
use radixfloat::{BF16, FP128, FP64};

use RoundingMode::NearestTiesToEven as rme;

// 1 + 2^-53, which needs several rounds of the conversion to round.
const HALFWAY: &str = "1.00000000000000011102230246251565404236316680908203125";

fn test_parse_decimal() {
    for text in ["0.1", "3.14159265358979", "6.02214076e23", "1e-300"] {
        black_box(Float::parse(text, FP64));
    }
}

fn test_parse_halfway() {
    black_box(Float::parse(HALFWAY, FP64));
}

fn test_parse_base62() {
    let mut flags = Flags::empty();
    let text = "Zz9a.bC81xYq@-40";
    black_box(Float::parse_radix(text, 62, FP128, &mut flags));
}

fn test_parse_long_mantissa() {
    let sem = Semantics::new(32, 2000, rme);
    let digits: String = (0..1000).map(|i| char::from(b'1' + (i % 9) as u8)).collect();
    let text = format!("{}e-700", digits);
    black_box(Float::parse(&text, sem));
}

fn test_bf16_round_trip() {
    let mut flags = Flags::empty();
    let sem = Semantics::new(16, 8, rme);
    for bits in (0..=u16::MAX).step_by(17) {
        let (x, _) = Float::from_bf16_bits(sem, bits, &mut flags);
        black_box(x.as_bf16_bits(rme, &mut flags));
    }
}

fn test_bf16_encode() {
    let mut flags = Flags::empty();
    let mut lfsr = Lfsr::new();
    for _ in 0..100 {
        let x = Float::from_f64(FP64, f64::from_bits(lfsr.get64()));
        black_box(x.as_bf16_bits(RoundingMode::Zero, &mut flags));
    }
    black_box(Float::one(BF16, false));
}

fn test_radix_string() {
    let x = Float::parse("1.7976931348623157e308", FP64).value;
    black_box(x.to_string_radix(10));
    black_box(x.to_string_radix(62));
}

fn test_bigint_digits() {
    let a = BigInt::from_u64(197123);
    black_box(a.powi(100).to_digits(10));
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("test_parse_decimal", |b| b.iter(test_parse_decimal));
    c.bench_function("test_parse_halfway", |b| b.iter(test_parse_halfway));
    c.bench_function("test_parse_base62", |b| b.iter(test_parse_base62));
    c.bench_function("test_parse_long_mantissa", |b| {
        b.iter(test_parse_long_mantissa)
    });
    c.bench_function("test_bf16_round_trip", |b| b.iter(test_bf16_round_trip));
    c.bench_function("test_bf16_encode", |b| b.iter(test_bf16_encode));
    c.bench_function("test_radix_string", |b| b.iter(test_radix_string));
    c.bench_function("test_bigint_digits", |b| b.iter(test_bigint_digits));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
