use criterion::{criterion_group, criterion_main, Criterion};
use sdr_dedup::{DataValue, Dedup, DecodedRecord};

fn bench_check(c: &mut Criterion) {
    let mut dedup = Dedup::new();
    let mut t = 0u64;

    c.bench_function("dedup_check_mixed_traffic", |b| {
        b.iter(|| {
            t += 20;
            let record = DecodedRecord {
                channel: (t % 8) as usize,
                freq_hz: 868_500_000.0 + (t % 4) as f64 * 1500.0,
                timestamp_ms: t,
                values: vec![DataValue::Int((t % 13) as i64)],
            };
            dedup.check(&record)
        });
    });
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
