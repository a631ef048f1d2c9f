use criterion::{criterion_group, criterion_main, Criterion};
use num::complex::Complex32;
use sdr_core::{CoreConfig, Orchestrator};

fn bench_process_iq(c: &mut Criterion) {
    let config = CoreConfig {
        channels: 8,
        center_hz: 868.5e6,
        sample_rate: 2_400_000.0,
        decode_rate: 300_000.0,
    };
    let mut orch = Orchestrator::new(&config, |_event| {}, |_record| {}).unwrap();
    let input = vec![Complex32::new(0.1, -0.1); 4096];

    c.bench_function("orchestrator_process_iq_8ch_4096", |b| {
        b.iter(|| orch.process_iq(&input).unwrap());
    });
}

criterion_group!(benches, bench_process_iq);
criterion_main!(benches);
