use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num::complex::Complex32;
use sdr_fft::FftPlan;

fn bench_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_forward");
    for &n in &[2usize, 4, 8, 16, 32] {
        let mut plan = FftPlan::new(n).unwrap();
        let input: Vec<Complex32> = (0..n).map(|i| Complex32::new(i as f32, -(i as f32))).collect();
        let mut output = vec![Complex32::new(0.0, 0.0); n];

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| plan.forward(&input, &mut output).unwrap());
        });
    }
    group.finish();
}

fn bench_r2c(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_forward_r2c");
    for &n in &[8usize, 16, 32] {
        let mut plan = FftPlan::new(n).unwrap();
        let input: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let mut output = vec![Complex32::new(0.0, 0.0); n / 2 + 1];

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| plan.forward_r2c(&input, &mut output).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward, bench_r2c);
criterion_main!(benches);
