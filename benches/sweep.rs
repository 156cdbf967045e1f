//! Sweep benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hybrid_ratio_sim::*;

fn benchmark_symbol_level_point(c: &mut Criterion) {
    let config = SimConfig {
        trials: 10_000,
        snr_db: vec![10.0],
        ..SimConfig::default()
    };
    let driver = MonteCarloDriver::new(config).unwrap();

    c.bench_function("symbol_level_fsk_10000_trials", |b| {
        b.iter(|| black_box(driver.run_point(Scheme::Fsk, 0, 1).unwrap()))
    });
    c.bench_function("symbol_level_hybrid_10000_trials", |b| {
        b.iter(|| black_box(driver.run_point(Scheme::Hybrid, 0, 1).unwrap()))
    });
}

fn benchmark_waveform_point(c: &mut Criterion) {
    let config = SimConfig {
        variant: Variant {
            encoding: Encoding::WaveformLevel,
            channel: ChannelKind::AwgnFading,
        },
        trials: 1_000,
        snr_db: vec![10.0],
        ..SimConfig::default()
    };
    let driver = MonteCarloDriver::new(config).unwrap();

    c.bench_function("waveform_fsk_1000_trials", |b| {
        b.iter(|| black_box(driver.run_point(Scheme::Fsk, 0, 1).unwrap()))
    });
    c.bench_function("waveform_hybrid_1000_trials", |b| {
        b.iter(|| black_box(driver.run_point(Scheme::Hybrid, 0, 1).unwrap()))
    });
}

fn benchmark_energy_detector(c: &mut Criterion) {
    let params = config::WaveformParams::default();
    let alphabet = Alphabet::new(16).unwrap();
    let detector = EnergyDetector::new(&params, alphabet);
    let tone = signal::FskToneGenerator::new(params).tone(7);

    c.bench_function("energy_detector_m16_decode", |b| {
        b.iter(|| black_box(detector.decode(black_box(&tone))))
    });
}

criterion_group!(
    benches,
    benchmark_symbol_level_point,
    benchmark_waveform_point,
    benchmark_energy_detector
);
criterion_main!(benches);
