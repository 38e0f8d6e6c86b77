//! Benchmarks for band-limited waveform generation.

use std::hint::black_box;

use blep_dsp::{Oscillator, OscillatorShape};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Saw - one wrap discontinuity per cycle
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    OscillatorShape::Saw,
                    black_box(0.01),
                    black_box(0.5),
                    black_box(&mut buffer),
                );
            })
        });

        // Square - pulse edge plus wrap per cycle
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    OscillatorShape::Square,
                    black_box(0.01),
                    black_box(0.5),
                    black_box(&mut buffer),
                );
            })
        });

        // Triangle - integrated BLEP corrections
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    OscillatorShape::Triangle,
                    black_box(0.01),
                    black_box(0.5),
                    black_box(&mut buffer),
                );
            })
        });

        // Variable slope - asymmetric ramp rates
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("slope", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    OscillatorShape::Slope,
                    black_box(0.01),
                    black_box(0.2),
                    black_box(&mut buffer),
                );
            })
        });

        // Filtered square - one-pole post-filter per sample
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("square_dark", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    OscillatorShape::SquareDark,
                    black_box(0.01),
                    black_box(0.5),
                    black_box(&mut buffer),
                );
            })
        });

        // Through-zero FM - per-sample combine and clamp path
        let fm: Vec<f32> = (0..size).map(|n| (n as f32 * 0.05).sin() * 2.0).collect();
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("saw_fm", size), &size, |b, _| {
            b.iter(|| {
                osc.render_fm(
                    OscillatorShape::Saw,
                    black_box(0.01),
                    black_box(0.5),
                    black_box(&fm),
                    black_box(&mut buffer),
                );
            })
        });
    }

    group.finish();
}
