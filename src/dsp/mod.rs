//! Low-level DSP primitives for band-limited waveform generation.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They intentionally stay focused on the
//! signal-processing math so a hosting voice or engine can layer on pitch
//! handling, envelopes, and mixing.

/// Band-limited step correction kernels.
pub mod blep;
/// Block-rate parameter smoothing.
pub mod interpolator;
/// One-pole filter update and soft saturation helpers.
pub mod math;
/// The band-limited oscillator and its waveform shapes.
pub mod oscillator;

pub use oscillator::{Oscillator, OscillatorShape};
