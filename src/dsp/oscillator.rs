use crate::dsp::blep::{
    next_blep_sample, next_integrated_blep_sample, this_blep_sample, this_integrated_blep_sample,
};
use crate::dsp::interpolator::ParameterInterpolator;
use crate::dsp::math::one_pole;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Band-Limited Oscillator
=======================

This module implements the crate's core: a phase-accumulating oscillator
that renders classic analog waveform shapes without the aliasing a naive
digital oscillator produces, at frequencies that may be modulated per
sample and driven through zero (negative frequency reverses the direction
of travel through the cycle).

Vocabulary
----------

  phase         Running fraction of one waveform period, in [0, 1). Advanced
                by `frequency` (cycles per sample) once per output sample.
                During the single sample where a through-zero wrap is
                resolved it transiently leaves the range.

  wrap          The phase crossing 1.0 going forward, or 0.0 going backward
                when frequency is negative. Saw-family shapes jump in value
                here; ramp-family shapes change slope.

  pulse edge    The phase crossing the pulse-width threshold `pw`. Square
                shapes jump in value here; the variable-slope ramp changes
                slope. The `high` flag records which side of the threshold
                the phase is on so each crossing is seen exactly once.

  pending sample
                A discontinuity found while finalizing sample N also needs a
                residual on sample N+1, so every render iteration finishes
                the previous iteration's sample and accumulates the next
                one. A block of `size` samples therefore spans `size + 1`
                virtual slots, with the last slot carried across blocks in
                `next_sample`.

  through-zero  FM deep enough to drive the instantaneous frequency
                negative. All discontinuity detection has a mirrored case
                for backward motion, with the correction sign flipped.

Shape families
--------------

The eight shapes share one state machine and differ only in which
discontinuities they correct and how the corrected naive value is shaped:

  ImpulseTrain, Saw          wrap step, plain BLEP. The impulse train is
                             the saw differentiated and smoothed by a
                             one-pole (`hp_state` / `lp_state`).
  Triangle, Slope            slope kinks at the pulse edge and the wrap,
                             integrated BLEP. Triangle is the symmetric
                             case (slopes 2/2, pw pinned to 0.5).
  Square, SquareBright,      value step at the pulse edge and the wrap,
  SquareDark, SquareTriangle plain BLEP, then a per-variant post-filter.

Shape and FM mode are resolved once per block by monomorphizing the inner
render over const parameters; the per-sample loop contains no shape or mode
branches.

Control smoothing
-----------------

Frequency and pulse width arrive once per block and are ramped linearly
from the previous block's settled values (see `interpolator`), so a caller
changing controls between blocks never produces a click. Inputs are clamped
at the block boundary (or per sample when external FM is present) so the
inner loop never divides by zero and the pulse never collapses to zero
width: |frequency| stays within [MIN_FREQUENCY, MAX_FREQUENCY] and pw
within [2|f|, 1 - 2|f|].
*/

/// Highest renderable frequency, in cycles per sample (half of Nyquist).
pub const MAX_FREQUENCY: f32 = 0.25;
/// Lowest frequency magnitude; keeps sub-sample crossing times finite.
pub const MIN_FREQUENCY: f32 = 0.000001;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub enum OscillatorShape {
    ImpulseTrain,
    Saw,
    Triangle,
    Slope,
    Square,
    SquareBright,
    SquareDark,
    SquareTriangle,
}

/// Square-family post-filter selectors for the monomorphized render.
mod square_variant {
    pub const PLAIN: u8 = 0;
    pub const BRIGHT: u8 = 1;
    pub const DARK: u8 = 2;
    pub const TRIANGLE: u8 = 3;
}

pub struct Oscillator {
    // Oscillator state.
    phase: f32,
    next_sample: f32,
    lp_state: f32,
    hp_state: f32,
    high: bool,

    // Settled block-rate control values, seeds for the next block's ramp.
    frequency: f32,
    pw: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        Self {
            phase: 0.5,
            next_sample: 0.0,
            lp_state: 1.0,
            hp_state: 0.0,
            high: true,

            frequency: 0.001,
            pw: 0.5,
        }
    }

    /// Restore the freshly initialized state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current phase accumulator value, in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Render one block at a fixed-sign frequency.
    ///
    /// `frequency` is clamped to [MIN_FREQUENCY, MAX_FREQUENCY] and `pw` to
    /// [2f, 1 - 2f] before the block-rate ramp starts.
    pub fn render(&mut self, shape: OscillatorShape, frequency: f32, pw: f32, out: &mut [f32]) {
        self.dispatch::<false, false>(shape, frequency, pw, &[], out);
    }

    /// Render one block allowing a negative target frequency.
    ///
    /// `frequency` is clamped to [-MAX_FREQUENCY, MAX_FREQUENCY]; a negative
    /// value runs the waveform backward through its cycle.
    pub fn render_through_zero(
        &mut self,
        shape: OscillatorShape,
        frequency: f32,
        pw: f32,
        out: &mut [f32],
    ) {
        self.dispatch::<false, true>(shape, frequency, pw, &[], out);
    }

    /// Render one block with per-sample external FM, through-zero capable.
    ///
    /// Each output sample uses `frequency * (1 + fm[n])`, re-clamped per
    /// sample since the combined value can exceed the static bounds.
    ///
    /// # Panics
    ///
    /// Panics if `fm.len() != out.len()`.
    pub fn render_fm(
        &mut self,
        shape: OscillatorShape,
        frequency: f32,
        pw: f32,
        fm: &[f32],
        out: &mut [f32],
    ) {
        assert_eq!(
            fm.len(),
            out.len(),
            "external FM buffer must match the output block length"
        );
        self.dispatch::<true, true>(shape, frequency, pw, fm, out);
    }

    fn dispatch<const HAS_FM: bool, const THROUGH_ZERO: bool>(
        &mut self,
        shape: OscillatorShape,
        mut frequency: f32,
        mut pw: f32,
        fm: &[f32],
        out: &mut [f32],
    ) {
        if out.is_empty() {
            return;
        }
        if !HAS_FM {
            frequency = clamp_frequency::<THROUGH_ZERO>(frequency);
            pw = clamp_pulse_width(pw, frequency);
        }

        match shape {
            OscillatorShape::ImpulseTrain => {
                self.render_phase::<false, HAS_FM, THROUGH_ZERO>(frequency, pw, fm, out)
            }
            OscillatorShape::Saw => {
                self.render_phase::<true, HAS_FM, THROUGH_ZERO>(frequency, pw, fm, out)
            }
            OscillatorShape::Triangle => {
                self.render_slope::<true, HAS_FM, THROUGH_ZERO>(frequency, pw, fm, out)
            }
            OscillatorShape::Slope => {
                self.render_slope::<false, HAS_FM, THROUGH_ZERO>(frequency, pw, fm, out)
            }
            OscillatorShape::Square => self
                .render_square::<{ square_variant::PLAIN }, HAS_FM, THROUGH_ZERO>(
                    frequency, pw, fm, out,
                ),
            OscillatorShape::SquareBright => self
                .render_square::<{ square_variant::BRIGHT }, HAS_FM, THROUGH_ZERO>(
                    frequency, pw, fm, out,
                ),
            OscillatorShape::SquareDark => self
                .render_square::<{ square_variant::DARK }, HAS_FM, THROUGH_ZERO>(
                    frequency, pw, fm, out,
                ),
            OscillatorShape::SquareTriangle => self
                .render_square::<{ square_variant::TRIANGLE }, HAS_FM, THROUGH_ZERO>(
                    frequency, pw, fm, out,
                ),
        }
    }

    /// Saw family: one value step per cycle, at the phase wrap.
    fn render_phase<const RAW_SAW: bool, const HAS_FM: bool, const THROUGH_ZERO: bool>(
        &mut self,
        frequency: f32,
        pw: f32,
        external_fm: &[f32],
        out: &mut [f32],
    ) {
        let mut fm_ramp = ParameterInterpolator::new(self.frequency, frequency, out.len());
        let mut pw_ramp = ParameterInterpolator::new(self.pw, pw, out.len());
        let mut next_sample = self.next_sample;

        for (n, sample) in out.iter_mut().enumerate() {
            let mut this_sample = next_sample;
            next_sample = 0.0;

            let mut frequency = fm_ramp.next();
            pw_ramp.next();
            if HAS_FM {
                frequency *= 1.0 + external_fm[n];
                frequency = clamp_frequency::<THROUGH_ZERO>(frequency);
            }
            self.phase += frequency;

            if self.phase >= 1.0 {
                self.phase -= 1.0;
                let t = self.phase / frequency;
                this_sample -= this_blep_sample(t);
                next_sample -= next_blep_sample(t);
            } else if THROUGH_ZERO && self.phase < 0.0 {
                let t = self.phase / frequency;
                self.phase += 1.0;
                this_sample += this_blep_sample(t);
                next_sample += next_blep_sample(t);
            }
            next_sample += self.phase;

            *sample = if RAW_SAW {
                2.0 * this_sample - 1.0
            } else {
                // Differentiating the corrected ramp leaves only its wrap
                // steps; the one-pole spreads each into a smooth impulse.
                let edge = self.hp_state - this_sample;
                one_pole(&mut self.lp_state, edge, 0.25);
                self.hp_state = this_sample;
                4.0 * self.lp_state
            };
        }

        self.next_sample = next_sample;
        self.frequency = fm_ramp.value();
        self.pw = pw_ramp.value();
    }

    /// Ramp family: slope kinks at the pulse edge and the wrap, corrected
    /// with integrated BLEP. `SYMMETRIC` pins pw to 0.5 with slopes 2/2.
    fn render_slope<const SYMMETRIC: bool, const HAS_FM: bool, const THROUGH_ZERO: bool>(
        &mut self,
        frequency: f32,
        pw: f32,
        external_fm: &[f32],
        out: &mut [f32],
    ) {
        let mut fm_ramp = ParameterInterpolator::new(self.frequency, frequency, out.len());
        let mut pw_ramp = ParameterInterpolator::new(self.pw, pw, out.len());
        let mut next_sample = self.next_sample;

        for (n, sample) in out.iter_mut().enumerate() {
            let mut this_sample = next_sample;
            next_sample = 0.0;

            let mut frequency = fm_ramp.next();
            let mut pw = if SYMMETRIC { 0.5 } else { pw_ramp.next() };
            if HAS_FM {
                frequency *= 1.0 + external_fm[n];
                frequency = clamp_frequency::<THROUGH_ZERO>(frequency);
                pw = clamp_pulse_width(pw, frequency);
            }
            self.phase += frequency;

            let (slope_up, slope_down) = if SYMMETRIC {
                (2.0, 2.0)
            } else {
                (1.0 / pw, 1.0 / (1.0 - pw))
            };

            if self.high != (self.phase < pw) {
                let t = (self.phase - pw) / frequency;
                let mut discontinuity = (slope_up + slope_down) * frequency;
                if THROUGH_ZERO && frequency < 0.0 {
                    discontinuity = -discontinuity;
                }
                this_sample -= this_integrated_blep_sample(t) * discontinuity;
                next_sample -= next_integrated_blep_sample(t) * discontinuity;
                self.high = self.phase < pw;
            }

            if self.phase >= 1.0 {
                self.phase -= 1.0;
                let t = self.phase / frequency;
                let discontinuity = (slope_up + slope_down) * frequency;
                this_sample += this_integrated_blep_sample(t) * discontinuity;
                next_sample += next_integrated_blep_sample(t) * discontinuity;
                self.high = true;
            } else if THROUGH_ZERO && self.phase < 0.0 {
                let t = self.phase / frequency;
                self.phase += 1.0;
                let discontinuity = (slope_up + slope_down) * frequency;
                this_sample -= this_integrated_blep_sample(t) * discontinuity;
                next_sample -= next_integrated_blep_sample(t) * discontinuity;
                self.high = false;
            }

            next_sample += if self.high {
                self.phase * slope_up
            } else {
                1.0 - (self.phase - pw) * slope_down
            };
            *sample = 2.0 * this_sample - 1.0;
        }

        self.next_sample = next_sample;
        self.frequency = fm_ramp.value();
        if !SYMMETRIC {
            self.pw = pw_ramp.value();
        }
    }

    /// Square family: unit value steps at the pulse edge and the wrap, then
    /// a per-variant post-filter on the corrected square.
    fn render_square<const VARIANT: u8, const HAS_FM: bool, const THROUGH_ZERO: bool>(
        &mut self,
        frequency: f32,
        pw: f32,
        external_fm: &[f32],
        out: &mut [f32],
    ) {
        let mut fm_ramp = ParameterInterpolator::new(self.frequency, frequency, out.len());
        let mut pw_ramp = ParameterInterpolator::new(self.pw, pw, out.len());
        let mut next_sample = self.next_sample;

        for (n, sample) in out.iter_mut().enumerate() {
            let mut this_sample = next_sample;
            next_sample = 0.0;

            let mut frequency = fm_ramp.next();
            let mut pw = if VARIANT == square_variant::TRIANGLE {
                0.5
            } else {
                pw_ramp.next()
            };
            if HAS_FM {
                frequency *= 1.0 + external_fm[n];
                frequency = clamp_frequency::<THROUGH_ZERO>(frequency);
                pw = clamp_pulse_width(pw, frequency);
            }
            self.phase += frequency;

            if self.high != (self.phase >= pw) {
                let t = (self.phase - pw) / frequency;
                let mut discontinuity = 1.0;
                if THROUGH_ZERO && frequency < 0.0 {
                    discontinuity = -discontinuity;
                }
                this_sample += this_blep_sample(t) * discontinuity;
                next_sample += next_blep_sample(t) * discontinuity;
                self.high = self.phase >= pw;
            }

            if self.phase >= 1.0 {
                self.phase -= 1.0;
                let t = self.phase / frequency;
                this_sample -= this_blep_sample(t);
                next_sample -= next_blep_sample(t);
                self.high = false;
            } else if THROUGH_ZERO && self.phase < 0.0 {
                let t = self.phase / frequency;
                self.phase += 1.0;
                this_sample += this_blep_sample(t);
                next_sample += next_blep_sample(t);
                self.high = true;
            }
            next_sample += if self.phase < pw { 0.0 } else { 1.0 };

            *sample = if VARIANT == square_variant::TRIANGLE {
                let coefficient = frequency * 0.0625;
                let x = 128.0 * (this_sample - 0.5);
                one_pole(&mut self.lp_state, x, coefficient);
                self.lp_state
            } else if VARIANT == square_variant::DARK {
                let coefficient = frequency * 2.0;
                let x = 4.0 * (this_sample - 0.5);
                one_pole(&mut self.lp_state, x, coefficient);
                self.lp_state
            } else if VARIANT == square_variant::BRIGHT {
                let coefficient = frequency * 2.0;
                let x = 2.0 * this_sample - 1.0;
                one_pole(&mut self.lp_state, x, coefficient);
                (x - self.lp_state) * 0.5
            } else {
                2.0 * this_sample - 1.0
            };
        }

        self.next_sample = next_sample;
        self.frequency = fm_ramp.value();
        if VARIANT != square_variant::TRIANGLE {
            self.pw = pw_ramp.value();
        }
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn clamp_frequency<const THROUGH_ZERO: bool>(frequency: f32) -> f32 {
    if THROUGH_ZERO {
        frequency.clamp(-MAX_FREQUENCY, MAX_FREQUENCY)
    } else {
        frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY)
    }
}

/// Keep the pulse at least two samples away from either end of the cycle.
#[inline]
fn clamp_pulse_width(pw: f32, frequency: f32) -> f32 {
    let limit = 2.0 * frequency.abs();
    pw.clamp(limit, 1.0 - limit)
}
