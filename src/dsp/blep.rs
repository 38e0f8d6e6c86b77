//! Band-limited step (BLEP) correction kernels.

/*
BLEP Correction
===============

A digital oscillator that jumps instantaneously between two values (a saw
wrapping around, a square switching levels) produces energy above Nyquist
that folds back into the audible band as inharmonic aliasing. The BLEP
technique cancels that energy by replacing the ideal step with a two-sample
band-limited approximation of it.

Vocabulary
----------

  t             Position of the sample relative to the discontinuity, in
                samples, in [0, 1]. t = 0 means the jump landed exactly on
                the current sample boundary; t close to 1 means it happened
                just after the previous one.

  this/next     A discontinuity discovered while finalizing sample N needs a
                residual added to sample N *and* to sample N+1. The
                oscillator keeps a one-sample pending accumulator so the
                "next" half can be applied retroactively.

  integrated    Ramp-family shapes (triangle, variable slope) have no jump
                in value, only a kink in the derivative. Correcting the kink
                requires the integral of the step residual instead.

For a rising unit step, `this` lifts the sample before the jump toward the
step and `next` pulls the sample after it back toward the step: the pair is
antisymmetric, so `next_blep_sample` carries the negative half. The
integrated pair is a one-signed bump, symmetric around the kink.

These are the closed-form two-sample polynomials: cheap enough to evaluate
per discontinuity on the hot path, and effective at common audio rates
(44.1-96 kHz). Callers scale them by the magnitude and sign of the
discontinuity being cancelled.
*/

/// Step residual applied to the sample in which the step occurred.
#[inline]
pub fn this_blep_sample(t: f32) -> f32 {
    0.5 * t * t
}

/// Step residual carried into the following sample.
#[inline]
pub fn next_blep_sample(t: f32) -> f32 {
    let t = 1.0 - t;
    -0.5 * t * t
}

/// Slope-kink residual carried into the following sample.
#[inline]
pub fn next_integrated_blep_sample(t: f32) -> f32 {
    let t1 = 0.5 * t;
    let t2 = t1 * t1;
    let t4 = t2 * t2;
    0.1875 - t1 + 1.5 * t2 - t4
}

/// Slope-kink residual applied to the sample in which the kink occurred.
#[inline]
pub fn this_integrated_blep_sample(t: f32) -> f32 {
    next_integrated_blep_sample(1.0 - t)
}
