//! Block-rate parameter smoothing.
//!
//! Control values (frequency, pulse width) arrive once per block. Jumping to
//! the new value on the first sample of a block produces an audible click, so
//! the oscillator ramps linearly from the previous block's settled value to
//! the new target across the block. The settled value is read back after the
//! loop and becomes the seed for the next block's ramp.

pub struct ParameterInterpolator {
    value: f32,
    increment: f32,
}

impl ParameterInterpolator {
    /// Start a ramp from `previous` toward `target` over `size` samples.
    ///
    /// `size` must be non-zero; render paths return early for empty blocks
    /// before constructing an interpolator.
    #[inline]
    pub fn new(previous: f32, target: f32, size: usize) -> Self {
        Self {
            value: previous,
            increment: (target - previous) / size as f32,
        }
    }

    /// Advance one sample and return the ramped value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.value += self.increment;
        self.value
    }

    /// The value the ramp has settled at so far.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }
}
