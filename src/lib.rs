pub mod dsp;

pub use dsp::oscillator::{Oscillator, OscillatorShape};

pub const MAX_BLOCK_SIZE: usize = 2048;
