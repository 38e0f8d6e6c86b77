//! Audible demo: a saw voice swept from plain vibrato into deep
//! through-zero FM on the default output device.
//!
//! Run with: cargo run --bin sweep

use blep_dsp::dsp::math::soft_clip;
use blep_dsp::{Oscillator, OscillatorShape, MAX_BLOCK_SIZE};
use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::TAU;
use std::{thread, time::Duration};

const CARRIER_HZ: f32 = 55.0;
const MODULATOR_RATIO: f32 = 2.0;
const SWEEP_SECONDS: f32 = 12.0;

fn main() -> Result<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    // Buffers reused by the audio callback.
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut fm_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            {
                let mut osc = Oscillator::new();
                let frequency = CARRIER_HZ / sample_rate;
                let modulator_increment = MODULATOR_RATIO * frequency;
                let mut modulator_phase = 0.0f32;
                let mut elapsed_samples = 0usize;
                let sweep_samples = (SWEEP_SECONDS * sample_rate) as usize;

                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;
                    while frames_written < total_frames {
                        let frames_to_render =
                            (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        // Modulation index climbs from vibrato depth to well
                        // past the point where the instantaneous frequency
                        // goes negative, then holds.
                        for fm in fm_buf[..frames_to_render].iter_mut() {
                            let progress =
                                (elapsed_samples as f32 / sweep_samples as f32).min(1.0);
                            *fm = 3.0 * progress * (TAU * modulator_phase).sin();
                            modulator_phase = (modulator_phase + modulator_increment).fract();
                            elapsed_samples += 1;
                        }

                        let block = &mut render_buf[..frames_to_render];
                        osc.render_fm(
                            OscillatorShape::Saw,
                            frequency,
                            0.5,
                            &fm_buf[..frames_to_render],
                            block,
                        );

                        // Duplicate mono to all channels and write to device.
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            let s = soft_clip(0.7 * s);
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames_to_render;
                    }
                }
            },
            move |err| eprintln!("Stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    println!(
        "Playing a {:.0}s through-zero FM sweep on a {} Hz saw. Ctrl-C to quit early.",
        SWEEP_SECONDS, CARRIER_HZ
    );
    thread::sleep(Duration::from_secs_f32(SWEEP_SECONDS + 2.0));

    Ok(())
}
