//! Demo binary wiring a synthetic wideband IQ source through the channelizer,
//! resampler, and dedup gate. Real hardware acquisition is out of scope; the
//! acquisition thread below generates a multi-tone test signal in its place,
//! standing in for whatever SDR driver a real deployment would use.

mod barrier;

use std::sync::Arc;
use std::thread;

use clap::Parser;
use num::complex::Complex32;
use sdr_core::{CoreConfig, Orchestrator};

use barrier::Barrier;

#[derive(Parser, Debug)]
#[command(name = "sdr_demod", about = "Wideband PFB channelizer demo")]
struct Cli {
    /// Number of channels (power of two, 2..=16).
    #[arg(long, default_value_t = 8)]
    channels: usize,

    /// Tuned center frequency, in Hz.
    #[arg(long, default_value_t = 868.5e6)]
    center_hz: f64,

    /// Wideband capture sample rate, in Hz.
    #[arg(long, default_value_t = 2_400_000.0)]
    sample_rate: f64,

    /// Per-channel rate handed to the decoder, in Hz. Defaults to the
    /// channelizer's native per-channel rate (no resampling).
    #[arg(long)]
    decode_rate: Option<f64>,

    /// Number of wideband sample blocks the synthetic source emits.
    #[arg(long, default_value_t = 64)]
    blocks: usize,

    /// Samples per block handed from the acquisition thread to the producer.
    #[arg(long, default_value_t = 4096)]
    block_len: usize,
}

/// Generates one block of synthetic wideband IQ: a handful of fixed tones
/// plus a little noise, standing in for a real radio front end.
fn synthetic_source_block(block_len: usize, sample_rate: f64, block_index: usize, tones_hz: &[f64]) -> Vec<Complex32> {
    let mut out = Vec::with_capacity(block_len);
    for n in 0..block_len {
        let t = (block_index * block_len + n) as f64 / sample_rate;
        let mut sample = Complex32::new(0.0, 0.0);
        for &f in tones_hz {
            let phase = 2.0 * std::f64::consts::PI * f * t;
            sample += Complex32::new(phase.cos() as f32, phase.sin() as f32);
        }
        out.push(sample * (1.0 / tones_hz.len().max(1) as f32));
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = CoreConfig {
        channels: cli.channels,
        center_hz: cli.center_hz,
        sample_rate: cli.sample_rate,
        decode_rate: cli.decode_rate.unwrap_or(cli.sample_rate / cli.channels as f64),
    };
    log::info!(
        "sdr_demod: {} channels, center={:.1} Hz, sample_rate={:.1} Hz, decode_rate={:.1} Hz",
        config.channels,
        config.center_hz,
        config.sample_rate,
        config.decode_rate
    );

    let mut orchestrator = Orchestrator::new(
        &config,
        |event| {
            log::trace!("channel {} ({:.1} Hz): {} samples", event.channel, event.freq_hz, event.samples.len());
        },
        |record| {
            log::info!("decoded record on channel {}: {:?}", record.channel, record.values);
        },
    )?;

    // Handoff buffer between the acquisition thread and this (producer)
    // thread: `None` means empty/consumed, `Some(block)` means a block is
    // waiting to be picked up.
    let handoff: Arc<Barrier<Option<Vec<Complex32>>>> = Arc::new(Barrier::new(None));

    let acquisition = thread::spawn({
        let handoff = handoff.clone();
        let blocks = cli.blocks;
        let block_len = cli.block_len;
        let sample_rate = cli.sample_rate;
        move || {
            let tones_hz = [-500_000.0, -120_000.0, 50_000.0, 900_000.0];
            for block_index in 0..blocks {
                let block = synthetic_source_block(block_len, sample_rate, block_index, &tones_hz);
                if handoff.wait(|slot| slot.is_none()).is_err() {
                    break;
                }
                if handoff.acquire().set(Some(block)).is_err() {
                    break;
                }
            }
        }
    });

    for _ in 0..cli.blocks {
        if handoff.wait(|slot| slot.is_some()).is_err() {
            break;
        }
        let block = handoff.get_clone();
        if handoff.acquire().set(None).is_err() {
            break;
        }
        if let Some(block) = block {
            orchestrator.process_iq(&block)?;
        }
    }

    acquisition.join().ok();
    log::info!("sdr_demod: suppressed {} duplicate records", orchestrator.suppressed_count());
    Ok(())
}
