//! Oversampled polyphase filter bank (PFB) channelizer.
//!
//! Splits one wideband complex baseband stream into `M` contiguous,
//! equally-spaced channels in a single pass: an `M`-branch polyphase FIR
//! followed by an `M`-point FFT. Runs 2x-oversampled (decimation `D = M/2`
//! rather than `M`) so adjacent channels overlap instead of aliasing at
//! their shared edge, which is what lets a signal straddling a channel
//! boundary still be fully recoverable from one of the two channels it
//! lands in.

mod error;
mod window;

pub use error::{Error, Result};

use std::sync::atomic::{AtomicU8, Ordering};

use num::complex::Complex32;
use sdr_dsp_common::{design_kaiser_lowpass, is_power_of_two};
use sdr_fft::FftPlan;
use window::PolyphaseWindow;

const FILTER_SEMI_LEN: usize = 24;
const STOPBAND_DB: f32 = 80.0;
const CUTOFF_RATIO: f32 = 0.9;
const MAX_CHANNELS: usize = 16;

const INIT_NOT_STARTED: u8 = 0;
const INIT_IN_PROGRESS: u8 = 1;
const INIT_DONE: u8 = 2;
static FFT_BACKEND_INIT: AtomicU8 = AtomicU8::new(INIT_NOT_STARTED);

/// Confirms the FFT backend once per process, the first time any
/// channelizer is built. Concurrent callers spin-wait rather than racing to
/// log the same line twice; this never actually allocates anything, it just
/// mirrors the one-time-init handshake the scalar FFT backend used in its
/// original C form.
fn ensure_fft_backend_ready() {
    loop {
        match FFT_BACKEND_INIT.compare_exchange(
            INIT_NOT_STARTED,
            INIT_IN_PROGRESS,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                log::info!("sdr_channelizer: fft backend ready ({})", sdr_fft::build_info());
                FFT_BACKEND_INIT.store(INIT_DONE, Ordering::Release);
                return;
            }
            Err(INIT_DONE) => return,
            Err(_) => std::hint::spin_loop(),
        }
    }
}

/// A PFB channelizer for a fixed `M`, `sample_rate`, and `center_hz`.
///
/// Owned by exactly one thread on the hot path (`process` mutates per-branch
/// history and the FFT plan's scratch); the filter coefficients themselves
/// never change after construction.
pub struct Channelizer {
    m: usize,
    decimation: usize,
    coeffs: Vec<Vec<f32>>,
    windows: Vec<PolyphaseWindow>,
    commutator_idx: usize,
    fft_plan: FftPlan,
    fft_in: Vec<Complex32>,
    fft_out: Vec<Complex32>,
    block_index: u64,
    sample_rate: f64,
    center_hz: f64,
}

impl Channelizer {
    /// Builds an `m`-channel channelizer. `m` must be a power of two in
    /// `[2, 16]`. `sample_rate` and `center_hz` are only used to answer
    /// `channel_freq` and are in the same units (Hz is the natural choice).
    pub fn new(m: usize, sample_rate: f64, center_hz: f64) -> Result<Self> {
        if !is_power_of_two(m) || m < 2 || m > MAX_CHANNELS {
            return Err(Error::InvalidChannelCount);
        }
        ensure_fft_backend_ready();

        let p = 2 * FILTER_SEMI_LEN;
        let h_len = 2 * m * FILTER_SEMI_LEN + 1;
        let cutoff = CUTOFF_RATIO / m as f32;
        let proto = design_kaiser_lowpass(h_len, cutoff, STOPBAND_DB);

        log::info!("sdr_channelizer: building M={m} channelizer ({h_len} tap prototype, {p} taps/branch)");

        let mut coeffs = Vec::with_capacity(m);
        for i in 0..m {
            let mut branch_coeffs = vec![0.0f32; p];
            for n in 0..p {
                let proto_idx = n * m + i;
                branch_coeffs[p - n - 1] = proto[proto_idx];
            }
            coeffs.push(branch_coeffs);
        }
        let windows = (0..m).map(|_| PolyphaseWindow::new(p)).collect();

        let fft_plan = FftPlan::new(m).map_err(|_| Error::OutOfMemory)?;

        Ok(Self {
            m,
            decimation: m / 2,
            coeffs,
            windows,
            commutator_idx: 0,
            fft_plan,
            fft_in: vec![Complex32::new(0.0, 0.0); m],
            fft_out: vec![Complex32::new(0.0, 0.0); m],
            block_index: 0,
            sample_rate,
            center_hz,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.m
    }

    /// Channel `k`'s center frequency, in natural FFT bin order: `0` is DC
    /// (the channelizer's own center frequency), `1..=M/2` are the positive
    /// offsets up to and including Nyquist, `M/2+1..M` are the negative
    /// offsets.
    pub fn channel_freq(&self, k: usize) -> f64 {
        let bin_hz = self.sample_rate / self.m as f64;
        let signed_k = if k <= self.m / 2 { k as i64 } else { k as i64 - self.m as i64 };
        self.center_hz + signed_k as f64 * bin_hz
    }

    /// Processes `input`, a block whose length must be a multiple of `M/2`.
    /// Returns one `M`-wide row of channel samples per `M/2` input samples
    /// consumed.
    pub fn process(&mut self, input: &[Complex32]) -> Result<Vec<Vec<Complex32>>> {
        if self.decimation == 0 || input.len() % self.decimation != 0 {
            return Err(Error::InvalidBlockLength);
        }

        let mut rows = Vec::with_capacity(input.len() / self.decimation);
        for block in input.chunks(self.decimation) {
            for &sample in block {
                self.commutator_idx = (self.commutator_idx + self.m - 1) & (self.m - 1);
                self.windows[self.commutator_idx].push(sample);
            }

            for i in 0..self.m {
                let slot = (i + self.commutator_idx + 1) & (self.m - 1);
                self.fft_in[self.m - i - 1] = self.windows[slot].dot(&self.coeffs[i]);
            }
            self.fft_plan
                .forward(&self.fft_in, &mut self.fft_out)
                .map_err(|_| Error::OutOfMemory)?;

            if self.block_index % 2 == 1 {
                for k in (1..self.m).step_by(2) {
                    self.fft_out[k] = -self.fft_out[k];
                }
            }
            self.block_index += 1;
            rows.push(self.fft_out.clone());
        }
        Ok(rows)
    }
}
