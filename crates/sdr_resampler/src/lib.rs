//! Rational polyphase resampler: converts between an arbitrary input and
//! output sample rate by an exact `L/M` ratio derived from their `gcd`.
//!
//! A single Kaiser-windowed lowpass prototype (scaled by `L` for gain, since
//! only every `L`th reconstructed sample leaves the filter) is split into `L`
//! polyphase branches of `TAPS_PER_BRANCH` taps each. A phase accumulator
//! walks the branches once per output sample without ever explicitly
//! up-sampling then decimating.

mod error;

pub use error::{Error, Result};

use num::complex::Complex32;
use sdr_dsp_common::{design_kaiser_lowpass, gcd, next_power_of_two};

const TAPS_PER_BRANCH: usize = 32;
const STOPBAND_DB: f32 = 80.0;

/// A single-channel rational resampler, owned by exactly one thread.
///
/// Built once per input/output rate pair and then driven sample-block by
/// sample-block through `process`; the polyphase branch coefficients are
/// fixed after construction, only the history ring and phase accumulator
/// mutate on the hot path.
pub struct Resampler {
    up: u32,
    down: u32,
    passthrough: bool,
    branches: Vec<Vec<f32>>,
    history: Vec<Complex32>,
    hist_mask: usize,
    write_pos: usize,
    phase: u32,
}

impl Resampler {
    /// Builds a resampler converting from `rate_in` to `rate_out` (in any
    /// consistent unit, e.g. Hz). `rate_in == rate_out` degenerates to a
    /// passthrough with no filtering.
    pub fn new(rate_in: u32, rate_out: u32) -> Result<Self> {
        if rate_in == 0 || rate_out == 0 {
            return Err(Error::InvalidRate);
        }
        if rate_in > i32::MAX as u32 || rate_out > i32::MAX as u32 {
            return Err(Error::InvalidRate);
        }
        let g = gcd(rate_in, rate_out);
        let up = rate_out / g;
        let down = rate_in / g;

        if up == 1 && down == 1 {
            log::debug!("sdr_resampler: {rate_in} -> {rate_out} is 1:1, using passthrough");
            return Ok(Self {
                up,
                down,
                passthrough: true,
                branches: Vec::new(),
                history: Vec::new(),
                hist_mask: 0,
                write_pos: 0,
                phase: 0,
            });
        }

        if up as usize > i32::MAX as usize / TAPS_PER_BRANCH {
            return Err(Error::FactorOverflow);
        }
        let num_taps = up as usize * TAPS_PER_BRANCH;

        log::info!("sdr_resampler: building {rate_in} -> {rate_out} (L={up}, M={down}, {num_taps} taps)");

        let cutoff = 0.5 / up.max(down) as f32;
        let mut proto = design_kaiser_lowpass(num_taps, cutoff, STOPBAND_DB);
        for coeff in proto.iter_mut() {
            *coeff *= up as f32; // gain compensation: only 1-in-L branch outputs survive
        }

        let mut branches = vec![vec![0.0f32; TAPS_PER_BRANCH]; up as usize];
        for m in 0..up as usize {
            for k in 0..TAPS_PER_BRANCH {
                branches[m][k] = proto[m + k * up as usize];
            }
        }

        let hist_size = next_power_of_two((TAPS_PER_BRANCH * 2).max(64));
        let hist_bytes = hist_size.checked_mul(std::mem::size_of::<Complex32>()).ok_or(Error::BufferTooLarge)?;
        if hist_bytes > isize::MAX as usize {
            return Err(Error::BufferTooLarge);
        }

        Ok(Self {
            up,
            down,
            passthrough: false,
            branches,
            history: vec![Complex32::new(0.0, 0.0); hist_size],
            hist_mask: hist_size - 1,
            write_pos: 0,
            phase: 0,
        })
    }

    /// The up-sampling factor `L`.
    pub fn up_factor(&self) -> u32 {
        self.up
    }

    /// The down-sampling factor `M`.
    pub fn down_factor(&self) -> u32 {
        self.down
    }

    /// Resamples `input`, returning the produced samples. The phase
    /// accumulator persists across calls, so splitting one logical block
    /// across several `process` calls is equivalent to one call with the
    /// concatenated input.
    pub fn process(&mut self, input: &[Complex32]) -> Vec<Complex32> {
        if self.passthrough {
            return input.to_vec();
        }

        let mut output = Vec::with_capacity(input.len() * self.up as usize / self.down as usize + 1);
        for &sample in input {
            self.history[self.write_pos & self.hist_mask] = sample;
            self.write_pos = self.write_pos.wrapping_add(1);
            let base_read_pos = self.write_pos.wrapping_sub(1);

            while self.phase < self.up {
                let branch = &self.branches[self.phase as usize];
                let mut acc = Complex32::new(0.0, 0.0);
                let mut read_pos = base_read_pos;
                for &coeff in branch {
                    acc += self.history[read_pos & self.hist_mask] * coeff;
                    read_pos = read_pos.wrapping_sub(1);
                }
                output.push(acc);
                self.phase += self.down;
            }
            self.phase -= self.up;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_rates() {
        assert_eq!(Resampler::new(0, 100).unwrap_err(), Error::InvalidRate);
        assert_eq!(Resampler::new(100, 0).unwrap_err(), Error::InvalidRate);
    }

    #[test]
    fn rejects_rates_exceeding_signed_32_bit_domain() {
        assert_eq!(Resampler::new(3_000_000_000, 48_000).unwrap_err(), Error::InvalidRate);
        assert_eq!(Resampler::new(48_000, 3_000_000_000).unwrap_err(), Error::InvalidRate);
    }

    #[test]
    fn equal_rates_are_passthrough() {
        let mut r = Resampler::new(48_000, 48_000).unwrap();
        let input: Vec<Complex32> = (0..16).map(|i| Complex32::new(i as f32, -(i as f32))).collect();
        let out = r.process(&input);
        assert_eq!(out, input);
    }

    #[test]
    fn upsample_by_two_produces_twice_the_samples() {
        let mut r = Resampler::new(1, 2).unwrap();
        assert_eq!(r.up_factor(), 2);
        assert_eq!(r.down_factor(), 1);
        let input = vec![Complex32::new(1.0, 0.0); 64];
        let out = r.process(&input);
        assert_eq!(out.len(), 128);
    }

    #[test]
    fn downsample_by_two_produces_half_the_samples() {
        let mut r = Resampler::new(2, 1).unwrap();
        let input = vec![Complex32::new(1.0, 0.0); 64];
        let out = r.process(&input);
        assert_eq!(out.len(), 32);
    }

    #[test]
    fn rational_rate_matches_ratio_over_a_long_run() {
        let mut r = Resampler::new(3, 2).unwrap();
        let input = vec![Complex32::new(1.0, 0.0); 300];
        let out = r.process(&input);
        assert_eq!(out.len(), 200);
    }

    #[test]
    fn dc_input_converges_to_dc_output() {
        let mut r = Resampler::new(1, 2).unwrap();
        let input = vec![Complex32::new(1.0, 0.0); 512];
        let out = r.process(&input);
        let tail_avg: f32 = out[out.len() - 32..].iter().map(|c| c.re).sum::<f32>() / 32.0;
        assert!((tail_avg - 1.0).abs() < 0.05);
    }

    #[test]
    fn splitting_input_across_calls_matches_one_call() {
        let input: Vec<Complex32> = (0..200).map(|i| Complex32::new((i as f32 * 0.1).sin(), 0.0)).collect();

        let mut whole = Resampler::new(3, 2).unwrap();
        let out_whole = whole.process(&input);

        let mut split = Resampler::new(3, 2).unwrap();
        let mut out_split = Vec::new();
        for chunk in input.chunks(17) {
            out_split.extend(split.process(chunk));
        }

        assert_eq!(out_whole.len(), out_split.len());
        for (a, b) in out_whole.iter().zip(out_split.iter()) {
            assert!((a - b).norm() < 1e-4);
        }
    }
}
