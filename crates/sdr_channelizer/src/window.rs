//! Physical per-slot circular history window.
//!
//! Samples are pushed one at a time (the channelizer's commutator visits one
//! physical slot per input sample); `dot` reads the most recent `coeffs.len()`
//! samples in push order against caller-supplied coefficients. A window holds
//! no fixed coefficients of its own: the commutator's rotation means a given
//! analysis cycle dots logical branch `i`'s coefficients against a *different*
//! physical slot's window, not slot `i`'s.

use num::complex::Complex32;
use sdr_dsp_common::next_power_of_two;

pub struct PolyphaseWindow {
    history: Vec<Complex32>,
    mask: usize,
    write_pos: usize,
}

impl PolyphaseWindow {
    pub fn new(taps_per_branch: usize) -> Self {
        let window_alloc = next_power_of_two(taps_per_branch);
        Self {
            history: vec![Complex32::new(0.0, 0.0); window_alloc],
            mask: window_alloc - 1,
            write_pos: 0,
        }
    }

    pub fn push(&mut self, sample: Complex32) {
        self.history[self.write_pos & self.mask] = sample;
        self.write_pos = self.write_pos.wrapping_add(1);
    }

    pub fn dot(&self, coeffs: &[f32]) -> Complex32 {
        let start = self.write_pos.wrapping_sub(coeffs.len());
        let mut acc = Complex32::new(0.0, 0.0);
        for (k, &c) in coeffs.iter().enumerate() {
            acc += self.history[start.wrapping_add(k) & self.mask] * c;
        }
        acc
    }
}
