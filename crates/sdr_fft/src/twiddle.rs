//! Fundamental-only twiddle tables for the radix-4 Stockham stages.
//!
//! Stage `s` of a size-`n` transform only stores `W^k` for
//! `k = 0 .. n/2^(2s+2) - 1`; `W^{2k}` and `W^{3k}` are derived per-butterfly
//! in `stockham::radix4_otf` (`W^{2k} = W^k * W^k`, `W^{3k} = W^{2k} * W^k`).
//! This keeps twiddle memory to roughly a third of what a full radix-4 table
//! would need.

use crate::aligned::AlignedBuf;
use crate::error::{Error, Result};

pub struct TwiddleStage {
    pub re: AlignedBuf<f32>,
    pub im: AlignedBuf<f32>,
}

/// Builds one twiddle table per radix-4 stage for a size-`n` transform with
/// `log4n` radix-4 stages. Stage `s` holds `(n >> (2s+2))` complex values;
/// the stride between successive harmonics at stage `s` is `2^(2s)`.
pub fn compute_twiddles(n: usize, log4n: usize) -> Result<Vec<TwiddleStage>> {
    let mut stages = Vec::with_capacity(log4n);
    let neg_2pi_over_n = -2.0 * std::f64::consts::PI / n as f64;

    for s in 0..log4n {
        let m = n >> (s * 2);
        let quarter_m = m >> 2;
        let stride = 1usize << (s * 2);

        let mut re = AlignedBuf::<f32>::new_zeroed(quarter_m).ok_or(Error::OutOfMemory)?;
        let mut im = AlignedBuf::<f32>::new_zeroed(quarter_m).ok_or(Error::OutOfMemory)?;

        for j in 0..quarter_m {
            let angle = neg_2pi_over_n * (j * stride) as f64;
            re[j] = angle.cos() as f32;
            im[j] = angle.sin() as f32;
        }
        stages.push(TwiddleStage { re, im });
    }
    Ok(stages)
}

/// Post-processing twiddles `W_N^k = exp(-j*2*pi*k/N)` for `k = 0..N/2-1`,
/// used by the real-to-complex and complex-to-real fast paths.
pub fn compute_r2c_twiddles(n: usize) -> Result<(AlignedBuf<f32>, AlignedBuf<f32>)> {
    let half_n = n >> 1;
    let mut re = AlignedBuf::<f32>::new_zeroed(half_n).ok_or(Error::OutOfMemory)?;
    let mut im = AlignedBuf::<f32>::new_zeroed(half_n).ok_or(Error::OutOfMemory)?;
    let neg_2pi_over_n = -2.0 * std::f64::consts::PI / n as f64;

    for k in 0..half_n {
        let angle = neg_2pi_over_n * k as f64;
        re[k] = angle.cos() as f32;
        im[k] = angle.sin() as f32;
    }
    Ok((re, im))
}
