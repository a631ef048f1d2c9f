use num::complex::Complex32;

use crate::aligned::{self, AlignedBuf};
use crate::error::{Error, Result};
use crate::kernels;
use crate::stockham;
use crate::twiddle::{self, TwiddleStage};

fn is_power_of_two(n: usize) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

fn log2_exact(n: usize) -> usize {
    n.trailing_zeros() as usize
}

/// A plan for an `N`-point complex FFT, `N` a power of two in `[2, 32]`.
///
/// Built once per transform size and then driven through `forward`/`inverse`
/// on the hot path. Holds the radix-4 Stockham twiddle tables (fundamental
/// harmonics only, §3 twiddle invariant) and the ping-pong scratch the
/// transform needs; a plan is meant to be owned by a single channelizer or
/// resampler state, not shared live across threads (see DESIGN.md).
pub struct FftPlan {
    n: usize,
    log2n: usize,
    log4n: usize,
    has_radix2_stage: bool,
    twiddles: Vec<TwiddleStage>,
    r2c_tw: Option<(AlignedBuf<f32>, AlignedBuf<f32>)>,
    half_plan: Option<Box<FftPlan>>,

    work_re: AlignedBuf<f32>,
    work_im: AlignedBuf<f32>,
    work2_re: AlignedBuf<f32>,
    work2_im: AlignedBuf<f32>,
    /// Which buffer pair (`work_*` when true, `work2_*` when false) holds the
    /// live result after the most recent `run_split_in_place`.
    result_in_first: bool,
}

impl FftPlan {
    /// Creates a plan for an `n`-point complex FFT. `n` must be a power of
    /// two in `[2, 32]`; the real-to-complex fast path additionally needs
    /// `n >= 4` and is simply unavailable (`forward_r2c`/`inverse_c2r` return
    /// `InvalidArgument`) otherwise.
    pub fn new(n: usize) -> Result<Self> {
        Self::new_inner(n, true)
    }

    fn new_inner(n: usize, with_r2c: bool) -> Result<Self> {
        if !is_power_of_two(n) || !(2..=32).contains(&n) {
            return Err(Error::InvalidSize);
        }
        log::debug!("sdr_fft: creating {n}-point plan ({})", aligned::build_info());

        let log2n = log2_exact(n);
        let log4n = log2n / 2;
        let has_radix2_stage = log2n % 2 != 0;
        let twiddles = twiddle::compute_twiddles(n, log4n)?;

        let (r2c_tw, half_plan) = if with_r2c && n >= 4 {
            let r2c_tw = Some(twiddle::compute_r2c_twiddles(n)?);
            let half = Self::new_inner(n / 2, false)?;
            (r2c_tw, Some(Box::new(half)))
        } else {
            (None, None)
        };

        Ok(Self {
            n,
            log2n,
            log4n,
            has_radix2_stage,
            twiddles,
            r2c_tw,
            half_plan,
            work_re: AlignedBuf::new_zeroed(n).ok_or(Error::OutOfMemory)?,
            work_im: AlignedBuf::new_zeroed(n).ok_or(Error::OutOfMemory)?,
            work2_re: AlignedBuf::new_zeroed(n).ok_or(Error::OutOfMemory)?,
            work2_im: AlignedBuf::new_zeroed(n).ok_or(Error::OutOfMemory)?,
            result_in_first: true,
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Forward `N`-point complex FFT, interleaved (AoS) in and out.
    pub fn forward(&mut self, input: &[Complex32], output: &mut [Complex32]) -> Result<()> {
        if input.len() != self.n || output.len() != self.n {
            return Err(Error::InvalidArgument);
        }
        let n = self.n;
        for i in 0..n {
            self.work_re[i] = input[i].re;
            self.work_im[i] = input[i].im;
        }
        self.run_split_in_place()?;
        for i in 0..n {
            output[i] = Complex32::new(self.result_re()[i], self.result_im()[i]);
        }
        Ok(())
    }

    /// Inverse `N`-point complex FFT, realised as `conj -> forward -> conj`.
    /// Output is *not* scaled by `1/N` (callers normalise).
    pub fn inverse(&mut self, input: &[Complex32], output: &mut [Complex32]) -> Result<()> {
        if input.len() != self.n || output.len() != self.n {
            return Err(Error::InvalidArgument);
        }
        let n = self.n;
        for i in 0..n {
            self.work_re[i] = input[i].re;
            self.work_im[i] = -input[i].im;
        }
        self.run_split_in_place()?;
        for i in 0..n {
            output[i] = Complex32::new(self.result_re()[i], -self.result_im()[i]);
        }
        Ok(())
    }

    /// Forward `N`-point complex FFT, split (SoA) in and out. Dispatches to
    /// the fully-unrolled kernel when `N` is 2, 4, 8, or 16, falling back to
    /// the general Stockham engine otherwise (`N = 32`, or a half-size
    /// transform used internally by the R2C/C2R path).
    pub fn forward_split(&mut self, in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) -> Result<()> {
        if [in_re.len(), in_im.len(), out_re.len(), out_im.len()].iter().any(|&l| l != self.n) {
            return Err(Error::InvalidArgument);
        }
        match self.n {
            2 => kernels::fft2_forward_soa(in_re, in_im, out_re, out_im),
            4 => kernels::fft4_forward_soa(in_re, in_im, out_re, out_im),
            8 => kernels::fft8_forward_soa(in_re, in_im, out_re, out_im),
            16 => kernels::fft16_forward_soa(in_re, in_im, out_re, out_im),
            _ => self.forward_split_generic(in_re, in_im, out_re, out_im),
        }
        Ok(())
    }

    fn forward_split_generic(&mut self, in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) {
        self.work_re[..self.n].copy_from_slice(in_re);
        self.work_im[..self.n].copy_from_slice(in_im);
        self.run_split_in_place().expect("lengths already validated by caller");
        out_re.copy_from_slice(self.result_re());
        out_im.copy_from_slice(self.result_im());
    }

    /// Runs the radix-4 (+ optional trailing radix-2) Stockham ladder over
    /// `work_re`/`work_im` in place, ping-ponging with `work2_re`/`work2_im`.
    /// The live result ends up in whichever buffer `result_re`/`result_im`
    /// report after this call.
    fn run_split_in_place(&mut self) -> Result<()> {
        let n = self.n;
        let mut in_first = true; // true: live data is in work_*, false: in work2_*

        for s in 0..self.log4n {
            let stage = &self.twiddles[s];
            if in_first {
                let (src_re, dst_re) = (&self.work_re[..n], &mut self.work2_re[..n]);
                let (src_im, dst_im) = (&self.work_im[..n], &mut self.work2_im[..n]);
                stockham::radix4_otf(src_re, src_im, dst_re, dst_im, &stage.re, &stage.im, n, s);
            } else {
                let (src_re, dst_re) = (&self.work2_re[..n], &mut self.work_re[..n]);
                let (src_im, dst_im) = (&self.work2_im[..n], &mut self.work_im[..n]);
                stockham::radix4_otf(src_re, src_im, dst_re, dst_im, &stage.re, &stage.im, n, s);
            }
            in_first = !in_first;
        }

        if self.has_radix2_stage {
            if in_first {
                let (src_re, dst_re) = (&self.work_re[..n], &mut self.work2_re[..n]);
                let (src_im, dst_im) = (&self.work_im[..n], &mut self.work2_im[..n]);
                stockham::radix2_last(src_re, src_im, dst_re, dst_im, n);
            } else {
                let (src_re, dst_re) = (&self.work2_re[..n], &mut self.work_re[..n]);
                let (src_im, dst_im) = (&self.work2_im[..n], &mut self.work_im[..n]);
                stockham::radix2_last(src_re, src_im, dst_re, dst_im, n);
            }
            in_first = !in_first;
        }

        self.result_in_first = in_first;
        Ok(())
    }

    fn result_re(&self) -> &[f32] {
        if self.result_in_first { &self.work_re } else { &self.work2_re }
    }

    fn result_im(&self) -> &[f32] {
        if self.result_in_first { &self.work_im } else { &self.work2_im }
    }

    /// Real-to-complex forward transform: packs `N` reals as `N/2` complex,
    /// runs the half-size transform, then combines with the R2C twiddles to
    /// recover the `N/2+1` non-redundant bins (§4.A). DC and Nyquist land
    /// with zero imaginary part.
    pub fn forward_r2c(&mut self, input: &[f32], output: &mut [Complex32]) -> Result<()> {
        let half_n = self.n / 2;
        if self.half_plan.is_none() || input.len() != self.n || output.len() != half_n + 1 {
            return Err(Error::InvalidArgument);
        }

        for k in 0..half_n {
            self.work_re[k] = input[2 * k];
            self.work_im[k] = input[2 * k + 1];
        }
        {
            let half = self.half_plan.as_mut().unwrap();
            half.forward_split(
                &self.work_re[..half_n],
                &self.work_im[..half_n],
                &mut self.work2_re[..half_n],
                &mut self.work2_im[..half_n],
            )?;
        }
        let z_re = &self.work2_re[..half_n];
        let z_im = &self.work2_im[..half_n];
        let (r2c_re, r2c_im) = self.r2c_tw.as_ref().unwrap();

        output[0] = Complex32::new(z_re[0] + z_im[0], 0.0);
        output[half_n] = Complex32::new(z_re[0] - z_im[0], 0.0);

        for k in 1..half_n {
            let conj_k = half_n - k;
            let (zk_re, zk_im) = (z_re[k], z_im[k]);
            let (zc_re, zc_im) = (z_re[conj_k], -z_im[conj_k]);

            let a_re = 0.5 * (zk_re + zc_re);
            let a_im = 0.5 * (zk_im + zc_im);
            let b_re = 0.5 * (zk_re - zc_re);
            let b_im = 0.5 * (zk_im - zc_im);

            let (w_re, w_im) = (r2c_re[k], r2c_im[k]);
            // -j * W * B
            let jw_b_re = w_re * b_im + w_im * b_re;
            let jw_b_im = -(w_re * b_re - w_im * b_im);

            output[k] = Complex32::new(a_re + jw_b_re, a_im + jw_b_im);
        }
        Ok(())
    }

    /// Complex-to-real inverse transform, the exact reverse of `forward_r2c`.
    pub fn inverse_c2r(&mut self, input: &[Complex32], output: &mut [f32]) -> Result<()> {
        let half_n = self.n / 2;
        if self.half_plan.is_none() || input.len() != half_n + 1 || output.len() != self.n {
            return Err(Error::InvalidArgument);
        }
        let (r2c_re, r2c_im) = self.r2c_tw.as_ref().unwrap();

        self.work_re[0] = 0.5 * (input[0].re + input[half_n].re);
        self.work_im[0] = 0.5 * (input[0].re - input[half_n].re);

        for k in 1..half_n {
            let conj_k = half_n - k;
            let (xk_re, xk_im) = (input[k].re, input[k].im);
            let (xc_re, xc_im) = (input[conj_k].re, -input[conj_k].im);

            let a_re = 0.5 * (xk_re + xc_re);
            let a_im = 0.5 * (xk_im + xc_im);
            let b_re = 0.5 * (xk_re - xc_re);
            let b_im = 0.5 * (xk_im - xc_im);

            let (w_re, w_im) = (r2c_re[k], -r2c_im[k]);
            let w_b_re = w_re * b_re - w_im * b_im;
            let w_b_im = w_re * b_im + w_im * b_re;
            // j * (W^-k * B)
            self.work_re[k] = a_re - w_b_im;
            self.work_im[k] = a_im + w_b_re;
        }

        for k in 0..half_n {
            self.work_im[k] = -self.work_im[k];
        }
        {
            let half = self.half_plan.as_mut().unwrap();
            half.forward_split(
                &self.work_re[..half_n],
                &self.work_im[..half_n],
                &mut self.work2_re[..half_n],
                &mut self.work2_im[..half_n],
            )?;
        }
        for k in 0..half_n {
            output[2 * k] = 2.0 * self.work2_re[k];
            output[2 * k + 1] = -2.0 * self.work2_im[k];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dft_reference(x: &[Complex32]) -> Vec<Complex32> {
        let n = x.len();
        (0..n)
            .map(|k| {
                let mut acc = Complex32::new(0.0, 0.0);
                for (j, &xj) in x.iter().enumerate() {
                    let angle = -2.0 * std::f32::consts::PI * (k * j) as f32 / n as f32;
                    acc += xj * Complex32::new(angle.cos(), angle.sin());
                }
                acc
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert_eq!(FftPlan::new(3).unwrap_err(), Error::InvalidSize);
        assert_eq!(FftPlan::new(64).unwrap_err(), Error::InvalidSize);
        assert_eq!(FftPlan::new(1).unwrap_err(), Error::InvalidSize);
    }

    #[test]
    fn s1_impulse_response_is_flat() {
        let mut plan = FftPlan::new(8).unwrap();
        let mut x = [Complex32::new(0.0, 0.0); 8];
        x[0] = Complex32::new(1.0, 0.0);
        let mut out = [Complex32::new(0.0, 0.0); 8];
        plan.forward(&x, &mut out).unwrap();
        for v in out {
            assert!((v.re - 1.0).abs() < 1e-5);
            assert!(v.im.abs() < 1e-5);
        }
    }

    #[test]
    fn s2_dc_tone_is_a_single_spike() {
        let mut plan = FftPlan::new(8).unwrap();
        let x = [Complex32::new(1.0, 0.0); 8];
        let mut out = [Complex32::new(0.0, 0.0); 8];
        plan.forward(&x, &mut out).unwrap();
        assert!((out[0].re - 8.0).abs() < 1e-5);
        assert!(out[0].im.abs() < 1e-5);
        for v in &out[1..] {
            assert!(v.norm() < 1e-5);
        }
    }

    #[test]
    fn round_trip_reconstructs_n_times_input() {
        for n in [2usize, 4, 8, 16, 32] {
            let mut plan = FftPlan::new(n).unwrap();
            let x: Vec<Complex32> = (0..n).map(|i| Complex32::new(i as f32 * 0.3, -(i as f32) * 0.1)).collect();
            let mut freq = vec![Complex32::new(0.0, 0.0); n];
            plan.forward(&x, &mut freq).unwrap();
            let mut back = vec![Complex32::new(0.0, 0.0); n];
            plan.inverse(&freq, &mut back).unwrap();
            for (a, b) in x.iter().zip(back.iter()) {
                assert!((b.re - a.re * n as f32).abs() < 1e-3 * n as f32);
                assert!((b.im - a.im * n as f32).abs() < 1e-3 * n as f32);
            }
        }
    }

    #[test]
    fn matches_brute_force_dft() {
        for n in [2usize, 4, 8, 16, 32] {
            let mut plan = FftPlan::new(n).unwrap();
            let x: Vec<Complex32> = (0..n).map(|i| Complex32::new((i as f32).sin(), (i as f32 * 0.7).cos())).collect();
            let mut got = vec![Complex32::new(0.0, 0.0); n];
            plan.forward(&x, &mut got).unwrap();
            let want = dft_reference(&x);
            for (g, w) in got.iter().zip(want.iter()) {
                assert!((g.re - w.re).abs() < 1e-3 * n as f32);
                assert!((g.im - w.im).abs() < 1e-3 * n as f32);
            }
        }
    }

    #[test]
    fn parseval_energy_is_conserved() {
        let n = 16usize;
        let mut plan = FftPlan::new(n).unwrap();
        let x: Vec<Complex32> = (0..n).map(|i| Complex32::new((i as f32 * 1.1).sin(), (i as f32 * 0.4).cos())).collect();
        let mut freq = vec![Complex32::new(0.0, 0.0); n];
        plan.forward(&x, &mut freq).unwrap();

        let time_energy: f32 = x.iter().map(|v| v.norm_sqr()).sum();
        let freq_energy: f32 = freq.iter().map(|v| v.norm_sqr()).sum::<f32>() / n as f32;
        assert!((time_energy - freq_energy).abs() / time_energy < 1e-5);
    }

    #[test]
    fn linearity_holds() {
        let n = 8usize;
        let mut plan = FftPlan::new(n).unwrap();
        let x: Vec<Complex32> = (0..n).map(|i| Complex32::new(i as f32, 0.0)).collect();
        let y: Vec<Complex32> = (0..n).map(|i| Complex32::new(0.0, i as f32 * 2.0)).collect();
        let (a, b) = (Complex32::new(2.0, 0.0), Complex32::new(0.0, 3.0));
        let combo: Vec<Complex32> = x.iter().zip(y.iter()).map(|(&xi, &yi)| a * xi + b * yi).collect();

        let mut fx = vec![Complex32::new(0.0, 0.0); n];
        let mut fy = vec![Complex32::new(0.0, 0.0); n];
        let mut fc = vec![Complex32::new(0.0, 0.0); n];
        plan.forward(&x, &mut fx).unwrap();
        plan.forward(&y, &mut fy).unwrap();
        plan.forward(&combo, &mut fc).unwrap();

        for i in 0..n {
            let want = a * fx[i] + b * fy[i];
            assert!((fc[i] - want).norm() < 1e-3 * n as f32);
        }
    }

    #[test]
    fn conjugate_symmetry_for_real_input() {
        let n = 16usize;
        let mut plan = FftPlan::new(n).unwrap();
        let x: Vec<Complex32> = (0..n).map(|i| Complex32::new((i as f32 * 0.9).cos(), 0.0)).collect();
        let mut freq = vec![Complex32::new(0.0, 0.0); n];
        plan.forward(&x, &mut freq).unwrap();
        for k in 1..n {
            let a = freq[k];
            let b = freq[n - k].conj();
            assert!((a - b).norm() < 1e-3 * n as f32);
        }
    }

    #[test]
    fn r2c_matches_full_complex_fft_non_redundant_bins() {
        let n = 16usize;
        let mut plan = FftPlan::new(n).unwrap();
        let real: Vec<f32> = (0..n).map(|i| (i as f32 * 0.5).sin()).collect();
        let complex_in: Vec<Complex32> = real.iter().map(|&r| Complex32::new(r, 0.0)).collect();

        let mut full = vec![Complex32::new(0.0, 0.0); n];
        plan.forward(&complex_in, &mut full).unwrap();

        let mut half = vec![Complex32::new(0.0, 0.0); n / 2 + 1];
        plan.forward_r2c(&real, &mut half).unwrap();

        for k in 0..=n / 2 {
            assert!((half[k] - full[k]).norm() < 1e-3 * n as f32);
        }
    }
}
