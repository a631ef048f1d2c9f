//! Filter-design building blocks shared by the resampler and the channelizer.
//!
//! Both polyphase filters in this workspace are designed the same way: a single
//! prototype low-pass FIR via the Kaiser window method, then split into
//! polyphase branches by the caller. This crate only holds the shared,
//! rate-independent half of that: the Kaiser window itself and a couple of
//! integer helpers (`gcd`, `is_power_of_two`) that both crates would otherwise
//! duplicate.

/// Modified Bessel function of the first kind, order 0.
///
/// Series approximation `I0(x) = sum_{k=0}^inf ((x/2)^k / k!)^2`, truncated
/// once a term stops contributing more than 1e-10 of the running sum.
pub fn bessel_i0(x: f32) -> f32 {
    let mut sum = 1.0f32;
    let mut term = 1.0f32;
    let x2 = x * x * 0.25;

    for k in 1..32 {
        term *= x2 / (k * k) as f32;
        sum += term;
        if term < sum * 1e-10 {
            break;
        }
    }
    sum
}

/// Kaiser window shape parameter beta from a target stopband attenuation, in dB.
///
/// Piecewise fit from Kaiser's original paper, as used by liquid-dsp's
/// `liquid_firdes_kaiser`.
pub fn kaiser_beta(stopband_db: f32) -> f32 {
    if stopband_db > 50.0 {
        0.1102 * (stopband_db - 8.7)
    } else if stopband_db > 21.0 {
        0.5842 * (stopband_db - 21.0).powf(0.4) + 0.07886 * (stopband_db - 21.0)
    } else {
        0.0
    }
}

/// Designs a lowpass Kaiser-windowed sinc FIR with unity DC gain.
///
/// `cutoff` is the normalized cutoff frequency (cycles/sample, `0 < cutoff < 0.5`).
/// `num_taps` is the total prototype length (not per-branch). `stopband_db` is
/// the target stopband attenuation used to derive the Kaiser beta.
pub fn design_kaiser_lowpass(num_taps: usize, cutoff: f32, stopband_db: f32) -> Vec<f32> {
    const EPSILON: f32 = 1e-6;

    let beta = kaiser_beta(stopband_db);
    let i0_beta = bessel_i0(beta);
    let center = (num_taps - 1) as f32 / 2.0;

    let mut h = vec![0.0f32; num_taps];
    let mut sum = 0.0f32;

    for (n, coeff) in h.iter_mut().enumerate() {
        let t = n as f32 - center;

        let sinc = if t.abs() < EPSILON {
            2.0 * cutoff
        } else {
            (2.0 * std::f32::consts::PI * cutoff * t).sin() / (std::f32::consts::PI * t)
        };

        let mut window = n as f32 / (num_taps - 1) as f32;
        window = 2.0 * window - 1.0;
        window = (1.0 - window * window).sqrt();
        window = bessel_i0(beta * window) / i0_beta;

        *coeff = sinc * window;
        sum += *coeff;
    }

    if sum.abs() > EPSILON {
        for coeff in h.iter_mut() {
            *coeff /= sum;
        }
    }
    h
}

/// Greatest common divisor via the Euclidean algorithm.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Smallest power of two that is `>= n`.
pub fn next_power_of_two(n: usize) -> usize {
    let mut p = 1usize;
    while p < n {
        p <<= 1;
    }
    p
}

pub fn is_power_of_two(n: usize) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bessel_i0_at_zero_is_one() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn kaiser_beta_matches_known_breakpoints() {
        assert_eq!(kaiser_beta(10.0), 0.0);
        assert!(kaiser_beta(60.0) > kaiser_beta(30.0));
    }

    #[test]
    fn lowpass_has_unity_dc_gain() {
        let h = design_kaiser_lowpass(65, 1.0 / 8.0, 60.0);
        let dc: f32 = h.iter().sum();
        assert!((dc - 1.0).abs() < 1e-4);
    }

    #[test]
    fn gcd_matches_euclid() {
        assert_eq!(gcd(312_500, 250_000), 62_500);
        assert_eq!(gcd(7, 13), 1);
    }

    #[test]
    fn next_power_of_two_rounds_up() {
        assert_eq!(next_power_of_two(48), 64);
        assert_eq!(next_power_of_two(64), 64);
        assert_eq!(next_power_of_two(1), 1);
    }
}
