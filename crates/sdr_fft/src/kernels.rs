//! Fully unrolled SoA kernels for N = 2, 4, 8, 16.
//!
//! These are the sizes the PFB channelizer actually runs (M in [2, 16]), so
//! they get dedicated Cooley-Tukey DIT butterflies with compile-time twiddle
//! constants instead of going through the general Stockham engine: no
//! scratch buffers, no stage loop, no twiddle table lookup.

const SQRT2_2: f32 = 0.707_106_78; // cos(pi/4) = sin(pi/4)
const COS_PI8: f32 = 0.923_879_5; // cos(pi/8)
const SIN_PI8: f32 = 0.382_683_43; // sin(pi/8)

/// 2-point FFT: a single butterfly, no multiplies.
pub fn fft2_forward_soa(in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) {
    let (ar, ai) = (in_re[0], in_im[0]);
    let (br, bi) = (in_re[1], in_im[1]);
    out_re[0] = ar + br;
    out_im[0] = ai + bi;
    out_re[1] = ar - br;
    out_im[1] = ai - bi;
}

/// 4-point FFT: two 2-pt DFTs on even/odd indices, combined with the trivial
/// `W4^1 = -j` twiddle (a swap-and-negate, no multiply).
pub fn fft4_forward_soa(in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) {
    let e0_re = in_re[0] + in_re[2];
    let e0_im = in_im[0] + in_im[2];
    let e1_re = in_re[0] - in_re[2];
    let e1_im = in_im[0] - in_im[2];

    let o0_re = in_re[1] + in_re[3];
    let o0_im = in_im[1] + in_im[3];
    let o1_re = in_re[1] - in_re[3];
    let o1_im = in_im[1] - in_im[3];

    out_re[0] = e0_re + o0_re;
    out_im[0] = e0_im + o0_im;
    out_re[1] = e1_re + o1_im;
    out_im[1] = e1_im - o1_re;
    out_re[2] = e0_re - o0_re;
    out_im[2] = e0_im - o0_im;
    out_re[3] = e1_re - o1_im;
    out_im[3] = e1_im + o1_re;
}

/// 8-point FFT: two inline 4-pt DFTs on even/odd indices, combined with the
/// W8 twiddles (the only non-trivial ones are `W8^1` and `W8^3`, both a
/// single `sqrt(2)/2` scale).
pub fn fft8_forward_soa(in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) {
    let ee0_re = in_re[0] + in_re[4];
    let ee0_im = in_im[0] + in_im[4];
    let ee1_re = in_re[0] - in_re[4];
    let ee1_im = in_im[0] - in_im[4];
    let eo0_re = in_re[2] + in_re[6];
    let eo0_im = in_im[2] + in_im[6];
    let eo1_re = in_re[2] - in_re[6];
    let eo1_im = in_im[2] - in_im[6];

    let e0_re = ee0_re + eo0_re;
    let e0_im = ee0_im + eo0_im;
    let e1_re = ee1_re + eo1_im;
    let e1_im = ee1_im - eo1_re;
    let e2_re = ee0_re - eo0_re;
    let e2_im = ee0_im - eo0_im;
    let e3_re = ee1_re - eo1_im;
    let e3_im = ee1_im + eo1_re;

    let oe0_re = in_re[1] + in_re[5];
    let oe0_im = in_im[1] + in_im[5];
    let oe1_re = in_re[1] - in_re[5];
    let oe1_im = in_im[1] - in_im[5];
    let oo0_re = in_re[3] + in_re[7];
    let oo0_im = in_im[3] + in_im[7];
    let oo1_re = in_re[3] - in_re[7];
    let oo1_im = in_im[3] - in_im[7];

    let o0_re = oe0_re + oo0_re;
    let o0_im = oe0_im + oo0_im;
    let o1_re = oe1_re + oo1_im;
    let o1_im = oe1_im - oo1_re;
    let o2_re = oe0_re - oo0_re;
    let o2_im = oe0_im - oo0_im;
    let o3_re = oe1_re - oo1_im;
    let o3_im = oe1_im + oo1_re;

    let t1_re = SQRT2_2 * (o1_re + o1_im);
    let t1_im = SQRT2_2 * (o1_im - o1_re);
    let t3_re = SQRT2_2 * (-o3_re + o3_im);
    let t3_im = SQRT2_2 * (-o3_im - o3_re);

    out_re[0] = e0_re + o0_re;
    out_im[0] = e0_im + o0_im;
    out_re[1] = e1_re + t1_re;
    out_im[1] = e1_im + t1_im;
    out_re[2] = e2_re + o2_im;
    out_im[2] = e2_im - o2_re;
    out_re[3] = e3_re + t3_re;
    out_im[3] = e3_im + t3_im;
    out_re[4] = e0_re - o0_re;
    out_im[4] = e0_im - o0_im;
    out_re[5] = e1_re - t1_re;
    out_im[5] = e1_im - t1_im;
    out_re[6] = e2_re - o2_im;
    out_im[6] = e2_im + o2_re;
    out_re[7] = e3_re - t3_re;
    out_im[7] = e3_im - t3_im;
}

/// 16-point FFT via radix-4 (rather than three radix-2 stages): four inline
/// 4-pt DFTs into a small staging buffer, then one twiddle+radix-4-butterfly
/// pass per `k = 0..3`. Keeps peak live values low enough to stay
/// register-resident, unlike a three-stage radix-2 unrolling of the same size.
pub fn fft16_forward_soa(in_re: &[f32], in_im: &[f32], out_re: &mut [f32], out_im: &mut [f32]) {
    let mut tr = [0.0f32; 16];
    let mut ti = [0.0f32; 16];

    let group = |a: usize, b: usize, c: usize, d: usize, tr: &mut [f32], ti: &mut [f32], base: usize| {
        let e0r = in_re[a] + in_re[c];
        let e0i = in_im[a] + in_im[c];
        let e1r = in_re[a] - in_re[c];
        let e1i = in_im[a] - in_im[c];
        let o0r = in_re[b] + in_re[d];
        let o0i = in_im[b] + in_im[d];
        let o1r = in_re[b] - in_re[d];
        let o1i = in_im[b] - in_im[d];

        tr[base] = e0r + o0r;
        ti[base] = e0i + o0i;
        tr[base + 1] = e1r + o1i;
        ti[base + 1] = e1i - o1r;
        tr[base + 2] = e0r - o0r;
        ti[base + 2] = e0i - o0i;
        tr[base + 3] = e1r - o1i;
        ti[base + 3] = e1i + o1r;
    };

    group(0, 4, 8, 12, &mut tr, &mut ti, 0);
    group(1, 5, 9, 13, &mut tr, &mut ti, 4);
    group(2, 6, 10, 14, &mut tr, &mut ti, 8);
    group(3, 7, 11, 15, &mut tr, &mut ti, 12);

    // k=0: every W16 harmonic involved is 1 (free).
    {
        let (ar, ai) = (tr[0], ti[0]);
        let (br, bi) = (tr[4], ti[4]);
        let (cr, ci) = (tr[8], ti[8]);
        let (dr, di) = (tr[12], ti[12]);

        let (pr, pi) = (ar + cr, ai + ci);
        let (qr, qi) = (br + dr, bi + di);
        let (rr, ri) = (ar - cr, ai - ci);
        let (sr, si) = (br - dr, bi - di);

        out_re[0] = pr + qr;
        out_im[0] = pi + qi;
        out_re[4] = rr + si;
        out_im[4] = ri - sr;
        out_re[8] = pr - qr;
        out_im[8] = pi - qi;
        out_re[12] = rr - si;
        out_im[12] = ri + sr;
    }

    // k=1: W16^1=(cos(pi/8),-sin(pi/8)), W16^2=(S2,-S2), W16^3=(sin(pi/8),-cos(pi/8))
    {
        let (ar, ai) = (tr[1], ti[1]);
        let br = COS_PI8 * tr[5] + SIN_PI8 * ti[5];
        let bi = COS_PI8 * ti[5] - SIN_PI8 * tr[5];
        let cr = SQRT2_2 * (tr[9] + ti[9]);
        let ci = SQRT2_2 * (ti[9] - tr[9]);
        let dr = SIN_PI8 * tr[13] + COS_PI8 * ti[13];
        let di = SIN_PI8 * ti[13] - COS_PI8 * tr[13];

        let (pr, pi) = (ar + cr, ai + ci);
        let (qr, qi) = (br + dr, bi + di);
        let (rr, ri) = (ar - cr, ai - ci);
        let (sr, si) = (br - dr, bi - di);

        out_re[1] = pr + qr;
        out_im[1] = pi + qi;
        out_re[5] = rr + si;
        out_im[5] = ri - sr;
        out_re[9] = pr - qr;
        out_im[9] = pi - qi;
        out_re[13] = rr - si;
        out_im[13] = ri + sr;
    }

    // k=2: W16^2=(S2,-S2), W16^4=-j, W16^6=(-S2,-S2)
    {
        let (ar, ai) = (tr[2], ti[2]);
        let br = SQRT2_2 * (tr[6] + ti[6]);
        let bi = SQRT2_2 * (ti[6] - tr[6]);
        let (cr, ci) = (ti[10], -tr[10]);
        let dr = SQRT2_2 * (-tr[14] + ti[14]);
        let di = SQRT2_2 * (-ti[14] - tr[14]);

        let (pr, pi) = (ar + cr, ai + ci);
        let (qr, qi) = (br + dr, bi + di);
        let (rr, ri) = (ar - cr, ai - ci);
        let (sr, si) = (br - dr, bi - di);

        out_re[2] = pr + qr;
        out_im[2] = pi + qi;
        out_re[6] = rr + si;
        out_im[6] = ri - sr;
        out_re[10] = pr - qr;
        out_im[10] = pi - qi;
        out_re[14] = rr - si;
        out_im[14] = ri + sr;
    }

    // k=3: W16^3=(sin(pi/8),-cos(pi/8)), W16^6=(-S2,-S2), W16^9=(-cos(pi/8),sin(pi/8))
    {
        let (ar, ai) = (tr[3], ti[3]);
        let br = SIN_PI8 * tr[7] + COS_PI8 * ti[7];
        let bi = SIN_PI8 * ti[7] - COS_PI8 * tr[7];
        let cr = SQRT2_2 * (-tr[11] + ti[11]);
        let ci = SQRT2_2 * (-ti[11] - tr[11]);
        let dr = -COS_PI8 * tr[15] - SIN_PI8 * ti[15];
        let di = SIN_PI8 * tr[15] - COS_PI8 * ti[15];

        let (pr, pi) = (ar + cr, ai + ci);
        let (qr, qi) = (br + dr, bi + di);
        let (rr, ri) = (ar - cr, ai - ci);
        let (sr, si) = (br - dr, bi - di);

        out_re[3] = pr + qr;
        out_im[3] = pi + qi;
        out_re[7] = rr + si;
        out_im[7] = ri - sr;
        out_re[11] = pr - qr;
        out_im[11] = pi - qi;
        out_re[15] = rr - si;
        out_im[15] = ri + sr;
    }
}
