//! Stockham autosort radix-4 butterfly, plus the trailing radix-2 stage used
//! when `log2(N)` is odd. Both stages ping-pong between two SoA buffers and
//! never touch a bit-reversal table.

/// One radix-4 Stockham stage, on-the-fly-twiddle variant.
///
/// `tw_re`/`tw_im` hold only the fundamental `W^k` harmonics for this stage;
/// `W^{2k}` and `W^{3k}` are derived here rather than stored, per the plan's
/// twiddle-memory invariant.
pub fn radix4_otf(
    src_re: &[f32],
    src_im: &[f32],
    dst_re: &mut [f32],
    dst_im: &mut [f32],
    tw_re: &[f32],
    tw_im: &[f32],
    n: usize,
    stage: usize,
) {
    let quarter_n = n >> 2;
    let m = n >> (stage * 2);
    let quarter_m = m >> 2;
    let num_blocks = 1usize << (stage * 2);

    for b in 0..num_blocks {
        let src_base = b * m;
        let dst_base = b * quarter_m;

        let (a0_re, rest) = src_re[src_base..src_base + m].split_at(quarter_m);
        let (a1_re, rest) = rest.split_at(quarter_m);
        let (a2_re, a3_re) = rest.split_at(quarter_m);

        let (a0_im, rest) = src_im[src_base..src_base + m].split_at(quarter_m);
        let (a1_im, rest) = rest.split_at(quarter_m);
        let (a2_im, a3_im) = rest.split_at(quarter_m);

        for j in 0..quarter_m {
            let (a0r, a0i) = (a0_re[j], a0_im[j]);
            let (a1r, a1i) = (a1_re[j], a1_im[j]);
            let (a2r, a2i) = (a2_re[j], a2_im[j]);
            let (a3r, a3i) = (a3_re[j], a3_im[j]);

            let (w1r, w1i) = (tw_re[j], tw_im[j]);
            // W2 = W1 * W1, W3 = W2 * W1, computed on the fly.
            let w2r = w1r * w1r - w1i * w1i;
            let w2i = 2.0 * w1r * w1i;
            let w3r = w2r * w1r - w2i * w1i;
            let w3i = w2r * w1i + w2i * w1r;

            let t0r = a0r + a2r;
            let t0i = a0i + a2i;
            let t1r = a0r - a2r;
            let t1i = a0i - a2i;
            let t2r = a1r + a3r;
            let t2i = a1i + a3i;
            let t3r = a1r - a3r;
            let t3i = a1i - a3i;

            // X0 = t0 + t2 (no twiddle)
            dst_re[dst_base + j] = t0r + t2r;
            dst_im[dst_base + j] = t0i + t2i;

            // X1 = (t1 - j*t3) * W1
            let u1r = t1r + t3i;
            let u1i = t1i - t3r;
            dst_re[dst_base + j + quarter_n] = u1r * w1r - u1i * w1i;
            dst_im[dst_base + j + quarter_n] = u1r * w1i + u1i * w1r;

            // X2 = (t0 - t2) * W2
            let u2r = t0r - t2r;
            let u2i = t0i - t2i;
            dst_re[dst_base + j + 2 * quarter_n] = u2r * w2r - u2i * w2i;
            dst_im[dst_base + j + 2 * quarter_n] = u2r * w2i + u2i * w2r;

            // X3 = (t1 + j*t3) * W3
            let u3r = t1r - t3i;
            let u3i = t1i + t3r;
            dst_re[dst_base + j + 3 * quarter_n] = u3r * w3r - u3i * w3i;
            dst_im[dst_base + j + 3 * quarter_n] = u3r * w3i + u3i * w3r;
        }
    }
}

/// Final radix-2 combine for an odd `log2(N)`.
pub fn radix2_last(src_re: &[f32], src_im: &[f32], dst_re: &mut [f32], dst_im: &mut [f32], n: usize) {
    let half_n = n >> 1;
    for b in 0..half_n {
        let (ar, ai) = (src_re[b * 2], src_im[b * 2]);
        let (br, bi) = (src_re[b * 2 + 1], src_im[b * 2 + 1]);
        dst_re[b] = ar + br;
        dst_im[b] = ai + bi;
        dst_re[b + half_n] = ar - br;
        dst_im[b + half_n] = ai - bi;
    }
}
