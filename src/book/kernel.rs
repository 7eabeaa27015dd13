use wide::f64x4;

/// `dest[j] += copper_sensitivity * copper_shocks[j] + zinc_term`, four lanes
/// at a time with a scalar tail.
#[inline(always)]
pub fn accumulate_row(dest: &mut [f64], copper_shocks: &[f64], copper_sensitivity: f64, zinc_term: f64) {
    debug_assert_eq!(dest.len(), copper_shocks.len());

    let sens = f64x4::splat(copper_sensitivity);
    let zinc = f64x4::splat(zinc_term);

    let mut dest_chunks = dest.chunks_exact_mut(4);
    let mut shock_chunks = copper_shocks.chunks_exact(4);

    for (d, s) in (&mut dest_chunks).zip(&mut shock_chunks) {
        let acc = f64x4::from([d[0], d[1], d[2], d[3]]);
        let shocks = f64x4::from([s[0], s[1], s[2], s[3]]);
        let out = acc + (sens * shocks + zinc);
        d.copy_from_slice(&out.to_array());
    }

    for (d, s) in dest_chunks.into_remainder().iter_mut().zip(shock_chunks.remainder()) {
        *d += copper_sensitivity * s + zinc_term;
    }
}

/// Evenly spaced values over `[start, stop]`, both ends included.
/// `n = 1` yields `[start]`; `n = 0` yields nothing.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}
