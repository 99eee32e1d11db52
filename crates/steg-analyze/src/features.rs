//! Feature transforms (C7): map a block-major coefficient sequence into a
//! fixed-length point vector for the discriminant classifier.
//!
//! All four transforms are grounded on per-slot (spline error) or
//! per-block (roughness, diffsquare) sample statistics reduced with
//! [`crate::stats::compute_stats`].

use crate::extract::prepare_gradient_x;
use crate::stats::compute_stats;
use jpeg_dct::DctImage;

const DCTSIZE: usize = 8;
const DCTSIZE2: usize = 64;
const SPLINE_SLOTS: usize = 18;
const SPLINE_N: usize = 10;

/// Natural cubic spline second derivatives (Numerical Recipes `spline`).
fn spline_setup(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut y2 = vec![0.0; n];
    let mut u = vec![0.0; n];

    y2[0] = -0.5;
    u[0] = 3.0 / (x[1] - x[0]) * ((y[1] - y[0]) / (x[1] - x[0]));

    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let mut ui = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        ui = (6.0 * ui / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
        u[i] = ui;
    }

    let un = 3.0 / (x[n - 1] - x[n - 2]) * (y[n - 2] - y[n - 1]) / (x[n - 1] - x[n - 2]);
    y2[n - 1] = (un - 0.5 * u[n - 2]) / (0.5 * y2[n - 2] + 1.0);

    for i in (0..n - 1).rev() {
        y2[i] = y2[i] * y2[i + 1] + u[i];
    }
    y2
}

/// Midpoint spline interpolate between adjacent samples `lo`/`hi` (which
/// are always exactly one unit apart on the x-axis).
fn spline_inter(y: &[f64], y2: &[f64], lo: usize, hi: usize) -> f64 {
    let h = 2.0;
    let a = 0.5;
    let b = 0.5;
    a * y[lo] + b * y[hi] + ((a * a * a - a) * y2[lo] + (b * b * b - b) * y2[hi]) * (h * h) / 6.0
}

/// How far a histogram bin's observed count deviates from a local spline
/// fit over its neighbourhood, normalised as in [`estimate_local_error2`].
fn estimate_local_error2(h: &[f64], ind: usize, max: usize) -> f64 {
    let half = SPLINE_N / 2;
    let s = ind.saturating_sub(half);
    let e = (ind + half).min(max);

    let mut x = Vec::with_capacity(SPLINE_N);
    let mut y = Vec::with_capacity(SPLINE_N);
    let mut lo = 0usize;
    let mut hi = 0usize;
    let mut n = 0usize;

    for i in s..=e {
        if n >= SPLINE_N {
            break;
        }
        if i == ind {
            lo = n.saturating_sub(1);
            hi = n;
            continue;
        }
        x.push(i as f64);
        y.push(h[i]);
        n += 1;
    }

    let y2 = spline_setup(&x, &y);
    let mut error = spline_inter(&y, &y2, lo, hi);
    error -= h[ind];
    error.abs()
}

/// Bucket `data` into a signed histogram sized up to the next multiple of
/// 512 wide enough to hold both its minimum and maximum.
fn histogram(data: &[i16]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let min = *data.iter().min().unwrap();
    let max = *data.iter().max().unwrap();

    let mut n = (max - min) as i32;
    let mut lo;
    loop {
        n += 1;
        n = ((n + 511) / 512) * 512;
        lo = -n / 2;
        if n / 2 >= -(lo as i32) && n / 2 > max as i32 {
            break;
        }
    }

    let mut hist = vec![0.0; n as usize];
    for &v in data {
        let off = (v as i32 - lo) as usize;
        if off < hist.len() {
            hist[off] += 1.0;
        }
    }
    hist
}

/// `(mean, std, skew, kurt)` of the spline-interpolation error of one
/// coefficient slot's histogram across all blocks.
fn distribution(slot: usize, data: &[i16], bits: usize) -> (f64, f64, f64, f64) {
    let n = bits / DCTSIZE2;
    let ndata: Vec<i16> = (0..n).map(|j| data[j * DCTSIZE2 + slot]).collect();
    let simple = histogram(&ndata);
    let nsimple = simple.len();
    if nsimple < 5 {
        return (0.0, 0.0, 0.0, 0.0);
    }

    let mut herror = vec![0.0; nsimple];
    for (i, slot) in herror.iter_mut().enumerate().take(nsimple - 2).skip(2) {
        *slot = if simple[i] != 0.0 {
            estimate_local_error2(&simple, i, nsimple - 1) / simple[i]
        } else {
            0.0
        };
    }

    compute_stats(&herror)
}

/// *spline*: per-slot spline-error statistics over the first 18
/// coefficient positions, 4 values each (72 points total).
pub fn spline_transform(dcts: &[i16], bits: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(SPLINE_SLOTS * 4);
    for slot in 0..SPLINE_SLOTS {
        let (mean, std, skew, kurt) = distribution(slot, dcts, bits);
        out.extend_from_slice(&[mean, std, skew, kurt]);
    }
    out
}

/// *gradient*: spline transform applied to horizontal block differences.
pub fn gradient_transform(image: &DctImage) -> crate::error::Result<Vec<f64>> {
    let ndcts = prepare_gradient_x(image)?;
    let bits = ndcts.len();
    Ok(spline_transform(&ndcts, bits))
}

/// *roughness*: frequency-weighted per-block energy, reduced to 4 summary
/// statistics across all blocks.
pub fn roughness_transform(dcts: &[i16], bits: usize) -> Vec<f64> {
    let n = bits / DCTSIZE2;
    let mut points = Vec::with_capacity(n);

    for i in 0..n {
        let off = i * DCTSIZE2;
        let mut sum = 0.0;
        let mut weight = 0.0;
        for j in 0..DCTSIZE2 {
            let u = (j / 8) as f64;
            let v = (j % 8) as f64;
            let val = dcts[off + j] as f64;
            sum += (u * u + v * v) * val * val;
            weight += u * u + v * v;
        }
        points.push((sum / weight).sqrt());
    }

    let (mean, std, skew, kurt) = compute_stats(&points);
    vec![mean, std, skew, kurt]
}

/// *diffsquare*: normalized squared differences between adjacent
/// coefficients, swept along each of the 8 row and 8 column positions
/// within a block (64 points total: 8 row stats blocks + 8 column stats
/// blocks, 4 values each).
pub fn diffsquare_transform(dcts: &[i16], bits: usize) -> Vec<f64> {
    let n = bits / DCTSIZE2;
    let mut out = Vec::with_capacity(64);
    let mut points = vec![0.0; n];

    // row-wise: position k within each row, adjacent columns j, j+1
    for k in 0..DCTSIZE {
        for (i, slot) in points.iter_mut().enumerate() {
            let off = i * DCTSIZE2;
            let mut sum = 0.0;
            let mut weight = 0.0;
            for j in 0..DCTSIZE - 1 {
                let val1 = dcts[off + k * DCTSIZE + j] as f64;
                let val2 = dcts[off + k * DCTSIZE + j + 1] as f64;
                sum += (val2 - val1) * (val2 - val1);
                weight += val1.abs();
            }
            *slot = sum.sqrt() / (weight + 1.0);
        }
        let (mean, std, skew, kurt) = compute_stats(&points);
        out.extend_from_slice(&[mean, std, skew, kurt]);
    }

    // column-wise: position k within each column, adjacent rows j, j+1
    for k in 0..DCTSIZE {
        for (i, slot) in points.iter_mut().enumerate() {
            let off = i * DCTSIZE2;
            let mut sum = 0.0;
            let mut weight = 0.0;
            for j in 0..DCTSIZE - 1 {
                let val1 = dcts[off + k + DCTSIZE * j] as f64;
                let val2 = dcts[off + k + DCTSIZE * (j + 1)] as f64;
                sum += (val2 - val1) * (val2 - val1);
                weight += val1.abs();
            }
            *slot = sum.sqrt() / (weight + 1.0);
        }
        let (mean, std, skew, kurt) = compute_stats(&points);
        out.extend_from_slice(&[mean, std, skew, kurt]);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_dcts(blocks: usize) -> Vec<i16> {
        (0..blocks * DCTSIZE2)
            .map(|i| ((i * 7) % 23) as i16 - 11)
            .collect()
    }

    #[test]
    fn test_roughness_transform_has_four_points() {
        let dcts = synthetic_dcts(32);
        let points = roughness_transform(&dcts, dcts.len());
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_diffsquare_transform_has_64_points() {
        let dcts = synthetic_dcts(32);
        let points = diffsquare_transform(&dcts, dcts.len());
        assert_eq!(points.len(), 64);
    }

    #[test]
    fn test_spline_transform_has_72_points() {
        let dcts = synthetic_dcts(64);
        let points = spline_transform(&dcts, dcts.len());
        assert_eq!(points.len(), SPLINE_SLOTS * 4);
    }

    #[test]
    fn test_roughness_zero_for_dc_only_blocks() {
        let mut dcts = vec![0i16; 32 * DCTSIZE2];
        for b in 0..32 {
            dcts[b * DCTSIZE2] = 50;
        }
        let points = roughness_transform(&dcts, dcts.len());
        assert_eq!(points[0], 0.0); // u=v=0 term has zero weight contribution
    }
}
