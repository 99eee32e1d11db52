//! F5 recompression detector (C8).
//!
//! Reconstructs the luminance plane in pixel space, optionally blurs it,
//! recompresses it through a plain IJG-style pipeline at a guessed quality,
//! and compares the original and recompressed coefficient histograms at
//! three mid-frequency positions to estimate F5's embedding mixing
//! coefficient β via Fridrich's calibration closed form.

use jpeg_dct::dct::{
    clamp_samples, dequantize, fdct, idct, quantize, scale_quant_table, CoeffBlock, SampleBlock,
    STD_LUMINANCE_QUANT_TABLE,
};
use jpeg_dct::{ComponentPlane, DctImage};

/// Natural-order (row, col) positions the detector compares.
const POSITIONS: [(usize, usize); 3] = [(1, 2), (2, 1), (2, 2)];

/// β/ε estimate for a single mid-frequency position.
#[derive(Debug, Clone, Copy)]
pub struct PositionEstimate {
    pub beta: f64,
    pub epsilon: f64,
}

/// Overall detector output: the average β across the three sampled
/// positions and each position's individual estimate.
#[derive(Debug, Clone)]
pub struct F5Estimate {
    pub beta: f64,
    pub positions: Vec<PositionEstimate>,
}

/// Blur center weight; `(1 - 4*BLUR_D)` center, `BLUR_D` each of the 4
/// axis-aligned neighbours.
const BLUR_D: f32 = 0.05;

fn blur_plane(samples: &[SampleBlock], blocks_wide: usize, blocks_high: usize) -> Vec<SampleBlock> {
    let width = blocks_wide * 8;
    let height = blocks_high * 8;
    let get = |flat: &[f32], x: i32, y: i32| -> f32 {
        let x = x.clamp(0, width as i32 - 1) as usize;
        let y = y.clamp(0, height as i32 - 1) as usize;
        flat[y * width + x]
    };

    let mut flat = vec![0f32; width * height];
    for (b, block) in samples.iter().enumerate() {
        let bx = (b % blocks_wide) * 8;
        let by = (b / blocks_wide) * 8;
        for i in 0..64 {
            flat[(by + i / 8) * width + bx + i % 8] = block[i];
        }
    }

    let mut blurred = vec![0f32; width * height];
    let center = 1.0 - 4.0 * BLUR_D;
    for y in 0..height {
        for x in 0..width {
            let v = center * get(&flat, x as i32, y as i32)
                + BLUR_D * get(&flat, x as i32 - 1, y as i32)
                + BLUR_D * get(&flat, x as i32 + 1, y as i32)
                + BLUR_D * get(&flat, x as i32, y as i32 - 1)
                + BLUR_D * get(&flat, x as i32, y as i32 + 1);
            blurred[y * width + x] = v;
        }
    }

    (0..samples.len())
        .map(|b| {
            let bx = (b % blocks_wide) * 8;
            let by = (b / blocks_wide) * 8;
            let mut block = [0f32; 64];
            for i in 0..64 {
                block[i] = blurred[(by + i / 8) * width + bx + i % 8];
            }
            block
        })
        .collect()
}

fn reconstruct_samples(plane: &ComponentPlane, quant: &[u16; 64]) -> Vec<SampleBlock> {
    plane
        .blocks
        .iter()
        .map(|block| idct(&dequantize(block, quant)))
        .collect()
}

fn recompress(samples: &[SampleBlock], quant: &[u16; 64]) -> Vec<[i16; 64]> {
    samples
        .iter()
        .map(|s| quantize(&fdct(&clamp_samples(s)), quant))
        .collect()
}

/// Count occurrences of `values` (expected to be 3 consecutive small
/// non-negative coefficient magnitudes) at natural position `(row, col)`
/// across all blocks.
fn histogram_at(blocks: &[[i16; 64]], row: usize, col: usize, values: [i16; 3]) -> [f64; 3] {
    let idx = row * 8 + col;
    let mut counts = [0f64; 3];
    for block in blocks {
        let v = block[idx];
        for (slot, &target) in counts.iter_mut().zip(values.iter()) {
            if v == target {
                *slot += 1.0;
            }
        }
    }
    counts
}

fn estimate_position(original: &[[i16; 64]], recompressed: &[[i16; 64]], row: usize, col: usize) -> PositionEstimate {
    let h = histogram_at(original, row, col, [0, 1, 2]);
    let hp = histogram_at(recompressed, row, col, [0, 1, 2]);

    let denom = hp[1] * hp[1] + (hp[2] - hp[1]) * (hp[2] - hp[1]);
    let beta = if denom != 0.0 {
        (hp[1] * (h[0] - hp[0]) + (h[1] - hp[1]) * (hp[2] - hp[1])) / denom
    } else {
        0.0
    };

    let epsilon: f64 = (0..3)
        .map(|j| {
            let predicted = if j == 0 {
                (1.0 - beta) * hp[0]
            } else {
                (1.0 - beta) * hp[j] + beta * hp[j - 1]
            };
            (h[j] - predicted).powi(2)
        })
        .sum();

    PositionEstimate { beta, epsilon }
}

/// Recompress the luminance plane (component 0) at `quality` and estimate
/// F5's β across the three sampled mid-frequency positions. `with_blur`
/// applies the optional pre-recompression low-pass filter.
pub fn estimate(image: &DctImage, quality: u8, with_blur: bool) -> F5Estimate {
    let luma = &image.components[0];
    let quant = scale_quant_table(&STD_LUMINANCE_QUANT_TABLE, quality);

    let samples = reconstruct_samples(luma, &quant);
    let samples = if with_blur {
        blur_plane(&samples, luma.blocks_wide, luma.blocks_high)
    } else {
        samples
    };
    let recompressed = recompress(&samples, &quant);

    let positions: Vec<PositionEstimate> = POSITIONS
        .iter()
        .map(|&(r, c)| estimate_position(&luma.blocks, &recompressed, r, c))
        .collect();

    let beta = positions.iter().map(|p| p.beta).sum::<f64>() / positions.len() as f64;

    F5Estimate { beta, positions }
}

/// Sweep a quality range and return the estimate with the lowest total
/// residual, the reference tool's "quality 90..98" search.
pub fn estimate_sweep(image: &DctImage, qualities: std::ops::RangeInclusive<u8>, with_blur: bool) -> F5Estimate {
    qualities
        .map(|q| estimate(image, q, with_blur))
        .min_by(|a, b| {
            let ea: f64 = a.positions.iter().map(|p| p.epsilon).sum();
            let eb: f64 = b.positions.iter().map(|p| p.epsilon).sum();
            ea.partial_cmp(&eb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("quality range must be non-empty")
}

/// Characteristic encoder comment strings whose presence alone is treated
/// as positive evidence of F5, short-circuiting the statistical estimate.
const F5_COMMENT_MARKERS: [&str; 1] = ["JPEG Encoder Copyright 1998, James R. Weeks"];

/// Scan a JPEG comment payload for a known F5 encoder signature.
pub fn has_f5_comment(comment: &[u8]) -> bool {
    let text = String::from_utf8_lossy(comment);
    F5_COMMENT_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_luma(blocks_wide: usize, blocks_high: usize) -> DctImage {
        let plane = ComponentPlane {
            h_sampling: 1,
            v_sampling: 1,
            quant_table_id: 0,
            blocks_wide,
            blocks_high,
            blocks: vec![[0i16; 64]; blocks_wide * blocks_high],
        };
        DctImage {
            width: (blocks_wide * 8) as u16,
            height: (blocks_high * 8) as u16,
            components: vec![plane.clone(), plane.clone(), plane],
        }
    }

    #[test]
    fn test_estimate_on_all_zero_image_has_bounded_beta() {
        let image = flat_luma(4, 4);
        let est = estimate(&image, 90, false);
        assert!(est.beta.is_finite());
        assert_eq!(est.positions.len(), 3);
    }

    #[test]
    fn test_has_f5_comment_detects_marker() {
        let comment = b"JPEG Encoder Copyright 1998, James R. Weeks and BioElectroMech.";
        assert!(has_f5_comment(comment));
    }

    #[test]
    fn test_has_f5_comment_false_for_unrelated_text() {
        assert!(!has_f5_comment(b"quality 90, irfanview"));
    }

    #[test]
    fn test_estimate_sweep_picks_lowest_residual() {
        let image = flat_luma(4, 4);
        let est = estimate_sweep(&image, 90..=92, false);
        assert!(est.beta.is_finite());
    }
}
