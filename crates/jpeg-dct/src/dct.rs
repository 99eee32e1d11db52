//! Pixel-domain transforms: IDCT, FDCT, and standard IJG quantization
//! tables, scaled to a target quality.
//!
//! The coefficient-level modules in [`crate::jpeg`] never touch pixel space;
//! the F5 recompression detector does, since it has to reproduce what a
//! second JPEG compression pass at a guessed quality would have done to the
//! image. Everything here works in natural (row-major) coefficient order,
//! not zigzag.

/// Standard IJG luminance quantization table at quality 50, natural order.
#[rustfmt::skip]
pub const STD_LUMINANCE_QUANT_TABLE: [u16; 64] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];

/// Standard IJG chrominance quantization table at quality 50, natural order.
#[rustfmt::skip]
pub const STD_CHROMINANCE_QUANT_TABLE: [u16; 64] = [
    17,  18,  24,  47,  99,  99,  99,  99,
    18,  21,  26,  66,  99,  99,  99,  99,
    24,  26,  56,  99,  99,  99,  99,  99,
    47,  66,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
];

/// Scale a quality-50 IJG base table to the given quality (1–100), the same
/// formula `libjpeg` uses (`jcparam.c: jpeg_quality_scaling` + clamping).
pub fn scale_quant_table(base: &[u16; 64], quality: u8) -> [u16; 64] {
    let quality = quality.clamp(1, 100) as i32;
    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - quality * 2
    };

    let mut out = [0u16; 64];
    for (i, &v) in base.iter().enumerate() {
        let scaled = (v as i32 * scale + 50) / 100;
        out[i] = scaled.clamp(1, 255) as u16;
    }
    out
}

/// An 8x8 block of spatial-domain samples, centered at 0 (i.e. pixel - 128).
pub type SampleBlock = [f32; 64];

/// An 8x8 block of DCT coefficients, natural order.
pub type CoeffBlock = [f32; 64];

const PI: f32 = std::f32::consts::PI;

fn alpha(u: usize) -> f32 {
    if u == 0 {
        std::f32::consts::FRAC_1_SQRT_2
    } else {
        1.0
    }
}

/// Forward 8x8 DCT-II, unnormalized except for the standard 1/4 * alpha(u)*alpha(v) factor.
///
/// This is a direct (non-separable-optimized) implementation: clear and
/// correct, traded for speed since the detector only runs it over a handful
/// of candidate quality levels per suspect image, not on a hot path.
pub fn fdct(samples: &SampleBlock) -> CoeffBlock {
    let mut out = [0f32; 64];
    for u in 0..8 {
        for v in 0..8 {
            let mut sum = 0f32;
            for x in 0..8 {
                for y in 0..8 {
                    let cx = ((2 * x + 1) as f32 * u as f32 * PI / 16.0).cos();
                    let cy = ((2 * y + 1) as f32 * v as f32 * PI / 16.0).cos();
                    sum += samples[y * 8 + x] * cx * cy;
                }
            }
            out[v * 8 + u] = 0.25 * alpha(u) * alpha(v) * sum;
        }
    }
    out
}

/// Inverse 8x8 DCT-III matching [`fdct`]'s normalization.
pub fn idct(coeffs: &CoeffBlock) -> SampleBlock {
    let mut out = [0f32; 64];
    for x in 0..8 {
        for y in 0..8 {
            let mut sum = 0f32;
            for u in 0..8 {
                for v in 0..8 {
                    let cx = ((2 * x + 1) as f32 * u as f32 * PI / 16.0).cos();
                    let cy = ((2 * y + 1) as f32 * v as f32 * PI / 16.0).cos();
                    sum += alpha(u) * alpha(v) * coeffs[v * 8 + u] * cx * cy;
                }
            }
            out[y * 8 + x] = 0.25 * sum;
        }
    }
    out
}

/// Dequantize a natural-order coefficient block against a natural-order
/// quantization table.
pub fn dequantize(coeffs: &[i16; 64], quant: &[u16; 64]) -> CoeffBlock {
    let mut out = [0f32; 64];
    for i in 0..64 {
        out[i] = coeffs[i] as f32 * quant[i] as f32;
    }
    out
}

/// Quantize a natural-order coefficient block (round-to-nearest, as libjpeg
/// does for forward quantization).
pub fn quantize(coeffs: &CoeffBlock, quant: &[u16; 64]) -> [i16; 64] {
    let mut out = [0i16; 64];
    for i in 0..64 {
        out[i] = (coeffs[i] / quant[i] as f32).round() as i16;
    }
    out
}

/// Clamp spatial samples back to the valid 8-bit range (still 0-centered).
pub fn clamp_samples(samples: &SampleBlock) -> SampleBlock {
    let mut out = [0f32; 64];
    for i in 0..64 {
        out[i] = samples[i].clamp(-128.0, 127.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idct_fdct_roundtrip() {
        let mut samples = [0f32; 64];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = ((i * 7) % 256) as f32 - 128.0;
        }
        let coeffs = fdct(&samples);
        let back = idct(&coeffs);
        for i in 0..64 {
            assert!((samples[i] - back[i]).abs() < 0.5, "mismatch at {i}: {} vs {}", samples[i], back[i]);
        }
    }

    #[test]
    fn test_dc_only_block_is_flat() {
        let mut coeffs = [0f32; 64];
        coeffs[0] = 8.0; // DC-only block should inverse-transform to a flat plane
        let samples = idct(&coeffs);
        let first = samples[0];
        for &s in &samples {
            assert!((s - first).abs() < 1e-3);
        }
    }

    #[test]
    fn test_quant_scaling_quality_50_is_identity() {
        let scaled = scale_quant_table(&STD_LUMINANCE_QUANT_TABLE, 50);
        assert_eq!(scaled, STD_LUMINANCE_QUANT_TABLE);
    }

    #[test]
    fn test_quant_scaling_quality_100_is_all_ones() {
        let scaled = scale_quant_table(&STD_LUMINANCE_QUANT_TABLE, 100);
        assert!(scaled.iter().all(|&v| v == 1));
    }
}
