//! JPEG scan data decoding.
//!
//! Decodes entropy-coded scan data to DCT coefficients without performing
//! dequantization or IDCT. This is the entry point for coefficient-level
//! access used by the steganalysis pipeline.
//!
//! # Module Structure
//!
//! - `baseline` - Baseline (sequential) JPEG decode
//! - `progressive` - Progressive JPEG decode (rejected upstream; out of scope)

mod baseline;

use super::parser::{JpegSegments, ZIGZAG_TO_NATURAL};
use crate::error::{DctError, Result};

pub use baseline::decode_scan_baseline;
pub(crate) use baseline::calculate_mcu_info;

/// Decoded scan coefficients.
#[derive(Debug, Clone)]
pub struct ScanCoefficients {
    /// All DCT coefficients in scan order.
    /// Organized as blocks of 64 i16 values in zigzag order.
    /// Block order follows JPEG interleaving rules.
    pub data: Vec<i16>,

    /// Number of 8x8 blocks per component.
    pub blocks_per_component: Vec<usize>,

    /// Total number of blocks.
    pub total_blocks: usize,

    /// Image dimensions.
    pub width: u16,
    pub height: u16,
}

impl ScanCoefficients {
    /// Get coefficients as a flat slice.
    #[inline]
    pub fn as_slice(&self) -> &[i16] {
        &self.data
    }

    /// Get coefficients as a mutable flat slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        &mut self.data
    }

    /// Get a specific block's coefficients.
    #[inline]
    pub fn block(&self, index: usize) -> &[i16] {
        let start = index * 64;
        &self.data[start..start + 64]
    }

    /// Get a specific block's coefficients mutably.
    #[inline]
    pub fn block_mut(&mut self, index: usize) -> &mut [i16] {
        let start = index * 64;
        &mut self.data[start..start + 64]
    }

    /// Convert coefficients from zigzag to natural order.
    pub fn to_natural_order(&self) -> Vec<i16> {
        let mut result = vec![0i16; self.data.len()];
        for block_idx in 0..self.total_blocks {
            let src_start = block_idx * 64;
            let dst_start = block_idx * 64;
            for i in 0..64 {
                result[dst_start + ZIGZAG_TO_NATURAL[i]] = self.data[src_start + i];
            }
        }
        result
    }
}

/// Decode scan data from a parsed JPEG.
///
/// Extracts all DCT coefficients from the entropy-coded scan data.
/// Automatically dispatches to baseline or progressive decoder based on JPEG type.
///
/// # Arguments
/// * `segments` - Parsed JPEG segments containing Huffman tables and scan data
///
/// # Returns
/// Decoded DCT coefficients in scan order.
pub fn decode_scan(segments: &JpegSegments) -> Result<ScanCoefficients> {
    let frame = segments.frame.as_ref().ok_or_else(|| DctError::InvalidCoefficients {
        reason: "missing frame info (SOF)".to_string(),
    })?;

    if frame.is_progressive() {
        // TODO: progressive::decode_scan_progressive(segments)
        return Err(DctError::InvalidCoefficients {
            reason: "progressive JPEGs not yet supported".to_string(),
        });
    }

    baseline::decode_scan_baseline(segments)
}
