//! Baseline JPEG coefficient access.
//!
//! This module provides coefficient-level access to baseline JPEG files: it
//! parses markers and Huffman-decodes the entropy-coded scan into quantized
//! DCT coefficients. It performs no dequantization or IDCT on its own; that
//! lives in [`crate::dct`] for the callers (the F5 detector) that need
//! pixel-domain access.
//!
//! # Architecture
//!
//! ```text
//! JPEG bytes → parse (markers/tables) → Huffman decode → [i16] coefficients
//! ```

pub mod huffman;
pub mod marker;
pub mod parser;
pub mod scan;

pub use huffman::{BitReader, HuffmanLookup};
pub use marker::Marker;
pub use parser::{
    parse_jpeg, parse_quantization_tables, Component, FrameInfo, HuffmanTable, JpegSegments,
    QuantizationTable, Segment, NATURAL_TO_ZIGZAG, ZIGZAG_TO_NATURAL,
};
pub use scan::{decode_scan, ScanCoefficients};

use crate::error::{DctError, Result};
use crate::raster::DctImage;

/// Parse, decode, and re-layout a baseline JPEG's DCT coefficients as a
/// component-major raster image.
///
/// Enforces the preconditions C3 requires of its input: exactly three
/// components and a baseline (non-progressive) scan.
pub fn decode_raster(jpeg_data: &[u8]) -> Result<DctImage> {
    let segments = parse_jpeg(jpeg_data)?;
    let frame = segments
        .frame
        .as_ref()
        .ok_or_else(|| DctError::InvalidCoefficients {
            reason: "missing frame info (SOF)".to_string(),
        })?;

    if frame.components.len() != 3 {
        return Err(DctError::UnexpectedComponentCount(frame.components.len()));
    }
    if frame.is_progressive() {
        return Err(DctError::Unsupported("progressive scan".to_string()));
    }

    let coefficients = decode_scan(&segments)?;
    crate::raster::to_raster(&coefficients, frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_raster_rejects_non_jpeg() {
        let data = [0x00, 0x01, 0x02, 0x03];
        assert!(decode_raster(&data).is_err());
    }
}
