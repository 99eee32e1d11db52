//! Baseline JPEG coefficient and pixel access for steganalysis.
//!
//! This crate is the decoder collaborator the rest of the workspace builds
//! on: it parses baseline JPEG files, Huffman-decodes their entropy-coded
//! scans into quantized DCT coefficients, and re-homes those coefficients
//! into a component-major raster view ([`DctImage`]) that the coefficient
//! extractor and unifier tests walk directly. [`dct`] additionally supplies
//! the pixel-domain IDCT/FDCT and standard quantization tables the F5
//! recompression detector needs.
//!
//! # High-Level API
//!
//! ```ignore
//! use jpeg_dct::decode_raster;
//!
//! let data = std::fs::read("suspect.jpg")?;
//! let image = decode_raster(&data)?;
//! for block in image.component_blocks(0) {
//!     // natural-order DCT coefficients for the luminance plane
//! }
//! ```
//!
//! # Low-Level API
//!
//! For direct access to markers, tables, and scan data, use the [`jpeg`]
//! submodule:
//!
//! ```ignore
//! use jpeg_dct::jpeg;
//!
//! let segments = jpeg::parse_jpeg(&jpeg_data)?;
//! let coefficients = jpeg::decode_scan(&segments)?;
//! ```

pub mod dct;
mod error;
pub mod jpeg;
mod quality;
mod raster;

pub use error::{DctError, Result};
pub use jpeg::{decode_raster, parse_jpeg, parse_quantization_tables, JpegSegments, QuantizationTable};
pub use quality::estimate_quality;
pub use raster::{ComponentPlane, DctImage};
