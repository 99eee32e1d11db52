//! Error types for baseline JPEG coefficient access.

use std::fmt;
use thiserror::Error;

/// Result type alias for JPEG decode/encode operations.
pub type Result<T> = std::result::Result<T, DctError>;

/// Errors that can occur while parsing a JPEG or walking its coefficients.
#[derive(Error)]
pub enum DctError {
    /// The byte stream is not a JPEG file, or a segment could not be parsed.
    #[error("invalid JPEG data: {reason}")]
    InvalidCoefficients { reason: String },

    /// A feature this crate does not decode (progressive scans, non-baseline
    /// precision, arithmetic coding) was encountered.
    #[error("unsupported JPEG feature: {0}")]
    Unsupported(String),

    /// The image does not have the three YCbCr/RGB components the
    /// steganalysis pipeline requires.
    #[error("expected 3 components, found {0}")]
    UnexpectedComponentCount(usize),

    /// I/O error while reading or writing bit-packed scan data.
    #[error("bit I/O error: {0}")]
    BitIo(#[from] std::io::Error),
}

impl fmt::Debug for DctError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
