use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzeError>;

#[derive(Error)]
pub enum AnalyzeError {
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("singular covariance matrix, cannot invert")]
    SingularMatrix,

    #[error("detector record malformed: {0}")]
    MalformedRecord(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] jpeg_dct::DctError),
}

impl fmt::Debug for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
