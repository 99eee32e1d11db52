use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptoError>;

#[derive(Error)]
pub enum CryptoError {
    #[error("block cipher key must be 1-56 bytes, got {0}")]
    InvalidKeyLength(usize),
}

impl fmt::Debug for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
