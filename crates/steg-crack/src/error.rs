use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrackError>;

#[derive(Error)]
pub enum CrackError {
    #[error("coefficient sequence too short for {0}")]
    ShortSequence(&'static str),

    #[error("malformed job record: {0}")]
    MalformedJob(&'static str),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crypto(#[from] steg_crypto::CryptoError),

    #[error(transparent)]
    Analyze(#[from] steg_analyze::AnalyzeError),

    #[error(transparent)]
    Config(#[from] steg_config::ConfigError),
}

impl fmt::Debug for CrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
