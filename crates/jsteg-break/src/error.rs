use std::fmt;

#[derive(thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Decode { path: String, source: jpeg_dct::DctError },

    #[error("{path}: {source}")]
    Analyze { path: String, source: steg_analyze::AnalyzeError },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Crack(#[from] steg_crack::CrackError),

    #[error("failed to install SIGINT handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
