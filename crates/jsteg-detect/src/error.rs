use std::fmt;

#[derive(thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Decode { path: String, source: jpeg_dct::DctError },

    #[error("{path}: {source}")]
    Analyze { path: String, source: steg_analyze::AnalyzeError },

    #[error("{path}: {source}")]
    Io { path: String, source: std::io::Error },
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
