use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error)]
pub enum ConfigError {
    #[error("{path}: syntax error at line {line}")]
    Syntax { path: String, line: usize },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("section [{0}] not found")]
    MissingSection(String),

    #[error("parameter '{param}' not found in section [{section}]")]
    MissingParam { section: String, param: String },
}

impl fmt::Debug for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
