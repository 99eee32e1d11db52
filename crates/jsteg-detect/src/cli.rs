use std::path::PathBuf;

use clap::Parser;

/// Detects steganography content in JPEG images.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Schemes to test: o=outguess j=jsteg p=jphide i=invisible-secrets
    /// f=F5(fast) F=F5(slow) a=all
    #[arg(short = 't', long = "tests", default_value = "a")]
    pub tests: String,

    /// Global sensitivity scale applied to every detector's threshold
    #[arg(short = 's', long = "sensitivity", default_value_t = 1.0)]
    pub sensitivity: f64,

    /// Disable checks when the image carries JPEG comments or APP markers
    #[arg(short = 'n', long = "no-suspicious-markers")]
    pub no_suspicious_markers: bool,

    /// Suppress negative result lines
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Debug bitmask
    #[arg(short = 'd', long = "debug", default_value_t = 0)]
    pub debug_mask: u32,

    /// Produce a feature row for `transform` labeled `n` (1 = positive, 0 = negative)
    #[arg(short = 'C', long = "collect", value_name = "n,transform")]
    pub collect: Option<String>,

    /// Ingest training data from `file` instead of running detection
    #[arg(short = 'c', long = "train", value_name = "file")]
    pub train: Option<PathBuf>,

    /// Load a detector record instead of the built-in thresholds
    #[arg(short = 'D', long = "detector", value_name = "file")]
    pub detector: Option<PathBuf>,

    /// JPEG files to scan, or directories to recurse into. Omit entirely to
    /// read one path per line from stdin.
    pub files: Vec<PathBuf>,
}

impl CliArgs {
    pub fn wants(&self, scheme: char) -> bool {
        self.tests.contains('a') || self.tests.contains(scheme)
    }
}
