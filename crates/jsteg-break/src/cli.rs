use std::path::PathBuf;

use clap::Parser;

/// Runs a dictionary attack against jsteg/outguess/jphide-embedded JPEGs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Rule file overriding the default mangling rule set (unused entries
    /// fall back to the built-in rules)
    #[arg(short = 'r', long = "rules", value_name = "file")]
    pub rules: Option<PathBuf>,

    /// Wordlist to sweep
    #[arg(short = 'f', long = "wordlist", value_name = "file")]
    pub wordlist: PathBuf,

    /// Schemes to try: j=jsteg o=outguess p=jphide a=all
    #[arg(short = 't', long = "tests", default_value = "a")]
    pub tests: String,

    /// JPEG files to attack, or directories to recurse into. Omit entirely
    /// to read one path per line from stdin.
    pub files: Vec<PathBuf>,
}

impl CliArgs {
    pub fn wants(&self, scheme: char) -> bool {
        self.tests.contains('a') || self.tests.contains(scheme)
    }
}
