//! Wires the per-scheme breakers from `steg-crack` into a single
//! [`steg_crack::CrackJob`] per file, so one wordlist sweep tries every
//! scheme the caller selected against every file in one pass.

use jpeg_dct::{decode_raster, DctImage};
use steg_analyze::extract::{prepare_jphide, prepare_natural, prepare_outguess_order};
use steg_crack::{jphide, jsteg, outguess, CrackJob};

use crate::cli::CliArgs;
use crate::error::{CliError, Result};

enum SchemeTarget {
    Jsteg(jsteg::JstegTarget),
    Outguess(outguess::OutguessTarget),
    Jphide(jphide::JphideTarget),
}

pub struct FileJob {
    filename: String,
    targets: Vec<SchemeTarget>,
}

impl CrackJob for FileJob {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn try_crack(&mut self, word: &str) -> Option<String> {
        let bytes = word.as_bytes();
        for target in &self.targets {
            match target {
                SchemeTarget::Jsteg(t) => {
                    if jsteg::try_password(t, bytes).is_some() {
                        return Some(format!("jsteg, key: \"{word}\""));
                    }
                }
                SchemeTarget::Outguess(t) => {
                    if let Some(hit) = outguess::try_password(t, bytes, 0, 0) {
                        return Some(format!(
                            "outguess, key: \"{word}\" ({} probe bytes)",
                            hit.payload.len()
                        ));
                    }
                }
                SchemeTarget::Jphide(t) => {
                    if jphide::try_v3(t, bytes) {
                        return Some(format!("jphide v3, key: \"{word}\""));
                    }
                    if jphide::try_v5(t, bytes) {
                        return Some(format!("jphide v5, key: \"{word}\""));
                    }
                }
            }
        }
        None
    }
}

fn decode(path: &str) -> Result<DctImage> {
    let data = std::fs::read(path)?;
    decode_raster(&data).map_err(|source| CliError::Decode { path: path.to_string(), source })
}

/// Decode `path` and prepare a target for every scheme `args` selects.
/// Returns `Ok(None)` when every selected scheme's extraction fails
/// (e.g. the image is too small), which just drops the file from this run.
pub fn build_job(path: &str, args: &CliArgs) -> Result<Option<FileJob>> {
    let image = decode(path)?;
    let mut targets = Vec::new();

    if args.wants('j') {
        let seq = prepare_natural(&image)
            .map_err(|source| CliError::Analyze { path: path.to_string(), source })?;
        if let Some(t) = jsteg::prepare(&seq) {
            targets.push(SchemeTarget::Jsteg(t));
        }
    }
    if args.wants('o') {
        let seq = prepare_outguess_order(&image)
            .map_err(|source| CliError::Analyze { path: path.to_string(), source })?;
        targets.push(SchemeTarget::Outguess(outguess::prepare(&seq)));
    }
    if args.wants('p') {
        let (seq, _, _) = prepare_jphide(&image)
            .map_err(|source| CliError::Analyze { path: path.to_string(), source })?;
        if let Some(t) = jphide::prepare(&seq) {
            targets.push(SchemeTarget::Jphide(t));
        }
    }

    if targets.is_empty() {
        return Ok(None);
    }
    Ok(Some(FileJob { filename: path.to_string(), targets }))
}
