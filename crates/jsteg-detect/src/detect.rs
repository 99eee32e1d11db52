//! Per-file detection dispatch: decode a JPEG, run every requested scheme's
//! detector over it, and format a stegdetect-style result line.

use jpeg_dct::jpeg::Marker;
use jpeg_dct::{decode_raster, parse_jpeg, DctImage};
use steg_analyze::{
    chisq::{detect_jphide, detect_jsteg, detect_outguess},
    estimate_f5, estimate_f5_sweep, has_f5_comment,
    extract::{prepare_jphide, prepare_natural, prepare_outguess_order},
};

use crate::cli::CliArgs;
use crate::error::{CliError, Result};

/// One scheme's verdict: a name and a confidence in `[0, 1]` after the
/// caller's sensitivity scale has been applied.
pub struct Finding {
    pub scheme: &'static str,
    pub confidence: f64,
}

/// Everything learned about a single file.
pub struct Report {
    pub path: String,
    pub has_markers: bool,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_negative(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn format(&self) -> String {
        if self.is_negative() {
            format!("{} : negative", self.path)
        } else {
            let parts: Vec<String> = self
                .findings
                .iter()
                .map(|f| format!("{}({:.2})", f.scheme, f.confidence))
                .collect();
            format!("{} : {}", self.path, parts.join(", "))
        }
    }
}

fn has_suspicious_markers(segments: &jpeg_dct::JpegSegments) -> bool {
    segments
        .segments
        .iter()
        .any(|s| matches!(s.marker, Marker::COM | Marker::APP(_)))
}

fn comment_bytes(segments: &jpeg_dct::JpegSegments) -> Vec<u8> {
    segments
        .segments
        .iter()
        .filter(|s| matches!(s.marker, Marker::COM))
        .flat_map(|s| s.data.clone())
        .collect()
}

/// Run every scheme `args` selects against `path`, honouring `-n`/`-s`.
pub fn scan_file(path: &str, args: &CliArgs) -> Result<Report> {
    let data = std::fs::read(path).map_err(|source| CliError::Io { path: path.to_string(), source })?;

    let segments = parse_jpeg(&data).map_err(|source| CliError::Decode { path: path.to_string(), source })?;
    let image = decode_raster(&data).map_err(|source| CliError::Decode { path: path.to_string(), source })?;

    let has_markers = has_suspicious_markers(&segments);
    let suppress_non_outguess = args.no_suspicious_markers && has_markers;

    let mut findings = Vec::new();

    if args.wants('j') && !suppress_non_outguess {
        if let Some(f) = check_jsteg(&image, args)? {
            findings.push(f);
        }
    }
    if args.wants('o') {
        if let Some(f) = check_outguess(&image, args)? {
            findings.push(f);
        }
    }
    if args.wants('p') && !suppress_non_outguess {
        if let Some(f) = check_jphide(&image, args)? {
            findings.push(f);
        }
    }
    if (args.wants('f') || args.wants('F')) && !suppress_non_outguess {
        if has_f5_comment(&comment_bytes(&segments)) {
            findings.push(Finding { scheme: "f5", confidence: 1.0 });
        } else if let Some(f) = check_f5(&image, args)? {
            findings.push(f);
        }
    }

    Ok(Report { path: path.to_string(), has_markers, findings })
}

fn check_jsteg(image: &DctImage, args: &CliArgs) -> Result<Option<Finding>> {
    let seq = prepare_natural(image).map_err(|source| CliError::Analyze { path: String::new(), source })?;
    let score = detect_jsteg(&seq) as f64 / 3.0 * args.sensitivity;
    Ok((score > 0.0).then_some(Finding { scheme: "jsteg", confidence: score.min(1.0) }))
}

fn check_outguess(image: &DctImage, args: &CliArgs) -> Result<Option<Finding>> {
    let seq = prepare_outguess_order(image).map_err(|source| CliError::Analyze { path: String::new(), source })?;
    let score = detect_outguess(&seq) * args.sensitivity;
    Ok((score > 0.2).then_some(Finding { scheme: "outguess", confidence: score.min(1.0) }))
}

fn check_jphide(image: &DctImage, args: &CliArgs) -> Result<Option<Finding>> {
    let (seq, p0, p1) = prepare_jphide(image).map_err(|source| CliError::Analyze { path: String::new(), source })?;
    let score = detect_jphide(&seq, (p0, p1)) * args.sensitivity;
    Ok((score > 0.9).then_some(Finding { scheme: "jphide", confidence: score.min(1.0) }))
}

fn check_f5(image: &DctImage, args: &CliArgs) -> Result<Option<Finding>> {
    let est = if args.wants('F') {
        estimate_f5_sweep(image, 50..=95, true)
    } else {
        estimate_f5(image, 80, false)
    };
    let score = est.beta.abs() * args.sensitivity;
    Ok((score > 0.05).then_some(Finding { scheme: "f5", confidence: score.min(1.0) }))
}
