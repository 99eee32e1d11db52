//! `-C`/`-c`: training-data collection and ingestion.
//!
//! `-C n,transform` prints one feature row (the named transform applied to
//! the file's natural-order coefficients) tagged with label `n` — `1` for a
//! known-positive (stego) sample, `0` for a known-negative (clean) one —
//! in a simple whitespace-separated format a caller can accumulate across
//! many files before training a [`steg_analyze::Discriminant`] offline.
//! `-c file` just reports how many rows such a file contains; this binary
//! does not itself drive [`Discriminant::compute`] end to end.

use jpeg_dct::decode_raster;
use steg_analyze::extract::prepare_natural;
use steg_analyze::features::{diffsquare_transform, gradient_transform, roughness_transform, spline_transform};

use crate::error::{CliError, Result};

/// Parse `-C`'s `n,transform` argument.
pub fn parse_collect_arg(spec: &str) -> Option<(u8, String)> {
    let (label, transform) = spec.split_once(',')?;
    let label: u8 = label.trim().parse().ok()?;
    Some((label, transform.trim().to_string()))
}

/// Compute the named transform's feature row for `path` and format it as
/// `label v0 v1 v2 ...`.
pub fn collect_row(path: &str, label: u8, transform: &str) -> Result<String> {
    let data = std::fs::read(path).map_err(|source| CliError::Io { path: path.to_string(), source })?;
    let image = decode_raster(&data).map_err(|source| CliError::Decode { path: path.to_string(), source })?;
    let dcts = prepare_natural(&image).map_err(|source| CliError::Analyze { path: path.to_string(), source })?;
    let bits = dcts.len();

    let points = match transform {
        "spline" => spline_transform(&dcts, bits),
        "roughness" => roughness_transform(&dcts, bits),
        "diffsquare" => diffsquare_transform(&dcts, bits),
        "gradient" => gradient_transform(&image)
            .map_err(|source| CliError::Analyze { path: path.to_string(), source })?,
        other => {
            return Err(CliError::Io {
                path: path.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unknown transform \"{other}\""),
                ),
            })
        }
    };

    let mut row = label.to_string();
    for v in points {
        row.push(' ');
        row.push_str(&v.to_string());
    }
    Ok(row)
}

/// `-c file`: count the rows in a previously collected training file.
pub fn count_rows(path: &std::path::Path) -> Result<usize> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
    Ok(text.lines().filter(|l| !l.trim().is_empty()).count())
}
