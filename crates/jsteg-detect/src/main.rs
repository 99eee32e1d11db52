//! `jsteg-detect`: statistical steganalysis for JPEG images.
//!
//! Runs the chi-square and F5-recompression detectors from `steg-analyze`
//! over each file named on the command line and prints one stegdetect-style
//! result line per file.

mod cli;
mod detect;
mod error;
mod inputs;
mod train;

use clap::Parser;

use cli::CliArgs;
use error::Result;

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    if let Some(detector_path) = &args.detector {
        let text = std::fs::read_to_string(detector_path)
            .map_err(|source| error::CliError::Io { path: detector_path.display().to_string(), source })?;
        let detector = steg_analyze::Discriminant::load(&text)
            .map_err(|source| error::CliError::Analyze { path: detector_path.display().to_string(), source })?;
        log::info!("loaded detector '{}' ({} points)", detector.name, detector.npoints);
    }

    if let Some(train_path) = &args.train {
        let rows = train::count_rows(train_path)?;
        println!("{}: {rows} training rows", train_path.display());
        return Ok(());
    }

    let files = inputs::resolve(&args.files)
        .map_err(|source| error::CliError::Io { path: "<file arguments>".to_string(), source })?;

    if let Some(spec) = &args.collect {
        let (label, transform) = train::parse_collect_arg(spec).ok_or_else(|| {
            error::CliError::Io {
                path: spec.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "expected -C label,transform",
                ),
            }
        })?;
        for path in &files {
            let row = train::collect_row(&path.display().to_string(), label, &transform)?;
            println!("{row}");
        }
        return Ok(());
    }

    for path in &files {
        let path_str = path.display().to_string();
        match detect::scan_file(&path_str, args) {
            Ok(report) => {
                if !report.is_negative() || !args.quiet {
                    println!("{}", report.format());
                }
            }
            Err(err) => {
                eprintln!("{path_str}: {err}");
            }
        }
    }

    Ok(())
}
