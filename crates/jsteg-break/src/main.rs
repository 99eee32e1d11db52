//! `jsteg-break`: dictionary attack against jsteg/outguess/jphide-embedded
//! JPEG images.
//!
//! Prepares every file named on the command line once, then sweeps a
//! rule-expanded wordlist against all of them in a single pass, reporting a
//! hit as soon as one scheme on one file accepts a candidate password.

mod cli;
mod error;
mod inputs;
mod jobs;
mod rules;

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use cli::CliArgs;
use error::Result;
use steg_crack::job::{AttackFlags, JobDb};

/// Interval the status-tick thread sleeps for between setting `alarmed`,
/// matching the reference tool's `alarm(1)` period.
const STATUS_TICK: Duration = Duration::from_secs(1);

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let mut db = JobDb::new();
    let files = inputs::resolve(&args.files)?;

    for path in &files {
        let path_str = path.display().to_string();
        match jobs::build_job(&path_str, args)? {
            Some(job) => db.insert(job),
            None => log::warn!("{path_str}: no embedding scheme produced a usable probe, skipping"),
        }
    }

    if db.is_empty() {
        println!("no files to attack");
        return Ok(());
    }

    let rule_set = rules::load(args.rules.as_deref())?;
    let wordlist = BufReader::new(File::open(&args.wordlist)?);

    let flags = Arc::new(AttackFlags::default());

    // SIGINT -> interrupted, matching the reference tool's sig_handle_inter.
    // The handler only flips the flag; the loop itself observes and clears
    // it at the next word boundary.
    let sigint_flags = Arc::clone(&flags);
    ctrlc::set_handler(move || {
        sigint_flags.interrupted.store(true, Ordering::Relaxed);
    })?;

    // Status-tick thread standing in for the reference tool's alarm(1)
    // SIGALRM: sets `alarmed` once a second for the main loop to notice.
    let tick_flags = Arc::clone(&flags);
    std::thread::spawn(move || loop {
        std::thread::sleep(STATUS_TICK);
        tick_flags.alarmed.store(true, Ordering::Relaxed);
    });

    steg_crack::job::run_wordlist_attack(
        &mut db,
        wordlist,
        rule_set,
        &flags,
        |filename, detail| println!("{filename} : {detail}"),
        |last_word| log::info!("status: last word tried \"{last_word}\""),
    );

    Ok(())
}
