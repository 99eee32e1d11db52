//! Job database and the cooperative attack loop (C11).
//!
//! Mirrors the reference tool's `TAILQ`-based job list: every target image
//! stays in the queue until it's cracked or the wordlist (across every
//! rule) is exhausted, at which point it's reported negative and dropped.
//! The outer loop is single-threaded and cooperative — status reporting
//! and rule advancement happen at checkpoints the caller signals by
//! flipping a shared flag, matching the original `SIGALRM`/`SIGINT`
//! handlers (which only ever set `alarmed`/`signaled` for the main loop to
//! notice) without this crate owning a signal handler itself.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::wordlist::{Rule, WordlistSource};
use std::io::BufRead;

/// One in-progress crack target. Implementors own their scheme-specific
/// state (prepared coefficient probes) and report whether `word` cracked
/// them.
pub trait CrackJob {
    fn filename(&self) -> &str;
    fn try_crack(&mut self, word: &str) -> Option<String>;
}

/// The live job queue, insertion-ordered like the reference tool's list.
pub struct JobDb<J: CrackJob> {
    jobs: Vec<Option<J>>,
    pub count: u64,
    pub found: u64,
}

impl<J: CrackJob> Default for JobDb<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J: CrackJob> JobDb<J> {
    pub fn new() -> Self {
        JobDb { jobs: Vec::new(), count: 0, found: 0 }
    }

    pub fn insert(&mut self, job: J) {
        self.jobs.push(Some(job));
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.iter().all(|j| j.is_none())
    }

    /// Try `word` against every still-live job, removing and reporting the
    /// ones it cracks. Returns `true` once the queue is fully drained
    /// (every job cracked), the reference tool's signal to stop early.
    pub fn crack_word(&mut self, word: &str, mut on_hit: impl FnMut(&str, &str)) -> bool {
        for slot in &mut self.jobs {
            let Some(job) = slot else { continue };
            self.count += 1;
            if let Some(detail) = job.try_crack(word) {
                on_hit(job.filename(), &detail);
                self.found += 1;
                *slot = None;
            }
        }
        self.is_empty()
    }

    /// Report every still-live job as negative and drop it.
    pub fn flush(&mut self, mut on_negative: impl FnMut(&str)) {
        for slot in &mut self.jobs {
            if let Some(job) = slot.take() {
                on_negative(job.filename());
            }
        }
    }
}

/// Cooperative flags a surrounding runtime flips from its real signal
/// handlers; the loop only ever reads and clears them.
#[derive(Default)]
pub struct AttackFlags {
    pub alarmed: AtomicBool,
    pub interrupted: AtomicBool,
}

/// Run the wordlist (expanded through `rules`, restarting from the top of
/// the wordlist for each rule) against `db` until it's drained or the
/// wordlist is exhausted for every rule. `on_status` is invoked whenever
/// `flags.alarmed` is set (periodic status) and `on_interrupt` whenever
/// `flags.interrupted` is set (one-shot status then resume).
pub fn run_wordlist_attack<R: BufRead, J: CrackJob>(
    db: &mut JobDb<J>,
    reader: R,
    rules: Vec<Rule>,
    flags: &AttackFlags,
    mut on_hit: impl FnMut(&str, &str),
    mut on_status: impl FnMut(&str),
) {
    let mut last_word = String::new();
    let mut source = WordlistSource::new(reader, rules);

    for word in &mut source {
        if flags.interrupted.swap(false, Ordering::Relaxed) {
            on_status(&last_word);
        }
        if flags.alarmed.swap(false, Ordering::Relaxed) {
            on_status(&last_word);
        }

        if word == last_word {
            continue;
        }
        last_word = word.clone();

        if db.crack_word(&word, &mut on_hit) {
            return;
        }
    }

    db.flush(|filename| on_status(&format!("{filename} : negative")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct FixedJob {
        name: String,
        secret: String,
    }

    impl CrackJob for FixedJob {
        fn filename(&self) -> &str {
            &self.name
        }
        fn try_crack(&mut self, word: &str) -> Option<String> {
            (word == self.secret).then(|| "matched".to_string())
        }
    }

    #[test]
    fn test_crack_word_removes_hit_jobs() {
        let mut db = JobDb::new();
        db.insert(FixedJob { name: "a.jpg".into(), secret: "letmein".into() });
        db.insert(FixedJob { name: "b.jpg".into(), secret: "hunter2".into() });

        let mut hits = Vec::new();
        let drained = db.crack_word("letmein", |f, d| hits.push((f.to_string(), d.to_string())));
        assert!(!drained);
        assert_eq!(hits, vec![("a.jpg".to_string(), "matched".to_string())]);
        assert_eq!(db.found, 1);
    }

    #[test]
    fn test_flush_reports_remaining_jobs_as_negative() {
        let mut db = JobDb::new();
        db.insert(FixedJob { name: "a.jpg".into(), secret: "xxx".into() });

        let mut negatives = Vec::new();
        db.flush(|f| negatives.push(f.to_string()));
        assert_eq!(negatives, vec!["a.jpg".to_string()]);
        assert!(db.is_empty());
    }

    #[test]
    fn test_run_wordlist_attack_finds_and_stops_early() {
        let mut db = JobDb::new();
        db.insert(FixedJob { name: "a.jpg".into(), secret: "letmein".into() });

        let flags = AttackFlags::default();
        let mut hits = Vec::new();
        let data = b"wrong\nletmein\nnever-reached\n".to_vec();
        run_wordlist_attack(
            &mut db,
            Cursor::new(data),
            vec![Rule::AsIs],
            &flags,
            |f, d| hits.push((f.to_string(), d.to_string())),
            |_| {},
        );
        assert_eq!(hits, vec![("a.jpg".to_string(), "matched".to_string())]);
    }
}
