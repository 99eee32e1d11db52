//! Per-scheme dictionary breakers (jsteg, outguess, jphide v3/v5), the
//! rule-expanded word source, and the job database/attack loop that ties
//! them together.

pub mod error;
pub mod job;
pub mod jphide;
pub mod jsteg;
pub mod outguess;
pub mod wordlist;

pub use error::{CrackError, Result};
pub use job::{AttackFlags, CrackJob, JobDb};
pub use wordlist::{default_rules, Rule, WordlistSource};
