//! Statistical steganalysis primitives: coefficient extraction, the
//! randomness gate, chi-square histogram tests, the linear discriminant
//! classifier, feature transforms, and the F5 recompression detector.
//!
//! This crate has no notion of passwords or embedding formats beyond the
//! shape of a coefficient sequence; the detector and breaker binaries
//! assemble these primitives into a decision procedure per scheme.

pub mod chisq;
pub mod discriminant;
pub mod error;
pub mod extract;
pub mod f5;
pub mod features;
pub mod linalg;
pub mod random;
pub mod stats;

pub use discriminant::{Discriminant, Sample};
pub use error::{AnalyzeError, Result};
pub use extract::{
    default_jphide_table, prepare_gradient_x, prepare_jphide, prepare_mcu, prepare_natural,
    prepare_outguess_order, WalkMode, WalkSegment,
};
pub use f5::{estimate as estimate_f5, estimate_sweep as estimate_f5_sweep, has_f5_comment, F5Estimate};
pub use random::is_random;
