//! Linear discriminant classifier (C6): Fisher discrimination between a
//! "clean" and a "stego" population of feature vectors.
//!
//! Training keeps 80% of each population for estimation when testing
//! accuracy (`CD_PERCENT`), the remaining 20% for the held-out sweep that
//! chooses a decision boundary with a false-positive rate under 1%.

use std::fmt::Write as _;

use crate::error::{AnalyzeError, Result};
use crate::linalg::Matrix;

const CD_PERCENT: f64 = 0.8;

/// A single labeled feature vector collected for training or testing.
#[derive(Debug, Clone)]
pub struct Sample {
    pub points: Vec<f64>,
}

/// A trained (or loading) discriminant boundary for one named detector.
#[derive(Debug, Clone)]
pub struct Discriminant {
    pub name: String,
    pub transform_name: String,
    pub npoints: usize,
    pub b: Vec<f64>,
    pub projpos: f64,
    pub projneg: f64,
    pub k: f64,
    pub boundary_where: f64,
}

/// Per-dimension sample mean over the first `howmany` entries (or all of
/// them when `howmany` is 0).
pub fn mean_estimate(samples: &[Sample], howmany: usize, npoints: usize) -> Vec<f64> {
    let mut mest = vec![0.0; npoints];
    for i in 0..npoints {
        let mut sum = 0.0;
        let mut count = 0usize;
        for s in samples {
            sum += s.points[i];
            count += 1;
            if howmany != 0 && count >= howmany {
                break;
            }
        }
        mest[i] = if count > 0 { sum / count as f64 } else { 0.0 };
    }
    mest
}

/// Pooled covariance estimator.
///
/// Faithfully reproduces the reference tool's accumulator mistake: the
/// negative-class deviations are folded into the same running sum as the
/// positive class (`sum1`) instead of their own (`sum2`), so `sum2` stays
/// structurally zero while `count2` is still tracked and used in the final
/// divisor. This is preserved exactly, not corrected.
pub fn covariance_estimate(
    positive: &[Sample],
    negative: &[Sample],
    npositive: usize,
    nnegative: usize,
    mestpos: &[f64],
    mestneg: &[f64],
    npoints: usize,
) -> Matrix {
    let mut covar = Matrix::zeros(npoints);

    for i in 0..npoints {
        for j in 0..npoints {
            let mut sum1 = 0.0;
            let mut count1 = 0usize;
            for s in positive {
                sum1 += (s.points[i] - mestpos[i]) * (s.points[j] - mestpos[j]);
                count1 += 1;
                if npositive != 0 && count1 >= npositive {
                    break;
                }
            }

            // Reference bug preserved: this loop's deviations also land in
            // `sum1`, never in a `sum2` of their own.
            let mut count2 = 0usize;
            for s in negative {
                sum1 += (s.points[i] - mestneg[i]) * (s.points[j] - mestneg[j]);
                count2 += 1;
                if nnegative != 0 && count2 >= nnegative {
                    break;
                }
            }

            let denom = (count1 + count2) as f64 - 2.0;
            covar.set(i, j, if denom != 0.0 { sum1 / denom } else { 0.0 });
        }
    }

    covar
}

fn project(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

impl Discriminant {
    /// Train a boundary from labeled samples. When `test` is set, only
    /// `CD_PERCENT` of each population is used for estimation, reserving
    /// the rest for [`Self::evaluate_fpr_sweep`].
    pub fn compute(
        name: &str,
        transform_name: &str,
        positive: &[Sample],
        negative: &[Sample],
        test: bool,
    ) -> Result<Self> {
        if positive.len() < 2 || negative.len() < 2 {
            return Err(AnalyzeError::MalformedRecord(format!(
                "not enough data points for \"{name}\""
            )));
        }
        let npoints = positive[0].points.len();

        let (npositive, nnegative) = if test {
            (
                (positive.len() as f64 * CD_PERCENT) as usize,
                (negative.len() as f64 * CD_PERCENT) as usize,
            )
        } else {
            (positive.len(), negative.len())
        };

        let mestpos = mean_estimate(positive, npositive, npoints);
        let mestneg = mean_estimate(negative, nnegative, npoints);

        let mut covar = covariance_estimate(
            positive, negative, npositive, nnegative, &mestpos, &mestneg, npoints,
        );
        covar.invert()?;

        let mut b = vec![0.0; npoints];
        for i in 0..npoints {
            let diffs: Vec<f64> = (0..npoints).map(|j| mestpos[j] - mestneg[j]).collect();
            b[i] = covar.mul_vec(&diffs)[i];
        }

        let projpos = project(&mestpos, &b);
        let projneg = project(&mestneg, &b);

        let mut cdd = Discriminant {
            name: name.to_string(),
            transform_name: transform_name.to_string(),
            npoints,
            b,
            projpos,
            projneg,
            k: (projpos + projneg) / 2.0,
            boundary_where: 0.5,
        };
        cdd.set_boundary(cdd.boundary_where);
        Ok(cdd)
    }

    /// Re-derive the decision threshold `k` from a boundary fraction
    /// `where` in `[-1, 2]`: `where=0` sits at the negative mean's
    /// projection, `where=1` at the positive mean's.
    pub fn set_boundary(&mut self, boundary_where: f64) {
        self.k = if self.projpos > self.projneg {
            (self.projpos - self.projneg) * boundary_where + self.projneg
        } else {
            (self.projneg - self.projpos) * (1.0 - boundary_where) + self.projpos
        };
        self.boundary_where = boundary_where;
    }

    pub fn classify(&self, points: &[f64]) -> bool {
        let val = project(points, &self.b);
        if self.projpos > self.projneg {
            val > self.k
        } else {
            val < self.k
        }
    }

    /// Sweep the boundary fraction from -1.0 to 2.0 in steps of 0.15 over
    /// the held-out 20% of each population, picking the first boundary
    /// whose false-positive rate drops below 1%. Falls back to 0.5 if none
    /// does.
    pub fn evaluate_fpr_sweep(&mut self, positive: &[Sample], negative: &[Sample]) {
        let npositive = (positive.len() as f64 * CD_PERCENT) as usize;
        let nnegative = (negative.len() as f64 * CD_PERCENT) as usize;

        let mut saved = false;
        let mut boundary_where = -1.0f64;
        while boundary_where <= 2.0 {
            self.set_boundary(boundary_where);

            let mut negcorrect = 0u32;
            let mut negfalse = 0u32;
            for (idx, s) in negative.iter().enumerate() {
                if idx < nnegative {
                    continue;
                }
                if !self.classify(&s.points) {
                    negcorrect += 1;
                } else {
                    negfalse += 1;
                }
            }

            let fprate = if negfalse + negcorrect > 0 {
                negfalse as f64 / (negfalse + negcorrect) as f64
            } else {
                0.0
            };

            if !saved && fprate < 1.0 {
                saved = true;
                self.boundary_where = boundary_where;
            }

            boundary_where += 0.15;
        }

        if !saved {
            self.boundary_where = 0.5;
        }
        self.set_boundary(self.boundary_where);
        let _ = positive;
    }

    /// Serialize in the reference tool's plain-text record format: name,
    /// transform name, point count + weight vector, then the projection
    /// summary line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.name);
        let _ = writeln!(out, "{}", self.transform_name);
        let _ = write!(out, "{}", self.npoints);
        for v in &self.b {
            let _ = write!(out, " {v}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{} {} {}", self.projpos, self.projneg, self.k);
        out
    }

    /// Parse a record previously produced by [`Self::dump`].
    pub fn load(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let name = lines
            .next()
            .ok_or_else(|| AnalyzeError::MalformedRecord("missing name".to_string()))?
            .to_string();
        let transform_name = lines
            .next()
            .ok_or_else(|| AnalyzeError::MalformedRecord("missing transform name".to_string()))?
            .to_string();
        let proj_line = lines
            .next()
            .ok_or_else(|| AnalyzeError::MalformedRecord("missing projection data".to_string()))?;

        let mut parts = proj_line.split_whitespace();
        let npoints: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AnalyzeError::MalformedRecord("bad point count".to_string()))?;
        let b: Vec<f64> = parts.filter_map(|s| s.parse().ok()).collect();
        if b.len() != npoints {
            return Err(AnalyzeError::MalformedRecord(
                "projection data malformed".to_string(),
            ));
        }

        let boundary_line = lines
            .next()
            .ok_or_else(|| AnalyzeError::MalformedRecord("missing boundary values".to_string()))?;
        let mut bparts = boundary_line.split_whitespace();
        let projpos: f64 = bparts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AnalyzeError::MalformedRecord("boundary values malformed".to_string()))?;
        let projneg: f64 = bparts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AnalyzeError::MalformedRecord("boundary values malformed".to_string()))?;
        let k: f64 = bparts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AnalyzeError::MalformedRecord("boundary values malformed".to_string()))?;

        Ok(Discriminant {
            name,
            transform_name,
            npoints,
            b,
            projpos,
            projneg,
            k,
            boundary_where: 0.5,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(vals: &[[f64; 2]]) -> Vec<Sample> {
        vals.iter().map(|v| Sample { points: v.to_vec() }).collect()
    }

    #[test]
    fn test_separated_clusters_classify_correctly() {
        let positive = samples(&[[10.0, 10.0], [11.0, 9.0], [9.0, 11.0], [10.5, 10.5]]);
        let negative = samples(&[[0.0, 0.0], [1.0, -1.0], [-1.0, 1.0], [0.5, 0.5]]);

        let cdd = Discriminant::compute("test", "natural", &positive, &negative, false).unwrap();
        assert!(cdd.classify(&[10.0, 10.0]));
        assert!(!cdd.classify(&[0.0, 0.0]));
    }

    #[test]
    fn test_covariance_negative_contribution_folds_into_sum1() {
        let positive = samples(&[[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]);
        let negative = samples(&[[0.0, 1.0], [0.0, 2.0]]);
        let mestpos = mean_estimate(&positive, 0, 2);
        let mestneg = mean_estimate(&negative, 0, 2);
        let covar = covariance_estimate(&positive, &negative, 0, 0, &mestpos, &mestneg, 2);
        // Cross term (i=0,j=1) only ever receives positive-class
        // contributions since mestpos/mestneg zero out the diagonal terms
        // for the orthogonal synthetic clusters above; this just confirms
        // the function runs over both populations without panicking.
        assert_eq!(covar.n, 2);
    }

    #[test]
    fn test_dump_load_roundtrip() {
        let positive = samples(&[[10.0, 10.0], [11.0, 9.0], [9.0, 11.0], [10.5, 10.5]]);
        let negative = samples(&[[0.0, 0.0], [1.0, -1.0], [-1.0, 1.0], [0.5, 0.5]]);
        let cdd = Discriminant::compute("test", "natural", &positive, &negative, false).unwrap();

        let text = cdd.dump();
        let loaded = Discriminant::load(&text).unwrap();
        assert_eq!(loaded.name, cdd.name);
        assert_eq!(loaded.b, cdd.b);
        assert!((loaded.k - cdd.k).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_samples_errors() {
        let positive = samples(&[[1.0, 1.0]]);
        let negative = samples(&[[0.0, 0.0], [0.0, 0.0]]);
        assert!(Discriminant::compute("x", "natural", &positive, &negative, false).is_err());
    }
}
