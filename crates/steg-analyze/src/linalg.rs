//! Small dense linear algebra for the discriminant classifier (C6).

use crate::error::{AnalyzeError, Result};

/// A square matrix stored row-major.
#[derive(Debug, Clone)]
pub struct Matrix {
    pub n: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Matrix { n, data: vec![0.0; n * n] }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        m
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.n + c]
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, v: f64) {
        self.data[r * self.n + c] = v;
    }

    #[inline]
    fn add(&mut self, r: usize, c: usize, v: f64) {
        self.data[r * self.n + c] += v;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for c in 0..self.n {
            self.data.swap(a * self.n + c, b * self.n + c);
        }
    }

    fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for r in 0..self.n {
            self.data.swap(r * self.n + a, r * self.n + b);
        }
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|r| (0..self.n).map(|c| self.get(r, c) * v[c]).sum())
            .collect()
    }

    /// In-place Gauss-Jordan inversion with full pivoting. Errors on a
    /// singular (or near-singular) matrix rather than returning garbage.
    pub fn invert(&mut self) -> Result<()> {
        let n = self.n;
        let mut indxc = vec![0usize; n];
        let mut indxr = vec![0usize; n];
        let mut ipiv = vec![0usize; n];

        for i in 0..n {
            let mut big = 0.0f64;
            let mut irow = 0usize;
            let mut icol = 0usize;

            for j in 0..n {
                if ipiv[j] != 1 {
                    for k in 0..n {
                        if ipiv[k] == 0 && self.get(j, k).abs() >= big {
                            big = self.get(j, k).abs();
                            irow = j;
                            icol = k;
                        }
                    }
                }
            }
            ipiv[icol] += 1;

            if irow != icol {
                self.swap_rows(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;

            let pivot = self.get(icol, icol);
            if pivot == 0.0 {
                return Err(AnalyzeError::SingularMatrix);
            }
            let pivinv = 1.0 / pivot;
            self.set(icol, icol, 1.0);
            for c in 0..n {
                let v = self.get(icol, c) * pivinv;
                self.set(icol, c, v);
            }

            for row in 0..n {
                if row == icol {
                    continue;
                }
                let factor = self.get(row, icol);
                if factor == 0.0 {
                    continue;
                }
                self.set(row, icol, 0.0);
                for c in 0..n {
                    let delta = -self.get(icol, c) * factor;
                    self.add(row, c, delta);
                }
            }
        }

        for i in (0..n).rev() {
            if indxr[i] != indxc[i] {
                self.swap_cols(indxr[i], indxc[i]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_inverts_to_itself() {
        let mut m = Matrix::identity(3);
        m.invert().unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let expect = if r == c { 1.0 } else { 0.0 };
                assert!((m.get(r, c) - expect).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_invert_2x2() {
        let mut m = Matrix::zeros(2);
        m.set(0, 0, 4.0);
        m.set(0, 1, 7.0);
        m.set(1, 0, 2.0);
        m.set(1, 1, 6.0);
        m.invert().unwrap();
        // inverse of [[4,7],[2,6]] is 1/10 * [[6,-7],[-2,4]]
        assert!((m.get(0, 0) - 0.6).abs() < 1e-9);
        assert!((m.get(0, 1) - (-0.7)).abs() < 1e-9);
        assert!((m.get(1, 0) - (-0.2)).abs() < 1e-9);
        assert!((m.get(1, 1) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_singular_matrix_errors() {
        let mut m = Matrix::zeros(2);
        m.set(0, 0, 1.0);
        m.set(0, 1, 2.0);
        m.set(1, 0, 2.0);
        m.set(1, 1, 4.0);
        assert!(matches!(m.invert(), Err(AnalyzeError::SingularMatrix)));
    }
}
