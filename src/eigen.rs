//! Symmetric eigen-decomposition by cyclic Jacobi rotations,
//! plus helpers for orthogonal and rotation matrices.

use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::tolerance::Tolerances;
use crate::traits::Element;

// `|large| + small == |large|` in single precision.
// Decides when an off-diagonal element is negligible next to a
// diagonal element or a diagonal gap.
#[inline]
fn negligible(large: f64, small: f64) -> bool {
    ((large.abs() + small) as f32) == (large.abs() as f32)
}

impl<T: Element> DenseMatrix<T> {
    /// Apply one Jacobi rotation to the entries at `(i, j)` and `(k, m)`.
    ///
    /// With `g` and `h` the values before the call:
    ///
    /// * `(i, j)` becomes `g - s * (h + g * tau)`
    /// * `(k, m)` becomes `h + s * (g - h * tau)`
    ///
    /// # Panics
    ///
    /// If either position is outside the matrix buffer.
    pub fn rotate(&mut self, tau: f64, s: f64, i: usize, j: usize, k: usize, m: usize) {
        let g = self[(i, j)].as_f64();
        let h = self[(k, m)].as_f64();
        self[(i, j)] = T::from_f64(g - s * (h + g * tau));
        self[(k, m)] = T::from_f64(h + s * (g - h * tau));
    }

    /// Eigen-decomposition of a symmetric matrix,
    /// using [`Tolerances::default`].
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let m: DenseMatrix<f64> = DenseMatrix::from_rows(&[[2.0, 1.0], [1.0, 2.0]]).unwrap();
    /// let (mut vectors, mut values) = m.diagonalise().unwrap();
    /// vectors.sort_eigen(&mut values).unwrap();
    /// assert!((values[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!((values[(1, 1)] - 3.0).abs() < 1e-12);
    /// ```
    pub fn diagonalise(&self) -> Result<(Self, Self), MatrixError> {
        self.diagonalise_with(&Tolerances::default())
    }

    /// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
    ///
    /// Returns `(vectors, values)`.
    /// `values` is diagonal and column `i` of `vectors` is the unit
    /// eigenvector for `values[(i, i)]`.
    /// The eigenvalues are not sorted; see [`DenseMatrix::sort_eigen`].
    ///
    /// During the first `tolerances.relaxed_sweeps` sweeps only
    /// elements larger than `0.2 * S / n²` are rotated, where `S` is the
    /// sum of the absolute off-diagonal elements.
    /// The iteration stops once `S` is exactly zero.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::DimensionMismatch`] unless the matrix is square.
    /// * [`MatrixError::NotSymmetric`] if `|a[i][j] - a[j][i]|` exceeds
    ///   `tolerances.symmetry`.
    /// * [`MatrixError::NotConverged`] if `S` is still non-zero after
    ///   `tolerances.max_sweeps` sweeps.
    pub fn diagonalise_with(&self, tolerances: &Tolerances) -> Result<(Self, Self), MatrixError> {
        self.require_square("diagonalise")?;
        let n = self.rows();
        for i in 0..n {
            for j in (i + 1)..n {
                if (self[(i, j)].as_f64() - self[(j, i)].as_f64()).abs() > tolerances.symmetry {
                    return Err(MatrixError::NotSymmetric { row: i, col: j });
                }
            }
        }

        let mut a = self.clone();
        let mut vectors = Self::new(n, n, true);
        let mut values = Self::new(n, n, false);

        let mut diag = self.diagonal().iter().map(|v| v.as_f64()).collect::<Vec<_>>();
        let mut accumulated = diag.clone();
        let mut correction = vec![0.0; n];
        let mut rotations = 0_usize;

        for sweep in 0..tolerances.max_sweeps {
            let mut off_diagonal = 0.0;
            for ip in 0..n {
                for iq in (ip + 1)..n {
                    off_diagonal += a[(ip, iq)].as_f64().abs();
                }
            }
            if off_diagonal == 0.0 {
                for (i, &d) in diag.iter().enumerate() {
                    values[(i, i)] = T::from_f64(d);
                }
                tracing::debug!(sweeps = sweep, rotations, "jacobi rotations converged");
                return Ok((vectors, values));
            }

            let threshold = if sweep < tolerances.relaxed_sweeps {
                0.2 * off_diagonal / ((n * n) as f64)
            } else {
                0.0
            };

            for ip in 0..n {
                for iq in (ip + 1)..n {
                    let apq = a[(ip, iq)].as_f64();
                    let g = 100.0 * apq.abs();
                    if sweep > tolerances.relaxed_sweeps
                        && negligible(diag[ip], g)
                        && negligible(diag[iq], g)
                    {
                        a[(ip, iq)] = T::zero();
                    } else if apq.abs() > threshold {
                        let h = diag[iq] - diag[ip];
                        let t = if negligible(h, g) {
                            apq / h
                        } else {
                            let theta = 0.5 * h / apq;
                            let t = 1.0 / (theta.abs() + (1.0 + theta * theta).sqrt());
                            if theta < 0.0 {
                                -t
                            } else {
                                t
                            }
                        };
                        let c = 1.0 / (1.0 + t * t).sqrt();
                        let s = t * c;
                        let tau = s / (1.0 + c);
                        let h = t * apq;
                        correction[ip] -= h;
                        correction[iq] += h;
                        diag[ip] -= h;
                        diag[iq] += h;
                        a[(ip, iq)] = T::zero();
                        for j in 0..ip {
                            a.rotate(tau, s, j, ip, j, iq);
                        }
                        for j in (ip + 1)..iq {
                            a.rotate(tau, s, ip, j, j, iq);
                        }
                        for j in (iq + 1)..n {
                            a.rotate(tau, s, ip, j, iq, j);
                        }
                        for j in 0..n {
                            vectors.rotate(tau, s, j, ip, j, iq);
                        }
                        rotations += 1;
                    }
                }
            }
            for j in 0..n {
                accumulated[j] += correction[j];
                diag[j] = accumulated[j];
                correction[j] = 0.0;
            }
        }
        tracing::warn!(
            sweeps = tolerances.max_sweeps,
            rotations,
            "jacobi rotations did not converge"
        );
        Err(MatrixError::NotConverged {
            sweeps: tolerances.max_sweeps,
        })
    }

    /// Reorder eigenvectors (the columns of `self`) and the diagonal of
    /// `values` into ascending eigenvalue order.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `self` and `values`
    /// are square and of the same size.
    pub fn sort_eigen(&mut self, values: &mut Self) -> Result<(), MatrixError> {
        self.require_square("sort_eigen")?;
        values.require_square("sort_eigen")?;
        if values.rows() != self.rows() {
            return Err(MatrixError::mismatch(
                "sort_eigen",
                self.rows(),
                values.rows(),
            ));
        }
        let eigenvalues = values.diagonal();
        let mut index = (0..eigenvalues.len()).collect::<Vec<_>>();
        index.sort_by(|&a, &b| {
            eigenvalues[a]
                .partial_cmp(&eigenvalues[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let vectors = self.clone();
        for (col, &from) in index.iter().enumerate() {
            for row in 0..self.rows() {
                self[(row, col)] = vectors[(row, from)];
            }
            values[(col, col)] = eigenvalues[from];
        }
        Ok(())
    }

    /// Replace each pair `a[i][j]`, `a[j][i]` by its mean.
    ///
    /// Only the leading square block is touched.
    pub fn average_symmetric(&mut self) {
        let two = T::one() + T::one();
        let n = self.rows().min(self.cols());
        for i in 0..n {
            for j in (i + 1)..n {
                let mean = (self[(i, j)] + self[(j, i)]) / two;
                self[(i, j)] = mean;
                self[(j, i)] = mean;
            }
        }
    }

    /// Scale every column to unit length.
    ///
    /// Columns of zeros are left unchanged.
    pub fn normalize_columns(&mut self) {
        for j in 0..self.cols() {
            let norm = self
                .column(j)
                .iter()
                .map(|v| v.as_f64() * v.as_f64())
                .sum::<f64>()
                .sqrt();
            if norm == 0.0 {
                continue;
            }
            for i in 0..self.rows() {
                self[(i, j)] = T::from_f64(self[(i, j)].as_f64() / norm);
            }
        }
    }

    fn column_dot(&self, a: usize, b: usize) -> f64 {
        (0..self.rows())
            .map(|k| self[(k, a)].as_f64() * self[(k, b)].as_f64())
            .sum()
    }

    /// `true` if the matrix is square and every pair of distinct
    /// columns has a dot product no larger than `tolerance` in magnitude.
    ///
    /// The columns need not have unit length.
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.cols();
        (0..n).all(|i| ((i + 1)..n).all(|j| self.column_dot(i, j).abs() <= tolerance))
    }

    /// `true` if `MᵀM` is the identity to within `tolerance`
    /// and the determinant is positive.
    pub fn is_rotation(&self, tolerance: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.cols();
        let orthonormal = (0..n).all(|i| {
            (i..n).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (self.column_dot(i, j) - expected).abs() <= tolerance
            })
        });
        orthonormal
            && self
                .determinant()
                .map(|d| d.as_f64() > 0.0)
                .unwrap_or(false)
    }

    /// Turn a matrix with orthogonal columns into a rotation.
    ///
    /// Every column is scaled to unit length and the original lengths
    /// are returned.
    /// If the result would be a reflection, the first column is negated
    /// and so is the first returned length.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let mut m = DenseMatrix::from_rows(&[[0.0, -3.0], [2.0, 0.0]]).unwrap();
    /// let scales = m.to_rotation().unwrap();
    /// assert_eq!(scales, vec![2.0, 3.0]);
    /// assert!(m.is_rotation(1e-12));
    /// ```
    ///
    /// # Errors
    ///
    /// * [`MatrixError::DimensionMismatch`] unless the matrix is square.
    /// * [`MatrixError::Singular`] if the determinant or any column
    ///   length is smaller than `1e-10`.
    /// * [`MatrixError::NotOrthogonal`] if the columns are not orthogonal.
    pub fn to_rotation(&mut self) -> Result<Vec<T>, MatrixError> {
        const SMALL: f64 = 1e-10;
        self.require_square("to_rotation")?;
        if self.determinant()?.as_f64().abs() < SMALL {
            return Err(MatrixError::Singular);
        }
        if !self.is_orthogonal(SMALL) {
            return Err(MatrixError::NotOrthogonal);
        }
        let n = self.cols();
        let mut scales = Vec::with_capacity(n);
        for j in 0..n {
            let norm = self.column_dot(j, j).sqrt();
            if norm < SMALL {
                return Err(MatrixError::Singular);
            }
            scales.push(norm);
        }
        for (j, &norm) in scales.iter().enumerate() {
            for i in 0..self.rows() {
                self[(i, j)] = T::from_f64(self[(i, j)].as_f64() / norm);
            }
        }
        let mut scales = scales.into_iter().map(T::from_f64).collect::<Vec<_>>();
        if self.determinant()?.as_f64() < 0.0 {
            scales[0] = -scales[0];
            for i in 0..self.rows() {
                self[(i, 0)] = -self[(i, 0)];
            }
        }
        Ok(scales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> DenseMatrix<f64> {
        DenseMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_rotate_uses_previous_values() {
        let mut a = m(&[&[1.0, 2.0]]);
        a.rotate(0.5, 0.25, 0, 0, 0, 1);
        // g = 1, h = 2
        assert_eq!(a[(0, 0)], 1.0 - 0.25 * (2.0 + 0.5));
        assert_eq!(a[(0, 1)], 2.0 + 0.25 * (1.0 - 1.0));
    }

    #[test]
    fn test_two_by_two_eigenvectors() {
        let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
        let (mut vectors, mut values) = a.diagonalise().unwrap();
        vectors.sort_eigen(&mut values).unwrap();
        assert_eq!(values, m(&[&[1.0, 0.0], &[0.0, 3.0]]));
        let r = std::f64::consts::FRAC_1_SQRT_2;
        let v0 = vectors.column(0);
        let v1 = vectors.column(1);
        assert!((v0[0].abs() - r).abs() < 1e-12);
        assert!((v0[0] + v0[1]).abs() < 1e-12);
        assert!((v1[0].abs() - r).abs() < 1e-12);
        assert!((v1[0] - v1[1]).abs() < 1e-12);
    }

    #[test]
    fn test_negligible_ignores_sign() {
        assert!(negligible(-1.0, 1e-9));
        assert!(!negligible(-1.0, 2.0));
        assert!(!negligible(1.0, 2.0));
    }

    #[test]
    fn test_negative_diagonal_gap() {
        // h = a11 - a00 = -1 and g = 100 * a01 = 2
        let a = m(&[&[1.0, 0.02], &[0.02, 0.0]]);
        let (mut vectors, mut values) = a.diagonalise().unwrap();
        let rebuilt = vectors
            .matmul(&values)
            .unwrap()
            .matmul(&vectors.transpose())
            .unwrap();
        assert_eq!(rebuilt, a);

        vectors.sort_eigen(&mut values).unwrap();
        let root = (0.25_f64 + 0.02 * 0.02).sqrt();
        assert!((values[(0, 0)] - (0.5 - root)).abs() < 1e-12);
        assert!((values[(1, 1)] - (0.5 + root)).abs() < 1e-12);
        for j in 0..2 {
            let v = vectors.column(j);
            let av = a.mul_vector(&v).unwrap();
            for i in 0..2 {
                assert!((av[i] - values[(j, j)] * v[i]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_diagonal_input_converges_immediately() {
        let a = m(&[&[5.0, 0.0], &[0.0, -1.0]]);
        let (vectors, values) = a.diagonalise().unwrap();
        assert_eq!(vectors, DenseMatrix::new(2, 2, true));
        assert_eq!(values, a);
    }

    #[test]
    fn test_not_symmetric() {
        let a = m(&[&[1.0, 2.0], &[2.1, 1.0]]);
        assert!(matches!(
            a.diagonalise(),
            Err(MatrixError::NotSymmetric { row: 0, col: 1 })
        ));
        let b = m(&[&[1.0, 2.0], &[2.0 + 1e-7, 1.0]]);
        assert!(b.diagonalise().is_ok());
    }

    #[test]
    fn test_not_square() {
        let a = DenseMatrix::<f64>::new(2, 3, false);
        assert!(matches!(
            a.diagonalise(),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_sweep_budget() {
        let a = m(&[&[4.0, 1.0, 2.0], &[1.0, 3.0, 0.5], &[2.0, 0.5, 1.0]]);
        let t = Tolerances {
            max_sweeps: 1,
            relaxed_sweeps: 1,
            ..Default::default()
        };
        assert!(matches!(
            a.diagonalise_with(&t),
            Err(MatrixError::NotConverged { sweeps: 1 })
        ));
    }

    #[test]
    fn test_sort_eigen_shapes() {
        let mut v = DenseMatrix::<f64>::new(3, 3, true);
        let mut d = DenseMatrix::<f64>::new(2, 2, true);
        assert!(v.sort_eigen(&mut d).is_err());
    }

    #[test]
    fn test_sort_eigen_moves_columns() {
        let mut v = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]]);
        let mut d = m(&[&[3.0, 0.0, 0.0], &[0.0, -1.0, 0.0], &[0.0, 0.0, 2.0]]);
        v.sort_eigen(&mut d).unwrap();
        assert_eq!(d.diagonal(), vec![-1.0, 2.0, 3.0]);
        assert_eq!(v.row(0), &[2.0, 3.0, 1.0]);
        assert_eq!(v.row(2), &[8.0, 9.0, 7.0]);
    }

    #[test]
    fn test_average_symmetric() {
        let mut a = m(&[&[1.0, 2.0, 9.0], &[4.0, 1.0, 9.0]]);
        a.average_symmetric();
        assert_eq!(a, m(&[&[1.0, 3.0, 9.0], &[3.0, 1.0, 9.0]]));
    }

    #[test]
    fn test_normalize_columns() {
        let mut a = m(&[&[3.0, 0.0], &[4.0, 0.0]]);
        a.normalize_columns();
        assert_eq!(a, m(&[&[0.6, 0.0], &[0.8, 0.0]]));
    }

    #[test]
    fn test_orthogonal_and_rotation() {
        let scaled = m(&[&[2.0, 0.0], &[0.0, 3.0]]);
        assert!(scaled.is_orthogonal(1e-12));
        assert!(!scaled.is_rotation(1e-12));
        let reflection = m(&[&[0.0, 1.0], &[1.0, 0.0]]);
        assert!(reflection.is_orthogonal(1e-12));
        assert!(!reflection.is_rotation(1e-12));
        let skew = m(&[&[1.0, 1.0], &[0.0, 1.0]]);
        assert!(!skew.is_orthogonal(1e-12));
    }

    #[test]
    fn test_to_rotation_reflection() {
        let mut a = m(&[&[0.0, 2.0], &[2.0, 0.0]]);
        let scales = a.to_rotation().unwrap();
        assert_eq!(scales, vec![-2.0, 2.0]);
        assert_eq!(a, m(&[&[0.0, 1.0], &[-1.0, 0.0]]));
        assert!(a.is_rotation(1e-12));
    }

    #[test]
    fn test_to_rotation_errors() {
        let mut skew = m(&[&[1.0, 1.0], &[0.0, 1.0]]);
        assert!(matches!(skew.to_rotation(), Err(MatrixError::NotOrthogonal)));
        let mut singular = m(&[&[1.0, 0.0], &[0.0, 0.0]]);
        assert!(matches!(singular.to_rotation(), Err(MatrixError::Singular)));
    }
}
