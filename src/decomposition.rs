//! Elimination, LU decomposition and the characteristic polynomial.
//!
//! The kernels accumulate in [`f64`] and store results back into the
//! element type, so integer matrices see truncated intermediate values.

use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::tolerance::Tolerances;
use crate::traits::Element;

/// Row permutation and its parity produced by [`DenseMatrix::lubcmp`].
///
/// `permutation[j]` is the row that was exchanged with row `j`
/// while processing column `j`.
/// `parity` is `+1` for an even number of exchanges and `-1`
/// for an odd number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuPermutation {
    #[allow(missing_docs)]
    pub permutation: Vec<usize>,
    #[allow(missing_docs)]
    pub parity: i32,
}

impl<T: Element> DenseMatrix<T> {
    /// The determinant, using [`Tolerances::default`].
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let m: DenseMatrix<f64> = DenseMatrix::from_rows(&[[2.0, 3.0], [1.0, 4.0]]).unwrap();
    /// assert!((m.determinant().unwrap() - 5.0).abs() < 1e-12);
    /// ```
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless the matrix is square.
    pub fn determinant(&self) -> Result<T, MatrixError> {
        self.determinant_with(&Tolerances::default())
    }

    /// The determinant, computed by [`DenseMatrix::factor_with`] on a copy.
    ///
    /// The 0x0 matrix has determinant one.
    pub fn determinant_with(&self, tolerances: &Tolerances) -> Result<T, MatrixError> {
        self.require_square("determinant")?;
        match self.rows() {
            0 => Ok(T::one()),
            1 => Ok(self[(0, 0)]),
            _ => self.clone().factor_with(tolerances),
        }
    }

    /// Gaussian elimination with column pivoting, in place.
    ///
    /// Returns the determinant.
    /// See [`DenseMatrix::factor_with`].
    pub fn factor(&mut self) -> Result<T, MatrixError> {
        self.factor_with(&Tolerances::default())
    }

    /// Gaussian elimination with column pivoting, in place.
    ///
    /// For each row the largest remaining element of that row is
    /// swapped onto the diagonal, flipping the sign of the result.
    /// If that element is smaller than `tolerances.singular_pivot`
    /// the matrix is treated as singular and zero is returned
    /// with `self` partially reduced.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless the matrix is square
    /// and non-empty.
    pub fn factor_with(&mut self, tolerances: &Tolerances) -> Result<T, MatrixError> {
        self.require_square("factor")?;
        let n = self.rows();
        if n == 0 {
            return Err(MatrixError::mismatch("factor", 0, 0));
        }
        let mut det = 1.0_f64;
        for i in 0..n - 1 {
            let mut jmax = i;
            let mut pmax = self[(i, i)].as_f64().abs();
            for j in (i + 1)..n {
                let v = self[(i, j)].as_f64().abs();
                if v > pmax {
                    pmax = v;
                    jmax = j;
                }
            }
            if pmax < tolerances.singular_pivot {
                return Ok(T::zero());
            }
            if jmax != i {
                self.swap_cols(i, jmax);
                det = -det;
            }
            let pivot = self[(i, i)].as_f64();
            det *= pivot;
            for k in (i + 1)..n {
                let scale = self[(k, i)].as_f64() / pivot;
                self[(k, i)] = T::zero();
                for q in (i + 1)..n {
                    let update = T::from_f64(scale * self[(i, q)].as_f64());
                    self[(k, q)] = self[(k, q)] - update;
                }
            }
        }
        det *= self[(n - 1, n - 1)].as_f64();
        Ok(T::from_f64(det))
    }

    /// In-place LU decomposition, using [`Tolerances::default`].
    pub fn lubcmp(&mut self) -> Result<LuPermutation, MatrixError> {
        self.lubcmp_with(&Tolerances::default())
    }

    /// In-place LU decomposition with implicit row scaling and
    /// partial pivoting (Crout's method).
    ///
    /// On success `self` holds the unit lower triangle (below the
    /// diagonal) and the upper triangle of the decomposition of a
    /// row-permuted copy of the input.
    ///
    /// An exactly zero pivot is replaced by `tolerances.lu_zero_pivot`,
    /// so later solves give very large but finite values.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::DimensionMismatch`] unless the matrix is square.
    /// * [`MatrixError::Singular`] if a row is entirely zero.
    ///   `self` is not modified in that case.
    pub fn lubcmp_with(&mut self, tolerances: &Tolerances) -> Result<LuPermutation, MatrixError> {
        self.require_square("lubcmp")?;
        let n = self.rows();
        let mut scaling = vec![0.0_f64; n];
        for (i, s) in scaling.iter_mut().enumerate() {
            let big = self
                .row(i)
                .iter()
                .map(|v| v.as_f64().abs())
                .fold(0.0_f64, f64::max);
            if big == 0.0 {
                return Err(MatrixError::Singular);
            }
            *s = 1.0 / big;
        }

        let mut permutation = vec![0; n];
        let mut parity = 1;
        for j in 0..n {
            for i in 0..j {
                let mut sum = self[(i, j)].as_f64();
                for k in 0..i {
                    sum -= self[(i, k)].as_f64() * self[(k, j)].as_f64();
                }
                self[(i, j)] = T::from_f64(sum);
            }
            let mut big = 0.0;
            let mut imax = j;
            for i in j..n {
                let mut sum = self[(i, j)].as_f64();
                for k in 0..j {
                    sum -= self[(i, k)].as_f64() * self[(k, j)].as_f64();
                }
                self[(i, j)] = T::from_f64(sum);
                let dum = scaling[i] * sum.abs();
                if dum >= big {
                    big = dum;
                    imax = i;
                }
            }
            if j != imax {
                self.swap_rows(imax, j);
                parity = -parity;
                scaling[imax] = scaling[j];
            }
            permutation[j] = imax;

            if self[(j, j)] == T::zero() {
                tracing::trace!(column = j, "zero pivot replaced during LU decomposition");
                self[(j, j)] = T::from_f64(tolerances.lu_zero_pivot);
            }
            if j + 1 != n {
                let dum = 1.0 / self[(j, j)].as_f64();
                for i in (j + 1)..n {
                    self[(i, j)] = T::from_f64(self[(i, j)].as_f64() * dum);
                }
            }
        }
        Ok(LuPermutation {
            permutation,
            parity,
        })
    }

    /// Solve `A x = b` in place, where `self` and `lu` come from
    /// [`DenseMatrix::lubcmp`] applied to `A`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] if `b` or the permutation
    /// do not match the matrix size.
    pub fn lubksb(&self, lu: &LuPermutation, b: &mut [f64]) -> Result<(), MatrixError> {
        let n = self.rows();
        if lu.permutation.len() != n {
            return Err(MatrixError::mismatch("lubksb", n, lu.permutation.len()));
        }
        if b.len() != n {
            return Err(MatrixError::mismatch("lubksb", n, b.len()));
        }
        let mut first_nonzero = None;
        for i in 0..n {
            let ip = lu.permutation[i];
            let mut sum = b[ip];
            b[ip] = b[i];
            match first_nonzero {
                Some(ii) => {
                    for j in ii..i {
                        sum -= self[(i, j)].as_f64() * b[j];
                    }
                }
                None => {
                    if sum != 0.0 {
                        first_nonzero = Some(i);
                    }
                }
            }
            b[i] = sum;
        }
        for i in (0..n).rev() {
            let mut sum = b[i];
            for j in (i + 1)..n {
                sum -= self[(i, j)].as_f64() * b[j];
            }
            b[i] = sum / self[(i, i)].as_f64();
        }
        Ok(())
    }

    /// Invert in place, using [`Tolerances::default`].
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let mut m: DenseMatrix<f64> = DenseMatrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
    /// let det = m.invert().unwrap();
    /// assert!((det - 10.0).abs() < 1e-12);
    /// let expected = DenseMatrix::from_rows(&[[0.6, -0.7], [-0.2, 0.4]]).unwrap();
    /// assert_eq!(m, expected);
    /// ```
    pub fn invert(&mut self) -> Result<T, MatrixError> {
        self.invert_with(&Tolerances::default())
    }

    /// Invert in place by LU decomposition and returns the determinant.
    ///
    /// The 0x0 matrix is left alone and zero is returned.
    ///
    /// # Errors
    ///
    /// * [`MatrixError::DimensionMismatch`] unless the matrix is square.
    /// * [`MatrixError::Singular`] if a row is entirely zero.
    ///   `self` is not modified in that case.
    pub fn invert_with(&mut self, tolerances: &Tolerances) -> Result<T, MatrixError> {
        self.require_square("invert")?;
        let n = self.rows();
        if n == 0 {
            return Ok(T::zero());
        }
        if n == 1 {
            let det = self[(0, 0)];
            if det == T::zero() {
                return Err(MatrixError::Singular);
            }
            self[(0, 0)] = T::one() / det;
            return Ok(det);
        }

        let mut lu = self.clone();
        let perm = lu.lubcmp_with(tolerances)?;
        let det = lu
            .diagonal()
            .iter()
            .fold(f64::from(perm.parity), |acc, v| acc * v.as_f64());

        let mut column = vec![0.0; n];
        for j in 0..n {
            column.fill(0.0);
            column[j] = 1.0;
            lu.lubksb(&perm, &mut column)?;
            for (i, &v) in column.iter().enumerate() {
                self[(i, j)] = T::from_f64(v);
            }
        }
        Ok(T::from_f64(det))
    }

    /// Solve `A X = B` by Gauss-Jordan elimination with full pivoting.
    ///
    /// On success `b` holds `X` and `self` holds `A⁻¹`.
    ///
    /// Integer matrices cannot be eliminated without truncation,
    /// so for integer element types this does nothing and returns `Ok(())`.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let mut a = DenseMatrix::from_rows(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
    /// let mut b = DenseMatrix::new(2, 2, true);
    /// a.gauss_jordan(&mut b).unwrap();
    /// let expected = DenseMatrix::from_rows(&[[0.6, -0.2], [-0.2, 0.4]]).unwrap();
    /// assert_eq!(b, expected);
    /// ```
    ///
    /// # Errors
    ///
    /// * [`MatrixError::DimensionMismatch`] unless `self` is square and
    ///   `b` has as many rows as `self`.
    /// * [`MatrixError::Singular`] if a chosen pivot is exactly zero.
    ///   Both matrices are left partially reduced.
    pub fn gauss_jordan(&mut self, b: &mut Self) -> Result<(), MatrixError> {
        if T::IS_INTEGER {
            return Ok(());
        }
        self.require_square("gauss_jordan")?;
        let n = self.rows();
        if b.rows() != n {
            return Err(MatrixError::mismatch("gauss_jordan", n, b.rows()));
        }

        let mut pivoted = vec![false; n];
        let mut swaps = Vec::with_capacity(n);
        for _ in 0..n {
            let mut big = 0.0;
            let mut irow = 0;
            let mut icol = 0;
            for j in (0..n).filter(|&j| !pivoted[j]) {
                for k in (0..n).filter(|&k| !pivoted[k]) {
                    let v = self[(j, k)].as_f64().abs();
                    if v >= big {
                        big = v;
                        irow = j;
                        icol = k;
                    }
                }
            }
            pivoted[icol] = true;
            if irow != icol {
                self.swap_rows(irow, icol);
                b.swap_rows(irow, icol);
            }
            swaps.push((irow, icol));

            if self[(icol, icol)] == T::zero() {
                return Err(MatrixError::Singular);
            }
            let inverse_pivot = T::one() / self[(icol, icol)];
            self[(icol, icol)] = T::one();
            self.row_mut(icol)
                .iter_mut()
                .for_each(|v| *v = *v * inverse_pivot);
            b.row_mut(icol)
                .iter_mut()
                .for_each(|v| *v = *v * inverse_pivot);

            for ll in (0..n).filter(|&ll| ll != icol) {
                let factor = self[(ll, icol)];
                self[(ll, icol)] = T::zero();
                for l in 0..n {
                    self[(ll, l)] = self[(ll, l)] - self[(icol, l)] * factor;
                }
                for l in 0..b.cols() {
                    b[(ll, l)] = b[(ll, l)] - b[(icol, l)] * factor;
                }
            }
        }

        for &(irow, icol) in swaps.iter().rev() {
            if irow != icol {
                self.swap_cols(irow, icol);
            }
        }
        Ok(())
    }

    /// Characteristic polynomial by the Faddeev-LeVerrier recurrence.
    ///
    /// Returns `rows() + 1` coefficients.
    /// `coeffs[k]` multiplies `s^(n - k)` in `det(sI - A)`, so
    /// `coeffs[0]` is always one.
    ///
    /// `adjugate` is overwritten with the adjugate of `self`.
    /// When the matrix is invertible, `A⁻¹ = adj(A) / det(A)` with
    /// `det(A) = (-1)^n * coeffs[n]`.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let a = DenseMatrix::from_rows(&[[2, 1], [1, 3]]).unwrap();
    /// let mut adj = DenseMatrix::default();
    /// let coeffs = a.faddeev(&mut adj).unwrap();
    /// assert_eq!(coeffs, vec![1, -5, 5]);
    /// assert_eq!(adj.as_slice(), &[3, -1, -1, 2]);
    /// ```
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless the matrix is square.
    pub fn faddeev(&self, adjugate: &mut Self) -> Result<Vec<T>, MatrixError> {
        self.require_square("faddeev")?;
        let n = self.rows();
        let identity = Self::new(n, n, true);
        let mut coeffs = Vec::with_capacity(n + 1);
        coeffs.push(T::one());

        let mut m = Self::new(n, n, false);
        for k in 1..=n {
            let previous = coeffs[k - 1];
            let mut next = self.matmul(&m)?;
            next += &identity * previous;
            let c = -self.matmul(&next)?.trace() / T::from_f64(k as f64);
            coeffs.push(c);
            m = next;
        }
        if n % 2 == 0 {
            m.scale(-T::one());
        }
        *adjugate = m;
        Ok(coeffs)
    }
}
