use crate::error::MatrixError;
use crate::matrix::DenseMatrix;
use crate::tolerance::Tolerances;
use crate::traits::Element;
use crate::vector::Vector3;

impl<T: Element> DenseMatrix<T> {
    fn overlap_apply<F>(&mut self, other: &Self, f: F)
    where
        F: Fn(T, T) -> T,
    {
        let rows = self.rows().min(other.rows());
        let cols = self.cols().min(other.cols());
        for i in 0..rows {
            let src = &other.row(i)[..cols];
            for (dst, &v) in self.row_mut(i)[..cols].iter_mut().zip(src) {
                *dst = f(*dst, v);
            }
        }
    }

    /// Elementwise `self += other` over the overlapping block.
    ///
    /// Only the top-left `min(rows) x min(cols)` block is updated.
    /// The shape of `self` never changes and mismatched shapes are
    /// not an error.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let mut a = DenseMatrix::<f64>::new(3, 3, true);
    /// let b = DenseMatrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
    /// a.add_assign_truncating(&b);
    /// assert_eq!(a.row(0), &[2.0, 1.0, 0.0]);
    /// assert_eq!(a.row(2), &[0.0, 0.0, 1.0]);
    /// ```
    pub fn add_assign_truncating(&mut self, other: &Self) {
        self.overlap_apply(other, |a, b| a + b);
    }

    /// Elementwise `self -= other` over the overlapping block.
    ///
    /// Same shape rules as [`DenseMatrix::add_assign_truncating`].
    pub fn sub_assign_truncating(&mut self, other: &Self) {
        self.overlap_apply(other, |a, b| a - b);
    }

    /// Multiply every element by `value`.
    pub fn scale(&mut self, value: T) {
        self.as_mut_slice().iter_mut().for_each(|v| *v = *v * value);
    }

    /// Divide every element by `value`.
    ///
    /// There is no check for zero: floating point types give
    /// infinities or NaN, integer types panic.
    pub fn divide(&mut self, value: T) {
        self.as_mut_slice().iter_mut().for_each(|v| *v = *v / value);
    }

    /// The matrix product `self * other`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] carrying
    /// `(self.cols(), other.rows())` if they differ.
    pub fn matmul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.cols() != other.rows() {
            return Err(MatrixError::mismatch("matmul", self.cols(), other.rows()));
        }
        let mut rv = Self::new(self.rows(), other.cols(), false);
        for i in 0..self.rows() {
            for (k, &a) in self.row(i).iter().enumerate() {
                let src = other.row(k);
                for (dst, &b) in rv.row_mut(i).iter_mut().zip(src) {
                    *dst = *dst + a * b;
                }
            }
        }
        Ok(rv)
    }

    /// In-place `self = self * other`.
    ///
    /// The product is formed in a temporary, so `self` is
    /// unchanged on error.
    pub fn matmul_assign(&mut self, other: &Self) -> Result<(), MatrixError> {
        *self = self.matmul(other)?;
        Ok(())
    }

    /// Matrix times column vector.
    ///
    /// Entries of `vec` beyond `cols()` are ignored.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] if `vec` is shorter than `cols()`.
    pub fn mul_vector(&self, vec: &[T]) -> Result<Vec<T>, MatrixError> {
        if vec.len() < self.cols() {
            return Err(MatrixError::mismatch("mul_vector", self.cols(), vec.len()));
        }
        Ok((0..self.rows())
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(vec)
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            })
            .collect())
    }

    /// As [`DenseMatrix::mul_vector`], writing into `out`.
    ///
    /// `out` is resized to `rows()`.
    pub fn multiply_point(&self, vec: &[T], out: &mut Vec<T>) -> Result<(), MatrixError> {
        let rv = self.mul_vector(vec)?;
        out.clear();
        out.extend(rv);
        Ok(())
    }

    /// Row vector times matrix.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] if `vec` is shorter than `rows()`.
    pub fn pre_multiply_by_vector(&self, vec: &[T]) -> Result<Vec<T>, MatrixError> {
        if vec.len() < self.rows() {
            return Err(MatrixError::mismatch(
                "pre_multiply_by_vector",
                self.rows(),
                vec.len(),
            ));
        }
        let mut rv = vec![T::zero(); self.cols()];
        for (i, &v) in vec.iter().take(self.rows()).enumerate() {
            for (dst, &a) in rv.iter_mut().zip(self.row(i)) {
                *dst = *dst + v * a;
            }
        }
        Ok(rv)
    }

    /// Matrix times a [`Vector3`].
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `cols() == 3`
    /// and `rows() <= 3`.
    /// Missing rows give zero components.
    pub fn mul_v3(&self, v: Vector3) -> Result<Vector3, MatrixError> {
        if self.cols() != 3 {
            return Err(MatrixError::mismatch("mul_v3", self.cols(), 3));
        }
        if self.rows() > 3 {
            return Err(MatrixError::mismatch("mul_v3", self.rows(), 3));
        }
        let mut rv = Vector3::default();
        for i in 0..self.rows() {
            rv[i] = self
                .row(i)
                .iter()
                .enumerate()
                .map(|(j, &a)| a.as_f64() * v[j])
                .sum();
        }
        Ok(rv)
    }

    /// `diag(dvec) * self`: row `i` is scaled by `dvec[i]`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `dvec.len() == rows()`.
    pub fn forward_diagonal_product(&self, dvec: &[T]) -> Result<Self, MatrixError> {
        if dvec.len() != self.rows() {
            return Err(MatrixError::mismatch(
                "forward_diagonal_product",
                self.rows(),
                dvec.len(),
            ));
        }
        let mut rv = self.clone();
        for (i, &d) in dvec.iter().enumerate() {
            rv.row_mut(i).iter_mut().for_each(|v| *v = d * *v);
        }
        Ok(rv)
    }

    /// `self * diag(dvec)`: column `j` is scaled by `dvec[j]`.
    ///
    /// # Errors
    ///
    /// [`MatrixError::DimensionMismatch`] unless `dvec.len() == cols()`.
    pub fn backward_diagonal_product(&self, dvec: &[T]) -> Result<Self, MatrixError> {
        if dvec.len() != self.cols() {
            return Err(MatrixError::mismatch(
                "backward_diagonal_product",
                self.cols(),
                dvec.len(),
            ));
        }
        let mut rv = self.clone();
        for i in 0..rv.rows() {
            for (v, &d) in rv.row_mut(i).iter_mut().zip(dvec) {
                *v = *v * d;
            }
        }
        Ok(rv)
    }

    /// Sum of the squares of all elements.
    pub fn sum_of_squares(&self) -> T {
        self.as_slice().iter().fold(T::zero(), |acc, &v| acc + v * v)
    }

    /// Fuzzy comparison.
    ///
    /// The shapes must match.
    /// With `maxdiff` the largest absolute elementwise difference and
    /// `maxs` the largest absolute element of `self`, the matrices are
    /// equal if `maxdiff <= tolerances.equality`, or if `maxs > 1` and
    /// `maxdiff / maxs <= tolerances.equality`.
    ///
    /// ```
    /// use densematrix::{DenseMatrix, Tolerances};
    ///
    /// let a = DenseMatrix::from_rows(&[[1000.0, 0.0]]).unwrap();
    /// let b = DenseMatrix::from_rows(&[[1000.001, 0.0]]).unwrap();
    /// assert!(a != b);
    /// let loose = Tolerances { equality: 1e-5, ..Default::default() };
    /// assert!(a.equals_with(&b, &loose));
    /// ```
    pub fn equals_with(&self, other: &Self, tolerances: &Tolerances) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.shape() != other.shape() {
            return false;
        }
        let mut max_diff = 0.0_f64;
        let mut max_element = 0.0_f64;
        for (&a, &b) in self.as_slice().iter().zip(other.as_slice()) {
            max_diff = max_diff.max((a.as_f64() - b.as_f64()).abs());
            max_element = max_element.max(a.as_f64().abs());
        }
        if max_diff <= tolerances.equality {
            return true;
        }
        max_element > 1.0 && max_diff / max_element <= tolerances.equality
    }
}

impl<T: Element> PartialEq for DenseMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals_with(other, &Tolerances::default())
    }
}

impl_elementwise_assign!(AddAssign, add_assign, add_assign_truncating);
impl_elementwise_assign!(SubAssign, sub_assign, sub_assign_truncating);
impl_elementwise_binary!(Add, add, add_assign_truncating);
impl_elementwise_binary!(Sub, sub, sub_assign_truncating);

impl<T: Element> std::ops::MulAssign<T> for DenseMatrix<T> {
    fn mul_assign(&mut self, value: T) {
        self.scale(value);
    }
}

impl<T: Element> std::ops::Mul<T> for DenseMatrix<T> {
    type Output = Self;
    fn mul(mut self, value: T) -> Self::Output {
        self.scale(value);
        self
    }
}

impl<T: Element> std::ops::Mul<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;
    fn mul(self, value: T) -> Self::Output {
        let mut rv = self.clone();
        rv.scale(value);
        rv
    }
}

impl<T: Element> std::ops::DivAssign<T> for DenseMatrix<T> {
    fn div_assign(&mut self, value: T) {
        self.divide(value);
    }
}
