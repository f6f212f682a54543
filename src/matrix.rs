use crate::error::MatrixError;
use crate::traits::Element;
use serde::{Deserialize, Serialize};

/// A dense `rows x cols` matrix stored in row-major order.
///
/// # Storage
///
/// A single owned buffer holds all elements:
/// `data[i * cols + j]` is the element in row `i`, column `j`.
/// A matrix with either dimension zero is stored as 0x0.
///
/// # Equality
///
/// `==` is not bit-exact.
/// See [`DenseMatrix::equals_with`].
///
/// # Examples
///
/// ```
/// use densematrix::DenseMatrix;
///
/// let mut m = DenseMatrix::<f64>::new(2, 3, true);
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m[(1, 1)], 1.0);
/// m[(0, 2)] = 4.0;
/// assert_eq!(m.row(0), &[1.0, 0.0, 4.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DenseMatrix<T: Element> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

impl<T: Element> DenseMatrix<T> {
    /// Create a zeroed `rows x cols` matrix.
    ///
    /// If `identity` is `true`, every element with equal row and
    /// column index is set to one.
    /// For rectangular shapes this fills the leading diagonal
    /// of the shorter dimension.
    ///
    /// If either dimension is zero the result is the 0x0 matrix.
    pub fn new(rows: usize, cols: usize, identity: bool) -> Self {
        let mut rv = Self::default();
        rv.resize(rows, cols);
        if identity {
            rv.identity();
        }
        rv
    }

    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidData`] if `data.len() != rows * cols`.
    pub fn from_data(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        if data.len() != rows * cols {
            return Err(MatrixError::InvalidData(format!(
                "expected {} elements for a {rows}x{cols} matrix, got {}",
                rows * cols,
                data.len()
            )));
        }
        if data.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            nx: rows,
            ny: cols,
            data,
        })
    }

    /// Create a square matrix from row-major data.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidData`] if the length of `data`
    /// is not a perfect square.
    pub fn from_square_data(data: Vec<T>) -> Result<Self, MatrixError> {
        let n = (data.len() as f64).sqrt().round() as usize;
        if n * n != data.len() {
            return Err(MatrixError::InvalidData(format!(
                "{} elements cannot form a square matrix",
                data.len()
            )));
        }
        Self::from_data(n, n, data)
    }

    /// Create a matrix from a slice of rows.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 0)], 4);
    /// ```
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidData`] if the rows differ in length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, MatrixError> {
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(MatrixError::InvalidData(format!(
                    "row {i} has {} columns, expected {ncols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::from_data(rows.len(), ncols, data)
    }

    /// The outer product `column * rowᵀ`.
    ///
    /// ```
    /// use densematrix::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_outer_product(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m[(1, 2)], 10.0);
    /// ```
    pub fn from_outer_product(column: &[T], row: &[T]) -> Self {
        let mut rv = Self::new(column.len(), row.len(), false);
        for (i, &c) in column.iter().enumerate() {
            for (j, &r) in row.iter().enumerate() {
                rv[(i, j)] = c * r;
            }
        }
        rv
    }

    /// Change the shape of the matrix.
    ///
    /// If the shape is unchanged, this does nothing.
    /// Otherwise the old contents are discarded and every element
    /// of the new buffer is zero.
    /// If either dimension is zero the result is the 0x0 matrix.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if rows == self.nx && cols == self.ny {
            return;
        }
        if rows == 0 || cols == 0 {
            self.nx = 0;
            self.ny = 0;
            self.data = Vec::new();
            return;
        }
        self.nx = rows;
        self.ny = cols;
        self.data = vec![T::zero(); rows * cols];
    }

    /// Set every element to zero.
    pub fn zero(&mut self) {
        self.data.fill(T::zero());
    }

    /// Overwrite with ones where row and column index match,
    /// zero elsewhere.
    pub fn identity(&mut self) {
        for i in 0..self.nx {
            for j in 0..self.ny {
                self.data[i * self.ny + j] = if i == j { T::one() } else { T::zero() };
            }
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.nx
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.ny
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// `true` if the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` if the matrix has as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.nx == self.ny
    }

    /// The elements, row-major.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The elements, row-major.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// A row-major copy of the elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Borrow row `i`.
    ///
    /// # Panics
    ///
    /// If `i >= rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.ny;
        &self.data[start..start + self.ny]
    }

    /// Mutably borrow row `i`.
    ///
    /// # Panics
    ///
    /// If `i >= rows()`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let start = i * self.ny;
        let end = start + self.ny;
        &mut self.data[start..end]
    }

    /// Copy of column `j`.
    ///
    /// # Panics
    ///
    /// If `j >= cols()`.
    pub fn column(&self, j: usize) -> Vec<T> {
        assert!(j < self.ny, "column {j} out of range");
        (0..self.nx).map(|i| self.data[i * self.ny + j]).collect()
    }

    pub(crate) fn require_square(&self, operation: &'static str) -> Result<(), MatrixError> {
        if self.is_square() {
            Ok(())
        } else {
            Err(MatrixError::mismatch(operation, self.nx, self.ny))
        }
    }

    /// A copy with row `row` and column `col` removed.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidIndex`] if either index is out of range.
    pub fn minor(&self, row: usize, col: usize) -> Result<Self, MatrixError> {
        if row >= self.nx {
            return Err(MatrixError::InvalidIndex {
                index: row,
                size: self.nx,
            });
        }
        if col >= self.ny {
            return Err(MatrixError::InvalidIndex {
                index: col,
                size: self.ny,
            });
        }
        let data = (0..self.nx)
            .filter(|&i| i != row)
            .flat_map(|i| {
                self.row(i)
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != col)
                    .map(|(_, &v)| v)
            })
            .collect::<Vec<_>>();
        Self::from_data(self.nx - 1, self.ny - 1, data)
    }

    /// Exchange rows `i` and `j`.
    ///
    /// Does nothing if `i == j` or either index is out of range.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j || i >= self.nx || j >= self.nx {
            return;
        }
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let ny = self.ny;
        let (head, tail) = self.data.split_at_mut(hi * ny);
        head[lo * ny..(lo + 1) * ny].swap_with_slice(&mut tail[..ny]);
    }

    /// Exchange columns `i` and `j`.
    ///
    /// Does nothing if `i == j` or either index is out of range.
    pub fn swap_cols(&mut self, i: usize, j: usize) {
        if i == j || i >= self.ny || j >= self.ny {
            return;
        }
        for r in 0..self.nx {
            self.data.swap(r * self.ny + i, r * self.ny + j);
        }
    }

    /// Overwrite column `col` with `values`.
    ///
    /// If `values` is shorter than the column, the remaining
    /// rows are left untouched.
    /// Extra values are ignored.
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidIndex`] if `col >= cols()`.
    pub fn set_column(&mut self, col: usize, values: &[T]) -> Result<(), MatrixError> {
        if col >= self.ny {
            return Err(MatrixError::InvalidIndex {
                index: col,
                size: self.ny,
            });
        }
        for (i, &v) in values.iter().take(self.nx).enumerate() {
            self.data[i * self.ny + col] = v;
        }
        Ok(())
    }

    /// Overwrite row `row` with `values`.
    ///
    /// Same length rules as [`DenseMatrix::set_column`].
    ///
    /// # Errors
    ///
    /// [`MatrixError::InvalidIndex`] if `row >= rows()`.
    pub fn set_row(&mut self, row: usize, values: &[T]) -> Result<(), MatrixError> {
        if row >= self.nx {
            return Err(MatrixError::InvalidIndex {
                index: row,
                size: self.nx,
            });
        }
        let n = values.len().min(self.ny);
        self.row_mut(row)[..n].copy_from_slice(&values[..n]);
        Ok(())
    }

    /// The transpose, leaving `self` unchanged.
    pub fn transpose(&self) -> Self {
        let mut rv = self.clone();
        rv.transpose_in_place();
        rv
    }

    /// Transpose in place.
    ///
    /// Square matrices are transposed without reallocating.
    pub fn transpose_in_place(&mut self) {
        if self.nx == self.ny {
            let n = self.nx;
            for i in 0..n {
                for j in (i + 1)..n {
                    self.data.swap(i * n + j, j * n + i);
                }
            }
            return;
        }
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.ny {
            for i in 0..self.nx {
                data.push(self.data[i * self.ny + j]);
            }
        }
        std::mem::swap(&mut self.nx, &mut self.ny);
        self.data = data;
    }

    /// The leading diagonal, `min(rows, cols)` entries long.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.nx.min(self.ny))
            .map(|i| self.data[i * self.ny + i])
            .collect()
    }

    /// Sum of the leading diagonal.
    pub fn trace(&self) -> T {
        (0..self.nx.min(self.ny)).fold(T::zero(), |acc, i| acc + self.data[i * self.ny + i])
    }
}

impl<T: Element> std::ops::Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    /// Unchecked with respect to the matrix shape:
    /// only the buffer length is checked.
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.ny + j]
    }
}

impl<T: Element> std::ops::IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.ny + j]
    }
}

impl<T> Serialize for DenseMatrix<T>
where
    T: Element + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq((0..self.nx).map(|i| self.row(i)))
    }
}

impl<'de, T> Deserialize<'de> for DenseMatrix<T>
where
    T: Element + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}
