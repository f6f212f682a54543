use thiserror::Error;

/// Error type for this crate.
///
/// Every variant describes a structural problem with the
/// inputs to an operation.
/// Nothing here is transient: retrying with the same inputs
/// gives the same error.
///
/// # Example
///
/// Multiplying a 2x3 matrix by another 2x3 matrix
/// is not defined:
///
/// ```
/// use densematrix::{DenseMatrix, MatrixError};
///
/// let a = DenseMatrix::<f64>::new(2, 3, false);
/// let b = DenseMatrix::<f64>::new(2, 3, false);
/// assert!(matches!(
///     a.matmul(&b),
///     Err(MatrixError::DimensionMismatch { left: 3, right: 2, .. })
/// ));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MatrixError {
    /// Operand shapes are incompatible.
    ///
    /// Operations that require a square matrix report
    /// `left = rows` and `right = cols`.
    #[error("{operation}: dimension mismatch {left} != {right}")]
    DimensionMismatch {
        #[allow(missing_docs)]
        operation: &'static str,
        #[allow(missing_docs)]
        left: usize,
        #[allow(missing_docs)]
        right: usize,
    },
    /// An elimination step found no usable pivot.
    #[error("matrix is singular")]
    Singular,
    /// The element at (`row`, `col`) differs from its transpose
    /// partner by more than the symmetry tolerance.
    #[error("matrix is not symmetric at ({row}, {col})")]
    NotSymmetric {
        #[allow(missing_docs)]
        row: usize,
        #[allow(missing_docs)]
        col: usize,
    },
    /// A row or column index is out of range.
    #[error("index {index} out of range for size {size}")]
    InvalidIndex {
        #[allow(missing_docs)]
        index: usize,
        #[allow(missing_docs)]
        size: usize,
    },
    /// The Jacobi eigen solver used up its sweep budget.
    #[error("jacobi rotations did not converge after {sweeps} sweeps")]
    NotConverged {
        #[allow(missing_docs)]
        sweeps: usize,
    },
    /// The columns of the matrix are not mutually orthogonal.
    #[error("matrix columns are not orthogonal")]
    NotOrthogonal,
    /// Raw data cannot be shaped into a matrix.
    #[error("{0:?}")]
    InvalidData(String),
    #[error(transparent)]
    /// Errors coming from `serde_yaml`.
    YamlError(#[from] serde_yaml::Error),
    #[cfg(feature = "json")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
    #[error(transparent)]
    /// Errors coming from `serde_json`.
    JsonError(#[from] serde_json::Error),
}

impl MatrixError {
    pub(crate) fn mismatch(operation: &'static str, left: usize, right: usize) -> Self {
        Self::DimensionMismatch {
            operation,
            left,
            right,
        }
    }
}
