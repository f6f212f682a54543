use crate::error::MatrixError;
use serde::{Deserialize, Serialize};

/// Numerical thresholds used by the matrix algorithms.
///
/// The plain methods of [`DenseMatrix`](crate::DenseMatrix)
/// use [`Tolerances::default`].
/// The `*_with` variants accept a custom record.
///
/// # Examples
///
/// ## In `YAML` input
///
/// Fields that are not given keep their default values:
///
/// ```
/// let yaml = "
/// symmetry: 1e-3
/// max_sweeps: 50
/// ";
/// let t = densematrix::Tolerances::from_yaml(yaml).unwrap();
/// assert_eq!(t.symmetry, 1e-3);
/// assert_eq!(t.max_sweeps, 50);
/// assert_eq!(t.equality, 1e-8);
/// ```
///
/// ## Using rust code
///
/// ```
/// let t = densematrix::Tolerances {
///     equality: 1e-4,
///     ..Default::default()
/// };
/// assert_eq!(t.relaxed_sweeps, 6);
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Tolerances {
    /// Absolute (and, for large entries, relative) tolerance of `==`.
    pub equality: f64,
    /// Largest allowed `|a[i][j] - a[j][i]|` before
    /// [`diagonalise`](crate::DenseMatrix::diagonalise) refuses the input.
    pub symmetry: f64,
    /// Pivots smaller than this make
    /// [`determinant`](crate::DenseMatrix::determinant) return zero.
    pub singular_pivot: f64,
    /// Replacement for an exactly zero pivot during LU decomposition.
    pub lu_zero_pivot: f64,
    /// Maximum number of Jacobi sweeps.
    pub max_sweeps: usize,
    /// Number of initial sweeps that use the relaxed rotation threshold.
    pub relaxed_sweeps: usize,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            equality: 1e-8,
            symmetry: 1e-6,
            singular_pivot: 1e-8,
            lu_zero_pivot: 1e-14,
            max_sweeps: 100,
            relaxed_sweeps: 6,
        }
    }
}

impl Tolerances {
    /// Read a (possibly partial) record from a `YAML` string.
    pub fn from_yaml(yaml: &str) -> Result<Self, MatrixError> {
        let rv: Self = serde_yaml::from_str(yaml)?;
        rv.validate()?;
        Ok(rv)
    }

    fn validate(&self) -> Result<(), MatrixError> {
        for (name, value) in [
            ("equality", self.equality),
            ("symmetry", self.symmetry),
            ("singular_pivot", self.singular_pivot),
            ("lu_zero_pivot", self.lu_zero_pivot),
        ] {
            if !value.is_finite() || value < 0.0 {
                let msg = format!("{name} must be finite and >= 0.0, got: {value}");
                return Err(MatrixError::InvalidData(msg));
            }
        }
        if self.relaxed_sweeps > self.max_sweeps {
            let msg = format!(
                "relaxed_sweeps ({}) must not exceed max_sweeps ({})",
                self.relaxed_sweeps, self.max_sweeps
            );
            return Err(MatrixError::InvalidData(msg));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_is_default() {
        let t = Tolerances::from_yaml("{}").unwrap();
        assert_eq!(t, Tolerances::default());
    }

    #[test]
    fn test_negative_tolerance() {
        let t = Tolerances::from_yaml("equality: -1.0");
        assert!(matches!(t, Err(MatrixError::InvalidData(_))));
    }

    #[test]
    fn test_unknown_field() {
        let t = Tolerances::from_yaml("sweeps: 10");
        assert!(matches!(t, Err(MatrixError::YamlError(_))));
    }

    #[test]
    fn test_relaxed_sweeps_bound() {
        let t = Tolerances::from_yaml("max_sweeps: 3");
        assert!(matches!(t, Err(MatrixError::InvalidData(_))));
    }
}
