//! # Dense row-major matrices
//!
//! [`DenseMatrix`] is an owning, resizable `rows x cols` container
//! over a numeric [`Element`] type, with:
//!
//! * elementwise and matrix arithmetic,
//! * row and column manipulation,
//! * determinants by Gaussian elimination,
//! * inversion by LU decomposition and Gauss-Jordan elimination,
//! * characteristic polynomials by the Faddeev-LeVerrier recurrence,
//! * eigen-decomposition of symmetric matrices by Jacobi rotations.
//!
//! Matrices can be read from `YAML` as a sequence of rows:
//!
//! ```
//! let yaml = "
//! - [2.0, 1.0]
//! - [1.0, 2.0]
//! ";
//! let m: densematrix::DenseMatrix<f64> = densematrix::loads(yaml).unwrap();
//! assert_eq!(m.trace(), 4.0);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod macros;

mod arithmetic;
mod decomposition;
mod display;
mod eigen;
mod error;
mod matrix;
mod tolerance;
mod traits;
mod vector;

pub use decomposition::LuPermutation;
pub use error::MatrixError;
pub use matrix::DenseMatrix;
pub use tolerance::Tolerances;
pub use traits::Element;
pub use vector::Vector3;

/// Read a matrix from a `YAML` string.
///
/// # Errors
///
/// [`MatrixError::YamlError`] if the input is not a
/// sequence of equally long rows of numbers.
pub fn loads<T>(yaml: &str) -> Result<DenseMatrix<T>, MatrixError>
where
    T: Element + serde::de::DeserializeOwned,
{
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read a matrix from a `YAML` reader.
///
/// ```no_run
/// let file = std::fs::File::open("matrix.yaml").unwrap();
/// let m: densematrix::DenseMatrix<f64> = densematrix::load(file).unwrap();
/// ```
pub fn load<T, R>(reader: R) -> Result<DenseMatrix<T>, MatrixError>
where
    T: Element + serde::de::DeserializeOwned,
    R: std::io::Read,
{
    Ok(serde_yaml::from_reader(reader)?)
}

/// Read a matrix from a `JSON` string.
#[cfg(feature = "json")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "json")))]
pub fn loads_json<T>(json: &str) -> Result<DenseMatrix<T>, MatrixError>
where
    T: Element + serde::de::DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_yaml() {
        let yaml = "
- [1.0, 2.0]
- [3.0]
";
        let m: Result<DenseMatrix<f64>, _> = loads(yaml);
        assert!(matches!(m, Err(MatrixError::YamlError(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let m = DenseMatrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
        let yaml = serde_yaml::to_string(&m).unwrap();
        let back: DenseMatrix<i32> = loads(&yaml).unwrap();
        assert_eq!(back.shape(), (2, 3));
        assert_eq!(back.as_slice(), m.as_slice());
    }

    #[test]
    fn test_empty_yaml_sequence() {
        let m: DenseMatrix<f64> = loads("[]").unwrap();
        assert!(m.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json() {
        let m: DenseMatrix<f64> = loads_json("[[1.0, 0.0], [0.0, 1.0]]").unwrap();
        assert_eq!(m, DenseMatrix::new(2, 2, true));
    }
}
