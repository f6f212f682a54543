use num_traits::{Num, Signed};

/// Numeric types that can be stored in a [`DenseMatrix`](crate::DenseMatrix).
///
/// The numerical kernels accumulate in [`f64`] and write their
/// results back through [`Element::from_f64`].
/// For integer types the write-back truncates towards zero.
///
/// Implemented for [`f32`], [`f64`], [`i32`] and [`i64`].
pub trait Element:
    Num
    + Signed
    + Copy
    + PartialOrd
    + Default
    + std::fmt::Debug
    + std::fmt::Display
    + std::fmt::LowerExp
{
    /// `true` for integer types.
    ///
    /// Operations that only make sense with exact division,
    /// such as [`DenseMatrix::gauss_jordan`](crate::DenseMatrix::gauss_jordan),
    /// check this and do nothing for integer matrices.
    const IS_INTEGER: bool;

    /// Widen to [`f64`].
    fn as_f64(self) -> f64;

    /// Narrow from [`f64`], truncating for integer types.
    fn from_f64(value: f64) -> Self;
}

impl_element!(f32, false);
impl_element!(f64, false);
impl_element!(i32, true);
impl_element!(i64, true);
