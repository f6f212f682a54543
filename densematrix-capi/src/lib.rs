use densematrix::DenseMatrix;
use libc::c_char;
use std::ffi::CStr;
use std::ffi::CString;

/// ## Not Send/Sync
///
/// This type is meant to be used in an FFI context.
/// We therefore deny Send/Sync:
///
/// ```compile_fail
/// fn is_send<T: Send>()  {}
///
/// is_send::<densematrix_capi::OpaqueDenseMatrix>();
/// ```
///
/// ```compile_fail
/// fn is_sync<T: Sync>()  {}
///
/// is_sync::<densematrix_capi::OpaqueDenseMatrix>();
/// ```
pub struct OpaqueDenseMatrix {
    matrix: Option<DenseMatrix<f64>>,
    error: Option<CString>,
    // Raw pointers are neither Send nor Sync,
    // so this ZST removes the blanket impls.
    deny_send_sync: std::marker::PhantomData<*const ()>,
}

#[repr(i32)]
enum ErrorCode {
    MatrixUninitialized = -1,
    MatrixIsNull = -2,
    NumericalFailure = -3,
}

impl OpaqueDenseMatrix {
    fn update(&mut self, matrix: Option<DenseMatrix<f64>>, error: Option<String>) {
        self.matrix = matrix;
        self.update_error(error);
    }

    fn update_error(&mut self, error: Option<String>) {
        self.error = error.and_then(|e| {
            CString::new(
                e.chars()
                    .filter(|c| c.is_ascii() && c != &'"' && c != &'\0')
                    .collect::<String>(),
            )
            .ok()
        });
    }

    fn record_error<E: std::fmt::Display>(&mut self, error: E) -> i32 {
        self.update_error(Some(format!("{error}")));
        ErrorCode::NumericalFailure as i32
    }
}

/// Allocate an [`OpaqueDenseMatrix`]
///
/// # Safety
///
/// The pointer is returned by leaking a [`Box`].
/// The pointer is managed by rust and is freed by [`dense_matrix_deallocate`].
#[no_mangle]
pub extern "C" fn dense_matrix_allocate() -> *mut OpaqueDenseMatrix {
    Box::into_raw(Box::new(OpaqueDenseMatrix {
        matrix: None,
        error: None,
        deny_send_sync: std::marker::PhantomData,
    }))
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_deallocate(matrix: *mut OpaqueDenseMatrix) {
    if !matrix.is_null() {
        let _ = Box::from_raw(matrix);
    }
}

/// Initialize from `rows * cols` values in row-major order.
///
/// # Safety
///
/// * `data` must point to at least `rows * cols` values,
///   or may be NULL if either dimension is zero.
/// * `matrix` must be a valid pointer to an [`OpaqueDenseMatrix`].
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_initialize_from_data(
    data: *const f64,
    rows: usize,
    cols: usize,
    matrix: *mut OpaqueDenseMatrix,
) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    let len = match rows.checked_mul(cols) {
        Some(len) => len,
        None => {
            (*matrix).update(None, Some(format!("{rows}x{cols} matrix is too large")));
            return -1;
        }
    };
    let values = if len == 0 {
        vec![]
    } else if data.is_null() {
        (*matrix).update(None, Some("data pointer is NULL".to_string()));
        return -1;
    } else {
        std::slice::from_raw_parts(data, len).to_vec()
    };
    match DenseMatrix::from_data(rows, cols, values) {
        Ok(m) => {
            (*matrix).update(Some(m), None);
            0
        }
        Err(e) => {
            (*matrix).update(None, Some(format!("{e}")));
            -1
        }
    }
}

/// Initialize from a `YAML` sequence of rows.
///
/// # Safety
///
/// * `yaml` must be a valid pointer containing valid utf8 data.
/// * `matrix` must be a valid pointer to an [`OpaqueDenseMatrix`].
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_initialize_from_yaml(
    yaml: *const c_char,
    matrix: *mut OpaqueDenseMatrix,
) -> i32 {
    if matrix.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    if yaml.is_null() {
        (*matrix).update(None, Some("yaml pointer is NULL".to_string()));
        return -1;
    }
    let yaml = match CStr::from_ptr(yaml).to_str() {
        Ok(s) => s,
        Err(e) => {
            (*matrix).update(None, Some(format!("{e}")));
            return -1;
        }
    };
    match densematrix::loads(yaml) {
        Ok(m) => {
            (*matrix).update(Some(m), None);
            0
        }
        Err(e) => {
            (*matrix).update(None, Some(format!("{e}")));
            -1
        }
    }
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_is_error_state(matrix: *const OpaqueDenseMatrix) -> bool {
    (*matrix).error.is_some()
}

/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_get_error_message(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
) -> *const c_char {
    *status = 0;
    if !matrix.is_null() {
        match &(*matrix).error {
            Some(message) => message.as_ptr(),
            None => std::ptr::null(),
        }
    } else {
        *status = ErrorCode::MatrixIsNull as i32;
        std::ptr::null()
    }
}

unsafe fn with_matrix<R>(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
    default: R,
    f: impl FnOnce(&DenseMatrix<f64>) -> R,
) -> R {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return default;
    }
    match &(*matrix).matrix {
        Some(m) => f(m),
        None => {
            *status = ErrorCode::MatrixUninitialized as i32;
            default
        }
    }
}

/// Number of rows.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_rows(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
) -> usize {
    with_matrix(matrix, status, 0, |m| m.rows())
}

/// Number of columns.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_cols(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
) -> usize {
    with_matrix(matrix, status, 0, |m| m.cols())
}

/// Pointer to the first element of the row-major buffer.
///
/// The length of the array is [`dense_matrix_rows`] times
/// [`dense_matrix_cols`].
/// The pointer is invalidated by any call that modifies `matrix`.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_data(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
) -> *const f64 {
    with_matrix(matrix, status, std::ptr::null(), |m| m.as_slice().as_ptr())
}

unsafe fn with_matrix_mut<R>(
    matrix: *mut OpaqueDenseMatrix,
    status: *mut i32,
    default: R,
    f: impl FnOnce(&mut DenseMatrix<f64>) -> Result<R, densematrix::MatrixError>,
) -> R {
    *status = 0;
    if matrix.is_null() {
        *status = ErrorCode::MatrixIsNull as i32;
        return default;
    }
    let rv = match &mut (*matrix).matrix {
        Some(m) => f(m),
        None => {
            *status = ErrorCode::MatrixUninitialized as i32;
            return default;
        }
    };
    match rv {
        Ok(value) => {
            (*matrix).update_error(None);
            value
        }
        Err(e) => {
            *status = (*matrix).record_error(e);
            default
        }
    }
}

/// Determinant by Gaussian elimination.
///
/// The matrix itself is not modified.
///
/// # Errors
///
/// `status` is negative, NaN is returned and the error message is set
/// if the matrix is not square.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_determinant(
    matrix: *mut OpaqueDenseMatrix,
    status: *mut i32,
) -> f64 {
    with_matrix_mut(matrix, status, f64::NAN, |m| m.determinant())
}

/// Invert in place and return the determinant.
///
/// # Errors
///
/// `status` is negative and the error message is set
/// if the matrix is not square or is singular.
///
/// # Safety
///
/// `matrix` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_invert(
    matrix: *mut OpaqueDenseMatrix,
    status: *mut i32,
) -> f64 {
    with_matrix_mut(matrix, status, f64::NAN, |m| m.invert())
}

/// Solve `A X = B` by Gauss-Jordan elimination.
///
/// On success `rhs` holds `X` and `matrix` holds the inverse of `A`.
///
/// # Safety
///
/// `matrix` and `rhs` must be valid, distinct pointers.
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_gauss_jordan(
    matrix: *mut OpaqueDenseMatrix,
    rhs: *mut OpaqueDenseMatrix,
) -> i32 {
    if matrix.is_null() || rhs.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    let b = match &mut (*rhs).matrix {
        Some(b) => b,
        None => return ErrorCode::MatrixUninitialized as i32,
    };
    let mut status = 0;
    with_matrix_mut(matrix, &mut status, (), |a| a.gauss_jordan(b));
    status
}

/// Eigen-decomposition of a symmetric matrix.
///
/// Eigenvectors are written into the columns of `vectors` and the
/// eigenvalues, ascending, onto the diagonal of `values`.
/// Any previous contents of the two outputs are replaced.
///
/// # Safety
///
/// `matrix`, `vectors` and `values` must be valid, distinct pointers.
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_diagonalise(
    matrix: *mut OpaqueDenseMatrix,
    vectors: *mut OpaqueDenseMatrix,
    values: *mut OpaqueDenseMatrix,
) -> i32 {
    if matrix.is_null() || vectors.is_null() || values.is_null() {
        return ErrorCode::MatrixIsNull as i32;
    }
    let mut status = 0;
    let rv = with_matrix_mut(matrix, &mut status, None, |m| {
        let (mut v, mut d) = m.diagonalise()?;
        v.sort_eigen(&mut d)?;
        Ok(Some((v, d)))
    });
    if let Some((v, d)) = rv {
        (*vectors).update(Some(v), None);
        (*values).update(Some(d), None);
    }
    status
}

/// The elements as a space-separated, row-major string.
///
/// # Safety
///
/// `matrix` must be a valid pointer.
///
/// If not NULL, the return value must be freed in order to avoid
/// leaking memory.
#[no_mangle]
pub unsafe extern "C" fn dense_matrix_to_string(
    matrix: *const OpaqueDenseMatrix,
    status: *mut i32,
) -> *mut c_char {
    let s = with_matrix(matrix, status, None, |m| Some(m.to_compact_string()));
    match s.map(CString::new) {
        Some(Ok(c_str)) => libc::strdup(c_str.as_ptr()),
        Some(Err(_)) => {
            *status = -1;
            std::ptr::null_mut()
        }
        None => std::ptr::null_mut(),
    }
}
