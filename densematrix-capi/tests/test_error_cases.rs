use densematrix_capi::*;

#[test]
fn test_initialize_with_null_data() {
    let matrix = dense_matrix_allocate();
    let rv = unsafe { dense_matrix_initialize_from_data(std::ptr::null(), 2, 2, matrix) };
    assert!(rv < 0);

    let is_error = unsafe { dense_matrix_is_error_state(matrix) };
    assert!(is_error);

    unsafe {
        dense_matrix_deallocate(matrix);
    }
}

#[test]
fn test_initialize_empty() {
    let matrix = dense_matrix_allocate();
    let rv = unsafe { dense_matrix_initialize_from_data(std::ptr::null(), 0, 3, matrix) };
    assert_eq!(rv, 0);
    let mut status = 0;
    let rows = unsafe { dense_matrix_rows(matrix as *const OpaqueDenseMatrix, &mut status) };
    assert_eq!(status, 0);
    assert_eq!(rows, 0);
    unsafe {
        dense_matrix_deallocate(matrix);
    }
}

#[test]
fn test_errors_const_api_with_uninitialized_matrix() {
    let matrix = dense_matrix_allocate();
    let mut status = 0;
    let _ = unsafe { dense_matrix_rows(matrix as *const OpaqueDenseMatrix, &mut status) };
    assert!(status < 0); // make sure we are in an error state

    status = 0;
    let _ = unsafe { dense_matrix_cols(matrix as *const OpaqueDenseMatrix, &mut status) };
    assert!(status < 0);

    status = 0;
    let _ = unsafe { dense_matrix_data(matrix as *const OpaqueDenseMatrix, &mut status) };
    assert!(status < 0);

    status = 0;
    let _ = unsafe { dense_matrix_determinant(matrix, &mut status) };
    assert!(status < 0);

    status = 0;
    let _ = unsafe { dense_matrix_invert(matrix, &mut status) };
    assert!(status < 0);

    unsafe {
        dense_matrix_deallocate(matrix);
    }
}

#[test]
fn test_determinant_of_rectangular_matrix() {
    let matrix = dense_matrix_allocate();
    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let rv = unsafe { dense_matrix_initialize_from_data(data.as_ptr(), 2, 3, matrix) };
    assert_eq!(rv, 0);
    let mut status = 0;
    let det = unsafe { dense_matrix_determinant(matrix, &mut status) };
    assert!(status < 0);
    assert!(det.is_nan());

    let is_error = unsafe { dense_matrix_is_error_state(matrix) };
    assert!(is_error);
    let message = unsafe { dense_matrix_get_error_message(matrix, &mut status) };
    assert_eq!(status, 0);
    assert!(!message.is_null());
    let message = unsafe { std::ffi::CStr::from_ptr(message) }.to_str().unwrap();
    assert!(message.contains("determinant"));
    unsafe {
        dense_matrix_deallocate(matrix);
    }
}

// Test that fns expecting *const OpaqueDenseMatrix
// Return an error if the pointer is null
macro_rules! make_test_of_const_api_with_null {
    ($name: ident, $function: ident) => {
        #[test]
        fn $name() {
            let mut status = 0;
            unsafe {
                $function(std::ptr::null() as *const OpaqueDenseMatrix, &mut status);
            }
            assert!(status < 0);
        }
    };
}

make_test_of_const_api_with_null!(test_ub_rows, dense_matrix_rows);
make_test_of_const_api_with_null!(test_ub_cols, dense_matrix_cols);
make_test_of_const_api_with_null!(test_ub_data, dense_matrix_data);
make_test_of_const_api_with_null!(test_ub_to_string, dense_matrix_to_string);
make_test_of_const_api_with_null!(test_ub_get_error_message, dense_matrix_get_error_message);

#[test]
fn test_initialize_with_overflowing_shape() {
    let matrix = dense_matrix_allocate();
    let data = [1.0];
    let rv = unsafe { dense_matrix_initialize_from_data(data.as_ptr(), usize::MAX, 2, matrix) };
    assert!(rv < 0);
    let is_error = unsafe { dense_matrix_is_error_state(matrix) };
    assert!(is_error);
    let mut status = 0;
    let _ = unsafe { dense_matrix_rows(matrix as *const OpaqueDenseMatrix, &mut status) };
    assert!(status < 0);
    unsafe {
        dense_matrix_deallocate(matrix);
    }
}

#[test]
fn test_null_mut_api() {
    let mut status = 0;
    let _ = unsafe { dense_matrix_determinant(std::ptr::null_mut(), &mut status) };
    assert!(status < 0);
    status = 0;
    let _ = unsafe { dense_matrix_invert(std::ptr::null_mut(), &mut status) };
    assert!(status < 0);
    let rv = unsafe { dense_matrix_gauss_jordan(std::ptr::null_mut(), std::ptr::null_mut()) };
    assert!(rv < 0);
    let rv = unsafe {
        dense_matrix_diagonalise(
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    assert!(rv < 0);
}
