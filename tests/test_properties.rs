use densematrix::{DenseMatrix, MatrixError, Tolerances};

fn m(rows: &[&[f64]]) -> DenseMatrix<f64> {
    DenseMatrix::from_rows(rows).unwrap()
}

fn well_conditioned() -> DenseMatrix<f64> {
    m(&[
        &[4.0, -1.0, 0.5, 0.0],
        &[1.0, 5.0, -2.0, 1.0],
        &[0.0, 2.0, 6.0, -1.5],
        &[-1.0, 0.0, 1.0, 3.0],
    ])
}

#[test]
fn test_shape_invariant() {
    let mut a = DenseMatrix::<f64>::new(3, 5, false);
    assert_eq!(a.as_slice().len(), a.rows() * a.cols());
    a.resize(4, 2);
    assert_eq!(a.shape(), (4, 2));
    assert_eq!(a.as_slice().len(), 8);
    let b = DenseMatrix::from_data(2, 3, vec![1.0; 6]).unwrap();
    assert_eq!(b.as_slice().len(), b.rows() * b.cols());
    let c = DenseMatrix::from_outer_product(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
    assert_eq!(c.shape(), (2, 3));
}

#[test]
fn test_identity_law() {
    let a = well_conditioned();
    let identity = DenseMatrix::new(4, 4, true);
    assert_eq!(identity.matmul(&a).unwrap(), a);
    assert_eq!(a.matmul(&identity).unwrap(), a);
}

#[test]
fn test_transpose_idempotence() {
    let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
    let t = a.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.transpose(), a);
    let mut b = a.clone();
    b.transpose_in_place();
    b.transpose_in_place();
    assert_eq!(b, a);
}

#[test]
fn test_inverse_round_trip() {
    let a = well_conditioned();
    let mut inverse = a.clone();
    let det = inverse.invert().unwrap();
    assert!((det - a.determinant().unwrap()).abs() < 1e-9);
    assert_eq!(inverse.matmul(&a).unwrap(), DenseMatrix::new(4, 4, true));
    assert_eq!(a.matmul(&inverse).unwrap(), DenseMatrix::new(4, 4, true));
}

#[test]
fn test_lu_solve() {
    let a = well_conditioned();
    let x = [1.0, -2.0, 0.5, 3.0];
    let mut b = a.mul_vector(&x).unwrap();
    let mut lu = a.clone();
    let perm = lu.lubcmp().unwrap();
    lu.lubksb(&perm, &mut b).unwrap();
    for (got, want) in b.iter().zip(x.iter()) {
        assert!((got - want).abs() < 1e-12);
    }
}

#[test]
fn test_determinant_multiplicativity() {
    let a = well_conditioned();
    let b = m(&[
        &[1.0, 2.0, 0.0, 0.0],
        &[0.0, 1.0, 3.0, 0.0],
        &[2.0, 0.0, 1.0, 1.0],
        &[0.0, 0.0, 1.0, 2.0],
    ]);
    let product = a.matmul(&b).unwrap().determinant().unwrap();
    let expected = a.determinant().unwrap() * b.determinant().unwrap();
    assert!((product - expected).abs() < 1e-9 * expected.abs());
}

#[test]
fn test_eigen_round_trip() {
    let a = m(&[
        &[4.0, 1.0, 2.0, 0.5],
        &[1.0, 3.0, 0.5, 1.0],
        &[2.0, 0.5, 1.0, 0.0],
        &[0.5, 1.0, 0.0, 2.0],
    ]);
    let (vectors, values) = a.diagonalise().unwrap();
    let rebuilt = vectors
        .matmul(&values)
        .unwrap()
        .matmul(&vectors.transpose())
        .unwrap();
    assert_eq!(rebuilt, a);
    assert_eq!(
        vectors.transpose().matmul(&vectors).unwrap(),
        DenseMatrix::new(4, 4, true)
    );
    assert!(vectors.is_orthogonal(1e-10));
    assert!((values.trace() - a.trace()).abs() < 1e-10);
}

#[test]
fn test_truncating_add() {
    let mut a = DenseMatrix::<f64>::new(3, 3, true);
    let b = m(&[&[1.0, 1.0], &[1.0, 1.0]]);
    a += &b;
    assert_eq!(a, m(&[&[2.0, 1.0, 0.0], &[1.0, 2.0, 0.0], &[0.0, 0.0, 1.0]]));
    a -= &b;
    assert_eq!(a, DenseMatrix::new(3, 3, true));
}

#[test]
fn test_truncating_binary_keeps_left_shape() {
    let a = DenseMatrix::<i32>::new(2, 3, true);
    let b = DenseMatrix::from_rows(&[[5], [5], [5]]).unwrap();
    let c = &a + &b;
    assert_eq!(c.shape(), (2, 3));
    assert_eq!(c.as_slice(), &[6, 0, 0, 5, 1, 0]);
}

#[test]
fn test_gauss_jordan_scenario() {
    let mut a = m(&[&[2.0, 1.0], &[1.0, 3.0]]);
    let original = a.clone();
    let mut b = DenseMatrix::new(2, 2, true);
    a.gauss_jordan(&mut b).unwrap();
    assert_eq!(b, m(&[&[0.6, -0.2], &[-0.2, 0.4]]));
    assert_eq!(original.matmul(&b).unwrap(), DenseMatrix::new(2, 2, true));
}

#[test]
fn test_jacobi_scenario() {
    let a = m(&[&[2.0, 1.0], &[1.0, 2.0]]);
    let (mut vectors, mut values) = a.diagonalise().unwrap();
    let mut unsorted = values.diagonal();
    unsorted.sort_by(|x, y| x.partial_cmp(y).unwrap());
    vectors.sort_eigen(&mut values).unwrap();
    assert_eq!(values.diagonal(), unsorted);
    assert!((values[(0, 0)] - 1.0).abs() < 1e-12);
    assert!((values[(1, 1)] - 3.0).abs() < 1e-12);
    // A v = lambda v for every column
    for j in 0..2 {
        let v = vectors.column(j);
        let av = a.mul_vector(&v).unwrap();
        for i in 0..2 {
            assert!((av[i] - values[(j, j)] * v[i]).abs() < 1e-12);
        }
    }
}

#[test]
fn test_singular_determinant() {
    let a = m(&[&[1.0, 2.0], &[2.0, 4.0]]);
    assert_eq!(a.determinant().unwrap(), 0.0);
    let mut zero_row = m(&[&[1.0, 2.0], &[0.0, 0.0]]);
    assert!(matches!(zero_row.invert(), Err(MatrixError::Singular)));
    assert_eq!(zero_row, m(&[&[1.0, 2.0], &[0.0, 0.0]]));
}

#[test]
fn test_fuzzy_equality_boundary() {
    let a = m(&[&[0.0, 0.5], &[-0.25, 1.0]]);
    let mut b = a.clone();
    b[(0, 0)] = 1e-8;
    assert_eq!(a, b);
    b[(0, 0)] = 1e-7;
    assert_ne!(a, b);

    let loose = Tolerances {
        equality: 1e-6,
        ..Default::default()
    };
    assert!(a.equals_with(&b, &loose));
}

#[test]
fn test_shape_mismatch_is_unequal() {
    let a = DenseMatrix::<f64>::new(2, 2, true);
    let b = DenseMatrix::<f64>::new(2, 3, true);
    assert_ne!(a, b);
}

#[test]
fn test_integer_matrices() {
    let a = DenseMatrix::from_rows(&[[2, 1], [4, 3]]).unwrap();
    assert_eq!(a.determinant().unwrap(), 2);
    let mut copy = a.clone();
    let mut b = DenseMatrix::new(2, 2, true);
    copy.gauss_jordan(&mut b).unwrap();
    assert_eq!(copy.as_slice(), a.as_slice());
    assert_eq!(b.as_slice(), &[1, 0, 0, 1]);
}
