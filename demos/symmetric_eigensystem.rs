use anyhow::Result;
use densematrix::DenseMatrix;

fn load_yaml(path: &str) -> Result<DenseMatrix<f64>> {
    let file = std::fs::File::open(path)?;
    let matrix = densematrix::load(file)?;
    Ok(matrix)
}

fn describe(matrix: &DenseMatrix<f64>) -> Result<()> {
    println!("Input matrix:\n");
    println!("{matrix}");
    println!("Trace: {}", matrix.trace());
    println!("Determinant: {}", matrix.determinant()?);

    let mut adjugate = DenseMatrix::default();
    let coeffs = matrix.faddeev(&mut adjugate)?;
    println!("Characteristic polynomial coefficients: {coeffs:?}");
    Ok(())
}

fn eigensystem(matrix: &DenseMatrix<f64>) -> Result<()> {
    let (mut vectors, mut values) = matrix.diagonalise()?;
    vectors.sort_eigen(&mut values)?;

    let eigenvalues = values
        .diagonal()
        .iter()
        .map(|v| format!("{v:.6}"))
        .collect::<Vec<_>>();
    println!("\nEigenvalues, ascending: {}", eigenvalues.join(" "));
    println!("Eigenvectors, one per column:\n");
    println!("{vectors}");

    // V D Vᵀ rebuilds the input
    let rebuilt = vectors.matmul(&values)?.matmul(&vectors.transpose())?;
    anyhow::ensure!(rebuilt == *matrix, "eigen-decomposition does not rebuild the input");

    if vectors.to_rotation().is_ok() {
        println!("As a proper rotation:\n");
        println!("{vectors}");
    }
    Ok(())
}

fn inverse(matrix: &DenseMatrix<f64>) -> Result<()> {
    let mut inverse = matrix.clone();
    inverse.invert()?;
    println!("Inverse: {}", inverse.to_compact_string());
    anyhow::ensure!(
        inverse.matmul(matrix)? == DenseMatrix::new(matrix.rows(), matrix.cols(), true),
        "inverse round trip failed"
    );
    Ok(())
}

fn do_work(path: &str) -> Result<()> {
    let matrix = load_yaml(path)?;
    describe(&matrix)?;
    eigensystem(&matrix)?;
    inverse(&matrix)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    do_work("demos/symmetric.yaml").unwrap();
}

#[test]
fn test_symmetric_eigensystem() {
    do_work("demos/symmetric.yaml").unwrap();
}
