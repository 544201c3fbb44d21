use super::element::GaussNode;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Get a set of n Gauss-Legendre-Quadrature points and weights over `(-1, 1)`
///
/// ```
/// use fem_barycentric::domain::glq::gauss_quadrature_points;
///
/// let (points, weights) = gauss_quadrature_points(3);
/// assert!((points[0] + (3.0_f64 / 5.0).sqrt()).abs() < 1e-12);
/// assert!(points[1].abs() < 1e-12);
/// assert!((weights.iter().sum::<f64>() - 2.0).abs() < 1e-12);
/// ```
// Golub-Welsch: the points are the eigenvalues of the Jacobi matrix of the Legendre recurrence
pub fn gauss_quadrature_points(n: usize) -> (Vec<f64>, Vec<f64>) {
    let betas: Vec<f64> = (1..n)
        .map(|i| 0.5 / (1.0 - (2.0 * i as f64).powi(-2)).sqrt())
        .collect();

    let jacobi_mat: DMatrix<f64> = DMatrix::from_fn(n, n, |r, c| {
        if r == c + 1 {
            betas[r - 1]
        } else if c == r + 1 {
            betas[c - 1]
        } else {
            0.0
        }
    });

    let eigen_decomp = SymmetricEigen::new(jacobi_mat);

    let mut xw: Vec<(f64, f64)> = eigen_decomp
        .eigenvalues
        .iter()
        .cloned()
        .zip(
            eigen_decomp
                .eigenvectors
                .row(0)
                .iter()
                .map(|weight| (*weight).powi(2) * 2.0),
        )
        .collect();

    xw.sort_by(|a, b| a.0.total_cmp(&b.0));

    xw.drain(0..).unzip()
}

/// Tensor product Gauss-Legendre rule over the `[-1, 1]^dimension` hypercube
///
/// The first parametric direction varies fastest.
pub fn tensor_gauss_nodes(n: usize, dimension: usize) -> Vec<GaussNode> {
    let (points, weights) = gauss_quadrature_points(n);
    let total = n.pow(dimension as u32);

    (0..total)
        .map(|flat| {
            let mut position = DVector::zeros(dimension);
            let mut weight = 1.0;
            let mut rem = flat;
            for axis in 0..dimension {
                position[axis] = points[rem % n];
                weight *= weights[rem % n];
                rem /= n;
            }
            GaussNode { position, weight }
        })
        .collect()
}
