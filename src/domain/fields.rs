use super::element::ElementShape;
use nalgebra::{DMatrix, DVector, RowDVector};

// Interpolation is a weighted sum over the element's nodes: sum_i N_i(local) * value_i.
// The same shape functions are used by `Element::world_coordinates`, so interpolating node
// positions reproduces the mapped point.

/// Interpolate a table of element-local nodal values
///
/// `values` has one row per element node and one column per field component.
pub fn interpolate_local<S: ElementShape>(
    local: &DVector<f64>,
    values: &DMatrix<f64>,
) -> DVector<f64> {
    debug_assert_eq!(values.nrows(), S::NUMBER_OF_NODES);
    values.tr_mul(&S::shape_values(local))
}

/// Interpolate a global nodal table (one row per mesh node) through the connectivity of one element
///
/// ```
/// use fem_barycentric::domain::fields::interpolate;
/// use fem_barycentric::Quad;
/// use nalgebra::{DMatrix, DVector};
///
/// // a linear field f(x, y) = x + 2y sampled on the nodes of the unit square
/// let values = DMatrix::from_row_slice(4, 1, &[0.0, 1.0, 3.0, 2.0]);
/// let f = interpolate::<Quad>(&DVector::from_vec(vec![0.0, 0.0]), &[0, 1, 2, 3], &values);
/// assert!((f[0] - 1.5).abs() < 1e-14);
/// ```
pub fn interpolate<S: ElementShape>(
    local: &DVector<f64>,
    node_indices: &[usize],
    values: &DMatrix<f64>,
) -> DVector<f64> {
    interpolate_row::<S>(local, node_indices, values).transpose()
}

pub(crate) fn interpolate_row<S: ElementShape>(
    local: &DVector<f64>,
    node_indices: &[usize],
    values: &DMatrix<f64>,
) -> RowDVector<f64> {
    let weights = S::shape_values(local);
    let mut result = RowDVector::zeros(values.ncols());
    for (weight, node) in weights.iter().zip(node_indices.iter()) {
        result += values.row(*node) * *weight;
    }
    result
}
