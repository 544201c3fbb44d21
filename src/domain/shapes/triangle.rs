use super::simplex_contains;
use crate::domain::element::{ElementShape, GaussNode};
use nalgebra::{DMatrix, DVector};

/// Linear triangle over the unit simplex
///
/// ```text
///   2
///   | \
///   v   \
///   |     \
///   0 -u-- 1
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Triangle;

impl ElementShape for Triangle {
    const NAME: &'static str = "Triangle";
    const CANONICAL_DIMENSION: usize = 2;
    const NUMBER_OF_NODES: usize = 3;

    fn shape_values(local: &DVector<f64>) -> DVector<f64> {
        let (u, v) = (local[0], local[1]);
        DVector::from_vec(vec![1.0 - u - v, u, v])
    }

    fn shape_derivatives(_: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[-1.0, -1.0, 1.0, 0.0, 0.0, 1.0])
    }

    fn canonical_nodes() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
    }

    fn canonical_center() -> DVector<f64> {
        DVector::from_element(2, 1.0 / 3.0)
    }

    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool {
        simplex_contains(local, tolerance)
    }

    // three point rule, exact for quadratics
    fn gauss_nodes() -> Vec<GaussNode> {
        [[1.0 / 6.0, 1.0 / 6.0], [2.0 / 3.0, 1.0 / 6.0], [1.0 / 6.0, 2.0 / 3.0]]
            .iter()
            .map(|p| GaussNode {
                position: DVector::from_row_slice(p),
                weight: 1.0 / 6.0,
            })
            .collect()
    }
}
