use super::hypercube_contains;
use crate::domain::element::{ElementShape, GaussNode};
use crate::domain::glq::tensor_gauss_nodes;
use nalgebra::{DMatrix, DVector};

/// Linear segment over `[-1, 1]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Segment;

impl ElementShape for Segment {
    const NAME: &'static str = "Segment";
    const CANONICAL_DIMENSION: usize = 1;
    const NUMBER_OF_NODES: usize = 2;

    fn shape_values(local: &DVector<f64>) -> DVector<f64> {
        let u = local[0];
        DVector::from_vec(vec![0.5 * (1.0 - u), 0.5 * (1.0 + u)])
    }

    fn shape_derivatives(_: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 1, &[-0.5, 0.5])
    }

    fn canonical_nodes() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 1, &[-1.0, 1.0])
    }

    fn canonical_center() -> DVector<f64> {
        DVector::zeros(1)
    }

    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool {
        hypercube_contains(local, tolerance)
    }

    fn gauss_nodes() -> Vec<GaussNode> {
        tensor_gauss_nodes(2, 1)
    }
}
