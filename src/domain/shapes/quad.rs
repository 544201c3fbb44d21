use super::hypercube_contains;
use crate::domain::element::{ElementShape, GaussNode};
use crate::domain::glq::tensor_gauss_nodes;
use nalgebra::{DMatrix, DVector};

// counter-clockwise, starting from the bottom left corner
const NODES: [[f64; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

/// Bilinear quadrilateral over `[-1, 1]^2`
///
/// ```text
///   3 ----------- 2
///   |      v      |
///   |      |      |
///   |      +-- u  |
///   |             |
///   0 ----------- 1
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quad;

impl ElementShape for Quad {
    const NAME: &'static str = "Quad";
    const CANONICAL_DIMENSION: usize = 2;
    const NUMBER_OF_NODES: usize = 4;

    fn shape_values(local: &DVector<f64>) -> DVector<f64> {
        let (u, v) = (local[0], local[1]);
        DVector::from_iterator(
            4,
            NODES
                .iter()
                .map(|[ui, vi]| 0.25 * (1.0 + u * ui) * (1.0 + v * vi)),
        )
    }

    fn shape_derivatives(local: &DVector<f64>) -> DMatrix<f64> {
        let (u, v) = (local[0], local[1]);
        DMatrix::from_fn(4, 2, |node, axis| {
            let [ui, vi] = NODES[node];
            match axis {
                0 => 0.25 * ui * (1.0 + v * vi),
                _ => 0.25 * vi * (1.0 + u * ui),
            }
        })
    }

    fn canonical_nodes() -> DMatrix<f64> {
        DMatrix::from_fn(4, 2, |node, axis| NODES[node][axis])
    }

    fn canonical_center() -> DVector<f64> {
        DVector::zeros(2)
    }

    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool {
        hypercube_contains(local, tolerance)
    }

    fn gauss_nodes() -> Vec<GaussNode> {
        tensor_gauss_nodes(2, 2)
    }
}
