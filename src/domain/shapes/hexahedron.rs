use super::hypercube_contains;
use crate::domain::element::{ElementShape, GaussNode};
use crate::domain::glq::tensor_gauss_nodes;
use nalgebra::{DMatrix, DVector};

// bottom face counter-clockwise, then top face counter-clockwise
const NODES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Trilinear hexahedron over `[-1, 1]^3`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hexahedron;

impl ElementShape for Hexahedron {
    const NAME: &'static str = "Hexahedron";
    const CANONICAL_DIMENSION: usize = 3;
    const NUMBER_OF_NODES: usize = 8;

    fn shape_values(local: &DVector<f64>) -> DVector<f64> {
        let (u, v, w) = (local[0], local[1], local[2]);
        DVector::from_iterator(
            8,
            NODES
                .iter()
                .map(|[ui, vi, wi]| 0.125 * (1.0 + u * ui) * (1.0 + v * vi) * (1.0 + w * wi)),
        )
    }

    fn shape_derivatives(local: &DVector<f64>) -> DMatrix<f64> {
        let (u, v, w) = (local[0], local[1], local[2]);
        DMatrix::from_fn(8, 3, |node, axis| {
            let [ui, vi, wi] = NODES[node];
            match axis {
                0 => 0.125 * ui * (1.0 + v * vi) * (1.0 + w * wi),
                1 => 0.125 * vi * (1.0 + u * ui) * (1.0 + w * wi),
                _ => 0.125 * wi * (1.0 + u * ui) * (1.0 + v * vi),
            }
        })
    }

    fn canonical_nodes() -> DMatrix<f64> {
        DMatrix::from_fn(8, 3, |node, axis| NODES[node][axis])
    }

    fn canonical_center() -> DVector<f64> {
        DVector::zeros(3)
    }

    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool {
        hypercube_contains(local, tolerance)
    }

    fn gauss_nodes() -> Vec<GaussNode> {
        tensor_gauss_nodes(2, 3)
    }
}
