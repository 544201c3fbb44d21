use super::simplex_contains;
use crate::domain::element::{ElementShape, GaussNode};
use nalgebra::{DMatrix, DVector};

const GAUSS_A: f64 = 0.138_196_601_125_010_5;
const GAUSS_B: f64 = 0.585_410_196_624_968_5;

/// Linear tetrahedron over the unit simplex
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tetrahedron;

impl ElementShape for Tetrahedron {
    const NAME: &'static str = "Tetrahedron";
    const CANONICAL_DIMENSION: usize = 3;
    const NUMBER_OF_NODES: usize = 4;

    fn shape_values(local: &DVector<f64>) -> DVector<f64> {
        let (u, v, w) = (local[0], local[1], local[2]);
        DVector::from_vec(vec![1.0 - u - v - w, u, v, w])
    }

    fn shape_derivatives(_: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::from_row_slice(
            4,
            3,
            &[
                -1.0, -1.0, -1.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
        )
    }

    fn canonical_nodes() -> DMatrix<f64> {
        let mut nodes = DMatrix::zeros(4, 3);
        for axis in 0..3 {
            nodes[(axis + 1, axis)] = 1.0;
        }
        nodes
    }

    fn canonical_center() -> DVector<f64> {
        DVector::from_element(3, 0.25)
    }

    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool {
        simplex_contains(local, tolerance)
    }

    // four point rule, exact for quadratics
    fn gauss_nodes() -> Vec<GaussNode> {
        [
            [GAUSS_A, GAUSS_A, GAUSS_A],
            [GAUSS_B, GAUSS_A, GAUSS_A],
            [GAUSS_A, GAUSS_B, GAUSS_A],
            [GAUSS_A, GAUSS_A, GAUSS_B],
        ]
        .iter()
        .map(|p| GaussNode {
            position: DVector::from_row_slice(p),
            weight: 1.0 / 24.0,
        })
        .collect()
    }
}
