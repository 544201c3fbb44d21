/// 2-node line segment
pub mod segment;
/// 3-node triangle
pub mod triangle;
/// 4-node bilinear quadrilateral
pub mod quad;
/// 4-node tetrahedron
pub mod tetrahedron;
/// 8-node trilinear hexahedron
pub mod hexahedron;

pub use hexahedron::Hexahedron;
pub use quad::Quad;
pub use segment::Segment;
pub use tetrahedron::Tetrahedron;
pub use triangle::Triangle;

use nalgebra::DVector;

// [-1, 1]^d reference domain of the tensor product shapes
pub(crate) fn hypercube_contains(local: &DVector<f64>, tolerance: f64) -> bool {
    local.iter().all(|x| x.abs() <= 1.0 + tolerance)
}

// unit simplex reference domain: all coordinates non-negative and summing to at most one
pub(crate) fn simplex_contains(local: &DVector<f64>, tolerance: f64) -> bool {
    local.iter().all(|x| *x >= -tolerance) && local.sum() <= 1.0 + tolerance
}

#[cfg(test)]
pub(crate) mod shape_checks {
    use crate::domain::element::ElementShape;
    use nalgebra::DVector;

    /// Shape functions must interpolate the nodes (Kronecker delta property) and sum to one
    pub fn check_partition_of_unity<S: ElementShape>() {
        let nodes = S::canonical_nodes();
        assert_eq!(nodes.nrows(), S::NUMBER_OF_NODES);
        assert_eq!(nodes.ncols(), S::CANONICAL_DIMENSION);

        for (i, row) in nodes.row_iter().enumerate() {
            let values = S::shape_values(&row.transpose());
            for (j, v) in values.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-14, "{}: N_{}(node {}) = {}", S::NAME, j, i, v);
            }
        }

        for gn in S::gauss_nodes() {
            assert!((S::shape_values(&gn.position).sum() - 1.0).abs() < 1e-14);
            assert!(S::shape_derivatives(&gn.position).row_sum().norm() < 1e-14);
            assert!(S::contains_local(&gn.position, 0.0));
        }
    }

    /// Compare the analytic shape derivatives against central finite differences
    pub fn check_derivatives<S: ElementShape>(local: &DVector<f64>) {
        let h = 1e-6;
        let analytic = S::shape_derivatives(local);
        for axis in 0..S::CANONICAL_DIMENSION {
            let mut fwd = local.clone();
            let mut bwd = local.clone();
            fwd[axis] += h;
            bwd[axis] -= h;
            let fd = (S::shape_values(&fwd) - S::shape_values(&bwd)) / (2.0 * h);
            for node in 0..S::NUMBER_OF_NODES {
                assert!((fd[node] - analytic[(node, axis)]).abs() < 1e-8);
            }
        }
    }
}
