/// The public point location and field transfer API
pub mod container;
/// Cached node to element correspondences of embedded meshes
pub mod correspondence;
/// Newton inversion of the parametric mapping of one element
pub mod newton;
/// Uniform grid accelerating the candidate element search
pub mod spatial_index;

use nalgebra::DVector;

/// A point expressed in the parametric frame of the container element holding it
///
/// `element_index` is `None` when no element of the container contains the point; the local
/// coordinates are then empty.
#[derive(Clone, Debug, PartialEq)]
pub struct LocatedPoint {
    pub element_index: Option<usize>,
    pub local_coordinates: DVector<f64>,
}

impl LocatedPoint {
    pub fn new(element_index: usize, local_coordinates: DVector<f64>) -> Self {
        Self {
            element_index: Some(element_index),
            local_coordinates,
        }
    }

    /// The "not found" result
    pub fn outside() -> Self {
        Self {
            element_index: None,
            local_coordinates: DVector::zeros(0),
        }
    }

    pub fn is_found(&self) -> bool {
        self.element_index.is_some()
    }
}
