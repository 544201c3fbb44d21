use super::bounding_box::BoundingBox;

use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::marker::PhantomData;

/// A quadrature point in parametric space
#[derive(Clone, Debug, PartialEq)]
pub struct GaussNode {
    pub position: DVector<f64>,
    pub weight: f64,
}

/// Geometric description of one kind of Finite Element in Parametric Space
///
/// Implementors define the shape functions used both to map parametric (local) coordinates into
/// Real Space and to interpolate nodal fields, so the two are always consistent.
///
/// All methods take parametric coordinates of length [`ElementShape::CANONICAL_DIMENSION`].
/// Shape derivative tables are laid out with one row per node and one column per parametric
/// direction.
pub trait ElementShape: Copy + Default + Send + Sync + fmt::Debug + 'static {
    /// Human readable name of the shape
    const NAME: &'static str;
    /// Dimension of the parametric space
    const CANONICAL_DIMENSION: usize;
    /// Number of nodes (and shape functions)
    const NUMBER_OF_NODES: usize;

    /// Values of every shape function at `local`
    fn shape_values(local: &DVector<f64>) -> DVector<f64>;

    /// Derivatives of every shape function with respect to the parametric coordinates at `local`
    fn shape_derivatives(local: &DVector<f64>) -> DMatrix<f64>;

    /// Parametric coordinates of the nodes (one row per node)
    fn canonical_nodes() -> DMatrix<f64>;

    /// Parametric coordinates of the center of the reference element
    fn canonical_center() -> DVector<f64>;

    /// Is `local` inside the reference element
    ///
    /// A slack of `tolerance` is admitted across the boundary.
    fn contains_local(local: &DVector<f64>, tolerance: f64) -> bool;

    /// Quadrature points of the reference element
    fn gauss_nodes() -> Vec<GaussNode>;
}

/// A Finite Element in Real Space: an [`ElementShape`] together with the positions of its nodes
///
/// `Element`s provide the mapping between Parametric and Real Space.
#[derive(Clone, Debug, PartialEq)]
pub struct Element<S: ElementShape> {
    id: usize,
    nodes: DMatrix<f64>,
    shape: PhantomData<S>,
}

impl<S: ElementShape> Element<S> {
    /// Create an Element from its node positions (one row per node)
    pub fn new(id: usize, nodes: DMatrix<f64>) -> Self {
        assert_eq!(
            nodes.nrows(),
            S::NUMBER_OF_NODES,
            "A {} needs {} nodes; cannot construct Element {} from {}!",
            S::NAME,
            S::NUMBER_OF_NODES,
            id,
            nodes.nrows(),
        );
        Self {
            id,
            nodes,
            shape: PhantomData,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Node positions (one row per node)
    pub fn nodes(&self) -> &DMatrix<f64> {
        &self.nodes
    }

    /// Dimension of the Real Space the Element is embedded in
    pub fn world_dimension(&self) -> usize {
        self.nodes.ncols()
    }

    /// Map parametric coordinates into Real Space
    pub fn world_coordinates(&self, local: &DVector<f64>) -> DVector<f64> {
        self.nodes.tr_mul(&S::shape_values(local))
    }

    /// Jacobian of the parametric to Real Space mapping at `local`
    ///
    /// The matrix has `world_dimension` rows and `CANONICAL_DIMENSION` columns.
    pub fn jacobian(&self, local: &DVector<f64>) -> DMatrix<f64> {
        self.nodes.tr_mul(&S::shape_derivatives(local))
    }

    /// Center of the Element in Real Space
    pub fn center(&self) -> DVector<f64> {
        self.world_coordinates(&S::canonical_center())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_rows(&self.nodes)
    }

    /// Quadrature points of the Element (parametric positions)
    pub fn gauss_nodes(&self) -> Vec<GaussNode> {
        S::gauss_nodes()
    }
}
