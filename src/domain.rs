/// Axis aligned bounding boxes
pub mod bounding_box;
/// Mapping between Parametric and Real Space for one kind of element
pub mod element;
/// Evaluation of nodal fields at parametric coordinates
pub mod fields;
/// Gauss-Legendre quadrature rules
pub mod glq;
/// Node position tables
pub mod mesh;
/// Built-in element shapes
pub mod shapes;

use crate::error::{Error, Result};
use element::{Element, ElementShape};
use mesh::Mesh;

use nalgebra::DMatrix;
use smallvec::SmallVec;
use std::marker::PhantomData;

/// Node indices of one element; inline up to the size of a hexahedron
pub type ElementNodes = SmallVec<[usize; 8]>;

/// An ordered collection of elements of a single shape, defined over the nodes of a [`Mesh`]
///
/// The Domain borrows its Mesh; neither can be modified while the Domain is alive.
///
/// ```
/// use fem_barycentric::{Domain, Mesh, Quad};
///
/// //  2 ---- 3 ---- 5
/// //  |  0   |  1   |
/// //  0 ---- 1 ---- 4
/// let mesh = Mesh::from_points(&[[0., 0.], [1., 0.], [0., 1.], [1., 1.], [2., 0.], [2., 1.]]);
/// let domain = Domain::<Quad>::new(&mesh, "quads", &[[0, 1, 3, 2], [1, 4, 5, 3]]).unwrap();
///
/// assert_eq!(domain.number_of_elements(), 2);
/// assert_eq!(domain.element(1).center()[0], 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct Domain<'m, S: ElementShape> {
    mesh: &'m Mesh,
    name: String,
    connectivity: Vec<ElementNodes>,
    shape: PhantomData<S>,
}

impl<'m, S: ElementShape> Domain<'m, S> {
    /// Create a Domain from a list of element node index tuples
    ///
    /// Each tuple must have exactly [`ElementShape::NUMBER_OF_NODES`] entries, all referring to
    /// existing nodes of `mesh`, and the Mesh must have at least as many dimensions as the shape.
    pub fn new<E: AsRef<[usize]>>(
        mesh: &'m Mesh,
        name: impl AsRef<str>,
        elements: &[E],
    ) -> Result<Self> {
        if mesh.dimension() < S::CANONICAL_DIMENSION {
            return Err(Error::DimensionMismatch {
                what: "mesh dimension for element shape",
                expected: S::CANONICAL_DIMENSION,
                found: mesh.dimension(),
            });
        }

        let connectivity = elements
            .iter()
            .enumerate()
            .map(|(element, node_ids)| {
                let node_ids = node_ids.as_ref();
                Error::check_dimension("element node count", S::NUMBER_OF_NODES, node_ids.len())?;

                match node_ids.iter().find(|n| **n >= mesh.number_of_nodes()) {
                    Some(node) => Err(Error::InvalidConnectivity {
                        element,
                        node: *node,
                        number_of_nodes: mesh.number_of_nodes(),
                    }),
                    None => Ok(ElementNodes::from_slice(node_ids)),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mesh,
            name: String::from(name.as_ref()),
            connectivity,
            shape: PhantomData,
        })
    }

    /// Create a Domain from a flat list of node indices
    ///
    /// Every [`ElementShape::NUMBER_OF_NODES`] consecutive indices make up one element.
    pub fn from_flat_indices(
        mesh: &'m Mesh,
        name: impl AsRef<str>,
        indices: &[usize],
    ) -> Result<Self> {
        if indices.len() % S::NUMBER_OF_NODES != 0 {
            return Err(Error::DimensionMismatch {
                what: "flat connectivity length",
                expected: (indices.len() / S::NUMBER_OF_NODES + 1) * S::NUMBER_OF_NODES,
                found: indices.len(),
            });
        }
        let elements: Vec<&[usize]> = indices.chunks(S::NUMBER_OF_NODES).collect();
        Self::new(mesh, name, &elements)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    pub fn number_of_elements(&self) -> usize {
        self.connectivity.len()
    }

    /// Node indices of an element
    pub fn element_node_indices(&self, element: usize) -> &[usize] {
        &self.connectivity[element]
    }

    /// An element with its node positions gathered from the Mesh
    pub fn element(&self, element: usize) -> Element<S> {
        let node_ids = &self.connectivity[element];
        let positions = self.mesh.positions();
        Element::new(
            element,
            DMatrix::from_fn(S::NUMBER_OF_NODES, self.mesh.dimension(), |r, c| {
                positions[(node_ids[r], c)]
            }),
        )
    }

    /// Iterate over all elements of the Domain
    pub fn elements(&self) -> impl Iterator<Item = Element<S>> + '_ {
        (0..self.number_of_elements()).map(move |id| self.element(id))
    }
}
