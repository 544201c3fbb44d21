use crate::domain::mesh::MeshId;

/// Misuse of the point location API.
///
/// A point with no containing element is *not* an error; it is reported through
/// [`LocatedPoint::element_index`](crate::LocatedPoint) being `None`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Mesh {mesh} was never registered with the container; call add_embedded_mesh first!")]
    UnregisteredMesh { mesh: MeshId },
    #[error("Node {node} does not exist; the mesh only has {number_of_nodes} nodes!")]
    NodeOutOfRange { node: usize, number_of_nodes: usize },
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Element {element} does not exist; the domain has {number_of_elements} elements!")]
    ElementOutOfRange {
        element: usize,
        number_of_elements: usize,
    },
    #[error(
        "Element {element} refers to node {node}, but the mesh only has {number_of_nodes} nodes!"
    )]
    InvalidConnectivity {
        element: usize,
        node: usize,
        number_of_nodes: usize,
    },
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn check_dimension(what: &'static str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::DimensionMismatch {
                what,
                expected,
                found,
            })
        }
    }
}
