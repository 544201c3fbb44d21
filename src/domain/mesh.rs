use crate::error::{Error, Result};

use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Largest world dimension a Mesh can be defined in
pub const MAX_WORLD_DIMENSION: usize = 3;

static NEXT_MESH_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identity of a [`Mesh`]
///
/// Correspondence caches are keyed by this identity rather than by mesh content, so two
/// meshes with identical positions are still registered separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(usize);

impl MeshId {
    fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A table of Node positions in Real Space
///
/// Positions are stored one Node per row, so the table can be used directly as a nodal field
/// (e.g. when interpolating the positions of one Mesh onto another).
///
/// ```
/// use fem_barycentric::Mesh;
///
/// let mesh = Mesh::from_points(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
/// assert_eq!(mesh.number_of_nodes(), 3);
/// assert_eq!(mesh.dimension(), 2);
/// assert_eq!(mesh.position(2)[1], 1.0);
/// ```
#[derive(Debug)]
pub struct Mesh {
    id: MeshId,
    positions: DMatrix<f64>,
}

impl Mesh {
    /// Construct a Mesh from a position table with one row per Node
    ///
    /// Fails if the table has more than [`MAX_WORLD_DIMENSION`] columns or no columns at all
    pub fn new(positions: DMatrix<f64>) -> Result<Self> {
        if positions.ncols() == 0 || positions.ncols() > MAX_WORLD_DIMENSION {
            return Err(Error::DimensionMismatch {
                what: "mesh world dimension",
                expected: MAX_WORLD_DIMENSION,
                found: positions.ncols(),
            });
        }

        Ok(Self {
            id: MeshId::next(),
            positions,
        })
    }

    /// Construct a Mesh from a list of fixed size points
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Self {
        assert!(
            D > 0 && D <= MAX_WORLD_DIMENSION,
            "Meshes must be defined in 1, 2 or 3 dimensions; cannot construct a {}D Mesh!",
            D
        );
        Self {
            id: MeshId::next(),
            positions: DMatrix::from_fn(points.len(), D, |r, c| points[r][c]),
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Dimension of the Real Space the Nodes live in
    pub fn dimension(&self) -> usize {
        self.positions.ncols()
    }

    pub fn number_of_nodes(&self) -> usize {
        self.positions.nrows()
    }

    /// Position of a Node (panics if `node` is out of range)
    pub fn position(&self, node: usize) -> DVector<f64> {
        self.positions.row(node).transpose()
    }

    /// Position of a Node, or an error if `node` is out of range
    pub fn try_position(&self, node: usize) -> Result<DVector<f64>> {
        if node < self.number_of_nodes() {
            Ok(self.position(node))
        } else {
            Err(Error::NodeOutOfRange {
                node,
                number_of_nodes: self.number_of_nodes(),
            })
        }
    }

    /// The full position table (one row per Node)
    pub fn positions(&self) -> &DMatrix<f64> {
        &self.positions
    }
}

// A cloned Mesh is a different Mesh: it gets its own identity
impl Clone for Mesh {
    fn clone(&self) -> Self {
        Self {
            id: MeshId::next(),
            positions: self.positions.clone(),
        }
    }
}
