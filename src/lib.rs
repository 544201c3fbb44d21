//! Point location and field transfer between Finite Element Meshes.
//!
//! A [`BarycentricContainer`] is built over a [`Domain`] of elements of one [`ElementShape`]. It
//! finds which element contains an arbitrary point, and the point's parametric coordinates within
//! that element, by inverting the element's isoparametric mapping with Newton's method. The nodes
//! of other ("embedded") Meshes can be registered with the container once, after which nodal
//! fields defined over the container's Mesh are interpolated onto them.
//!
//! ```
//! use fem_barycentric::{BarycentricContainer, Domain, Mesh, Quad};
//!
//! // two unit squares side by side
//! let container_mesh = Mesh::from_points(&[
//!     [0.0, 0.0], [1.0, 0.0], [2.0, 0.0],
//!     [0.0, 1.0], [1.0, 1.0], [2.0, 1.0],
//! ]);
//! let quads = [[0, 1, 4, 3], [1, 2, 5, 4]];
//! let domain = Domain::<Quad>::new(&container_mesh, "container", &quads).unwrap();
//! let mut container = BarycentricContainer::new(&domain).unwrap();
//!
//! let embedded = Mesh::from_points(&[[0.5, 0.5], [1.5, 0.25], [2.5, 0.5]]);
//! let outside = container.add_embedded_mesh(&embedded).unwrap();
//! assert_eq!(outside, vec![2]);
//!
//! // moving the container's node positions onto the embedded mesh reproduces its positions
//! let moved = container.interpolate_field(&embedded, container_mesh.positions()).unwrap();
//! assert!((moved[(1, 0)] - 1.5).abs() < 1e-12 && (moved[(1, 1)] - 0.25).abs() < 1e-12);
//! ```

/// Meshes, element shapes and the Domains built from them
pub mod domain;
/// Error type of the crate
pub mod error;
/// Point location within a container Domain
pub mod locate;

pub use domain::element::{Element, ElementShape};
pub use domain::mesh::{Mesh, MeshId};
pub use domain::shapes::{Hexahedron, Quad, Segment, Tetrahedron, Triangle};
pub use domain::Domain;
pub use error::{Error, Result};
pub use locate::container::{BarycentricContainer, ContainerSettings, OutsidePolicy};
pub use locate::correspondence::Correspondence;
pub use locate::newton::NewtonSettings;
pub use locate::LocatedPoint;
