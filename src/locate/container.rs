use super::correspondence::Correspondence;
use super::newton::{invert, Inversion, NewtonSettings};
use super::spatial_index::SpatialIndex;
use super::LocatedPoint;
use crate::domain::{
    element::ElementShape,
    fields,
    mesh::{Mesh, MeshId},
    Domain,
};
use crate::error::{Error, Result};

use nalgebra::{DMatrix, DVector, RowDVector};
use rayon::prelude::*;
use std::collections::HashMap;

// absolute floor added to the relative inflation of the element boxes in the spatial index
const INDEX_MARGIN: f64 = 1e-12;

/// What [`BarycentricContainer::interpolate_field`] writes for embedded nodes outside the container
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutsidePolicy {
    /// Write a row of zeros
    Zero,
    /// Leave the output row untouched
    Skip,
}

impl Default for OutsidePolicy {
    fn default() -> Self {
        Self::Zero
    }
}

/// Configuration of a [`BarycentricContainer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerSettings {
    pub newton: NewtonSettings,
    pub outside_policy: OutsidePolicy,
    /// Target ratio between spatial index grid cells and container elements
    pub cells_per_element: f64,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            newton: NewtonSettings::default(),
            outside_policy: OutsidePolicy::default(),
            cells_per_element: 1.0,
        }
    }
}

impl ContainerSettings {
    pub fn validate(&self) -> Result<()> {
        self.newton.validate()?;
        if !(self.cells_per_element > 0.0 && self.cells_per_element.is_finite()) {
            return Err(Error::InvalidSettings(format!(
                "cells per element must be positive and finite (got {})",
                self.cells_per_element
            )));
        }
        Ok(())
    }
}

/// Locates points within the elements of a container [`Domain`], and transfers nodal fields from
/// the container's Mesh onto embedded Meshes
///
/// The container borrows its Domain (and so its Mesh) for its whole lifetime; it owns only the
/// spatial index built at construction and the correspondences of registered embedded Meshes.
///
/// ```
/// use fem_barycentric::{BarycentricContainer, Domain, Mesh, Quad};
/// use nalgebra::DVector;
///
/// let container_mesh = Mesh::from_points(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
/// let domain = Domain::<Quad>::new(&container_mesh, "container", &[[0, 1, 2, 3]]).unwrap();
/// let mut container = BarycentricContainer::new(&domain).unwrap();
///
/// let located = container.locate(&DVector::from_vec(vec![1.5, 1.0])).unwrap();
/// assert_eq!(located.element_index, Some(0));
/// assert!((located.local_coordinates[0] - 0.5).abs() < 1e-12);
///
/// // transfer the x coordinate of the container nodes onto an embedded mesh
/// let embedded = Mesh::from_points(&[[0.5, 0.5], [3.0, 1.0]]);
/// assert_eq!(container.add_embedded_mesh(&embedded).unwrap(), vec![1]);
///
/// let x = container_mesh.positions().columns(0, 1).into_owned();
/// let field = container.interpolate_field(&embedded, &x).unwrap();
/// assert!((field[(0, 0)] - 0.5).abs() < 1e-12);
/// assert_eq!(field[(1, 0)], 0.0);
/// ```
#[derive(Debug)]
pub struct BarycentricContainer<'d, S: ElementShape> {
    domain: &'d Domain<'d, S>,
    settings: ContainerSettings,
    index: SpatialIndex,
    correspondences: HashMap<MeshId, Correspondence>,
}

impl<'d, S: ElementShape> BarycentricContainer<'d, S> {
    /// Build a container over `domain` with the default settings
    pub fn new(domain: &'d Domain<'d, S>) -> Result<Self> {
        Self::with_settings(domain, ContainerSettings::default())
    }

    pub fn with_settings(domain: &'d Domain<'d, S>, settings: ContainerSettings) -> Result<Self> {
        settings.validate()?;

        let index = SpatialIndex::new(
            domain,
            settings.cells_per_element,
            settings.newton.inside_tolerance + INDEX_MARGIN,
        );

        Ok(Self {
            domain,
            settings,
            index,
            correspondences: HashMap::new(),
        })
    }

    pub fn domain(&self) -> &'d Domain<'d, S> {
        self.domain
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Find the element containing `point` and the point's parametric coordinates within it
    ///
    /// Candidate elements are tried in the order proposed by the [`SpatialIndex`] (closest
    /// element center first, then lowest element index); the first one whose inversion lands
    /// inside its reference element wins. A point on a boundary shared by several elements is
    /// therefore attributed by that ordering, which carries no geometric meaning.
    ///
    /// A point outside every element is not an error: its `element_index` is `None`.
    pub fn locate(&self, point: &DVector<f64>) -> Result<LocatedPoint> {
        Error::check_dimension("point dimension", self.world_dimension(), point.len())?;
        Ok(self.find(point))
    }

    /// [`locate`](Self::locate) every row of `points` (in parallel); results are in row order
    pub fn locate_many(&self, points: &DMatrix<f64>) -> Result<Vec<LocatedPoint>> {
        Error::check_dimension("point dimension", self.world_dimension(), points.ncols())?;
        Ok((0..points.nrows())
            .into_par_iter()
            .map(|row| self.find(&points.row(row).transpose()))
            .collect())
    }

    /// Locate every node of `mesh` and cache the result under the Mesh's identity
    ///
    /// Returns the (ascending) indices of the nodes with no containing element. Registering the
    /// same Mesh again recomputes and replaces its correspondence.
    pub fn add_embedded_mesh(&mut self, mesh: &Mesh) -> Result<Vec<usize>> {
        Error::check_dimension(
            "embedded mesh dimension",
            self.world_dimension(),
            mesh.dimension(),
        )?;

        let correspondence = Correspondence::new(mesh.id(), self.locate_many(mesh.positions())?);
        let outside = correspondence.outside_nodes().to_vec();

        log::debug!(
            "Registered Mesh {} ({} nodes) with container '{}': {} nodes outside",
            mesh.id(),
            mesh.number_of_nodes(),
            self.domain.name(),
            outside.len(),
        );
        if !outside.is_empty() {
            log::warn!(
                "{} of {} nodes of Mesh {} are outside of container '{}'",
                outside.len(),
                mesh.number_of_nodes(),
                mesh.id(),
                self.domain.name(),
            );
        }

        if let Some(previous) = self.correspondences.insert(mesh.id(), correspondence) {
            if previous.number_of_nodes() != mesh.number_of_nodes() {
                log::warn!(
                    "Mesh {} was re-registered with {} nodes (previously {})",
                    mesh.id(),
                    mesh.number_of_nodes(),
                    previous.number_of_nodes(),
                );
            }
        }

        Ok(outside)
    }

    /// The cached located point of one node of a registered Mesh
    pub fn locate_node(&self, mesh: &Mesh, node: usize) -> Result<&LocatedPoint> {
        self.correspondence(mesh)?.located_point(node)
    }

    /// The cached correspondence of a registered Mesh
    pub fn correspondence(&self, mesh: &Mesh) -> Result<&Correspondence> {
        self.correspondences
            .get(&mesh.id())
            .ok_or(Error::UnregisteredMesh { mesh: mesh.id() })
    }

    /// Nodes of a registered Mesh with no containing element (ascending)
    pub fn outside_nodes(&self, mesh: &Mesh) -> Result<&[usize]> {
        Ok(self.correspondence(mesh)?.outside_nodes())
    }

    pub fn is_registered(&self, mesh: &Mesh) -> bool {
        self.correspondences.contains_key(&mesh.id())
    }

    /// Drop the cached correspondence of `mesh`; returns `false` if it was not registered
    ///
    /// This is the only invalidation: a Mesh whose positions change after registration must be
    /// removed (or registered again) by the caller.
    pub fn remove_embedded_mesh(&mut self, mesh: &Mesh) -> bool {
        self.correspondences.remove(&mesh.id()).is_some()
    }

    pub fn number_of_embedded_meshes(&self) -> usize {
        self.correspondences.len()
    }

    /// Interpolate a nodal field of the container Mesh onto the nodes of a registered Mesh
    ///
    /// `values` has one row per container node and any number of columns; the result has one row
    /// per embedded node and the same columns. Rows of nodes outside the container are zero.
    pub fn interpolate_field(&self, mesh: &Mesh, values: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        let mut output = DMatrix::zeros(mesh.number_of_nodes(), values.ncols());
        self.interpolate_field_into(mesh, values, &mut output)?;
        Ok(output)
    }

    /// Interpolate a nodal field of the container Mesh into an existing table over the nodes of a
    /// registered Mesh
    ///
    /// Rows of nodes outside the container are zeroed or left untouched according to the
    /// container's [`OutsidePolicy`].
    pub fn interpolate_field_into(
        &self,
        mesh: &Mesh,
        values: &DMatrix<f64>,
        output: &mut DMatrix<f64>,
    ) -> Result<()> {
        let correspondence = self.correspondence(mesh)?;
        self.check_values(values)?;
        Error::check_dimension(
            "output rows (embedded nodes)",
            mesh.number_of_nodes(),
            output.nrows(),
        )?;
        Error::check_dimension(
            "output columns (field components)",
            values.ncols(),
            output.ncols(),
        )?;
        Error::check_dimension(
            "embedded nodes since registration",
            correspondence.number_of_nodes(),
            mesh.number_of_nodes(),
        )?;

        let rows: Vec<Option<RowDVector<f64>>> = correspondence
            .located_points()
            .par_iter()
            .map(|lp| {
                lp.element_index.map(|element| {
                    fields::interpolate_row::<S>(
                        &lp.local_coordinates,
                        self.domain.element_node_indices(element),
                        values,
                    )
                })
            })
            .collect();

        for (node, row) in rows.iter().enumerate() {
            match (row, self.settings.outside_policy) {
                (Some(row), _) => output.set_row(node, row),
                (None, OutsidePolicy::Zero) => output.row_mut(node).fill(0.0),
                (None, OutsidePolicy::Skip) => (),
            }
        }

        Ok(())
    }

    /// Interpolate a nodal field of the container Mesh at a single located point
    ///
    /// Returns `None` for a point with no containing element.
    pub fn interpolate_at(
        &self,
        located: &LocatedPoint,
        values: &DMatrix<f64>,
    ) -> Result<Option<DVector<f64>>> {
        self.check_values(values)?;

        match located.element_index {
            None => Ok(None),
            Some(element) if element >= self.domain.number_of_elements() => {
                Err(Error::ElementOutOfRange {
                    element,
                    number_of_elements: self.domain.number_of_elements(),
                })
            }
            Some(element) => {
                Error::check_dimension(
                    "local coordinates",
                    S::CANONICAL_DIMENSION,
                    located.local_coordinates.len(),
                )?;
                Ok(Some(fields::interpolate::<S>(
                    &located.local_coordinates,
                    self.domain.element_node_indices(element),
                    values,
                )))
            }
        }
    }

    fn world_dimension(&self) -> usize {
        self.domain.mesh().dimension()
    }

    fn check_values(&self, values: &DMatrix<f64>) -> Result<()> {
        Error::check_dimension(
            "field rows (container nodes)",
            self.domain.mesh().number_of_nodes(),
            values.nrows(),
        )
    }

    fn find(&self, point: &DVector<f64>) -> LocatedPoint {
        self.index
            .candidates(point)
            .into_iter()
            .find_map(|candidate| {
                match invert(&self.domain.element(candidate), point, &self.settings.newton) {
                    Inversion::Inside(local) => Some(LocatedPoint::new(candidate, local)),
                    Inversion::Outside(_) | Inversion::Diverged(_) => None,
                }
            })
            .unwrap_or_else(LocatedPoint::outside)
    }
}
