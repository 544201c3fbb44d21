use crate::domain::{bounding_box::BoundingBox, element::ElementShape, Domain};

use nalgebra::DVector;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Upper bound on the number of grid cells along one axis
pub const MAX_CELLS_PER_AXIS: usize = 512;

// axes thinner than this fraction of the bounds' diagonal are treated as flat
const FLAT_AXIS_TOLERANCE: f64 = 1e-6;

type GridIndex = SmallVec<[usize; 3]>;

/// Uniform grid over the bounding box of a [`Domain`]
///
/// Proposes the candidate elements which may contain a point.
///
/// Every element is binned into each grid cell its (slightly inflated) bounding box overlaps. For
/// elements whose node bounding box contains the whole element (true for all built-in linear
/// shapes) a point's cell therefore always lists the element(s) containing it.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    bounds: BoundingBox,
    resolution: GridIndex,
    cells: Vec<Vec<usize>>,
    element_bounds: Vec<BoundingBox>,
    element_centers: Vec<DVector<f64>>,
}

impl SpatialIndex {
    /// Build the index over every element of `domain`
    ///
    /// * `cells_per_element`: target ratio between grid cells and elements
    /// * `relative_margin`: element boxes are inflated by this fraction of their diagonal, so that
    ///     points lying on (or numerically just off) an element boundary are not pruned
    pub fn new<S: ElementShape>(
        domain: &Domain<S>,
        cells_per_element: f64,
        relative_margin: f64,
    ) -> Self {
        let dim = domain.mesh().dimension();
        let mut bounds = BoundingBox {
            min: DVector::from_element(dim, f64::INFINITY),
            max: DVector::from_element(dim, f64::NEG_INFINITY),
        };

        let (element_bounds, element_centers): (Vec<_>, Vec<_>) = domain
            .elements()
            .map(|element| {
                let bb = element.bounding_box();
                let bb = bb.inflated(relative_margin * bb.diagonal().max(f64::MIN_POSITIVE));
                (bb, element.center())
            })
            .unzip();

        for bb in element_bounds.iter() {
            bounds = bounds.merged(bb);
        }

        let resolution = grid_resolution(&bounds, element_bounds.len(), cells_per_element);
        let number_of_cells = resolution.iter().product::<usize>();

        let mut index = Self {
            bounds,
            resolution,
            cells: vec![Vec::new(); number_of_cells],
            element_bounds,
            element_centers,
        };

        for element_id in 0..index.element_bounds.len() {
            let lo = index.cell_coordinates(&index.element_bounds[element_id].min);
            let hi = index.cell_coordinates(&index.element_bounds[element_id].max);
            for cell in CellRange::new(&lo, &hi) {
                let flat = index.flat_index(&cell);
                index.cells[flat].push(element_id);
            }
        }

        log::debug!(
            "Built spatial index over {} {} elements of Domain '{}' with grid resolution {:?}",
            index.element_bounds.len(),
            S::NAME,
            domain.name(),
            index.resolution.as_slice(),
        );

        index
    }

    /// Elements which may contain `point`, ordered by increasing distance from their centers
    ///
    /// Ties are broken by element index. The list is empty when `point` is outside the (inflated)
    /// bounds of the whole Domain.
    pub fn candidates(&self, point: &DVector<f64>) -> Vec<usize> {
        if !self.bounds.contains(point) {
            return Vec::new();
        }

        let cell = self.cell_coordinates(point);
        let mut candidates: Vec<(f64, usize)> = self.cells[self.flat_index(&cell)]
            .iter()
            .filter(|id| self.element_bounds[**id].contains(point))
            .map(|id| ((&self.element_centers[*id] - point).norm_squared(), *id))
            .collect();

        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        candidates.drain(..).map(|(_, id)| id).collect()
    }

    /// Bounds of the whole indexed Domain (inflated)
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Number of grid cells along each axis
    pub fn resolution(&self) -> &[usize] {
        &self.resolution
    }

    pub fn number_of_elements(&self) -> usize {
        self.element_bounds.len()
    }

    fn cell_coordinates(&self, point: &DVector<f64>) -> GridIndex {
        self.resolution
            .iter()
            .enumerate()
            .map(|(axis, n)| {
                let extent = self.bounds.extent(axis);
                if *n <= 1 || extent <= 0.0 {
                    0
                } else {
                    let t = (point[axis] - self.bounds.min[axis]) / extent;
                    ((t * *n as f64).floor().max(0.0) as usize).min(n - 1)
                }
            })
            .collect()
    }

    fn flat_index(&self, cell: &[usize]) -> usize {
        cell.iter()
            .zip(self.resolution.iter())
            .rev()
            .fold(0, |acc, (c, n)| acc * n + c)
    }
}

// Split `target_cells` among the axes in proportion to the extent of the box, so cells are
// roughly cubic. Degenerate (flat) axes get a single cell.
fn grid_resolution(
    bounds: &BoundingBox,
    number_of_elements: usize,
    cells_per_element: f64,
) -> GridIndex {
    let dim = bounds.dimension();
    if number_of_elements == 0 || bounds.is_empty() {
        return SmallVec::from_elem(1, dim);
    }

    let scale = bounds.diagonal();
    let active: Vec<usize> = (0..dim)
        .filter(|axis| bounds.extent(*axis) > FLAT_AXIS_TOLERANCE * scale)
        .collect();
    if active.is_empty() {
        return SmallVec::from_elem(1, dim);
    }

    let target_cells = (number_of_elements as f64 * cells_per_element).max(1.0);
    let volume: f64 = active.iter().map(|axis| bounds.extent(*axis)).product();
    let cell_size = (volume / target_cells).powf(1.0 / active.len() as f64);

    (0..dim)
        .map(|axis| {
            if active.contains(&axis) {
                ((bounds.extent(axis) / cell_size).round() as usize).clamp(1, MAX_CELLS_PER_AXIS)
            } else {
                1
            }
        })
        .collect()
}

// Iterator over every grid cell in the closed range [lo, hi] (first axis fastest)
struct CellRange {
    lo: GridIndex,
    hi: GridIndex,
    next: Option<GridIndex>,
}

impl CellRange {
    fn new(lo: &[usize], hi: &[usize]) -> Self {
        Self {
            lo: SmallVec::from_slice(lo),
            hi: SmallVec::from_slice(hi),
            next: Some(SmallVec::from_slice(lo)),
        }
    }
}

impl Iterator for CellRange {
    type Item = GridIndex;

    fn next(&mut self) -> Option<GridIndex> {
        let current = self.next.take()?;

        let mut following = current.clone();
        for axis in 0..following.len() {
            if following[axis] < self.hi[axis] {
                following[axis] += 1;
                self.next = Some(following);
                break;
            }
            following[axis] = self.lo[axis];
        }

        Some(current)
    }
}
