use nalgebra::{DMatrix, DVector};

/// Axis aligned box in Real Space
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: DVector<f64>,
    pub max: DVector<f64>,
}

impl BoundingBox {
    /// Smallest box containing every row of `points`
    ///
    /// An empty table yields an inverted box (`min > max`) that contains nothing
    pub fn from_rows(points: &DMatrix<f64>) -> Self {
        let dim = points.ncols();
        let mut bb = Self {
            min: DVector::from_element(dim, f64::INFINITY),
            max: DVector::from_element(dim, f64::NEG_INFINITY),
        };
        for row in points.row_iter() {
            for (axis, x) in row.iter().enumerate() {
                bb.min[axis] = bb.min[axis].min(*x);
                bb.max[axis] = bb.max[axis].max(*x);
            }
        }
        bb
    }

    pub fn dimension(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
    }

    pub fn extent(&self, axis: usize) -> f64 {
        (self.max[axis] - self.min[axis]).max(0.0)
    }

    /// Length of the main diagonal
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            (&self.max - &self.min).norm()
        }
    }

    /// Grow the box by `margin` in every direction
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            min: self.min.add_scalar(-margin),
            max: self.max.add_scalar(margin),
        }
    }

    /// Smallest box containing both `self` and `other`
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            min: self.min.zip_map(&other.min, f64::min),
            max: self.max.zip_map(&other.max, f64::max),
        }
    }

    /// Closed containment test (points on the faces are inside)
    pub fn contains(&self, point: &DVector<f64>) -> bool {
        point.len() == self.dimension()
            && point
                .iter()
                .zip(self.min.iter().zip(self.max.iter()))
                .all(|(x, (lo, hi))| x >= lo && x <= hi)
    }
}
