use crate::domain::element::{Element, ElementShape};
use crate::error::{Error, Result};

use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Default residual tolerance of the inversion
///
/// It is relative to the element size, see [`NewtonSettings`].
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-10;
/// Default cap on the number of Newton iterations per candidate element
pub const DEFAULT_MAX_ITERATIONS: usize = 20;
/// Default slack admitted across the boundary of the reference element
pub const DEFAULT_INSIDE_TOLERANCE: f64 = 1e-8;

// Jacobians whose smallest singular value (or |det| against the Hadamard bound) falls below this
// fraction of their scale are treated as singular
const SINGULAR_TOLERANCE: f64 = 1e-12;

// Multiple of the machine epsilon times the largest node coordinate that a residual cannot get
// below when the element sits far from the origin
const ROUNDOFF_FACTOR: f64 = 64.0;

/// Parameters of the inverse mapping solver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSettings {
    /// Convergence threshold on the norm of `point - F(local)`
    ///
    /// It is scaled by the element's bounding box diagonal when that is larger than one. A
    /// round-off floor proportional to the largest node coordinate is added on top.
    pub residual_tolerance: f64,
    /// Iteration cap; reaching it without convergence yields [`Inversion::Diverged`]
    pub max_iterations: usize,
    /// Parametric slack used when classifying a converged point as inside the element
    pub inside_tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            residual_tolerance: DEFAULT_RESIDUAL_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            inside_tolerance: DEFAULT_INSIDE_TOLERANCE,
        }
    }
}

impl NewtonSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.residual_tolerance > 0.0 && self.residual_tolerance.is_finite()) {
            return Err(Error::InvalidSettings(format!(
                "residual tolerance must be positive and finite (got {})",
                self.residual_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidSettings(String::from(
                "at least one Newton iteration is required",
            )));
        }
        if !(self.inside_tolerance >= 0.0 && self.inside_tolerance.is_finite()) {
            return Err(Error::InvalidSettings(format!(
                "inside tolerance must be non-negative and finite (got {})",
                self.inside_tolerance
            )));
        }
        Ok(())
    }
}

/// Why an inversion was abandoned
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Divergence {
    SingularJacobian,
    IterationLimit,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingularJacobian => write!(f, "singular Jacobian"),
            Self::IterationLimit => write!(f, "iteration limit reached"),
        }
    }
}

/// Result of inverting the parametric mapping of one element at one point
#[derive(Clone, Debug, PartialEq)]
pub enum Inversion {
    /// Converged inside the reference element
    Inside(DVector<f64>),
    /// Converged, but on the extension of the mapping beyond the reference element (or, for
    /// elements of lower dimension than the Real Space, to the closest point of the mapped surface)
    Outside(DVector<f64>),
    Diverged(Divergence),
}

impl Inversion {
    pub fn is_inside(&self) -> bool {
        matches!(self, Self::Inside(_))
    }

    /// Local coordinates of an interior hit
    pub fn inside(self) -> Option<DVector<f64>> {
        match self {
            Self::Inside(local) => Some(local),
            _ => None,
        }
    }
}

/// Find the parametric coordinates of `point` within `element` by Newton iteration
///
/// The iteration starts from the reference center. Square Jacobians are solved by LU
/// decomposition; elements embedded in a higher dimensional Real Space use the least-squares
/// (pseudo-inverse) correction, so a point off the mapped surface converges to its projection and
/// is reported as [`Inversion::Outside`].
///
/// ```
/// use fem_barycentric::domain::element::Element;
/// use fem_barycentric::locate::newton::{invert, NewtonSettings};
/// use fem_barycentric::Quad;
/// use nalgebra::{DMatrix, DVector};
///
/// let element: Element<Quad> = Element::new(0, DMatrix::from_row_slice(4, 2, &[
///     0.0, 0.0,
///     2.0, 0.0,
///     2.0, 2.0,
///     0.0, 2.0,
/// ]));
///
/// let local = invert(&element, &DVector::from_vec(vec![1.5, 0.5]), &NewtonSettings::default())
///     .inside()
///     .unwrap();
/// assert!((local[0] - 0.5).abs() < 1e-12 && (local[1] + 0.5).abs() < 1e-12);
/// ```
pub fn invert<S: ElementShape>(
    element: &Element<S>,
    point: &DVector<f64>,
    settings: &NewtonSettings,
) -> Inversion {
    let tolerance = residual_tolerance(element, settings);
    let square = S::CANONICAL_DIMENSION == element.world_dimension();
    let classify = |local: DVector<f64>| {
        if S::contains_local(&local, settings.inside_tolerance) {
            Inversion::Inside(local)
        } else {
            Inversion::Outside(local)
        }
    };

    let mut local = S::canonical_center();
    for _ in 0..settings.max_iterations {
        let residual = point - element.world_coordinates(&local);
        if residual.norm() <= tolerance {
            // one last correction takes a converging iterate down to round-off
            if let Some(step) = newton_step(element.jacobian(&local), &residual) {
                local += step;
            }
            return classify(local);
        }

        let step = match newton_step(element.jacobian(&local), &residual) {
            Some(step) => step,
            None => return diverged(element, Divergence::SingularJacobian),
        };
        local += &step;

        if !local.iter().all(|x| x.is_finite()) {
            break;
        }

        // stalled: either converged on the last step, or stuck at the closest point of a surface
        if step.norm() <= settings.residual_tolerance {
            let residual = point - element.world_coordinates(&local);
            return if square || residual.norm() <= tolerance {
                classify(local)
            } else {
                Inversion::Outside(local)
            };
        }
    }

    diverged(element, Divergence::IterationLimit)
}

// Absolute residual threshold for one element
fn residual_tolerance<S: ElementShape>(element: &Element<S>, settings: &NewtonSettings) -> f64 {
    let size = element.bounding_box().diagonal().max(1.0);
    let roundoff = ROUNDOFF_FACTOR * f64::EPSILON * element.nodes().amax();
    settings.residual_tolerance * size + roundoff
}

fn diverged<S: ElementShape>(element: &Element<S>, reason: Divergence) -> Inversion {
    log::trace!("Inversion of {} {} abandoned: {}", S::NAME, element.id(), reason);
    Inversion::Diverged(reason)
}

// Solve J * step = residual (in the least-squares sense when J is not square)
fn newton_step(jacobian: DMatrix<f64>, residual: &DVector<f64>) -> Option<DVector<f64>> {
    if jacobian.is_square() {
        let hadamard_bound: f64 = jacobian.column_iter().map(|c| c.norm()).product();
        let lu = jacobian.lu();
        if lu.determinant().abs() <= SINGULAR_TOLERANCE * hadamard_bound {
            return None;
        }
        lu.solve(residual)
    } else {
        let svd = jacobian.svd(true, true);
        let largest = svd.singular_values.max();
        if svd.singular_values.min() <= SINGULAR_TOLERANCE * largest {
            return None;
        }
        svd.solve(residual, 0.0).ok()
    }
}
