use cv_core::nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use float_ord::FloatOrd;
use thiserror::Error;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Reasons an [`OrientedBoundingBox`] could not be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ObbError {
    #[error("need at least {minimum} points to fit a box, got {points}")]
    TooFewPoints { points: usize, minimum: usize },
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),
    #[error("symmetric eigen decomposition of the covariance did not converge")]
    EigenDecompositionFailed,
    #[error("point set is degenerate (smallest spread {smallest} against largest {largest})")]
    Degenerate { smallest: f64, largest: f64 },
}

/// A box with a center, an orientation and a full edge length along each of its local axes.
///
/// The columns of `rotation` are the local axes expressed in the frame of the points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct OrientedBoundingBox {
    pub center: Point3<f64>,
    pub rotation: Rotation3<f64>,
    pub extent: Vector3<f64>,
}

impl OrientedBoundingBox {
    pub fn new(center: Point3<f64>, rotation: Rotation3<f64>, extent: Vector3<f64>) -> Self {
        Self {
            center,
            rotation,
            extent,
        }
    }

    pub fn volume(&self) -> f64 {
        self.extent.product()
    }

    /// The eight corners of the box.
    ///
    /// Corner `i` takes the positive half extent along local axis `j` when bit `j` of `i` is set.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let half = self.extent * 0.5;
        [0usize, 1, 2, 3, 4, 5, 6, 7].map(|i| {
            let sign = |bit: usize| if i & (1 << bit) != 0 { 1.0 } else { -1.0 };
            let local = Vector3::new(sign(0) * half.x, sign(1) * half.y, sign(2) * half.z);
            self.center + self.rotation * local
        })
    }

    /// Checks if the point lies inside the box or on its boundary, with `epsilon` of slack.
    pub fn contains(&self, point: &Point3<f64>, epsilon: f64) -> bool {
        let local = self.rotation.inverse() * (point - self.center);
        local
            .iter()
            .zip(self.extent.iter())
            .all(|(&c, &e)| c.abs() <= 0.5 * e + epsilon)
    }
}

/// Fits an [`OrientedBoundingBox`] along the principal axes of a point set.
///
/// The axes are the eigenvectors of the covariance of the points, sorted by decreasing
/// eigenvalue and made right-handed. The extents come from the range of the points
/// projected onto each axis, so every point lies inside the box.
///
/// Point sets that are (nearly) planar or linear are rejected, since their box has no
/// well-defined orientation about the collapsed axes.
///
/// ```
/// use cv_core::nalgebra::{Point3, Vector3};
/// use cv_geom::PrincipalAxisBoxFitter;
///
/// let points: Vec<_> = (0..8)
///     .map(|i| Point3::new((i & 1) as f64 * 4.0, (i >> 1 & 1) as f64 * 2.0, (i >> 2 & 1) as f64))
///     .collect();
/// let obb = PrincipalAxisBoxFitter::new().fit(&points).unwrap();
/// assert!((obb.volume() - 8.0).abs() < 1e-9);
/// assert!((obb.center - Point3::new(2.0, 1.0, 0.5)).norm() < 1e-9);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct PrincipalAxisBoxFitter {
    epsilon: f64,
    max_iterations: usize,
    planarity_epsilon: f64,
}

impl PrincipalAxisBoxFitter {
    /// Creates a `PrincipalAxisBoxFitter` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the symmetric eigen solver.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations for the symmetric eigen solver.
    ///
    /// Default is `1000`.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Set the ratio of smallest to largest covariance eigenvalue below which a point set is degenerate.
    ///
    /// Default is `1e-9`.
    #[must_use]
    pub fn planarity_epsilon(self, planarity_epsilon: f64) -> Self {
        Self {
            planarity_epsilon,
            ..self
        }
    }

    pub fn fit(&self, points: &[Point3<f64>]) -> Result<OrientedBoundingBox, ObbError> {
        const MINIMUM_POINTS: usize = 4;
        if points.len() < MINIMUM_POINTS {
            return Err(ObbError::TooFewPoints {
                points: points.len(),
                minimum: MINIMUM_POINTS,
            });
        }
        if let Some(ix) = points.iter().position(|p| p.iter().any(|c| !c.is_finite())) {
            return Err(ObbError::NonFinitePoint(ix));
        }

        let n = points.len() as f64;
        let mean = points.iter().fold(Vector3::zeros(), |sum, p| sum + p.coords) / n;
        let covariance = points.iter().fold(Matrix3::zeros(), |sum, p| {
            let d = p.coords - mean;
            sum + d * d.transpose()
        }) / n;

        let eigen = covariance
            .try_symmetric_eigen(self.epsilon, self.max_iterations)
            .ok_or(ObbError::EigenDecompositionFailed)?;

        let mut order = [0usize, 1, 2];
        order.sort_unstable_by_key(|&ix| FloatOrd(-eigen.eigenvalues[ix]));
        let largest = eigen.eigenvalues[order[0]];
        let smallest = eigen.eigenvalues[order[2]];
        if !(largest > 0.0) || smallest <= self.planarity_epsilon * largest {
            return Err(ObbError::Degenerate { smallest, largest });
        }

        let primary = eigen.eigenvectors.column(order[0]).normalize();
        let secondary = eigen.eigenvectors.column(order[1]).normalize();
        let tertiary = primary.cross(&secondary);
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            primary, secondary, tertiary,
        ]));

        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);
        for p in points {
            let local = rotation.inverse() * (p.coords - mean);
            min = min.inf(&local);
            max = max.sup(&local);
        }

        Ok(OrientedBoundingBox {
            center: Point3::from(mean + rotation * ((min + max) * 0.5)),
            rotation,
            extent: max - min,
        })
    }
}

impl Default for PrincipalAxisBoxFitter {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 1000,
            planarity_epsilon: 1e-9,
        }
    }
}
