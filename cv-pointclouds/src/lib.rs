//! Rust CV Point Clouds
//!
//! A [`PointCloud`] is an ordered set of 3d points with an optional color per point.
//! This crate contains the denoising steps used before fitting anything to a cloud
//! recovered from a depth image:
//!
//! * [`PointCloud::voxel_down_sample`] collapses every occupied cell of a regular grid into one point.
//! * [`PointCloud::remove_statistical_outliers`] drops points whose neighbors are unusually far away.
//!
//! Clouds and other plain geometry can be written out as ASCII PLY with [`PlyGeometry`].

mod error;
mod outlier;
mod ply;
mod voxel;

pub use error::*;
pub use ply::*;

use cv_core::nalgebra::{Point3, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An ordered collection of points. Colors are either absent or present for every point.
///
/// Colors are RGB with each channel in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
    colors: Vec<Vector3<f64>>,
}

impl PointCloud {
    /// Creates an empty cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cloud without colors.
    pub fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            colors: vec![],
        }
    }

    /// Creates a cloud with one color per point.
    pub fn from_colored_points(
        points: Vec<Point3<f64>>,
        colors: Vec<Vector3<f64>>,
    ) -> Result<Self, CloudError> {
        if points.len() != colors.len() {
            return Err(CloudError::ColorCountMismatch {
                points: points.len(),
                colors: colors.len(),
            });
        }
        Ok(Self { points, colors })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// The per-point colors, if the cloud has them.
    pub fn colors(&self) -> Option<&[Vector3<f64>]> {
        if self.has_colors() {
            Some(&self.colors)
        } else {
            None
        }
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Keeps only the points for which `keep` returns true, along with their colors.
    pub fn retain(&mut self, mut keep: impl FnMut(&Point3<f64>) -> bool) {
        let indices: Vec<usize> = (0..self.len())
            .filter(|&ix| keep(&self.points[ix]))
            .collect();
        *self = self.select(&indices);
    }

    /// Removes every point that is exactly `(0, 0, 0)`.
    ///
    /// Back-projecting a pixel with zero depth lands on the origin, so these points mark
    /// pixels that were masked out or invalid rather than a real surface.
    pub fn remove_origin_points(&mut self) {
        self.retain(|p| p.coords != Vector3::zeros());
    }

    /// Creates a new cloud from the points at `indices`, in that order.
    ///
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            points: indices.iter().map(|&ix| self.points[ix]).collect(),
            colors: if self.has_colors() {
                indices.iter().map(|&ix| self.colors[ix]).collect()
            } else {
                vec![]
            },
        }
    }

    /// The arithmetic mean of all point positions, or `None` for an empty cloud.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector3::zeros(), |sum, p| sum + p.coords);
        Some(Point3::from(sum / self.len() as f64))
    }

    /// Creates a copy of the cloud with every point mapped through `f`. Colors are kept.
    pub fn map_points(&self, f: impl FnMut(&Point3<f64>) -> Point3<f64>) -> Self {
        Self {
            points: self.points.iter().map(f).collect(),
            colors: self.colors.clone(),
        }
    }

    /// Sets every point to the same color.
    pub fn paint_uniform_color(&mut self, color: Vector3<f64>) {
        self.colors = vec![color; self.points.len()];
    }

    /// Index of the first point with a non-finite coordinate.
    fn first_non_finite(&self) -> Option<usize> {
        self.points
            .iter()
            .position(|p| p.iter().any(|c| !c.is_finite()))
    }
}

impl FromIterator<(Point3<f64>, Vector3<f64>)> for PointCloud {
    fn from_iter<I: IntoIterator<Item = (Point3<f64>, Vector3<f64>)>>(iter: I) -> Self {
        let (points, colors) = iter.into_iter().unzip();
        Self { points, colors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_points_are_removed_with_their_colors() {
        let mut cloud = PointCloud::from_colored_points(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ],
            vec![
                Vector3::new(0.1, 0.1, 0.1),
                Vector3::new(0.2, 0.2, 0.2),
                Vector3::new(0.3, 0.3, 0.3),
                Vector3::new(0.4, 0.4, 0.4),
            ],
        )
        .unwrap();
        cloud.remove_origin_points();
        assert_eq!(
            cloud.points(),
            &[Point3::new(0.0, 0.0, 1.0), Point3::new(1.0, 0.0, 0.0)]
        );
        assert_eq!(
            cloud.colors().unwrap(),
            &[Vector3::new(0.2, 0.2, 0.2), Vector3::new(0.4, 0.4, 0.4)]
        );
    }

    #[test]
    fn mismatched_colors_are_rejected() {
        let result =
            PointCloud::from_colored_points(vec![Point3::origin()], vec![Vector3::zeros(); 2]);
        assert!(matches!(
            result,
            Err(CloudError::ColorCountMismatch {
                points: 1,
                colors: 2
            })
        ));
    }

    #[test]
    fn collects_colored_points() {
        let cloud: PointCloud = (0..3)
            .map(|i| (Point3::new(i as f64, 0.0, 1.0), Vector3::repeat(0.5)))
            .collect();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.colors().unwrap().len(), 3);
    }

    #[test]
    fn centroid_is_mean() {
        let cloud = PointCloud::from_points(vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(3.0, 2.0, 1.0),
        ]);
        assert_eq!(cloud.centroid(), Some(Point3::new(2.0, 2.0, 2.0)));
        assert_eq!(PointCloud::new().centroid(), None);
    }

    #[test]
    fn uncolored_cloud_reports_no_colors() {
        let mut cloud = PointCloud::from_points(vec![Point3::new(1.0, 1.0, 1.0)]);
        assert!(cloud.colors().is_none());
        cloud.paint_uniform_color(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(cloud.colors().unwrap(), &[Vector3::new(1.0, 0.0, 0.0)]);
    }
}
