use cv_core::nalgebra::{Point3, Rotation3, Vector3};
use cv_geom::{ObbError, OrientedBoundingBox, PrincipalAxisBoxFitter};
use cv_pointclouds::PointCloud;

/// The camera-frame pose of one object.
///
/// The centroid is computed independently of the box so it is valid even when the box fit failed.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub bounding_box: Result<OrientedBoundingBox, ObbError>,
}

impl CameraPose {
    /// The box orientation, or the identity if the fit failed.
    pub fn orientation(&self) -> Rotation3<f64> {
        self.bounding_box
            .as_ref()
            .map(|obb| obb.rotation)
            .unwrap_or_else(|_| Rotation3::identity())
    }

    /// The box extents, absent if the fit failed.
    pub fn dimensions(&self) -> Option<Vector3<f64>> {
        self.bounding_box.as_ref().ok().map(|obb| obb.extent)
    }
}

/// Computes the centroid and fits an oriented box. Returns `None` only for an empty cloud.
pub fn estimate_pose(cloud: &PointCloud, fitter: &PrincipalAxisBoxFitter) -> Option<CameraPose> {
    let position = cloud.centroid()?;
    Some(CameraPose {
        position,
        bounding_box: fitter.fit(cloud.points()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use itertools::iproduct;

    #[test]
    fn box_pose_has_extents() {
        let points = iproduct!(0..5, 0..4, 0..3)
            .map(|(x, y, z)| Point3::new(x as f64 * 0.5, y as f64 * 0.25, 2.0 + z as f64 * 0.1))
            .collect();
        let pose = estimate_pose(
            &PointCloud::from_points(points),
            &PrincipalAxisBoxFitter::default(),
        )
        .unwrap();
        assert_relative_eq!(pose.position, Point3::new(1.0, 0.375, 2.1), epsilon = 1e-12);
        assert_relative_eq!(
            pose.dimensions().unwrap(),
            Vector3::new(2.0, 0.75, 0.2),
            epsilon = 1e-9
        );
        assert_relative_eq!(pose.orientation().matrix().determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn colinear_points_fall_back_to_identity() {
        let points = (0..12)
            .map(|i| Point3::new(i as f64 * 0.1, i as f64 * 0.2, 1.0 + i as f64 * 0.05))
            .collect();
        let pose = estimate_pose(
            &PointCloud::from_points(points),
            &PrincipalAxisBoxFitter::default(),
        )
        .unwrap();
        assert!(pose.bounding_box.is_err());
        assert_eq!(pose.orientation(), Rotation3::identity());
        assert_eq!(pose.dimensions(), None);
        assert_relative_eq!(pose.position, Point3::new(0.55, 1.1, 1.275), epsilon = 1e-12);
    }

    #[test]
    fn empty_cloud_has_no_pose() {
        assert!(estimate_pose(&PointCloud::new(), &PrincipalAxisBoxFitter::default()).is_none());
    }
}
