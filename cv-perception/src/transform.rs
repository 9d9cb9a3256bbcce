use crate::CameraPose;
use cv_core::nalgebra::{Matrix3, Point3, Rotation3, Vector3};
use cv_core::{CameraToWorld, Pose};
use cv_pointclouds::PointCloud;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The pose of one object in both the camera and the world frame.
///
/// `orientation_camera` is the identity and `dimensions` is `None` when no box could be fitted.
/// `orientation_world` is always derived from `orientation_camera`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObjectPoseRecord {
    pub object_id: i32,
    pub position_camera: Point3<f64>,
    pub orientation_camera: Rotation3<f64>,
    pub position_world: Point3<f64>,
    pub orientation_world: Matrix3<f64>,
    pub dimensions: Option<Vector3<f64>>,
}

impl ObjectPoseRecord {
    /// Moves a camera-frame pose into the world frame.
    ///
    /// The orientation is left-multiplied by the rotation block of `camera_to_world`,
    /// which only yields a rotation if that transform is rigid.
    pub fn from_camera_pose(object_id: i32, pose: &CameraPose, camera_to_world: CameraToWorld) -> Self {
        let orientation_camera = pose.orientation();
        Self {
            object_id,
            position_camera: pose.position,
            orientation_camera,
            position_world: camera_to_world.transform_point(&pose.position),
            orientation_world: camera_to_world.rotate(orientation_camera.matrix()),
            dimensions: pose.dimensions(),
        }
    }
}

/// Applies the same homogeneous transform to every point of a cloud, keeping its colors.
pub fn cloud_to_world(cloud: &PointCloud, camera_to_world: CameraToWorld) -> PointCloud {
    cloud.map_points(|point| camera_to_world.transform_point(point))
}
