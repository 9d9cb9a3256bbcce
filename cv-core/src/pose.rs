use crate::{CameraPoint, Projective, WorldPoint};
use derive_more::{AsMut, AsRef, From, Into};
use nalgebra::{IsometryMatrix3, Matrix3, Matrix4, Point3, Rotation3, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This trait is implemented by the poses in this library:
///
/// * [`CameraToWorld`] - Transforms [`CameraPoint`] into [`WorldPoint`]
/// * [`WorldToCamera`] - Transforms [`WorldPoint`] into [`CameraPoint`]
///
/// Poses are stored as full homogeneous 4x4 matrices since renderers hand them out that way.
/// Nothing forces the matrix to be rigid, but [`Pose::rotate`] is only meaningful when it is.
pub trait Pose: From<Matrix4<f64>> + Clone + Copy {
    type InputPoint: Projective;
    type OutputPoint: Projective;
    type Inverse: Pose;

    /// Retrieve the homogeneous matrix.
    fn homogeneous(self) -> Matrix4<f64>;

    /// Creates a pose with no change in position or orientation.
    fn identity() -> Self {
        Matrix4::identity().into()
    }

    /// Creates the pose from 16 elements in row-major order.
    fn from_row_slice(elements: &[f64; 16]) -> Self {
        Matrix4::from_row_slice(elements).into()
    }

    /// Create the pose from rotation and translation.
    fn from_parts(translation: Vector3<f64>, rotation: Rotation3<f64>) -> Self {
        IsometryMatrix3::from_parts(translation.into(), rotation)
            .to_homogeneous()
            .into()
    }

    /// Takes the inverse of the pose.
    ///
    /// Returns `None` when the matrix is singular or the inverse is not finite.
    fn inverse(self) -> Option<Self::Inverse> {
        let matrix = self.homogeneous();
        let determinant = matrix.determinant();
        if !determinant.is_finite() || (-f64::EPSILON..=f64::EPSILON).contains(&determinant) {
            return None;
        }
        matrix
            .try_inverse()
            .filter(|inverse| inverse.iter().all(|n| n.is_finite()))
            .map(Into::into)
    }

    /// The upper-left 3x3 block of the matrix.
    fn rotation_block(self) -> Matrix3<f64> {
        self.homogeneous().fixed_slice::<3, 3>(0, 0).into_owned()
    }

    /// Re-expresses an orientation in the output frame by left-multiplying the rotation block.
    ///
    /// Only valid for rigid transforms: a scaled or sheared matrix produces a matrix that is not a rotation.
    fn rotate(self, orientation: &Matrix3<f64>) -> Matrix3<f64> {
        self.rotation_block() * orientation
    }

    /// Transform the given point to an output point.
    fn transform(self, input: Self::InputPoint) -> Self::OutputPoint {
        Projective::from_homogeneous(self.homogeneous() * input.homogeneous())
    }

    /// Appends `1.0` to the point, multiplies it by the matrix and keeps the first three components.
    fn transform_point(self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from((self.homogeneous() * point.to_homogeneous()).xyz())
    }
}

/// This contains a world pose, which is a pose of the world relative to the camera.
/// This maps [`WorldPoint`] into [`CameraPoint`], changing an absolute position into
/// a vector relative to the camera. A renderer's view matrix is one of these.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WorldToCamera(pub Matrix4<f64>);

impl WorldToCamera {
    /// Creates the pose from a row-major view matrix.
    pub fn from_view_matrix(elements: &[f64; 16]) -> Self {
        Self::from_row_slice(elements)
    }
}

impl Pose for WorldToCamera {
    type InputPoint = WorldPoint;
    type OutputPoint = CameraPoint;
    type Inverse = CameraToWorld;

    #[inline(always)]
    fn homogeneous(self) -> Matrix4<f64> {
        self.into()
    }
}

/// This contains a camera pose, which is a pose of the camera relative to the world.
/// This transforms camera points (with depth as `z`) into world coordinates.
/// This also tells you where the camera is located and oriented in the world.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraToWorld(pub Matrix4<f64>);

impl Pose for CameraToWorld {
    type InputPoint = CameraPoint;
    type OutputPoint = WorldPoint;
    type Inverse = WorldToCamera;

    #[inline(always)]
    fn homogeneous(self) -> Matrix4<f64> {
        self.into()
    }
}
