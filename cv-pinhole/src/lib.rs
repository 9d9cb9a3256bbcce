//! This crate plugs into `cv-core` and provides the pinhole camera model used to turn
//! a pixel with a known depth back into a 3d [`CameraPoint`]. It can also be used to
//! convert backwards from the 3d back to the 2d using the `uncalibrate` method from the
//! [`cv_core::CameraModel`] trait.
//!
//! Renderers usually only hand out a projection matrix, so [`CameraIntrinsics`] can be
//! read straight out of one with [`CameraIntrinsics::from_projection_matrix`].

#![no_std]

use cv_core::nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2};
use cv_core::{CameraModel, CameraPoint, ImagePoint, KeyPoint, Projective};
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A point in normalized image coordinates. This keypoint has been
/// normalized based on the camera intrinsic matrix, so it lies on the
/// virtual image plane at a depth of `1.0` in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct NormalizedKeyPoint(pub Point2<f64>);

impl NormalizedKeyPoint {
    /// Tries to convert the [`CameraPoint`] into a [`NormalizedKeyPoint`], but it may fail
    /// in extreme conditions, in which case `None` is returned.
    pub fn from_camera_point(point: CameraPoint) -> Option<Self> {
        Point2::from_homogeneous(point.bearing_unnormalized()).map(Self)
    }

    /// Appends a `1.0` component to the normalized keypoint to create
    /// a point on the virtual image plane and then multiplies
    /// the point by `depth`. This `z`/`depth` component must be the depth of
    /// the keypoint in the direction the camera is pointing from the
    /// camera's optical center, which is what a depth image stores.
    ///
    /// The resulting [`CameraPoint`] is finite, with a homogeneous `w` of `1.0`.
    pub fn with_depth(self, depth: f64) -> CameraPoint {
        Point3::from(self.coords.push(1.0) * depth)
            .to_homogeneous()
            .into()
    }
}

/// This contains intrinsic camera parameters as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters)
/// together with the resolution of the images they apply to.
///
/// Simulated renderers have square, unskewed pixels, so the model has no skew term.
///
/// The focal lengths must be positive for the model to be usable. See [`CameraIntrinsics::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub width: u32,
    pub height: u32,
    pub focals: Vector2<f64>,
    pub principal_point: Point2<f64>,
}

impl CameraIntrinsics {
    /// Creates intrinsics for the given resolution which would create an identity intrinsic matrix.
    /// This would imply that the pixel positions have an origin at `0,0`,
    /// and the pixel distance unit is the focal length.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            focals: Vector2::new(1.0, 1.0),
            principal_point: Point2::new(0.0, 0.0),
        }
    }

    /// Reads `fx`, `fy`, `cx` and `cy` out of a row-major 4x4 projection matrix
    /// at positions `(0,0)`, `(1,1)`, `(0,2)` and `(1,2)` respectively.
    ///
    /// The resolution is not part of the matrix and must be supplied.
    ///
    /// ```
    /// use cv_pinhole::CameraIntrinsics;
    /// #[rustfmt::skip]
    /// let projection = [
    ///     500.0, 0.0,   320.0, 0.0,
    ///     0.0,   510.0, 240.0, 0.0,
    ///     0.0,   0.0,   1.0,   0.0,
    ///     0.0,   0.0,   1.0,   0.0,
    /// ];
    /// let intrinsics = CameraIntrinsics::from_projection_matrix(&projection, 640, 480);
    /// assert_eq!(intrinsics.focals.x, 500.0);
    /// assert_eq!(intrinsics.focals.y, 510.0);
    /// assert_eq!(intrinsics.principal_point.x, 320.0);
    /// assert_eq!(intrinsics.principal_point.y, 240.0);
    /// ```
    pub fn from_projection_matrix(projection: &[f64; 16], width: u32, height: u32) -> Self {
        let projection = Matrix4::from_row_slice(projection);
        Self::identity(width, height)
            .focals(Vector2::new(projection[(0, 0)], projection[(1, 1)]))
            .principal_point(Point2::new(projection[(0, 2)], projection[(1, 2)]))
    }

    #[must_use]
    pub fn focals(self, focals: Vector2<f64>) -> Self {
        Self { focals, ..self }
    }

    #[must_use]
    pub fn focal(self, focal: f64) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    #[must_use]
    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    /// Both focal lengths are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.focals.iter().all(|&f| f.is_finite() && f > 0.0)
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x,  0.0,            self.principal_point.x,
            0.0,            self.focals.y,  self.principal_point.y,
            0.0,            0.0,            1.0,
        )
    }

    /// Back-projects the pixel at `column` and `row` with the given depth into the camera frame.
    ///
    /// This is `((u - cx) * d / fx, (v - cy) * d / fy, d)`.
    ///
    /// ```
    /// use cv_core::nalgebra::{Point2, Point3, Vector2};
    /// use cv_core::Projective;
    /// use cv_pinhole::CameraIntrinsics;
    /// let intrinsics = CameraIntrinsics::identity(4, 4)
    ///     .focal(500.0)
    ///     .principal_point(Point2::new(2.0, 2.0));
    /// let point = intrinsics.back_project(3, 1, 2.0).point().unwrap();
    /// assert!((point - Point3::new(0.004, -0.004, 2.0)).norm() < 1e-12);
    /// ```
    pub fn back_project(&self, column: usize, row: usize, depth: f64) -> CameraPoint {
        self.calibrate(KeyPoint::from_pixel(column, row))
            .with_depth(depth)
    }
}

impl CameraModel for CameraIntrinsics {
    type Projection = NormalizedKeyPoint;

    /// Takes in a point from an image in pixel coordinates and
    /// converts it to a [`NormalizedKeyPoint`].
    ///
    /// ```
    /// use cv_core::{KeyPoint, CameraModel};
    /// use cv_pinhole::{NormalizedKeyPoint, CameraIntrinsics};
    /// use cv_core::nalgebra::{Vector2, Point2};
    /// let intrinsics = CameraIntrinsics::identity(1000, 1200)
    ///     .focals(Vector2::new(800.0, 900.0))
    ///     .principal_point(Point2::new(500.0, 600.0));
    /// let kp = KeyPoint(Point2::new(471.0, 322.0));
    /// let nkp = intrinsics.calibrate(kp);
    /// let calibration_matrix = intrinsics.matrix();
    /// let distance = (kp.to_homogeneous() - calibration_matrix * nkp.to_homogeneous()).norm();
    /// assert!(distance < 0.1);
    /// ```
    fn calibrate<P>(&self, point: P) -> NormalizedKeyPoint
    where
        P: ImagePoint,
    {
        let centered = point.image_point() - self.principal_point;
        NormalizedKeyPoint(Point2::new(
            centered.x / self.focals.x,
            centered.y / self.focals.y,
        ))
    }

    /// Converts a [`NormalizedKeyPoint`] back into pixel coordinates.
    ///
    /// ```
    /// use cv_core::{KeyPoint, CameraModel};
    /// use cv_pinhole::{NormalizedKeyPoint, CameraIntrinsics};
    /// use cv_core::nalgebra::{Vector2, Point2};
    /// let intrinsics = CameraIntrinsics::identity(1000, 1200)
    ///     .focals(Vector2::new(800.0, 900.0))
    ///     .principal_point(Point2::new(500.0, 600.0));
    /// let kp = KeyPoint(Point2::new(471.0, 322.0));
    /// let nkp = intrinsics.calibrate(kp);
    /// let ukp = intrinsics.uncalibrate(nkp);
    /// assert!((kp.0 - ukp.0).norm() < 1e-6);
    /// ```
    fn uncalibrate(&self, projection: NormalizedKeyPoint) -> KeyPoint {
        let centered = projection.coords.component_mul(&self.focals);
        KeyPoint(self.principal_point + centered)
    }
}
