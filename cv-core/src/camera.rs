use crate::ImagePoint;

/// Allows conversion between the point on an image and the internal projection
/// which describes where the light came from on the virtual image plane.
pub trait CameraModel {
    type Projection;

    /// Extracts a projection from a pixel location in an image.
    ///
    /// The projection X axis points right, Y axis points down, and Z axis points forwards.
    /// The image point uses the same coordiate frame. Its Y is down and its X is right.
    fn calibrate<P>(&self, point: P) -> Self::Projection
    where
        P: ImagePoint;

    /// Extracts the pixel location in the image from the projection.
    fn uncalibrate(&self, projection: Self::Projection) -> crate::KeyPoint;
}
