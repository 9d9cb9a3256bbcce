use cv_geom::ObbError;
use cv_pointclouds::CloudError;
use thiserror::Error;

/// Everything that can stop an object (or a whole frame) from producing a pose.
///
/// [`PerceptionError::InvalidIntrinsics`] rejects a camera before any frame is processed.
/// Only [`PerceptionError::SingularViewMatrix`] and [`PerceptionError::ShapeMismatch`] concern a whole
/// frame. The others are local to one object and only cause that object to be left out.
#[derive(Debug, Error)]
pub enum PerceptionError {
    #[error("object {object_id} has no pixels in the segmentation")]
    EmptyMask { object_id: i32 },
    #[error("object {object_id} reconstructed to {points} points, at least {minimum} are needed")]
    InsufficientPoints {
        object_id: i32,
        points: usize,
        minimum: usize,
    },
    #[error("filtering the cloud of object {object_id} failed: {source}")]
    FilterFailed {
        object_id: i32,
        #[source]
        source: CloudError,
    },
    #[error("fitting a bounding box to object {object_id} failed: {source}")]
    ObbFittingFailed {
        object_id: i32,
        #[source]
        source: ObbError,
    },
    #[error("focal lengths ({fx}, {fy}) must be finite and positive")]
    InvalidIntrinsics { fx: f64, fy: f64 },
    #[error("view matrix is not invertible")]
    SingularViewMatrix,
    #[error("frame shapes disagree: rgb {rgb:?}, depth {depth:?}, segmentation {segmentation:?}")]
    ShapeMismatch {
        rgb: (usize, usize, usize),
        depth: (usize, usize),
        segmentation: (usize, usize),
    },
}

impl PerceptionError {
    /// The object the error concerns, if it is local to one object.
    pub fn object_id(&self) -> Option<i32> {
        match *self {
            Self::EmptyMask { object_id }
            | Self::InsufficientPoints { object_id, .. }
            | Self::FilterFailed { object_id, .. }
            | Self::ObbFittingFailed { object_id, .. } => Some(object_id),
            Self::InvalidIntrinsics { .. } | Self::SingularViewMatrix | Self::ShapeMismatch { .. } => {
                None
            }
        }
    }
}
