use crate::PerceptionError;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

/// The three renders of one camera frame, all sharing the same height and width.
///
/// * `rgb` is `height x width x 3`
/// * `depth` is `height x width`, in raw depth units (see `PerceptionSettings::depth_scale`)
/// * `segmentation` is `height x width` object ids, where ids `<= 0` are background
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInputs {
    rgb: Array3<u8>,
    depth: Array2<f32>,
    segmentation: Array2<i32>,
}

impl FrameInputs {
    pub fn new(
        rgb: Array3<u8>,
        depth: Array2<f32>,
        segmentation: Array2<i32>,
    ) -> Result<Self, PerceptionError> {
        let (height, width, channels) = rgb.dim();
        if channels != 3 || depth.dim() != (height, width) || segmentation.dim() != (height, width)
        {
            return Err(PerceptionError::ShapeMismatch {
                rgb: rgb.dim(),
                depth: depth.dim(),
                segmentation: segmentation.dim(),
            });
        }
        Ok(Self {
            rgb,
            depth,
            segmentation,
        })
    }

    pub fn rgb(&self) -> ArrayView3<'_, u8> {
        self.rgb.view()
    }

    pub fn depth(&self) -> ArrayView2<'_, f32> {
        self.depth.view()
    }

    pub fn segmentation(&self) -> ArrayView2<'_, i32> {
        self.segmentation.view()
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    pub fn into_parts(self) -> (Array3<u8>, Array2<f32>, Array2<i32>) {
        (self.rgb, self.depth, self.segmentation)
    }
}
